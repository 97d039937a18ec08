//! RAW export: tightly packed little-endian mesh buffers and heightmaps.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::geometry::SphereMesh;
use crate::terrain::TerrainGrid;

/// Errors that can occur during RAW export.
#[derive(Error, Debug)]
pub enum RawExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid height range: min ({0}) >= max ({1})")]
    InvalidHeightRange(f32, f32),
}

/// RAW heightmap sample format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RawFormat {
    /// 16-bit unsigned integer, little-endian.
    #[default]
    R16LittleEndian,
    /// 16-bit unsigned integer, big-endian.
    R16BigEndian,
    /// 32-bit float, little-endian (unnormalized).
    R32Float,
}

/// Exports grid elevations row by row as a RAW heightmap.
///
/// # Arguments
/// * `grid` - Terrain to export, `(divisions + 1)²` samples
/// * `path` - Output file path
/// * `format` - RAW format (R16 or R32)
/// * `min_height` - Elevation mapped to 0 (R16 only)
/// * `max_height` - Elevation mapped to 65535 (R16 only)
pub fn export_heightmap_raw(
    grid: &TerrainGrid,
    path: &Path,
    format: RawFormat,
    min_height: f32,
    max_height: f32,
) -> Result<(), RawExportError> {
    if format != RawFormat::R32Float && min_height >= max_height {
        return Err(RawExportError::InvalidHeightRange(min_height, max_height));
    }

    let mut writer = BufWriter::new(File::create(path)?);
    let range = max_height - min_height;
    let quantize = |z: f32| (((z - min_height) / range).clamp(0.0, 1.0) * 65535.0) as u16;

    match format {
        RawFormat::R16LittleEndian => {
            for z in grid.elevations() {
                writer.write_all(&quantize(z).to_le_bytes())?;
            }
        }
        RawFormat::R16BigEndian => {
            for z in grid.elevations() {
                writer.write_all(&quantize(z).to_be_bytes())?;
            }
        }
        RawFormat::R32Float => {
            for z in grid.elevations() {
                writer.write_all(&z.to_le_bytes())?;
            }
        }
    }

    writer.flush()?;
    Ok(())
}

/// Returns the expected file size of a heightmap export.
pub fn expected_file_size(divisions: u32, format: RawFormat) -> u64 {
    let side = divisions as u64 + 1;
    let samples = side * side;
    match format {
        RawFormat::R16LittleEndian | RawFormat::R16BigEndian => samples * 2,
        RawFormat::R32Float => samples * 4,
    }
}

/// Writes `{name}_positions.f32` and `{name}_normals.f32` for a sphere mesh.
///
/// # Returns
/// The paths written, in that order.
pub fn export_sphere_buffers(
    mesh: &SphereMesh,
    output_dir: &Path,
    name: &str,
) -> Result<Vec<PathBuf>, RawExportError> {
    std::fs::create_dir_all(output_dir)?;
    let paths = vec![
        write_f32(output_dir, name, "positions", mesh.position_buffer())?,
        write_f32(output_dir, name, "normals", mesh.normal_buffer())?,
    ];
    log::info!("Export: wrote {} sphere buffers to {}", paths.len(), output_dir.display());
    Ok(paths)
}

/// Writes positions, normals, triangle indices and edge indices of a grid.
///
/// # Returns
/// The paths written: `_positions.f32`, `_normals.f32`, `_indices.u32`, `_edges.u32`.
pub fn export_terrain_buffers(
    grid: &TerrainGrid,
    output_dir: &Path,
    name: &str,
) -> Result<Vec<PathBuf>, RawExportError> {
    std::fs::create_dir_all(output_dir)?;
    let paths = vec![
        write_f32(output_dir, name, "positions", grid.position_buffer())?,
        write_f32(output_dir, name, "normals", grid.normal_buffer())?,
        write_u32(output_dir, name, "indices", grid.index_buffer())?,
        write_u32(output_dir, name, "edges", grid.edge_buffer())?,
    ];
    log::info!("Export: wrote {} terrain buffers to {}", paths.len(), output_dir.display());
    Ok(paths)
}

fn write_f32(dir: &Path, name: &str, kind: &str, data: &[f32]) -> Result<PathBuf, RawExportError> {
    let path = dir.join(format!("{}_{}.f32", name, kind));
    let mut writer = BufWriter::new(File::create(&path)?);
    for v in data {
        writer.write_all(&v.to_le_bytes())?;
    }
    writer.flush()?;
    Ok(path)
}

fn write_u32(dir: &Path, name: &str, kind: &str, data: &[u32]) -> Result<PathBuf, RawExportError> {
    let path = dir.join(format!("{}_{}.u32", name, kind));
    let mut writer = BufWriter::new(File::create(&path)?);
    for v in data {
        writer.write_all(&v.to_le_bytes())?;
    }
    writer.flush()?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::generate;
    use tempfile::tempdir;

    fn ramp(divisions: u32) -> TerrainGrid {
        let mut grid = TerrainGrid::new(divisions, -1.0, 1.0, -1.0, 1.0).unwrap();
        let n = grid.vertex_count();
        for (k, v) in grid.vertices.iter_mut().enumerate() {
            v.z = k as f32 / (n - 1) as f32 * 2.0 - 1.0;
        }
        grid
    }

    #[test]
    fn test_export_heightmap_raw_sizes() {
        let grid = ramp(31);
        let dir = tempdir().unwrap();

        for format in [RawFormat::R16LittleEndian, RawFormat::R16BigEndian, RawFormat::R32Float] {
            let path = dir.path().join("test.raw");
            export_heightmap_raw(&grid, &path, format, -1.0, 1.0).unwrap();
            let metadata = std::fs::metadata(&path).unwrap();
            assert_eq!(metadata.len(), expected_file_size(31, format), "{:?}", format);
        }
    }

    #[test]
    fn test_raw_content_correctness() {
        let mut grid = TerrainGrid::new(1, 0.0, 1.0, 0.0, 1.0).unwrap();
        grid.set_elevation(0, 0, -1.0);
        grid.set_elevation(0, 1, 0.0);
        grid.set_elevation(1, 0, 0.5);
        grid.set_elevation(1, 1, 1.0);

        let dir = tempdir().unwrap();
        let path = dir.path().join("test.raw");
        export_heightmap_raw(&grid, &path, RawFormat::R16BigEndian, -1.0, 1.0).unwrap();

        let data = std::fs::read(&path).unwrap();
        assert_eq!(data.len(), 8);
        assert_eq!(u16::from_be_bytes([data[0], data[1]]), 0);
        let mid = u16::from_be_bytes([data[2], data[3]]);
        assert!((mid as i32 - 32767).abs() < 2);
        assert_eq!(u16::from_be_bytes([data[6], data[7]]), 65535);
    }

    #[test]
    fn test_invalid_height_range() {
        let grid = ramp(4);
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.raw");
        let result = export_heightmap_raw(&grid, &path, RawFormat::R16LittleEndian, 1.0, 1.0);
        assert!(matches!(result, Err(RawExportError::InvalidHeightRange(_, _))));
        // R32 ignores the range.
        assert!(export_heightmap_raw(&grid, &path, RawFormat::R32Float, 1.0, 1.0).is_ok());
    }

    #[test]
    fn test_export_terrain_buffers() {
        let grid = ramp(2);
        let dir = tempdir().unwrap();
        let paths = export_terrain_buffers(&grid, dir.path(), "terrain").unwrap();

        let names: Vec<_> = paths
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(
            names,
            ["terrain_positions.f32", "terrain_normals.f32", "terrain_indices.u32", "terrain_edges.u32"]
        );

        let sizes: Vec<u64> = paths.iter().map(|p| std::fs::metadata(p).unwrap().len()).collect();
        assert_eq!(sizes, [27 * 4, 27 * 4, 24 * 4, 48 * 4]);

        let indices = std::fs::read(&paths[2]).unwrap();
        let first: Vec<u32> = indices
            .chunks_exact(4)
            .take(3)
            .map(|b| u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
            .collect();
        assert_eq!(first, [0, 1, 3]);
    }

    #[test]
    fn test_export_sphere_buffers() {
        let mesh = generate(1);
        let dir = tempdir().unwrap();
        let paths = export_sphere_buffers(&mesh, &dir.path().join("nested"), "sphere").unwrap();
        assert_eq!(paths.len(), 2);

        let positions = std::fs::read(&paths[0]).unwrap();
        assert_eq!(positions.len(), 16 * 3 * 3 * 4);
        let x = f32::from_le_bytes([positions[0], positions[1], positions[2], positions[3]]);
        assert_eq!(x, mesh.vertices[0].x);
    }
}
