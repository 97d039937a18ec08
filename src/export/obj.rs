//! Wavefront OBJ export for sphere and terrain meshes.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use glam::Vec3;
use thiserror::Error;

use crate::geometry::SphereMesh;
use crate::terrain::TerrainGrid;

/// Errors that can occur during OBJ export.
#[derive(Error, Debug)]
pub enum ObjExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Writes a sphere triangle soup; every three vertices form one face.
pub fn write_sphere_obj(mesh: &SphereMesh, path: &Path) -> Result<(), ObjExportError> {
    let mut writer = BufWriter::new(File::create(path)?);
    writeln!(writer, "# icosphere: {} triangles", mesh.triangle_count())?;
    write_attributes(&mut writer, &mesh.vertices, &mesh.normals)?;
    for t in 0..mesh.triangle_count() {
        let base = t * 3 + 1;
        write_face(&mut writer, [base, base + 1, base + 2])?;
    }
    writer.flush()?;
    Ok(())
}

/// Writes an indexed terrain mesh with its stored normals.
pub fn write_terrain_obj(grid: &TerrainGrid, path: &Path) -> Result<(), ObjExportError> {
    let mut writer = BufWriter::new(File::create(path)?);
    writeln!(
        writer,
        "# terrain: {} divisions, {} triangles",
        grid.divisions,
        grid.triangle_count()
    )?;
    write_attributes(&mut writer, &grid.vertices, &grid.normals)?;
    for &[a, b, c] in &grid.triangles {
        write_face(&mut writer, [a as usize + 1, b as usize + 1, c as usize + 1])?;
    }
    writer.flush()?;
    Ok(())
}

fn write_attributes<W: Write>(writer: &mut W, positions: &[Vec3], normals: &[Vec3]) -> std::io::Result<()> {
    for p in positions {
        writeln!(writer, "v {} {} {}", p.x, p.y, p.z)?;
    }
    for n in normals {
        writeln!(writer, "vn {} {} {}", n.x, n.y, n.z)?;
    }
    Ok(())
}

// OBJ indices are 1-based.
fn write_face<W: Write>(writer: &mut W, [a, b, c]: [usize; 3]) -> std::io::Result<()> {
    writeln!(writer, "f {a}//{a} {b}//{b} {c}//{c}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::generate;
    use tempfile::tempdir;

    fn count(text: &str, prefix: &str) -> usize {
        text.lines().filter(|l| l.starts_with(prefix)).count()
    }

    #[test]
    fn test_write_sphere_obj() {
        let mesh = generate(1);
        let dir = tempdir().unwrap();
        let path = dir.path().join("sphere.obj");
        write_sphere_obj(&mesh, &path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(count(&text, "v "), 48);
        assert_eq!(count(&text, "vn "), 48);
        assert_eq!(count(&text, "f "), 16);
        assert!(text.lines().any(|l| l == "f 1//1 2//2 3//3"));
        assert!(text.lines().any(|l| l == "f 46//46 47//47 48//48"));
    }

    #[test]
    fn test_write_terrain_obj() {
        let grid = TerrainGrid::new(2, -1.0, 1.0, -1.0, 1.0).unwrap();
        let dir = tempdir().unwrap();
        let path = dir.path().join("terrain.obj");
        write_terrain_obj(&grid, &path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(count(&text, "v "), 9);
        assert_eq!(count(&text, "vn "), 9);
        assert_eq!(count(&text, "f "), 8);
        let first_face = text.lines().find(|l| l.starts_with("f ")).unwrap();
        assert_eq!(first_face, "f 1//1 2//2 4//4");
        assert!(text.contains("v -1 -1 0"));
    }
}
