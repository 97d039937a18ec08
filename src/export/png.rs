//! 16-bit grayscale PNG export of terrain heightmaps.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{ImageBuffer, ImageEncoder, Luma};
use thiserror::Error;

use crate::terrain::TerrainGrid;

/// Errors that can occur during PNG export.
#[derive(Error, Debug)]
pub enum PngExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Image encoding error: {0}")]
    Image(#[from] image::ImageError),
    #[error("Invalid height range: min ({0}) >= max ({1})")]
    InvalidHeightRange(f32, f32),
}

/// Options for PNG export.
#[derive(Debug, Clone)]
pub struct PngExportOptions {
    /// Elevation mapped to black.
    pub min_height: f32,
    /// Elevation mapped to white.
    pub max_height: f32,
    pub compression: CompressionType,
    pub filter: FilterType,
}

impl Default for PngExportOptions {
    fn default() -> Self {
        Self {
            min_height: -1.0,
            max_height: 1.0,
            compression: CompressionType::Default,
            filter: FilterType::Adaptive,
        }
    }
}

impl PngExportOptions {
    /// Creates options spanning the grid's elevation range.
    ///
    /// A flat grid gets a small symmetric range so the export stays valid.
    pub fn auto_range(grid: &TerrainGrid) -> Self {
        let (min, max) = grid.elevation_range();
        let (min, max) = if min < max { (min, max) } else { (min - 0.5, max + 0.5) };
        Self {
            min_height: min,
            max_height: max,
            ..Default::default()
        }
    }
}

/// Exports grid elevations as a `(divisions + 1)²` 16-bit PNG.
///
/// Grid row `i` becomes image row `i`, column `j` image column `j`.
pub fn export_heightmap_png(
    grid: &TerrainGrid,
    path: &Path,
    options: &PngExportOptions,
) -> Result<(), PngExportError> {
    let min = options.min_height;
    let max = options.max_height;
    if min >= max {
        return Err(PngExportError::InvalidHeightRange(min, max));
    }

    let side = grid.divisions + 1;
    let range = max - min;
    let img: ImageBuffer<Luma<u16>, Vec<u16>> = ImageBuffer::from_fn(side, side, |x, y| {
        let z = grid.elevation(y as usize, x as usize);
        let normalized = ((z - min) / range).clamp(0.0, 1.0);
        Luma([(normalized * 65535.0) as u16])
    });

    let writer = BufWriter::new(File::create(path)?);
    let encoder = PngEncoder::new_with_quality(writer, options.compression, options.filter);
    let byte_slice: &[u8] = bytemuck::cast_slice(img.as_raw());
    encoder.write_image(byte_slice, side, side, image::ExtendedColorType::L16)?;

    log::info!("Export: wrote {}x{} heightmap to {}", side, side, path.display());
    Ok(())
}
