//! Export module for saving meshes and heightmaps to files.
//!
//! Supports Wavefront OBJ for inspection in modelling tools, tightly packed
//! little-endian buffers ready for GPU upload, RAW heightmaps for engine
//! imports, and 16-bit PNG heightmaps.

mod obj;
mod png;
mod raw;

pub use obj::{write_sphere_obj, write_terrain_obj, ObjExportError};
pub use png::{export_heightmap_png, PngExportError, PngExportOptions};
pub use raw::{
    expected_file_size, export_heightmap_raw, export_sphere_buffers, export_terrain_buffers,
    RawExportError, RawFormat,
};
