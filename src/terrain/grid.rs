//! Regular triangulated grid that carries the terrain height field.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::MeshError;

/// Largest index value that still fits a 16-bit index buffer.
const U16_INDEX_LIMIT: u64 = u16::MAX as u64 + 1;

/// A `(divisions + 1)²` vertex grid over an axis-aligned rectangle.
///
/// Vertex `(row i, column j)` lives at index `i * (divisions + 1) + j`; its
/// `z` component is the elevation of that grid cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TerrainGrid {
    /// Cells along each axis.
    pub divisions: u32,
    pub min_x: f32,
    pub max_x: f32,
    pub min_y: f32,
    pub max_y: f32,
    /// Vertex positions in row-major order.
    pub vertices: Vec<Vec3>,
    /// Per-vertex normals (accumulated face normals after recomputation).
    pub normals: Vec<Vec3>,
    /// Triangle vertex indices, two triangles per cell.
    pub triangles: Vec<[u32; 3]>,
    /// Wireframe edges, three per triangle, shared edges repeated.
    pub edges: Vec<[u32; 2]>,
}

impl TerrainGrid {
    /// Builds a flat grid with `divisions` cells along each axis.
    ///
    /// # Arguments
    /// * `divisions` - Number of cells per axis (at least 1)
    /// * `min_x`, `max_x` - Horizontal extent, `min_x < max_x`
    /// * `min_y`, `max_y` - Vertical extent, `min_y < max_y`
    pub fn new(
        divisions: u32,
        min_x: f32,
        max_x: f32,
        min_y: f32,
        max_y: f32,
    ) -> Result<Self, MeshError> {
        if divisions == 0 {
            return Err(MeshError::InvalidDivisions(divisions));
        }
        let bounds_ok = [min_x, max_x, min_y, max_y].iter().all(|v| v.is_finite())
            && min_x < max_x
            && min_y < max_y;
        if !bounds_ok {
            return Err(MeshError::InvalidBounds(min_x, max_x, min_y, max_y));
        }
        let side = divisions as u64 + 1;
        if side.checked_mul(side).map_or(true, |n| n > u32::MAX as u64) {
            return Err(MeshError::IndexOverflow(divisions));
        }

        let mut grid = Self {
            divisions,
            min_x,
            max_x,
            min_y,
            max_y,
            vertices: Vec::new(),
            normals: Vec::new(),
            triangles: Vec::new(),
            edges: Vec::new(),
        };
        grid.generate_vertices();
        grid.generate_triangles();
        grid.generate_edges();

        log::debug!(
            "Terrain: built {} vertices, {} triangles, {} edges",
            grid.vertex_count(),
            grid.triangle_count(),
            grid.edges.len()
        );
        Ok(grid)
    }

    fn generate_vertices(&mut self) {
        let side = self.side();
        let delta_x = (self.max_x - self.min_x) / self.divisions as f32;
        let delta_y = (self.max_y - self.min_y) / self.divisions as f32;

        self.vertices.reserve(side * side);
        for i in 0..side {
            for j in 0..side {
                self.vertices.push(Vec3::new(
                    self.min_x + delta_x * j as f32,
                    self.min_y + delta_y * i as f32,
                    0.0,
                ));
            }
        }
        self.normals = vec![Vec3::Z; side * side];
    }

    fn generate_triangles(&mut self) {
        let div = self.divisions;
        let side = div + 1;

        self.triangles.reserve(2 * (div as usize) * (div as usize));
        for i in 0..div {
            for j in 0..div {
                let vid = i * side + j;
                self.triangles.push([vid, vid + 1, vid + side]);
                self.triangles.push([vid + 1, vid + 1 + side, vid + side]);
            }
        }
    }

    fn generate_edges(&mut self) {
        self.edges = self
            .triangles
            .iter()
            .flat_map(|&[a, b, c]| [[a, b], [b, c], [c, a]])
            .collect();
    }

    /// Number of vertices along one side of the grid.
    pub fn side(&self) -> usize {
        self.divisions as usize + 1
    }

    /// Returns the flat vertex index of `(row, col)`.
    ///
    /// # Panics
    /// If `row` or `col` exceeds `divisions`.
    pub fn index(&self, row: usize, col: usize) -> usize {
        let side = self.side();
        assert!(
            row < side && col < side,
            "grid position ({}, {}) outside {}x{} grid",
            row,
            col,
            side,
            side
        );
        row * side + col
    }

    /// Returns the vertex at `(row, col)`.
    pub fn vertex(&self, row: usize, col: usize) -> Vec3 {
        self.vertices[self.index(row, col)]
    }

    /// Returns the elevation at `(row, col)`.
    pub fn elevation(&self, row: usize, col: usize) -> f32 {
        self.vertices[self.index(row, col)].z
    }

    /// Sets the elevation at `(row, col)`, leaving `x` and `y` untouched.
    pub fn set_elevation(&mut self, row: usize, col: usize, z: f32) {
        let idx = self.index(row, col);
        self.vertices[idx].z = z;
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Returns (min, max) elevation over the grid.
    pub fn elevation_range(&self) -> (f32, f32) {
        self.vertices
            .iter()
            .fold((f32::MAX, f32::MIN), |(min, max), v| (min.min(v.z), max.max(v.z)))
    }

    /// Elevations in row-major order.
    pub fn elevations(&self) -> impl Iterator<Item = f32> + '_ {
        self.vertices.iter().map(|v| v.z)
    }

    /// Normals rescaled to unit length.
    ///
    /// The stored normals are sums of face normals and are left as-is.
    pub fn unit_normals(&self) -> Vec<Vec3> {
        self.normals.iter().map(|n| n.normalize_or_zero()).collect()
    }

    /// True if every vertex index fits a 16-bit index buffer.
    pub fn fits_u16_indices(&self) -> bool {
        (self.vertex_count() as u64) <= U16_INDEX_LIMIT
    }

    /// Positions as tightly packed `x, y, z` floats.
    pub fn position_buffer(&self) -> &[f32] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// Normals as tightly packed `x, y, z` floats.
    pub fn normal_buffer(&self) -> &[f32] {
        bytemuck::cast_slice(&self.normals)
    }

    /// Triangle indices as tightly packed `u32` triples.
    pub fn index_buffer(&self) -> &[u32] {
        bytemuck::cast_slice(&self.triangles)
    }

    /// Edge indices as tightly packed `u32` pairs.
    pub fn edge_buffer(&self) -> &[u32] {
        bytemuck::cast_slice(&self.edges)
    }
}
