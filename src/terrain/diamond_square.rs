//! Diamond-square fractal height perturbation.
//!
//! The subdivision lattice is the smallest power of two covering the grid,
//! so grids of any size are filled completely; lattice points falling
//! outside the grid are skipped and averages use only in-bounds neighbours.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use super::config::DiamondSquareConfig;
use super::grid::TerrainGrid;
use crate::error::MeshError;

const DIAGONAL: [(i64, i64); 4] = [(1, 1), (-1, -1), (-1, 1), (1, -1)];
const AXIAL: [(i64, i64); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

/// Perturbs grid elevations with the diamond-square algorithm.
///
/// Corners are seeded first with offsets up to `corner_roughness`; each
/// following level halves the step and multiplies the offset amplitude by
/// `persistence`. Seeded corners are never overwritten.
///
/// # Returns
/// The number of elevation samples written, which is every grid vertex.
pub fn diamond_square<R: Rng + ?Sized>(
    grid: &mut TerrainGrid,
    config: &DiamondSquareConfig,
    rng: &mut R,
) -> Result<usize, MeshError> {
    config.validate()?;

    let div = grid.divisions as i64;
    let mut written = 0;

    for (row, col) in corners(div) {
        grid.set_elevation(row as usize, col as usize, offset(rng, config.corner_roughness));
        written += 1;
    }

    let mut step = (div as u64).next_power_of_two() as i64;
    let mut amplitude = config.roughness;
    while step > 1 {
        let half = step / 2;
        written += diamond_pass(grid, step, half, amplitude, rng);
        written += square_pass(grid, step, half, amplitude, rng);

        log::debug!("Diamond-square: level step={} amplitude={}", step, amplitude);
        step = half;
        amplitude *= config.persistence;
    }

    Ok(written)
}

/// Perturbs a grid with default amplitudes, a given base roughness and seed.
pub fn perturb(grid: &mut TerrainGrid, roughness: f32, seed: u64) -> Result<usize, MeshError> {
    let config = DiamondSquareConfig {
        roughness,
        seed,
        ..Default::default()
    };
    let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
    diamond_square(grid, &config, &mut rng)
}

fn corners(div: i64) -> [(i64, i64); 4] {
    [(0, 0), (div, div), (div, 0), (0, div)]
}

fn is_corner(div: i64, row: i64, col: i64) -> bool {
    (row == 0 || row == div) && (col == 0 || col == div)
}

fn offset<R: Rng + ?Sized>(rng: &mut R, amplitude: f32) -> f32 {
    if amplitude == 0.0 {
        return 0.0;
    }
    rng.random_range(-amplitude..=amplitude)
}

/// Average elevation of the in-bounds neighbours at `half` along `dirs`.
fn neighbour_mean(grid: &TerrainGrid, row: i64, col: i64, half: i64, dirs: &[(i64, i64)]) -> Option<f32> {
    let div = grid.divisions as i64;
    let mut total = 0.0;
    let mut count = 0;
    for &(dr, dc) in dirs {
        let (r, c) = (row + dr * half, col + dc * half);
        if (0..=div).contains(&r) && (0..=div).contains(&c) {
            total += grid.elevation(r as usize, c as usize);
            count += 1;
        }
    }
    (count > 0).then(|| total / count as f32)
}

fn update<R: Rng + ?Sized>(
    grid: &mut TerrainGrid,
    row: i64,
    col: i64,
    half: i64,
    dirs: &[(i64, i64)],
    amplitude: f32,
    rng: &mut R,
) -> usize {
    if is_corner(grid.divisions as i64, row, col) {
        return 0;
    }
    match neighbour_mean(grid, row, col, half, dirs) {
        Some(mean) => {
            grid.set_elevation(row as usize, col as usize, mean + offset(rng, amplitude));
            1
        }
        None => 0,
    }
}

/// Sets the centre of every lattice square from its diagonal corners.
fn diamond_pass<R: Rng + ?Sized>(grid: &mut TerrainGrid, step: i64, half: i64, amplitude: f32, rng: &mut R) -> usize {
    let div = grid.divisions as i64;
    let mut written = 0;
    let mut row = half;
    while row <= div {
        let mut col = half;
        while col <= div {
            written += update(grid, row, col, half, &DIAGONAL, amplitude, rng);
            col += step;
        }
        row += step;
    }
    written
}

/// Sets the edge midpoints of every lattice square from their axial neighbours.
fn square_pass<R: Rng + ?Sized>(grid: &mut TerrainGrid, step: i64, half: i64, amplitude: f32, rng: &mut R) -> usize {
    let div = grid.divisions as i64;
    let mut written = 0;
    let mut row = 0;
    while row <= div {
        let mut col = if (row / half) % 2 == 0 { half } else { 0 };
        while col <= div {
            written += update(grid, row, col, half, &AXIAL, amplitude, rng);
            col += step;
        }
        row += half;
    }
    written
}
