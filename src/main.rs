//! Meshgen CLI - procedural sphere and terrain meshes.
//!
//! Generate subdivided unit spheres, diamond-square terrain grids, and run
//! the bouncing-sphere simulation from the command line.

use clap::{Parser, Subcommand, ValueEnum};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::path::{Path, PathBuf};
use std::time::Instant;

use meshgen::export::{
    export_heightmap_png, export_heightmap_raw, export_sphere_buffers, export_terrain_buffers,
    write_sphere_obj, write_terrain_obj, PngExportOptions, RawFormat,
};
use meshgen::geometry::{triangle_count_for_depth, IcosphereConfig, SubdivisionLimit, MAX_ADAPTIVE_DEPTH};
use meshgen::physics::{BounceSimulation, FrameParams, SimulationConfig};
use meshgen::pipeline::generate_terrain;
use meshgen::terrain::{DiamondSquareConfig, TerrainConfig};

/// Procedural sphere and terrain mesh generator.
#[derive(Parser)]
#[command(name = "meshgen")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a diamond-square terrain mesh.
    Terrain {
        /// Grid cells along each axis.
        #[arg(short, long, default_value = "64")]
        divisions: u32,

        /// Horizontal extent as min,max.
        #[arg(long, default_value = "-1.0,1.0", value_delimiter = ',', num_args = 2, allow_hyphen_values = true)]
        x_range: Vec<f32>,

        /// Vertical extent as min,max.
        #[arg(long, default_value = "-1.0,1.0", value_delimiter = ',', num_args = 2, allow_hyphen_values = true)]
        y_range: Vec<f32>,

        /// Random seed for reproducible generation.
        #[arg(short, long)]
        seed: Option<u64>,

        /// Offset amplitude of the four seeded corners.
        #[arg(long, default_value = "0.5")]
        corner_roughness: f32,

        /// Offset amplitude of the first subdivision level.
        #[arg(long, default_value = "0.4")]
        roughness: f32,

        /// Amplitude multiplier per level, in (0, 1).
        #[arg(long, default_value = "0.5")]
        persistence: f32,

        /// Use the rugged preset instead of the roughness arguments.
        #[arg(long)]
        rugged: bool,

        /// Keep the initial upward normals.
        #[arg(long)]
        skip_normals: bool,

        /// Output directory for generated files.
        #[arg(short, long, default_value = "./output")]
        output: PathBuf,

        /// Base name for output files.
        #[arg(short, long, default_value = "terrain")]
        name: String,

        /// Export format.
        #[arg(short, long, default_value = "obj")]
        format: TerrainFormat,
    },

    /// Generate a subdivided unit sphere.
    Sphere {
        /// Subdivision levels applied to each seed triangle.
        #[arg(short, long, default_value = "5")]
        depth: u32,

        /// Subdivide until every edge is at most this long (overrides depth).
        #[arg(long)]
        max_edge: Option<f32>,

        /// Output directory for generated files.
        #[arg(short, long, default_value = "./output")]
        output: PathBuf,

        /// Base name for output files.
        #[arg(short, long, default_value = "sphere")]
        name: String,

        /// Export format.
        #[arg(short, long, default_value = "obj")]
        format: SphereFormat,
    },

    /// Run the bouncing-sphere simulation and report collisions.
    Bounce {
        /// Number of spheres to spawn.
        #[arg(long, default_value = "10")]
        spheres: usize,

        /// Number of frames to simulate.
        #[arg(long, default_value = "1000")]
        steps: u32,

        /// Enable gravity.
        #[arg(long)]
        gravity: bool,

        /// Fraction of speed lost per wall collision (0.0-1.0).
        #[arg(long, default_value = "0.0")]
        energy_lost: f32,

        /// Velocity multiplier applied when moving spheres.
        #[arg(long, default_value = "1.0")]
        speed_boost: f32,

        /// Random seed for spawn positions.
        #[arg(short, long)]
        seed: Option<u64>,

        /// Subdivision depth of the shared sphere mesh.
        #[arg(short, long, default_value = "3")]
        depth: u32,
    },

    /// Display buffer sizes for a terrain and sphere configuration.
    Info {
        /// Grid cells along each axis.
        #[arg(long, default_value = "64")]
        divisions: u32,

        /// Sphere subdivision depth.
        #[arg(long, default_value = "5")]
        depth: u32,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum TerrainFormat {
    /// Wavefront OBJ mesh.
    Obj,
    /// Packed little-endian vertex, normal, index and edge buffers.
    Raw,
    /// 16-bit PNG heightmap.
    Png,
    /// 16-bit RAW little-endian heightmap.
    HeightmapRaw,
}

#[derive(Clone, Copy, ValueEnum)]
enum SphereFormat {
    /// Wavefront OBJ mesh.
    Obj,
    /// Packed little-endian vertex and normal buffers.
    Raw,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Terrain {
            divisions,
            x_range,
            y_range,
            seed,
            corner_roughness,
            roughness,
            persistence,
            rugged,
            skip_normals,
            output,
            name,
            format,
        } => {
            let seed = seed.unwrap_or_else(time_seed);
            let mut config = if rugged {
                TerrainConfig {
                    divisions,
                    ..TerrainConfig::rugged(seed)
                }
            } else {
                TerrainConfig {
                    divisions,
                    diamond_square: DiamondSquareConfig {
                        corner_roughness,
                        roughness,
                        persistence,
                        seed,
                    },
                    ..Default::default()
                }
            };
            config.min_x = x_range[0];
            config.max_x = x_range[1];
            config.min_y = y_range[0];
            config.max_y = y_range[1];
            config.recompute_normals = !skip_normals;
            run_terrain(config, output, name, format);
        }
        Commands::Sphere {
            depth,
            max_edge,
            output,
            name,
            format,
        } => {
            run_sphere(depth, max_edge, output, name, format);
        }
        Commands::Bounce {
            spheres,
            steps,
            gravity,
            energy_lost,
            speed_boost,
            seed,
            depth,
        } => {
            let params = FrameParams {
                gravity_enabled: gravity,
                energy_lost,
                speed_boost,
            };
            run_bounce(spheres, steps, params, seed, depth);
        }
        Commands::Info { divisions, depth } => {
            run_info(divisions, depth);
        }
    }
}

fn time_seed() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

fn validate_depth(depth: u32) {
    if depth > MAX_ADAPTIVE_DEPTH {
        eprintln!("Error: Depth must be at most {}", MAX_ADAPTIVE_DEPTH);
        std::process::exit(1);
    }
}

fn create_output_dir(output: &Path) {
    if let Err(e) = std::fs::create_dir_all(output) {
        eprintln!("Error creating output directory: {}", e);
        std::process::exit(1);
    }
}

fn run_terrain(config: TerrainConfig, output: PathBuf, name: String, format: TerrainFormat) {
    println!("Meshgen - Diamond-Square Terrain");
    println!("================================");
    println!("Divisions: {}x{}", config.divisions, config.divisions);
    println!(
        "Bounds: [{}, {}] x [{}, {}]",
        config.min_x, config.max_x, config.min_y, config.max_y
    );
    println!("Seed: {}", config.diamond_square.seed);
    println!(
        "Roughness: corners={}, initial={}, persistence={}",
        config.diamond_square.corner_roughness,
        config.diamond_square.roughness,
        config.diamond_square.persistence
    );
    println!();

    let start = Instant::now();
    let grid = generate_terrain(&config).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    });
    let (min, max) = grid.elevation_range();
    println!("Generated in {:.2?}", start.elapsed());
    println!("  Vertices:  {}", grid.vertex_count());
    println!("  Triangles: {}", grid.triangle_count());
    println!("  Elevation: [{:.4}, {:.4}]", min, max);
    if !grid.fits_u16_indices() {
        println!("  Note: indices exceed 16 bits; use 32-bit index buffers");
    }
    println!();

    create_output_dir(&output);
    let export_start = Instant::now();
    let result = match format {
        TerrainFormat::Obj => {
            let path = output.join(format!("{}.obj", name));
            write_terrain_obj(&grid, &path).map(|_| vec![path]).map_err(|e| e.to_string())
        }
        TerrainFormat::Raw => export_terrain_buffers(&grid, &output, &name).map_err(|e| e.to_string()),
        TerrainFormat::Png => {
            let path = output.join(format!("{}.png", name));
            export_heightmap_png(&grid, &path, &PngExportOptions::auto_range(&grid))
                .map(|_| vec![path])
                .map_err(|e| e.to_string())
        }
        TerrainFormat::HeightmapRaw => {
            let path = output.join(format!("{}.raw", name));
            let options = PngExportOptions::auto_range(&grid);
            export_heightmap_raw(
                &grid,
                &path,
                RawFormat::R16LittleEndian,
                options.min_height,
                options.max_height,
            )
            .map(|_| vec![path])
            .map_err(|e| e.to_string())
        }
    };

    let paths = result.unwrap_or_else(|e| {
        eprintln!("Error exporting terrain: {}", e);
        std::process::exit(1);
    });
    for path in &paths {
        println!("  Exported {}", path.display());
    }
    println!("Export completed in {:.2?}", export_start.elapsed());
    println!("Done!");
}

fn run_sphere(depth: u32, max_edge: Option<f32>, output: PathBuf, name: String, format: SphereFormat) {
    validate_depth(depth);

    let config = match max_edge {
        Some(max_edge) => IcosphereConfig {
            limit: SubdivisionLimit::MaxEdge(max_edge),
        },
        None => IcosphereConfig::with_depth(depth),
    };

    println!("Meshgen - Icosphere");
    println!("===================");
    match config.limit {
        SubdivisionLimit::Depth(depth) => println!("Depth: {}", depth),
        SubdivisionLimit::MaxEdge(max_edge) => println!("Max edge length: {}", max_edge),
    }
    println!();

    let start = Instant::now();
    let mesh = config.build().unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    });
    println!("Generated in {:.2?}", start.elapsed());
    println!("  Triangles: {}", mesh.triangle_count());
    println!("  Vertices:  {}", mesh.vertex_count());
    println!();

    create_output_dir(&output);
    let result = match format {
        SphereFormat::Obj => {
            let path = output.join(format!("{}.obj", name));
            write_sphere_obj(&mesh, &path).map(|_| vec![path]).map_err(|e| e.to_string())
        }
        SphereFormat::Raw => export_sphere_buffers(&mesh, &output, &name).map_err(|e| e.to_string()),
    };

    let paths = result.unwrap_or_else(|e| {
        eprintln!("Error exporting sphere: {}", e);
        std::process::exit(1);
    });
    for path in &paths {
        println!("  Exported {}", path.display());
    }
    println!("Done!");
}

fn run_bounce(spheres: usize, steps: u32, params: FrameParams, seed: Option<u64>, depth: u32) {
    validate_depth(depth);
    if let Err(e) = params.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    let seed = seed.unwrap_or_else(time_seed);
    let mesh = IcosphereConfig::with_depth(depth).build().unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    });
    let config = SimulationConfig::default();

    println!("Meshgen - Bouncing Spheres");
    println!("==========================");
    println!("Spheres: {} (mesh: {} triangles)", spheres, mesh.triangle_count());
    println!("Box half extent: {}", config.half_extent);
    println!("Seed: {}", seed);
    println!(
        "Gravity: {}, energy lost: {}, speed boost: {}",
        if params.gravity_enabled { "on" } else { "off" },
        params.energy_lost,
        params.speed_boost
    );
    println!();

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut sim = BounceSimulation::new(mesh.into_shared(), config);
    for _ in 0..spheres {
        sim.spawn(&mut rng);
    }

    let start = Instant::now();
    let mut collisions = 0usize;
    for _ in 0..steps {
        collisions += sim.step(&params).unwrap_or_else(|e| {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        });
    }

    println!("Simulated {} frames in {:.2?}", steps, start.elapsed());
    println!("  Wall collisions: {}", collisions);
    let mean_speed = if sim.spheres().is_empty() {
        0.0
    } else {
        sim.spheres().iter().map(|s| s.velocity.length()).sum::<f32>() / sim.spheres().len() as f32
    };
    println!("  Mean final speed: {:.4}", mean_speed);
    println!("Done!");
}

fn run_info(divisions: u32, depth: u32) {
    let side = divisions as u64 + 1;
    let vertices = side * side;
    let triangles = 2 * (divisions as u64) * (divisions as u64);
    let edges = triangles * 3;

    let bytes_positions = vertices * 3 * 4;
    let bytes_indices = triangles * 3 * 4;
    let bytes_edges = edges * 2 * 4;

    println!("Meshgen - Configuration Info");
    println!("============================");
    println!();
    println!("Terrain: {}x{} divisions", divisions, divisions);
    println!("  Vertices:  {:>12}", vertices);
    println!("  Triangles: {:>12}", triangles);
    println!("  Edges:     {:>12}", edges);
    println!("  Positions: {:>12} bytes ({:.2} MB)", bytes_positions, mb(bytes_positions));
    println!("  Normals:   {:>12} bytes ({:.2} MB)", bytes_positions, mb(bytes_positions));
    println!("  Indices:   {:>12} bytes ({:.2} MB)", bytes_indices, mb(bytes_indices));
    println!("  Edges:     {:>12} bytes ({:.2} MB)", bytes_edges, mb(bytes_edges));
    if vertices <= u16::MAX as u64 + 1 {
        println!("  Index width: 16-bit OK");
    } else {
        println!("  Index width: requires 32-bit indices");
    }
    println!();

    validate_depth(depth);
    let sphere_triangles = triangle_count_for_depth(depth).unwrap_or_else(|| {
        eprintln!("Error: Depth {} overflows the triangle count", depth);
        std::process::exit(1);
    }) as u64;
    let sphere_bytes = sphere_triangles * 3 * 3 * 4;
    println!("Sphere: depth {}", depth);
    println!("  Triangles: {:>12}", sphere_triangles);
    println!("  Vertices:  {:>12}", sphere_triangles * 3);
    println!("  Positions: {:>12} bytes ({:.2} MB)", sphere_bytes, mb(sphere_bytes));
    println!("  Normals:   {:>12} bytes ({:.2} MB)", sphere_bytes, mb(sphere_bytes));
}

fn mb(bytes: u64) -> f64 {
    bytes as f64 / 1024.0 / 1024.0
}
