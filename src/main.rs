mod app;

use std::path::PathBuf;

use clap::Parser;
use log::info;
use nalgebra::vector;

use tiny_rasterizer::{DepthRange, ShadeMode};

/// Software triangle rasterizer demo.
#[derive(Parser, Debug)]
#[command(name = "tiny_rasterizer", version, about = "Software triangle rasterizer demo")]
struct Args {
    /// Render one frame rotated by ANGLE degrees around z, write it to OUTPUT and exit
    #[arg(short = 'r', long = "rotate", value_name = "ANGLE", allow_negative_numbers = true)]
    angle: Option<f32>,

    /// Image file written in single frame mode
    #[arg(default_value = "output.png")]
    output: PathBuf,

    /// Render target width in pixels
    #[arg(long, default_value_t = 700)]
    width: u32,

    /// Render target height in pixels
    #[arg(long, default_value_t = 700)]
    height: u32,

    /// Distance of the eye from the origin along z
    #[arg(long, default_value_t = 5.0, allow_negative_numbers = true)]
    eye_z: f32,

    /// Vertical field of view in degrees
    #[arg(long, default_value_t = 45.0)]
    fov: f32,

    /// Near plane distance
    #[arg(long, default_value_t = 0.1)]
    near: f32,

    /// Far plane distance
    #[arg(long, default_value_t = 50.0)]
    far: f32,

    /// Interpolate vertex colors instead of painting each triangle with its first vertex color
    #[arg(long)]
    gouraud: bool,

    /// OBJ model drawn instead of the built-in triangles
    #[arg(short, long)]
    model: Option<PathBuf>,

    /// Log frames per second in windowed mode
    #[arg(long)]
    print_fps: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[show_image::main]
fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let log_level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .format_timestamp_millis()
        .init();

    let params = app::Params {
        width: args.width,
        height: args.height,
        angle: args.angle.unwrap_or(0.0),
        output: args.angle.map(|_| args.output),
        eye_pos: vector![0.0, 0.0, args.eye_z],
        eye_fov: args.fov,
        depth_range: DepthRange::new(args.near, args.far)?,
        shade_mode: if args.gouraud { ShadeMode::Gouraud } else { ShadeMode::Flat },
        model_path: args.model,
        print_fps: args.print_fps,
    };
    info!("Rendering at {}x{}", params.width, params.height);

    app::run(params)?;

    return Ok(());
}
