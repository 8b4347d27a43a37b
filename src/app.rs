use std::error::Error;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time;

use log::{debug, info};
use nalgebra::{vector, Vector3};
use obj::{load_obj, Obj};
use show_image::{create_window, event, ImageInfo, ImageView, WindowOptions};

use tiny_rasterizer::camera::{get_model_matrix, get_projection_matrix, get_view_matrix};
use tiny_rasterizer::{
    Buffers, ColBufId, DepthRange, IndBufId, PosBufId, Primitive, RasterError, Rasterizer, ShadeMode,
};

/// Degrees added or removed per rotation key press.
const ROTATION_STEP: f32 = 10.0;

pub struct Params {
    pub width: u32,
    pub height: u32,
    pub angle: f32,
    /// Single frame mode if set: render once, write the image here and return.
    pub output: Option<PathBuf>,
    pub eye_pos: Vector3<f32>,
    pub eye_fov: f32,
    pub depth_range: DepthRange,
    pub shade_mode: ShadeMode,
    pub model_path: Option<PathBuf>,
    pub print_fps: bool,
}

/// Handles of one uploaded mesh.
struct Mesh {
    pos: PosBufId,
    ind: IndBufId,
    col: ColBufId,
}

/// Two overlapping triangles, the first one nearer to the camera.
fn load_builtin_scene(rasterizer: &mut Rasterizer) -> Mesh {
    let positions = [
        vector![2.0, 0.0, -2.0],
        vector![0.0, 2.0, -2.0],
        vector![-2.0, 0.0, -2.0],
        vector![3.5, -1.0, -5.0],
        vector![2.5, 1.5, -5.0],
        vector![-1.0, 0.5, -5.0],
    ];
    let indices = [vector![0, 1, 2], vector![3, 4, 5]];
    let colors = [
        vector![217.0, 238.0, 185.0] / 255.0,
        vector![217.0, 238.0, 185.0] / 255.0,
        vector![217.0, 238.0, 185.0] / 255.0,
        vector![185.0, 217.0, 238.0] / 255.0,
        vector![185.0, 217.0, 238.0] / 255.0,
        vector![185.0, 217.0, 238.0] / 255.0,
    ];

    return Mesh {
        pos: rasterizer.upload_positions(&positions),
        ind: rasterizer.upload_indices(&indices),
        col: rasterizer.upload_colors(&colors),
    };
}

/// Uploads an OBJ mesh, coloring every vertex by its normal.
fn load_obj_mesh(rasterizer: &mut Rasterizer, path: &Path) -> Result<Mesh, Box<dyn Error>> {
    let model: Obj = load_obj(BufReader::new(File::open(path)?))?;
    info!("Number of vertices - {}", model.vertices.len());
    info!("Number of indices  - {}", model.indices.len());

    let positions: Vec<Vector3<f32>> = model
        .vertices
        .iter()
        .map(|v| Vector3::from(v.position))
        .collect();
    let colors: Vec<Vector3<f32>> = model
        .vertices
        .iter()
        .map(|v| Vector3::from(v.normal).add_scalar(1.0) * 0.5)
        .collect();
    let indices: Vec<Vector3<usize>> = model
        .indices
        .chunks_exact(3)
        .map(|face| vector![face[0] as usize, face[1] as usize, face[2] as usize])
        .collect();

    return Ok(Mesh {
        pos: rasterizer.upload_positions(&positions),
        ind: rasterizer.upload_indices(&indices),
        col: rasterizer.upload_colors(&colors),
    });
}

fn render_frame(rasterizer: &mut Rasterizer, mesh: &Mesh, params: &Params, angle: f32) -> Result<(), RasterError> {
    let aspect_ratio = params.width as f32 / params.height as f32;
    let depth_range = params.depth_range;

    rasterizer.clear(Buffers::COLOR | Buffers::DEPTH);
    rasterizer.set_model(get_model_matrix(angle));
    rasterizer.set_view(get_view_matrix(params.eye_pos));
    rasterizer.set_projection(get_projection_matrix(
        params.eye_fov,
        aspect_ratio,
        depth_range.near(),
        depth_range.far(),
    ));
    return rasterizer.draw(mesh.pos, mesh.ind, mesh.col, Primitive::Triangle);
}

/// Key presses the windowed loop reacts to.
enum Command {
    Exit,
    RotateLeft,
    RotateRight,
}

fn to_command(window_event: event::WindowEvent) -> Option<Command> {
    if let event::WindowEvent::KeyboardInput(event) = window_event {
        if !event.input.state.is_released() {
            return None;
        }
        return match event.input.key_code {
            Some(event::VirtualKeyCode::Escape) => Some(Command::Exit),
            Some(event::VirtualKeyCode::A) => Some(Command::RotateLeft),
            Some(event::VirtualKeyCode::D) => Some(Command::RotateRight),
            _ => None,
        };
    }

    return None;
}

/// Renders either a single frame into a file or an interactive window, depending on params.output.
pub fn run(params: Params) -> Result<(), Box<dyn Error>> {
    let mut rasterizer = Rasterizer::new(params.width, params.height)?.with_depth_range(params.depth_range);
    rasterizer.set_shade_mode(params.shade_mode);

    let mesh = match &params.model_path {
        Some(path) => load_obj_mesh(&mut rasterizer, path)?,
        None => load_builtin_scene(&mut rasterizer),
    };

    if let Some(output) = &params.output {
        render_frame(&mut rasterizer, &mesh, &params, params.angle)?;
        image::save_buffer(
            output,
            &rasterizer.to_rgb8(),
            params.width,
            params.height,
            image::ColorType::Rgb8,
        )?;
        info!("Wrote {}", output.display());
        return Ok(());
    }

    let window_options: WindowOptions = WindowOptions {
        size: Some([params.width, params.height]),
        ..Default::default()
    };
    let window = create_window("output", window_options)?;
    let event_channel = window.event_channel()?;

    let mut angle = params.angle;
    let mut frame_counter_time_begin = time::Instant::now();
    let mut frame_counter: u32 = 0;
    loop {
        render_frame(&mut rasterizer, &mesh, &params, angle)?;

        let frame = rasterizer.to_rgb8();
        let image_data = ImageView::new(ImageInfo::rgb8(params.width, params.height), &frame);
        window.set_image("image", image_data)?;

        // Draining everything that has piled up in the event channel.
        let mut exit = false;
        for command in event_channel.try_iter().filter_map(to_command) {
            match command {
                Command::Exit => exit = true,
                Command::RotateLeft => angle += ROTATION_STEP,
                Command::RotateRight => angle -= ROTATION_STEP,
            }
            debug!("angle = {}", angle);
        }
        if exit {
            break;
        }

        if params.print_fps {
            frame_counter += 1;
            if time::Instant::now()
                .duration_since(frame_counter_time_begin)
                .as_secs_f32()
                > 1.0
            {
                info!("FPS --- {}", frame_counter);
                frame_counter_time_begin = time::Instant::now();
                frame_counter = 0;
            }
        }
    }

    return Ok(());
}
