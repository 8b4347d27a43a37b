//! Rasterizer context: owns the uploaded geometry, the transform state and the raster buffers.

pub mod buffer;
pub mod raster;
pub mod resources;
pub mod triangle;
pub mod util;

use log::debug;
use nalgebra::{Matrix4, Vector3};

use crate::error::RasterError;
use buffer::{Buffers, FrameBuffer};
use raster::ShadeMode;
use resources::{BufferKind, ColBufId, IndBufId, PosBufId, Resources};
use triangle::{DepthRange, Viewport};

/// Primitive topology of a draw call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Primitive {
    Triangle,
}

/// Software rasterizer with a fixed resolution.
///
/// Typical frame: clear(), set the three matrices, draw() every mesh, then read back
/// frame_buffer() or to_rgb8().
pub struct Rasterizer {
    width: u32,
    height: u32,
    resources: Resources,
    model: Matrix4<f32>,
    view: Matrix4<f32>,
    projection: Matrix4<f32>,
    depth_range: DepthRange,
    shade_mode: ShadeMode,
    buffer: FrameBuffer,
}

impl Rasterizer {
    /// Allocates color and depth buffers of width * height pixels.
    pub fn new(width: u32, height: u32) -> Result<Self, RasterError> {
        if width == 0 || height == 0 {
            return Err(RasterError::InvalidDimensions { width, height });
        }
        return Ok(Self {
            width,
            height,
            resources: Resources::new(),
            model: Matrix4::identity(),
            view: Matrix4::identity(),
            projection: Matrix4::identity(),
            depth_range: DepthRange::default(),
            shade_mode: ShadeMode::default(),
            buffer: FrameBuffer::new(width, height),
        });
    }

    /// Near/far planes for the viewport depth remap, should match the projection matrix.
    pub fn with_depth_range(mut self, depth_range: DepthRange) -> Self {
        self.depth_range = depth_range;
        return self;
    }

    pub fn width(&self) -> u32 {
        return self.width;
    }

    pub fn height(&self) -> u32 {
        return self.height;
    }

    pub fn depth_range(&self) -> DepthRange {
        return self.depth_range;
    }

    pub fn upload_positions(&mut self, positions: &[Vector3<f32>]) -> PosBufId {
        return self.resources.upload_positions(positions);
    }

    pub fn upload_indices(&mut self, indices: &[Vector3<usize>]) -> IndBufId {
        return self.resources.upload_indices(indices);
    }

    pub fn upload_colors(&mut self, colors: &[Vector3<f32>]) -> ColBufId {
        return self.resources.upload_colors(colors);
    }

    pub fn set_model(&mut self, m: Matrix4<f32>) {
        self.model = m;
    }

    pub fn set_view(&mut self, v: Matrix4<f32>) {
        self.view = v;
    }

    pub fn set_projection(&mut self, p: Matrix4<f32>) {
        self.projection = p;
    }

    /// Effective transform, model applied first.
    pub fn mvp(&self) -> Matrix4<f32> {
        return self.projection * self.view * self.model;
    }

    pub fn set_shade_mode(&mut self, shade_mode: ShadeMode) {
        self.shade_mode = shade_mode;
    }

    pub fn shade_mode(&self) -> ShadeMode {
        return self.shade_mode;
    }

    /// Draws every triangle of the index buffer into the frame buffer.
    ///
    /// Handles and all indices are checked before the first pixel is written, so a failed
    /// draw leaves the buffers untouched. Vertices with w <= 0 are not clipped.
    pub fn draw(
        &mut self,
        pos_buffer: PosBufId,
        ind_buffer: IndBufId,
        col_buffer: ColBufId,
        primitive: Primitive,
    ) -> Result<(), RasterError> {
        let positions = self.resources.positions(pos_buffer)?;
        let indices = self.resources.indices(ind_buffer)?;
        let colors = self.resources.colors(col_buffer)?;

        for (triangle, ind) in indices.iter().enumerate() {
            for &index in ind.iter() {
                if index >= positions.len() {
                    return Err(RasterError::IndexOutOfRange {
                        triangle,
                        index,
                        kind: BufferKind::Positions,
                        len: positions.len(),
                    });
                }
                if index >= colors.len() {
                    return Err(RasterError::IndexOutOfRange {
                        triangle,
                        index,
                        kind: BufferKind::Colors,
                        len: colors.len(),
                    });
                }
            }
        }

        let mvp = self.mvp();
        let viewport = Viewport {
            width: self.width,
            height: self.height,
            depth_range: self.depth_range,
        };

        let mut written = 0;
        match primitive {
            Primitive::Triangle => {
                for ind in indices {
                    let t = triangle::assemble(
                        &mvp,
                        &viewport,
                        [positions[ind.x], positions[ind.y], positions[ind.z]],
                        [colors[ind.x], colors[ind.y], colors[ind.z]],
                    );
                    written += raster::rasterize(&mut self.buffer, &t, self.shade_mode);
                }
            }
        }
        debug!(
            "draw: {} triangles, {} fragments written ({:?} shading)",
            indices.len(),
            written,
            self.shade_mode
        );
        return Ok(());
    }

    pub fn clear(&mut self, buffers: Buffers) {
        self.buffer.clear(buffers);
    }

    /// Flat buffer offset of pixel (x, y), with row 0 stored last.
    pub fn get_index(&self, x: u32, y: u32) -> usize {
        return self.buffer.get_index(x, y);
    }

    /// Writes a pixel ignoring the depth buffer. Color is expected in the 0..255 range.
    pub fn set_pixel(&mut self, point: Vector3<f32>, color: Vector3<f32>) {
        self.buffer.set_pixel(point, color);
    }

    /// Frame buffer colors in the 0..255 range, first stored row is the top of the image.
    pub fn frame_buffer(&self) -> &[Vector3<f32>] {
        return self.buffer.colors();
    }

    pub fn depth_buffer(&self) -> &[f32] {
        return self.buffer.depths();
    }

    /// Frame buffer packed as rgb8, ready for image encoding or display.
    pub fn to_rgb8(&self) -> Vec<u8> {
        return self.buffer.to_rgb8();
    }
}
