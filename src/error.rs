use thiserror::Error;

use crate::scene::resources::BufferKind;

/// Everything that can go wrong while setting up a rasterizer or submitting a draw call.
#[derive(Debug, Error, PartialEq)]
pub enum RasterError {
    #[error("render target must have positive dimensions, got {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },
    #[error("no {kind} buffer with id {id}")]
    InvalidHandle { kind: BufferKind, id: usize },
    #[error("triangle {triangle} references vertex {index}, but the {kind} buffer holds {len} entries")]
    IndexOutOfRange {
        triangle: usize,
        index: usize,
        kind: BufferKind,
        len: usize,
    },
    #[error("depth range must satisfy near < far, got near = {near}, far = {far}")]
    InvalidDepthRange { near: f32, far: f32 },
}
