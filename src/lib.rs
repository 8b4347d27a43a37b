//! Software triangle rasterizer.
//!
//! Geometry is uploaded into id-indexed tables, transformed by projection * view * model,
//! mapped to the viewport and scan converted into a color buffer with a z-buffer test.
//!
//! ```no_run
//! use nalgebra::{vector, Matrix4};
//! use tiny_rasterizer::{Buffers, Primitive, Rasterizer};
//!
//! let mut r = Rasterizer::new(700, 700)?;
//! let pos = r.upload_positions(&[vector![0.5, 0.0, -0.5], vector![0.0, 0.5, -0.5], vector![-0.5, 0.0, -0.5]]);
//! let ind = r.upload_indices(&[vector![0, 1, 2]]);
//! let col = r.upload_colors(&[vector![1.0, 0.0, 0.0]; 3]);
//!
//! r.clear(Buffers::COLOR | Buffers::DEPTH);
//! r.set_projection(Matrix4::identity());
//! r.draw(pos, ind, col, Primitive::Triangle)?;
//! let rgb = r.to_rgb8();
//! # Ok::<(), tiny_rasterizer::RasterError>(())
//! ```

pub mod camera;
pub mod error;
pub mod scene;

pub use error::RasterError;
pub use scene::buffer::Buffers;
pub use scene::raster::ShadeMode;
pub use scene::resources::{BufferKind, ColBufId, IndBufId, PosBufId};
pub use scene::triangle::DepthRange;
pub use scene::{Primitive, Rasterizer};
