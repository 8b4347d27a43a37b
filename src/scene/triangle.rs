use nalgebra::{Matrix4, Vector3, Vector4};

use super::util::{hom_divide, to_hom_point};
use crate::error::RasterError;

/// Near and far planes used when remapping NDC depth into the depth range.
///
/// Must agree with the planes the projection matrix was built with, otherwise depth
/// ordering silently breaks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DepthRange {
    near: f32,
    far: f32,
}

impl DepthRange {
    pub fn new(near: f32, far: f32) -> Result<Self, RasterError> {
        if !(near.is_finite() && far.is_finite() && near < far) {
            return Err(RasterError::InvalidDepthRange { near, far });
        }
        return Ok(Self { near, far });
    }

    pub fn near(&self) -> f32 {
        return self.near;
    }

    pub fn far(&self) -> f32 {
        return self.far;
    }

    /// Maps z from [-1, 1] onto [near, far].
    pub fn remap(&self, z: f32) -> f32 {
        let f1 = (self.far - self.near) / 2.0;
        let f2 = (self.far + self.near) / 2.0;
        return z * f1 + f2;
    }
}

impl Default for DepthRange {
    fn default() -> Self {
        return Self { near: 0.1, far: 50.0 };
    }
}

/// Viewport transformation from normalized device coordinates to pixel coordinates.
#[derive(Debug, Clone, Copy)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
    pub depth_range: DepthRange,
}

impl Viewport {
    pub fn to_screen(&self, ndc: Vector4<f32>) -> Vector3<f32> {
        return Vector3::new(
            0.5 * self.width as f32 * (ndc.x + 1.0),
            0.5 * self.height as f32 * (ndc.y + 1.0),
            self.depth_range.remap(ndc.z),
        );
    }
}

/// Triangle corner after the whole vertex pipeline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenVertex {
    /// x, y in pixels, z in the depth range.
    pub position: Vector3<f32>,
    /// Clip-space w before the homogeneous division, kept for perspective correction.
    pub w: f32,
    /// Normalized color.
    pub color: Vector3<f32>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenTriangle {
    pub v: [ScreenVertex; 3],
}

impl ScreenTriangle {
    /// Screen positions of the corners.
    pub fn positions(&self) -> [Vector3<f32>; 3] {
        return [self.v[0].position, self.v[1].position, self.v[2].position];
    }
}

/// Runs three object-space corners through the mvp transform, homogeneous division
/// and the viewport mapping, attaching one color per corner.
pub fn assemble(
    mvp: &Matrix4<f32>,
    viewport: &Viewport,
    positions: [Vector3<f32>; 3],
    colors: [Vector3<f32>; 3],
) -> ScreenTriangle {
    let assemble_vertex = |position: Vector3<f32>, color: Vector3<f32>| {
        let clip = mvp * to_hom_point(position);
        let ndc = hom_divide(clip);
        return ScreenVertex {
            position: viewport.to_screen(ndc),
            w: clip.w,
            color,
        };
    };

    return ScreenTriangle {
        v: [
            assemble_vertex(positions[0], colors[0]),
            assemble_vertex(positions[1], colors[1]),
            assemble_vertex(positions[2], colors[2]),
        ],
    };
}
