use log::trace;
use nalgebra::{vector, Vector3};

use super::buffer::FrameBuffer;
use super::triangle::ScreenTriangle;
use super::util::to_frame_color;

/// How a fragment picks its color from the three corner colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShadeMode {
    /// Whole triangle takes the color of its first corner.
    #[default]
    Flat,
    /// Perspective-correct interpolation of the corner colors.
    Gouraud,
}

/// Pixel-aligned inclusive bounding box, already clamped to the frame buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundingBox {
    pub ll: (i32, i32), // lower left corner
    pub ur: (i32, i32), // upper right corner
}

/// Bounding box of the triangle's screen projection, clipped to width x height.
/// None if the box is empty after clipping or a corner is not finite.
pub fn bounding_box(t: &ScreenTriangle, width: u32, height: u32) -> Option<BoundingBox> {
    let p = t.positions();
    if width == 0 || height == 0 || p.iter().any(|v| !(v.x.is_finite() && v.y.is_finite())) {
        return None;
    }
    let x_min = p[0].x.min(p[1].x).min(p[2].x);
    let x_max = p[0].x.max(p[1].x).max(p[2].x);
    let y_min = p[0].y.min(p[1].y).min(p[2].y);
    let y_max = p[0].y.max(p[1].y).max(p[2].y);

    // Clamp in float space, then cast.
    let ll = (
        x_min.floor().max(0.0) as i32,
        y_min.floor().max(0.0) as i32,
    );
    let ur = (
        x_max.min((width - 1) as f32) as i32,
        y_max.min((height - 1) as f32) as i32,
    );
    if x_max < 0.0 || y_max < 0.0 || ll.0 > ur.0 || ll.1 > ur.1 {
        return None;
    }
    return Some(BoundingBox { ll, ur });
}

/// Edge function of (x, y) against the edge p2 -> p3.
fn edge(x: f32, y: f32, p2: Vector3<f32>, p3: Vector3<f32>) -> f32 {
    return (x - p3.x) * (p2.y - p3.y) - (p2.x - p3.x) * (y - p3.y);
}

/// Checks that (x, y) is on the same side of all three edges. Points on an edge count as inside.
pub fn inside_triangle(x: f32, y: f32, v: &[Vector3<f32>; 3]) -> bool {
    let d1 = edge(x, y, v[0], v[1]);
    let d2 = edge(x, y, v[1], v[2]);
    let d3 = edge(x, y, v[2], v[0]);

    let has_pos = d1 > 0.0 || d2 > 0.0 || d3 > 0.0;
    let has_neg = d1 < 0.0 || d2 < 0.0 || d3 < 0.0;
    return !(has_pos && has_neg);
}

/// Barycentric coordinates of (x, y) from the 2D screen positions.
/// None for a degenerate triangle, where the area ratios are not finite.
pub fn barycentric(x: f32, y: f32, v: &[Vector3<f32>; 3]) -> Option<Vector3<f32>> {
    // Twice the signed area of the triangle spanned by (x, y), a and b.
    fn area(x: f32, y: f32, a: Vector3<f32>, b: Vector3<f32>) -> f32 {
        return x * (a.y - b.y) + (b.x - a.x) * y + a.x * b.y - b.x * a.y;
    }

    let c1 = area(x, y, v[1], v[2]) / area(v[0].x, v[0].y, v[1], v[2]);
    let c2 = area(x, y, v[2], v[0]) / area(v[1].x, v[1].y, v[2], v[0]);
    let c3 = area(x, y, v[0], v[1]) / area(v[2].x, v[2].y, v[0], v[1]);
    if !(c1.is_finite() && c2.is_finite() && c3.is_finite()) {
        return None;
    }
    return Some(vector![c1, c2, c3]);
}

/// Scan converts one screen-space triangle into the frame buffer with a z-buffer test.
/// Returns the number of pixels that passed the depth test.
pub fn rasterize(buffer: &mut FrameBuffer, t: &ScreenTriangle, shade_mode: ShadeMode) -> usize {
    let bbox = match bounding_box(t, buffer.width(), buffer.height()) {
        Some(bbox) => bbox,
        None => {
            trace!("triangle {:?} misses the frame buffer", t.positions());
            return 0;
        }
    };

    let v = t.positions();
    // Depth and colors are interpolated with 1/w weights.
    let w_inv = vector![1.0 / t.v[0].w, 1.0 / t.v[1].w, 1.0 / t.v[2].w];
    let z = vector![v[0].z, v[1].z, v[2].z];

    let mut written = 0;
    for x in bbox.ll.0..=bbox.ur.0 {
        for y in bbox.ll.1..=bbox.ur.1 {
            let (xf, yf) = (x as f32, y as f32);
            if !inside_triangle(xf, yf, &v) {
                continue;
            }
            let bar_coord = match barycentric(xf, yf, &v) {
                Some(bar_coord) => bar_coord,
                None => continue,
            };

            let weights = bar_coord.component_mul(&w_inv);
            let w_reciprocal = 1.0 / weights.sum();
            let z_interpolated = w_reciprocal * weights.dot(&z);
            if !z_interpolated.is_finite() {
                continue;
            }

            let color = match shade_mode {
                ShadeMode::Flat => t.v[0].color,
                ShadeMode::Gouraud => {
                    w_reciprocal
                        * (weights.x * t.v[0].color + weights.y * t.v[1].color + weights.z * t.v[2].color)
                }
            };

            let index = buffer.get_index(x as u32, y as u32);
            if buffer.test_and_set(index, -z_interpolated, to_frame_color(color)) {
                written += 1;
            }
        }
    }
    return written;
}
