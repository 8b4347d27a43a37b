use nalgebra as na;
use na::{vector, Vector3, Vector4};

/// Transformation of a point to homogenous coordinates.
pub fn to_hom_point(v: Vector3<f32>) -> Vector4<f32> {
    return vector![v.x, v.y, v.z, 1.0];
}

/// Homogeneous division of all four components, w included.
/// No guard against w == 0, the result is then non-finite.
pub fn hom_divide(v: Vector4<f32>) -> Vector4<f32> {
    return v / v.w;
}

/// Scales a normalized color to the 0..255 range stored in the frame buffer.
pub fn to_frame_color(color: Vector3<f32>) -> Vector3<f32> {
    return 255.0 * color;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hom_divide_normalizes_w() {
        let v = hom_divide(vector![2.0, 4.0, -6.0, 2.0]);
        assert_eq!(v, vector![1.0, 2.0, -3.0, 1.0]);
    }

    #[test]
    fn point_gets_unit_w() {
        assert_eq!(to_hom_point(vector![1.0, 2.0, 3.0]).w, 1.0);
    }
}
