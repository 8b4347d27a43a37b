//! Helpers building the model, view and projection matrices fed into the rasterizer.
//!
//! The camera looks down -z. Note that the projection keeps w = z, so for points in front
//! of the camera w is negative; the division flips x and y consistently for every vertex.

use nalgebra::{matrix, Matrix4, Vector3};

/// Rotation around the z axis by an angle in degrees.
pub fn get_model_matrix(rotation_angle: f32) -> Matrix4<f32> {
    let (sin, cos) = rotation_angle.to_radians().sin_cos();
    return matrix![cos, -sin, 0.0, 0.0;
                   sin,  cos, 0.0, 0.0;
                   0.0,  0.0, 1.0, 0.0;
                   0.0,  0.0, 0.0, 1.0];
}

/// Moves the eye position to the origin.
pub fn get_view_matrix(eye_pos: Vector3<f32>) -> Matrix4<f32> {
    return matrix![1.0, 0.0, 0.0, -eye_pos.x;
                   0.0, 1.0, 0.0, -eye_pos.y;
                   0.0, 0.0, 1.0, -eye_pos.z;
                   0.0, 0.0, 0.0, 1.0];
}

/// Perspective projection as a squish into a box followed by an orthographic projection.
/// eye_fov is the vertical field of view in degrees, z_near and z_far are plane distances.
pub fn get_projection_matrix(eye_fov: f32, aspect_ratio: f32, z_near: f32, z_far: f32) -> Matrix4<f32> {
    // Perspective frustum to box.
    let persp_to_ortho = matrix![z_near, 0.0,    0.0,            0.0;
                                 0.0,    z_near, 0.0,            0.0;
                                 0.0,    0.0,    z_near + z_far, -z_near * z_far;
                                 0.0,    0.0,    1.0,            0.0];

    // Box center to origin.
    let shift = matrix![1.0, 0.0, 0.0, 0.0;
                        0.0, 1.0, 0.0, 0.0;
                        0.0, 0.0, 1.0, -(z_near + z_far) / 2.0;
                        0.0, 0.0, 0.0, 1.0];

    // Box to the [-1, 1] cube.
    let height = 2.0 * z_near * (eye_fov.to_radians() / 2.0).tan();
    let width = height * aspect_ratio;
    let scale = matrix![2.0 / width, 0.0,          0.0,                    0.0;
                        0.0,         2.0 / height, 0.0,                    0.0;
                        0.0,         0.0,          2.0 / (z_far - z_near), 0.0;
                        0.0,         0.0,          0.0,                    1.0];

    return scale * shift * persp_to_ortho;
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::{vector, Vector4};

    const EPS: f32 = 1e-5;

    #[test]
    fn quarter_turn_maps_x_onto_y() {
        let v = get_model_matrix(90.0) * vector![1.0, 0.0, 0.0, 1.0];
        assert!((v - vector![0.0, 1.0, 0.0, 1.0]).norm() < EPS);
    }

    #[test]
    fn view_moves_eye_to_origin() {
        let eye = vector![1.0, -2.0, 5.0];
        let v = get_view_matrix(eye) * vector![eye.x, eye.y, eye.z, 1.0];
        assert_eq!(v, vector![0.0, 0.0, 0.0, 1.0]);
    }

    fn project(m: &Matrix4<f32>, p: Vector4<f32>) -> Vector4<f32> {
        let clip = m * p;
        return clip / clip.w;
    }

    #[test]
    fn projection_centers_optical_axis() {
        let m = get_projection_matrix(45.0, 1.0, 0.1, 50.0);
        let p = project(&m, vector![0.0, 0.0, -7.0, 1.0]);
        assert!(p.x.abs() < EPS && p.y.abs() < EPS);
    }

    #[test]
    fn projection_orders_nearer_points_higher() {
        let m = get_projection_matrix(45.0, 1.0, 0.1, 50.0);
        let near = project(&m, vector![0.0, 0.0, -2.0, 1.0]);
        let far = project(&m, vector![0.0, 0.0, -5.0, 1.0]);
        assert!(near.z > far.z);
    }

    #[test]
    fn projection_keeps_w_equal_to_z() {
        let m = get_projection_matrix(60.0, 1.5, 0.1, 50.0);
        let clip = m * vector![0.3, -0.2, -4.0, 1.0];
        assert!((clip.w + 4.0).abs() < EPS);
    }
}
