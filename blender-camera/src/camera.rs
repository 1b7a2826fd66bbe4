//! The camera the controller drives

use glam::{Mat4, Vec3};

/// Near clip plane used by [`Camera::projection_matrix`]
pub const NEAR_PLANE: f32 = 0.01;
/// Far clip plane used by [`Camera::projection_matrix`]
pub const FAR_PLANE: f32 = 1000.0;

/// How a camera maps the view volume to the screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Projection {
    #[default]
    Perspective,
    /// `fovy` is read as the height of the view volume in world units
    Orthographic,
}

/// A look-at camera
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    /// Vertical field of view in degrees
    pub fovy: f32,
    pub projection: Projection,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Vec3::splat(10.0),
            target: Vec3::ZERO,
            up: Vec3::Y,
            fovy: 45.0,
            projection: Projection::Perspective,
        }
    }
}

impl Camera {
    pub fn new(position: Vec3, target: Vec3, up: Vec3, fovy: f32) -> Self {
        Self {
            position,
            target,
            up,
            fovy,
            projection: Projection::Perspective,
        }
    }

    /// Distance from target to position
    pub fn distance(&self) -> f32 {
        self.target.distance(self.position)
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, self.up)
    }

    /// OpenGL-style clip space projection for a viewport of the given
    /// width / height ratio
    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        match self.projection {
            Projection::Perspective => {
                Mat4::perspective_rh_gl(self.fovy.to_radians(), aspect, NEAR_PLANE, FAR_PLANE)
            }
            Projection::Orthographic => {
                let top = self.fovy / 2.0;
                let right = top * aspect;
                Mat4::orthographic_rh_gl(-right, right, -top, top, NEAR_PLANE, FAR_PLANE)
            }
        }
    }

    /// `projection * view`
    pub fn view_projection_matrix(&self, aspect: f32) -> Mat4 {
        self.projection_matrix(aspect) * self.view_matrix()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn default_looks_at_origin_from_the_diagonal() {
        let camera = Camera::default();
        assert_eq!(camera.position, Vec3::new(10.0, 10.0, 10.0));
        assert_eq!(camera.target, Vec3::ZERO);
        assert_relative_eq!(camera.distance(), 300.0f32.sqrt());
    }

    #[test]
    fn view_matrix_puts_target_in_front() {
        let camera = Camera::default();
        let target = camera.view_matrix().transform_point3(camera.target);
        assert_relative_eq!(target.x, 0.0, epsilon = 1e-4);
        assert_relative_eq!(target.y, 0.0, epsilon = 1e-4);
        assert_relative_eq!(target.z, -camera.distance(), epsilon = 1e-4);
    }

    #[test]
    fn orthographic_height_follows_fovy() {
        let camera = Camera {
            position: Vec3::new(0.0, 0.0, 5.0),
            up: Vec3::Y,
            target: Vec3::ZERO,
            fovy: 4.0,
            projection: Projection::Orthographic,
        };
        let top = camera
            .view_projection_matrix(1.0)
            .project_point3(Vec3::new(0.0, 2.0, 0.0));
        assert_relative_eq!(top.y, 1.0, epsilon = 1e-5);
    }
}
