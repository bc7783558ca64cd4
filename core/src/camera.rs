use cgmath::SquareMatrix;
use thiserror::Error;

use crate::common::{Ray, RayError, EPSILON};
use crate::config::ViewerConfig;

/// Window depth of the near end of a picking ray.
pub const RAY_NEAR_DEPTH: f32 = 0.001;
/// Window depth of the far end of a picking ray.
pub const RAY_FAR_DEPTH: f32 = 0.999;

#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum CameraError {
    #[error("viewport {width}x{height} has no area")]
    EmptyViewport { width: u32, height: u32 },
    #[error("projection matrix is not invertible")]
    SingularProjection,
    #[error("unprojected point lies at infinity")]
    PointAtInfinity,
    #[error("degenerate picking ray: {0}")]
    DegenerateRay(#[from] RayError),
}

/// A perspective camera looking down -z from a fixed eye distance.
///
/// The projection folds in the eye translation, so points unprojected through
/// it land in view space: the frame the scene is drawn in before the
/// trackball and pan transforms are applied.
///
/// # Example
///
/// ```
/// use modeller::Camera;
///
/// let camera = Camera {
///     width: 640,
///     height: 480,
///     fovy: 70.0,
///     znear: 0.1,
///     zfar: 1000.0,
///     eye_distance: 15.0,
/// };
/// let ray = camera.generate_ray(320.0, 240.0).unwrap();
/// assert!(ray.direction.z < 0.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    /// Viewport width in pixels.
    pub width: u32,
    /// Viewport height in pixels.
    pub height: u32,
    /// Vertical field of view in degrees.
    pub fovy: f32,
    /// Distance to the near clipping plane.
    pub znear: f32,
    /// Distance to the far clipping plane.
    pub zfar: f32,
    /// How far the eye sits back from the view-space origin along +z.
    pub eye_distance: f32,
}

impl Camera {
    pub fn from_config(config: &ViewerConfig) -> Self {
        Self {
            width: config.width,
            height: config.height,
            fovy: config.fovy,
            znear: config.znear,
            zfar: config.zfar,
            eye_distance: config.eye_distance,
        }
    }

    /// Width over height; a collapsed viewport reports 1 so the projection stays valid.
    pub fn aspect(&self) -> f32 {
        if self.width == 0 || self.height == 0 {
            return 1.0;
        }
        self.width as f32 / self.height as f32
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }

    /// Perspective projection followed by the translation of the eye.
    pub fn projection_matrix(&self) -> cgmath::Matrix4<f32> {
        let perspective = cgmath::perspective(cgmath::Deg(self.fovy), self.aspect(), self.znear, self.zfar);
        perspective * cgmath::Matrix4::from_translation(cgmath::Vector3::new(0.0, 0.0, -self.eye_distance))
    }

    fn check_viewport(&self) -> Result<(), CameraError> {
        if self.width == 0 || self.height == 0 {
            return Err(CameraError::EmptyViewport {
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }

    /// Projects a view-space point to window coordinates.
    ///
    /// Returns x and y in pixels with the origin at the bottom-left, and z as
    /// window depth in [0, 1].
    pub fn project_point(&self, view_point: cgmath::Point3<f32>) -> cgmath::Point3<f32> {
        let ndc = cgmath::Point3::from_homogeneous(self.projection_matrix() * view_point.to_homogeneous());
        cgmath::Point3::new(
            (ndc.x + 1.0) * 0.5 * self.width as f32,
            (ndc.y + 1.0) * 0.5 * self.height as f32,
            (ndc.z + 1.0) * 0.5,
        )
    }

    /// Unprojects a window position to view space.
    ///
    /// `x` and `y` are pixels with the origin at the bottom-left; `depth` is
    /// window depth in [0, 1] (near to far).
    pub fn unproject(&self, x: f32, y: f32, depth: f32) -> Result<cgmath::Point3<f32>, CameraError> {
        self.check_viewport()?;

        let inverse = self
            .projection_matrix()
            .invert()
            .ok_or(CameraError::SingularProjection)?;

        let ndc = cgmath::Vector4::new(
            2.0 * x / self.width as f32 - 1.0,
            2.0 * y / self.height as f32 - 1.0,
            2.0 * depth - 1.0,
            1.0,
        );
        let homogeneous = inverse * ndc;
        if homogeneous.w.abs() < EPSILON {
            return Err(CameraError::PointAtInfinity);
        }

        Ok(cgmath::Point3::from_homogeneous(homogeneous))
    }

    /// Generates the view-space picking ray through a window position.
    ///
    /// The ray starts on the near end of the pixel's frustum line and points
    /// towards the far end.
    pub fn generate_ray(&self, x: f32, y: f32) -> Result<Ray, CameraError> {
        let start = self.unproject(x, y, RAY_NEAR_DEPTH)?;
        let end = self.unproject(x, y, RAY_FAR_DEPTH)?;

        Ray::between(start, end).map_err(|err| {
            log::warn!("cannot build a picking ray through ({}, {}): {}", x, y, err);
            CameraError::from(err)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::{InnerSpace, Point3};

    fn test_camera() -> Camera {
        Camera::from_config(&ViewerConfig::default())
    }

    #[test]
    fn test_camera_from_default_config() {
        let camera = test_camera();
        assert_eq!((camera.width, camera.height), (640, 480));
        assert_eq!(camera.fovy, 70.0);
        assert_eq!(camera.eye_distance, 15.0);
        assert!((camera.aspect() - 640.0 / 480.0).abs() < EPSILON);
    }

    #[test]
    fn test_center_ray_points_down_view_axis() {
        let camera = test_camera();
        let ray = camera.generate_ray(320.0, 240.0).unwrap();

        assert!(ray.direction.x.abs() < 1e-4);
        assert!(ray.direction.y.abs() < 1e-4);
        assert!((ray.direction.z - -1.0).abs() < 1e-4);
        assert!((ray.direction.magnitude() - 1.0).abs() < 1e-5);

        // The eye sits at +eye_distance, the ray starts just in front of it
        assert!(ray.origin.z < camera.eye_distance);
        assert!(ray.origin.z > camera.eye_distance - 1.0);
    }

    #[test]
    fn test_ray_through_projected_point_hits_it() {
        let camera = test_camera();
        let target = Point3::new(2.0, -1.0, 2.0);
        let window = camera.project_point(target);

        let ray = camera.generate_ray(window.x, window.y).unwrap();
        let to_target = target - ray.origin;
        let along = to_target.dot(ray.direction);
        let closest = ray.point_at(along);

        assert!((closest - target).magnitude() < 1e-2);
    }

    #[test]
    fn test_ray_top_of_window_points_up() {
        let camera = test_camera();
        let ray = camera.generate_ray(320.0, 480.0).unwrap();

        // Half the vertical field of view above the axis
        let angle = ray.direction.y.atan2(-ray.direction.z).to_degrees();
        assert!((angle - 35.0).abs() < 0.05);
    }

    #[test]
    fn test_unproject_depth_ends() {
        let camera = test_camera();
        let near = camera.unproject(320.0, 240.0, 0.0).unwrap();
        let far = camera.unproject(320.0, 240.0, 1.0).unwrap();

        assert!((near.z - (camera.eye_distance - camera.znear)).abs() < 1e-3);
        // Far plane depth loses precision in f32; it only needs to be far away
        assert!(far.z < -100.0);
    }

    #[test]
    fn test_empty_viewport_is_an_error() {
        let mut camera = test_camera();
        camera.resize(0, 480);

        assert_eq!(
            camera.generate_ray(0.0, 0.0),
            Err(CameraError::EmptyViewport { width: 0, height: 480 })
        );
    }

    #[test]
    fn test_resize_changes_aspect() {
        let mut camera = test_camera();
        camera.resize(800, 800);
        assert!((camera.aspect() - 1.0).abs() < EPSILON);
    }
}
