use cgmath::{Matrix4, Rad};

/// Camera-orbit control turning 2D drag deltas into a 3D rotation.
pub trait Trackball {
    /// Applies a drag of `(dx, dy)` pixels that started at `(prev_x, prev_y)`
    /// (bottom-left origin).
    fn drag(&mut self, prev_x: f32, prev_y: f32, dx: f32, dy: f32);

    /// The current rotation as a 4x4 matrix.
    fn matrix(&self) -> Matrix4<f32>;
}

/// Radians of rotation per dragged pixel.
const ORBIT_SENSITIVITY: f32 = 0.005;
/// Just under 90 degrees, so the view never flips over the pole.
const MAX_ELEVATION: f32 = std::f32::consts::FRAC_PI_2 - 0.01;

/// Trackball that orbits with an azimuth around the vertical axis and an
/// elevation around the horizontal one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitTrackball {
    /// Azimuth angle in radians (horizontal rotation around y).
    azimuth: f32,
    /// Elevation angle in radians (tilt around x).
    elevation: f32,
    /// Distance from the eye to the orbit centre.
    distance: f32,
}

impl OrbitTrackball {
    /// Creates a trackball tilted by `theta_degrees` around x. A negative
    /// tilt raises the eye, so the scene is seen from above.
    pub fn new(theta_degrees: f32, distance: f32) -> Self {
        Self {
            azimuth: 0.0,
            elevation: theta_degrees.to_radians().clamp(-MAX_ELEVATION, MAX_ELEVATION),
            distance,
        }
    }

    pub fn azimuth(&self) -> f32 {
        self.azimuth
    }

    pub fn elevation(&self) -> f32 {
        self.elevation
    }

    pub fn distance(&self) -> f32 {
        self.distance
    }
}

impl Trackball for OrbitTrackball {
    fn drag(&mut self, _prev_x: f32, _prev_y: f32, dx: f32, dy: f32) {
        self.azimuth += dx * ORBIT_SENSITIVITY;
        self.elevation = (self.elevation + dy * ORBIT_SENSITIVITY).clamp(-MAX_ELEVATION, MAX_ELEVATION);
    }

    fn matrix(&self) -> Matrix4<f32> {
        Matrix4::from_angle_x(Rad(-self.elevation)) * Matrix4::from_angle_y(Rad(self.azimuth))
    }
}
