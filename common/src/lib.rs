mod aabb;
mod color;
mod ray;

pub use aabb::Aabb;
pub use color::{palette_color, step_color_index, RgbaColor, MAX_COLOR, MIN_COLOR, PALETTE};
pub use ray::{Ray, RayError};

/// Tolerance used for parallel-ray and degenerate-length checks.
pub const EPSILON: f32 = 1e-6;
