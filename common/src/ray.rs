use cgmath::{InnerSpace, Matrix4, Point3, Vector3};
use thiserror::Error;

use crate::EPSILON;

/// Errors raised while building a ray.
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum RayError {
    #[error("ray direction has zero length")]
    DegenerateDirection,
    #[error("ray has non-finite components")]
    NonFinite,
}

/// A ray in 3D space, defined by an origin point and a direction vector.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    pub origin: Point3<f32>,
    pub direction: Vector3<f32>,
}

impl Ray {
    /// Creates a new ray with the given origin and direction.
    /// The direction is normalized; a zero-length or non-finite direction is rejected
    /// instead of producing a NaN ray.
    pub fn new(origin: Point3<f32>, direction: Vector3<f32>) -> Result<Self, RayError> {
        let finite = [origin.x, origin.y, origin.z, direction.x, direction.y, direction.z]
            .iter()
            .all(|c| c.is_finite());
        if !finite {
            return Err(RayError::NonFinite);
        }

        let length = direction.magnitude();
        if length < EPSILON {
            return Err(RayError::DegenerateDirection);
        }

        Ok(Self {
            origin,
            direction: direction / length,
        })
    }

    /// Creates a ray starting at `from` and pointing towards `to`.
    pub fn between(from: Point3<f32>, to: Point3<f32>) -> Result<Self, RayError> {
        Self::new(from, to - from)
    }

    /// Returns a point along the ray at parameter t.
    /// The point is calculated as: origin + t * direction
    pub fn point_at(&self, t: f32) -> Point3<f32> {
        self.origin + self.direction * t
    }

    /// Transforms the ray by the given 4x4 transformation matrix.
    ///
    /// The direction is left unnormalized so that a parameter `t` names the same
    /// point before and after the transform. Slab distances computed in a node's
    /// local space are therefore distances along the untransformed ray.
    pub fn transform(&self, matrix: &Matrix4<f32>) -> Self {
        // Transform origin as a point (with w=1)
        let origin_homogeneous = matrix * self.origin.to_homogeneous();
        let origin = Point3::from_homogeneous(origin_homogeneous);

        // Transform direction as a vector (with w=0)
        let direction = (matrix * self.direction.extend(0.0)).truncate();

        Self { origin, direction }
    }
}
