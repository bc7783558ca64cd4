use cgmath::{Matrix4, Point3};

use crate::{ray::Ray, EPSILON};

/// An axis-aligned bounding box (AABB) in 3D space.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Aabb {
    pub min: Point3<f32>,
    pub max: Point3<f32>,
}

impl Default for Aabb {
    /// The unit cube centred on the origin, which encloses every built-in shape.
    fn default() -> Self {
        Self::from_center_half_extents(Point3::new(0.0, 0.0, 0.0), [0.5, 0.5, 0.5])
    }
}

impl Aabb {
    /// Creates a new AABB from min and max points.
    pub fn new(min: Point3<f32>, max: Point3<f32>) -> Self {
        Self { min, max }
    }

    /// Creates an AABB from its center and the half size along each axis.
    pub fn from_center_half_extents(center: Point3<f32>, half: [f32; 3]) -> Self {
        Self {
            min: Point3::new(center.x - half[0], center.y - half[1], center.z - half[2]),
            max: Point3::new(center.x + half[0], center.y + half[1], center.z + half[2]),
        }
    }

    /// Creates an AABB that encompasses all the given points.
    /// Returns None if the points slice is empty.
    pub fn from_points(points: &[Point3<f32>]) -> Option<Self> {
        let (first, rest) = points.split_first()?;

        let mut min = *first;
        let mut max = *first;

        for point in rest {
            min.x = min.x.min(point.x);
            min.y = min.y.min(point.y);
            min.z = min.z.min(point.z);

            max.x = max.x.max(point.x);
            max.y = max.y.max(point.y);
            max.z = max.z.max(point.z);
        }

        Some(Self { min, max })
    }

    /// Returns the 8 corner points of the AABB.
    pub fn corners(&self) -> [Point3<f32>; 8] {
        [
            Point3::new(self.min.x, self.min.y, self.min.z),
            Point3::new(self.max.x, self.min.y, self.min.z),
            Point3::new(self.min.x, self.max.y, self.min.z),
            Point3::new(self.max.x, self.max.y, self.min.z),
            Point3::new(self.min.x, self.min.y, self.max.z),
            Point3::new(self.max.x, self.min.y, self.max.z),
            Point3::new(self.min.x, self.max.y, self.max.z),
            Point3::new(self.max.x, self.max.y, self.max.z),
        ]
    }

    /// Transforms the AABB by the given 4x4 transformation matrix.
    /// All 8 corners are transformed and a new axis-aligned box is fitted around them.
    pub fn transform(&self, matrix: &Matrix4<f32>) -> Self {
        let corners = self
            .corners()
            .map(|corner| Point3::from_homogeneous(matrix * corner.to_homogeneous()));

        let mut bounds = Self::new(corners[0], corners[0]);
        for corner in &corners[1..] {
            bounds = bounds.expand(*corner);
        }
        bounds
    }

    /// Tests if a ray intersects this AABB using the slab method.
    ///
    /// For each axis the entry/exit parameters are computed and the three intervals
    /// are intersected. The ray hits when the resulting interval is non-empty and its
    /// near bound is not behind the origin; the near bound is returned. A ray that
    /// starts inside the box has a negative near bound and does not count as a hit.
    pub fn intersects_ray(&self, ray: &Ray) -> Option<f32> {
        let mut tmin = f32::NEG_INFINITY;
        let mut tmax = f32::INFINITY;

        let origin = [ray.origin.x, ray.origin.y, ray.origin.z];
        let direction = [ray.direction.x, ray.direction.y, ray.direction.z];
        let min = [self.min.x, self.min.y, self.min.z];
        let max = [self.max.x, self.max.y, self.max.z];

        for axis in 0..3 {
            if direction[axis].abs() < EPSILON {
                // Ray is parallel to the slab
                if origin[axis] < min[axis] || origin[axis] > max[axis] {
                    return None;
                }
                continue;
            }

            let inv_dir = 1.0 / direction[axis];
            let mut t1 = (min[axis] - origin[axis]) * inv_dir;
            let mut t2 = (max[axis] - origin[axis]) * inv_dir;
            if t1 > t2 {
                std::mem::swap(&mut t1, &mut t2);
            }

            tmin = tmin.max(t1);
            tmax = tmax.min(t2);
            if tmin > tmax {
                return None;
            }
        }

        // Only reachable with every axis parallel when the direction is zero
        if !tmin.is_finite() {
            return None;
        }

        (tmin >= 0.0).then_some(tmin)
    }

    /// Expands the AABB to include the given point.
    pub fn expand(&self, point: Point3<f32>) -> Self {
        Self {
            min: Point3::new(
                self.min.x.min(point.x),
                self.min.y.min(point.y),
                self.min.z.min(point.z),
            ),
            max: Point3::new(
                self.max.x.max(point.x),
                self.max.y.max(point.y),
                self.max.z.max(point.z),
            ),
        }
    }

    /// Merges this AABB with another, returning the bounding box that encompasses both.
    pub fn merge(&self, other: &Aabb) -> Self {
        self.expand(other.min).expand(other.max)
    }

    /// Returns the center point of the AABB.
    pub fn center(&self) -> Point3<f32> {
        Point3::new(
            (self.min.x + self.max.x) / 2.0,
            (self.min.y + self.max.y) / 2.0,
            (self.min.z + self.max.z) / 2.0,
        )
    }

    /// Tests if a point is inside the AABB (inclusive of boundaries).
    pub fn contains_point(&self, point: Point3<f32>) -> bool {
        point.x >= self.min.x && point.x <= self.max.x &&
        point.y >= self.min.y && point.y <= self.max.y &&
        point.z >= self.min.z && point.z <= self.max.z
    }
}
