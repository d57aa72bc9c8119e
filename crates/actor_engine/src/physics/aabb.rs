//! Axis-aligned boxes in world space

use crate::foundation::math::{Point2, Vec2};

/// Axis-Aligned Bounding Box
///
/// Boxes are expected to be normalized (`min <= max` on both axes). A
/// malformed box is not rejected; the intersection result for it is
/// whatever the interval comparisons happen to produce.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AABB {
    /// Minimum corner of the bounding box
    pub min: Vec2,
    /// Maximum corner of the bounding box
    pub max: Vec2,
}

impl AABB {
    /// Create a new AABB from min and max points
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Create from `(min_x, min_y, max_x, max_y)`
    pub fn from_bounds(min_x: f32, min_y: f32, max_x: f32, max_y: f32) -> Self {
        Self {
            min: Vec2::new(min_x, min_y),
            max: Vec2::new(max_x, max_y),
        }
    }

    /// Create an AABB centered at a point with given half extents
    pub fn from_center_extents(center: Vec2, extents: Vec2) -> Self {
        Self {
            min: center - extents,
            max: center + extents,
        }
    }

    /// Smallest box containing every point; `None` for an empty iterator
    pub fn enclosing<I: IntoIterator<Item = Point2>>(points: I) -> Option<Self> {
        let mut points = points.into_iter();
        let first = points.next()?;
        let mut min = first.coords;
        let mut max = first.coords;
        for p in points {
            min = min.inf(&p.coords);
            max = max.sup(&p.coords);
        }
        Some(Self { min, max })
    }

    /// Get the center of the AABB
    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    /// Get the extents (half-size) of the AABB
    pub fn extents(&self) -> Vec2 {
        (self.max - self.min) * 0.5
    }

    /// Check if this AABB contains a point (closed interval)
    pub fn contains_point(&self, point: Vec2) -> bool {
        point.x >= self.min.x && point.x <= self.max.x && point.y >= self.min.y && point.y <= self.max.y
    }

    /// Check if this AABB intersects another AABB
    ///
    /// Closed intervals: boxes that only share an edge intersect.
    pub fn intersects(&self, other: &AABB) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
    }
}
