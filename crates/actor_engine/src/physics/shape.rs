//! Collision shapes
//!
//! Shapes are stored in the actor's local space and turned into world-space
//! boxes on demand from the actor's global matrix.

use super::aabb::AABB;
use crate::foundation::math::{Mat3, Mat3Ext, Vec2};

/// Collision shape (stored in local space)
#[derive(Debug, Clone, PartialEq)]
pub enum CollisionShape {
    /// Rectangle given by its center and half extents
    Rectangle {
        /// Local center
        center: Vec2,
        /// Half width and half height
        half_extents: Vec2,
    },
    /// Circle, bounded by its transformed square
    Circle {
        /// Local center
        center: Vec2,
        /// Local radius
        radius: f32,
    },
    /// Several shapes; their boxes are emitted in order
    Composite(Vec<CollisionShape>),
}

impl CollisionShape {
    /// Rectangle centered on the origin
    pub fn rect(width: f32, height: f32) -> Self {
        Self::Rectangle {
            center: Vec2::zeros(),
            half_extents: Vec2::new(width * 0.5, height * 0.5),
        }
    }

    /// Rectangle with an offset center
    pub fn rect_at(center: Vec2, width: f32, height: f32) -> Self {
        Self::Rectangle {
            center,
            half_extents: Vec2::new(width * 0.5, height * 0.5),
        }
    }

    /// Circle centered on the origin
    pub fn circle(radius: f32) -> Self {
        Self::Circle {
            center: Vec2::zeros(),
            radius,
        }
    }

    /// Composite of several shapes
    pub fn composite(shapes: Vec<CollisionShape>) -> Self {
        Self::Composite(shapes)
    }

    /// Append this shape's world-space boxes to `out`
    pub fn append_boxes(&self, transform: &Mat3, out: &mut Vec<AABB>) {
        match self {
            Self::Rectangle {
                center,
                half_extents,
            } => out.extend(transformed_box(transform, *center, *half_extents)),
            Self::Circle { center, radius } => {
                out.extend(transformed_box(transform, *center, Vec2::new(*radius, *radius)));
            }
            Self::Composite(shapes) => {
                for shape in shapes {
                    shape.append_boxes(transform, out);
                }
            }
        }
    }

    /// World-space boxes of this shape
    pub fn calc_boxes(&self, transform: &Mat3) -> Vec<AABB> {
        let mut boxes = Vec::new();
        self.append_boxes(transform, &mut boxes);
        boxes
    }
}

/// Box enclosing the four transformed corners of a local rectangle
fn transformed_box(transform: &Mat3, center: Vec2, half: Vec2) -> Option<AABB> {
    let corners = [
        (center.x - half.x, center.y - half.y),
        (center.x + half.x, center.y - half.y),
        (center.x + half.x, center.y + half.y),
        (center.x - half.x, center.y + half.y),
    ];
    AABB::enclosing(corners.iter().map(|&(x, y)| transform.apply_point(x, y)))
}
