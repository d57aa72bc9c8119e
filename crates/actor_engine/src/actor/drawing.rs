//! Renderer-facing actor output

use crate::foundation::math::Mat3;
use crate::lifecycle::ActorId;

/// What an actor asks the renderer to draw
#[derive(Debug, Clone, PartialEq)]
pub struct Drawing {
    /// Lower layers are drawn first
    pub layer: i32,
    /// Asset or primitive name understood by the renderer
    pub sprite: String,
}

impl Drawing {
    /// Create a drawing on `layer`
    pub fn new(layer: i32, sprite: impl Into<String>) -> Self {
        Self {
            layer,
            sprite: sprite.into(),
        }
    }
}

/// A drawing placed at its actor's global matrix
#[derive(Debug, Clone, PartialEq)]
pub struct DrawingRepresentation {
    /// Actor that produced the drawing
    pub actor: ActorId,
    /// Global matrix at collection time
    pub transform: Mat3,
    /// Layer and sprite
    pub drawing: Drawing,
}
