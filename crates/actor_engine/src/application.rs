//! Application trait and lifecycle management

use crate::engine::Engine;
use crate::error::EngineError;
use thiserror::Error;

/// Application lifecycle trait
///
/// Implement this trait to drive worlds with [`Engine::run`].
pub trait Application {
    /// Initialize the application
    ///
    /// Called once after the engine is created. Create worlds and spawn the
    /// initial actors here.
    fn initialize(&mut self, engine: &mut Engine) -> Result<(), AppError>;

    /// Update the application
    ///
    /// Called every frame before the worlds tick. Feed input or spawn
    /// actors from outside the simulation here.
    ///
    /// # Arguments
    /// * `engine` - Mutable reference to the engine
    /// * `delta_time` - Frame delta in seconds
    fn update(&mut self, engine: &mut Engine, delta_time: f32) -> Result<(), AppError>;

    /// Cleanup the application
    ///
    /// Called once when the loop ends.
    fn cleanup(&mut self, engine: &mut Engine);
}

/// Application-level errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Engine error propagated to application level
    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),

    /// Custom application error
    #[error("Application error: {0}")]
    Custom(String),

    /// Game logic error
    #[error("Game logic error: {0}")]
    GameLogic(String),
}
