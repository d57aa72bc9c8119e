//! Foundation module - Core utilities and types
//!
//! This module provides fundamental utilities used throughout the engine:
//! - 2D math types and matrix helpers
//! - Handle arenas
//! - Tick timing
//! - Logging setup

pub mod collections;
pub mod logging;
pub mod math;
pub mod time;
