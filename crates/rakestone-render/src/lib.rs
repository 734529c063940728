//! Rakestone Render Library
//!
//! A headless scene engine implementing the core's `RenderEngine`
//! capability: a drawable tree, tweened moves, hit testing and a
//! fixed-rate ticker.

mod scene;
mod ticker;
mod tween;

pub use scene::{NodeKind, NodeSnapshot, SceneEngine};
pub use ticker::{Ticker, TickerConfig};
pub use tween::Tween;

use rakestone_core::DrawableId;
use thiserror::Error;

/// Scene errors.
#[derive(Debug, Error, PartialEq)]
pub enum SceneError {
    #[error("Unknown drawable {0}")]
    UnknownDrawable(DrawableId),
    #[error("Frame rate must be positive, got {0}")]
    InvalidFrameRate(u32),
}
