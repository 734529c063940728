//! Rakestone Core Library
//!
//! Interaction model for a rake of draggable stones: clamping, the stone
//! collection, the drag state machine and the view that keeps a rendering
//! engine in step with the collection.

pub mod collection;
pub mod config;
pub mod drag;
pub mod engine;
pub mod geometry;
pub mod stone;
pub mod token;
pub mod view;

pub use collection::{CollectionEvent, StoneCollection};
pub use config::{ConfigError, RakeConfig, SerializableColor, SnapAnimation};
pub use drag::{DragController, DragSession, DragState, SettleMode, SettleResult};
pub use engine::{Cursor, DrawableId, Easing, RenderEngine, StageEvent};
pub use geometry::{Region, clamp_axis};
pub use stone::{Stone, StoneId};
pub use token::VisualToken;
pub use view::{RakeView, ViewError};
