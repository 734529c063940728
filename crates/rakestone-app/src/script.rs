//! Scripted pointer sessions.

use crate::{AppError, read_file};
use kurbo::Point;
use serde::{Deserialize, Serialize};
use std::path::Path;

fn default_drag_steps() -> u32 {
    8
}

/// One step of a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScriptStep {
    /// Click whatever is under the point.
    Click { x: f64, y: f64 },
    /// Press at `from`, move to `to` in `steps` moves, release.
    Drag {
        from: Point,
        to: Point,
        #[serde(default = "default_drag_steps")]
        steps: u32,
    },
    /// Let the clock run.
    Wait { ms: u64 },
    /// Remove the stone at a collection index.
    Remove { index: usize },
    /// Empty the rake.
    Reset,
}

/// A list of steps replayed in order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Script {
    pub steps: Vec<ScriptStep>,
}

impl Script {
    pub fn from_json(json: &str) -> Result<Self, AppError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, AppError> {
        Self::from_json(&read_file(path.as_ref())?)
    }

    /// Two stones, one thrown out of the rake.
    pub fn demo() -> Self {
        Self {
            steps: vec![
                ScriptStep::Click { x: 160.0, y: 475.0 },
                ScriptStep::Click { x: 160.0, y: 475.0 },
                ScriptStep::Drag {
                    from: Point::new(35.0, 425.0),
                    to: Point::new(535.0, -75.0),
                    steps: default_drag_steps(),
                },
                ScriptStep::Wait { ms: 200 },
            ],
        }
    }
}
