//! Rakestone Application
//!
//! Drives a rake over the headless scene engine from a scripted pointer
//! session and reports where every stone ended up.

mod script;
mod session;

pub use script::{Script, ScriptStep};
pub use session::{AppConfig, Session, SessionReport, StoneReport};

use rakestone_core::{ConfigError, ViewError};
use rakestone_render::SceneError;
use thiserror::Error;

/// Application errors.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Malformed JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Scene(#[from] SceneError),
    #[error(transparent)]
    View(#[from] ViewError),
}

pub(crate) fn read_file(path: &std::path::Path) -> Result<String, AppError> {
    std::fs::read_to_string(path).map_err(|source| AppError::Io {
        path: path.display().to_string(),
        source,
    })
}
