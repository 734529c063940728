//! Widget configuration.

use crate::engine::Easing;
use crate::geometry::Region;
use kurbo::{Point, Size};
use peniko::Color;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Malformed config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Serializable color representation (RGBA8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializableColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    #[serde(default = "opaque")]
    pub a: u8,
}

fn opaque() -> u8 {
    255
}

impl SerializableColor {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn black() -> Self {
        Self::new(0, 0, 0, 255)
    }
}

impl From<Color> for SerializableColor {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self {
            r: rgba.r,
            g: rgba.g,
            b: rgba.b,
            a: rgba.a,
        }
    }
}

impl From<SerializableColor> for Color {
    fn from(color: SerializableColor) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

/// Timed move applied when a released stone has to snap back.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapAnimation {
    pub duration_ms: u64,
    pub easing: Easing,
}

impl Default for SnapAnimation {
    fn default() -> Self {
        Self {
            duration_ms: 100,
            easing: Easing::Linear,
        }
    }
}

impl SnapAnimation {
    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }
}

/// Everything needed to lay out and style one rake widget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RakeConfig {
    /// The rake rectangle in canvas coordinates.
    pub region: Region,
    /// Size of every stone.
    pub stone_size: Size,
    pub rake_stroke: SerializableColor,
    pub rake_fill: SerializableColor,
    pub stone_stroke: SerializableColor,
    pub stone_fill: SerializableColor,
    /// `None` snaps released stones immediately.
    pub snap_animation: Option<SnapAnimation>,
    /// Where new stones appear. Defaults to the rake origin; always clamped.
    pub spawn_position: Option<Point>,
}

impl Default for RakeConfig {
    fn default() -> Self {
        Self {
            region: Region::default(),
            stone_size: Size::new(50.0, 50.0),
            rake_stroke: SerializableColor::black(),
            rake_fill: SerializableColor::new(0xdd, 0xaa, 0xaa, 255),
            stone_stroke: SerializableColor::black(),
            stone_fill: SerializableColor::new(0xdd, 0xdd, 0xdd, 255),
            snap_animation: Some(SnapAnimation::default()),
            spawn_position: None,
        }
    }
}

impl RakeConfig {
    /// Parse and validate a JSON config. Missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Reject values the widget cannot lay out.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let r = &self.region;
        if ![r.x, r.y, r.width, r.height].iter().all(|v| v.is_finite()) {
            return Err(ConfigError::Invalid("region must be finite".to_string()));
        }
        if r.width <= 0.0 || r.height <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "region size must be positive, got {}x{}",
                r.width, r.height
            )));
        }
        let s = self.stone_size;
        if !(s.width.is_finite() && s.height.is_finite()) || s.width <= 0.0 || s.height <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "stone size must be positive, got {}x{}",
                s.width, s.height
            )));
        }
        if let Some(p) = self.spawn_position {
            if !(p.x.is_finite() && p.y.is_finite()) {
                return Err(ConfigError::Invalid("spawn position must be finite".to_string()));
            }
        }
        if !self.region.fits(s) {
            log::warn!(
                "Stone {}x{} does not fit the rake {}x{}; snapping favours the top-left edge",
                s.width,
                s.height,
                r.width,
                r.height
            );
        }
        Ok(())
    }

    /// Position new stones appear at, already inside the rake.
    pub fn spawn_point(&self) -> Point {
        let requested = self.spawn_position.unwrap_or_else(|| self.region.origin());
        self.region.clamp(requested, self.stone_size)
    }
}
