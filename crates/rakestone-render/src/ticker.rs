//! Fixed-rate frame clock.

use crate::SceneError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Frame clock settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TickerConfig {
    /// Frames per second.
    pub fps: u32,
}

impl Default for TickerConfig {
    fn default() -> Self {
        Self { fps: 60 }
    }
}

/// Turns elapsed wall time into whole frame ticks.
#[derive(Debug, Clone)]
pub struct Ticker {
    interval: Duration,
    accumulated: Duration,
}

impl Ticker {
    pub fn new(config: TickerConfig) -> Result<Self, SceneError> {
        if config.fps == 0 {
            return Err(SceneError::InvalidFrameRate(config.fps));
        }
        Ok(Self {
            interval: Duration::from_secs(1) / config.fps,
            accumulated: Duration::ZERO,
        })
    }

    /// Time between frames.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Account for `elapsed` time and return how many frames are due.
    pub fn advance(&mut self, elapsed: Duration) -> u32 {
        self.accumulated += elapsed;
        let mut ticks = 0;
        while self.accumulated >= self.interval {
            self.accumulated -= self.interval;
            ticks += 1;
        }
        ticks
    }
}
