//! Replaying scripts against a rake.

use crate::script::{Script, ScriptStep};
use crate::{AppError, read_file};
use kurbo::Point;
use rakestone_core::{RakeConfig, RakeView, StageEvent, StoneId};
use rakestone_render::{NodeSnapshot, SceneEngine, Ticker, TickerConfig};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Upper bound on frames spent waiting for animations to finish.
const MAX_SETTLE_FRAMES: u32 = 600;

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub rake: RakeConfig,
    pub ticker: TickerConfig,
}

impl AppConfig {
    pub fn from_json(json: &str) -> Result<Self, AppError> {
        let config: Self = serde_json::from_str(json)?;
        config.rake.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, AppError> {
        Self::from_json(&read_file(path.as_ref())?)
    }
}

/// Where one stone ended up.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoneReport {
    pub stone: StoneId,
    pub position: Point,
}

/// Outcome of a session.
#[derive(Debug, Clone, Serialize)]
pub struct SessionReport {
    pub stones: Vec<StoneReport>,
    pub frames_rendered: u64,
    pub scene: NodeSnapshot,
}

/// A rendered rake plus the clock driving its engine.
pub struct Session {
    view: RakeView<SceneEngine>,
    ticker: Ticker,
}

impl Session {
    pub fn new(config: AppConfig) -> Result<Self, AppError> {
        let ticker = Ticker::new(config.ticker)?;
        let mut view = RakeView::new(config.rake, SceneEngine::new());
        view.render();
        Ok(Self { view, ticker })
    }

    pub fn view(&self) -> &RakeView<SceneEngine> {
        &self.view
    }

    /// Replay every step, then let animations finish.
    pub fn run(&mut self, script: &Script) -> Result<(), AppError> {
        for step in &script.steps {
            log::debug!("Step {:?}", step);
            self.step(step)?;
        }
        let interval = self.ticker.interval();
        let ticks = self
            .view
            .engine_mut()
            .run_until_idle(interval, MAX_SETTLE_FRAMES);
        log::info!("Session settled after {} extra frame(s)", ticks);
        Ok(())
    }

    fn step(&mut self, step: &ScriptStep) -> Result<(), AppError> {
        match *step {
            ScriptStep::Click { x, y } => {
                let stage = Point::new(x, y);
                match self.view.engine().hit_test(stage) {
                    Some(target) => {
                        self.view.enqueue(StageEvent::Click { target, stage });
                    }
                    None => log::warn!("Click at ({x}, {y}) hit nothing"),
                }
            }
            ScriptStep::Drag { from, to, steps } => {
                let Some(target) = self.view.engine().hit_test(from) else {
                    log::warn!("Drag from ({}, {}) hit nothing", from.x, from.y);
                    return Ok(());
                };
                self.view.enqueue(StageEvent::MouseOver { target });
                self.view.enqueue(StageEvent::MouseDown { target, stage: from });
                let steps = steps.max(1);
                for i in 1..=steps {
                    let stage = from.lerp(to, f64::from(i) / f64::from(steps));
                    self.view.enqueue(StageEvent::PressMove { target, stage });
                }
                self.view.enqueue(StageEvent::PressUp { target, stage: to });
            }
            ScriptStep::Wait { ms } => {
                self.advance(Duration::from_millis(ms));
                return Ok(());
            }
            ScriptStep::Remove { index } => match self.view.collection().get(index).map(|s| s.id()) {
                Some(id) => {
                    self.view.remove_stone(id);
                }
                None => log::warn!("No stone at index {index}"),
            },
            ScriptStep::Reset => self.view.reset_stones(Vec::new()),
        }

        self.view.pump()?;
        let interval = self.ticker.interval();
        self.advance(interval);
        Ok(())
    }

    fn advance(&mut self, elapsed: Duration) {
        let interval = self.ticker.interval();
        for _ in 0..self.ticker.advance(elapsed) {
            self.view.engine_mut().tick(interval);
        }
    }

    pub fn report(&self) -> Result<SessionReport, AppError> {
        let engine = self.view.engine();
        let stones = self
            .view
            .tokens()
            .iter()
            .map(|token| -> Result<StoneReport, AppError> {
                Ok(StoneReport {
                    stone: token.stone(),
                    position: engine.resting_position(token.drawable())?,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(SessionReport {
            stones,
            frames_rendered: engine.frames_rendered(),
            scene: engine.describe()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_demo_session() {
        let mut session = Session::new(AppConfig::default()).unwrap();
        session.run(&Script::demo()).unwrap();

        let report = session.report().unwrap();
        assert_eq!(report.stones.len(), 2);
        assert_eq!(report.stones[0].position, Point::new(10.0, 400.0));
        assert_eq!(report.stones[1].position, Point::new(260.0, 400.0));
        assert!(report.frames_rendered > 0);
        assert!(!session.view().engine().is_animating());
    }

    #[test]
    fn test_remove_and_reset_steps() {
        let mut session = Session::new(AppConfig::default()).unwrap();
        let script = Script {
            steps: vec![
                ScriptStep::Click { x: 100.0, y: 500.0 },
                ScriptStep::Click { x: 100.0, y: 500.0 },
                ScriptStep::Remove { index: 0 },
                ScriptStep::Remove { index: 5 },
            ],
        };
        session.run(&script).unwrap();
        assert_eq!(session.view().tokens().len(), 1);

        session
            .run(&Script {
                steps: vec![ScriptStep::Reset],
            })
            .unwrap();
        assert!(session.view().tokens().is_empty());
    }

    #[test]
    fn test_click_on_empty_canvas_is_skipped() {
        let mut session = Session::new(AppConfig::default()).unwrap();
        session
            .run(&Script {
                steps: vec![ScriptStep::Click { x: 1.0, y: 1.0 }],
            })
            .unwrap();
        assert!(session.view().collection().is_empty());
    }

    #[test]
    fn test_config_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{ "rake": {{ "snap_animation": null }}, "ticker": {{ "fps": 30 }} }}"#
        )
        .unwrap();

        let config = AppConfig::load(file.path()).unwrap();
        assert!(config.rake.snap_animation.is_none());
        assert_eq!(config.ticker.fps, 30);
    }

    #[test]
    fn test_zero_fps_rejected() {
        let config = AppConfig {
            ticker: TickerConfig { fps: 0 },
            ..AppConfig::default()
        };
        assert!(matches!(Session::new(config), Err(AppError::Scene(_))));
    }
}
