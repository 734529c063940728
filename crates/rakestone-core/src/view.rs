//! The rake view: keeps the stage in step with the stone collection.

use crate::collection::{CollectionEvent, StoneCollection};
use crate::config::RakeConfig;
use crate::drag::{DragController, SettleMode, SettleResult};
use crate::engine::{DrawableId, RenderEngine, StageEvent};
use crate::stone::{Stone, StoneId};
use crate::token::VisualToken;
use kurbo::{Point, Rect};
use std::collections::{HashMap, VecDeque};
use thiserror::Error;

/// View errors.
#[derive(Debug, Error, PartialEq)]
pub enum ViewError {
    #[error("Event addressed to unknown drawable {0}")]
    UnknownDrawable(DrawableId),
    #[error("Stone not found: {0}")]
    UnknownStone(StoneId),
}

/// A rake widget bound to a rendering engine.
///
/// Owns the stone collection, one visual token per collection entry, and
/// the drag controller wiring pointer events to those tokens. Collection
/// changes are applied to the stage synchronously: an addition creates a
/// single token, a removal or reset rebuilds the whole rake.
pub struct RakeView<E: RenderEngine> {
    config: RakeConfig,
    engine: E,
    collection: StoneCollection,
    drag: DragController,
    /// Tokens in collection order (not z-order).
    tokens: Vec<VisualToken>,
    rake: Option<DrawableId>,
    container: Option<DrawableId>,
    queue: VecDeque<StageEvent>,
}

impl<E: RenderEngine> RakeView<E> {
    /// Create a view. Nothing is drawn until [`RakeView::render`].
    pub fn new(config: RakeConfig, engine: E) -> Self {
        Self {
            config,
            engine,
            collection: StoneCollection::new(),
            drag: DragController::new(),
            tokens: Vec::new(),
            rake: None,
            container: None,
            queue: VecDeque::new(),
        }
    }

    /// Draw the rake and a token for every stone already present.
    pub fn render(&mut self) {
        self.collection.drain_events();
        self.rebuild();
        log::info!(
            "Rendered rake at ({}, {}) {}x{}",
            self.config.region.x,
            self.config.region.y,
            self.config.region.width,
            self.config.region.height
        );
    }

    pub fn is_rendered(&self) -> bool {
        self.rake.is_some()
    }

    pub fn config(&self) -> &RakeConfig {
        &self.config
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    pub fn into_engine(self) -> E {
        self.engine
    }

    pub fn collection(&self) -> &StoneCollection {
        &self.collection
    }

    pub fn drag_controller(&self) -> &DragController {
        &self.drag
    }

    /// Drawable of the rake rectangle, once rendered.
    pub fn rake_drawable(&self) -> Option<DrawableId> {
        self.rake
    }

    /// Container holding the stone tokens, once rendered.
    pub fn token_container(&self) -> Option<DrawableId> {
        self.container
    }

    /// Tokens in collection order.
    pub fn tokens(&self) -> &[VisualToken] {
        &self.tokens
    }

    /// Token for a drawable.
    pub fn token(&self, drawable: DrawableId) -> Option<&VisualToken> {
        self.tokens.iter().find(|t| t.drawable() == drawable)
    }

    /// First token projecting the given stone.
    pub fn token_for_stone(&self, stone: StoneId) -> Option<&VisualToken> {
        self.tokens.iter().find(|t| t.stone() == stone)
    }

    /// Append a stone to the collection.
    pub fn add_stone(&mut self, stone: Stone) {
        self.collection.add(stone);
        self.sync_collection();
    }

    /// Remove a stone from the collection.
    pub fn remove_stone(&mut self, stone: StoneId) -> Option<Stone> {
        let removed = self.collection.remove(stone);
        self.sync_collection();
        removed
    }

    /// Replace the collection's contents.
    pub fn reset_stones(&mut self, stones: impl IntoIterator<Item = Stone>) {
        self.collection.reset(stones);
        self.sync_collection();
    }

    /// Move a stone's token programmatically, clamped into the rake.
    pub fn move_stone(
        &mut self,
        stone: StoneId,
        position: Point,
        mode: SettleMode,
    ) -> Result<SettleResult, ViewError> {
        let token = self
            .tokens
            .iter_mut()
            .find(|t| t.stone() == stone)
            .ok_or(ViewError::UnknownStone(stone))?;
        Ok(DragController::settle(
            &mut self.engine,
            token,
            position,
            &self.config.region,
            mode,
        ))
    }

    /// Queue an engine event for [`RakeView::pump`].
    pub fn enqueue(&mut self, event: StageEvent) {
        self.queue.push_back(event);
    }

    /// Handle queued events in arrival order.
    ///
    /// Stops at the first failing event, leaving later ones queued.
    pub fn pump(&mut self) -> Result<usize, ViewError> {
        let mut handled = 0;
        while let Some(event) = self.queue.pop_front() {
            self.handle_event(event)?;
            handled += 1;
        }
        Ok(handled)
    }

    /// Handle one engine event.
    pub fn handle_event(&mut self, event: StageEvent) -> Result<(), ViewError> {
        let target = event.target();
        if target == self.engine.stage() {
            return Ok(());
        }
        if Some(target) == self.rake {
            if let StageEvent::Click { .. } = event {
                self.add_stone(Stone::new());
            }
            return Ok(());
        }

        let Some(index) = self.tokens.iter().position(|t| t.drawable() == target) else {
            log::warn!("Dropping {:?}: {} is not part of this rake", event, target);
            return Err(ViewError::UnknownDrawable(target));
        };
        let token = &mut self.tokens[index];

        match event {
            StageEvent::MouseOver { .. } => self.drag.hover(&mut self.engine, token),
            StageEvent::MouseDown { stage, .. } => {
                if let Some(container) = self.container {
                    self.drag.press(&mut self.engine, container, token, stage);
                }
            }
            StageEvent::PressMove { stage, .. } => {
                self.drag.drag(&mut self.engine, token, stage);
            }
            StageEvent::PressUp { stage, .. } => {
                let mode = SettleMode::from(self.config.snap_animation);
                self.drag.release(&mut self.engine, token, stage, &self.config.region, mode);
            }
            StageEvent::PressCancel { .. } => {
                self.drag.cancel(&mut self.engine, token, &self.config.region);
            }
            StageEvent::Click { .. } => {}
        }
        Ok(())
    }

    /// Apply queued collection changes to the stage.
    fn sync_collection(&mut self) {
        let events = self.collection.drain_events();
        if !self.is_rendered() || events.is_empty() {
            return;
        }

        // A rebuild reflects the whole collection, later additions included.
        if events
            .iter()
            .any(|e| matches!(e, CollectionEvent::Removed(_) | CollectionEvent::Reset))
        {
            self.rebuild();
            return;
        }

        for event in events {
            if let CollectionEvent::Added(stone) = event {
                let position = self.config.spawn_point();
                self.build_token(stone.id(), position);
                self.engine.request_redraw();
            }
        }
    }

    /// Tear down the rake and tokens and recreate them from the collection.
    ///
    /// Stones that already had a token keep its position. Tokens caught
    /// mid-drag are settled first, so they come back at rest in the rake.
    fn rebuild(&mut self) {
        let stage = self.engine.stage();
        for token in &mut self.tokens {
            self.drag.cancel(&mut self.engine, token, &self.config.region);
        }
        let mut previous: HashMap<StoneId, VecDeque<Point>> = HashMap::new();
        for token in self.tokens.drain(..) {
            previous.entry(token.stone()).or_default().push_back(token.position);
        }
        if let Some(rake) = self.rake.take() {
            self.engine.remove_child(stage, rake);
        }
        if let Some(container) = self.container.take() {
            self.engine.remove_child(stage, container);
        }

        let rake = self.engine.create_rect(
            self.config.region.as_rect(),
            self.config.rake_stroke.into(),
            self.config.rake_fill.into(),
        );
        self.engine.attach_child(stage, rake);
        let container = self.engine.create_container();
        self.engine.attach_child(stage, container);
        self.rake = Some(rake);
        self.container = Some(container);

        let stones: Vec<StoneId> = self.collection.iter().map(|s| s.id()).collect();
        for stone in stones {
            let position = previous
                .get_mut(&stone)
                .and_then(|positions| positions.pop_front())
                .unwrap_or_else(|| self.config.spawn_point());
            self.build_token(stone, position);
        }
        log::debug!("Rebuilt rake with {} stone(s)", self.tokens.len());
        self.engine.request_redraw();
    }

    fn build_token(&mut self, stone: StoneId, position: Point) {
        let Some(container) = self.container else {
            return;
        };
        let size = self.config.stone_size;
        let drawable = self.engine.create_rect(
            Rect::from_origin_size(Point::ZERO, size),
            self.config.stone_stroke.into(),
            self.config.stone_fill.into(),
        );
        self.engine.set_position(drawable, position);
        self.engine.attach_child(container, drawable);
        self.tokens.push(VisualToken::new(stone, drawable, position, size));
        log::debug!("Added token {} for stone {}", drawable, stone);
    }
}
