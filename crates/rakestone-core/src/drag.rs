//! Drag controller: pointer gestures on stone tokens.
//!
//! Each token is either idle or dragging. A token is dragging exactly while
//! the controller holds a [`DragSession`] for its drawable. Releasing the
//! pointer settles the token: the release position is clamped into the rake
//! and applied, animated if it had to move.

use crate::config::SnapAnimation;
use crate::engine::{Cursor, DrawableId, RenderEngine};
use crate::geometry::Region;
use crate::token::VisualToken;
use kurbo::{Point, Vec2};
use std::collections::HashMap;

/// Per-gesture state, alive between pointer-down and pointer-up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragSession {
    /// Token position minus pointer position at drag start.
    pub origin_offset: Vec2,
}

impl DragSession {
    /// Where the token belongs for a given pointer position.
    pub fn follow(&self, pointer: Point) -> Point {
        pointer + self.origin_offset
    }
}

/// Drag state of one token.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragState {
    Idle,
    Dragging(DragSession),
}

/// How a settled position is applied.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SettleMode {
    /// Tween to the snapped position if it differs from the release position.
    Animated(SnapAnimation),
    /// Jump straight to the snapped position.
    Immediate,
}

impl From<Option<SnapAnimation>> for SettleMode {
    fn from(animation: Option<SnapAnimation>) -> Self {
        match animation {
            Some(animation) => SettleMode::Animated(animation),
            None => SettleMode::Immediate,
        }
    }
}

/// Result of settling a token.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SettleResult {
    /// Position the token was released at.
    pub released: Point,
    /// Position it settled to.
    pub point: Point,
    /// Whether the move was handed to the engine as an animation.
    pub animated: bool,
}

impl SettleResult {
    /// Whether the release position had to be corrected.
    pub fn is_snapped(&self) -> bool {
        self.released != self.point
    }
}

/// Tracks drag sessions for every token of a view.
#[derive(Debug, Clone, Default)]
pub struct DragController {
    sessions: HashMap<DrawableId, DragSession>,
}

impl DragController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state of a token.
    pub fn state(&self, token: DrawableId) -> DragState {
        match self.sessions.get(&token) {
            Some(session) => DragState::Dragging(*session),
            None => DragState::Idle,
        }
    }

    pub fn is_dragging(&self, token: DrawableId) -> bool {
        self.sessions.contains_key(&token)
    }

    /// Number of tokens currently being dragged.
    pub fn active_sessions(&self) -> usize {
        self.sessions.len()
    }

    /// Pointer entered a token.
    pub fn hover<E: RenderEngine + ?Sized>(&self, engine: &mut E, token: &VisualToken) {
        engine.set_cursor(token.drawable(), Cursor::Pointer);
    }

    /// Pointer pressed on a token: Idle -> Dragging.
    ///
    /// Captures the grab offset and raises the token above its siblings.
    /// Pressing a token that is already dragging restarts its session.
    ///
    /// The offset is taken from where the engine currently draws the token,
    /// so a token grabbed part way through a snap-back stops where it is.
    pub fn press<E: RenderEngine + ?Sized>(
        &mut self,
        engine: &mut E,
        container: DrawableId,
        token: &mut VisualToken,
        pointer: Point,
    ) -> DragSession {
        let drawn = engine
            .drawn_position(token.drawable())
            .unwrap_or(token.position);
        if drawn != token.position {
            log::debug!(
                "Grabbed {} in flight at ({}, {})",
                token.drawable(),
                drawn.x,
                drawn.y
            );
            token.position = drawn;
            engine.set_position(token.drawable(), drawn);
        }

        let session = DragSession {
            origin_offset: token.position - pointer,
        };
        if self.sessions.insert(token.drawable(), session).is_some() {
            log::debug!("Restarting drag on {}", token.drawable());
        }
        log::debug!(
            "Drag start on {} with offset ({}, {})",
            token.drawable(),
            session.origin_offset.x,
            session.origin_offset.y
        );

        engine.reorder_child_to_top(container, token.drawable());
        engine.request_redraw();
        session
    }

    /// Pointer moved while pressed: the token follows, keeping its offset.
    ///
    /// Returns false if the token is not being dragged.
    pub fn drag<E: RenderEngine + ?Sized>(
        &self,
        engine: &mut E,
        token: &mut VisualToken,
        pointer: Point,
    ) -> bool {
        let Some(session) = self.sessions.get(&token.drawable()) else {
            log::debug!("Ignoring move on idle token {}", token.drawable());
            return false;
        };

        token.position = session.follow(pointer);
        engine.set_position(token.drawable(), token.position);
        engine.request_redraw();
        true
    }

    /// Pointer released: Dragging -> Settling -> Idle.
    ///
    /// Returns `None` and leaves everything untouched if the token was not
    /// being dragged.
    pub fn release<E: RenderEngine + ?Sized>(
        &mut self,
        engine: &mut E,
        token: &mut VisualToken,
        pointer: Point,
        region: &Region,
        mode: SettleMode,
    ) -> Option<SettleResult> {
        let Some(session) = self.sessions.remove(&token.drawable()) else {
            log::debug!("Ignoring release on idle token {}", token.drawable());
            return None;
        };

        let released = session.follow(pointer);
        Some(Self::settle(engine, token, released, region, mode))
    }

    /// The press ended without a release. The token settles in place.
    pub fn cancel<E: RenderEngine + ?Sized>(
        &mut self,
        engine: &mut E,
        token: &mut VisualToken,
        region: &Region,
    ) -> Option<SettleResult> {
        self.sessions.remove(&token.drawable())?;
        log::debug!("Drag cancelled on {}", token.drawable());
        let released = token.position;
        Some(Self::settle(engine, token, released, region, SettleMode::Immediate))
    }

    /// Clamp `released` into the rake and apply it to the token.
    pub fn settle<E: RenderEngine + ?Sized>(
        engine: &mut E,
        token: &mut VisualToken,
        released: Point,
        region: &Region,
        mode: SettleMode,
    ) -> SettleResult {
        let point = region.clamp(released, token.size);
        let animated = match mode {
            SettleMode::Animated(animation) if point != released => {
                engine.schedule_animated_move(
                    token.drawable(),
                    point,
                    animation.duration(),
                    animation.easing,
                );
                true
            }
            _ => {
                engine.set_position(token.drawable(), point);
                false
            }
        };
        token.position = point;
        engine.request_redraw();

        log::debug!(
            "Settled {} at ({}, {}){}",
            token.drawable(),
            point.x,
            point.y,
            if animated { " (animated)" } else { "" }
        );
        SettleResult {
            released,
            point,
            animated,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Easing;
    use crate::engine::testing::{Call, RecordingEngine};
    use kurbo::Size;
    use std::time::Duration;
    use uuid::Uuid;

    const CONTAINER: DrawableId = DrawableId(100);

    fn rake() -> Region {
        Region::new(10.0, 400.0, 300.0, 150.0)
    }

    fn token_at(x: f64, y: f64) -> VisualToken {
        VisualToken::new(
            Uuid::new_v4(),
            DrawableId(1),
            Point::new(x, y),
            Size::new(50.0, 50.0),
        )
    }

    fn animated() -> SettleMode {
        SettleMode::Animated(SnapAnimation::default())
    }

    #[test]
    fn test_press_captures_offset_and_raises() {
        let mut engine = RecordingEngine::new();
        let mut drag = DragController::new();
        let mut token = token_at(100.0, 450.0);

        let session = drag.press(&mut engine, CONTAINER, &mut token, Point::new(120.0, 470.0));

        assert_eq!(session.origin_offset, Vec2::new(-20.0, -20.0));
        assert_eq!(drag.state(token.drawable()), DragState::Dragging(session));
        assert!(engine.calls.contains(&Call::ToTop(CONTAINER, token.drawable())));
        assert_eq!(engine.redraws(), 1);
    }

    #[test]
    fn test_offset_is_constant_during_drag() {
        let mut engine = RecordingEngine::new();
        let mut drag = DragController::new();
        let mut token = token_at(100.0, 450.0);
        let start = Point::new(125.0, 460.0);
        let session = drag.press(&mut engine, CONTAINER, &mut token, start);

        for (dx, dy) in [(5.0, 0.0), (-40.0, 13.0), (300.0, -700.0), (0.5, 0.25)] {
            let pointer = Point::new(start.x + dx, start.y + dy);
            assert!(drag.drag(&mut engine, &mut token, pointer));
            assert_eq!(token.position - pointer, session.origin_offset);
            assert_eq!(engine.last_position(token.drawable()), Some(token.position));
        }
    }

    #[test]
    fn test_release_out_of_bounds_snaps_animated() {
        let mut engine = RecordingEngine::new();
        let mut drag = DragController::new();
        let mut token = token_at(100.0, 450.0);
        let start = Point::new(110.0, 460.0);
        drag.press(&mut engine, CONTAINER, &mut token, start);

        let end = Point::new(start.x + 500.0, start.y - 500.0);
        drag.drag(&mut engine, &mut token, end);
        let result = drag
            .release(&mut engine, &mut token, end, &rake(), animated())
            .unwrap();

        assert_eq!(result.released, Point::new(600.0, -50.0));
        assert_eq!(result.point, Point::new(260.0, 400.0));
        assert!(result.animated);
        assert!(result.is_snapped());
        assert_eq!(token.position, Point::new(260.0, 400.0));
        assert!(engine.calls.contains(&Call::Animate(
            token.drawable(),
            Point::new(260.0, 400.0),
            Duration::from_millis(100),
            Easing::Linear,
        )));
        assert_eq!(drag.state(token.drawable()), DragState::Idle);
    }

    #[test]
    fn test_press_mid_animation_grabs_drawn_position() {
        let mut engine = RecordingEngine::new();
        let mut drag = DragController::new();
        let mut token = token_at(260.0, 400.0);
        // The engine still draws the token part way back from a release.
        engine.drawn.insert(token.drawable(), Point::new(385.0, 400.0));

        let pointer = Point::new(395.0, 410.0);
        let session = drag.press(&mut engine, CONTAINER, &mut token, pointer);

        assert_eq!(session.origin_offset, Vec2::new(-10.0, -10.0));
        assert_eq!(token.position, Point::new(385.0, 400.0));
        assert!(engine.calls.contains(&Call::SetPosition(
            token.drawable(),
            Point::new(385.0, 400.0)
        )));
        assert!(drag.drag(&mut engine, &mut token, pointer));
        assert_eq!(token.position, Point::new(385.0, 400.0));
    }

    #[test]
    fn test_press_at_rest_does_not_reposition() {
        let mut engine = RecordingEngine::new();
        let mut drag = DragController::new();
        let mut token = token_at(100.0, 450.0);
        engine.drawn.insert(token.drawable(), token.position);

        drag.press(&mut engine, CONTAINER, &mut token, Point::new(110.0, 460.0));

        assert!(!engine.calls.iter().any(|c| matches!(c, Call::SetPosition(..))));
    }

    #[test]
    fn test_release_in_bounds_is_not_animated() {
        let mut engine = RecordingEngine::new();
        let mut drag = DragController::new();
        let mut token = token_at(100.0, 450.0);
        drag.press(&mut engine, CONTAINER, &mut token, Point::new(100.0, 450.0));

        let result = drag
            .release(&mut engine, &mut token, Point::new(150.0, 460.0), &rake(), animated())
            .unwrap();

        assert!(!result.animated);
        assert!(!result.is_snapped());
        assert_eq!(
            engine.calls.last(),
            Some(&Call::Redraw),
            "settle always ends with a redraw"
        );
        assert_eq!(engine.last_position(token.drawable()), Some(Point::new(150.0, 460.0)));
    }

    #[test]
    fn test_immediate_settle() {
        let mut engine = RecordingEngine::new();
        let mut token = token_at(0.0, 0.0);

        let result = DragController::settle(
            &mut engine,
            &mut token,
            Point::new(0.0, 0.0),
            &rake(),
            SettleMode::Immediate,
        );

        assert!(!result.animated);
        assert_eq!(result.point, Point::new(10.0, 400.0));
        assert!(engine.calls.contains(&Call::SetPosition(
            token.drawable(),
            Point::new(10.0, 400.0)
        )));
    }

    #[test]
    fn test_release_without_press_is_ignored() {
        let mut engine = RecordingEngine::new();
        let mut drag = DragController::new();
        let mut token = token_at(100.0, 450.0);

        assert!(drag
            .release(&mut engine, &mut token, Point::new(900.0, 900.0), &rake(), animated())
            .is_none());
        assert!(!drag.drag(&mut engine, &mut token, Point::new(900.0, 900.0)));
        assert_eq!(token.position, Point::new(100.0, 450.0));
        assert!(engine.calls.is_empty());
    }

    #[test]
    fn test_cancel_settles_in_place() {
        let mut engine = RecordingEngine::new();
        let mut drag = DragController::new();
        let mut token = token_at(100.0, 450.0);
        drag.press(&mut engine, CONTAINER, &mut token, Point::new(100.0, 450.0));
        drag.drag(&mut engine, &mut token, Point::new(-100.0, 450.0));

        let result = drag.cancel(&mut engine, &mut token, &rake()).unwrap();

        assert_eq!(result.point, Point::new(10.0, 450.0));
        assert!(!result.animated);
        assert!(!drag.is_dragging(token.drawable()));
        assert!(drag.cancel(&mut engine, &mut token, &rake()).is_none());
    }

    #[test]
    fn test_hover_sets_pointer_cursor() {
        let mut engine = RecordingEngine::new();
        let drag = DragController::new();
        let token = token_at(100.0, 450.0);

        drag.hover(&mut engine, &token);

        assert_eq!(engine.calls, vec![Call::SetCursor(token.drawable(), Cursor::Pointer)]);
        assert_eq!(drag.state(token.drawable()), DragState::Idle);
    }

    #[test]
    fn test_settle_mode_from_config() {
        assert_eq!(SettleMode::from(None), SettleMode::Immediate);
        assert_eq!(
            SettleMode::from(Some(SnapAnimation::default())),
            SettleMode::Animated(SnapAnimation::default())
        );
    }
}
