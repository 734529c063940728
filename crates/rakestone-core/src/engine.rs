//! Rendering engine capability and the events it delivers.
//!
//! The widget never draws or schedules frames itself. It drives an injected
//! [`RenderEngine`] and reacts to [`StageEvent`]s the engine reports.

use kurbo::{Point, Rect};
use peniko::Color;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Handle to a drawable owned by the rendering engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DrawableId(pub u64);

impl fmt::Display for DrawableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Pointer affordance shown over a drawable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Cursor {
    #[default]
    Default,
    /// Hand cursor signalling the drawable can be grabbed.
    Pointer,
}

/// Interpolation curve for animated moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Easing {
    #[default]
    Linear,
    QuadIn,
    QuadOut,
    QuadInOut,
}

impl Easing {
    /// Map linear progress `t` in `[0, 1]` onto the curve.
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::QuadIn => t * t,
            Easing::QuadOut => t * (2.0 - t),
            Easing::QuadInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    -1.0 + (4.0 - 2.0 * t) * t
                }
            }
        }
    }
}

/// Operations the widget needs from a rendering engine.
///
/// Implementations own the scene graph, the frame clock and any tweening.
/// Redraw requests are idempotent and may be coalesced.
pub trait RenderEngine {
    /// The root container everything is attached to.
    fn stage(&self) -> DrawableId;

    /// Create a stroked and filled rectangle. Its position starts at the origin.
    fn create_rect(&mut self, rect: Rect, stroke: Color, fill: Color) -> DrawableId;

    /// Create an empty container.
    fn create_container(&mut self) -> DrawableId;

    /// Append `child` as the topmost child of `parent`.
    fn attach_child(&mut self, parent: DrawableId, child: DrawableId);

    /// Detach `child` from `parent` and release it along with its subtree.
    fn remove_child(&mut self, parent: DrawableId, child: DrawableId);

    /// Move `child` to the topmost position among its siblings.
    fn reorder_child_to_top(&mut self, container: DrawableId, child: DrawableId);

    /// Place a drawable immediately, cancelling any move in flight.
    fn set_position(&mut self, drawable: DrawableId, position: Point);

    /// Where a drawable is currently drawn, part way through any animated
    /// move. `None` if the engine doesn't know the drawable.
    fn drawn_position(&self, drawable: DrawableId) -> Option<Point>;

    /// Animate a drawable towards `target`.
    fn schedule_animated_move(
        &mut self,
        drawable: DrawableId,
        target: Point,
        duration: Duration,
        easing: Easing,
    );

    /// Set the pointer cursor shown while hovering a drawable.
    fn set_cursor(&mut self, drawable: DrawableId, cursor: Cursor);

    /// Ask for the stage to be repainted on a coming frame.
    fn request_redraw(&mut self);
}

/// A pointer event delivered by the engine, addressed to a drawable.
///
/// Coordinates are stage coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum StageEvent {
    MouseOver { target: DrawableId },
    MouseDown { target: DrawableId, stage: Point },
    PressMove { target: DrawableId, stage: Point },
    PressUp { target: DrawableId, stage: Point },
    Click { target: DrawableId, stage: Point },
    /// The press ended without a pointer-up, e.g. the pointer left the canvas.
    PressCancel { target: DrawableId },
}

impl StageEvent {
    /// The drawable this event is addressed to.
    pub fn target(&self) -> DrawableId {
        match *self {
            StageEvent::MouseOver { target }
            | StageEvent::MouseDown { target, .. }
            | StageEvent::PressMove { target, .. }
            | StageEvent::PressUp { target, .. }
            | StageEvent::Click { target, .. }
            | StageEvent::PressCancel { target } => target,
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_easing_endpoints() {
        for easing in [Easing::Linear, Easing::QuadIn, Easing::QuadOut, Easing::QuadInOut] {
            assert!(easing.apply(0.0).abs() < f64::EPSILON);
            assert!((easing.apply(1.0) - 1.0).abs() < f64::EPSILON);
        }
    }

    #[test]
    fn test_easing_clamps_progress() {
        assert!((Easing::Linear.apply(2.0) - 1.0).abs() < f64::EPSILON);
        assert!(Easing::QuadOut.apply(-1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_event_target() {
        let event = StageEvent::PressUp {
            target: DrawableId(7),
            stage: Point::new(1.0, 2.0),
        };
        assert_eq!(event.target(), DrawableId(7));
    }
}
