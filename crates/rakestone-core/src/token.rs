//! Visual tokens: the view-side projection of a stone.

use crate::engine::DrawableId;
use crate::stone::StoneId;
use kurbo::{Point, Rect, Size};

/// A drawable stone on the stage.
///
/// Owned by the view. The stone id is a back-reference into the collection,
/// not an ownership edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisualToken {
    stone: StoneId,
    drawable: DrawableId,
    /// Live top-left position in stage coordinates.
    pub position: Point,
    pub size: Size,
}

impl VisualToken {
    pub fn new(stone: StoneId, drawable: DrawableId, position: Point, size: Size) -> Self {
        Self {
            stone,
            drawable,
            position,
            size,
        }
    }

    pub fn stone(&self) -> StoneId {
        self.stone
    }

    pub fn drawable(&self) -> DrawableId {
        self.drawable
    }

    /// Bounds in stage coordinates.
    pub fn bounds(&self) -> Rect {
        Rect::from_origin_size(self.position, self.size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_bounds() {
        let token = VisualToken::new(
            Uuid::new_v4(),
            DrawableId(3),
            Point::new(10.0, 20.0),
            Size::new(50.0, 40.0),
        );
        let bounds = token.bounds();
        assert!((bounds.x0 - 10.0).abs() < f64::EPSILON);
        assert!((bounds.y1 - 60.0).abs() < f64::EPSILON);
    }
}
