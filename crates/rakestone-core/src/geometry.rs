//! Clamping stone positions back inside the rake.

use kurbo::{Point, Rect, Size};
use serde::{Deserialize, Serialize};

/// Clamp a single coordinate into `[min, max]`.
///
/// An inverted range (`min > max`, a stone larger than the rake on this
/// axis) always resolves to `min`, pinning the stone to the rake's edge.
pub fn clamp_axis(value: f64, min: f64, max: f64) -> f64 {
    if value < min || min > max {
        min
    } else if value > max {
        max
    } else {
        value
    }
}

/// The rake's bounding rectangle in canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Default for Region {
    fn default() -> Self {
        Self {
            x: 10.0,
            y: 400.0,
            width: 300.0,
            height: 150.0,
        }
    }
}

impl Region {
    /// Create a new region.
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Top-left corner of the region.
    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// The region as a kurbo Rect.
    pub fn as_rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.x + self.width, self.y + self.height)
    }

    /// Range of legal top-left positions for a stone of the given size.
    ///
    /// May be inverted when the stone does not fit.
    pub fn snap_bounds(&self, stone: Size) -> Rect {
        Rect {
            x0: self.x,
            y0: self.y,
            x1: self.x + self.width - stone.width,
            y1: self.y + self.height - stone.height,
        }
    }

    /// Nearest legal top-left position for a stone placed at `point`.
    pub fn clamp(&self, point: Point, stone: Size) -> Point {
        let bounds = self.snap_bounds(stone);
        Point::new(
            clamp_axis(point.x, bounds.x0, bounds.x1),
            clamp_axis(point.y, bounds.y0, bounds.y1),
        )
    }

    /// Whether a stone at `point` lies fully inside the region.
    pub fn contains_stone(&self, point: Point, stone: Size) -> bool {
        let bounds = self.snap_bounds(stone);
        point.x >= bounds.x0 && point.x <= bounds.x1 && point.y >= bounds.y0 && point.y <= bounds.y1
    }

    /// Whether a stage point falls on the region.
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x
            && point.x <= self.x + self.width
            && point.y >= self.y
            && point.y <= self.y + self.height
    }

    /// Whether a stone of the given size fits on both axes.
    pub fn fits(&self, stone: Size) -> bool {
        stone.width <= self.width && stone.height <= self.height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STONE: Size = Size::new(50.0, 50.0);

    fn rake() -> Region {
        Region::new(10.0, 400.0, 300.0, 150.0)
    }

    #[test]
    fn test_clamp_axis() {
        assert!((clamp_axis(5.0, 10.0, 20.0) - 10.0).abs() < f64::EPSILON);
        assert!((clamp_axis(25.0, 10.0, 20.0) - 20.0).abs() < f64::EPSILON);
        assert!((clamp_axis(15.0, 10.0, 20.0) - 15.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_clamp_axis_inverted_range() {
        for value in [0.0, 7.0, 10.0, 12.0, -1e9, 1e9] {
            assert!((clamp_axis(value, 10.0, 5.0) - 10.0).abs() < f64::EPSILON);
        }
    }

    #[test]
    fn test_clamp_out_of_bounds_release() {
        let snapped = rake().clamp(Point::new(600.0, -50.0), STONE);
        assert!((snapped.x - 260.0).abs() < f64::EPSILON);
        assert!((snapped.y - 400.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_clamp_inside_is_identity() {
        let p = Point::new(100.0, 450.0);
        assert_eq!(rake().clamp(p, STONE), p);
    }

    #[test]
    fn test_clamp_idempotent_and_in_bounds() {
        let region = rake();
        let mut x = -400.0;
        while x <= 800.0 {
            let mut y = -200.0;
            while y <= 900.0 {
                let once = region.clamp(Point::new(x, y), STONE);
                assert!(region.contains_stone(once, STONE), "{once:?} escaped");
                assert_eq!(region.clamp(once, STONE), once);
                y += 37.5;
            }
            x += 41.0;
        }
    }

    #[test]
    fn test_clamp_exact_fit() {
        let region = Region::new(0.0, 0.0, 50.0, 50.0);
        assert_eq!(region.clamp(Point::new(30.0, -30.0), STONE), Point::ZERO);
    }

    #[test]
    fn test_stone_larger_than_region() {
        let region = Region::new(0.0, 0.0, 20.0, 20.0);
        assert!(!region.fits(STONE));
        assert_eq!(region.clamp(Point::new(-5.0, -5.0), STONE), Point::ZERO);

        for point in [Point::new(5.0, 5.0), Point::new(100.0, -3.0)] {
            let once = region.clamp(point, STONE);
            assert_eq!(once, Point::ZERO);
            assert_eq!(region.clamp(once, STONE), once);
        }
    }

    #[test]
    fn test_contains() {
        let region = rake();
        assert!(region.contains(Point::new(10.0, 400.0)));
        assert!(region.contains(Point::new(310.0, 550.0)));
        assert!(!region.contains(Point::new(9.0, 450.0)));
        assert!(!region.contains_stone(Point::new(270.0, 450.0), STONE));
    }
}
