//! Position resolution: where inside a node's bounds a gesture lands.

use serde::{Deserialize, Serialize};

use crate::surface::ScreenSize;
use crate::tree::{Point, UiRect};

/// Distance along one axis of a rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Offset {
    /// Absolute pixels.
    Px(f32),
    /// Fraction of the rectangle's width (horizontal) or height (vertical).
    Ratio(f32),
}

impl Offset {
    fn resolve(self, extent: i32) -> f32 {
        match self {
            Offset::Px(px) => px,
            Offset::Ratio(r) => r * extent as f32,
        }
    }
}

/// Relative-position hint carried by an action descriptor.
///
/// The horizontal coordinate comes from `left` (measured from the left edge)
/// or, failing that, `right` (measured inwards from the right edge); the
/// vertical one likewise from `top` or `bottom`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub left: Option<Offset>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top: Option<Offset>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub right: Option<Offset>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bottom: Option<Offset>,
}

impl Position {
    /// Apply the hint to `rect`. `None` when either axis is unspecified.
    pub fn calc(&self, rect: &UiRect) -> Option<Point> {
        let x = match (self.left, self.right) {
            (Some(l), _) => rect.left as f32 + l.resolve(rect.width()),
            (None, Some(r)) => rect.right as f32 - r.resolve(rect.width()),
            (None, None) => return None,
        };
        let y = match (self.top, self.bottom) {
            (Some(t), _) => rect.top as f32 + t.resolve(rect.height()),
            (None, Some(b)) => rect.bottom as f32 - b.resolve(rect.height()),
            (None, None) => return None,
        };
        Some(Point { x, y })
    }
}

/// Effective tap point for `rect`: the hint's point when it yields one,
/// otherwise the rectangle's center.
pub fn resolve_point(rect: &UiRect, hint: Option<&Position>) -> Point {
    hint.and_then(|p| p.calc(rect)).unwrap_or_else(|| rect.center())
}

/// Whether `point` lies inside `[0, width] x [0, height]` (edges inclusive).
pub fn within_screen(point: Point, screen: ScreenSize) -> bool {
    0.0 <= point.x
        && 0.0 <= point.y
        && point.x <= screen.width as f32
        && point.y <= screen.height as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCREEN: ScreenSize = ScreenSize { width: 1080, height: 1920 };

    #[test]
    fn no_hint_gives_center() {
        let rect = UiRect::new(10, 10, 110, 60);
        assert_eq!(resolve_point(&rect, None), Point::new(60.0, 35.0));
    }

    #[test]
    fn ratio_hint_from_left_top() {
        let rect = UiRect::new(0, 100, 200, 300);
        let hint = Position {
            left: Some(Offset::Ratio(0.2)),
            top: Some(Offset::Ratio(0.5)),
            ..Default::default()
        };
        assert_eq!(resolve_point(&rect, Some(&hint)), Point::new(40.0, 200.0));
    }

    #[test]
    fn px_hint_from_right_bottom() {
        let rect = UiRect::new(0, 0, 100, 100);
        let hint = Position {
            right: Some(Offset::Px(10.0)),
            bottom: Some(Offset::Px(5.0)),
            ..Default::default()
        };
        assert_eq!(resolve_point(&rect, Some(&hint)), Point::new(90.0, 95.0));
    }

    #[test]
    fn left_wins_over_right() {
        let rect = UiRect::new(0, 0, 100, 100);
        let hint = Position {
            left: Some(Offset::Px(1.0)),
            right: Some(Offset::Px(1.0)),
            top: Some(Offset::Px(1.0)),
            ..Default::default()
        };
        assert_eq!(hint.calc(&rect), Some(Point::new(1.0, 1.0)));
    }

    #[test]
    fn incomplete_hint_falls_back_to_center() {
        let rect = UiRect::new(0, 0, 100, 50);
        let hint = Position { left: Some(Offset::Px(3.0)), ..Default::default() };
        assert_eq!(hint.calc(&rect), None);
        assert_eq!(resolve_point(&rect, Some(&hint)), Point::new(50.0, 25.0));
    }

    #[test]
    fn screen_edges_are_inside() {
        assert!(within_screen(Point::new(0.0, 0.0), SCREEN));
        assert!(within_screen(Point::new(1080.0, 1920.0), SCREEN));
    }

    #[test]
    fn outside_screen() {
        assert!(!within_screen(Point::new(-30.0, -30.0), SCREEN));
        assert!(!within_screen(Point::new(1081.0, 10.0), SCREEN));
        assert!(!within_screen(Point::new(10.0, 1920.5), SCREEN));
    }

    #[test]
    fn position_json_shape() {
        let hint: Position = serde_json::from_str(r#"{"left":{"ratio":0.2},"top":{"px":12}}"#).unwrap();
        assert_eq!(hint.left, Some(Offset::Ratio(0.2)));
        assert_eq!(hint.top, Some(Offset::Px(12.0)));
        assert_eq!(hint.right, None);
    }
}
