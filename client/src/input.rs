use web_sys::{MouseEvent, TouchEvent};

use crate::geometry::{normalize_point, Point};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerPhase {
    Down,
    Move,
    Up,
}

/// Mouse and touch input folded into one stream.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PointerInput {
    Down(Point),
    Move(Point),
    Up,
}

impl PointerInput {
    /// `Down` and `Move` need a usable position; `Up` never does.
    pub fn from_phase(phase: PointerPhase, point: Option<Point>) -> Option<Self> {
        match phase {
            PointerPhase::Up => Some(PointerInput::Up),
            PointerPhase::Down => point.and_then(normalize_point).map(PointerInput::Down),
            PointerPhase::Move => point.and_then(normalize_point).map(PointerInput::Move),
        }
    }

    pub fn from_mouse(phase: PointerPhase, event: &MouseEvent) -> Option<Self> {
        let point = Point {
            x: event.client_x() as f64,
            y: event.client_y() as f64,
        };
        Self::from_phase(phase, Some(point))
    }

    /// Only the first touch point is read; multi-touch is not supported.
    pub fn from_touch(phase: PointerPhase, event: &TouchEvent) -> Option<Self> {
        let point = event.touches().get(0).map(|touch| Point {
            x: touch.client_x() as f64,
            y: touch.client_y() as f64,
        });
        Self::from_phase(phase, point)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn up_needs_no_position() {
        assert_eq!(
            PointerInput::from_phase(PointerPhase::Up, None),
            Some(PointerInput::Up)
        );
    }

    #[test]
    fn down_and_move_carry_the_point() {
        let point = Point { x: 4.0, y: 9.0 };
        assert_eq!(
            PointerInput::from_phase(PointerPhase::Down, Some(point)),
            Some(PointerInput::Down(point))
        );
        assert_eq!(
            PointerInput::from_phase(PointerPhase::Move, Some(point)),
            Some(PointerInput::Move(point))
        );
    }

    #[test]
    fn touch_without_points_is_dropped() {
        assert_eq!(PointerInput::from_phase(PointerPhase::Move, None), None);
        assert_eq!(PointerInput::from_phase(PointerPhase::Down, None), None);
    }

    #[test]
    fn non_finite_positions_are_dropped() {
        let point = Point {
            x: f64::NAN,
            y: 1.0,
        };
        assert_eq!(PointerInput::from_phase(PointerPhase::Down, Some(point)), None);
    }
}
