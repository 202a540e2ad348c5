use crate::geometry::{smooth_path, PathSegment, Point};
use crate::input::PointerInput;
use crate::state::{Board, Tool};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Layer {
    /// The visible canvas, showing the stroke in progress.
    Live,
    /// The offscreen canvas holding committed strokes.
    Backing,
}

/// One drawing instruction for the two canvas layers.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawOp {
    Dot {
        layer: Layer,
        at: Point,
        size: f64,
        color: String,
    },
    Segment {
        from: Point,
        to: Point,
        size: f64,
        color: String,
    },
    Path {
        segments: Vec<PathSegment>,
        size: f64,
        color: String,
    },
    /// Copy the live canvas onto the backing one.
    BakeLive,
    /// Replace the live canvas with the backing one.
    SyncLive,
    Clear,
    Resize {
        width: f64,
        height: f64,
    },
}

pub fn apply_input(board: &mut Board, input: PointerInput) -> Vec<DrawOp> {
    if board.halted {
        return Vec::new();
    }
    match input {
        PointerInput::Down(point) => start_stroke(board, point),
        PointerInput::Move(point) => move_stroke(board, point),
        PointerInput::Up => end_stroke(board),
    }
}

pub fn start_stroke(board: &mut Board, point: Point) -> Vec<DrawOp> {
    board.stroke.push(point);
    board.drawing = true;
    board.dirty = true;
    vec![DrawOp::Dot {
        layer: Layer::Live,
        at: point,
        size: board.tools.size,
        color: board.tools.color.clone(),
    }]
}

pub fn move_stroke(board: &mut Board, point: Point) -> Vec<DrawOp> {
    if !board.drawing {
        return Vec::new();
    }
    let from = board.stroke.last().copied().unwrap_or(point);
    board.stroke.push(point);
    vec![DrawOp::Segment {
        from,
        to: point,
        size: board.tools.size,
        color: board.tools.color.clone(),
    }]
}

pub fn end_stroke(board: &mut Board) -> Vec<DrawOp> {
    board.drawing = false;
    finalize_stroke(board)
}

/// Commits the buffered stroke to the backing layer and grows the dirty box.
pub fn finalize_stroke(board: &mut Board) -> Vec<DrawOp> {
    if board.stroke.is_empty() {
        return Vec::new();
    }
    board.extend_bounds();

    let mut ops = Vec::with_capacity(2);
    match board.tool() {
        Tool::Painter if board.stroke.len() < 2 => ops.push(DrawOp::Dot {
            layer: Layer::Backing,
            at: board.stroke[0],
            size: board.tools.size,
            color: board.tools.color.clone(),
        }),
        Tool::Painter => ops.push(DrawOp::Path {
            segments: smooth_path(&board.stroke),
            size: board.tools.size,
            color: board.tools.color.clone(),
        }),
        // The eraser stroke was already painted live in background color.
        Tool::Eraser => ops.push(DrawOp::BakeLive),
    }
    ops.push(DrawOp::SyncLive);
    board.stroke.clear();
    ops
}

pub fn clear_board(board: &mut Board) -> Vec<DrawOp> {
    board.bounds = None;
    vec![DrawOp::Clear]
}

/// Resizing drops canvas content, so the dirty box goes with it.
pub fn resize_board(board: &mut Board, width: f64, height: f64) -> Vec<DrawOp> {
    board.viewport_width = width;
    board.viewport_height = height;
    board.bounds = None;
    vec![DrawOp::Resize { width, height }]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::geometry::Bounds;

    fn p(x: f64, y: f64) -> Point {
        Point { x, y }
    }

    fn board() -> Board {
        Board::new(&Config::default(), 800.0, 600.0)
    }

    fn stroke(board: &mut Board, points: &[Point]) -> Vec<DrawOp> {
        let mut ops = apply_input(board, PointerInput::Down(points[0]));
        for point in &points[1..] {
            ops.extend(apply_input(board, PointerInput::Move(*point)));
        }
        ops.extend(apply_input(board, PointerInput::Up));
        ops
    }

    #[test]
    fn down_draws_a_live_dot_and_marks_dirty() {
        let mut board = board();
        let ops = apply_input(&mut board, PointerInput::Down(p(5.0, 6.0)));
        assert!(board.drawing);
        assert!(board.dirty);
        assert_eq!(
            ops,
            vec![DrawOp::Dot {
                layer: Layer::Live,
                at: p(5.0, 6.0),
                size: 3.0,
                color: "#000000".to_string()
            }]
        );
    }

    #[test]
    fn move_without_down_is_ignored() {
        let mut board = board();
        let ops = apply_input(&mut board, PointerInput::Move(p(5.0, 6.0)));
        assert!(ops.is_empty());
        assert!(board.stroke.is_empty());
    }

    #[test]
    fn move_draws_from_previous_point() {
        let mut board = board();
        apply_input(&mut board, PointerInput::Down(p(0.0, 0.0)));
        let ops = apply_input(&mut board, PointerInput::Move(p(3.0, 4.0)));
        assert_eq!(
            ops,
            vec![DrawOp::Segment {
                from: p(0.0, 0.0),
                to: p(3.0, 4.0),
                size: 3.0,
                color: "#000000".to_string()
            }]
        );
    }

    #[test]
    fn buffer_is_empty_after_up() {
        let mut board = board();
        stroke(&mut board, &[p(1.0, 1.0), p(2.0, 2.0), p(3.0, 5.0)]);
        assert!(board.stroke.is_empty());
        assert!(!board.drawing);
        stroke(&mut board, &[p(1.0, 1.0)]);
        assert!(board.stroke.is_empty());
    }

    #[test]
    fn tap_commits_a_dot_of_tool_size() {
        let mut board = board();
        board.tools.select_brush(12.0);
        let ops = stroke(&mut board, &[p(10.0, 20.0)]);
        assert_eq!(
            &ops[1..],
            &[
                DrawOp::Dot {
                    layer: Layer::Backing,
                    at: p(10.0, 20.0),
                    size: 12.0,
                    color: "#000000".to_string()
                },
                DrawOp::SyncLive,
            ]
        );
    }

    #[test]
    fn drag_commits_a_smoothed_path() {
        let mut board = board();
        let points = [p(0.0, 0.0), p(10.0, 0.0), p(20.0, 10.0), p(30.0, 10.0)];
        let ops = stroke(&mut board, &points);
        let committed = &ops[ops.len() - 2];
        match committed {
            DrawOp::Path { segments, size, .. } => {
                assert_eq!(*segments, smooth_path(&points));
                assert_eq!(*size, 3.0);
            }
            other => panic!("expected path, got {other:?}"),
        }
        assert_eq!(ops.last(), Some(&DrawOp::SyncLive));
    }

    #[test]
    fn eraser_bakes_the_live_layer() {
        let mut board = board();
        board.tools.select_eraser(12.0, "#ffffff");
        let ops = stroke(&mut board, &[p(0.0, 0.0), p(10.0, 0.0)]);
        assert_eq!(&ops[ops.len() - 2..], &[DrawOp::BakeLive, DrawOp::SyncLive]);
        match &ops[0] {
            DrawOp::Dot { color, size, .. } => {
                assert_eq!(color, "#ffffff");
                assert_eq!(*size, 12.0);
            }
            other => panic!("expected dot, got {other:?}"),
        }
    }

    #[test]
    fn bounds_envelope_spans_all_strokes() {
        let mut board = board();
        stroke(&mut board, &[p(100.0, 100.0), p(120.0, 90.0)]);
        stroke(&mut board, &[p(50.0, 300.0)]);
        stroke(&mut board, &[p(400.0, 200.0), p(380.0, 250.0), p(390.0, 260.0)]);
        assert_eq!(
            board.bounds,
            Some(Bounds {
                min_x: 50.0,
                min_y: 90.0,
                max_x: 400.0,
                max_y: 300.0
            })
        );
    }

    #[test]
    fn tap_makes_a_point_sized_box() {
        let mut board = board();
        stroke(&mut board, &[p(100.0, 100.0)]);
        assert_eq!(
            board.bounds,
            Some(Bounds {
                min_x: 100.0,
                min_y: 100.0,
                max_x: 100.0,
                max_y: 100.0
            })
        );
    }

    #[test]
    fn stray_down_keeps_accumulating() {
        let mut board = board();
        apply_input(&mut board, PointerInput::Down(p(1.0, 1.0)));
        apply_input(&mut board, PointerInput::Down(p(2.0, 2.0)));
        assert_eq!(board.stroke.len(), 2);
    }

    #[test]
    fn up_without_stroke_draws_nothing() {
        let mut board = board();
        assert!(apply_input(&mut board, PointerInput::Up).is_empty());
        assert!(board.bounds.is_none());
    }

    #[test]
    fn clear_and_resize_reset_bounds() {
        let mut board = board();
        stroke(&mut board, &[p(10.0, 10.0)]);
        assert_eq!(clear_board(&mut board), vec![DrawOp::Clear]);
        assert!(board.bounds.is_none());

        stroke(&mut board, &[p(10.0, 10.0)]);
        let ops = resize_board(&mut board, 1024.0, 768.0);
        assert_eq!(
            ops,
            vec![DrawOp::Resize {
                width: 1024.0,
                height: 768.0
            }]
        );
        assert!(board.bounds.is_none());
        assert_eq!(board.viewport_width, 1024.0);
    }

    #[test]
    fn halted_board_ignores_input() {
        let mut board = board();
        board.halted = true;
        assert!(stroke(&mut board, &[p(1.0, 1.0), p(5.0, 5.0)]).is_empty());
        assert!(!board.dirty);
        assert!(board.bounds.is_none());
    }
}
