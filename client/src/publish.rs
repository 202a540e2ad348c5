use crate::geometry::{padded_crop, CropRect};
use crate::state::Board;

/// Decides whether this tick publishes, and what region.
///
/// Publishes only between strokes, with unpublished changes and a dirty box.
/// The dirty flag drops as soon as a snapshot is taken, not when the upload
/// lands; strokes made meanwhile wait for a later tick.
pub fn take_snapshot(board: &mut Board, padding: f64) -> Option<CropRect> {
    if board.halted || board.drawing || !board.dirty {
        return None;
    }
    let bounds = board.bounds?;
    board.dirty = false;
    Some(padded_crop(&bounds, padding))
}

/// Records an upload leaving. Returns how many were already pending; uploads
/// are allowed to overlap.
pub fn upload_started(board: &mut Board) -> u32 {
    let pending = board.uploads_in_flight;
    board.uploads_in_flight += 1;
    pending
}

pub fn upload_finished(board: &mut Board) {
    board.uploads_in_flight = board.uploads_in_flight.saturating_sub(1);
}
