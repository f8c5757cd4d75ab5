//! Square names in algebraic coordinates.
//!
//! Converts board positions to human-readable coordinates (e.g., `e4`) for
//! move descriptions and log lines.

use crate::game_state::chess_types::Position;

/// Convert a position to algebraic notation (for example: "e4").
#[inline]
pub fn position_to_algebraic(position: Position) -> String {
    let file_char = char::from(b'a' + position.col() - 1);
    let rank_char = char::from(b'0' + position.row());
    format!("{file_char}{rank_char}")
}
