//! Bishop move generation.
//!
//! Bishops slide along the four diagonals.

use crate::game_state::chess_types::{Board, ChessMove, Color, Position};
use crate::move_generation::legal_move_shared::slide_moves;

pub const BISHOP_DIRECTIONS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];

#[inline]
pub fn generate_bishop_moves(board: &Board, from: Position, color: Color, out: &mut Vec<ChessMove>) {
    slide_moves(board, from, color, &BISHOP_DIRECTIONS, out);
}
