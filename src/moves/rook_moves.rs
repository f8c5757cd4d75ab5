//! Rook move generation.
//!
//! Rooks slide along ranks and files.

use crate::game_state::chess_types::{Board, ChessMove, Color, Position};
use crate::move_generation::legal_move_shared::slide_moves;

pub const ROOK_DIRECTIONS: [(i8, i8); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

#[inline]
pub fn generate_rook_moves(board: &Board, from: Position, color: Color, out: &mut Vec<ChessMove>) {
    slide_moves(board, from, color, &ROOK_DIRECTIONS, out);
}
