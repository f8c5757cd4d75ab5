//! Queen move generation: union of the bishop and rook rays.

use crate::game_state::chess_types::{Board, ChessMove, Color, Position};
use crate::moves::bishop_moves::generate_bishop_moves;
use crate::moves::rook_moves::generate_rook_moves;

#[inline]
pub fn generate_queen_moves(board: &Board, from: Position, color: Color, out: &mut Vec<ChessMove>) {
    generate_rook_moves(board, from, color, out);
    generate_bishop_moves(board, from, color, out);
}
