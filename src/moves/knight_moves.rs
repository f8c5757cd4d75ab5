use crate::game_state::chess_types::{Board, ChessMove, Color, Position};
use crate::move_generation::legal_move_shared::step_moves;

pub const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (2, 1),
    (1, 2),
    (-1, 2),
    (-2, 1),
    (-2, -1),
    (-1, -2),
    (1, -2),
    (2, -1),
];

#[inline]
pub fn generate_knight_moves(board: &Board, from: Position, color: Color, out: &mut Vec<ChessMove>) {
    step_moves(board, from, color, &KNIGHT_OFFSETS, out);
}
