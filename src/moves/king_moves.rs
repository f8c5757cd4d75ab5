use crate::game_state::chess_types::{Board, ChessMove, Color, Position};
use crate::move_generation::legal_move_shared::step_moves;

pub const KING_OFFSETS: [(i8, i8); 8] = [
    (1, -1),
    (1, 0),
    (1, 1),
    (0, -1),
    (0, 1),
    (-1, -1),
    (-1, 0),
    (-1, 1),
];

#[inline]
pub fn generate_king_moves(board: &Board, from: Position, color: Color, out: &mut Vec<ChessMove>) {
    step_moves(board, from, color, &KING_OFFSETS, out);
}
