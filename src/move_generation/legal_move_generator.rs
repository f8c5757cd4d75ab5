//! Legal move filtering.
//!
//! Takes the pseudo-legal moves of one piece, plays each on a scratch copy of
//! the board, and drops every move that leaves the mover's own king attacked.

use crate::game_state::chess_types::{Board, ChessMove, Color, Position};
use crate::move_generation::legal_move_apply::apply_move;
use crate::move_generation::legal_move_checks::is_king_in_check;
use crate::move_generation::move_generator::generate_pseudo_legal_moves;

/// Legal moves of the piece on `from`, empty when the square is empty.
pub fn generate_legal_moves(board: &Board, from: Position) -> Vec<ChessMove> {
    let Some(piece) = board.piece_at(from) else {
        return Vec::new();
    };

    generate_pseudo_legal_moves(board, from)
        .into_iter()
        .filter(|mv| match apply_move(board, *mv) {
            // Illegal if own king is in check after move.
            Ok(next) => !is_king_in_check(&next, piece.color),
            Err(_) => false,
        })
        .collect()
}

/// Legal moves of every `color` piece.
pub fn generate_all_legal_moves(board: &Board, color: Color) -> Vec<ChessMove> {
    board
        .pieces_of(color)
        .flat_map(|(from, _)| generate_legal_moves(board, from))
        .collect()
}

/// True if `color` has at least one legal move. Stops at the first one found.
pub fn has_any_legal_move(board: &Board, color: Color) -> bool {
    board
        .pieces_of(color)
        .any(|(from, _)| !generate_legal_moves(board, from).is_empty())
}
