//! Pseudo-legal move generation entry point.
//!
//! Dispatches on the kind of the piece standing on a square. The result obeys
//! movement patterns and occupancy only; whether the mover's king is left
//! attacked is decided later by the legality filter.

use crate::game_state::chess_types::{Board, ChessMove, PieceKind, Position};
use crate::moves::bishop_moves::generate_bishop_moves;
use crate::moves::king_moves::generate_king_moves;
use crate::moves::knight_moves::generate_knight_moves;
use crate::moves::pawn_moves::generate_pawn_moves;
use crate::moves::queen_moves::generate_queen_moves;
use crate::moves::rook_moves::generate_rook_moves;

/// Pseudo-legal moves of the piece on `from`; empty if the square is empty.
pub fn generate_pseudo_legal_moves(board: &Board, from: Position) -> Vec<ChessMove> {
    let mut out = Vec::<ChessMove>::with_capacity(32);
    let Some(piece) = board.piece_at(from) else {
        return out;
    };

    match piece.kind {
        PieceKind::Pawn => generate_pawn_moves(board, from, piece.color, &mut out),
        PieceKind::Knight => generate_knight_moves(board, from, piece.color, &mut out),
        PieceKind::Bishop => generate_bishop_moves(board, from, piece.color, &mut out),
        PieceKind::Rook => generate_rook_moves(board, from, piece.color, &mut out),
        PieceKind::Queen => generate_queen_moves(board, from, piece.color, &mut out),
        PieceKind::King => generate_king_moves(board, from, piece.color, &mut out),
    }

    out
}
