use crate::errors::ChessErrors;
use crate::game_state::chess_types::{Board, ChessMove, Piece};

/// Returns a copy of `board` with `mv` played: the piece on `start` moves to
/// `end`, replacing any occupant, and becomes the promotion kind when set.
///
/// No legality checking happens here; the caller decides which moves to
/// apply.
pub fn apply_move(board: &Board, mv: ChessMove) -> Result<Board, ChessErrors> {
    let mut next = board.clone();
    let moved = next.clear(mv.start).ok_or(ChessErrors::EmptySquare(mv.start))?;

    let placed = match mv.promotion {
        Some(kind) => Piece::new(moved.color, kind),
        None => moved,
    };
    next.set_piece(mv.end, Some(placed));

    Ok(next)
}
