//! Ray and offset walkers shared by the per-piece generators.
//!
//! Sliding pieces walk rays until blocked; knights and kings test a fixed set
//! of offsets. Both skip squares held by the mover's own color.

use crate::game_state::chess_types::{Board, ChessMove, Color, Position};

/// Walks each ray from `from`, emitting quiet moves until a blocker. An
/// opposing blocker is emitted as a capture; an own blocker is not.
pub fn slide_moves(
    board: &Board,
    from: Position,
    color: Color,
    directions: &[(i8, i8)],
    out: &mut Vec<ChessMove>,
) {
    for &(d_row, d_col) in directions {
        let mut cursor = from.offset(d_row, d_col);
        while let Some(to) = cursor {
            match board.piece_at(to) {
                None => out.push(ChessMove::new(from, to, None)),
                Some(blocker) => {
                    if blocker.color != color {
                        out.push(ChessMove::new(from, to, None));
                    }
                    break;
                }
            }
            cursor = to.offset(d_row, d_col);
        }
    }
}

/// Emits one move per on-board offset target not held by `color`.
pub fn step_moves(
    board: &Board,
    from: Position,
    color: Color,
    offsets: &[(i8, i8)],
    out: &mut Vec<ChessMove>,
) {
    for &(d_row, d_col) in offsets {
        let Some(to) = from.offset(d_row, d_col) else {
            continue;
        };
        if board.piece_at(to).is_some_and(|piece| piece.color == color) {
            continue;
        }
        out.push(ChessMove::new(from, to, None));
    }
}
