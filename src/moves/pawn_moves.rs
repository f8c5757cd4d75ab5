//! Pawn move generation.
//!
//! Pawns push forward onto empty squares (two squares from their start row
//! when both are empty) and capture diagonally forward. Any move reaching the
//! promotion row is emitted once per promotion choice.

use crate::game_state::chess_rules::{
    pawn_direction, pawn_start_row, promotion_row, PROMOTION_CHOICES,
};
use crate::game_state::chess_types::{Board, ChessMove, Color, Position};

pub fn generate_pawn_moves(board: &Board, from: Position, color: Color, out: &mut Vec<ChessMove>) {
    let forward = pawn_direction(color);

    if let Some(one_step) = from.offset(forward, 0) {
        if board.piece_at(one_step).is_none() {
            push_pawn_move(from, one_step, color, out);

            if from.row() == pawn_start_row(color) {
                if let Some(two_step) = one_step.offset(forward, 0) {
                    if board.piece_at(two_step).is_none() {
                        out.push(ChessMove::new(from, two_step, None));
                    }
                }
            }
        }
    }

    for d_col in [-1i8, 1i8] {
        let Some(to) = from.offset(forward, d_col) else {
            continue;
        };
        if board.piece_at(to).is_some_and(|piece| piece.color != color) {
            push_pawn_move(from, to, color, out);
        }
    }
}

fn push_pawn_move(from: Position, to: Position, color: Color, out: &mut Vec<ChessMove>) {
    if to.row() == promotion_row(color) {
        for promo in PROMOTION_CHOICES {
            out.push(ChessMove::new(from, to, Some(promo)));
        }
    } else {
        out.push(ChessMove::new(from, to, None));
    }
}
