//! Perft node counting over the rules engine.
//!
//! Walks the full legal move tree to a fixed depth. Used to cross-check move
//! generation against published node counts and as a benchmark workload.

use crate::errors::ChessErrors;
use crate::game_state::chess_types::Game;
use crate::move_generation::legal_move_generator::generate_all_legal_moves;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PerftCounts {
    pub nodes: usize,
    pub captures: usize,
    pub promotions: usize,
    pub checks: usize,
    pub checkmates: usize,
}

impl PerftCounts {
    fn merge(&mut self, rhs: PerftCounts) {
        self.nodes += rhs.nodes;
        self.captures += rhs.captures;
        self.promotions += rhs.promotions;
        self.checks += rhs.checks;
        self.checkmates += rhs.checkmates;
    }
}

pub fn perft(game: &Game, depth: u8) -> Result<PerftCounts, ChessErrors> {
    if depth == 0 {
        return Ok(PerftCounts {
            nodes: 1,
            ..PerftCounts::default()
        });
    }

    let mut total = PerftCounts::default();
    for mv in generate_all_legal_moves(&game.board, game.turn) {
        let is_capture = game.board.piece_at(mv.end).is_some();
        let mut next = game.clone();
        next.make_move(mv)?;

        if depth == 1 {
            total.nodes += 1;
            total.captures += usize::from(is_capture);
            total.promotions += usize::from(mv.promotion.is_some());
            if next.is_in_check(next.turn) {
                total.checks += 1;
                total.checkmates += usize::from(next.is_in_checkmate(next.turn));
            }
        } else {
            total.merge(perft(&next, depth - 1)?);
        }
    }

    Ok(total)
}
