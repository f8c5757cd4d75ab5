//! Rules engine state.
//!
//! `Game` owns a [`Board`], whose turn it is, and whether the game is over.
//! It is only mutated through [`Game::make_move`], [`Game::resign`] and
//! [`Game::conclude`]; legality and check queries are read-only.

use serde::{Deserialize, Serialize};

use crate::errors::ChessErrors;
use crate::game_state::chess_types::{Board, ChessMove, Color, Position};
use crate::move_generation::legal_move_apply::apply_move;
use crate::move_generation::legal_move_checks::is_king_in_check;
use crate::move_generation::legal_move_generator::{generate_legal_moves, has_any_legal_move};
use crate::utils::fen_generator::generate_fen;
use crate::utils::fen_parser::parse_fen;

/// What [`Game::conclude`] found for the side to move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The side is checkmated; the game is now over.
    Checkmate(Color),
    /// The side is in check but can still move.
    Check(Color),
    /// The side is stalemated; the game is now over.
    Stalemate(Color),
}

impl Outcome {
    #[inline]
    pub const fn ends_game(self) -> bool {
        matches!(self, Outcome::Checkmate(_) | Outcome::Stalemate(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Game {
    pub board: Board,
    pub turn: Color,
    pub over: bool,
}

impl Default for Game {
    fn default() -> Self {
        Self::new_game()
    }
}

impl Game {
    /// Standard starting position, light to move.
    #[inline]
    pub fn new_game() -> Self {
        Self::from_board(Board::starting(), Color::Light)
    }

    #[inline]
    pub fn from_board(board: Board, turn: Color) -> Self {
        Self {
            board,
            turn,
            over: false,
        }
    }

    #[inline]
    pub fn from_fen(fen: &str) -> Result<Self, ChessErrors> {
        parse_fen(fen)
    }

    #[inline]
    pub fn get_fen(&self) -> String {
        generate_fen(self)
    }

    /// Moves of the piece on `position` that do not leave its own king
    /// attacked. Empty for an empty square.
    #[inline]
    pub fn legal_moves(&self, position: Position) -> Vec<ChessMove> {
        generate_legal_moves(&self.board, position)
    }

    #[inline]
    pub fn is_in_check(&self, color: Color) -> bool {
        is_king_in_check(&self.board, color)
    }

    pub fn is_in_checkmate(&self, color: Color) -> bool {
        self.is_in_check(color) && !has_any_legal_move(&self.board, color)
    }

    pub fn is_in_stalemate(&self, color: Color) -> bool {
        !self.is_in_check(color) && !has_any_legal_move(&self.board, color)
    }

    /// Validates and plays `mv` for the side to move, then passes the turn.
    ///
    /// On error the board and turn are unchanged. Checkmate and stalemate are
    /// not detected here; see [`Game::conclude`].
    pub fn make_move(&mut self, mv: ChessMove) -> Result<(), ChessErrors> {
        if self.over {
            return Err(ChessErrors::GameOver);
        }

        let piece = self
            .board
            .piece_at(mv.start)
            .ok_or(ChessErrors::EmptySquare(mv.start))?;
        if piece.color != self.turn {
            return Err(ChessErrors::NotYourTurn { turn: self.turn });
        }
        if !self.legal_moves(mv.start).contains(&mv) {
            return Err(ChessErrors::IllegalMove(mv));
        }

        self.board = apply_move(&self.board, mv)?;
        self.turn = self.turn.opposite();
        Ok(())
    }

    /// Ends the game regardless of the position.
    pub fn resign(&mut self) -> Result<(), ChessErrors> {
        if self.over {
            return Err(ChessErrors::GameOver);
        }
        self.over = true;
        Ok(())
    }

    /// Inspects the side to move. Checkmate and stalemate mark the game over;
    /// plain check only reports.
    pub fn conclude(&mut self) -> Option<Outcome> {
        let side = self.turn;
        let in_check = self.is_in_check(side);
        let can_move = has_any_legal_move(&self.board, side);

        let outcome = match (in_check, can_move) {
            (true, false) => Outcome::Checkmate(side),
            (true, true) => Outcome::Check(side),
            (false, false) => Outcome::Stalemate(side),
            (false, true) => return None,
        };
        if outcome.ends_game() {
            self.over = true;
        }
        Some(outcome)
    }
}
