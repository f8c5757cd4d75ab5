//! Errors raised by the rules engine.
//!
//! Every variant is recoverable: a rejected move leaves the game exactly as it
//! was, and the session layer reports the error to the client that sent it.

use thiserror::Error;

use crate::game_state::chess_types::{ChessMove, Color, Position};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChessErrors {
    /// Coordinates outside `1..=8`.
    #[error("position ({row}, {col}) is off the board")]
    InvalidPosition { row: i64, col: i64 },

    #[error("there is no piece on {0}")]
    EmptySquare(Position),

    /// The piece on the start square does not belong to the side to move.
    #[error("it is {turn}'s turn")]
    NotYourTurn { turn: Color },

    /// The move is not in the piece's legal set, including moves that would
    /// leave the mover's own king attacked.
    #[error("illegal move {0}")]
    IllegalMove(ChessMove),

    #[error("the game is over")]
    GameOver,

    #[error("invalid FEN: {0}")]
    InvalidFen(String),
}
