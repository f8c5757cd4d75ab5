use thiserror::Error;

use crate::errors::ChessErrors;
use crate::session::collaborators::MatchId;

/// Errors produced while handling one client command.
///
/// Each one is reported to the sending socket only and leaves the connection
/// open for further commands.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// The frame was not a well-formed command.
    #[error("malformed command: {0}")]
    Decode(String),

    #[error("could not encode frame: {0}")]
    Encode(String),

    /// Unknown or missing auth token.
    #[error("unauthorized")]
    Unauthorized,

    #[error("game {0} does not exist")]
    MatchNotFound(MatchId),

    /// Moving out of turn, or acting for a side the sender does not occupy.
    #[error("{0}")]
    Turn(String),

    #[error("{0}")]
    IllegalMove(String),

    #[error("the game is over")]
    GameOver,

    /// The sender has no connection registered in the named match.
    #[error("not connected to game {0}")]
    NotConnected(MatchId),

    #[error("seat already taken")]
    SeatTaken,

    #[error("storage failure: {0}")]
    Storage(String),
}

impl From<ChessErrors> for SessionError {
    fn from(err: ChessErrors) -> Self {
        match err {
            ChessErrors::GameOver => SessionError::GameOver,
            ChessErrors::NotYourTurn { .. } => SessionError::Turn(err.to_string()),
            ChessErrors::InvalidFen(_) => SessionError::Decode(err.to_string()),
            ChessErrors::EmptySquare(_)
            | ChessErrors::IllegalMove(_)
            | ChessErrors::InvalidPosition { .. } => SessionError::IllegalMove(err.to_string()),
        }
    }
}
