//! Wire messages of the live session protocol.
//!
//! Clients send one [`UserGameCommand`] per frame; the server answers with
//! [`ServerMessage`] frames. Both are JSON objects tagged by a type field.

use serde::{Deserialize, Serialize};

use crate::game_state::chess_types::{ChessMove, Game};
use crate::session::collaborators::MatchId;
use crate::session::errors::SessionError;

/// Opaque per-client key a connection is registered under. The client's auth
/// token doubles as this key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionKey(String);

impl SessionKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SessionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Tokens are credentials; log only a prefix.
        let prefix: String = self.0.chars().take(6).collect();
        write!(f, "{prefix}…")
    }
}

/// Client → server command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserGameCommand {
    #[serde(rename = "authToken")]
    pub auth_token: String,
    #[serde(rename = "gameID")]
    pub match_id: MatchId,
    #[serde(flatten)]
    pub kind: CommandKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "commandType", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CommandKind {
    Connect,
    MakeMove {
        #[serde(rename = "move")]
        chess_move: ChessMove,
    },
    Leave,
    Resign,
}

impl CommandKind {
    pub const fn name(&self) -> &'static str {
        match self {
            CommandKind::Connect => "CONNECT",
            CommandKind::MakeMove { .. } => "MAKE_MOVE",
            CommandKind::Leave => "LEAVE",
            CommandKind::Resign => "RESIGN",
        }
    }
}

impl UserGameCommand {
    pub fn decode(raw: &str) -> Result<Self, SessionError> {
        serde_json::from_str(raw).map_err(|e| SessionError::Decode(e.to_string()))
    }

    pub fn session_key(&self) -> SessionKey {
        SessionKey::new(self.auth_token.clone())
    }
}

/// Server → client frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "serverMessageType", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ServerMessage {
    /// Full board, turn and game-over state.
    LoadGame { game: Game },
    Notification { message: String },
    Error {
        #[serde(rename = "errorMessage")]
        error_message: String,
    },
}

impl ServerMessage {
    pub fn load_game(game: &Game) -> Self {
        ServerMessage::LoadGame { game: game.clone() }
    }

    pub fn notification(message: impl Into<String>) -> Self {
        ServerMessage::Notification {
            message: message.into(),
        }
    }

    pub fn error(err: &SessionError) -> Self {
        ServerMessage::Error {
            error_message: format!("Error: {err}"),
        }
    }

    pub fn to_json(&self) -> Result<String, SessionError> {
        serde_json::to_string(self).map_err(|e| SessionError::Encode(e.to_string()))
    }
}
