//! Boundary to the account and persistence layer.
//!
//! The session handler never owns credentials or storage. It resolves auth
//! tokens through [`IdentityResolver`] and loads/saves matches through
//! [`MatchStore`]; seat assignment arrives already recorded on the
//! [`MatchRecord`].

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::game_state::chess_types::{Color, Game};
use crate::session::errors::SessionError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MatchId(pub u32);

impl fmt::Display for MatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Who a token belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identity(pub String);

impl Identity {
    pub fn new(username: impl Into<String>) -> Self {
        Self(username.into())
    }

    pub fn username(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One match: its game plus who holds each seat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub match_id: MatchId,
    pub name: String,
    pub white: Option<Identity>,
    pub black: Option<Identity>,
    pub game: Game,
}

impl MatchRecord {
    pub fn new(match_id: MatchId, name: impl Into<String>) -> Self {
        Self {
            match_id,
            name: name.into(),
            white: None,
            black: None,
            game: Game::new_game(),
        }
    }

    /// Color the identity plays, `None` for observers.
    pub fn seat_of(&self, identity: &Identity) -> Option<Color> {
        if self.white.as_ref() == Some(identity) {
            Some(Color::Light)
        } else if self.black.as_ref() == Some(identity) {
            Some(Color::Dark)
        } else {
            None
        }
    }

    pub fn holder(&self, color: Color) -> Option<&Identity> {
        match color {
            Color::Light => self.white.as_ref(),
            Color::Dark => self.black.as_ref(),
        }
    }

    /// Name used in notifications about `color`; falls back to the seat name
    /// when nobody holds it.
    pub fn display_name(&self, color: Color) -> String {
        self.holder(color)
            .map(|identity| identity.username().to_owned())
            .unwrap_or_else(|| color.seat_name().to_owned())
    }
}

#[async_trait]
pub trait IdentityResolver: Send + Sync {
    /// Fails with [`SessionError::Unauthorized`] for unknown tokens.
    async fn resolve(&self, auth_token: &str) -> Result<Identity, SessionError>;
}

#[async_trait]
pub trait MatchStore: Send + Sync {
    /// Fails with [`SessionError::MatchNotFound`] for unknown ids.
    async fn load_match(&self, match_id: MatchId) -> Result<MatchRecord, SessionError>;

    async fn save_match(&self, record: &MatchRecord) -> Result<(), SessionError>;
}
