//! In-memory account and match store.
//!
//! Stands in for the external account/persistence layer in the server binary
//! and in tests. Tokens, matches and seats live in `DashMap`s and vanish on
//! restart.

use std::sync::atomic::{AtomicU32, Ordering};

use async_trait::async_trait;
use dashmap::DashMap;
use rand::distr::Alphanumeric;
use rand::Rng;

use crate::game_state::chess_types::Color;
use crate::session::collaborators::{Identity, IdentityResolver, MatchId, MatchRecord, MatchStore};
use crate::session::errors::SessionError;

const TOKEN_LENGTH: usize = 32;

#[derive(Debug)]
pub struct MemoryStore {
    tokens: DashMap<String, Identity>,
    matches: DashMap<MatchId, MatchRecord>,
    next_match_id: AtomicU32,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            tokens: DashMap::new(),
            matches: DashMap::new(),
            next_match_id: AtomicU32::new(1),
        }
    }

    /// Issues a fresh random token for `username`.
    pub fn issue_token(&self, username: &str) -> String {
        let token: String = rand::rng()
            .sample_iter(&Alphanumeric)
            .take(TOKEN_LENGTH)
            .map(char::from)
            .collect();
        self.insert_token(&token, username);
        token
    }

    pub fn insert_token(&self, token: &str, username: &str) {
        self.tokens.insert(token.to_owned(), Identity::new(username));
    }

    pub fn revoke_token(&self, token: &str) -> bool {
        self.tokens.remove(token).is_some()
    }

    /// Creates a match with the starting position and both seats open.
    pub fn create_match(&self, name: &str) -> MatchId {
        let match_id = MatchId(self.next_match_id.fetch_add(1, Ordering::Relaxed));
        self.matches.insert(match_id, MatchRecord::new(match_id, name));
        tracing::info!(%match_id, name, "match created");
        match_id
    }

    /// Seats `username` as `color`. Re-claiming one's own seat is a no-op.
    pub fn claim_seat(&self, match_id: MatchId, color: Color, username: &str) -> Result<(), SessionError> {
        let mut record = self
            .matches
            .get_mut(&match_id)
            .ok_or(SessionError::MatchNotFound(match_id))?;
        let identity = Identity::new(username);
        let seat = match color {
            Color::Light => &mut record.white,
            Color::Dark => &mut record.black,
        };
        if seat.as_ref().is_some_and(|holder| *holder != identity) {
            return Err(SessionError::SeatTaken);
        }
        *seat = Some(identity);
        Ok(())
    }

    pub fn match_ids(&self) -> Vec<MatchId> {
        let mut ids: Vec<MatchId> = self.matches.iter().map(|entry| *entry.key()).collect();
        ids.sort();
        ids
    }
}

#[async_trait]
impl IdentityResolver for MemoryStore {
    async fn resolve(&self, auth_token: &str) -> Result<Identity, SessionError> {
        self.tokens
            .get(auth_token)
            .map(|entry| entry.value().clone())
            .ok_or(SessionError::Unauthorized)
    }
}

#[async_trait]
impl MatchStore for MemoryStore {
    async fn load_match(&self, match_id: MatchId) -> Result<MatchRecord, SessionError> {
        self.matches
            .get(&match_id)
            .map(|entry| entry.value().clone())
            .ok_or(SessionError::MatchNotFound(match_id))
    }

    async fn save_match(&self, record: &MatchRecord) -> Result<(), SessionError> {
        let mut stored = self
            .matches
            .get_mut(&record.match_id)
            .ok_or(SessionError::MatchNotFound(record.match_id))?;
        *stored = record.clone();
        Ok(())
    }
}
