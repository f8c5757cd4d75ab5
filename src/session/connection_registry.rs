//! Live connections keyed by session key.
//!
//! The registry is an owned, injectable instance backed by a `DashMap`, so
//! adds, removes and broadcasts for different matches can run concurrently.
//! Broadcast never stops at a bad socket: failing or closed sockets are
//! pruned after the pass and everyone else still gets the frame.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use thiserror::Error;

use crate::session::collaborators::MatchId;
use crate::session::protocol::SessionKey;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SocketError {
    #[error("socket closed")]
    Closed,
    #[error("write failed: {0}")]
    Write(String),
}

/// Outbound half of a client connection. Writes must not block.
pub trait Socket: Send + Sync {
    fn is_open(&self) -> bool;

    fn send(&self, text: &str) -> Result<(), SocketError>;
}

#[derive(Clone)]
pub struct Connection {
    pub key: SessionKey,
    pub match_id: MatchId,
    pub socket: Arc<dyn Socket>,
    pub connected_at: DateTime<Utc>,
}

impl std::fmt::Debug for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection")
            .field("key", &self.key.to_string())
            .field("match_id", &self.match_id)
            .field("connected_at", &self.connected_at)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Default)]
pub struct ConnectionRegistry {
    connections: DashMap<SessionKey, Connection>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `socket` for `key`, replacing any earlier connection under
    /// the same key.
    pub fn add(&self, key: SessionKey, match_id: MatchId, socket: Arc<dyn Socket>) {
        let connection = Connection {
            key: key.clone(),
            match_id,
            socket,
            connected_at: Utc::now(),
        };
        if let Some(previous) = self.connections.insert(key, connection) {
            tracing::debug!(key = %previous.key, match_id = %previous.match_id, "replaced connection");
        }
    }

    pub fn remove(&self, key: &SessionKey) -> Option<Connection> {
        self.connections.remove(key).map(|(_, connection)| connection)
    }

    /// Removes `key` only if it is registered in `match_id`.
    pub fn remove_in_match(&self, key: &SessionKey, match_id: MatchId) -> Option<Connection> {
        self.connections
            .remove_if(key, |_, connection| connection.match_id == match_id)
            .map(|(_, connection)| connection)
    }

    pub fn get(&self, key: &SessionKey) -> Option<Connection> {
        self.connections.get(key).map(|entry| entry.value().clone())
    }

    pub fn len(&self) -> usize {
        self.connections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }

    pub fn keys_in_match(&self, match_id: MatchId) -> Vec<SessionKey> {
        self.connections
            .iter()
            .filter(|entry| entry.match_id == match_id)
            .map(|entry| entry.key().clone())
            .collect()
    }

    /// Sends `message` to every connection in `match_id` except `exclude`
    /// (`None` sends to all). Returns how many sockets accepted the frame.
    pub fn broadcast(&self, match_id: MatchId, exclude: Option<&SessionKey>, message: &str) -> usize {
        // Snapshot first so no map shard stays locked during socket writes.
        let targets: Vec<(SessionKey, Arc<dyn Socket>)> = self
            .connections
            .iter()
            .filter(|entry| entry.match_id == match_id && Some(entry.key()) != exclude)
            .map(|entry| (entry.key().clone(), Arc::clone(&entry.socket)))
            .collect();

        let mut delivered = 0;
        let mut stale = Vec::new();
        for (key, socket) in targets {
            if !socket.is_open() {
                stale.push((key, socket));
                continue;
            }
            match socket.send(message) {
                Ok(()) => delivered += 1,
                Err(err) => {
                    tracing::warn!(%key, %match_id, error = %err, "dropping connection after failed write");
                    stale.push((key, socket));
                }
            }
        }

        for (key, socket) in stale {
            self.remove_socket(&key, &socket);
        }

        delivered
    }

    /// Removes `key` only while it is still registered to `socket`; a
    /// reconnect under the same key may have replaced the entry meanwhile.
    pub fn remove_socket(&self, key: &SessionKey, socket: &Arc<dyn Socket>) -> bool {
        let removed = self
            .connections
            .remove_if(key, |_, connection| same_socket(&connection.socket, socket));
        match removed {
            Some((_, connection)) => {
                let lived = Utc::now().signed_duration_since(connection.connected_at);
                tracing::info!(%key, match_id = %connection.match_id, seconds = lived.num_seconds(), "connection removed");
                true
            }
            None => false,
        }
    }
}

fn same_socket(a: &Arc<dyn Socket>, b: &Arc<dyn Socket>) -> bool {
    std::ptr::eq(Arc::as_ptr(a) as *const (), Arc::as_ptr(b) as *const ())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::{ConnectionRegistry, Socket};
    use crate::session::collaborators::MatchId;
    use crate::session::protocol::SessionKey;
    use crate::session::testing::RecordingSocket;

    fn key(name: &str) -> SessionKey {
        SessionKey::new(name)
    }

    #[test]
    fn broadcast_reaches_only_the_named_match() {
        let registry = ConnectionRegistry::new();
        let a = RecordingSocket::new();
        let b = RecordingSocket::new();
        let other = RecordingSocket::new();
        registry.add(key("a"), MatchId(1), a.clone());
        registry.add(key("b"), MatchId(1), b.clone());
        registry.add(key("c"), MatchId(2), other.clone());

        assert_eq!(registry.broadcast(MatchId(1), None, "hello"), 2);
        assert_eq!(a.frames(), vec!["hello"]);
        assert_eq!(b.frames(), vec!["hello"]);
        assert!(other.frames().is_empty());
    }

    #[test]
    fn broadcast_skips_the_excluded_key() {
        let registry = ConnectionRegistry::new();
        let a = RecordingSocket::new();
        let b = RecordingSocket::new();
        registry.add(key("a"), MatchId(1), a.clone());
        registry.add(key("b"), MatchId(1), b.clone());

        assert_eq!(registry.broadcast(MatchId(1), Some(&key("a")), "moved"), 1);
        assert!(a.frames().is_empty());
        assert_eq!(b.frames(), vec!["moved"]);
    }

    #[test]
    fn failed_and_closed_sockets_are_pruned_without_stopping_delivery() {
        let registry = ConnectionRegistry::new();
        let broken = RecordingSocket::new();
        let closed = RecordingSocket::new();
        let healthy = RecordingSocket::new();
        registry.add(key("broken"), MatchId(4), broken.clone());
        registry.add(key("closed"), MatchId(4), closed.clone());
        registry.add(key("healthy"), MatchId(4), healthy.clone());
        broken.fail_writes();
        closed.close();

        assert_eq!(registry.broadcast(MatchId(4), None, "frame"), 1);
        assert_eq!(healthy.frames(), vec!["frame"]);
        assert_eq!(registry.keys_in_match(MatchId(4)), vec![key("healthy")]);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn re_adding_a_key_replaces_the_socket() {
        let registry = ConnectionRegistry::new();
        let first = RecordingSocket::new();
        let second = RecordingSocket::new();
        registry.add(key("a"), MatchId(1), first.clone());
        registry.add(key("a"), MatchId(2), second.clone());

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get(&key("a")).map(|c| c.match_id), Some(MatchId(2)));
        registry.broadcast(MatchId(2), None, "x");
        assert!(first.frames().is_empty());
        assert_eq!(second.frames(), vec!["x"]);
    }

    #[test]
    fn remove_socket_leaves_a_replacement_alone() {
        let registry = ConnectionRegistry::new();
        let old: Arc<dyn Socket> = RecordingSocket::new();
        let new: Arc<dyn Socket> = RecordingSocket::new();
        registry.add(key("a"), MatchId(1), Arc::clone(&old));
        registry.add(key("a"), MatchId(1), Arc::clone(&new));

        assert!(!registry.remove_socket(&key("a"), &old));
        assert_eq!(registry.len(), 1);
        assert!(registry.remove_socket(&key("a"), &new));
        assert!(registry.is_empty());
    }

    #[test]
    fn remove_in_match_ignores_other_matches() {
        let registry = ConnectionRegistry::new();
        let socket: Arc<dyn Socket> = RecordingSocket::new();
        registry.add(key("a"), MatchId(1), socket);

        assert!(registry.remove_in_match(&key("a"), MatchId(2)).is_none());
        assert_eq!(registry.keys_in_match(MatchId(1)), vec![key("a")]);
        assert!(registry.remove_in_match(&key("a"), MatchId(1)).is_some());
        assert!(registry.is_empty());
    }

    #[test]
    fn remove_reports_whether_anything_was_registered() {
        let registry = ConnectionRegistry::new();
        let socket: Arc<dyn Socket> = RecordingSocket::new();
        registry.add(key("a"), MatchId(1), socket);
        assert!(registry.remove(&key("a")).is_some());
        assert!(registry.remove(&key("a")).is_none());
        assert!(registry.is_empty());
    }
}
