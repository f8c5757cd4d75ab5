//! Command dispatch for live matches.
//!
//! One [`SessionHandler`] is shared by every connection. Commands on the
//! same match run one at a time under that match's lock; other matches
//! proceed independently.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::Mutex;

use crate::game_state::chess_types::{ChessMove, Outcome};
use crate::session::collaborators::{Identity, IdentityResolver, MatchId, MatchStore};
use crate::session::connection_registry::{ConnectionRegistry, Socket};
use crate::session::errors::SessionError;
use crate::session::protocol::{CommandKind, ServerMessage, SessionKey, UserGameCommand};

pub struct SessionHandler {
    registry: Arc<ConnectionRegistry>,
    identities: Arc<dyn IdentityResolver>,
    matches: Arc<dyn MatchStore>,
    /// Only holds entries for matches with a command in flight.
    match_locks: DashMap<MatchId, Arc<Mutex<()>>>,
}

impl SessionHandler {
    pub fn new(
        registry: Arc<ConnectionRegistry>,
        identities: Arc<dyn IdentityResolver>,
        matches: Arc<dyn MatchStore>,
    ) -> Self {
        Self {
            registry,
            identities,
            matches,
            match_locks: DashMap::new(),
        }
    }

    pub fn registry(&self) -> &Arc<ConnectionRegistry> {
        &self.registry
    }

    /// Handles one raw frame from `socket`.
    ///
    /// Failures are reported to `socket` as an `ERROR` frame and never close
    /// the connection. Returns the session key `socket` was registered under
    /// when the frame was a successful CONNECT, `None` otherwise.
    pub async fn on_command(&self, socket: &Arc<dyn Socket>, raw: &str) -> Option<SessionKey> {
        let command = match UserGameCommand::decode(raw) {
            Ok(command) => command,
            Err(err) => {
                tracing::warn!(error = %err, "rejected frame");
                send_to(socket, &ServerMessage::error(&err));
                return None;
            }
        };

        let key = command.session_key();
        let match_id = command.match_id;
        let name = command.kind.name();
        let connecting = matches!(command.kind, CommandKind::Connect);

        match self.run(socket, &key, command).await {
            Ok(()) if connecting => Some(key),
            Ok(()) => None,
            Err(err) => {
                tracing::warn!(%key, %match_id, command = name, error = %err, "command rejected");
                self.reply(socket, &key, &ServerMessage::error(&err));
                None
            }
        }
    }

    async fn run(
        &self,
        socket: &Arc<dyn Socket>,
        key: &SessionKey,
        command: UserGameCommand,
    ) -> Result<(), SessionError> {
        let UserGameCommand {
            auth_token,
            match_id,
            kind,
        } = command;

        // Unknown tokens and matches are turned away before a lock exists.
        let identity = self.identities.resolve(&auth_token).await?;
        self.matches.load_match(match_id).await?;

        let lock = self.match_lock(match_id);
        let result = {
            let _guard = lock.lock().await;
            self.dispatch(socket, key, identity, match_id, kind).await
        };
        drop(lock);
        self.match_locks
            .remove_if(&match_id, |_, lock| Arc::strong_count(lock) == 1);
        result
    }

    fn match_lock(&self, match_id: MatchId) -> Arc<Mutex<()>> {
        Arc::clone(self.match_locks.entry(match_id).or_default().value())
    }

    async fn dispatch(
        &self,
        socket: &Arc<dyn Socket>,
        key: &SessionKey,
        identity: Identity,
        match_id: MatchId,
        kind: CommandKind,
    ) -> Result<(), SessionError> {
        match kind {
            CommandKind::Connect => self.connect(socket, key, identity, match_id).await,
            CommandKind::MakeMove { chess_move } => {
                self.make_move(key, identity, match_id, chess_move).await
            }
            CommandKind::Leave => self.leave(key, identity, match_id),
            CommandKind::Resign => self.resign(socket, key, identity, match_id).await,
        }
    }

    async fn connect(
        &self,
        socket: &Arc<dyn Socket>,
        key: &SessionKey,
        identity: Identity,
        match_id: MatchId,
    ) -> Result<(), SessionError> {
        let record = self.matches.load_match(match_id).await?;

        self.registry.add(key.clone(), match_id, Arc::clone(socket));
        if !self.reply(socket, key, &ServerMessage::load_game(&record.game)) {
            return Ok(());
        }

        let role = record
            .seat_of(&identity)
            .map_or("an observer", |color| color.seat_name());
        tracing::info!(%key, %match_id, user = %identity, role, "joined");
        self.broadcast(
            match_id,
            Some(key),
            &ServerMessage::notification(format!("{identity} joined the game as {role}")),
        )
    }

    async fn make_move(
        &self,
        key: &SessionKey,
        identity: Identity,
        match_id: MatchId,
        chess_move: ChessMove,
    ) -> Result<(), SessionError> {
        let mut record = self.matches.load_match(match_id).await?;

        if record.game.over {
            return Err(SessionError::GameOver);
        }
        let seat = record
            .seat_of(&identity)
            .ok_or_else(|| SessionError::Turn("observers cannot make moves".to_owned()))?;
        if seat != record.game.turn {
            return Err(SessionError::Turn(format!(
                "it is not your turn, {} to move",
                record.game.turn.seat_name()
            )));
        }

        record.game.make_move(chess_move)?;
        let outcome = record.game.conclude();
        self.matches.save_match(&record).await?;
        tracing::debug!(%match_id, user = %identity, mv = %chess_move, fen = %record.game.get_fen(), "move applied");

        self.broadcast(match_id, None, &ServerMessage::load_game(&record.game))?;
        self.broadcast(
            match_id,
            Some(key),
            &ServerMessage::notification(format!("{identity} moved {chess_move}")),
        )?;

        if let Some(outcome) = outcome {
            let (color, state) = match outcome {
                Outcome::Checkmate(color) => (color, "checkmate"),
                Outcome::Check(color) => (color, "check"),
                Outcome::Stalemate(color) => (color, "stalemate"),
            };
            if outcome.ends_game() {
                tracing::info!(%match_id, ?outcome, "game over");
            }
            let name = record.display_name(color);
            self.broadcast(
                match_id,
                None,
                &ServerMessage::notification(format!("{name} is in {state}")),
            )?;
        }
        Ok(())
    }

    fn leave(
        &self,
        key: &SessionKey,
        identity: Identity,
        match_id: MatchId,
    ) -> Result<(), SessionError> {
        if self.registry.remove_in_match(key, match_id).is_none() {
            return Err(SessionError::NotConnected(match_id));
        }
        tracing::info!(%key, %match_id, user = %identity, "left");
        self.broadcast(
            match_id,
            Some(key),
            &ServerMessage::notification(format!("{identity} left the game")),
        )
    }

    async fn resign(
        &self,
        socket: &Arc<dyn Socket>,
        key: &SessionKey,
        identity: Identity,
        match_id: MatchId,
    ) -> Result<(), SessionError> {
        let mut record = self.matches.load_match(match_id).await?;

        if record.game.over {
            return Err(SessionError::GameOver);
        }
        if record.seat_of(&identity).is_none() {
            return Err(SessionError::Turn("observers cannot resign".to_owned()));
        }

        record.game.resign()?;
        self.matches.save_match(&record).await?;
        tracing::info!(%match_id, user = %identity, "resigned");

        let notice = ServerMessage::notification(format!("{identity} resigned"));
        self.reply(socket, key, &notice);
        self.broadcast(match_id, Some(key), &notice)
    }

    fn broadcast(
        &self,
        match_id: MatchId,
        exclude: Option<&SessionKey>,
        message: &ServerMessage,
    ) -> Result<(), SessionError> {
        let frame = message.to_json()?;
        self.registry.broadcast(match_id, exclude, &frame);
        Ok(())
    }

    /// Writes to the sender directly. A failed write drops the sender's
    /// registration, as a failed broadcast would.
    fn reply(&self, socket: &Arc<dyn Socket>, key: &SessionKey, message: &ServerMessage) -> bool {
        let delivered = send_to(socket, message);
        if !delivered {
            self.registry.remove_socket(key, socket);
        }
        delivered
    }
}

fn send_to(socket: &Arc<dyn Socket>, message: &ServerMessage) -> bool {
    let frame = match message.to_json() {
        Ok(frame) => frame,
        Err(err) => {
            tracing::error!(error = %err, "could not encode reply");
            return false;
        }
    };
    match socket.send(&frame) {
        Ok(()) => true,
        Err(err) => {
            tracing::warn!(error = %err, "could not reply to sender");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::SessionHandler;
    use crate::game_state::chess_types::Color;
    use crate::session::collaborators::MatchId;
    use crate::session::connection_registry::{ConnectionRegistry, Socket};
    use crate::session::memory_store::MemoryStore;
    use crate::session::protocol::ServerMessage;
    use crate::session::testing::RecordingSocket;

    fn handler(store: &Arc<MemoryStore>) -> SessionHandler {
        SessionHandler::new(
            Arc::new(ConnectionRegistry::new()),
            store.clone(),
            store.clone(),
        )
    }

    fn command(kind: &str, token: &str, match_id: MatchId) -> String {
        format!(r#"{{"commandType":"{kind}","authToken":"{token}","gameID":{match_id}}}"#)
    }

    #[tokio::test]
    async fn connect_sends_the_board_to_the_caller_only() {
        let store = Arc::new(MemoryStore::new());
        let id = store.create_match("casual");
        store.insert_token("tok-alice", "alice");
        store.claim_seat(id, Color::Light, "alice").unwrap();
        let handler = handler(&store);

        let socket = RecordingSocket::new();
        let dyn_socket: Arc<dyn Socket> = socket.clone();
        let key = handler.on_command(&dyn_socket, &command("CONNECT", "tok-alice", id)).await;

        assert_eq!(key.map(|k| k.as_str().to_owned()), Some("tok-alice".to_owned()));
        assert!(matches!(socket.messages().as_slice(), [ServerMessage::LoadGame { .. }]));
        assert_eq!(handler.registry().len(), 1);
    }

    #[tokio::test]
    async fn undecodable_frames_get_an_error_and_no_key() {
        let store = Arc::new(MemoryStore::new());
        let handler = handler(&store);
        let socket = RecordingSocket::new();
        let dyn_socket: Arc<dyn Socket> = socket.clone();

        assert!(handler.on_command(&dyn_socket, "{").await.is_none());
        assert!(matches!(socket.messages().as_slice(), [ServerMessage::Error { .. }]));
        assert!(handler.registry().is_empty());
    }

    #[tokio::test]
    async fn only_a_successful_connect_reports_a_key() {
        let store = Arc::new(MemoryStore::new());
        let id = store.create_match("casual");
        store.insert_token("tok-alice", "alice");
        let handler = handler(&store);
        let socket: Arc<dyn Socket> = RecordingSocket::new();

        assert!(handler.on_command(&socket, &command("CONNECT", "tok-nobody", id)).await.is_none());
        assert!(handler.on_command(&socket, &command("CONNECT", "tok-alice", MatchId(42))).await.is_none());
        assert!(handler.on_command(&socket, &command("CONNECT", "tok-alice", id)).await.is_some());
        assert!(handler.on_command(&socket, &command("RESIGN", "tok-alice", id)).await.is_none());
        assert!(handler.on_command(&socket, &command("LEAVE", "tok-alice", id)).await.is_none());
    }

    #[tokio::test]
    async fn match_locks_do_not_outlive_their_commands() {
        let store = Arc::new(MemoryStore::new());
        let id = store.create_match("casual");
        store.insert_token("tok-alice", "alice");
        let handler = handler(&store);
        let socket: Arc<dyn Socket> = RecordingSocket::new();

        for unknown in 100..1100 {
            handler
                .on_command(&socket, &command("CONNECT", "tok-nobody", MatchId(unknown)))
                .await;
            handler
                .on_command(&socket, &command("CONNECT", "tok-alice", MatchId(unknown)))
                .await;
        }
        assert!(handler.match_locks.is_empty());

        handler.on_command(&socket, &command("CONNECT", "tok-alice", id)).await;
        handler.on_command(&socket, &command("LEAVE", "tok-alice", id)).await;
        assert!(handler.match_locks.is_empty());
    }

    #[tokio::test]
    async fn failed_direct_reply_drops_the_connection() {
        let store = Arc::new(MemoryStore::new());
        let id = store.create_match("casual");
        store.insert_token("tok-alice", "alice");
        store.insert_token("tok-bob", "bob");
        store.claim_seat(id, Color::Light, "alice").unwrap();
        let handler = handler(&store);

        let broken = RecordingSocket::new();
        broken.fail_writes();
        let broken_socket: Arc<dyn Socket> = broken.clone();
        handler.on_command(&broken_socket, &command("CONNECT", "tok-bob", id)).await;
        assert!(handler.registry().is_empty());

        let alice = RecordingSocket::new();
        let alice_socket: Arc<dyn Socket> = alice.clone();
        handler.on_command(&alice_socket, &command("CONNECT", "tok-alice", id)).await;
        assert_eq!(handler.registry().len(), 1);

        alice.fail_writes();
        handler.on_command(&alice_socket, &command("RESIGN", "tok-alice", id)).await;
        assert!(handler.registry().is_empty());
    }
}
