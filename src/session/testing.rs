//! Test doubles for the session layer.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use crate::session::connection_registry::{Socket, SocketError};
use crate::session::protocol::ServerMessage;

/// Socket that records every frame written to it.
#[derive(Debug, Default)]
pub struct RecordingSocket {
    frames: Mutex<Vec<String>>,
    closed: AtomicBool,
    failing: AtomicBool,
}

impl RecordingSocket {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Reports the socket as closed from now on.
    pub fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }

    /// Keeps the socket open but makes every write fail.
    pub fn fail_writes(&self) {
        self.failing.store(true, Ordering::SeqCst);
    }

    pub fn frames(&self) -> Vec<String> {
        self.frames.lock().map(|frames| frames.clone()).unwrap_or_default()
    }

    /// Recorded frames decoded back into messages; undecodable frames are skipped.
    pub fn messages(&self) -> Vec<ServerMessage> {
        self.frames()
            .iter()
            .filter_map(|frame| serde_json::from_str(frame).ok())
            .collect()
    }

    /// Drains and returns the recorded messages.
    pub fn take_messages(&self) -> Vec<ServerMessage> {
        let messages = self.messages();
        if let Ok(mut frames) = self.frames.lock() {
            frames.clear();
        }
        messages
    }
}

impl Socket for RecordingSocket {
    fn is_open(&self) -> bool {
        !self.closed.load(Ordering::SeqCst)
    }

    fn send(&self, text: &str) -> Result<(), SocketError> {
        if !self.is_open() {
            return Err(SocketError::Closed);
        }
        if self.failing.load(Ordering::SeqCst) {
            return Err(SocketError::Write("broken pipe".to_owned()));
        }
        self.frames
            .lock()
            .map_err(|e| SocketError::Write(e.to_string()))?
            .push(text.to_owned());
        Ok(())
    }
}
