//! TCP transport: one JSON command per line in, one JSON frame per line out.
//!
//! Each accepted stream gets its own task. Outbound frames go through an
//! unbounded channel to a per-connection writer task, so broadcasts never
//! wait on a slow peer.

use std::collections::HashSet;
use std::net::SocketAddr;
use std::sync::Arc;

use futures::stream::SplitSink;
use futures::{SinkExt, StreamExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio_util::codec::{Framed, LinesCodec, LinesCodecError};

use crate::session::connection_registry::{Socket, SocketError};
use crate::session::errors::SessionError;
use crate::session::handler::SessionHandler;
use crate::session::protocol::ServerMessage;

const MAX_FRAME_LENGTH: usize = 64 * 1024;

/// Socket backed by the sending half of a connection's outbound channel.
#[derive(Debug, Clone)]
pub struct ChannelSocket {
    outbound: UnboundedSender<String>,
}

impl ChannelSocket {
    pub fn new(outbound: UnboundedSender<String>) -> Self {
        Self { outbound }
    }
}

impl Socket for ChannelSocket {
    fn is_open(&self) -> bool {
        !self.outbound.is_closed()
    }

    fn send(&self, text: &str) -> Result<(), SocketError> {
        self.outbound
            .send(text.to_owned())
            .map_err(|_| SocketError::Closed)
    }
}

/// Accepts connections until the task is dropped.
pub async fn serve(listener: TcpListener, handler: Arc<SessionHandler>) {
    loop {
        match listener.accept().await {
            Ok((stream, peer)) => {
                let handler = Arc::clone(&handler);
                tokio::spawn(async move {
                    handle_connection(stream, peer, handler).await;
                });
            }
            Err(err) => tracing::warn!(error = %err, "accept failed"),
        }
    }
}

async fn handle_connection(stream: TcpStream, peer: SocketAddr, handler: Arc<SessionHandler>) {
    tracing::info!(%peer, "client connected");
    let framed = Framed::new(stream, LinesCodec::new_with_max_length(MAX_FRAME_LENGTH));
    let (sink, mut lines) = framed.split();
    let (outbound, inbound) = mpsc::unbounded_channel();
    tokio::spawn(write_frames(sink, inbound, peer));

    let socket: Arc<dyn Socket> = Arc::new(ChannelSocket::new(outbound));
    let mut keys = HashSet::new();

    while let Some(line) = lines.next().await {
        match line {
            Ok(line) if line.trim().is_empty() => continue,
            Ok(line) => {
                if let Some(key) = handler.on_command(&socket, &line).await {
                    keys.insert(key);
                }
            }
            Err(LinesCodecError::MaxLineLengthExceeded) => {
                let err = SessionError::Decode(format!("frame longer than {MAX_FRAME_LENGTH} bytes"));
                if let Ok(frame) = ServerMessage::error(&err).to_json() {
                    // A failure here surfaces on the next read.
                    let _ = socket.send(&frame);
                }
            }
            Err(LinesCodecError::Io(err)) => {
                tracing::warn!(%peer, error = %err, "read failed");
                break;
            }
        }
    }

    for key in &keys {
        handler.registry().remove_socket(key, &socket);
    }
    tracing::info!(%peer, "client disconnected");
}

async fn write_frames(
    mut sink: SplitSink<Framed<TcpStream, LinesCodec>, String>,
    mut inbound: UnboundedReceiver<String>,
    peer: SocketAddr,
) {
    while let Some(frame) = inbound.recv().await {
        if let Err(err) = sink.send(frame).await {
            tracing::warn!(%peer, error = %err, "write failed");
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use tokio::sync::mpsc;

    use super::ChannelSocket;
    use crate::session::connection_registry::{Socket, SocketError};

    #[tokio::test]
    async fn channel_socket_forwards_until_the_receiver_drops() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let socket = ChannelSocket::new(tx);

        assert!(socket.is_open());
        socket.send("one").unwrap();
        assert_eq!(rx.recv().await.as_deref(), Some("one"));

        drop(rx);
        assert!(!socket.is_open());
        assert_eq!(socket.send("two"), Err(SocketError::Closed));
    }
}
