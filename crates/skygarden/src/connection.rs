//! A single accepted WebSocket connection.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::WebSocketStream;
use tokio_tungstenite::tungstenite::Message;

use crate::SkygardenError;

static NEXT_CONNECTION_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique id used to correlate log lines for one connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(u64);

impl ConnectionId {
    fn next() -> Self {
        Self(NEXT_CONNECTION_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

/// Text-frame view of a WebSocket stream.
///
/// Owned by exactly one handler task, so no locking is needed.
pub struct Connection {
    id: ConnectionId,
    ws: WebSocketStream<TcpStream>,
}

impl Connection {
    /// Completes the WebSocket upgrade on an accepted TCP stream.
    pub async fn accept(stream: TcpStream) -> Result<Self, SkygardenError> {
        let ws = tokio_tungstenite::accept_async(stream).await?;
        Ok(Self {
            id: ConnectionId::next(),
            ws,
        })
    }

    pub fn id(&self) -> ConnectionId {
        self.id
    }

    pub async fn send(&mut self, text: String) -> Result<(), SkygardenError> {
        self.ws.send(Message::Text(text.into())).await?;
        Ok(())
    }

    /// Next text payload, or `None` once the peer closes.
    ///
    /// Binary frames are accepted if they hold UTF-8; control frames are
    /// skipped.
    pub async fn recv(&mut self) -> Result<Option<String>, SkygardenError> {
        loop {
            match self.ws.next().await {
                Some(Ok(Message::Text(text))) => return Ok(Some(text.as_str().to_owned())),
                Some(Ok(Message::Binary(data))) => {
                    return match String::from_utf8(data.to_vec()) {
                        Ok(text) => Ok(Some(text)),
                        Err(_) => Err(skygarden_protocol::ProtocolError::InvalidMessage(
                            "binary frame is not UTF-8".into(),
                        )
                        .into()),
                    };
                }
                Some(Ok(Message::Close(_))) | None => return Ok(None),
                Some(Ok(_)) => continue,
                Some(Err(e)) => return Err(e.into()),
            }
        }
    }

    pub async fn close(&mut self) -> Result<(), SkygardenError> {
        match self.ws.close(None).await {
            Ok(()) => Ok(()),
            // Peer already gone.
            Err(tokio_tungstenite::tungstenite::Error::ConnectionClosed) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
