//! Producer-side transport: connect-on-demand frame sender.

use std::net::SocketAddr;

use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tracing::{debug, trace};
use touch_relay_types::Frame;

use crate::error::ProtocolError;
use crate::wire::encode_frame;

/// Sends frames to the privileged sink over localhost TCP.
///
/// The connection is opened lazily on the first send and reused afterwards.
/// Any I/O error discards the connection: the failed frame is lost (never
/// retried), and the next send attempt transparently reconnects. This lets
/// the long-lived producer tolerate sink helper restarts.
pub struct SinkClient {
    addr: SocketAddr,
    stream: Option<TcpStream>,
}

impl SinkClient {
    /// Create a client for the given sink address. Does not connect.
    #[must_use]
    pub fn new(addr: SocketAddr) -> Self {
        Self { addr, stream: None }
    }

    /// Whether a connection is currently held open.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.stream.is_some()
    }

    /// Send one frame, connecting first if necessary.
    ///
    /// On error the connection is dropped and the frame is considered lost.
    pub async fn send(&mut self, frame: &Frame) -> Result<(), ProtocolError> {
        let bytes = encode_frame(frame)?;

        if self.stream.is_none() {
            let stream = TcpStream::connect(self.addr)
                .await
                .map_err(|e| ProtocolError::Connection(e.to_string()))?;
            stream.set_nodelay(true)?;
            debug!(addr = %self.addr, "connected to sink");
            self.stream = Some(stream);
        }

        let stream = self
            .stream
            .as_mut()
            .ok_or(ProtocolError::StreamClosed)?;

        if let Err(e) = stream.write_all(&bytes).await {
            self.stream = None;
            return Err(ProtocolError::Connection(e.to_string()));
        }

        trace!(len = bytes.len(), action = ?frame.action, "sent frame");
        Ok(())
    }
}
