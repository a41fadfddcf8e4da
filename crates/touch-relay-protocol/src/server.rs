//! Consumer-side transport: single-client frame receiver.

use std::net::SocketAddr;

use tokio::io::AsyncReadExt;
use tokio::net::{TcpListener, TcpStream};
use tracing::{debug, info};
use touch_relay_types::Frame;

use crate::error::ProtocolError;
use crate::wire::{decode_frame, MAX_FRAME_SIZE};

/// Listens for the single producer connection on the sink port.
///
/// The consumer is a short-lived privileged helper: it accepts exactly one
/// client and any read error afterwards is fatal to the connection. There is
/// no reconnect logic on this side — the helper is respawned by its caller.
pub struct SinkServer {
    listener: TcpListener,
}

impl SinkServer {
    /// Bind the listening socket.
    pub async fn bind(addr: SocketAddr) -> Result<Self, ProtocolError> {
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| ProtocolError::Connection(e.to_string()))?;
        info!(addr = %addr, "sink listening");
        Ok(Self { listener })
    }

    /// Get the local address this server is bound to.
    pub fn local_addr(&self) -> Result<SocketAddr, ProtocolError> {
        self.listener
            .local_addr()
            .map_err(|e| ProtocolError::Connection(e.to_string()))
    }

    /// Accept the producer connection.
    pub async fn accept(&self) -> Result<FrameReceiver, ProtocolError> {
        let (stream, remote) = self
            .listener
            .accept()
            .await
            .map_err(|e| ProtocolError::Connection(e.to_string()))?;
        debug!(remote = %remote, "producer connected");
        Ok(FrameReceiver { stream })
    }
}

/// Reads length-prefixed frames from the accepted producer connection.
pub struct FrameReceiver {
    stream: TcpStream,
}

impl FrameReceiver {
    /// Receive and decode the next frame.
    ///
    /// Returns `None` when the producer has cleanly closed the connection.
    pub async fn recv(&mut self) -> Result<Option<Frame>, ProtocolError> {
        let mut len_buf = [0u8; 4];
        match self.stream.read_exact(&mut len_buf).await {
            Ok(_) => {}
            Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => return Ok(None),
            Err(e) => return Err(ProtocolError::Connection(e.to_string())),
        }

        let len = u32::from_be_bytes(len_buf);
        if len > MAX_FRAME_SIZE {
            return Err(ProtocolError::FrameTooLarge {
                size: len,
                max: MAX_FRAME_SIZE,
            });
        }

        let mut payload = vec![0u8; len as usize];
        match self.stream.read_exact(&mut payload).await {
            Ok(_) => {}
            Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                return Err(ProtocolError::StreamClosed);
            }
            Err(e) => return Err(ProtocolError::Connection(e.to_string())),
        }

        let frame = decode_frame(&payload)?;
        Ok(Some(frame))
    }
}
