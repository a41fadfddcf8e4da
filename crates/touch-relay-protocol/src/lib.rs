//! Wire codec and localhost TCP transport for touch-relay.
//!
//! Each frame travels as a 4-byte big-endian length prefix followed by a
//! bincode v2 payload. The producer side ([`SinkClient`]) connects lazily
//! and self-heals by reconnecting on the next send after an I/O error; the
//! consumer side ([`SinkServer`]) is single-client and treats any read
//! error as fatal.

pub mod client;
pub mod error;
pub mod server;
pub mod wire;

pub use client::SinkClient;
pub use error::ProtocolError;
pub use server::{FrameReceiver, SinkServer};
