//! Injection errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum InjectError {
    #[error("transport error: {0}")]
    Transport(#[from] touch_relay_protocol::ProtocolError),

    #[error("sink rejected frame: {0}")]
    Rejected(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
