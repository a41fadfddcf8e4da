//! Wire format: length-prefixed bincode v2 frames.
//!
//! Each frame on the wire is:
//!   [4 bytes big-endian length][bincode v2 payload]
//!
//! No handshake, no acknowledgment: the transport is trusted localhost TCP.

use touch_relay_types::Frame;

use crate::error::ProtocolError;

/// Maximum frame size (64 KiB). Prevents allocation bombs; a frame holds at
/// most [`touch_relay_types::MAX_POINTERS`] samples and fits easily.
pub const MAX_FRAME_SIZE: u32 = 64 * 1024;

/// Encode a frame to a length-prefixed byte vector.
pub fn encode_frame(frame: &Frame) -> Result<Vec<u8>, ProtocolError> {
    let config = bincode::config::standard();
    let payload = bincode::encode_to_vec(frame, config)
        .map_err(|e| ProtocolError::Serialization(e.to_string()))?;

    let len = u32::try_from(payload.len())
        .map_err(|_| ProtocolError::Serialization("frame too large".to_string()))?;
    if len > MAX_FRAME_SIZE {
        return Err(ProtocolError::FrameTooLarge {
            size: len,
            max: MAX_FRAME_SIZE,
        });
    }

    let mut buf = Vec::with_capacity(4 + payload.len());
    buf.extend_from_slice(&len.to_be_bytes());
    buf.extend_from_slice(&payload);
    Ok(buf)
}

/// Decode a frame from a bincode v2 payload (without the length prefix).
pub fn decode_frame(payload: &[u8]) -> Result<Frame, ProtocolError> {
    let config = bincode::config::standard();
    let (frame, _) = bincode::decode_from_slice(payload, config)
        .map_err(|e| ProtocolError::Deserialization(e.to_string()))?;
    Ok(frame)
}
