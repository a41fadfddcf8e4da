//! Pointer frame model.
//!
//! A [`Frame`] is one timed, multi-pointer touch event: the unit queued by
//! the producer and transmitted across the process boundary to the
//! privileged sink.

use bincode::{Decode, Encode};
use serde::{Deserialize, Serialize};

use crate::point::Point;

/// Maximum number of simultaneously active pointers in a frame.
///
/// Matches the common platform cap on simultaneous touch contacts.
pub const MAX_POINTERS: usize = 10;

/// Stable identity of one active touch contact.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Encode, Decode,
)]
pub struct PointerId(pub u8);

impl std::fmt::Display for PointerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Immutable snapshot of one contact inside a frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct PointerSample {
    pub id: PointerId,
    pub pos: Point,
}

/// The gesture action a frame carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub enum TouchAction {
    /// First contact went down (pointer table size 1).
    Down,
    /// An additional contact went down while others are active.
    PointerDown,
    /// An active contact moved.
    Move,
    /// The last contact lifted (pointer table size 1).
    Up,
    /// A contact lifted while others remain active.
    PointerUp,
    /// Abandon all active contacts.
    Cancel,
    /// Queue-termination sentinel. Never transmitted on the wire.
    Stop,
}

/// One timed, multi-pointer touch event.
///
/// Immutable once enqueued. Invariant: the pointer whose event triggered the
/// frame occupies slot 0 of `pointers` — the sink derives single- vs
/// multi-pointer action codes from slot-0 identity, so builders must not
/// reorder the snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct Frame {
    pub action: TouchAction,
    pub pointers: Vec<PointerSample>,
    /// Minimum milliseconds to elapse after the previously sent frame
    /// before this one is transmitted.
    pub delay_ms: u64,
}

impl Frame {
    /// The sentinel frame that terminates the delivery worker.
    #[must_use]
    pub fn stop() -> Self {
        Self {
            action: TouchAction::Stop,
            pointers: Vec::new(),
            delay_ms: 0,
        }
    }

    /// The pointer that triggered this frame, if any.
    #[must_use]
    pub fn trigger(&self) -> Option<PointerId> {
        self.pointers.first().map(|p| p.id)
    }
}
