//! Logical gamepad keys.

use bincode::{Decode, Encode};
use serde::{Deserialize, Serialize};

/// A logical gamepad button, or an axis treated as a button.
///
/// The discriminant order is the wire contract of the command protocol:
/// `K_DOWN|<n>` / `K_UP|<n>` name a key by the index returned from
/// [`GamepadKey::from_index`]. Do not reorder variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Encode, Decode)]
pub enum GamepadKey {
    /// Sentinel for unmapped keys. Never dispatched to a handler.
    Unknown,

    Y,
    B,
    A,
    X,
    Up,
    Right,
    Down,
    Left,
    Start,
    Select,
    LeftBumper,
    LeftTrigger,
    RightBumper,
    RightTrigger,
    Home,
    RightStick,
    LeftStick,
}

impl GamepadKey {
    /// Look up a key by its wire index. Returns `None` when out of range.
    #[must_use]
    pub fn from_index(index: u32) -> Option<Self> {
        Some(match index {
            0 => Self::Unknown,
            1 => Self::Y,
            2 => Self::B,
            3 => Self::A,
            4 => Self::X,
            5 => Self::Up,
            6 => Self::Right,
            7 => Self::Down,
            8 => Self::Left,
            9 => Self::Start,
            10 => Self::Select,
            11 => Self::LeftBumper,
            12 => Self::LeftTrigger,
            13 => Self::RightBumper,
            14 => Self::RightTrigger,
            15 => Self::Home,
            16 => Self::RightStick,
            17 => Self::LeftStick,
            _ => return None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_indices_match_protocol() {
        assert_eq!(GamepadKey::from_index(0), Some(GamepadKey::Unknown));
        assert_eq!(GamepadKey::from_index(2), Some(GamepadKey::B));
        assert_eq!(GamepadKey::from_index(3), Some(GamepadKey::A));
        assert_eq!(GamepadKey::from_index(12), Some(GamepadKey::LeftTrigger));
        assert_eq!(GamepadKey::from_index(17), Some(GamepadKey::LeftStick));
    }

    #[test]
    fn out_of_range_is_none() {
        assert_eq!(GamepadKey::from_index(18), None);
        assert_eq!(GamepadKey::from_index(999), None);
    }
}
