//! Shared types for touch-relay.
//!
//! This crate contains all types shared across the touch-relay workspace:
//! pointer frames, touch actions, gamepad keys, and the remote command
//! protocol messages.

pub mod command;
pub mod frame;
pub mod key;
pub mod point;

pub use command::{Command, CommandError, StickSide};
pub use frame::{Frame, PointerId, PointerSample, TouchAction, MAX_POINTERS};
pub use key::GamepadKey;
pub use point::Point;
