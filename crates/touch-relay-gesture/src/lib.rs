//! Virtual stick coordinate mapping and gesture macros.
//!
//! A [`VirtualStick`] maps a normalized 2-D vector onto a fixed on-screen
//! region through a single multi-touch pointer; the [`GestureMapper`] turns
//! discrete gamepad events into canned sequences of stick and pin
//! operations with explicit inter-step delays.

pub mod layout;
pub mod mapper;
pub mod stick;

pub use layout::{Layout, PinTable, StickGeometry};
pub use mapper::{GestureMapper, InputHandler};
pub use stick::{StickMapping, VirtualStick};
