//! 2-D coordinate type.

use bincode::{Decode, Encode};
use serde::{Deserialize, Serialize};

/// A 2-D coordinate.
///
/// Used both for on-screen pixel positions and for normalized stick vectors
/// in the `[-1, 1]` range; which one is meant is determined by context.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    /// The origin. As a normalized stick vector this is the rest position.
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl std::fmt::Display for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}
