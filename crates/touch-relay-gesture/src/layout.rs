//! On-screen control layout.
//!
//! Geometry of the virtual sticks and the pinned menu coordinates, loadable
//! from the session config. The defaults reproduce a 1920x1080 landscape
//! layout with the analog sticks in the lower corners and the pin menu
//! along the top-right edge.

use serde::{Deserialize, Serialize};
use touch_relay_types::{Point, PointerId};

use crate::stick::{StickMapping, VirtualStick};

/// Geometry of one virtual stick.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct StickGeometry {
    pub pointer: PointerId,
    pub center: Point,
    pub radius: f32,
    #[serde(default)]
    pub mapping: StickMapping,
}

impl StickGeometry {
    /// Build the stick this geometry describes.
    #[must_use]
    pub fn build(&self) -> VirtualStick {
        VirtualStick::new(self.pointer, self.center, self.radius, self.mapping)
    }
}

/// Named fixed on-screen coordinates used by the pin shortcut macros.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct PinTable {
    /// The pin that opens the selector; every shortcut taps this first.
    pub selector: Point,
    pub top_left: Point,
    pub top_center: Point,
    pub bottom_left: Point,
    pub bottom_center: Point,
    pub bottom_right: Point,
}

impl Default for PinTable {
    fn default() -> Self {
        Self {
            selector: Point::new(1870.0, 270.0),
            top_left: Point::new(1570.0, 270.0),
            top_center: Point::new(1720.0, 270.0),
            bottom_left: Point::new(1570.0, 400.0),
            bottom_center: Point::new(1720.0, 400.0),
            bottom_right: Point::new(1870.0, 400.0),
        }
    }
}

/// Full control layout for one session.
///
/// Pointer-id allocation is static: the left stick owns pointer 0, the
/// three right-hand sticks share pointer 1 (mutually exclusive via the
/// right-stick hand-off), and the pin macros use a reserved pointer that
/// must collide with neither while simultaneously active.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Layout {
    pub left_stick: StickGeometry,
    pub fire_stick: StickGeometry,
    pub special_stick: StickGeometry,
    pub gadget_stick: StickGeometry,
    pub pin_pointer: PointerId,
    pub pins: PinTable,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            left_stick: StickGeometry {
                pointer: PointerId(0),
                center: Point::new(360.0, 800.0),
                radius: 160.0,
                mapping: StickMapping::Polar,
            },
            fire_stick: StickGeometry {
                pointer: PointerId(1),
                center: Point::new(1780.0, 650.0),
                radius: 160.0,
                mapping: StickMapping::Polar,
            },
            special_stick: StickGeometry {
                pointer: PointerId(1),
                center: Point::new(1450.0, 770.0),
                radius: 280.0,
                mapping: StickMapping::Polar,
            },
            gadget_stick: StickGeometry {
                pointer: PointerId(1),
                center: Point::new(1618.0, 910.0),
                radius: 160.0,
                mapping: StickMapping::Polar,
            },
            pin_pointer: PointerId(2),
            pins: PinTable::default(),
        }
    }
}
