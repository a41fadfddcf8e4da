//! Virtual analog stick.

use serde::{Deserialize, Serialize};
use touch_relay_injector::Injector;
use touch_relay_types::{Point, PointerId};
use tracing::debug;

/// Settle delay added when the first contact lands on the stick center.
const SETTLE_DELAY_MS: u64 = 10;

/// How a normalized stick vector maps onto the stick's screen region.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StickMapping {
    /// Circular excursion. The +90° rotation aligns "up" on the stick with
    /// screen-up; it must be preserved exactly for visual correctness.
    #[default]
    Polar,
    /// Independent per-axis excursion over the bounding square.
    Square,
}

/// A software analog control mapped onto a fixed on-screen region.
///
/// State machine: released -> pressed -> released, with `move_to` legal in
/// either state. Constructed once per logical control; geometry never
/// changes afterwards.
pub struct VirtualStick {
    pointer: PointerId,
    center: Point,
    radius: f32,
    mapping: StickMapping,
    pressed: bool,
    /// Last normalized vector, not a screen coordinate.
    last_pos: Point,
}

impl VirtualStick {
    #[must_use]
    pub fn new(pointer: PointerId, center: Point, radius: f32, mapping: StickMapping) -> Self {
        Self {
            pointer,
            center,
            radius,
            mapping,
            pressed: false,
            last_pos: Point::ZERO,
        }
    }

    /// Convert a normalized vector in `[-1, 1]` to a screen coordinate.
    ///
    /// Offsets are truncated to whole pixels, matching the injected
    /// platform events.
    fn to_screen(&self, vx: f32, vy: f32) -> Point {
        match self.mapping {
            StickMapping::Polar => {
                let angle = f64::from(vy).atan2(f64::from(vx)) + std::f64::consts::FRAC_PI_2;
                let hypot = f64::from(vx).hypot(f64::from(vy));
                let dx = (angle.sin() * f64::from(self.radius) * hypot).trunc();
                let dy = (angle.cos() * f64::from(self.radius) * hypot).trunc();
                #[allow(clippy::cast_possible_truncation)]
                Point::new(self.center.x + dx as f32, self.center.y + dy as f32)
            }
            StickMapping::Square => {
                let x = (self.center.x - self.radius + (vx + 1.0) * self.radius).trunc();
                let y = (self.center.y - self.radius + (vy + 1.0) * self.radius).trunc();
                Point::new(x, y)
            }
        }
    }

    /// Glide the stick to the normalized vector `v`.
    ///
    /// A released stick first touches down at its center (first contact
    /// lands in the middle, then glides) with a settle delay on top of
    /// `extra_delay_ms`. Repeating the last vector is a no-op, so identical
    /// axis readings never produce redundant move frames.
    pub fn move_to(&mut self, injector: &mut Injector, v: Point, mut extra_delay_ms: u64) {
        if !self.pressed {
            debug!(pointer = %self.pointer, center = %self.center, "stick down");
            injector.touch_down(self.pointer, self.center);
            self.last_pos = Point::ZERO;
            self.pressed = true;
            extra_delay_ms += SETTLE_DELAY_MS;
        }

        if v == self.last_pos {
            return;
        }

        let to = self.to_screen(v.x, v.y);
        debug!(pointer = %self.pointer, to = %to, "stick move");

        if extra_delay_ms > 0 {
            injector.add_delay(extra_delay_ms);
        }
        injector.touch_move(self.pointer, to);
        self.last_pos = v;
    }

    /// Glide back to the rest position.
    pub fn move_to_center(&mut self, injector: &mut Injector, extra_delay_ms: u64) {
        self.move_to(injector, Point::ZERO, extra_delay_ms);
    }

    /// Tap in place: down at center if released (plus settle delay), then
    /// always up. Ends released regardless of the prior state.
    pub fn press(&mut self, injector: &mut Injector) {
        debug!(pointer = %self.pointer, "stick press");

        if !self.pressed {
            injector.touch_down(self.pointer, self.center);
            injector.add_delay(SETTLE_DELAY_MS);
        }

        injector.touch_up(self.pointer);
        self.last_pos = Point::ZERO;
        self.pressed = false;
    }

    /// Lift the stick's contact. Idempotent on a released stick.
    pub fn release(&mut self, injector: &mut Injector) {
        if !self.pressed {
            return;
        }

        debug!(pointer = %self.pointer, "stick up");
        injector.touch_up(self.pointer);
        self.pressed = false;
    }

    #[must_use]
    pub fn is_pressed(&self) -> bool {
        self.pressed
    }

    /// The last normalized vector. Callers needing a screen coordinate must
    /// re-derive it through the mapping.
    #[must_use]
    pub fn position(&self) -> Point {
        self.last_pos
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use touch_relay_injector::mock::MockSink;
    use touch_relay_injector::{OverflowPolicy, DEFAULT_QUEUE_CAPACITY};
    use touch_relay_types::TouchAction;

    fn start_injector() -> (Injector, touch_relay_injector::mock::MockSinkHandle) {
        let sink = MockSink::new();
        let handle = sink.handle();
        let injector = Injector::start(
            Box::new(sink),
            DEFAULT_QUEUE_CAPACITY,
            OverflowPolicy::Reject,
        );
        (injector, handle)
    }

    fn test_stick() -> VirtualStick {
        VirtualStick::new(
            PointerId(0),
            Point::new(360.0, 800.0),
            160.0,
            StickMapping::Polar,
        )
    }

    #[tokio::test(start_paused = true)]
    async fn first_move_touches_down_at_center() {
        let (mut injector, handle) = start_injector();
        let mut stick = test_stick();

        stick.move_to(&mut injector, Point::new(0.0, 1.0), 0);
        assert!(stick.is_pressed());
        injector.shutdown().await;

        let frames = handle.frames();
        assert_eq!(frames.len(), 2);

        assert_eq!(frames[0].0.action, TouchAction::Down);
        assert_eq!(frames[0].0.pointers[0].pos, Point::new(360.0, 800.0));

        // Polar mapping: angle = atan2(1, 0) + 90° = 180°, hypot = 1, so the
        // contact glides straight up by one radius.
        assert_eq!(frames[1].0.action, TouchAction::Move);
        assert_eq!(frames[1].0.pointers[0].pos, Point::new(360.0, 640.0));
        // Settle delay rides on the move frame.
        assert_eq!(frames[1].0.delay_ms, 1 + SETTLE_DELAY_MS);
    }

    #[tokio::test(start_paused = true)]
    async fn repeated_vector_is_a_no_op() {
        let (mut injector, handle) = start_injector();
        let mut stick = test_stick();

        stick.move_to(&mut injector, Point::new(0.5, 0.5), 0);
        stick.move_to(&mut injector, Point::new(0.5, 0.5), 0);
        injector.shutdown().await;

        let frames = handle.frames();
        let moves = frames
            .iter()
            .filter(|(f, _)| f.action == TouchAction::Move)
            .count();
        assert_eq!(moves, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn press_always_ends_released() {
        let (mut injector, handle) = start_injector();
        let mut stick = test_stick();

        // From released.
        stick.press(&mut injector);
        assert!(!stick.is_pressed());

        // From pressed.
        stick.move_to(&mut injector, Point::new(1.0, 0.0), 0);
        assert!(stick.is_pressed());
        stick.press(&mut injector);
        assert!(!stick.is_pressed());
        assert_eq!(stick.position(), Point::ZERO);
        injector.shutdown().await;

        let frames = handle.frames();
        let actions: Vec<TouchAction> = frames.iter().map(|(f, _)| f.action).collect();
        assert_eq!(
            actions,
            vec![
                TouchAction::Down,
                TouchAction::Up,
                TouchAction::Down,
                TouchAction::Move,
                TouchAction::Up,
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn release_is_idempotent() {
        let (mut injector, handle) = start_injector();
        let mut stick = test_stick();

        stick.release(&mut injector);
        stick.move_to(&mut injector, Point::new(1.0, 0.0), 0);
        stick.release(&mut injector);
        stick.release(&mut injector);
        injector.shutdown().await;

        let ups = handle
            .frames()
            .iter()
            .filter(|(f, _)| f.action == TouchAction::Up)
            .count();
        assert_eq!(ups, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn square_mapping_moves_per_axis() {
        let (mut injector, handle) = start_injector();
        let mut stick = VirtualStick::new(
            PointerId(0),
            Point::new(360.0, 800.0),
            160.0,
            StickMapping::Square,
        );

        stick.move_to(&mut injector, Point::new(1.0, -1.0), 0);
        injector.shutdown().await;

        let frames = handle.frames();
        assert_eq!(frames[1].0.pointers[0].pos, Point::new(520.0, 640.0));
    }

    #[test]
    fn polar_mapping_cardinal_directions() {
        let stick = test_stick();
        // Right.
        assert_eq!(stick.to_screen(1.0, 0.0), Point::new(520.0, 800.0));
        // Up (vy = 1 after the source's axis normalization).
        assert_eq!(stick.to_screen(0.0, 1.0), Point::new(360.0, 640.0));
        // Rest.
        assert_eq!(stick.to_screen(0.0, 0.0), Point::new(360.0, 800.0));
    }
}
