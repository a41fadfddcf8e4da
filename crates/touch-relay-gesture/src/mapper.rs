//! Gesture macro engine.
//!
//! Maps discrete gamepad events to ordered sequences of stick and pin
//! operations with explicit inter-step delays.

use touch_relay_injector::Injector;
use touch_relay_types::{GamepadKey, Point, PointerId, StickSide};
use tracing::debug;

use crate::layout::{Layout, PinTable};
use crate::stick::VirtualStick;

/// Delay before restoring a stick position after a tap-in-place.
const TAP_RESTORE_DELAY_MS: u64 = 30;
/// Duration of a restoring or centering glide.
const GLIDE_MS: u64 = 50;
/// Pause between the pin taps of a shortcut.
const PIN_GAP_MS: u64 = 50;
/// Hold time of a single pin tap.
const PIN_TAP_MS: u64 = 10;

/// Consumes logical gamepad events and drives the injector.
///
/// The two event sources (gamepad callbacks and the command socket) are
/// never active concurrently against one handler; callers serialize access.
pub trait InputHandler: Send {
    fn on_key(&mut self, injector: &mut Injector, key: GamepadKey, pressed: bool);
    fn on_stick_move(&mut self, injector: &mut Injector, side: StickSide, x: f32, y: f32);
    /// Release everything and clear in-flight touch state.
    fn reset(&mut self, injector: &mut Injector);
}

/// The standard four-stick battle layout mapper.
pub struct GestureMapper {
    left_stick: VirtualStick,
    fire_stick: VirtualStick,
    special_stick: VirtualStick,
    gadget_stick: VirtualStick,
    pin_pointer: PointerId,
    pins: PinTable,
    /// Which of the two right-hand sticks currently owns pointer 1.
    special_mode: bool,
}

impl GestureMapper {
    #[must_use]
    pub fn new(layout: &Layout) -> Self {
        Self {
            left_stick: layout.left_stick.build(),
            fire_stick: layout.fire_stick.build(),
            special_stick: layout.special_stick.build(),
            gadget_stick: layout.gadget_stick.build(),
            pin_pointer: layout.pin_pointer,
            pins: layout.pins,
            special_mode: false,
        }
    }

    fn right_stick(&mut self) -> &mut VirtualStick {
        if self.special_mode {
            &mut self.special_stick
        } else {
            &mut self.fire_stick
        }
    }

    /// Tap a stick, then restore its prior analog position.
    ///
    /// A face button can share a pointer slot with an analog stick; without
    /// the restore, tapping the button would visually lose the held
    /// direction.
    fn press_in_place(injector: &mut Injector, stick: &mut VirtualStick) {
        let was_pressed = stick.is_pressed();
        let old_pos = stick.position();

        stick.press(injector);

        if was_pressed {
            injector.add_delay(TAP_RESTORE_DELAY_MS);
            stick.move_to(injector, old_pos, GLIDE_MS);
        }
    }

    /// The fixed pin shortcut choreography: tap the selector, then tap the
    /// destination, on the reserved pointer.
    fn press_pin(&mut self, injector: &mut Injector, pin: Point) {
        injector.touch_down(self.pin_pointer, self.pins.selector);
        injector.add_delay(PIN_TAP_MS);
        injector.touch_up(self.pin_pointer);

        injector.add_delay(PIN_GAP_MS);

        injector.touch_down(self.pin_pointer, pin);
        injector.add_delay(PIN_TAP_MS);
        injector.touch_up(self.pin_pointer);
    }

    /// Hand the physical right-stick pointer over between the fire and
    /// special sticks. No-op when the mode is unchanged.
    fn swap_right_stick(&mut self, injector: &mut Injector, special: bool) {
        if self.special_mode == special {
            return;
        }

        debug!(special, "right stick hand-off");
        let old_stick = self.right_stick();
        let was_pressed = old_stick.is_pressed();
        self.special_mode = special;

        if was_pressed {
            let old_stick = if special {
                &mut self.fire_stick
            } else {
                &mut self.special_stick
            };
            old_stick.move_to_center(injector, GLIDE_MS);
            injector.add_delay(GLIDE_MS);
            old_stick.release(injector);
        }
    }
}

impl InputHandler for GestureMapper {
    fn on_key(&mut self, injector: &mut Injector, key: GamepadKey, pressed: bool) {
        if key == GamepadKey::LeftTrigger {
            self.swap_right_stick(injector, pressed);
            return;
        }

        if !pressed {
            return;
        }

        match key {
            GamepadKey::B | GamepadKey::RightTrigger => {
                Self::press_in_place(injector, self.right_stick());
            }
            GamepadKey::A => self.special_stick.press(injector),
            GamepadKey::Y => self.gadget_stick.press(injector),
            GamepadKey::Home => self.reset(injector),

            GamepadKey::Up => self.press_pin(injector, self.pins.bottom_right),
            GamepadKey::Left => self.press_pin(injector, self.pins.top_left),
            GamepadKey::Right => self.press_pin(injector, self.pins.top_center),
            GamepadKey::Down => self.press_pin(injector, self.pins.bottom_center),
            GamepadKey::Select => self.press_pin(injector, self.pins.bottom_left),

            _ => {}
        }
    }

    fn on_stick_move(&mut self, injector: &mut Injector, side: StickSide, x: f32, y: f32) {
        let stick = match side {
            StickSide::Left => &mut self.left_stick,
            StickSide::Right => self.right_stick(),
        };

        if x != 0.0 || y != 0.0 {
            stick.move_to(injector, Point::new(x, y), 0);
        } else if stick.is_pressed() {
            // Axis returned to rest: glide home, then lift.
            stick.move_to_center(injector, GLIDE_MS);
            injector.add_delay(20);
            stick.release(injector);
            injector.add_delay(20);
        }
    }

    fn reset(&mut self, injector: &mut Injector) {
        self.left_stick.release(injector);
        self.fire_stick.release(injector);
        self.special_stick.release(injector);
        self.gadget_stick.release(injector);

        injector.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use touch_relay_injector::mock::{MockSink, MockSinkHandle};
    use touch_relay_injector::{OverflowPolicy, DEFAULT_QUEUE_CAPACITY};
    use touch_relay_types::{Frame, TouchAction};

    fn setup() -> (Injector, MockSinkHandle, GestureMapper) {
        let sink = MockSink::new();
        let handle = sink.handle();
        let injector = Injector::start(
            Box::new(sink),
            DEFAULT_QUEUE_CAPACITY,
            OverflowPolicy::Reject,
        );
        let mapper = GestureMapper::new(&Layout::default());
        (injector, handle, mapper)
    }

    fn actions(frames: &[(Frame, tokio::time::Instant)]) -> Vec<TouchAction> {
        frames.iter().map(|(f, _)| f.action).collect()
    }

    #[tokio::test(start_paused = true)]
    async fn face_button_taps_the_right_stick() {
        let (mut injector, handle, mut mapper) = setup();

        mapper.on_key(&mut injector, GamepadKey::B, true);
        // Releases are ignored for everything but the hand-off trigger.
        mapper.on_key(&mut injector, GamepadKey::B, false);
        injector.shutdown().await;

        let frames = handle.frames();
        assert_eq!(actions(&frames), vec![TouchAction::Down, TouchAction::Up]);
        // Fire stick center: the right stick defaults to fire mode.
        assert_eq!(frames[0].0.pointers[0].pos, Point::new(1780.0, 650.0));
    }

    #[tokio::test(start_paused = true)]
    async fn tap_in_place_restores_held_direction() {
        let (mut injector, handle, mut mapper) = setup();

        // Hold the right stick up-right, then tap B on the same pointer.
        mapper.on_stick_move(&mut injector, StickSide::Right, 1.0, 0.0);
        mapper.on_key(&mut injector, GamepadKey::B, true);
        injector.shutdown().await;

        let frames = handle.frames();
        assert_eq!(
            actions(&frames),
            vec![
                TouchAction::Down,
                TouchAction::Move,
                TouchAction::Up,
                TouchAction::Down,
                TouchAction::Move,
            ]
        );

        // The final move restores the held direction at the fire stick edge.
        let restored = frames[4].0.pointers[0].pos;
        assert_eq!(restored, Point::new(1940.0, 650.0));
        // The re-press waits out the tap-restore delay.
        assert_eq!(frames[3].0.delay_ms, 1 + TAP_RESTORE_DELAY_MS);
        // The restoring move carries the settle delay plus the glide.
        assert_eq!(frames[4].0.delay_ms, 1 + 10 + GLIDE_MS);
    }

    #[tokio::test(start_paused = true)]
    async fn pin_shortcut_runs_the_four_step_choreography() {
        let (mut injector, handle, mut mapper) = setup();

        mapper.on_key(&mut injector, GamepadKey::Left, true);
        injector.shutdown().await;

        let frames = handle.frames();
        assert_eq!(
            actions(&frames),
            vec![
                TouchAction::Down,
                TouchAction::Up,
                TouchAction::Down,
                TouchAction::Up,
            ]
        );

        // All four taps ride the reserved pin pointer.
        for (frame, _) in &frames {
            assert_eq!(frame.trigger(), Some(PointerId(2)));
        }
        // Selector first, then the destination pin.
        assert_eq!(frames[0].0.pointers[0].pos, Point::new(1870.0, 270.0));
        assert_eq!(frames[2].0.pointers[0].pos, Point::new(1570.0, 270.0));
        // Tap hold and inter-tap delays.
        assert_eq!(frames[1].0.delay_ms, 1 + PIN_TAP_MS);
        assert_eq!(frames[2].0.delay_ms, 1 + PIN_GAP_MS);
    }

    #[tokio::test(start_paused = true)]
    async fn pin_shortcut_leaves_held_sticks_alone() {
        let (mut injector, handle, mut mapper) = setup();

        mapper.on_stick_move(&mut injector, StickSide::Left, 0.0, 1.0);
        mapper.on_key(&mut injector, GamepadKey::Up, true);
        injector.shutdown().await;

        let frames = handle.frames();
        // The left stick stays down the whole time: pin taps are
        // PointerDown/PointerUp alongside the active contact.
        assert_eq!(
            actions(&frames)[2..],
            [
                TouchAction::PointerDown,
                TouchAction::PointerUp,
                TouchAction::PointerDown,
                TouchAction::PointerUp,
            ]
        );
        for (frame, _) in &frames[2..] {
            assert_eq!(frame.trigger(), Some(PointerId(2)));
            assert_eq!(frame.pointers.len(), 2);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn hand_off_returns_the_old_stick_to_center() {
        let (mut injector, handle, mut mapper) = setup();

        mapper.on_stick_move(&mut injector, StickSide::Right, 1.0, 0.0);
        mapper.on_key(&mut injector, GamepadKey::LeftTrigger, true);
        // Right stick input now lands on the special stick.
        mapper.on_stick_move(&mut injector, StickSide::Right, 0.0, 1.0);
        injector.shutdown().await;

        let frames = handle.frames();
        assert_eq!(
            actions(&frames),
            vec![
                TouchAction::Down,
                TouchAction::Move,
                // Hand-off: glide the fire stick home, release it.
                TouchAction::Move,
                TouchAction::Up,
                // Fresh contact on the special stick.
                TouchAction::Down,
                TouchAction::Move,
            ]
        );
        assert_eq!(frames[2].0.pointers[0].pos, Point::new(1780.0, 650.0));
        assert_eq!(frames[4].0.pointers[0].pos, Point::new(1450.0, 770.0));
        // Special stick radius is 280: up by one radius.
        assert_eq!(frames[5].0.pointers[0].pos, Point::new(1450.0, 490.0));
    }

    #[tokio::test(start_paused = true)]
    async fn hand_off_same_mode_is_a_no_op() {
        let (mut injector, handle, mut mapper) = setup();

        mapper.on_key(&mut injector, GamepadKey::LeftTrigger, false);
        injector.shutdown().await;

        assert!(handle.frames().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn axis_rest_releases_the_stick() {
        let (mut injector, handle, mut mapper) = setup();

        mapper.on_stick_move(&mut injector, StickSide::Left, 0.0, 1.0);
        mapper.on_stick_move(&mut injector, StickSide::Left, 0.0, 0.0);
        // Rest while released is a no-op.
        mapper.on_stick_move(&mut injector, StickSide::Left, 0.0, 0.0);
        injector.shutdown().await;

        let frames = handle.frames();
        assert_eq!(
            actions(&frames),
            vec![
                TouchAction::Down,
                TouchAction::Move,
                TouchAction::Move,
                TouchAction::Up,
            ]
        );
        // The centering glide lands back on the stick center.
        assert_eq!(frames[2].0.pointers[0].pos, Point::new(360.0, 800.0));
    }

    #[tokio::test(start_paused = true)]
    async fn reset_lifts_every_held_contact() {
        let (mut injector, handle, mut mapper) = setup();

        mapper.on_stick_move(&mut injector, StickSide::Left, 0.0, 1.0);
        mapper.on_stick_move(&mut injector, StickSide::Right, 1.0, 0.0);
        mapper.reset(&mut injector);
        // A second reset has nothing left to lift.
        mapper.reset(&mut injector);
        injector.shutdown().await;

        let frames = handle.frames();
        let downs = frames
            .iter()
            .filter(|(f, _)| matches!(f.action, TouchAction::Down | TouchAction::PointerDown))
            .count();
        let ups = frames
            .iter()
            .filter(|(f, _)| matches!(f.action, TouchAction::Up | TouchAction::PointerUp))
            .count();
        assert_eq!(downs, 2);
        assert_eq!(ups, 2);
        // Everything was lifted cleanly, so the trailing cancel had no
        // contact left to name.
        assert!(frames.iter().all(|(f, _)| f.action != TouchAction::Cancel));
    }
}
