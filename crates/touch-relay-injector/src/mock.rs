//! Mock event sink for testing.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::time::Instant;
use touch_relay_types::Frame;

use crate::error::InjectError;
use crate::EventSink;

#[derive(Debug, Default)]
struct MockSinkState {
    frames: Vec<(Frame, Instant)>,
    fail_next: bool,
}

/// Records every injected frame together with its delivery instant.
pub struct MockSink {
    state: Arc<Mutex<MockSinkState>>,
}

impl Default for MockSink {
    fn default() -> Self {
        Self::new()
    }
}

impl MockSink {
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(MockSinkState::default())),
        }
    }

    /// Get a clonable handle for observing delivered frames from tests.
    #[must_use]
    pub fn handle(&self) -> MockSinkHandle {
        MockSinkHandle {
            state: Arc::clone(&self.state),
        }
    }
}

/// Clonable observer handle for [`MockSink`].
#[derive(Clone)]
pub struct MockSinkHandle {
    state: Arc<Mutex<MockSinkState>>,
}

impl MockSinkHandle {
    /// Snapshot of all delivered frames with their delivery instants.
    #[must_use]
    pub fn frames(&self) -> Vec<(Frame, Instant)> {
        self.state.lock().unwrap().frames.clone()
    }

    /// Make the next `inject` call fail. The frame is still recorded so
    /// tests can assert loss semantics.
    pub fn fail_next(&self) {
        self.state.lock().unwrap().fail_next = true;
    }
}

#[async_trait]
impl EventSink for MockSink {
    async fn inject(&mut self, frame: Frame) -> Result<(), InjectError> {
        let mut state = self.state.lock().unwrap();
        state.frames.push((frame, Instant::now()));
        if state.fail_next {
            state.fail_next = false;
            return Err(InjectError::Rejected("mock failure".to_string()));
        }
        Ok(())
    }
}
