//! Bounded frame queue feeding the delivery worker.

use std::collections::VecDeque;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use tokio::sync::Notify;
use touch_relay_types::Frame;

/// What to do with an incoming frame when the queue is full.
///
/// Gesture input is live and a stale frame is worthless, so neither policy
/// applies backpressure to the caller: something is dropped and only logged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OverflowPolicy {
    /// Reject the incoming frame; the queue keeps what it already holds.
    #[default]
    Reject,
    /// Evict the oldest queued frame to make room for the incoming one.
    DropOldest,
}

/// Outcome of a [`FrameQueue::push`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushOutcome {
    Queued,
    /// The incoming frame was dropped (`Reject` policy).
    RejectedNewest,
    /// The oldest queued frame was dropped (`DropOldest` policy).
    EvictedOldest,
}

/// Bounded FIFO between the gesture producers and the delivery worker.
///
/// `push` never blocks; `pop` is the single consumer's suspension point.
pub struct FrameQueue {
    frames: Mutex<VecDeque<Frame>>,
    notify: Notify,
    capacity: usize,
    policy: OverflowPolicy,
}

impl FrameQueue {
    #[must_use]
    pub fn new(capacity: usize, policy: OverflowPolicy) -> Self {
        Self {
            frames: Mutex::new(VecDeque::with_capacity(capacity)),
            notify: Notify::new(),
            capacity,
            policy,
        }
    }

    /// Append a frame, resolving overflow per the configured policy.
    pub fn push(&self, frame: Frame) -> PushOutcome {
        let outcome = {
            let mut frames = self.frames.lock().unwrap();
            if frames.len() >= self.capacity {
                match self.policy {
                    OverflowPolicy::Reject => return PushOutcome::RejectedNewest,
                    OverflowPolicy::DropOldest => {
                        frames.pop_front();
                        frames.push_back(frame);
                        PushOutcome::EvictedOldest
                    }
                }
            } else {
                frames.push_back(frame);
                PushOutcome::Queued
            }
        };
        self.notify.notify_one();
        outcome
    }

    /// Append a frame past the capacity check.
    ///
    /// Used for the `Stop` sentinel, which must always reach the worker.
    pub fn push_unbounded(&self, frame: Frame) {
        self.frames.lock().unwrap().push_back(frame);
        self.notify.notify_one();
    }

    /// Await the next frame in FIFO order.
    pub async fn pop(&self) -> Frame {
        loop {
            if let Some(frame) = self.frames.lock().unwrap().pop_front() {
                return frame;
            }
            self.notify.notified().await;
        }
    }

    /// Number of frames currently queued.
    pub fn len(&self) -> usize {
        self.frames.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
