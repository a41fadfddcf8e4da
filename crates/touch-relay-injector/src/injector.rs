//! Producer-side pointer table and the paced delivery worker.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, warn};
use touch_relay_types::{Frame, Point, PointerId, PointerSample, TouchAction, MAX_POINTERS};

use crate::queue::{FrameQueue, OverflowPolicy, PushOutcome};
use crate::EventSink;

/// Default bound on the frame queue.
pub const DEFAULT_QUEUE_CAPACITY: usize = 500;

/// Delay carried by a frame when the caller requested none.
const DEFAULT_FRAME_DELAY_MS: u64 = 1;

/// Owns the pointer table and feeds the delivery worker.
///
/// All mutation happens synchronously on the caller's task; the worker is
/// the only consumer of the queue and the sole owner of the sink. One
/// injector per session; callers serialize access.
pub struct Injector {
    queue: Arc<FrameQueue>,
    pointers: HashMap<PointerId, Point>,
    /// Accumulated by `add_delay`, consumed by the next posted frame.
    pending_delay_ms: u64,
    worker: Option<JoinHandle<()>>,
}

impl Injector {
    /// Start a new injector session: spawns the delivery worker owning `sink`.
    #[must_use]
    pub fn start(sink: Box<dyn EventSink>, capacity: usize, policy: OverflowPolicy) -> Self {
        let queue = Arc::new(FrameQueue::new(capacity, policy));
        let worker = tokio::spawn(run_worker(Arc::clone(&queue), sink));
        Self {
            queue,
            pointers: HashMap::new(),
            pending_delay_ms: 0,
            worker: Some(worker),
        }
    }

    /// Accumulate extra delay to be carried by the next posted frame.
    pub fn add_delay(&mut self, millis: u64) {
        self.pending_delay_ms += millis;
    }

    /// Whether the given pointer is currently down.
    #[must_use]
    pub fn is_down(&self, pointer: PointerId) -> bool {
        self.pointers.contains_key(&pointer)
    }

    /// Number of currently active pointers.
    #[must_use]
    pub fn active_pointers(&self) -> usize {
        self.pointers.len()
    }

    /// Put a contact down at `pos`.
    ///
    /// An already-down pointer degrades to a move. The first contact emits
    /// `Down`, additional simultaneous contacts emit `PointerDown`.
    pub fn touch_down(&mut self, pointer: PointerId, pos: Point) {
        if self.pointers.contains_key(&pointer) {
            self.touch_move(pointer, pos);
            return;
        }

        if self.pointers.len() >= MAX_POINTERS {
            warn!(%pointer, "pointer cap reached, touch ignored");
            return;
        }

        self.pointers.insert(pointer, pos);
        let action = if self.pointers.len() == 1 {
            TouchAction::Down
        } else {
            TouchAction::PointerDown
        };
        self.post(pointer, action);
    }

    /// Lift a contact. Unknown pointers log and no-op.
    pub fn touch_up(&mut self, pointer: PointerId) {
        if !self.pointers.contains_key(&pointer) {
            warn!(%pointer, "pointer not found for touch up");
            return;
        }

        let action = if self.pointers.len() == 1 {
            TouchAction::Up
        } else {
            TouchAction::PointerUp
        };
        self.post(pointer, action);
        self.pointers.remove(&pointer);
    }

    /// Move an active contact. Unknown pointers log and no-op.
    pub fn touch_move(&mut self, pointer: PointerId, pos: Point) {
        let Some(entry) = self.pointers.get_mut(&pointer) else {
            warn!(%pointer, "pointer not found for touch move");
            return;
        };
        *entry = pos;
        self.post(pointer, TouchAction::Move);
    }

    /// Abandon every active contact.
    ///
    /// Emits a single `Cancel` frame naming one arbitrary still-active
    /// pointer at slot 0, then clears the table. Known limitation: the
    /// canonical platform contract cancels the active set as a whole, and
    /// sinks are expected to treat any `Cancel` as "abandon all touches"
    /// regardless of which id is named.
    pub fn cancel(&mut self) {
        let Some(&representative) = self.pointers.keys().next() else {
            return;
        };
        self.pending_delay_ms = 0;
        self.post(representative, TouchAction::Cancel);
        self.pointers.clear();
    }

    /// Snapshot the table (trigger first), enqueue, reset the pending delay.
    fn post(&mut self, trigger: PointerId, action: TouchAction) {
        let mut samples = Vec::with_capacity(self.pointers.len());
        for (&id, &pos) in &self.pointers {
            let sample = PointerSample { id, pos };
            if id == trigger {
                samples.insert(0, sample);
            } else {
                samples.push(sample);
            }
        }

        let frame = Frame {
            action,
            pointers: samples,
            delay_ms: self.pending_delay_ms,
        };

        match self.queue.push(frame) {
            PushOutcome::Queued => {}
            PushOutcome::RejectedNewest => {
                warn!(?action, "queue full, frame dropped");
            }
            PushOutcome::EvictedOldest => {
                warn!(?action, "queue full, oldest frame evicted");
            }
        }

        self.pending_delay_ms = DEFAULT_FRAME_DELAY_MS;
    }

    /// Cooperative teardown: push the `Stop` sentinel and await the worker.
    ///
    /// Frames still queued ahead of the sentinel are drained; nothing
    /// enqueued afterwards is guaranteed to be sent.
    pub async fn shutdown(mut self) {
        self.queue.push_unbounded(Frame::stop());
        if let Some(worker) = self.worker.take() {
            debug!("joining delivery worker");
            let _ = worker.await;
        }
    }
}

/// The pace-and-send loop: single consumer of the queue, sole owner of the
/// sink connection.
async fn run_worker(queue: Arc<FrameQueue>, mut sink: Box<dyn EventSink>) {
    let mut last_sent: Option<Instant> = None;

    loop {
        let frame = queue.pop().await;

        if frame.action == TouchAction::Stop {
            break;
        }

        if let Some(last) = last_sent {
            let target = last + Duration::from_millis(frame.delay_ms);
            tokio::time::sleep_until(target).await;
        }

        if let Err(e) = sink.inject(frame).await {
            // Non-fatal: the frame is lost, the sink heals on the next send.
            warn!(error = %e, "frame delivery failed");
        }
        last_sent = Some(Instant::now());
    }

    debug!("delivery worker stopped");
}
