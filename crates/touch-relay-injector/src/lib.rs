//! Pointer table, paced frame queue, and the event sink boundary.
//!
//! This crate defines the [`EventSink`] trait — the single narrow interface
//! through which frames leave the pipeline — and the [`Injector`], which
//! turns touch-down/move/up calls into correctly ordered, correctly paced
//! frames delivered by a dedicated worker task.

use async_trait::async_trait;
use touch_relay_protocol::SinkClient;
use touch_relay_types::Frame;
use tracing::info;

pub mod error;
pub mod injector;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod queue;

pub use error::InjectError;
pub use injector::{Injector, DEFAULT_QUEUE_CAPACITY};
pub use queue::OverflowPolicy;

/// Consumes one frame.
///
/// On the producer side this is the wire client; on the consumer side it is
/// the privileged platform injection call. Either way the call is awaited
/// to completion and carries no feedback channel beyond the error.
#[async_trait]
pub trait EventSink: Send + 'static {
    /// Deliver one frame. A failed frame is lost; callers never retry.
    async fn inject(&mut self, frame: Frame) -> Result<(), InjectError>;
}

#[async_trait]
impl EventSink for SinkClient {
    async fn inject(&mut self, frame: Frame) -> Result<(), InjectError> {
        self.send(&frame).await?;
        Ok(())
    }
}

/// Logging sink: the placeholder consumer backend.
///
/// Stands where the platform-privileged injection call plugs in; every
/// decoded frame is logged instead of injected.
#[derive(Debug, Default)]
pub struct TraceSink;

#[async_trait]
impl EventSink for TraceSink {
    async fn inject(&mut self, frame: Frame) -> Result<(), InjectError> {
        info!(
            action = ?frame.action,
            pointers = frame.pointers.len(),
            trigger = ?frame.trigger(),
            "inject"
        );
        Ok(())
    }
}
