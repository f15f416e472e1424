//! The sink business operations dispatch domain events into.

use std::sync::Arc;

use thiserror::Error;
use tracing::debug;

use crate::bus::EventBus;
use crate::event::Event;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DispatchError {
    /// The underlying transport rejected the event.
    #[error("event publication failed: {0}")]
    Publish(String),
}

/// Fire-and-observe event sink.
///
/// A successful `dispatch` only means the event was handed to the transport;
/// delivery to subscribers is the transport's concern.
pub trait EventDispatcher<E: Event>: Send + Sync {
    fn dispatch(&self, event: E) -> Result<(), DispatchError>;
}

impl<E, D> EventDispatcher<E> for Arc<D>
where
    E: Event,
    D: EventDispatcher<E> + ?Sized,
{
    fn dispatch(&self, event: E) -> Result<(), DispatchError> {
        (**self).dispatch(event)
    }
}

/// Dispatcher that publishes every event onto an [`EventBus`].
#[derive(Debug, Clone)]
pub struct BusDispatcher<B> {
    bus: B,
}

impl<B> BusDispatcher<B> {
    pub fn new(bus: B) -> Self {
        Self { bus }
    }

    pub fn bus(&self) -> &B {
        &self.bus
    }
}

impl<E, B> EventDispatcher<E> for BusDispatcher<B>
where
    E: Event,
    B: EventBus<E>,
{
    fn dispatch(&self, event: E) -> Result<(), DispatchError> {
        let event_type = event.event_type();
        self.bus
            .publish(event)
            .map_err(|err| DispatchError::Publish(format!("{event_type}: {err:?}")))?;
        debug!(event_type, "event dispatched");
        Ok(())
    }
}
