//! Domain events and the mechanics used to publish them.
//!
//! - [`Event`]: metadata every domain event carries
//! - [`EventBus`] / [`InMemoryEventBus`]: transport-agnostic pub/sub
//! - [`EventDispatcher`]: the sink business code dispatches into
//! - [`PartnerCreated`]: emitted once per successful partnership batch

pub mod bus;
pub mod dispatcher;
pub mod event;
pub mod in_memory_bus;
pub mod partner_created;

pub use bus::{EventBus, Subscription};
pub use dispatcher::{BusDispatcher, DispatchError, EventDispatcher};
pub use event::Event;
pub use in_memory_bus::{InMemoryBusError, InMemoryEventBus};
pub use partner_created::{
    InvitedSummary, InviterSummary, PartnerCreated, PartnerCreatedPayload, PartnerCreatedRecord,
};
