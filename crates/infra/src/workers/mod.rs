//! Background workers driven by the event bus.

pub mod invitation_notices;

pub use invitation_notices::{
    InMemoryOutbox, InvitationNotice, InvitationNoticeWorker, InvitationOutbox, OutboxError,
    WorkerHandle,
};
