//! Turns `PartnerCreated` events into invitation notices for the mailer.

use std::sync::{Mutex, mpsc};
use std::thread;
use std::time::Duration;

use thiserror::Error;
use tracing::{debug, warn};

use carelink_core::{InvitationId, OrganizationId};
use carelink_events::{EventBus, PartnerCreated, PartnerCreatedRecord, Subscription};

/// One "you have been invited" message, addressed to the partner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvitationNotice {
    pub invitation_id: InvitationId,
    pub recipient: String,
    pub partner_id: OrganizationId,
    pub partner_name: String,
    pub inviter_id: OrganizationId,
    pub inviter_name: String,
}

impl From<&PartnerCreatedRecord> for InvitationNotice {
    fn from(record: &PartnerCreatedRecord) -> Self {
        Self {
            invitation_id: record.invitation_id,
            recipient: record.invited.email.clone(),
            partner_id: record.invited.id,
            partner_name: record.invited.name.clone(),
            inviter_id: record.inviter.id,
            inviter_name: record.inviter.name.clone(),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum OutboxError {
    #[error("outbox rejected notice: {0}")]
    Rejected(String),
}

/// Destination for notices; the mail transport drains it.
pub trait InvitationOutbox: Send + Sync {
    fn enqueue(&self, notice: InvitationNotice) -> Result<(), OutboxError>;
}

/// In-memory outbox for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryOutbox {
    notices: Mutex<Vec<InvitationNotice>>,
}

impl InMemoryOutbox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notices(&self) -> Vec<InvitationNotice> {
        self.notices.lock().map(|n| n.clone()).unwrap_or_default()
    }
}

impl InvitationOutbox for InMemoryOutbox {
    fn enqueue(&self, notice: InvitationNotice) -> Result<(), OutboxError> {
        if notice.recipient.trim().is_empty() {
            return Err(OutboxError::Rejected(format!(
                "invitation {} has no recipient address",
                notice.invitation_id
            )));
        }
        self.notices
            .lock()
            .map_err(|_| OutboxError::Rejected("outbox lock poisoned".to_string()))?
            .push(notice);
        Ok(())
    }
}

impl<X> InvitationOutbox for std::sync::Arc<X>
where
    X: InvitationOutbox + ?Sized,
{
    fn enqueue(&self, notice: InvitationNotice) -> Result<(), OutboxError> {
        (**self).enqueue(notice)
    }
}

/// Handle to control and join a background worker.
#[derive(Debug)]
pub struct WorkerHandle {
    shutdown: mpsc::Sender<()>,
    join: Option<thread::JoinHandle<()>>,
}

impl WorkerHandle {
    /// Request graceful shutdown and wait for the worker to stop.
    pub fn shutdown(mut self) {
        let _ = self.shutdown.send(());
        if let Some(j) = self.join.take() {
            let _ = j.join();
        }
    }
}

/// Worker that fans each `PartnerCreated` record out as an [`InvitationNotice`].
///
/// A notice that the outbox rejects is logged and skipped; the remaining
/// records of the same event are still enqueued.
#[derive(Debug)]
pub struct InvitationNoticeWorker;

impl InvitationNoticeWorker {
    const NAME: &'static str = "invitation-notices";

    /// Subscribe to `bus` and spawn the worker thread.
    ///
    /// The subscription is taken before this returns, so events published
    /// afterwards are never missed.
    pub fn spawn<B, X>(bus: B, outbox: X) -> std::io::Result<WorkerHandle>
    where
        B: EventBus<PartnerCreated>,
        X: InvitationOutbox + 'static,
    {
        let (shutdown_tx, shutdown_rx) = mpsc::channel::<()>();
        let sub = bus.subscribe();

        let join = thread::Builder::new()
            .name(Self::NAME.to_string())
            .spawn(move || worker_loop(sub, shutdown_rx, &outbox))?;

        Ok(WorkerHandle {
            shutdown: shutdown_tx,
            join: Some(join),
        })
    }
}

fn worker_loop<X>(sub: Subscription<PartnerCreated>, shutdown_rx: mpsc::Receiver<()>, outbox: &X)
where
    X: InvitationOutbox,
{
    let tick = Duration::from_millis(250);

    loop {
        if shutdown_rx.try_recv().is_ok() {
            break;
        }

        match sub.recv_timeout(tick) {
            Ok(event) => {
                for record in &event.payload {
                    if let Err(err) = outbox.enqueue(InvitationNotice::from(record)) {
                        warn!(
                            worker = InvitationNoticeWorker::NAME,
                            event_id = %event.event_id,
                            error = %err,
                            "invitation notice not enqueued"
                        );
                    }
                }
                debug!(
                    worker = InvitationNoticeWorker::NAME,
                    event_id = %event.event_id,
                    records = event.len(),
                    "partner created event handled"
                );
            }
            Err(mpsc::RecvTimeoutError::Timeout) => continue,
            Err(mpsc::RecvTimeoutError::Disconnected) => break,
        }
    }
}
