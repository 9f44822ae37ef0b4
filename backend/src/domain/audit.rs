//! Fire-and-forget audit trail.
//!
//! Lifecycle operations push records into a bounded channel and move on; a
//! background task drains the channel into the sink port. A full channel or
//! a failing sink never aborts the operation that produced the record.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::warn;

use crate::domain::ports::{AuditRecord, AuditSink};
use crate::domain::ticket::Ticket;

/// Non-blocking handle for appending audit records.
#[derive(Clone)]
pub struct AuditRecorder {
    tx: mpsc::Sender<AuditRecord>,
}

impl AuditRecorder {
    /// Record an action against a ticket. Never blocks; a saturated spool
    /// drops the record with a warning.
    pub fn record(&self, action: &str, ticket: &Ticket, at: DateTime<Utc>) {
        let record = AuditRecord {
            action: action.to_owned(),
            ticket_id: ticket.id,
            display_number: ticket.display_number.clone(),
            at,
        };
        if let Err(err) = self.tx.try_send(record) {
            warn!(%action, error = %err, "audit record dropped");
        }
    }
}

/// Spawn the background drain task. Returns the recorder handle and the
/// task handle (held for shutdown, otherwise ignorable).
pub fn spawn_audit_writer(
    sink: Arc<dyn AuditSink>,
    capacity: usize,
) -> (AuditRecorder, JoinHandle<()>) {
    let (tx, mut rx) = mpsc::channel(capacity);
    let handle = tokio::spawn(async move {
        while let Some(record) = rx.recv().await {
            if let Err(error) = sink.append(record).await {
                warn!(%error, "audit sink append failed");
            }
        }
    });
    (AuditRecorder { tx }, handle)
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;
    use crate::domain::ports::{AuditSinkError, MockAuditSink};
    use crate::domain::ticket::{Category, ServiceKind, ServiceType, TicketStatus};

    fn sample_ticket() -> Ticket {
        let now = Utc::now();
        Ticket {
            id: Uuid::new_v4(),
            display_number: "WS-001".to_owned(),
            day_key: "20260823".to_owned(),
            customer_id: Uuid::new_v4(),
            category: Category::Women,
            kind: ServiceKind::WalkIn,
            service: ServiceType::Shower,
            requested_time: None,
            price: 5000,
            status: TicketStatus::Waiting,
            bound_locker: None,
            created_at: now,
            called_at: None,
            started_at: None,
            completed_at: None,
            cancelled_at: None,
        }
    }

    #[tokio::test]
    async fn records_reach_the_sink() {
        let (done_tx, done_rx) = tokio::sync::oneshot::channel();
        let mut sink = MockAuditSink::new();
        let mut done_tx = Some(done_tx);
        sink.expect_append()
            .times(1)
            .withf(|record| record.action == "ticket_created")
            .returning(move |_| {
                if let Some(tx) = done_tx.take() {
                    let _ = tx.send(());
                }
                Ok(())
            });

        let (recorder, handle) = spawn_audit_writer(Arc::new(sink), 8);
        recorder.record("ticket_created", &sample_ticket(), Utc::now());

        done_rx.await.expect("sink saw the record");
        drop(recorder);
        handle.await.expect("drain task exits cleanly");
    }

    #[tokio::test]
    async fn a_failing_sink_never_surfaces_to_the_caller() {
        let (recorder, handle) = {
            let mut sink = MockAuditSink::new();
            sink.expect_append()
                .returning(|_| Err(AuditSinkError::append("sink offline")));
            spawn_audit_writer(Arc::new(sink), 2)
        };

        recorder.record("ticket_called", &sample_ticket(), Utc::now());
        recorder.record("ticket_completed", &sample_ticket(), Utc::now());

        drop(recorder);
        handle.await.expect("drain task exits cleanly");
    }

    #[tokio::test]
    async fn a_saturated_spool_drops_instead_of_blocking() {
        // No drain task at all: build the channel by hand with capacity 1.
        let (tx, _rx) = mpsc::channel(1);
        let recorder = AuditRecorder { tx };

        recorder.record("ticket_created", &sample_ticket(), Utc::now());
        // Second record hits a full channel; the call must still return.
        recorder.record("ticket_created", &sample_ticket(), Utc::now());
    }
}
