//! Audit sink writing records to the structured log.

use async_trait::async_trait;
use tracing::info;

use crate::domain::ports::{AuditRecord, AuditSink, AuditSinkError};

/// Sink emitting each record as a structured `audit` event.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingAuditSink;

#[async_trait]
impl AuditSink for TracingAuditSink {
    async fn append(&self, record: AuditRecord) -> Result<(), AuditSinkError> {
        info!(
            target: "audit",
            action = %record.action,
            ticket_id = %record.ticket_id,
            ticket = %record.display_number,
            at = %record.at.to_rfc3339(),
            "audit"
        );
        Ok(())
    }
}
