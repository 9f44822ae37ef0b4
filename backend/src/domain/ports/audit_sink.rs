//! Port for the fire-and-forget audit trail.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::define_port_error;

/// One appended action record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditRecord {
    pub action: String,
    pub ticket_id: Uuid,
    pub display_number: String,
    pub at: DateTime<Utc>,
}

define_port_error! {
    /// Errors raised by audit sink adapters. Failures never abort the
    /// operation that produced the record.
    pub enum AuditSinkError {
        /// The append could not be performed.
        Append { message: String } => "audit append failed: {message}",
    }
}

/// Port for appending audit records, best effort.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuditSink: Send + Sync {
    async fn append(&self, record: AuditRecord) -> Result<(), AuditSinkError>;
}

/// Fixture sink discarding every record.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureAuditSink;

#[async_trait]
impl AuditSink for FixtureAuditSink {
    async fn append(&self, _record: AuditRecord) -> Result<(), AuditSinkError> {
        Ok(())
    }
}
