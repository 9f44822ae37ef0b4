//! Driving port for locker pool read models.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::error::Error;
use crate::domain::locker::{Locker, LockerPartition, LockerStatus};

/// Read model of one locker.
#[derive(Debug, Clone, PartialEq)]
pub struct LockerPayload {
    pub code: String,
    pub partition: LockerPartition,
    pub status: LockerStatus,
    pub ticket_id: Option<Uuid>,
}

impl From<Locker> for LockerPayload {
    fn from(locker: Locker) -> Self {
        Self {
            code: locker.code.as_str().to_owned(),
            partition: locker.partition,
            status: locker.status,
            ticket_id: locker.bound_ticket,
        }
    }
}

/// Driving port for locker dashboard reads.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LockerQuery: Send + Sync {
    /// Lockers ordered by code, optionally restricted to one partition.
    async fn list(&self, partition: Option<LockerPartition>)
    -> Result<Vec<LockerPayload>, Error>;
}
