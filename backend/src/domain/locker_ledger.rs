//! Resource pool ledger for lockers.
//!
//! The ledger owns the only two mutations of locker state, bind and
//! release, and the selection policy: lowest available code in the
//! ticket's partition, no automatic fallback to the unisex pool.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;
use uuid::Uuid;

use crate::domain::error::Error;
use crate::domain::locker::{LockerCode, LockerPartition};
use crate::domain::ports::{
    LockerPayload, LockerQuery, LockerRepository, LockerRepositoryError,
};
use crate::domain::retry::ConflictClass;

pub(crate) fn map_locker_store_error(error: LockerRepositoryError) -> Error {
    match error {
        LockerRepositoryError::Unavailable { message } => {
            Error::service_unavailable(format!("locker store unavailable: {message}"))
        }
        other => Error::internal(format!("locker store error: {other}")),
    }
}

/// Ledger over the locker repository port.
#[derive(Clone)]
pub struct LockerLedger<L> {
    lockers: Arc<L>,
}

impl<L> LockerLedger<L>
where
    L: LockerRepository,
{
    pub fn new(lockers: Arc<L>) -> Self {
        Self { lockers }
    }

    /// Try to occupy a locker in `partition` for `ticket_id`.
    ///
    /// Selection and bind race against concurrent callers; losing the
    /// conditional bind re-selects once against the remaining pool before
    /// reporting exhaustion. `Ok(None)` means no locker was free, which is
    /// the caller's signal to proceed unresourced.
    pub async fn assign(
        &self,
        partition: LockerPartition,
        ticket_id: Uuid,
    ) -> Result<Option<LockerCode>, LockerRepositoryError> {
        for _ in 0..2 {
            let Some(unit) = self.lockers.find_available(partition).await? else {
                return Ok(None);
            };
            match self.lockers.bind(&unit.code, ticket_id).await {
                Ok(()) => return Ok(Some(unit.code)),
                Err(err) if err.is_conflict() => {
                    debug!(code = %unit.code, "lost the bind race, reselecting");
                }
                Err(err) => return Err(err),
            }
        }
        Ok(None)
    }

    /// Return a locker to the pool. Idempotent.
    pub async fn release(&self, code: &LockerCode) -> Result<(), LockerRepositoryError> {
        self.lockers.release(code).await
    }
}

#[async_trait]
impl<L> LockerQuery for LockerLedger<L>
where
    L: LockerRepository,
{
    async fn list(
        &self,
        partition: Option<LockerPartition>,
    ) -> Result<Vec<LockerPayload>, Error> {
        let lockers = self
            .lockers
            .list(partition)
            .await
            .map_err(map_locker_store_error)?;
        Ok(lockers.into_iter().map(LockerPayload::from).collect())
    }
}

#[cfg(test)]
#[path = "locker_ledger_tests.rs"]
mod tests;
