//! Port for locker inventory persistence.
//!
//! `bind` is a compare-and-set on `status = Available`; a locker whose
//! status changed between selection and write reports
//! [`LockerRepositoryError::NotAvailable`].

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::locker::{Locker, LockerCode, LockerPartition};
use crate::domain::retry::ConflictClass;

use super::define_port_error;

define_port_error! {
    /// Errors raised by locker repository adapters.
    pub enum LockerRepositoryError {
        /// The conditional bind found the locker no longer available.
        NotAvailable { code: String } => "locker {code} is not available",
        /// No locker exists under this code.
        Missing { code: String } => "locker {code} not found",
        /// The store could not be reached.
        Unavailable { message: String } => "locker store unavailable: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "locker store query failed: {message}",
    }
}

impl ConflictClass for LockerRepositoryError {
    fn is_conflict(&self) -> bool {
        matches!(self, Self::NotAvailable { .. })
    }
}

/// Port for reading locker state and the two binding mutations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LockerRepository: Send + Sync {
    /// All lockers, optionally restricted to one partition, ordered by code.
    async fn list(
        &self,
        partition: Option<LockerPartition>,
    ) -> Result<Vec<Locker>, LockerRepositoryError>;

    /// Lowest-coded available locker in the partition. Read-only; the caller
    /// must still win the conditional [`LockerRepository::bind`].
    async fn find_available(
        &self,
        partition: LockerPartition,
    ) -> Result<Option<Locker>, LockerRepositoryError>;

    /// Occupy the locker for `ticket_id` iff it is still available.
    async fn bind(&self, code: &LockerCode, ticket_id: Uuid) -> Result<(), LockerRepositoryError>;

    /// Return the locker to available and clear its binding. Idempotent:
    /// releasing an already-available locker is a no-op.
    async fn release(&self, code: &LockerCode) -> Result<(), LockerRepositoryError>;

    /// Force every non-maintenance locker back to available, clearing
    /// bindings. Returns how many lockers changed state.
    async fn reset_all_available(&self) -> Result<u32, LockerRepositoryError>;
}

/// Fixture implementation for tests that do not exercise locker persistence.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureLockerRepository;

#[async_trait]
impl LockerRepository for FixtureLockerRepository {
    async fn list(
        &self,
        _partition: Option<LockerPartition>,
    ) -> Result<Vec<Locker>, LockerRepositoryError> {
        Ok(Vec::new())
    }

    async fn find_available(
        &self,
        _partition: LockerPartition,
    ) -> Result<Option<Locker>, LockerRepositoryError> {
        Ok(None)
    }

    async fn bind(&self, code: &LockerCode, _ticket_id: Uuid) -> Result<(), LockerRepositoryError> {
        Err(LockerRepositoryError::not_available(code.as_str()))
    }

    async fn release(&self, _code: &LockerCode) -> Result<(), LockerRepositoryError> {
        Ok(())
    }

    async fn reset_all_available(&self) -> Result<u32, LockerRepositoryError> {
        Ok(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_not_available_is_a_conflict() {
        assert!(LockerRepositoryError::not_available("W01").is_conflict());
        assert!(!LockerRepositoryError::missing("W01").is_conflict());
        assert!(!LockerRepositoryError::unavailable("down").is_conflict());
    }
}
