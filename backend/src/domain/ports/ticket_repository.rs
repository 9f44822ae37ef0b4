//! Port for ticket persistence.
//!
//! The backing store is only assumed to offer per-row transactions:
//! `insert` fails on a duplicate (day, display number) pair, and `update`
//! is a compare-and-set guarded by the expected prior status. Racing
//! writers surface as the two conflict variants below.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::retry::ConflictClass;
use crate::domain::ticket::{Ticket, TicketStatus};

use super::define_port_error;

define_port_error! {
    /// Errors raised by ticket repository adapters.
    pub enum TicketRepositoryError {
        /// Another ticket already holds this display number for the day.
        DuplicateNumber { number: String } =>
            "display number {number} is already taken for this day",
        /// The guarded update found the ticket in a different status.
        StaleStatus { ticket_id: Uuid } =>
            "ticket {ticket_id} changed status since it was read",
        /// The ticket disappeared between read and write.
        Missing { ticket_id: Uuid } => "ticket {ticket_id} not found",
        /// The store could not be reached.
        Unavailable { message: String } => "ticket store unavailable: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "ticket store query failed: {message}",
    }
}

impl ConflictClass for TicketRepositoryError {
    fn is_conflict(&self) -> bool {
        matches!(self, Self::DuplicateNumber { .. } | Self::StaleStatus { .. })
    }
}

/// Port for reading and writing queue tickets.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TicketRepository: Send + Sync {
    /// Insert a new ticket; fails with [`TicketRepositoryError::DuplicateNumber`]
    /// when the (day, display number) pair is already taken.
    async fn insert(&self, ticket: &Ticket) -> Result<(), TicketRepositoryError>;

    /// Overwrite a ticket iff it is still in `expected` status
    /// ([`TicketRepositoryError::StaleStatus`] otherwise).
    async fn update(
        &self,
        ticket: &Ticket,
        expected: TicketStatus,
    ) -> Result<(), TicketRepositoryError>;

    /// Find a ticket by id.
    async fn find_by_id(&self, ticket_id: &Uuid) -> Result<Option<Ticket>, TicketRepositoryError>;

    /// Display numbers issued on `day_key` that start with `prefix`.
    async fn numbers_for_prefix(
        &self,
        day_key: &str,
        prefix: &str,
    ) -> Result<Vec<String>, TicketRepositoryError>;

    /// Whether a ticket already holds this exact display number on `day_key`.
    async fn number_exists(
        &self,
        day_key: &str,
        display_number: &str,
    ) -> Result<bool, TicketRepositoryError>;

    /// Non-terminal tickets, oldest first.
    async fn list_active(&self) -> Result<Vec<Ticket>, TicketRepositoryError>;

    /// All tickets for a customer, oldest first.
    async fn list_by_customer(
        &self,
        customer_id: &Uuid,
    ) -> Result<Vec<Ticket>, TicketRepositoryError>;

    /// Non-terminal tickets created strictly before `cutoff`.
    async fn list_open_created_before(
        &self,
        cutoff: DateTime<Utc>,
    ) -> Result<Vec<Ticket>, TicketRepositoryError>;

    /// Physically remove a ticket. Removing an absent ticket is a no-op.
    async fn delete(&self, ticket_id: &Uuid) -> Result<(), TicketRepositoryError>;
}

/// Fixture implementation for tests that do not exercise ticket persistence.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureTicketRepository;

#[async_trait]
impl TicketRepository for FixtureTicketRepository {
    async fn insert(&self, _ticket: &Ticket) -> Result<(), TicketRepositoryError> {
        Ok(())
    }

    async fn update(
        &self,
        _ticket: &Ticket,
        _expected: TicketStatus,
    ) -> Result<(), TicketRepositoryError> {
        Ok(())
    }

    async fn find_by_id(&self, _ticket_id: &Uuid) -> Result<Option<Ticket>, TicketRepositoryError> {
        Ok(None)
    }

    async fn numbers_for_prefix(
        &self,
        _day_key: &str,
        _prefix: &str,
    ) -> Result<Vec<String>, TicketRepositoryError> {
        Ok(Vec::new())
    }

    async fn number_exists(
        &self,
        _day_key: &str,
        _display_number: &str,
    ) -> Result<bool, TicketRepositoryError> {
        Ok(false)
    }

    async fn list_active(&self) -> Result<Vec<Ticket>, TicketRepositoryError> {
        Ok(Vec::new())
    }

    async fn list_by_customer(
        &self,
        _customer_id: &Uuid,
    ) -> Result<Vec<Ticket>, TicketRepositoryError> {
        Ok(Vec::new())
    }

    async fn list_open_created_before(
        &self,
        _cutoff: DateTime<Utc>,
    ) -> Result<Vec<Ticket>, TicketRepositoryError> {
        Ok(Vec::new())
    }

    async fn delete(&self, _ticket_id: &Uuid) -> Result<(), TicketRepositoryError> {
        Ok(())
    }
}
