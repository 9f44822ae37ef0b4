//! Driving port for ticket creation and lifecycle transitions.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::error::Error;
use crate::domain::ticket::{
    Category, CustomerTier, ServiceKind, ServiceType, Ticket, TicketAction, TicketStatus,
};

/// Request to create a queue ticket.
///
/// The profile fields (`display_name`, `category`, `tier`) seed the customer
/// directory when the identifier is unknown; for a returning customer the
/// directory record wins.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateTicketRequest {
    pub customer_identifier: String,
    pub display_name: Option<String>,
    pub category: Category,
    pub tier: CustomerTier,
    pub kind: ServiceKind,
    pub service: ServiceType,
    pub requested_time: Option<DateTime<Utc>>,
}

/// Read model of a ticket handed to adapters.
#[derive(Debug, Clone, PartialEq)]
pub struct TicketPayload {
    pub id: Uuid,
    pub display_number: String,
    pub customer_id: Uuid,
    pub category: Category,
    pub kind: ServiceKind,
    pub service: ServiceType,
    pub requested_time: Option<DateTime<Utc>>,
    pub price: u32,
    pub status: TicketStatus,
    pub locker: Option<String>,
    /// Overtime signal: in `Processing` beyond the fixed limit as of the
    /// read instant.
    pub overtime: bool,
    pub created_at: DateTime<Utc>,
    pub called_at: Option<DateTime<Utc>>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub cancelled_at: Option<DateTime<Utc>>,
}

impl TicketPayload {
    /// Project a ticket as of `now`.
    pub fn from_ticket(ticket: &Ticket, now: DateTime<Utc>) -> Self {
        Self {
            id: ticket.id,
            display_number: ticket.display_number.clone(),
            customer_id: ticket.customer_id,
            category: ticket.category,
            kind: ticket.kind,
            service: ticket.service,
            requested_time: ticket.requested_time,
            price: ticket.price,
            status: ticket.status,
            locker: ticket.bound_locker.as_ref().map(|code| code.as_str().to_owned()),
            overtime: ticket.is_overtime(now),
            created_at: ticket.created_at,
            called_at: ticket.called_at,
            started_at: ticket.started_at,
            completed_at: ticket.completed_at,
            cancelled_at: ticket.cancelled_at,
        }
    }
}

/// Result of a lifecycle transition.
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionOutcome {
    pub ticket: TicketPayload,
    /// False only when a `start` action found no free locker in the
    /// ticket's partition; the service proceeds without one.
    pub locker_assigned: bool,
}

/// Driving port for staff and kiosk tooling.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TicketFlow: Send + Sync {
    /// Create a ticket: derive partition and price, allocate a display
    /// number, and persist in `Waiting`.
    async fn create_ticket(&self, request: CreateTicketRequest) -> Result<TicketPayload, Error>;

    /// Apply a staff action to a ticket.
    async fn transition(
        &self,
        ticket_id: Uuid,
        action: TicketAction,
    ) -> Result<TransitionOutcome, Error>;
}
