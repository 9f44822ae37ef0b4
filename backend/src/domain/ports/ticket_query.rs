//! Driving port for ticket read models.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::error::Error;

use super::ticket_flow::TicketPayload;

/// Driving port for dashboard reads.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TicketQuery: Send + Sync {
    /// Read one ticket.
    async fn get(&self, ticket_id: Uuid) -> Result<TicketPayload, Error>;

    /// Non-terminal tickets, oldest first.
    async fn list_active(&self) -> Result<Vec<TicketPayload>, Error>;

    /// Every ticket for a customer, oldest first.
    async fn list_by_customer(&self, customer_id: Uuid) -> Result<Vec<TicketPayload>, Error>;
}
