//! Queue lifecycle manager.
//!
//! Owns ticket creation and the state machine over ticket status. Creation
//! is a multi-step transaction (directory lookup, price, display number,
//! insert) that retries from the numbering step when a racing creation
//! claims the same number. Transitions are compare-and-set writes guarded
//! by the status the ticket was read in; the `start` transition binds a
//! locker and the terminal transitions release it.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mockable::Clock;
use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::audit::AuditRecorder;
use crate::domain::business_day::BusinessDay;
use crate::domain::error::Error;
use crate::domain::locker_ledger::{LockerLedger, map_locker_store_error};
use crate::domain::numbering::TicketNumberGenerator;
use crate::domain::ports::{
    CreateTicketRequest, CustomerDirectory, CustomerDirectoryError, CustomerProfile, TicketFlow,
    TicketPayload, TicketQuery, TicketRepository, TicketRepositoryError, TransitionOutcome,
};
use crate::domain::ports::LockerRepository;
use crate::domain::pricing::price_for;
use crate::domain::retry::{ConflictClass, RetryPolicy, with_retry};
use crate::domain::ticket::{
    ServiceKind, Ticket, TicketAction, TicketStatus, numbering_type_code,
};

/// Creation retries from the numbering step, backoff 200ms × attempt.
const CREATION_RETRY: RetryPolicy = RetryPolicy::new(3, Duration::from_millis(200));

fn map_directory_error(error: CustomerDirectoryError) -> Error {
    match error {
        CustomerDirectoryError::Unavailable { message } => {
            Error::service_unavailable(format!("customer directory unavailable: {message}"))
        }
        CustomerDirectoryError::Query { message } => {
            Error::internal(format!("customer directory error: {message}"))
        }
    }
}

pub(crate) fn map_read_store_error(error: TicketRepositoryError) -> Error {
    match error {
        TicketRepositoryError::Unavailable { message } => {
            Error::service_unavailable(format!("ticket store unavailable: {message}"))
        }
        TicketRepositoryError::Missing { ticket_id } => {
            Error::not_found(format!("ticket {ticket_id} not found"))
        }
        other => Error::internal(format!("ticket store error: {other}")),
    }
}

fn map_creation_store_error(error: TicketRepositoryError) -> Error {
    if error.is_conflict() {
        // Retry budget is spent by the time this mapping runs.
        Error::allocation_failed("could not allocate a ticket, please retry")
    } else {
        map_read_store_error(error)
    }
}

fn map_transition_store_error(error: TicketRepositoryError) -> Error {
    match error {
        TicketRepositoryError::StaleStatus { .. } => {
            Error::invalid_transition("ticket changed state concurrently, please refresh")
        }
        other => map_read_store_error(other),
    }
}

/// Lifecycle service over the ticket and locker ports.
pub struct TicketService<R, L, D> {
    tickets: Arc<R>,
    ledger: LockerLedger<L>,
    directory: Arc<D>,
    numbering: TicketNumberGenerator<R>,
    audit: AuditRecorder,
    business_day: BusinessDay,
    clock: Arc<dyn Clock>,
}

impl<R, L, D> TicketService<R, L, D>
where
    R: TicketRepository,
    L: LockerRepository,
    D: CustomerDirectory,
{
    pub fn new(
        tickets: Arc<R>,
        lockers: Arc<L>,
        directory: Arc<D>,
        audit: AuditRecorder,
        business_day: BusinessDay,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let numbering = TicketNumberGenerator::new(tickets.clone(), clock.clone());
        Self {
            tickets,
            ledger: LockerLedger::new(lockers),
            directory,
            numbering,
            audit,
            business_day,
            clock,
        }
    }

    async fn load(&self, ticket_id: Uuid) -> Result<Ticket, Error> {
        self.tickets
            .find_by_id(&ticket_id)
            .await
            .map_err(map_read_store_error)?
            .ok_or_else(|| Error::not_found(format!("ticket {ticket_id} not found")))
    }

    async fn apply_call(&self, ticket: Ticket, now: DateTime<Utc>) -> Result<TransitionOutcome, Error> {
        let expected = ticket.status;
        let mut updated = ticket;
        updated.status = TicketStatus::Called;
        updated.called_at = Some(now);
        self.tickets
            .update(&updated, expected)
            .await
            .map_err(map_transition_store_error)?;
        self.audit.record("ticket_called", &updated, now);
        Ok(TransitionOutcome {
            ticket: TicketPayload::from_ticket(&updated, now),
            locker_assigned: true,
        })
    }

    /// Start service: claim the transition and bind a locker.
    ///
    /// The locker is bound first and the status write follows; a lost
    /// status race rolls the bind back so no locker leaks into a ticket
    /// that never entered `Processing`.
    async fn apply_start(&self, ticket: Ticket, now: DateTime<Utc>) -> Result<TransitionOutcome, Error> {
        let expected = ticket.status;
        let mut updated = ticket;
        let partition = updated.category.locker_partition();
        let assignment = self
            .ledger
            .assign(partition, updated.id)
            .await
            .map_err(map_locker_store_error)?;
        if assignment.is_none() {
            warn!(
                ticket = %updated.display_number,
                %partition,
                "no locker available, service proceeds without one"
            );
        }
        let locker_assigned = assignment.is_some();

        updated.status = TicketStatus::Processing;
        updated.started_at = Some(now);
        updated.bound_locker = assignment;

        if let Err(err) = self.tickets.update(&updated, expected).await {
            if let Some(code) = &updated.bound_locker {
                if let Err(release_err) = self.ledger.release(code).await {
                    warn!(locker = %code, error = %release_err, "rollback release failed");
                }
            }
            return Err(map_transition_store_error(err));
        }

        self.audit.record("service_started", &updated, now);
        Ok(TransitionOutcome {
            ticket: TicketPayload::from_ticket(&updated, now),
            locker_assigned,
        })
    }

    async fn apply_complete(&self, ticket: Ticket, now: DateTime<Utc>) -> Result<TransitionOutcome, Error> {
        let expected = ticket.status;
        let mut updated = ticket;
        let held = updated.bound_locker.take();
        updated.status = TicketStatus::Completed;
        updated.completed_at = Some(now);
        self.tickets
            .update(&updated, expected)
            .await
            .map_err(map_transition_store_error)?;
        if let Some(code) = held {
            self.ledger
                .release(&code)
                .await
                .map_err(map_locker_store_error)?;
        }
        self.audit.record("ticket_completed", &updated, now);
        Ok(TransitionOutcome {
            ticket: TicketPayload::from_ticket(&updated, now),
            locker_assigned: true,
        })
    }

    async fn apply_cancel(&self, ticket: Ticket, now: DateTime<Utc>) -> Result<TransitionOutcome, Error> {
        let expected = ticket.status;
        let mut updated = ticket;
        let held = updated.bound_locker.take();
        updated.status = TicketStatus::Cancelled;
        updated.cancelled_at = Some(now);
        self.tickets
            .update(&updated, expected)
            .await
            .map_err(map_transition_store_error)?;
        if let Some(code) = held {
            // A locker should not normally be bound this early; release
            // defensively all the same.
            self.ledger
                .release(&code)
                .await
                .map_err(map_locker_store_error)?;
        }
        self.audit.record("ticket_cancelled", &updated, now);
        Ok(TransitionOutcome {
            ticket: TicketPayload::from_ticket(&updated, now),
            locker_assigned: true,
        })
    }
}

#[async_trait]
impl<R, L, D> TicketFlow for TicketService<R, L, D>
where
    R: TicketRepository,
    L: LockerRepository,
    D: CustomerDirectory,
{
    async fn create_ticket(&self, request: CreateTicketRequest) -> Result<TicketPayload, Error> {
        let identifier = request.customer_identifier.trim().to_owned();
        if identifier.is_empty() {
            return Err(Error::invalid_request("customerIdentifier must not be empty"));
        }
        let Some(type_code) = numbering_type_code(request.kind, request.service) else {
            return Err(Error::invalid_request("restroom slots are walk-in only"));
        };
        if request.kind == ServiceKind::Booking && request.requested_time.is_none() {
            return Err(Error::invalid_request("a booking requires requestedTime"));
        }
        // Walk-ins carry no schedule; a stray requestedTime is dropped.
        let requested_time = (request.kind == ServiceKind::Booking)
            .then_some(request.requested_time)
            .flatten();

        let profile = CustomerProfile {
            display_name: request
                .display_name
                .clone()
                .unwrap_or_else(|| identifier.clone()),
            category: request.category,
            tier: request.tier,
        };
        let customer = self
            .directory
            .lookup_or_register(&identifier, &profile)
            .await
            .map_err(map_directory_error)?;

        let category = customer.category;
        let price = price_for(customer.tier, request.service);
        let day_key = self.business_day.day_key(self.clock.utc());

        let ticket = with_retry(CREATION_RETRY, |attempt| {
            let day_key = day_key.clone();
            async move {
                if attempt > 1 {
                    info!(attempt, "retrying ticket creation after a number collision");
                }
                let number = self
                    .numbering
                    .next_number(category, type_code, &day_key)
                    .await?;
                let now = self.clock.utc();
                let ticket = Ticket {
                    id: Uuid::new_v4(),
                    display_number: number,
                    day_key,
                    customer_id: customer.id,
                    category,
                    kind: request.kind,
                    service: request.service,
                    requested_time,
                    price,
                    status: TicketStatus::Waiting,
                    bound_locker: None,
                    created_at: now,
                    called_at: None,
                    started_at: None,
                    completed_at: None,
                    cancelled_at: None,
                };
                self.tickets.insert(&ticket).await?;
                Ok(ticket)
            }
        })
        .await
        .map_err(map_creation_store_error)?;

        info!(ticket = %ticket.display_number, price, "ticket created");
        self.audit
            .record("ticket_created", &ticket, ticket.created_at);
        Ok(TicketPayload::from_ticket(&ticket, self.clock.utc()))
    }

    async fn transition(
        &self,
        ticket_id: Uuid,
        action: TicketAction,
    ) -> Result<TransitionOutcome, Error> {
        let ticket = self.load(ticket_id).await?;
        if ticket.status.apply(action).is_none() {
            return Err(Error::invalid_transition(format!(
                "ticket {} is {} and cannot accept {}",
                ticket.display_number, ticket.status, action
            )));
        }
        let now = self.clock.utc();
        match action {
            TicketAction::Call => self.apply_call(ticket, now).await,
            TicketAction::Start => self.apply_start(ticket, now).await,
            TicketAction::Complete => self.apply_complete(ticket, now).await,
            TicketAction::Cancel => self.apply_cancel(ticket, now).await,
        }
    }
}

#[async_trait]
impl<R, L, D> TicketQuery for TicketService<R, L, D>
where
    R: TicketRepository,
    L: LockerRepository,
    D: CustomerDirectory,
{
    async fn get(&self, ticket_id: Uuid) -> Result<TicketPayload, Error> {
        let ticket = self.load(ticket_id).await?;
        Ok(TicketPayload::from_ticket(&ticket, self.clock.utc()))
    }

    async fn list_active(&self) -> Result<Vec<TicketPayload>, Error> {
        let now = self.clock.utc();
        let tickets = self
            .tickets
            .list_active()
            .await
            .map_err(map_read_store_error)?;
        Ok(tickets
            .iter()
            .map(|ticket| TicketPayload::from_ticket(ticket, now))
            .collect())
    }

    async fn list_by_customer(&self, customer_id: Uuid) -> Result<Vec<TicketPayload>, Error> {
        let now = self.clock.utc();
        let tickets = self
            .tickets
            .list_by_customer(&customer_id)
            .await
            .map_err(map_read_store_error)?;
        Ok(tickets
            .iter()
            .map(|ticket| TicketPayload::from_ticket(ticket, now))
            .collect())
    }
}

#[cfg(test)]
#[path = "ticket_service_tests.rs"]
mod tests;
