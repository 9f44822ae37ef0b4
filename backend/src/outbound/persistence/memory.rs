//! In-memory store backing the ticket and locker repository ports.
//!
//! The two maps are guarded by independent locks; every mutation takes the
//! write lock for the duration of its check-then-write, which gives the
//! per-row transactional semantics the ports promise: unique (day, number)
//! on insert, compare-and-set on ticket status and locker availability.

use std::collections::{BTreeMap, HashMap};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::locker::{Locker, LockerCode, LockerPartition, LockerStatus};
use crate::domain::ports::{
    LockerRepository, LockerRepositoryError, TicketRepository, TicketRepositoryError,
};
use crate::domain::ticket::{Ticket, TicketStatus};

/// Process-local facility store.
pub struct InMemoryFacilityStore {
    tickets: RwLock<HashMap<Uuid, Ticket>>,
    // BTreeMap keeps lockers in code order, so "lowest available" is the
    // first available entry.
    lockers: RwLock<BTreeMap<LockerCode, Locker>>,
}

impl InMemoryFacilityStore {
    /// An empty store with no lockers provisioned.
    pub fn new() -> Self {
        Self {
            tickets: RwLock::new(HashMap::new()),
            lockers: RwLock::new(BTreeMap::new()),
        }
    }

    /// A store provisioned with `1..=n` lockers per partition.
    pub fn with_lockers(women: u8, men: u8, unisex: u8) -> Self {
        let store = Self::new();
        for (partition, count) in [
            (LockerPartition::Women, women),
            (LockerPartition::Men, men),
            (LockerPartition::Unisex, unisex),
        ] {
            for sequence in 1..=count {
                store.add_locker(Locker::provision(partition, sequence));
            }
        }
        store
    }

    /// Add a locker to the inventory, replacing any existing unit under the
    /// same code.
    pub fn add_locker(&self, locker: Locker) {
        if let Ok(mut lockers) = self.lockers.write() {
            lockers.insert(locker.code.clone(), locker);
        }
    }

    fn read_tickets(
        &self,
    ) -> Result<RwLockReadGuard<'_, HashMap<Uuid, Ticket>>, TicketRepositoryError> {
        self.tickets
            .read()
            .map_err(|_| TicketRepositoryError::unavailable("ticket lock poisoned"))
    }

    fn write_tickets(
        &self,
    ) -> Result<RwLockWriteGuard<'_, HashMap<Uuid, Ticket>>, TicketRepositoryError> {
        self.tickets
            .write()
            .map_err(|_| TicketRepositoryError::unavailable("ticket lock poisoned"))
    }

    fn read_lockers(
        &self,
    ) -> Result<RwLockReadGuard<'_, BTreeMap<LockerCode, Locker>>, LockerRepositoryError> {
        self.lockers
            .read()
            .map_err(|_| LockerRepositoryError::unavailable("locker lock poisoned"))
    }

    fn write_lockers(
        &self,
    ) -> Result<RwLockWriteGuard<'_, BTreeMap<LockerCode, Locker>>, LockerRepositoryError> {
        self.lockers
            .write()
            .map_err(|_| LockerRepositoryError::unavailable("locker lock poisoned"))
    }
}

impl Default for InMemoryFacilityStore {
    fn default() -> Self {
        Self::new()
    }
}

fn sorted_by_creation(mut tickets: Vec<Ticket>) -> Vec<Ticket> {
    tickets.sort_by_key(|ticket| ticket.created_at);
    tickets
}

#[async_trait]
impl TicketRepository for InMemoryFacilityStore {
    async fn insert(&self, ticket: &Ticket) -> Result<(), TicketRepositoryError> {
        let mut tickets = self.write_tickets()?;
        let taken = tickets.values().any(|existing| {
            existing.day_key == ticket.day_key && existing.display_number == ticket.display_number
        });
        if taken {
            return Err(TicketRepositoryError::duplicate_number(
                ticket.display_number.clone(),
            ));
        }
        tickets.insert(ticket.id, ticket.clone());
        Ok(())
    }

    async fn update(
        &self,
        ticket: &Ticket,
        expected: TicketStatus,
    ) -> Result<(), TicketRepositoryError> {
        let mut tickets = self.write_tickets()?;
        let Some(current) = tickets.get_mut(&ticket.id) else {
            return Err(TicketRepositoryError::missing(ticket.id));
        };
        if current.status != expected {
            return Err(TicketRepositoryError::stale_status(ticket.id));
        }
        *current = ticket.clone();
        Ok(())
    }

    async fn find_by_id(&self, ticket_id: &Uuid) -> Result<Option<Ticket>, TicketRepositoryError> {
        Ok(self.read_tickets()?.get(ticket_id).cloned())
    }

    async fn numbers_for_prefix(
        &self,
        day_key: &str,
        prefix: &str,
    ) -> Result<Vec<String>, TicketRepositoryError> {
        Ok(self
            .read_tickets()?
            .values()
            .filter(|ticket| {
                ticket.day_key == day_key && ticket.display_number.starts_with(prefix)
            })
            .map(|ticket| ticket.display_number.clone())
            .collect())
    }

    async fn number_exists(
        &self,
        day_key: &str,
        display_number: &str,
    ) -> Result<bool, TicketRepositoryError> {
        Ok(self.read_tickets()?.values().any(|ticket| {
            ticket.day_key == day_key && ticket.display_number == display_number
        }))
    }

    async fn list_active(&self) -> Result<Vec<Ticket>, TicketRepositoryError> {
        let tickets = self
            .read_tickets()?
            .values()
            .filter(|ticket| !ticket.status.is_terminal())
            .cloned()
            .collect();
        Ok(sorted_by_creation(tickets))
    }

    async fn list_by_customer(
        &self,
        customer_id: &Uuid,
    ) -> Result<Vec<Ticket>, TicketRepositoryError> {
        let tickets = self
            .read_tickets()?
            .values()
            .filter(|ticket| ticket.customer_id == *customer_id)
            .cloned()
            .collect();
        Ok(sorted_by_creation(tickets))
    }

    async fn list_open_created_before(
        &self,
        cutoff: DateTime<Utc>,
    ) -> Result<Vec<Ticket>, TicketRepositoryError> {
        let tickets = self
            .read_tickets()?
            .values()
            .filter(|ticket| !ticket.status.is_terminal() && ticket.created_at < cutoff)
            .cloned()
            .collect();
        Ok(sorted_by_creation(tickets))
    }

    async fn delete(&self, ticket_id: &Uuid) -> Result<(), TicketRepositoryError> {
        self.write_tickets()?.remove(ticket_id);
        Ok(())
    }
}

#[async_trait]
impl LockerRepository for InMemoryFacilityStore {
    async fn list(
        &self,
        partition: Option<LockerPartition>,
    ) -> Result<Vec<Locker>, LockerRepositoryError> {
        Ok(self
            .read_lockers()?
            .values()
            .filter(|locker| partition.is_none_or(|wanted| locker.partition == wanted))
            .cloned()
            .collect())
    }

    async fn find_available(
        &self,
        partition: LockerPartition,
    ) -> Result<Option<Locker>, LockerRepositoryError> {
        Ok(self
            .read_lockers()?
            .values()
            .find(|locker| {
                locker.partition == partition && locker.status == LockerStatus::Available
            })
            .cloned())
    }

    async fn bind(&self, code: &LockerCode, ticket_id: Uuid) -> Result<(), LockerRepositoryError> {
        let mut lockers = self.write_lockers()?;
        let Some(locker) = lockers.get_mut(code) else {
            return Err(LockerRepositoryError::missing(code.as_str()));
        };
        if locker.status != LockerStatus::Available {
            return Err(LockerRepositoryError::not_available(code.as_str()));
        }
        locker.status = LockerStatus::Occupied;
        locker.bound_ticket = Some(ticket_id);
        Ok(())
    }

    async fn release(&self, code: &LockerCode) -> Result<(), LockerRepositoryError> {
        let mut lockers = self.write_lockers()?;
        let Some(locker) = lockers.get_mut(code) else {
            return Err(LockerRepositoryError::missing(code.as_str()));
        };
        if locker.status == LockerStatus::Occupied {
            locker.status = LockerStatus::Available;
            locker.bound_ticket = None;
        }
        Ok(())
    }

    async fn reset_all_available(&self) -> Result<u32, LockerRepositoryError> {
        let mut lockers = self.write_lockers()?;
        let mut reset = 0;
        for locker in lockers.values_mut() {
            if locker.status == LockerStatus::Occupied {
                locker.status = LockerStatus::Available;
                locker.bound_ticket = None;
                reset += 1;
            }
        }
        Ok(reset)
    }
}
