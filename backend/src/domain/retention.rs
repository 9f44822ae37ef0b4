//! Daily retention sweep.
//!
//! Tickets carry no history past the business day: once the local day
//! rolls over, open tickets from previous days are purged and every
//! non-maintenance locker is forced back to available. Terminal tickets
//! are left alone; the store keeps them for end-of-day reporting.

use std::sync::Arc;
use std::time::Duration;

use mockable::Clock;
use tokio::time::MissedTickBehavior;
use tracing::{info, warn};

use crate::domain::business_day::BusinessDay;
use crate::domain::error::Error;
use crate::domain::locker_ledger::map_locker_store_error;
use crate::domain::ports::{LockerRepository, TicketRepository};
use crate::domain::ticket_service::map_read_store_error;

/// What a single sweep did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SweepReport {
    /// Open tickets from previous days that were purged.
    pub purged: u32,
    /// Lockers forced back to available.
    pub lockers_reset: u32,
}

/// Background sweeper over the ticket and locker stores.
pub struct RetentionSweeper<R, L> {
    tickets: Arc<R>,
    lockers: Arc<L>,
    business_day: BusinessDay,
    clock: Arc<dyn Clock>,
}

impl<R, L> RetentionSweeper<R, L>
where
    R: TicketRepository,
    L: LockerRepository,
{
    pub fn new(
        tickets: Arc<R>,
        lockers: Arc<L>,
        business_day: BusinessDay,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            tickets,
            lockers,
            business_day,
            clock,
        }
    }

    /// Sweep once: purge open tickets created before the start of the
    /// current local day, then reset the locker inventory.
    pub async fn run_once(&self) -> Result<SweepReport, Error> {
        let cutoff = self.business_day.day_start(self.clock.utc());
        let stale = self
            .tickets
            .list_open_created_before(cutoff)
            .await
            .map_err(map_read_store_error)?;
        let mut purged = 0u32;
        for ticket in &stale {
            self.tickets
                .delete(&ticket.id)
                .await
                .map_err(map_read_store_error)?;
            purged += 1;
        }
        let lockers_reset = self
            .lockers
            .reset_all_available()
            .await
            .map_err(map_locker_store_error)?;
        info!(purged, lockers_reset, "retention sweep complete");
        Ok(SweepReport {
            purged,
            lockers_reset,
        })
    }

    /// Poll every `every` and sweep when the local day rolls over.
    ///
    /// A failed sweep leaves the remembered day unchanged, so the next
    /// tick tries again rather than waiting a full day.
    pub async fn run(self: Arc<Self>, every: Duration) {
        let mut ticker = tokio::time::interval(every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut last_key = self.business_day.day_key(self.clock.utc());
        loop {
            ticker.tick().await;
            let key = self.business_day.day_key(self.clock.utc());
            if key == last_key {
                continue;
            }
            match self.run_once().await {
                Ok(report) => {
                    info!(
                        day = %key,
                        purged = report.purged,
                        lockers_reset = report.lockers_reset,
                        "day rollover swept"
                    );
                    last_key = key;
                }
                Err(error) => {
                    warn!(%error, "retention sweep failed, retrying next tick");
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "retention_tests.rs"]
mod tests;
