//! Ticket number generator.
//!
//! Display numbers are derived by scanning the day's existing numbers for
//! the partition prefix and taking max + 1 (wrapping after 999). There is
//! no persisted counter: the store's rows are the single source of truth,
//! which survives restarts for free. A concurrent insert between the scan
//! and the write shows up as a collision and is retried; after the retry
//! budget a timestamp-derived suffix keeps the path live at the cost of
//! strict sequentiality.

use std::sync::Arc;
use std::time::Duration;

use mockable::Clock;
use tracing::warn;

use crate::domain::ports::{TicketRepository, TicketRepositoryError};
use crate::domain::retry::{ConflictClass, RetryPolicy, with_retry};
use crate::domain::ticket::Category;

/// Highest sequence issued per (prefix, day); the next one wraps to 1.
pub const SEQUENCE_MAX: u16 = 999;

const NUMBERING_RETRY: RetryPolicy = RetryPolicy::new(3, Duration::from_millis(50));

/// Collision-checked display number allocation for one partition and day.
pub struct TicketNumberGenerator<R> {
    tickets: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<R> TicketNumberGenerator<R>
where
    R: TicketRepository,
{
    pub fn new(tickets: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self { tickets, clock }
    }

    /// Next display number for the (category, type code) partition on
    /// `day_key`.
    ///
    /// Never blocks indefinitely and always returns a syntactically valid,
    /// correctly prefixed number; uniqueness is best effort once the
    /// fallback path is reached.
    pub async fn next_number(
        &self,
        category: Category,
        type_code: char,
        day_key: &str,
    ) -> Result<String, TicketRepositoryError> {
        let prefix = format!("{}{}-", category.code(), type_code);

        let outcome = with_retry(NUMBERING_RETRY, |_attempt| {
            let prefix = prefix.clone();
            async move { self.sequential_candidate(&prefix, day_key).await }
        })
        .await;

        match outcome {
            Ok(number) => Ok(number),
            Err(err) if err.is_conflict() => {
                let fallback = self.fallback_number(&prefix);
                warn!(
                    %prefix,
                    %fallback,
                    "sequential numbering kept colliding, using timestamp fallback"
                );
                Ok(fallback)
            }
            Err(err) => Err(err),
        }
    }

    /// One scan-and-max attempt, verified against a concurrent insert.
    async fn sequential_candidate(
        &self,
        prefix: &str,
        day_key: &str,
    ) -> Result<String, TicketRepositoryError> {
        let existing = self.tickets.numbers_for_prefix(day_key, prefix).await?;
        let max = existing
            .iter()
            .filter_map(|number| parse_sequence(number, prefix))
            .max()
            .unwrap_or(0);
        let next = if max >= SEQUENCE_MAX { 1 } else { max + 1 };
        let number = format!("{prefix}{next:03}");

        // Re-check at write time: a racing creation may have claimed the
        // candidate since the scan.
        if self.tickets.number_exists(day_key, &number).await? {
            return Err(TicketRepositoryError::duplicate_number(number));
        }
        Ok(number)
    }

    /// Forward-progress fallback: a suffix derived from the clock's
    /// subsecond digits, kept within [1, 999]. Accepted rare-collision
    /// risk; not re-verified.
    fn fallback_number(&self, prefix: &str) -> String {
        let millis = self.clock.utc().timestamp_subsec_millis();
        let sequence = (millis % u32::from(SEQUENCE_MAX)) + 1;
        format!("{prefix}{sequence:03}")
    }
}

/// Parse the 3-digit suffix of `number` under `prefix`; `None` for foreign
/// or malformed rows.
fn parse_sequence(number: &str, prefix: &str) -> Option<u16> {
    let suffix = number.strip_prefix(prefix)?;
    if suffix.len() != 3 {
        return None;
    }
    let value: u16 = suffix.parse().ok()?;
    (1..=SEQUENCE_MAX).contains(&value).then_some(value)
}

#[cfg(test)]
#[path = "numbering_tests.rs"]
mod tests;
