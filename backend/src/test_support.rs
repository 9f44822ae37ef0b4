//! Test utilities for the backend crate.
//!
//! Shared helpers for unit tests (in `src/`) and integration tests (in
//! `tests/`). Only compiled when the `test-support` feature is enabled,
//! which the test targets do through the dev-dependency on the crate
//! itself.

pub mod clock {
    //! Clocks pinned to a fixture instant.

    use std::sync::Arc;

    use chrono::{DateTime, Local, Utc};
    use mockable::Clock;

    struct FixtureClock {
        utc_now: DateTime<Utc>,
    }

    impl Clock for FixtureClock {
        fn local(&self) -> DateTime<Local> {
            self.utc_now.with_timezone(&Local)
        }

        fn utc(&self) -> DateTime<Utc> {
            self.utc_now
        }
    }

    /// A clock frozen at the given RFC 3339 instant.
    ///
    /// # Panics
    ///
    /// Panics when `instant` is not a valid RFC 3339 timestamp.
    pub fn fixture_clock(instant: &str) -> Arc<dyn Clock> {
        Arc::new(FixtureClock {
            utc_now: instant.parse().expect("valid fixture timestamp"),
        })
    }
}
