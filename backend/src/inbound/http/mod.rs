//! REST adapter for kiosk and staff tooling.

pub mod error;
pub mod health;
pub mod lockers;
pub mod state;
pub mod tickets;
pub(crate) mod validation;

pub use error::{ApiError, ApiResult};
pub use state::HttpState;
