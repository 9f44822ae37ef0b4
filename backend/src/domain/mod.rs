//! Domain layer: queue lifecycle, numbering, locker ledger, and the ports
//! adapters implement or drive.

pub mod audit;
pub mod business_day;
pub mod error;
pub mod locker;
pub mod locker_ledger;
pub mod numbering;
pub mod ports;
pub mod pricing;
pub mod retention;
pub mod retry;
pub mod ticket;
pub mod ticket_service;

pub use business_day::BusinessDay;
pub use error::{Error, ErrorCode};
pub use locker_ledger::LockerLedger;
pub use retention::{RetentionSweeper, SweepReport};
pub use ticket_service::TicketService;
