//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod audit_sink;
mod customer_directory;
mod locker_query;
mod locker_repository;
mod ticket_flow;
mod ticket_query;
mod ticket_repository;

#[cfg(test)]
pub use audit_sink::MockAuditSink;
pub use audit_sink::{AuditRecord, AuditSink, AuditSinkError, FixtureAuditSink};
#[cfg(test)]
pub use customer_directory::MockCustomerDirectory;
pub use customer_directory::{
    CustomerDirectory, CustomerDirectoryError, CustomerProfile, CustomerRecord,
    FixtureCustomerDirectory,
};
#[cfg(test)]
pub use locker_query::MockLockerQuery;
pub use locker_query::{LockerPayload, LockerQuery};
#[cfg(test)]
pub use locker_repository::MockLockerRepository;
pub use locker_repository::{FixtureLockerRepository, LockerRepository, LockerRepositoryError};
#[cfg(test)]
pub use ticket_flow::MockTicketFlow;
pub use ticket_flow::{CreateTicketRequest, TicketFlow, TicketPayload, TransitionOutcome};
#[cfg(test)]
pub use ticket_query::MockTicketQuery;
pub use ticket_query::TicketQuery;
#[cfg(test)]
pub use ticket_repository::MockTicketRepository;
pub use ticket_repository::{FixtureTicketRepository, TicketRepository, TicketRepositoryError};
