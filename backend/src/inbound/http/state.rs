//! Shared handler state over the driving ports.

use std::sync::Arc;

use crate::domain::ports::{LockerQuery, TicketFlow, TicketQuery};

/// Port handles injected into every HTTP handler.
#[derive(Clone)]
pub struct HttpState {
    pub ticket_flow: Arc<dyn TicketFlow>,
    pub ticket_query: Arc<dyn TicketQuery>,
    pub locker_query: Arc<dyn LockerQuery>,
}
