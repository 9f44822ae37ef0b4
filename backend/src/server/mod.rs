//! Application wiring: adapters plugged into the domain services.
//!
//! Lives in the library so integration tests can boot the same graph the
//! binary serves.

mod config;

use std::sync::Arc;

use actix_web::web;
use mockable::DefaultClock;
use tokio::task::JoinHandle;

use crate::domain::audit::spawn_audit_writer;
use crate::domain::{BusinessDay, LockerLedger, RetentionSweeper, TicketService};
use crate::inbound::http::health::{self, HealthState};
use crate::inbound::http::{HttpState, lockers, tickets, validation};
use crate::outbound::audit::TracingAuditSink;
use crate::outbound::directory::InMemoryCustomerDirectory;
use crate::outbound::persistence::InMemoryFacilityStore;

pub use config::ServerConfig;

/// The wired application graph.
pub struct Application {
    pub state: HttpState,
    pub sweeper: Arc<RetentionSweeper<InMemoryFacilityStore, InMemoryFacilityStore>>,
    /// Audit drain task; held so shutdown can await the spool.
    pub audit_task: JoinHandle<()>,
}

/// Build the full service graph. Must run inside a Tokio runtime because
/// the audit drain task is spawned here.
pub fn build_application(config: &ServerConfig) -> Application {
    let store = Arc::new(InMemoryFacilityStore::with_lockers(
        config.lockers_women,
        config.lockers_men,
        config.lockers_unisex,
    ));
    let directory = Arc::new(InMemoryCustomerDirectory::new());
    let (audit, audit_task) =
        spawn_audit_writer(Arc::new(TracingAuditSink), config.audit_queue_capacity);
    let business_day =
        BusinessDay::from_east_hours(config.facility_offset_hours).unwrap_or_default();
    let clock = Arc::new(DefaultClock);

    let service = Arc::new(TicketService::new(
        store.clone(),
        store.clone(),
        directory,
        audit,
        business_day,
        clock.clone(),
    ));
    let sweeper = Arc::new(RetentionSweeper::new(
        store.clone(),
        store.clone(),
        business_day,
        clock,
    ));

    Application {
        state: HttpState {
            ticket_flow: service.clone(),
            ticket_query: service,
            locker_query: Arc::new(LockerLedger::new(store)),
        },
        sweeper,
        audit_task,
    }
}

/// Register routes, state, and extractor error handlers on an Actix app.
pub fn configure_app(
    cfg: &mut web::ServiceConfig,
    state: HttpState,
    health_state: web::Data<HealthState>,
) {
    cfg.app_data(web::Data::new(state))
        .app_data(health_state)
        .app_data(web::JsonConfig::default().error_handler(validation::json_error_handler))
        .app_data(web::PathConfig::default().error_handler(validation::path_error_handler))
        .app_data(web::QueryConfig::default().error_handler(validation::query_error_handler))
        .service(tickets::create_ticket)
        .service(tickets::list_tickets)
        .service(tickets::get_ticket)
        .service(tickets::transition_ticket)
        .service(lockers::list_lockers)
        .service(health::ready)
        .service(health::live);
}
