//! Concurrency and day-boundary behaviour over the real in-memory adapters.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use backend::domain::audit::spawn_audit_writer;
use backend::domain::locker::{LockerCode, LockerPartition};
use backend::domain::ports::{
    CreateTicketRequest, FixtureAuditSink, LockerRepository, TicketFlow, TicketRepository,
};
use backend::domain::ticket::{
    Category, CustomerTier, ServiceKind, ServiceType, Ticket, TicketAction, TicketStatus,
};
use backend::domain::{BusinessDay, RetentionSweeper, TicketService};
use backend::outbound::directory::InMemoryCustomerDirectory;
use backend::outbound::persistence::InMemoryFacilityStore;
use backend::test_support::clock::fixture_clock;

fn at(rfc3339: &str) -> DateTime<Utc> {
    rfc3339.parse().expect("valid test timestamp")
}

const NOW: &str = "2026-08-23T05:00:00Z";
const TODAY: &str = "20260823";

fn service(
    store: Arc<InMemoryFacilityStore>,
) -> TicketService<InMemoryFacilityStore, InMemoryFacilityStore, InMemoryCustomerDirectory> {
    let (audit, _task) = spawn_audit_writer(Arc::new(FixtureAuditSink), 64);
    TicketService::new(
        store.clone(),
        store,
        Arc::new(InMemoryCustomerDirectory::new()),
        audit,
        BusinessDay::default(),
        fixture_clock(NOW),
    )
}

fn request(identifier: &str) -> CreateTicketRequest {
    CreateTicketRequest {
        customer_identifier: identifier.to_owned(),
        display_name: None,
        category: Category::Women,
        tier: CustomerTier::General,
        kind: ServiceKind::WalkIn,
        service: ServiceType::Shower,
        requested_time: None,
    }
}

fn stored_ticket(day_key: &str, number: &str, status: TicketStatus) -> Ticket {
    Ticket {
        id: Uuid::new_v4(),
        display_number: number.to_owned(),
        day_key: day_key.to_owned(),
        customer_id: Uuid::new_v4(),
        category: Category::Women,
        kind: ServiceKind::WalkIn,
        service: ServiceType::Shower,
        requested_time: None,
        price: 5000,
        status,
        bound_locker: None,
        created_at: at(NOW),
        called_at: None,
        started_at: None,
        completed_at: None,
        cancelled_at: None,
    }
}

#[tokio::test]
async fn the_sequence_wraps_past_999() {
    let store = Arc::new(InMemoryFacilityStore::new());
    store
        .insert(&stored_ticket(TODAY, "WS-999", TicketStatus::Completed))
        .await
        .expect("seed insert succeeds");

    let service = service(store);
    let payload = service
        .create_ticket(request("081-555-0101"))
        .await
        .expect("creation succeeds");

    assert_eq!(payload.display_number, "WS-001");
}

#[tokio::test]
async fn concurrent_creations_never_share_a_number() {
    let store = Arc::new(InMemoryFacilityStore::new());
    let service = Arc::new(service(store));

    let creations = (0..6).map(|n| {
        let service = service.clone();
        async move {
            service
                .create_ticket(request(&format!("081-555-01{n:02}")))
                .await
                .expect("creation succeeds")
        }
    });
    let mut numbers: Vec<String> = futures::future::join_all(creations)
        .await
        .into_iter()
        .map(|payload| payload.display_number)
        .collect();

    numbers.sort();
    numbers.dedup();
    assert_eq!(numbers.len(), 6, "every ticket got a distinct number");
}

#[tokio::test]
async fn one_locker_never_serves_two_tickets() {
    let store = Arc::new(InMemoryFacilityStore::with_lockers(1, 0, 0));
    let service = Arc::new(service(store));

    let mut ids = Vec::new();
    for identifier in ["081-555-0101", "081-555-0202"] {
        let payload = service
            .create_ticket(request(identifier))
            .await
            .expect("creation succeeds");
        service
            .transition(payload.id, TicketAction::Call)
            .await
            .expect("call succeeds");
        ids.push(payload.id);
    }

    let (first, second) = futures::join!(
        service.transition(ids[0], TicketAction::Start),
        service.transition(ids[1], TicketAction::Start),
    );
    let first = first.expect("start succeeds");
    let second = second.expect("start succeeds");

    let assigned = [&first, &second]
        .iter()
        .filter(|outcome| outcome.locker_assigned)
        .count();
    assert_eq!(assigned, 1, "exactly one ticket holds the locker");
    assert_eq!(first.ticket.status, TicketStatus::Processing);
    assert_eq!(second.ticket.status, TicketStatus::Processing);
}

#[tokio::test]
async fn the_day_rollover_purges_open_tickets_and_resets_lockers() {
    let store = Arc::new(InMemoryFacilityStore::with_lockers(1, 0, 0));

    let mut abandoned = stored_ticket("20260822", "WS-001", TicketStatus::Waiting);
    abandoned.created_at = at("2026-08-22T10:00:00Z");
    let mut finished = stored_ticket("20260822", "WS-002", TicketStatus::Completed);
    finished.created_at = at("2026-08-22T11:00:00Z");
    store.insert(&abandoned).await.expect("seed insert");
    store.insert(&finished).await.expect("seed insert");
    store
        .bind(&LockerCode::new(LockerPartition::Women, 1), abandoned.id)
        .await
        .expect("bind succeeds");

    let sweeper = RetentionSweeper::new(
        store.clone(),
        store.clone(),
        BusinessDay::default(),
        fixture_clock(NOW),
    );
    let report = sweeper.run_once().await.expect("sweep succeeds");

    assert_eq!(report.purged, 1);
    assert_eq!(report.lockers_reset, 1);
    assert!(
        store
            .find_by_id(&abandoned.id)
            .await
            .expect("query succeeds")
            .is_none(),
        "the abandoned ticket is gone"
    );
    assert!(
        store
            .find_by_id(&finished.id)
            .await
            .expect("query succeeds")
            .is_some(),
        "the finished ticket is kept for reporting"
    );
    let free = store
        .find_available(LockerPartition::Women)
        .await
        .expect("query succeeds");
    assert!(free.is_some(), "the locker is back in the pool");
}

#[tokio::test]
async fn numbers_restart_after_the_rollover() {
    let store = Arc::new(InMemoryFacilityStore::new());
    // Yesterday's tickets stay in the store but belong to another day key.
    store
        .insert(&stored_ticket("20260822", "WS-007", TicketStatus::Completed))
        .await
        .expect("seed insert");

    let service = service(store);
    let payload = service
        .create_ticket(request("081-555-0101"))
        .await
        .expect("creation succeeds");

    assert_eq!(payload.display_number, "WS-001");
}
