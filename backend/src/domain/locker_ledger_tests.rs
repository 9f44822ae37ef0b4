//! Tests for the locker ledger.

use std::sync::Arc;

use mockall::Sequence;
use uuid::Uuid;

use super::LockerLedger;
use crate::domain::locker::{Locker, LockerCode, LockerPartition, LockerStatus};
use crate::domain::ports::{LockerQuery, LockerRepositoryError, MockLockerRepository};

fn available(partition: LockerPartition, sequence: u8) -> Locker {
    Locker::provision(partition, sequence)
}

#[tokio::test]
async fn assign_binds_the_lowest_available_locker() {
    let ticket_id = Uuid::new_v4();
    let mut repo = MockLockerRepository::new();
    repo.expect_find_available()
        .times(1)
        .returning(|partition| Ok(Some(available(partition, 3))));
    repo.expect_bind()
        .times(1)
        .withf(move |code, ticket| code.as_str() == "W03" && *ticket == ticket_id)
        .returning(|_, _| Ok(()));

    let ledger = LockerLedger::new(Arc::new(repo));
    let assigned = ledger
        .assign(LockerPartition::Women, ticket_id)
        .await
        .expect("assignment succeeds");

    assert_eq!(assigned.map(|code| code.as_str().to_owned()), Some("W03".to_owned()));
}

#[tokio::test]
async fn an_exhausted_partition_reports_none() {
    let mut repo = MockLockerRepository::new();
    repo.expect_find_available().times(1).returning(|_| Ok(None));
    repo.expect_bind().times(0);

    let ledger = LockerLedger::new(Arc::new(repo));
    let assigned = ledger
        .assign(LockerPartition::Men, Uuid::new_v4())
        .await
        .expect("exhaustion is not an error");

    assert!(assigned.is_none());
}

#[tokio::test]
async fn losing_the_bind_race_reselects_once() {
    let mut repo = MockLockerRepository::new();
    let mut seq = Sequence::new();
    repo.expect_find_available()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|partition| Ok(Some(available(partition, 1))));
    repo.expect_bind()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|code, _| Err(LockerRepositoryError::not_available(code.as_str())));
    repo.expect_find_available()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|partition| Ok(Some(available(partition, 2))));
    repo.expect_bind()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_, _| Ok(()));

    let ledger = LockerLedger::new(Arc::new(repo));
    let assigned = ledger
        .assign(LockerPartition::Women, Uuid::new_v4())
        .await
        .expect("reselection succeeds");

    assert_eq!(assigned.map(|code| code.as_str().to_owned()), Some("W02".to_owned()));
}

#[tokio::test]
async fn a_second_lost_race_gives_up_without_error() {
    let mut repo = MockLockerRepository::new();
    repo.expect_find_available()
        .times(2)
        .returning(|partition| Ok(Some(available(partition, 1))));
    repo.expect_bind()
        .times(2)
        .returning(|code, _| Err(LockerRepositoryError::not_available(code.as_str())));

    let ledger = LockerLedger::new(Arc::new(repo));
    let assigned = ledger
        .assign(LockerPartition::Women, Uuid::new_v4())
        .await
        .expect("giving up is not an error");

    assert!(assigned.is_none());
}

#[tokio::test]
async fn store_failures_propagate() {
    let mut repo = MockLockerRepository::new();
    repo.expect_find_available()
        .times(1)
        .returning(|_| Err(LockerRepositoryError::unavailable("store down")));

    let ledger = LockerLedger::new(Arc::new(repo));
    let error = ledger
        .assign(LockerPartition::Women, Uuid::new_v4())
        .await
        .expect_err("store errors propagate");

    assert_eq!(error, LockerRepositoryError::unavailable("store down"));
}

#[tokio::test]
async fn release_delegates_to_the_repository() {
    let mut repo = MockLockerRepository::new();
    repo.expect_release()
        .times(1)
        .withf(|code| code.as_str() == "M05")
        .returning(|_| Ok(()));

    let ledger = LockerLedger::new(Arc::new(repo));
    ledger
        .release(&LockerCode::new(LockerPartition::Men, 5))
        .await
        .expect("release succeeds");
}

#[tokio::test]
async fn list_maps_lockers_into_payloads() {
    let mut repo = MockLockerRepository::new();
    repo.expect_list().times(1).returning(|_| {
        let mut occupied = available(LockerPartition::Women, 2);
        occupied.status = LockerStatus::Occupied;
        occupied.bound_ticket = Some(Uuid::new_v4());
        Ok(vec![available(LockerPartition::Women, 1), occupied])
    });

    let ledger = LockerLedger::new(Arc::new(repo));
    let payloads = ledger
        .list(Some(LockerPartition::Women))
        .await
        .expect("list succeeds");

    assert_eq!(payloads.len(), 2);
    assert_eq!(payloads[0].code, "W01");
    assert_eq!(payloads[1].status, LockerStatus::Occupied);
    assert!(payloads[1].ticket_id.is_some());
}
