//! Tests for the ticket number generator.

use std::sync::Arc;

use mockall::Sequence;

use super::TicketNumberGenerator;
use crate::domain::ports::{MockTicketRepository, TicketRepositoryError};
use crate::domain::ticket::Category;
use crate::test_support::clock::fixture_clock;

fn generator(repo: MockTicketRepository) -> TicketNumberGenerator<MockTicketRepository> {
    // 123 ms into the second; the fallback suffix derives from this.
    TicketNumberGenerator::new(Arc::new(repo), fixture_clock("2026-08-23T03:15:30.123Z"))
}

#[tokio::test]
async fn first_ticket_of_the_day_gets_001() {
    let mut repo = MockTicketRepository::new();
    repo.expect_numbers_for_prefix()
        .returning(|_, _| Ok(Vec::new()));
    repo.expect_number_exists().returning(|_, _| Ok(false));

    let number = generator(repo)
        .next_number(Category::Women, 'S', "20260823")
        .await
        .expect("allocation succeeds");

    assert_eq!(number, "WS-001");
}

#[tokio::test]
async fn sequence_continues_from_the_day_maximum() {
    let mut repo = MockTicketRepository::new();
    repo.expect_numbers_for_prefix()
        .returning(|_, _| Ok(vec!["MS-001".to_owned(), "MS-002".to_owned()]));
    repo.expect_number_exists().returning(|_, _| Ok(false));

    let number = generator(repo)
        .next_number(Category::Men, 'S', "20260823")
        .await
        .expect("allocation succeeds");

    assert_eq!(number, "MS-003");
}

#[tokio::test]
async fn malformed_suffixes_are_ignored() {
    let mut repo = MockTicketRepository::new();
    repo.expect_numbers_for_prefix().returning(|_, _| {
        Ok(vec![
            "WB-002".to_owned(),
            "WB-xyz".to_owned(),
            "WB-1000".to_owned(),
            "WB-07".to_owned(),
        ])
    });
    repo.expect_number_exists().returning(|_, _| Ok(false));

    let number = generator(repo)
        .next_number(Category::Women, 'B', "20260823")
        .await
        .expect("allocation succeeds");

    assert_eq!(number, "WB-003");
}

#[tokio::test]
async fn sequence_wraps_after_999() {
    let mut repo = MockTicketRepository::new();
    repo.expect_numbers_for_prefix()
        .returning(|_, _| Ok(vec!["WS-999".to_owned()]));
    repo.expect_number_exists().returning(|_, _| Ok(false));

    let number = generator(repo)
        .next_number(Category::Women, 'S', "20260823")
        .await
        .expect("allocation succeeds");

    assert_eq!(number, "WS-001");
}

#[tokio::test]
async fn a_racing_insert_triggers_a_rescan() {
    let mut repo = MockTicketRepository::new();
    let mut seq = Sequence::new();
    repo.expect_numbers_for_prefix()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_, _| Ok(vec!["WS-004".to_owned()]));
    repo.expect_number_exists()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_, _| Ok(true));
    repo.expect_numbers_for_prefix()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_, _| Ok(vec!["WS-004".to_owned(), "WS-005".to_owned()]));
    repo.expect_number_exists()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_, _| Ok(false));

    let number = generator(repo)
        .next_number(Category::Women, 'S', "20260823")
        .await
        .expect("retry succeeds");

    assert_eq!(number, "WS-006");
}

#[tokio::test]
async fn exhausted_retries_fall_back_to_a_timestamp_suffix() {
    let mut repo = MockTicketRepository::new();
    repo.expect_numbers_for_prefix()
        .times(3)
        .returning(|_, _| Ok(Vec::new()));
    repo.expect_number_exists().times(3).returning(|_, _| Ok(true));

    let number = generator(repo)
        .next_number(Category::Women, 'S', "20260823")
        .await
        .expect("fallback keeps the path live");

    // 123 ms -> (123 % 999) + 1.
    assert_eq!(number, "WS-124");
}

#[tokio::test]
async fn store_failures_are_not_retried() {
    let mut repo = MockTicketRepository::new();
    repo.expect_numbers_for_prefix()
        .times(1)
        .returning(|_, _| Err(TicketRepositoryError::unavailable("store down")));
    repo.expect_number_exists().times(0);

    let error = generator(repo)
        .next_number(Category::Women, 'S', "20260823")
        .await
        .expect_err("store errors propagate");

    assert_eq!(error, TicketRepositoryError::unavailable("store down"));
}
