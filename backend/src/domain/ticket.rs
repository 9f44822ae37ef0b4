//! Queue ticket entity and its state machine.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::locker::{LockerCode, LockerPartition};

/// A ticket in `Processing` longer than this is flagged as overtime.
/// Observational only; no transition is forced.
pub const OVERTIME_LIMIT_HOURS: i64 = 3;

/// Customer category. Fixes the numbering prefix and which locker partition
/// may be bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Women,
    Men,
}

impl Category {
    /// One-letter code used in display numbers, e.g. the `W` in `WS-001`.
    pub const fn code(self) -> char {
        match self {
            Self::Women => 'W',
            Self::Men => 'M',
        }
    }

    /// Locker partition the category draws from. Exhaustion does not fall
    /// back to the unisex pool.
    pub const fn locker_partition(self) -> LockerPartition {
        match self {
            Self::Women => LockerPartition::Women,
            Self::Men => LockerPartition::Men,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Women => "women",
            Self::Men => "men",
        };
        write!(f, "{name}")
    }
}

impl FromStr for Category {
    type Err = ();

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "women" => Ok(Self::Women),
            "men" => Ok(Self::Men),
            _ => Err(()),
        }
    }
}

/// Whether the ticket is a walk-in or a time-booked slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ServiceKind {
    WalkIn,
    Booking,
}

impl fmt::Display for ServiceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::WalkIn => "walk_in",
            Self::Booking => "booking",
        };
        write!(f, "{name}")
    }
}

impl FromStr for ServiceKind {
    type Err = ();

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "walk_in" => Ok(Self::WalkIn),
            "booking" => Ok(Self::Booking),
            _ => Err(()),
        }
    }
}

/// Facility service bought with the ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ServiceType {
    Shower,
    Restroom,
}

impl fmt::Display for ServiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Shower => "shower",
            Self::Restroom => "restroom",
        };
        write!(f, "{name}")
    }
}

impl FromStr for ServiceType {
    type Err = ();

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "shower" => Ok(Self::Shower),
            "restroom" => Ok(Self::Restroom),
            _ => Err(()),
        }
    }
}

/// Customer fee class, held by the customer directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum CustomerTier {
    General,
    Member,
}

impl FromStr for CustomerTier {
    type Err = ();

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "general" => Ok(Self::General),
            "member" => Ok(Self::Member),
            _ => Err(()),
        }
    }
}

/// Numbering sub-partition code for a (kind, service) combination.
///
/// Returns `None` for combinations the facility does not sell: restroom
/// slots are walk-in only.
pub const fn numbering_type_code(kind: ServiceKind, service: ServiceType) -> Option<char> {
    match (kind, service) {
        (ServiceKind::WalkIn, ServiceType::Shower) => Some('S'),
        (ServiceKind::WalkIn, ServiceType::Restroom) => Some('R'),
        (ServiceKind::Booking, ServiceType::Shower) => Some('B'),
        (ServiceKind::Booking, ServiceType::Restroom) => None,
    }
}

/// Queue lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum TicketStatus {
    Waiting,
    Called,
    Processing,
    Completed,
    Cancelled,
}

impl TicketStatus {
    /// Whether the state admits no further transitions.
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }

    /// The state reached by applying `action`, or `None` when the action is
    /// not permitted from this state.
    pub const fn apply(self, action: TicketAction) -> Option<Self> {
        match (self, action) {
            (Self::Waiting, TicketAction::Call) => Some(Self::Called),
            (Self::Called, TicketAction::Start) => Some(Self::Processing),
            (Self::Processing, TicketAction::Complete) => Some(Self::Completed),
            (Self::Waiting | Self::Called, TicketAction::Cancel) => Some(Self::Cancelled),
            _ => None,
        }
    }
}

impl fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Waiting => "waiting",
            Self::Called => "called",
            Self::Processing => "processing",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        };
        write!(f, "{name}")
    }
}

/// Staff action driving a lifecycle transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum TicketAction {
    Call,
    Start,
    Complete,
    Cancel,
}

impl fmt::Display for TicketAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Call => "call",
            Self::Start => "start",
            Self::Complete => "complete",
            Self::Cancel => "cancel",
        };
        write!(f, "{name}")
    }
}

impl FromStr for TicketAction {
    type Err = ();

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "call" => Ok(Self::Call),
            "start" => Ok(Self::Start),
            "complete" => Ok(Self::Complete),
            "cancel" => Ok(Self::Cancel),
            _ => Err(()),
        }
    }
}

/// A customer's queue entry.
///
/// Mutated only by lifecycle transitions; never physically deleted except by
/// the day-rollover retention sweep for abandoned non-terminal tickets.
#[derive(Debug, Clone, PartialEq)]
pub struct Ticket {
    pub id: Uuid,
    /// `<CategoryCode><TypeCode>-<NNN>`, unique within (prefix, day).
    pub display_number: String,
    /// Facility-local day partition key, `YYYYMMDD`.
    pub day_key: String,
    pub customer_id: Uuid,
    pub category: Category,
    pub kind: ServiceKind,
    pub service: ServiceType,
    /// Present iff `kind` is [`ServiceKind::Booking`].
    pub requested_time: Option<DateTime<Utc>>,
    /// Minor currency units, fixed at creation.
    pub price: u32,
    pub status: TicketStatus,
    /// Locker held while in service. Referentially symmetric with the
    /// locker's `bound_ticket`.
    pub bound_locker: Option<LockerCode>,
    pub created_at: DateTime<Utc>,
    pub called_at: Option<DateTime<Utc>>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub cancelled_at: Option<DateTime<Utc>>,
}

impl Ticket {
    /// Time spent in `Processing` as of `now`. `None` outside `Processing`.
    pub fn processing_elapsed(&self, now: DateTime<Utc>) -> Option<TimeDelta> {
        if self.status != TicketStatus::Processing {
            return None;
        }
        self.started_at.map(|started| now - started)
    }

    /// Overtime signal for operators: in `Processing` beyond the fixed limit.
    pub fn is_overtime(&self, now: DateTime<Utc>) -> bool {
        self.processing_elapsed(now)
            .is_some_and(|elapsed| elapsed > TimeDelta::hours(OVERTIME_LIMIT_HOURS))
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(TicketStatus::Waiting, TicketAction::Call, Some(TicketStatus::Called))]
    #[case(TicketStatus::Called, TicketAction::Start, Some(TicketStatus::Processing))]
    #[case(
        TicketStatus::Processing,
        TicketAction::Complete,
        Some(TicketStatus::Completed)
    )]
    #[case(TicketStatus::Waiting, TicketAction::Cancel, Some(TicketStatus::Cancelled))]
    #[case(TicketStatus::Called, TicketAction::Cancel, Some(TicketStatus::Cancelled))]
    #[case(TicketStatus::Waiting, TicketAction::Start, None)]
    #[case(TicketStatus::Waiting, TicketAction::Complete, None)]
    #[case(TicketStatus::Called, TicketAction::Call, None)]
    #[case(TicketStatus::Processing, TicketAction::Call, None)]
    #[case(TicketStatus::Processing, TicketAction::Cancel, None)]
    #[case(TicketStatus::Completed, TicketAction::Call, None)]
    #[case(TicketStatus::Completed, TicketAction::Cancel, None)]
    #[case(TicketStatus::Cancelled, TicketAction::Start, None)]
    #[case(TicketStatus::Cancelled, TicketAction::Complete, None)]
    fn transition_table_matches_the_lifecycle(
        #[case] from: TicketStatus,
        #[case] action: TicketAction,
        #[case] expected: Option<TicketStatus>,
    ) {
        assert_eq!(from.apply(action), expected);
    }

    #[test]
    fn terminal_states_are_terminal() {
        assert!(TicketStatus::Completed.is_terminal());
        assert!(TicketStatus::Cancelled.is_terminal());
        assert!(!TicketStatus::Processing.is_terminal());
    }

    #[test]
    fn restroom_bookings_have_no_numbering_code() {
        assert_eq!(
            numbering_type_code(ServiceKind::Booking, ServiceType::Restroom),
            None
        );
        assert_eq!(
            numbering_type_code(ServiceKind::WalkIn, ServiceType::Restroom),
            Some('R')
        );
    }

    #[test]
    fn overtime_trips_only_past_the_limit() {
        let started = Utc::now();
        let ticket = Ticket {
            id: Uuid::new_v4(),
            display_number: "WS-001".to_owned(),
            day_key: "20260823".to_owned(),
            customer_id: Uuid::new_v4(),
            category: Category::Women,
            kind: ServiceKind::WalkIn,
            service: ServiceType::Shower,
            requested_time: None,
            price: 5000,
            status: TicketStatus::Processing,
            bound_locker: None,
            created_at: started,
            called_at: Some(started),
            started_at: Some(started),
            completed_at: None,
            cancelled_at: None,
        };

        assert!(!ticket.is_overtime(started + TimeDelta::hours(2)));
        assert!(ticket.is_overtime(started + TimeDelta::hours(3) + TimeDelta::minutes(1)));
    }
}
