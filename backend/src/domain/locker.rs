//! Locker inventory entities.
//!
//! Lockers are the facility's only long-lived shared mutable resource. Their
//! status and binding are mutated exclusively through the
//! [`crate::domain::LockerLedger`] bind/release operations.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Locker pool partition. `Unisex` is the neutral overflow pool; assignment
/// never falls back to it automatically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum LockerPartition {
    Women,
    Men,
    Unisex,
}

impl LockerPartition {
    /// One-letter code used as the locker code prefix.
    pub const fn code(self) -> char {
        match self {
            Self::Women => 'W',
            Self::Men => 'M',
            Self::Unisex => 'U',
        }
    }
}

impl fmt::Display for LockerPartition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Women => "women",
            Self::Men => "men",
            Self::Unisex => "unisex",
        };
        write!(f, "{name}")
    }
}

impl FromStr for LockerPartition {
    type Err = ();

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "women" => Ok(Self::Women),
            "men" => Ok(Self::Men),
            "unisex" => Ok(Self::Unisex),
            _ => Err(()),
        }
    }
}

/// Locker availability state. `Maintenance` units are never selected by
/// assignment and are skipped by the day-rollover reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum LockerStatus {
    Available,
    Occupied,
    Maintenance,
}

impl fmt::Display for LockerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Available => "available",
            Self::Occupied => "occupied",
            Self::Maintenance => "maintenance",
        };
        write!(f, "{name}")
    }
}

/// Human-readable locker code encoding partition and sequence, e.g. `W03`.
///
/// Codes order lexicographically, which within a partition matches the
/// numeric sequence because the sequence is zero-padded.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LockerCode(String);

impl LockerCode {
    /// Build a code from a partition and a sequence number.
    pub fn new(partition: LockerPartition, sequence: u8) -> Self {
        Self(format!("{}{sequence:02}", partition.code()))
    }

    /// The code as a string slice.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Partition encoded in the code prefix, if recognised.
    pub fn partition(&self) -> Option<LockerPartition> {
        match self.0.chars().next() {
            Some('W') => Some(LockerPartition::Women),
            Some('M') => Some(LockerPartition::Men),
            Some('U') => Some(LockerPartition::Unisex),
            _ => None,
        }
    }
}

impl fmt::Display for LockerCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for LockerCode {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// A single locker unit.
#[derive(Debug, Clone, PartialEq)]
pub struct Locker {
    pub code: LockerCode,
    pub partition: LockerPartition,
    pub status: LockerStatus,
    /// Ticket currently occupying the locker. Non-null iff `status` is
    /// [`LockerStatus::Occupied`].
    pub bound_ticket: Option<Uuid>,
}

impl Locker {
    /// Provision an available, unbound locker. Inventory is fixed; this is
    /// only used at bootstrap and in tests.
    pub fn provision(partition: LockerPartition, sequence: u8) -> Self {
        Self {
            code: LockerCode::new(partition, sequence),
            partition,
            status: LockerStatus::Available,
            bound_ticket: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_zero_padded_and_ordered() {
        let a = LockerCode::new(LockerPartition::Women, 2);
        let b = LockerCode::new(LockerPartition::Women, 11);
        assert_eq!(a.as_str(), "W02");
        assert_eq!(b.as_str(), "W11");
        assert!(a < b);
    }

    #[test]
    fn code_prefix_recovers_the_partition() {
        let code = LockerCode::new(LockerPartition::Unisex, 3);
        assert_eq!(code.partition(), Some(LockerPartition::Unisex));
    }

    #[test]
    fn partition_parses_from_query_keywords() {
        assert_eq!("men".parse(), Ok(LockerPartition::Men));
        assert!("staff".parse::<LockerPartition>().is_err());
    }
}
