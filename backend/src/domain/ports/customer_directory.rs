//! Port for the external customer directory.
//!
//! Registration and validation are owned elsewhere; the queue core only
//! needs lookup-by-identifier with create-if-absent semantics, returning
//! the attributes that drive partitioning and pricing.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::ticket::{Category, CustomerTier};

use super::define_port_error;

/// Profile attributes used when the identifier is not yet registered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerProfile {
    pub display_name: String,
    pub category: Category,
    pub tier: CustomerTier,
}

/// Directory record for a known customer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerRecord {
    pub id: Uuid,
    pub display_name: String,
    pub category: Category,
    pub tier: CustomerTier,
}

define_port_error! {
    /// Errors raised by customer directory adapters.
    pub enum CustomerDirectoryError {
        /// The directory could not be reached.
        Unavailable { message: String } => "customer directory unavailable: {message}",
        /// Lookup or registration failed during execution.
        Query { message: String } => "customer directory query failed: {message}",
    }
}

/// Port for customer lookups.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CustomerDirectory: Send + Sync {
    /// Return the record for `identifier`, registering it with `profile`
    /// when absent. An existing record wins over the supplied profile.
    async fn lookup_or_register(
        &self,
        identifier: &str,
        profile: &CustomerProfile,
    ) -> Result<CustomerRecord, CustomerDirectoryError>;
}

/// Fixture directory registering every identifier as a fresh general-tier
/// customer with the supplied profile.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureCustomerDirectory;

#[async_trait]
impl CustomerDirectory for FixtureCustomerDirectory {
    async fn lookup_or_register(
        &self,
        _identifier: &str,
        profile: &CustomerProfile,
    ) -> Result<CustomerRecord, CustomerDirectoryError> {
        Ok(CustomerRecord {
            id: Uuid::new_v4(),
            display_name: profile.display_name.clone(),
            category: profile.category,
            tier: profile.tier,
        })
    }
}
