//! In-memory customer directory adapter.
//!
//! Stands in for the membership system of record. Identifiers are opaque
//! strings (phone numbers at the kiosk); a returning identifier gets its
//! stored record back regardless of the profile supplied with the request.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::ports::{
    CustomerDirectory, CustomerDirectoryError, CustomerProfile, CustomerRecord,
};

/// Process-local directory keyed by customer identifier.
#[derive(Default)]
pub struct InMemoryCustomerDirectory {
    records: RwLock<HashMap<String, CustomerRecord>>,
}

impl InMemoryCustomerDirectory {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CustomerDirectory for InMemoryCustomerDirectory {
    async fn lookup_or_register(
        &self,
        identifier: &str,
        profile: &CustomerProfile,
    ) -> Result<CustomerRecord, CustomerDirectoryError> {
        let mut records = self
            .records
            .write()
            .map_err(|_| CustomerDirectoryError::unavailable("directory lock poisoned"))?;
        let record = records
            .entry(identifier.to_owned())
            .or_insert_with(|| CustomerRecord {
                id: Uuid::new_v4(),
                display_name: profile.display_name.clone(),
                category: profile.category,
                tier: profile.tier,
            });
        Ok(record.clone())
    }
}
