//! Pricing policy.
//!
//! A fixed table with no state and no failure mode. Prices are minor
//! currency units and are computed once at ticket creation.

use crate::domain::ticket::{CustomerTier, ServiceType};

/// Price for one ticket, in minor currency units.
pub const fn price_for(tier: CustomerTier, service: ServiceType) -> u32 {
    match (service, tier) {
        (ServiceType::Shower, CustomerTier::General) => 5000,
        (ServiceType::Shower, CustomerTier::Member) => 3500,
        (ServiceType::Restroom, CustomerTier::General) => 1000,
        (ServiceType::Restroom, CustomerTier::Member) => 500,
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(CustomerTier::General, ServiceType::Shower, 5000)]
    #[case(CustomerTier::Member, ServiceType::Shower, 3500)]
    #[case(CustomerTier::General, ServiceType::Restroom, 1000)]
    #[case(CustomerTier::Member, ServiceType::Restroom, 500)]
    fn table_is_fixed(#[case] tier: CustomerTier, #[case] service: ServiceType, #[case] price: u32) {
        assert_eq!(price_for(tier, service), price);
    }
}
