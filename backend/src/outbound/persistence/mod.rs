//! Persistence adapters for tickets and lockers.

mod memory;

pub use memory::InMemoryFacilityStore;
