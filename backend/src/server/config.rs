//! Environment-driven server configuration.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use tracing::warn;

/// Runtime settings, read once at startup.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Listen address, `QUEUE_BIND_ADDR`.
    pub bind_addr: String,
    /// Facility offset in whole hours east of UTC, `FACILITY_UTC_OFFSET_HOURS`.
    pub facility_offset_hours: i32,
    /// Lockers provisioned per partition, `LOCKERS_WOMEN` / `LOCKERS_MEN` /
    /// `LOCKERS_UNISEX`.
    pub lockers_women: u8,
    pub lockers_men: u8,
    pub lockers_unisex: u8,
    /// Day-rollover poll interval, `SWEEP_INTERVAL_SECS`.
    pub sweep_interval: Duration,
    /// Bounded audit spool capacity, `AUDIT_QUEUE_CAPACITY`.
    pub audit_queue_capacity: usize,
}

fn env_parse<T: FromStr>(key: &str, default: T) -> T {
    let Ok(raw) = env::var(key) else {
        return default;
    };
    match raw.parse() {
        Ok(value) => value,
        Err(_) => {
            warn!(key, value = %raw, "unparseable setting, using the default");
            default
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8080".to_owned(),
            facility_offset_hours: 7,
            lockers_women: 12,
            lockers_men: 12,
            lockers_unisex: 4,
            sweep_interval: Duration::from_secs(60),
            audit_queue_capacity: 256,
        }
    }
}

impl ServerConfig {
    /// Read the configuration from the environment, falling back to the
    /// defaults for absent or unparseable variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            bind_addr: env::var("QUEUE_BIND_ADDR").unwrap_or(defaults.bind_addr),
            facility_offset_hours: env_parse(
                "FACILITY_UTC_OFFSET_HOURS",
                defaults.facility_offset_hours,
            ),
            lockers_women: env_parse("LOCKERS_WOMEN", defaults.lockers_women),
            lockers_men: env_parse("LOCKERS_MEN", defaults.lockers_men),
            lockers_unisex: env_parse("LOCKERS_UNISEX", defaults.lockers_unisex),
            sweep_interval: Duration::from_secs(env_parse("SWEEP_INTERVAL_SECS", 60)),
            audit_queue_capacity: env_parse(
                "AUDIT_QUEUE_CAPACITY",
                defaults.audit_queue_capacity,
            ),
        }
    }
}
