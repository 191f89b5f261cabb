use std::env;

use model::ProximityThreshold;

pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:8080";

#[derive(Debug, Clone)]
pub struct WebConfig {
    pub bind_address: String,
    pub arrival_threshold: ProximityThreshold,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            bind_address: DEFAULT_BIND_ADDRESS.to_owned(),
            arrival_threshold: ProximityThreshold::default(),
        }
    }
}

impl WebConfig {
    /// Reads `BIND_ADDRESS` and `ARRIVAL_THRESHOLD_METERS`, falling back to
    /// the defaults for unset variables. `None` if a variable is set but
    /// invalid.
    pub fn from_env() -> Option<Self> {
        let defaults = Self::default();
        let bind_address = env::var("BIND_ADDRESS").unwrap_or(defaults.bind_address);
        let arrival_threshold = match env::var("ARRIVAL_THRESHOLD_METERS") {
            Ok(value) => ProximityThreshold::new(value.parse().ok()?).ok()?,
            Err(_) => defaults.arrival_threshold,
        };
        Some(Self {
            bind_address,
            arrival_threshold,
        })
    }
}
