use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One network sighting from a scan pass. Transient: consumed by the
/// formatter in the cycle it arrived and not retained afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WifiObservation {
    pub ssid: String,
    pub bssid: String,
    /// Received signal strength in dBm.
    pub signal_level: i32,
    /// Center frequency in MHz.
    pub frequency: u32,
}

/// The complete result set of one scan pass.
#[derive(Debug, Clone)]
pub struct ScanCycleResult {
    pub observations: Vec<WifiObservation>,
    pub completed_at: DateTime<Utc>,
}

impl ScanCycleResult {
    pub fn new(observations: Vec<WifiObservation>) -> Self {
        Self {
            observations,
            completed_at: Utc::now(),
        }
    }

    pub fn with_completed_at(
        observations: Vec<WifiObservation>,
        completed_at: DateTime<Utc>,
    ) -> Self {
        Self {
            observations,
            completed_at,
        }
    }

    /// Observations ordered by descending signal strength. The sort is
    /// stable: ties keep the provider's original order.
    pub fn by_signal_strength(&self) -> Vec<WifiObservation> {
        let mut sorted = self.observations.clone();
        sorted.sort_by(|a, b| b.signal_level.cmp(&a.signal_level));
        sorted
    }
}
