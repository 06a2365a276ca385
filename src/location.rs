use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One fix as pushed by the platform's location provider. Superseded
/// wholesale by the next fix; the pipeline keeps no history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationFix {
    pub latitude: f64,
    pub longitude: f64,
    /// Meters above the WGS 84 ellipsoid.
    pub altitude: f64,
    /// Estimated horizontal accuracy radius in meters.
    pub accuracy: f32,
    /// Ground speed in meters per second.
    pub speed: f32,
    pub observed_at: DateTime<Utc>,
}

/// Last-writer-wins cell holding the most recent fix and its arrival time.
#[derive(Debug, Default)]
pub struct LocationTracker {
    fix: Option<LocationFix>,
    updated_at: Option<DateTime<Utc>>,
}

impl LocationTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the held fix unconditionally; no smoothing, no outlier
    /// rejection.
    pub fn on_fix_received(&mut self, fix: LocationFix) {
        self.updated_at = Some(Utc::now());
        self.fix = Some(fix);
    }

    /// The latest fix, or `None` while no fix has ever been received.
    /// Callers must treat `None` as "location not yet available" rather
    /// than defaulting to zero coordinates.
    pub fn current(&self) -> Option<&LocationFix> {
        self.fix.as_ref()
    }

    pub fn last_update(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }
}
