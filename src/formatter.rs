use log::warn;

use crate::channel;
use crate::filter::SsidFilter;
use crate::location::LocationFix;
use crate::models::record::{LogRecord, SpecialCode};
use crate::models::scan::{ScanCycleResult, WifiObservation};
use crate::session::SessionContext;

/// Builds the log records for one scan cycle.
///
/// While the location is still unknown the cycle produces nothing: the fix
/// arrives on its own schedule and a later cycle will have one. With a
/// location, one NOT_SPECIAL record is emitted per filter-matching
/// observation in descending-signal order, or exactly one
/// NO_VISIBLE_NETWORK sentinel when nothing matched.
pub fn format_records(
    scan: &ScanCycleResult,
    location: Option<&LocationFix>,
    session: &SessionContext,
    filter: &SsidFilter,
) -> Vec<LogRecord> {
    let Some(location) = location else {
        return Vec::new();
    };

    let delta_ms = (location.observed_at - scan.completed_at).num_milliseconds();
    let mut records = Vec::new();
    let mut matched = 0usize;

    for obs in scan.by_signal_strength() {
        if !filter.matches(&obs.ssid) {
            continue;
        }
        matched += 1;

        // an unsupported band drops this observation only, never the cycle
        let chan = match channel::to_channel(obs.frequency) {
            Ok(chan) => chan,
            Err(err) => {
                warn!("skipping {} [{}]: {err}", obs.ssid, obs.bssid);
                continue;
            }
        };

        records.push(observation_record(location, session, delta_ms, &obs, chan));
    }

    if matched == 0 {
        records.push(sentinel_record(location, session, delta_ms));
    }
    records
}

/// Human-readable per-cycle summary for the display layer, one line per
/// matching network, strongest first.
pub fn render_summary(scan: &ScanCycleResult, filter: &SsidFilter) -> String {
    let mut summary = String::new();
    for obs in scan.by_signal_strength() {
        if !filter.matches(&obs.ssid) {
            continue;
        }
        let Ok(chan) = channel::to_channel(obs.frequency) else {
            continue;
        };
        summary.push_str(&format!(
            "{} {} [{}]: {}\n",
            chan, obs.ssid, obs.bssid, obs.signal_level
        ));
    }
    summary
}

fn observation_record(
    location: &LocationFix,
    session: &SessionContext,
    delta_ms: i64,
    obs: &WifiObservation,
    chan: u32,
) -> LogRecord {
    LogRecord {
        schema_version: session.schema_version,
        device_model: session.device_model.clone(),
        session_id: session.session_id.clone(),
        latitude: location.latitude,
        longitude: location.longitude,
        altitude: location.altitude,
        accuracy: location.accuracy,
        speed: location.speed,
        special_code: SpecialCode::NotSpecial,
        location_scan_delta_ms: delta_ms,
        ssid: obs.ssid.clone(),
        bssid: obs.bssid.clone(),
        signal_level: Some(obs.signal_level),
        channel: Some(chan),
        filter_pattern: session.filter_pattern.clone(),
    }
}

fn sentinel_record(
    location: &LocationFix,
    session: &SessionContext,
    delta_ms: i64,
) -> LogRecord {
    LogRecord {
        schema_version: session.schema_version,
        device_model: session.device_model.clone(),
        session_id: session.session_id.clone(),
        latitude: location.latitude,
        longitude: location.longitude,
        altitude: location.altitude,
        accuracy: location.accuracy,
        speed: location.speed,
        special_code: SpecialCode::NoVisibleNetwork,
        location_scan_delta_ms: delta_ms,
        ssid: String::new(),
        bssid: String::new(),
        signal_level: None,
        channel: None,
        filter_pattern: session.filter_pattern.clone(),
    }
}
