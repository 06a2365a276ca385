use anyhow::{anyhow, bail, Context, Result};
use serde::{Deserialize, Serialize};

/// Identifies the field layout in effect when a record was written.
/// Must be bumped before any field is added, removed, or reordered.
pub const SCHEMA_VERSION: u32 = 1;

/// Distinguishes ordinary observation records from sentinel records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SpecialCode {
    NotSpecial,
    /// The scan ran but nothing matched the filter. Lets downstream
    /// analysis tell "no networks nearby" from "scan cycle never happened".
    NoVisibleNetwork,
}

impl SpecialCode {
    pub fn as_u32(self) -> u32 {
        match self {
            SpecialCode::NotSpecial => 0,
            SpecialCode::NoVisibleNetwork => 1,
        }
    }

    pub fn from_u32(value: u32) -> Result<Self> {
        match value {
            0 => Ok(SpecialCode::NotSpecial),
            1 => Ok(SpecialCode::NoVisibleNetwork),
            other => Err(anyhow!("unknown special code {other}")),
        }
    }
}

/// One line of the survey log. Immutable once appended; the log is
/// write-once, append-only, never mutated or reordered.
///
/// On [`SpecialCode::NoVisibleNetwork`] the four network fields (`ssid`,
/// `bssid`, `signal_level`, `channel`) are empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogRecord {
    pub schema_version: u32,
    pub device_model: String,
    pub session_id: String,
    pub latitude: f64,
    pub longitude: f64,
    pub altitude: f64,
    pub accuracy: f32,
    pub speed: f32,
    pub special_code: SpecialCode,
    /// Signed fix-timestamp minus scan-timestamp; magnitude indicates how
    /// stale the fix was relative to the scan.
    pub location_scan_delta_ms: i64,
    pub ssid: String,
    pub bssid: String,
    pub signal_level: Option<i32>,
    pub channel: Option<u32>,
    /// The filter text active at format time; later filter edits do not
    /// apply retroactively.
    pub filter_pattern: String,
}

impl LogRecord {
    /// Renders the schema-version-1 line.
    // SSID, BSSID and device model are written as-is; a comma inside any
    // of them breaks the column count. Known v1 defect, kept because the
    // collector already consumes this exact layout.
    pub fn to_csv_line(&self) -> String {
        format!(
            "{},{},{},{},{},{},{},{},{},{},{},{},{},{},\"{}\"",
            self.schema_version,
            self.device_model,
            self.session_id,
            self.latitude,
            self.longitude,
            self.altitude,
            self.accuracy,
            self.speed,
            self.special_code.as_u32(),
            self.location_scan_delta_ms,
            self.ssid,
            self.bssid,
            self.signal_level.map(|level| level.to_string()).unwrap_or_default(),
            self.channel.map(|channel| channel.to_string()).unwrap_or_default(),
            self.filter_pattern,
        )
    }

    /// Parses one schema-version-1 line back into a record.
    pub fn parse_csv_line(line: &str) -> Result<Self> {
        let fields: Vec<&str> = line.split(',').collect();
        if fields.len() != 15 {
            bail!("expected 15 fields, got {}: {line:?}", fields.len());
        }

        let schema_version: u32 = fields[0]
            .parse()
            .with_context(|| format!("bad schema version {:?}", fields[0]))?;
        if schema_version != SCHEMA_VERSION {
            bail!("unsupported schema version {schema_version}");
        }

        let filter_pattern = fields[14]
            .strip_prefix('"')
            .and_then(|echo| echo.strip_suffix('"'))
            .ok_or_else(|| anyhow!("filter echo is not quoted: {:?}", fields[14]))?
            .to_string();

        Ok(Self {
            schema_version,
            device_model: fields[1].to_string(),
            session_id: fields[2].to_string(),
            latitude: fields[3].parse().context("bad latitude")?,
            longitude: fields[4].parse().context("bad longitude")?,
            altitude: fields[5].parse().context("bad altitude")?,
            accuracy: fields[6].parse().context("bad accuracy")?,
            speed: fields[7].parse().context("bad speed")?,
            special_code: SpecialCode::from_u32(
                fields[8].parse().context("bad special code")?,
            )?,
            location_scan_delta_ms: fields[9].parse().context("bad time delta")?,
            ssid: fields[10].to_string(),
            bssid: fields[11].to_string(),
            signal_level: parse_optional(fields[12]).context("bad signal level")?,
            channel: parse_optional(fields[13]).context("bad channel")?,
            filter_pattern,
        })
    }
}

fn parse_optional<T: std::str::FromStr>(field: &str) -> Result<Option<T>>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    if field.is_empty() {
        return Ok(None);
    }
    Ok(Some(field.parse()?))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn observation_record() -> LogRecord {
        LogRecord {
            schema_version: SCHEMA_VERSION,
            device_model: "test-device".into(),
            session_id: "d06e2e17-0f9d-4a51-8c83-1cdee8e4925f".into(),
            latitude: 52.52,
            longitude: 13.405,
            altitude: 34.5,
            accuracy: 8.0,
            speed: 1.5,
            special_code: SpecialCode::NotSpecial,
            location_scan_delta_ms: -230,
            ssid: "CafeNet".into(),
            bssid: "aa:bb:cc:dd:ee:ff".into(),
            signal_level: Some(-40),
            channel: Some(6),
            filter_pattern: "Cafe.*".into(),
        }
    }

    #[test]
    fn renders_fields_in_schema_order() {
        let line = observation_record().to_csv_line();
        assert_eq!(
            line,
            "1,test-device,d06e2e17-0f9d-4a51-8c83-1cdee8e4925f,52.52,13.405,34.5,8,1.5,0,-230,CafeNet,aa:bb:cc:dd:ee:ff,-40,6,\"Cafe.*\""
        );
    }

    #[test]
    fn sentinel_record_has_empty_network_fields() {
        let record = LogRecord {
            special_code: SpecialCode::NoVisibleNetwork,
            ssid: String::new(),
            bssid: String::new(),
            signal_level: None,
            channel: None,
            ..observation_record()
        };
        let line = record.to_csv_line();
        assert!(line.contains(",1,-230,,,,,"));
        let parsed = LogRecord::parse_csv_line(&line).unwrap();
        assert_eq!(parsed, record);
    }

    #[test]
    fn round_trips_an_observation_record() {
        let record = observation_record();
        let parsed = LogRecord::parse_csv_line(&record.to_csv_line()).unwrap();
        assert_eq!(parsed, record);
    }

    #[test]
    fn rejects_wrong_field_count() {
        assert!(LogRecord::parse_csv_line("1,2,3").is_err());
    }

    #[test]
    fn rejects_unknown_schema_version() {
        let line = observation_record().to_csv_line().replacen('1', "9", 1);
        assert!(LogRecord::parse_csv_line(&line).is_err());
    }

    #[test]
    fn special_code_values_are_stable() {
        assert_eq!(SpecialCode::NotSpecial.as_u32(), 0);
        assert_eq!(SpecialCode::NoVisibleNetwork.as_u32(), 1);
        assert!(SpecialCode::from_u32(2).is_err());
    }
}
