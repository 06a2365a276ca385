use log::info;
use serde::{Deserialize, Serialize};
use sysinfo::System;
use uuid::Uuid;

use crate::models::record::SCHEMA_VERSION;

/// Versioning and identity metadata stamped onto every record at format
/// time. Makes records comparable across app runs and devices.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionContext {
    pub schema_version: u32,
    pub device_model: String,
    /// Regenerated exactly once per disabled→enabled transition.
    pub session_id: String,
    /// Live filter text, read fresh on every cycle.
    pub filter_pattern: String,
    /// Gates whether records are ever written to the log.
    pub logging_enabled: bool,
    /// Reserved for a secondary remote sink; nothing in the v1 record
    /// path consults it.
    pub remote_logging_enabled: bool,
}

impl SessionContext {
    pub fn new() -> Self {
        Self::with_device_model(detect_device_model())
    }

    pub fn with_device_model(device_model: String) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            device_model,
            session_id: Uuid::new_v4().to_string(),
            filter_pattern: String::new(),
            logging_enabled: false,
            remote_logging_enabled: false,
        }
    }

    /// Enables logging to the record log. A fresh session id is minted
    /// only when logging was previously disabled; enabling twice in a row
    /// keeps the current id.
    pub fn enable_logging(&mut self) -> &str {
        if !self.logging_enabled {
            self.session_id = Uuid::new_v4().to_string();
            self.logging_enabled = true;
            info!("logging enabled, session {}", self.session_id);
        }
        &self.session_id
    }

    pub fn disable_logging(&mut self) {
        if self.logging_enabled {
            self.logging_enabled = false;
            info!("logging disabled, session {} closed", self.session_id);
        }
    }
}

impl Default for SessionContext {
    fn default() -> Self {
        Self::new()
    }
}

/// OS name, version and host name stand in for the hardware model string
/// a mobile platform would report.
pub fn detect_device_model() -> String {
    let parts = [
        System::name().unwrap_or_else(|| "unknown".into()),
        System::os_version().unwrap_or_default(),
        System::host_name().unwrap_or_default(),
    ];
    parts
        .iter()
        .filter(|part| !part.is_empty())
        .cloned()
        .collect::<Vec<_>>()
        .join(" ")
}
