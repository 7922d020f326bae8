//! Key identifier formats

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// How the rotating key store names new keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyIdScheme {
    /// `v1`, `v2`, ... unique within one process
    #[default]
    Sequential,
    /// `20260115093000-v3`, unique across processes that share a clock
    Timestamped,
}

impl KeyIdScheme {
    pub fn key_id(&self, version: u64, now: DateTime<Utc>) -> String {
        match self {
            KeyIdScheme::Sequential => sequential_key_id(version),
            KeyIdScheme::Timestamped => timestamped_key_id(now, version),
        }
    }
}

/// Formats a sequential key id such as `v3`
pub fn sequential_key_id(version: u64) -> String {
    format!("v{}", version)
}

/// Formats a timestamp-plus-version key id such as `20260115093000-v3`
pub fn timestamped_key_id(now: DateTime<Utc>, version: u64) -> String {
    format!("{}-v{}", now.format("%Y%m%d%H%M%S"), version)
}
