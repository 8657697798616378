//! Codec configuration
//!
//! Shared by every store that goes through the same adapter.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// What the read path does with data it cannot make sense of
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MalformedPolicy {
    /// Log and behave as if the source held nothing
    #[default]
    TreatAsAbsent,
    /// Surface the parse error to the caller
    Fail,
}

impl MalformedPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            MalformedPolicy::TreatAsAbsent => "treat_as_absent",
            MalformedPolicy::Fail => "fail",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "treat_as_absent" | "absent" | "soft" => Some(MalformedPolicy::TreatAsAbsent),
            "fail" | "error" | "strict" => Some(MalformedPolicy::Fail),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecConfig {
    /// Separator between path segments in flattened keys
    pub delimiter: String,
    /// Policy for malformed storage JSON and conflicting URL paths
    pub on_malformed: MalformedPolicy,
    /// Envelope member mirrored into the URL
    pub envelope_field: String,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            delimiter: ".".to_string(),
            on_malformed: MalformedPolicy::TreatAsAbsent,
            envelope_field: "state".to_string(),
        }
    }
}

impl CodecConfig {
    /// Strict variant of the defaults
    pub fn strict() -> Self {
        Self {
            on_malformed: MalformedPolicy::Fail,
            ..Self::default()
        }
    }

    /// Parse a config from JSON; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        if config.delimiter.is_empty() {
            log::warn!("Empty delimiter in config, using \".\"");
            return Ok(Self {
                delimiter: ".".to_string(),
                ..config
            });
        }
        Ok(config)
    }
}
