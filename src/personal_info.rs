// src/personal_info.rs
use crate::error::ConfigError;
use std::collections::HashMap;

/// Every key the personal info block may carry, in prompt order.
pub const PERSONAL_INFO_KEYS: &[&str] = &[
    "NAME",
    "EMAIL",
    "PHONE",
    "COUNTRY",
    "CITY",
    "STATE",
    "ZIP",
    "ADDRESS",
    "WORK_AUTHORIZATION",
    "ADDTL",
    "START_DATE",
    "GITHUB",
    "LINKEDIN",
    "DISABLED",
    "VETERAN",
    "GENDER",
];

pub const REQUIRED_PERSONAL_INFO_KEYS: &[&str] = &["NAME", "EMAIL", "PHONE"];

/// Applicant details shared by every job in a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonalInfo {
    entries: Vec<(String, String)>,
}

impl PersonalInfo {
    /// Validate a key/value map against the fixed schema.
    ///
    /// Keys are matched case-insensitively and stored upper-cased, ordered as
    /// in [`PERSONAL_INFO_KEYS`].
    pub fn from_map(map: HashMap<String, String>) -> Result<Self, ConfigError> {
        let mut normalized = HashMap::with_capacity(map.len());
        for (key, value) in map {
            let key = key.trim().to_uppercase();
            if !PERSONAL_INFO_KEYS.contains(&key.as_str()) {
                return Err(ConfigError::UnknownPersonalInfoKey(key));
            }
            normalized.insert(key, value.trim().to_string());
        }

        for required in REQUIRED_PERSONAL_INFO_KEYS {
            if normalized.get(*required).map_or(true, |v| v.is_empty()) {
                return Err(ConfigError::MissingPersonalInfoKey(*required));
            }
        }

        let entries = PERSONAL_INFO_KEYS
            .iter()
            .filter_map(|key| {
                normalized
                    .remove(*key)
                    .map(|value| (key.to_string(), value))
            })
            .collect();

        Ok(Self { entries })
    }

    /// Parse a block of `KEY=value` lines. Blank lines and `#` comments are
    /// ignored; the value is everything after the first `=`.
    pub fn parse_block(block: &str) -> Result<Self, ConfigError> {
        let mut map = HashMap::new();
        for line in block.lines().map(str::trim) {
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let (key, value) = line
                .split_once('=')
                .ok_or_else(|| ConfigError::MalformedPersonalInfoLine(line.to_string()))?;
            map.insert(key.to_string(), value.to_string());
        }
        Self::from_map(map)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }

    pub fn entries(&self) -> &[(String, String)] {
        &self.entries
    }

    /// Render back to `KEY=value` lines for prompts.
    pub fn to_block(&self) -> String {
        self.entries
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
