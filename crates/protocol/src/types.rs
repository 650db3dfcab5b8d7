use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Error returned when a preference value cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {kind}: {value}")]
pub struct ParsePreferenceError {
    pub kind: &'static str,
    pub value: String,
}

/// Static scan mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScanPreferenceType {
    Standard,
    Express,
}

impl fmt::Display for ScanPreferenceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Standard => f.write_str("Standard"),
            Self::Express => f.write_str("Express"),
        }
    }
}

impl FromStr for ScanPreferenceType {
    type Err = ParsePreferenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "1" | "standard" => Ok(Self::Standard),
            "2" | "express" => Ok(Self::Express),
            _ => Err(ParsePreferenceError {
                kind: "scan preference",
                value: s.to_string(),
            }),
        }
    }
}

/// False-positive audit mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuditPreferenceType {
    Manual,
    Automated,
}

impl fmt::Display for AuditPreferenceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Manual => f.write_str("Manual"),
            Self::Automated => f.write_str("Automated"),
        }
    }
}

impl FromStr for AuditPreferenceType {
    type Err = ParsePreferenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "1" | "manual" => Ok(Self::Manual),
            "2" | "automated" => Ok(Self::Automated),
            _ => Err(ParsePreferenceError {
                kind: "audit preference",
                value: s.to_string(),
            }),
        }
    }
}

/// How the scan is billed: one-off or against a subscription.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntitlementPreferenceType {
    #[default]
    SingleScan,
    Subscription,
}

impl EntitlementPreferenceType {
    /// Matches `frequencyTypeId` in assessment-type listings.
    pub fn frequency_type_id(self) -> i64 {
        match self {
            Self::SingleScan => 1,
            Self::Subscription => 2,
        }
    }
}

impl fmt::Display for EntitlementPreferenceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SingleScan => f.write_str("SingleScan"),
            Self::Subscription => f.write_str("Subscription"),
        }
    }
}

impl FromStr for EntitlementPreferenceType {
    type Err = ParsePreferenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace(['-', '_'], "").as_str() {
            "1" | "singlescan" => Ok(Self::SingleScan),
            "2" | "subscription" => Ok(Self::Subscription),
            _ => Err(ParsePreferenceError {
                kind: "entitlement preference",
                value: s.to_string(),
            }),
        }
    }
}
