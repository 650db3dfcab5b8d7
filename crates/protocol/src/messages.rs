use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Upload responses
// ---------------------------------------------------------------------------

/// Body of the `200 OK` that ends a fragment sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostStartScanResponse {
    pub scan_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

/// One entry of an error payload.
///
/// The API returns either bare strings or `{errorCode, message}` objects
/// depending on the endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ErrorItem {
    Text(String),
    #[serde(rename_all = "camelCase")]
    Detailed {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        error_code: Option<i64>,
        message: String,
    },
}

impl ErrorItem {
    pub fn message(&self) -> &str {
        match self {
            Self::Text(msg) => msg,
            Self::Detailed { message, .. } => message,
        }
    }
}

/// Error payload returned with any non-2xx status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenericErrorResponse {
    #[serde(default)]
    pub errors: Vec<ErrorItem>,
}

impl fmt::Display for GenericErrorResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.errors.is_empty() {
            return f.write_str("no error details");
        }
        for (i, item) in self.errors.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            match item {
                ErrorItem::Detailed {
                    error_code: Some(code),
                    message,
                } => write!(f, "[{code}] {message}")?,
                other => f.write_str(other.message())?,
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Entitlement lookup
// ---------------------------------------------------------------------------

/// An assessment type available to a release, with its entitlement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReleaseAssessmentType {
    pub assessment_type_id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub entitlement_id: i64,
    #[serde(default)]
    pub frequency_type: String,
    #[serde(default)]
    pub frequency_type_id: i64,
    #[serde(default)]
    pub units: i64,
    #[serde(default)]
    pub units_available: i64,
    #[serde(default)]
    pub is_remediation: bool,
    #[serde(default)]
    pub is_bundled_assessment: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub parent_assessment_type_id: i64,
}

/// Treats an explicit JSON `null` like a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Paged listing of assessment types.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReleaseAssessmentTypesResponse {
    #[serde(default)]
    pub items: Vec<ReleaseAssessmentType>,
    #[serde(default)]
    pub total_count: i64,
}

// ---------------------------------------------------------------------------
// Authentication
// ---------------------------------------------------------------------------

/// OAuth token endpoint response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: String,
    #[serde(default)]
    pub expires_in: i64,
    #[serde(default)]
    pub scope: String,
}
