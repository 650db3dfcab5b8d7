//! Data types for the upload flow.

use std::fmt;

use fodupload_protocol::constants::{DEFAULT_MAX_REAUTH_ATTEMPTS, LAST_FRAGMENT_NUMBER};
use fodupload_protocol::{
    AuditPreferenceType, EntitlementPreferenceType, GenericErrorResponse, ScanPreferenceType,
};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Target descriptor
// ---------------------------------------------------------------------------

/// Identifies the release and scan settings carried by the BSI URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanTarget {
    pub release_id: i64,
    pub assessment_type_id: i64,
    pub technology_stack: String,
    pub language_level: Option<String>,
}

/// Options chosen on the command line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanOptions {
    pub scan_preference: Option<ScanPreferenceType>,
    pub audit_preference: Option<AuditPreferenceType>,
    pub entitlement_preference: EntitlementPreferenceType,
    pub run_sonatype_scan: bool,
    pub include_third_party_libs: bool,
    pub is_remediation_scan: bool,
}

/// Entitlement resolved once before the transfer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntitlementInfo {
    pub entitlement_id: i64,
    pub frequency_type_id: i64,
    pub is_bundled_assessment: bool,
    /// Zero when the server reports none.
    pub parent_assessment_type_id: i64,
}

/// Everything the request builder needs; frozen before the first fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadTargetDescriptor {
    pub target: ScanTarget,
    pub options: ScanOptions,
    pub entitlement: EntitlementInfo,
}

// ---------------------------------------------------------------------------
// Fragments
// ---------------------------------------------------------------------------

/// Sequence number sent as `fragNo`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FragmentNumber {
    Sequence(u64),
    /// Marks the last fragment; rendered as `-1`.
    Last,
}

impl fmt::Display for FragmentNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sequence(n) => write!(f, "{n}"),
            Self::Last => write!(f, "{LAST_FRAGMENT_NUMBER}"),
        }
    }
}

/// One fragment ready to be sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FragmentDescriptor {
    pub number: FragmentNumber,
    /// Bytes confirmed before this fragment.
    pub offset: u64,
    pub payload: Vec<u8>,
    pub is_final: bool,
}

// ---------------------------------------------------------------------------
// Wire request/response
// ---------------------------------------------------------------------------

/// A fragment POST, independent of any HTTP library.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadRequest {
    /// Path relative to the API base URL.
    pub path: String,
    /// Unencoded query pairs, in wire order.
    pub query: Vec<(&'static str, String)>,
    pub bearer_token: String,
    pub content_type: &'static str,
    pub body: Vec<u8>,
}

impl UploadRequest {
    /// Looks up a query value by name.
    pub fn query_value(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| *k == name)
            .map(|(_, v)| v.as_str())
    }
}

/// Status and fully-read body of one round trip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

/// Interpretation of one response.
#[derive(Debug, Clone, PartialEq)]
pub enum UploadOutcome {
    /// Fragment accepted, more expected.
    Continue,
    Succeeded {
        scan_id: i64,
    },
    Failed {
        status: u16,
        errors: GenericErrorResponse,
    },
    /// The bearer token is no longer valid.
    SessionExpired,
}

// ---------------------------------------------------------------------------
// Engine settings and result
// ---------------------------------------------------------------------------

/// What to do with the fragment whose response reported an expired session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionExpiryPolicy {
    /// Renew the token and move on to the next fragment without resending.
    ///
    /// The server never receives the rejected fragment, so its offset
    /// sequence has a gap.
    #[default]
    Skip,
    /// Renew the token and resend the same fragment.
    Resend,
}

/// Tunables for one engine run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadSettings {
    pub session_expiry: SessionExpiryPolicy,
    /// Consecutive re-authentications allowed for one fragment under
    /// [`SessionExpiryPolicy::Resend`].
    pub max_reauth_attempts: u32,
}

impl Default for UploadSettings {
    fn default() -> Self {
        Self {
            session_expiry: SessionExpiryPolicy::default(),
            max_reauth_attempts: DEFAULT_MAX_REAUTH_ATTEMPTS,
        }
    }
}

/// Result of a successful upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadReport {
    pub scan_id: i64,
    pub bytes_sent: u64,
    pub fragments_sent: u64,
    pub reauthentications: u32,
}
