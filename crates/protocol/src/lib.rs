pub mod constants;
pub mod messages;
pub mod types;

// Re-export primary types for convenience.
pub use messages::{
    ErrorItem, GenericErrorResponse, PostStartScanResponse, ReleaseAssessmentType,
    ReleaseAssessmentTypesResponse, TokenResponse,
};
pub use types::{
    AuditPreferenceType, EntitlementPreferenceType, ParsePreferenceError, ScanPreferenceType,
};
