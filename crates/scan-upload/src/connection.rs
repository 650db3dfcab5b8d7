//! Collaborator traits for the upload flow.
//!
//! The app implements these on top of the HTTP client.

use std::future::Future;
use std::pin::Pin;

use fodupload_protocol::ReleaseAssessmentType;

use crate::error::UploadError;
use crate::types::{TransportResponse, UploadRequest};

/// Executes fragment requests.
pub trait Transport: Send + Sync {
    /// POSTs `request` and returns the status with the fully-read body.
    ///
    /// Network failures and timeouts are reported as
    /// [`UploadError::Transport`]; HTTP error statuses are not errors here.
    fn execute<'a>(
        &'a self,
        request: &'a UploadRequest,
    ) -> Pin<Box<dyn Future<Output = Result<TransportResponse, UploadError>> + Send + 'a>>;
}

/// Obtains bearer tokens.
pub trait Authenticator: Send + Sync {
    /// Performs a fresh login and returns the new access token.
    fn authenticate(
        &self,
    ) -> Pin<Box<dyn Future<Output = Result<String, UploadError>> + Send + '_>>;
}

/// Lists the assessment types (and their entitlements) of a release.
pub trait EntitlementLookup: Send + Sync {
    fn assessment_types<'a>(
        &'a self,
        token: &'a str,
        release_id: i64,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<ReleaseAssessmentType>, UploadError>> + Send + 'a>>;
}
