//! Adapter bridging `FodClient` to the collaborator traits required by
//! the `scan-upload` crate.

use std::future::Future;
use std::pin::Pin;

use fodupload_client::{Credentials, FodClient};
use fodupload_protocol::ReleaseAssessmentType;
use fodupload_scan_upload::{
    Authenticator, EntitlementLookup, Transport, TransportResponse, UploadError, UploadRequest,
};

/// Implements the upload traits by delegating to one `FodClient`.
pub struct FodAdapter {
    client: FodClient,
    credentials: Credentials,
}

impl FodAdapter {
    pub fn new(client: FodClient, credentials: Credentials) -> Self {
        Self {
            client,
            credentials,
        }
    }
}

impl Transport for FodAdapter {
    fn execute<'a>(
        &'a self,
        request: &'a UploadRequest,
    ) -> Pin<Box<dyn Future<Output = Result<TransportResponse, UploadError>> + Send + 'a>> {
        Box::pin(async move {
            let resp = self
                .client
                .post_bytes(
                    &request.path_and_query(),
                    &request.authorization(),
                    request.content_type,
                    request.body.clone(),
                )
                .await
                .map_err(|e| UploadError::Transport(e.to_string()))?;
            Ok(TransportResponse {
                status: resp.status,
                body: resp.body,
            })
        })
    }
}

impl Authenticator for FodAdapter {
    fn authenticate(&self) -> Pin<Box<dyn Future<Output = Result<String, UploadError>> + Send + '_>> {
        Box::pin(async move {
            self.client
                .authenticate(&self.credentials)
                .await
                .map(|token| token.access_token)
                .map_err(|e| UploadError::Transport(format!("authentication failed: {e}")))
        })
    }
}

impl EntitlementLookup for FodAdapter {
    fn assessment_types<'a>(
        &'a self,
        token: &'a str,
        release_id: i64,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<ReleaseAssessmentType>, UploadError>> + Send + 'a>>
    {
        Box::pin(async move {
            self.client
                .get_assessment_types(token, release_id)
                .await
                .map_err(|e| UploadError::Entitlement(format!("assessment type lookup failed: {e}")))
        })
    }
}
