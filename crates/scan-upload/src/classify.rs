//! Response classification.

use fodupload_protocol::{GenericErrorResponse, PostStartScanResponse};

use crate::error::UploadError;
use crate::types::UploadOutcome;

const OK: u16 = 200;
const ACCEPTED: u16 = 202;
const FORBIDDEN: u16 = 403;

/// Maps one response to an [`UploadOutcome`].
///
/// Precedence: 403 expired session, 202 continue, 200 success payload,
/// any other non-2xx error payload. A body that does not parse as the shape
/// expected for its status is a [`UploadError::MalformedResponse`].
pub fn classify_response(status: u16, body: &[u8]) -> Result<UploadOutcome, UploadError> {
    match status {
        FORBIDDEN => Ok(UploadOutcome::SessionExpired),
        ACCEPTED => Ok(UploadOutcome::Continue),
        OK => {
            let resp: PostStartScanResponse =
                serde_json::from_slice(body).map_err(|e| malformed(status, e))?;
            Ok(UploadOutcome::Succeeded {
                scan_id: resp.scan_id,
            })
        }
        // Other 2xx codes carry no payload contract; keep going.
        201..=299 => Ok(UploadOutcome::Continue),
        _ => {
            let errors: GenericErrorResponse =
                serde_json::from_slice(body).map_err(|e| malformed(status, e))?;
            Ok(UploadOutcome::Failed { status, errors })
        }
    }
}

fn malformed(status: u16, err: serde_json::Error) -> UploadError {
    UploadError::MalformedResponse {
        status,
        reason: err.to_string(),
    }
}
