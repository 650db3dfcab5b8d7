//! Upload error types.

use fodupload_protocol::GenericErrorResponse;

/// Errors that end an upload.
#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("read error: {0}")]
    Read(#[from] fodupload_transfer::TransferError),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("session expired: {0}")]
    SessionExpired(String),

    #[error("upload rejected (HTTP {status}): {errors}")]
    ServerRejected {
        status: u16,
        errors: GenericErrorResponse,
    },

    #[error("malformed response (HTTP {status}): {reason}")]
    MalformedResponse { status: u16, reason: String },

    #[error("payload exhausted after {fragments} fragments without a final response")]
    Exhausted { fragments: u64, bytes_sent: u64 },

    #[error("entitlement error: {0}")]
    Entitlement(String),
}
