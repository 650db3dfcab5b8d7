//! Fragmented reading of upload payloads and progress accounting.

mod chunked;
mod progress;
mod types;

pub use chunked::FragmentSource;
pub use fodupload_protocol::constants::DEFAULT_CHUNK_SIZE;
pub use progress::{ProgressCallback, ProgressReporter, SpeedCalculator};
pub use types::{Chunk, FinalFragmentPolicy, UploadProgress};

/// Errors produced by the transfer crate.
#[derive(Debug, thiserror::Error)]
pub enum TransferError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("not a regular file: {0}")]
    NotAFile(String),
}
