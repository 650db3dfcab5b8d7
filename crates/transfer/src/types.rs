use serde::{Deserialize, Serialize};

/// A window of payload bytes read from the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    /// Byte position of `data` within the source stream.
    pub offset: u64,
    /// Raw bytes; never longer than the configured chunk size.
    pub data: Vec<u8>,
    /// Whether the source considers this the last chunk.
    pub is_final: bool,
}

impl Chunk {
    pub fn size(&self) -> usize {
        self.data.len()
    }
}

/// How the source decides that a chunk is the last one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinalFragmentPolicy {
    /// Read one window ahead so the true last chunk is always marked final,
    /// even when the stream length is an exact multiple of the chunk size.
    #[default]
    Lookahead,
    /// Mark a chunk final only when it is shorter than the chunk size.
    ///
    /// A stream whose length is an exact multiple of the chunk size never
    /// produces a final chunk.
    ShortRead,
}

/// Snapshot handed to progress callbacks.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadProgress {
    pub fragments_sent: u64,
    pub bytes_sent: u64,
    /// Known only when the source is a regular file.
    pub total_bytes: Option<u64>,
    pub bytes_per_second: f64,
}

impl UploadProgress {
    /// Fraction of the payload confirmed so far, if the total is known.
    pub fn ratio(&self) -> Option<f64> {
        match self.total_bytes {
            Some(0) | None => None,
            Some(total) => Some(self.bytes_sent as f64 / total as f64),
        }
    }
}
