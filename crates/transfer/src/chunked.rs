use std::path::Path;

use tokio::io::{AsyncRead, AsyncReadExt};

use crate::types::{Chunk, FinalFragmentPolicy};
use crate::{DEFAULT_CHUNK_SIZE, TransferError};

// ---------------------------------------------------------------------------
// FragmentSource
// ---------------------------------------------------------------------------

/// Reads a byte stream in fixed-size windows, in order, exactly once.
///
/// Each window is filled completely unless the stream ends first, so only the
/// last chunk can be shorter than the chunk size.
pub struct FragmentSource<R> {
    reader: R,
    chunk_size: usize,
    policy: FinalFragmentPolicy,
    position: u64,
    total_size: Option<u64>,
    lookahead: Option<Vec<u8>>,
    finished: bool,
}

impl FragmentSource<tokio::fs::File> {
    /// Opens `path` for fragmented reading.
    ///
    /// If `chunk_size` is 0, [`DEFAULT_CHUNK_SIZE`] (1 MiB) is used.
    pub async fn open(
        path: &Path,
        chunk_size: usize,
        policy: FinalFragmentPolicy,
    ) -> Result<Self, TransferError> {
        let file = tokio::fs::File::open(path).await?;
        let metadata = file.metadata().await?;
        if !metadata.is_file() {
            return Err(TransferError::NotAFile(path.display().to_string()));
        }
        let mut source = Self::new(file, chunk_size, policy);
        source.total_size = Some(metadata.len());
        Ok(source)
    }
}

impl<R: AsyncRead + Unpin> FragmentSource<R> {
    /// Wraps an arbitrary stream. The total size is unknown.
    pub fn new(reader: R, chunk_size: usize, policy: FinalFragmentPolicy) -> Self {
        let chunk_size = if chunk_size == 0 {
            DEFAULT_CHUNK_SIZE
        } else {
            chunk_size
        };
        Self {
            reader,
            chunk_size,
            policy,
            position: 0,
            total_size: None,
            lookahead: None,
            finished: false,
        }
    }

    /// Reads the next chunk. Returns `None` once the stream is exhausted.
    pub async fn next_chunk(&mut self) -> Result<Option<Chunk>, TransferError> {
        if self.finished {
            return Ok(None);
        }

        let data = match self.lookahead.take() {
            Some(buf) => buf,
            None => self.read_window().await?,
        };
        if data.is_empty() {
            self.finished = true;
            return Ok(None);
        }

        let short = data.len() < self.chunk_size;
        let is_final = match self.policy {
            FinalFragmentPolicy::ShortRead => short,
            FinalFragmentPolicy::Lookahead => {
                if short {
                    true
                } else {
                    let next = self.read_window().await?;
                    let at_end = next.is_empty();
                    self.lookahead = Some(next);
                    at_end
                }
            }
        };
        if is_final {
            self.finished = true;
        }

        let chunk = Chunk {
            offset: self.position,
            data,
            is_final,
        };
        self.position += chunk.size() as u64;
        Ok(Some(chunk))
    }

    /// Fills one window, stopping early only at end of stream.
    async fn read_window(&mut self) -> Result<Vec<u8>, TransferError> {
        let mut buf = vec![0u8; self.chunk_size];
        let mut filled = 0;
        while filled < buf.len() {
            let n = self.reader.read(&mut buf[filled..]).await?;
            if n == 0 {
                break;
            }
            filled += n;
        }
        buf.truncate(filled);
        Ok(buf)
    }

    /// Configured chunk size.
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Bytes handed out so far.
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Total stream size, when the source is a regular file.
    pub fn total_size(&self) -> Option<u64> {
        self.total_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::pin::Pin;
    use std::task::{Context, Poll};
    use tempfile::TempDir;
    use tokio::io::ReadBuf;

    async fn collect<R: AsyncRead + Unpin>(source: &mut FragmentSource<R>) -> Vec<Chunk> {
        let mut chunks = Vec::new();
        while let Some(chunk) = source.next_chunk().await.unwrap() {
            chunks.push(chunk);
        }
        chunks
    }

    /// Yields at most `step` bytes per read to exercise window filling.
    struct Trickle {
        data: Vec<u8>,
        pos: usize,
        step: usize,
    }

    impl AsyncRead for Trickle {
        fn poll_read(
            mut self: Pin<&mut Self>,
            _cx: &mut Context<'_>,
            buf: &mut ReadBuf<'_>,
        ) -> Poll<std::io::Result<()>> {
            let end = (self.pos + self.step)
                .min(self.data.len())
                .min(self.pos + buf.remaining());
            let start = self.pos;
            buf.put_slice(&self.data[start..end]);
            self.pos = end;
            Poll::Ready(Ok(()))
        }
    }

    /// Fails on the first read.
    struct Broken;

    impl AsyncRead for Broken {
        fn poll_read(
            self: Pin<&mut Self>,
            _cx: &mut Context<'_>,
            _buf: &mut ReadBuf<'_>,
        ) -> Poll<std::io::Result<()>> {
            Poll::Ready(Err(std::io::Error::other("disk on fire")))
        }
    }

    #[tokio::test]
    async fn reads_all_in_order() {
        let data: &[u8] = b"AABBCCDDEE";
        let mut source = FragmentSource::new(data, 4, FinalFragmentPolicy::Lookahead);
        let chunks = collect(&mut source).await;

        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].data, b"AABB");
        assert_eq!(chunks[0].offset, 0);
        assert!(!chunks[0].is_final);
        assert_eq!(chunks[1].data, b"CCDD");
        assert_eq!(chunks[1].offset, 4);
        assert_eq!(chunks[2].data, b"EE");
        assert_eq!(chunks[2].offset, 8);
        assert!(chunks[2].is_final);
        assert_eq!(source.position(), 10);
    }

    #[tokio::test]
    async fn lookahead_marks_exact_multiple_final() {
        let data: &[u8] = b"AABBCCDD";
        let mut source = FragmentSource::new(data, 4, FinalFragmentPolicy::Lookahead);
        let chunks = collect(&mut source).await;

        assert_eq!(chunks.len(), 2);
        assert!(!chunks[0].is_final);
        assert!(chunks[1].is_final);
    }

    #[tokio::test]
    async fn short_read_misses_exact_multiple() {
        let data: &[u8] = b"AABBCCDD";
        let mut source = FragmentSource::new(data, 4, FinalFragmentPolicy::ShortRead);
        let chunks = collect(&mut source).await;

        assert_eq!(chunks.len(), 2);
        assert!(chunks.iter().all(|c| !c.is_final));
    }

    #[tokio::test]
    async fn short_read_marks_short_tail_final() {
        let data: &[u8] = b"AABBC";
        let mut source = FragmentSource::new(data, 4, FinalFragmentPolicy::ShortRead);
        let chunks = collect(&mut source).await;

        assert_eq!(chunks.len(), 2);
        assert!(!chunks[0].is_final);
        assert!(chunks[1].is_final);
        assert_eq!(chunks[1].size(), 1);
    }

    #[tokio::test]
    async fn empty_stream_yields_nothing() {
        for policy in [FinalFragmentPolicy::Lookahead, FinalFragmentPolicy::ShortRead] {
            let data: &[u8] = b"";
            let mut source = FragmentSource::new(data, 4, policy);
            assert!(source.next_chunk().await.unwrap().is_none());
            assert!(source.next_chunk().await.unwrap().is_none());
        }
    }

    #[tokio::test]
    async fn fills_windows_from_trickling_reader() {
        let reader = Trickle {
            data: (0u8..10).collect(),
            pos: 0,
            step: 3,
        };
        let mut source = FragmentSource::new(reader, 4, FinalFragmentPolicy::ShortRead);
        let chunks = collect(&mut source).await;

        let sizes: Vec<usize> = chunks.iter().map(Chunk::size).collect();
        assert_eq!(sizes, vec![4, 4, 2]);
        assert!(chunks[2].is_final);
    }

    #[tokio::test]
    async fn read_error_propagates() {
        let mut source = FragmentSource::new(Broken, 4, FinalFragmentPolicy::Lookahead);
        let result = source.next_chunk().await;
        assert!(matches!(result, Err(TransferError::Io(_))));
    }

    #[tokio::test]
    async fn zero_chunk_size_uses_default() {
        let data: &[u8] = b"x";
        let source = FragmentSource::new(data, 0, FinalFragmentPolicy::Lookahead);
        assert_eq!(source.chunk_size(), DEFAULT_CHUNK_SIZE);
    }

    #[tokio::test]
    async fn open_reports_total_size() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("payload.zip");
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(&[7u8; 10]).unwrap();
        drop(f);

        let mut source = FragmentSource::open(&path, 4, FinalFragmentPolicy::Lookahead)
            .await
            .unwrap();
        assert_eq!(source.total_size(), Some(10));
        let chunks = collect(&mut source).await;
        assert_eq!(chunks.len(), 3);
    }

    #[tokio::test]
    async fn open_rejects_directory() {
        let dir = TempDir::new().unwrap();
        let result = FragmentSource::open(dir.path(), 4, FinalFragmentPolicy::Lookahead).await;
        assert!(matches!(result, Err(TransferError::NotAFile(_))));
    }

    #[tokio::test]
    async fn open_missing_file_is_io_error() {
        let dir = TempDir::new().unwrap();
        let result = FragmentSource::open(
            &dir.path().join("missing.zip"),
            4,
            FinalFragmentPolicy::Lookahead,
        )
        .await;
        assert!(matches!(result, Err(TransferError::Io(_))));
    }
}
