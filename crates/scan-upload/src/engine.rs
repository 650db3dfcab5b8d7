//! Fragment upload state machine.
//!
//! Drives one payload through the start-scan endpoint: read a fragment,
//! dispatch it, classify the response, then advance, re-authenticate or stop.
//! Exactly one fragment is in flight at a time.

use fodupload_transfer::{Chunk, FragmentSource, ProgressCallback, ProgressReporter};
use tokio::io::AsyncRead;
use tracing::{debug, error, info, warn};

use crate::classify::classify_response;
use crate::connection::{Authenticator, Transport};
use crate::error::UploadError;
use crate::request::build_request;
use crate::types::{
    FragmentDescriptor, FragmentNumber, SessionExpiryPolicy, UploadOutcome, UploadReport,
    UploadSettings, UploadTargetDescriptor,
};

/// Engine lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    Uploading,
    Succeeded,
    Failed,
}

/// Uploads one payload for one resolved target.
pub struct UploadEngine<'a> {
    descriptor: UploadTargetDescriptor,
    transport: &'a dyn Transport,
    authenticator: &'a dyn Authenticator,
    settings: UploadSettings,
    progress: ProgressReporter,
    state: EngineState,
    /// Bytes confirmed by the server.
    offset: u64,
    next_fragment: u64,
    fragments_sent: u64,
    reauthentications: u32,
    token: String,
}

impl<'a> UploadEngine<'a> {
    pub fn new(
        descriptor: UploadTargetDescriptor,
        transport: &'a dyn Transport,
        authenticator: &'a dyn Authenticator,
        token: String,
        settings: UploadSettings,
    ) -> Self {
        Self {
            descriptor,
            transport,
            authenticator,
            settings,
            progress: ProgressReporter::default(),
            state: EngineState::Uploading,
            offset: 0,
            next_fragment: 0,
            fragments_sent: 0,
            reauthentications: 0,
            token,
        }
    }

    /// Registers a callback fired every few dispatched fragments.
    pub fn with_progress(mut self, callback: ProgressCallback) -> Self {
        self.progress.on_progress(callback);
        self
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn offset(&self) -> u64 {
        self.offset
    }

    pub fn fragments_sent(&self) -> u64 {
        self.fragments_sent
    }

    /// Token currently used for requests.
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Runs the upload to a terminal state.
    ///
    /// `source` is consumed so the underlying handle is released on every
    /// exit path.
    pub async fn upload<R: AsyncRead + Unpin>(
        &mut self,
        mut source: FragmentSource<R>,
    ) -> Result<UploadReport, UploadError> {
        info!(
            release = self.descriptor.target.release_id,
            chunk_size = source.chunk_size(),
            total = ?source.total_size(),
            progress_every = self.progress.interval(),
            "starting upload"
        );

        match self.run(&mut source).await {
            Ok(report) => {
                info!(
                    scan_id = report.scan_id,
                    bytes = report.bytes_sent,
                    fragments = report.fragments_sent,
                    "upload succeeded"
                );
                Ok(report)
            }
            Err(e) => {
                self.state = EngineState::Failed;
                error!(
                    offset = self.offset,
                    read = source.position(),
                    fragments = self.fragments_sent,
                    "upload failed: {e}"
                );
                Err(e)
            }
        }
    }

    async fn run<R: AsyncRead + Unpin>(
        &mut self,
        source: &mut FragmentSource<R>,
    ) -> Result<UploadReport, UploadError> {
        let total = source.total_size();
        let mut pending: Option<FragmentDescriptor> = None;
        let mut attempts: u32 = 0;

        loop {
            let fragment = match pending.take() {
                Some(fragment) => fragment,
                None => {
                    attempts = 0;
                    match source.next_chunk().await? {
                        Some(chunk) => self.describe(chunk),
                        None => break,
                    }
                }
            };

            let request = build_request(&self.descriptor, &self.token, &fragment);
            let response = self.transport.execute(&request).await?;
            self.fragments_sent += 1;
            debug!(
                fragment = %fragment.number,
                offset = fragment.offset,
                bytes = fragment.payload.len(),
                status = response.status,
                "fragment dispatched"
            );

            let size = fragment.payload.len() as u64;
            match classify_response(response.status, &response.body)? {
                UploadOutcome::Continue => {
                    self.offset += size;
                    self.progress.add_confirmed(size);
                }
                UploadOutcome::Succeeded { scan_id } => {
                    self.offset += size;
                    self.state = EngineState::Succeeded;
                    return Ok(UploadReport {
                        scan_id,
                        bytes_sent: self.offset,
                        fragments_sent: self.fragments_sent,
                        reauthentications: self.reauthentications,
                    });
                }
                UploadOutcome::Failed { status, errors } => {
                    return Err(UploadError::ServerRejected { status, errors });
                }
                UploadOutcome::SessionExpired => {
                    warn!(
                        fragment = %fragment.number,
                        offset = fragment.offset,
                        policy = ?self.settings.session_expiry,
                        "session expired, re-authenticating"
                    );
                    match self.settings.session_expiry {
                        SessionExpiryPolicy::Skip => self.renew_token().await?,
                        SessionExpiryPolicy::Resend => {
                            attempts += 1;
                            if attempts > self.settings.max_reauth_attempts {
                                return Err(UploadError::SessionExpired(format!(
                                    "fragment {} still rejected after {} re-authentications",
                                    fragment.number, self.settings.max_reauth_attempts
                                )));
                            }
                            self.renew_token().await?;
                            pending = Some(fragment);
                        }
                    }
                }
            }

            if let Some(p) = self
                .progress
                .fragment_dispatched(self.fragments_sent, self.offset, total)
            {
                info!(
                    fragments = p.fragments_sent,
                    bytes = p.bytes_sent,
                    total = ?p.total_bytes,
                    percent = ?p.ratio().map(|r| (r * 100.0).round() as u64),
                    bytes_per_second = p.bytes_per_second as u64,
                    "upload progress"
                );
            }
        }

        Err(UploadError::Exhausted {
            fragments: self.fragments_sent,
            bytes_sent: self.offset,
        })
    }

    /// Assigns the fragment number; the final chunk takes the sentinel and
    /// leaves the counter untouched.
    fn describe(&mut self, chunk: Chunk) -> FragmentDescriptor {
        let number = if chunk.is_final {
            FragmentNumber::Last
        } else {
            let n = self.next_fragment;
            self.next_fragment += 1;
            FragmentNumber::Sequence(n)
        };
        FragmentDescriptor {
            number,
            offset: self.offset,
            payload: chunk.data,
            is_final: chunk.is_final,
        }
    }

    async fn renew_token(&mut self) -> Result<(), UploadError> {
        let token = self.authenticator.authenticate().await.map_err(|e| {
            UploadError::SessionExpired(format!("re-authentication failed: {e}"))
        })?;
        self.token = token;
        self.reauthentications += 1;
        Ok(())
    }
}
