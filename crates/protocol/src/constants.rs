use std::time::Duration;

/// Size of one upload fragment (1 MiB).
pub const DEFAULT_CHUNK_SIZE: usize = 1024 * 1024;

/// Fragment number that tells the server "this is the last fragment".
pub const LAST_FRAGMENT_NUMBER: i64 = -1;

/// A progress notification is emitted every this many dispatched fragments.
pub const PROGRESS_FRAGMENT_INTERVAL: u64 = 5;

/// Consecutive re-authentications allowed for a single fragment when resending.
pub const DEFAULT_MAX_REAUTH_ATTEMPTS: u32 = 3;

/// Timeout for a single HTTP round trip.
///
/// Each fragment carries up to a full chunk, so this is sized for slow
/// uplinks rather than for JSON calls.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(300);

/// OAuth scope requested for every token.
pub const OAUTH_SCOPE: &str = "api-tenant";

/// Token endpoint, relative to the API base URL.
pub const TOKEN_PATH: &str = "/oauth/token";

/// Builds the start-scan endpoint path for a release.
pub fn start_scan_path(release_id: i64) -> String {
    format!("/api/v3/releases/{release_id}/static-scans/start-scan")
}

/// Builds the assessment-types endpoint path for a release.
pub fn assessment_types_path(release_id: i64) -> String {
    format!("/api/v3/releases/{release_id}/assessment-types")
}
