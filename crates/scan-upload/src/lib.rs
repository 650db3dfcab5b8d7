//! Static-scan upload flow: entitlement resolution and the fragment protocol.
//!
//! This crate implements the **protocol logic** for pushing a scan payload
//! to Fortify on Demand. It has no HTTP dependency: the app provides
//! [`Transport`], [`Authenticator`] and [`EntitlementLookup`]
//! implementations that bridge to the real client.
//!
//! # Pipeline
//!
//! 1. **Resolve**: look up the entitlement and freeze an [`UploadTargetDescriptor`]
//! 2. **Fragment**: read the payload in fixed-size windows
//! 3. **Dispatch**: POST each fragment with its number and offset
//! 4. **Classify**: turn each response into an [`UploadOutcome`]
//! 5. **Finish**: stop on the first success or failure

pub mod classify;
pub mod connection;
pub mod engine;
pub mod entitlement;
pub mod error;
pub mod request;
pub mod types;

// Re-export primary types for convenience.
pub use classify::classify_response;
pub use connection::{Authenticator, EntitlementLookup, Transport};
pub use engine::{EngineState, UploadEngine};
pub use entitlement::{resolve_target, select_entitlement};
pub use error::UploadError;
pub use request::build_request;
pub use types::{
    EntitlementInfo, FragmentDescriptor, FragmentNumber, ScanOptions, ScanTarget,
    SessionExpiryPolicy, TransportResponse, UploadOutcome, UploadReport, UploadRequest,
    UploadSettings, UploadTargetDescriptor,
};
