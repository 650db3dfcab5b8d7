//! Fortify on Demand API client.
//!
//! Async HTTP client using `reqwest`: OAuth token acquisition, release
//! assessment-type lookup, and raw fragment POSTs for the upload engine.

pub mod client;
pub mod types;

pub use client::{Error, FodClient, RawResponse};
pub use types::Credentials;
