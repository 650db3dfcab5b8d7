//! Fortify on Demand REST client.

use std::time::Duration;

use fodupload_protocol::constants::{TOKEN_PATH, assessment_types_path};
use fodupload_protocol::{ReleaseAssessmentType, ReleaseAssessmentTypesResponse, TokenResponse};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use tracing::debug;

use crate::types::Credentials;

/// Errors from the FoD client.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error {status}: {body}")]
    Api { status: u16, body: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("token endpoint returned no access token")]
    InvalidToken,
}

/// Status and fully-read body of a raw POST.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

/// FoD API client bound to one API base URL.
pub struct FodClient {
    http: reqwest::Client,
    base_url: String,
}

impl FodClient {
    /// Creates a client for `base_url` (e.g. `https://api.ams.fortify.com`).
    ///
    /// `timeout` bounds each round trip, including fragment uploads.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, Error> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Requests a bearer token.
    pub async fn authenticate(&self, credentials: &Credentials) -> Result<TokenResponse, Error> {
        let url = format!("{}{}", self.base_url, TOKEN_PATH);
        debug!(?credentials, "requesting access token");
        let resp = self
            .http
            .post(&url)
            .form(&credentials.form())
            .send()
            .await?;
        let body = Self::success_body(resp).await?;

        let token: TokenResponse = serde_json::from_slice(&body)?;
        if token.access_token.is_empty() {
            return Err(Error::InvalidToken);
        }
        Ok(token)
    }

    /// Lists the static assessment types of a release.
    pub async fn get_assessment_types(
        &self,
        token: &str,
        release_id: i64,
    ) -> Result<Vec<ReleaseAssessmentType>, Error> {
        let url = format!("{}{}", self.base_url, assessment_types_path(release_id));
        let resp = self
            .http
            .get(&url)
            .query(&[("scanType", "Static")])
            .header(AUTHORIZATION, format!("Bearer {token}"))
            .send()
            .await?;
        let body = Self::success_body(resp).await?;

        let parsed: ReleaseAssessmentTypesResponse = serde_json::from_slice(&body)?;
        Ok(parsed.items)
    }

    /// POSTs raw bytes to `path_and_query` and returns the response as-is.
    ///
    /// Error statuses are not errors here; only network failures are.
    pub async fn post_bytes(
        &self,
        path_and_query: &str,
        authorization: &str,
        content_type: &str,
        body: Vec<u8>,
    ) -> Result<RawResponse, Error> {
        let url = format!("{}{}", self.base_url, path_and_query);
        let resp = self
            .http
            .post(&url)
            .header(AUTHORIZATION, authorization)
            .header(CONTENT_TYPE, content_type)
            .body(body)
            .send()
            .await?;
        let status = resp.status().as_u16();
        let body = resp.bytes().await?.to_vec();
        Ok(RawResponse { status, body })
    }

    async fn success_body(resp: reqwest::Response) -> Result<Vec<u8>, Error> {
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(resp.bytes().await?.to_vec())
    }
}
