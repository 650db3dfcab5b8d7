//! Build-server-integration (BSI) URL parsing.
//!
//! FoD hands out a BSI URL per release, e.g.
//! `https://www.hpfod.com/bsi2.aspx?tid=1&tc=acme&pv=1234&astid=7&ts=JAVA%2fJ2EE&ll=1.8`.
//! It identifies the tenant, the release and the scan settings.

use anyhow::{Context, bail};
use fodupload_scan_upload::ScanTarget;
use percent_encoding::percent_decode_str;

/// Values carried by a BSI URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BsiToken {
    pub scheme: String,
    /// Host (with port, if any) the URL points at.
    pub host: String,
    pub tenant_id: i64,
    pub tenant_code: String,
    pub release_id: i64,
    pub assessment_type_id: i64,
    pub technology_stack: String,
    pub language_level: Option<String>,
}

impl BsiToken {
    pub fn parse(url: &str) -> anyhow::Result<Self> {
        let url = url.trim();
        let (scheme, rest) = url
            .split_once("://")
            .with_context(|| format!("BSI URL has no scheme: {url}"))?;
        let rest = rest.split('#').next().unwrap_or_default();
        let (authority, query) = match rest.split_once('?') {
            Some((before, query)) => (before, query),
            None => bail!("BSI URL has no query string: {url}"),
        };
        let host = authority.split('/').next().unwrap_or_default();
        if host.is_empty() {
            bail!("BSI URL has no host: {url}");
        }

        let pairs = query_pairs(query)?;
        let get = |name: &str| {
            pairs
                .iter()
                .find(|(k, _)| k.eq_ignore_ascii_case(name))
                .map(|(_, v)| v.as_str())
                .filter(|v| !v.is_empty())
        };
        let required = |name: &str| {
            get(name).with_context(|| format!("BSI URL is missing the '{name}' parameter"))
        };
        let number = |name: &str| -> anyhow::Result<i64> {
            let value = required(name)?;
            value
                .parse()
                .with_context(|| format!("BSI parameter '{name}' is not a number: {value}"))
        };

        Ok(Self {
            scheme: scheme.to_ascii_lowercase(),
            host: host.to_ascii_lowercase(),
            tenant_id: number("tid")?,
            tenant_code: required("tc")?.to_string(),
            release_id: number("pv")?,
            assessment_type_id: number("astid")?,
            technology_stack: required("ts")?.to_string(),
            language_level: get("ll").map(str::to_string),
        })
    }

    /// API base URL for the portal this token came from: `api.` plus the
    /// host with any leading `www.` removed.
    pub fn api_base_url(&self) -> String {
        let host = self.host.strip_prefix("www.").unwrap_or(&self.host);
        format!("{}://api.{host}", self.scheme)
    }

    pub fn scan_target(&self) -> ScanTarget {
        ScanTarget {
            release_id: self.release_id,
            assessment_type_id: self.assessment_type_id,
            technology_stack: self.technology_stack.clone(),
            language_level: self.language_level.clone(),
        }
    }
}

fn query_pairs(query: &str) -> anyhow::Result<Vec<(String, String)>> {
    query
        .split('&')
        .filter(|p| !p.is_empty())
        .map(|pair| {
            let (name, value) = pair.split_once('=').unwrap_or((pair, ""));
            Ok((decode(name)?, decode(value)?))
        })
        .collect()
}

fn decode(raw: &str) -> anyhow::Result<String> {
    let spaced = raw.replace('+', " ");
    let decoded = percent_decode_str(&spaced)
        .decode_utf8()
        .with_context(|| format!("invalid percent-encoding in BSI URL: {raw}"))?;
    Ok(decoded.into_owned())
}
