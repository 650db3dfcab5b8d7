//! Command-line interface.

use std::cmp::Ordering;
use std::path::PathBuf;

use anyhow::bail;
use clap::{ArgGroup, CommandFactory, FromArgMatches, Parser};
use fodupload_client::Credentials;
use fodupload_protocol::{AuditPreferenceType, EntitlementPreferenceType, ScanPreferenceType};
use fodupload_scan_upload::{ScanOptions, SessionExpiryPolicy};
use fodupload_transfer::FinalFragmentPolicy;

use crate::config::Config;

/// Uploads a static-scan payload to Fortify on Demand.
///
/// Connect to the API with either --api-key/--api-secret or
/// --username/--password.
#[derive(Debug, Parser)]
#[command(name = "fodupload", version)]
#[command(group(
    ArgGroup::new("credentials")
        .required(true)
        .args(["api_key", "username"])
))]
pub struct Cli {
    /// Build-server-integration URL of the release
    #[arg(long, value_name = "URL")]
    pub bsi_url: String,

    /// Payload to upload
    #[arg(long, value_name = "FILE")]
    pub zip_location: PathBuf,

    /// API key
    #[arg(long, value_name = "KEY", requires = "api_secret")]
    pub api_key: Option<String>,

    /// API secret
    #[arg(long, value_name = "SECRET", requires = "api_key")]
    pub api_secret: Option<String>,

    /// Tenant user name
    #[arg(long, value_name = "USER", requires = "password")]
    pub username: Option<String>,

    /// Tenant user password
    #[arg(long, value_name = "PASSWORD", requires = "username")]
    pub password: Option<String>,

    /// Also run a Sonatype open-source scan
    #[arg(long)]
    pub run_sonatype_scan: bool,

    /// Scan third-party libraries too
    #[arg(long)]
    pub include_third_party_libs: bool,

    /// Mark the scan as a remediation scan
    #[arg(long)]
    pub remediation_scan: bool,

    /// Scan mode: standard (1) or express (2)
    #[arg(long, value_name = "PREF")]
    pub scan_preference: Option<ScanPreferenceType>,

    /// Audit mode: manual (1) or automated (2)
    #[arg(long, value_name = "PREF")]
    pub audit_preference: Option<AuditPreferenceType>,

    /// Entitlement kind: single-scan or subscription
    #[arg(long, value_name = "PREF")]
    pub entitlement_preference: Option<EntitlementPreferenceType>,

    /// Fragment size in bytes
    #[arg(long, value_name = "BYTES")]
    pub chunk_size: Option<usize>,

    /// API base URL (derived from the BSI URL by default)
    #[arg(long, value_name = "URL")]
    pub api_url: Option<String>,

    /// Only mark a fragment as last when it is shorter than the chunk size
    #[arg(long)]
    pub legacy_final_fragment: bool,

    /// Resend a fragment rejected for an expired session
    #[arg(long)]
    pub resend_on_session_expiry: bool,

    /// Configuration file
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

/// One option as seen by the help ordering.
#[derive(Debug, Clone, Copy)]
pub struct HelpEntry<'a> {
    pub name: &'a str,
    pub required: bool,
}

/// Required options first, then case-insensitively by name.
pub fn help_order(a: &HelpEntry<'_>, b: &HelpEntry<'_>) -> Ordering {
    b.required
        .cmp(&a.required)
        .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
}

/// The clap command with options laid out by [`help_order`].
pub fn command() -> clap::Command {
    let cmd = Cli::command();
    let mut entries: Vec<(String, String, bool)> = cmd
        .get_arguments()
        .filter(|a| !a.is_positional())
        .map(|a| {
            let id = a.get_id().to_string();
            let name = a.get_long().map(str::to_string).unwrap_or_else(|| id.clone());
            (id, name, a.is_required_set())
        })
        .collect();
    entries.sort_by(|a, b| {
        help_order(
            &HelpEntry {
                name: &a.1,
                required: a.2,
            },
            &HelpEntry {
                name: &b.1,
                required: b.2,
            },
        )
    });

    entries
        .iter()
        .enumerate()
        .fold(cmd, |cmd, (i, (id, _, _))| {
            cmd.mut_arg(id, |arg| arg.display_order(i))
        })
}

impl Cli {
    /// Parses the process arguments, exiting on error or `--help`.
    pub fn parse_args() -> Self {
        let matches = command().get_matches();
        Self::from_arg_matches(&matches).unwrap_or_else(|e| e.exit())
    }

    pub fn credentials(&self, tenant_code: &str) -> anyhow::Result<Credentials> {
        match (&self.api_key, &self.api_secret, &self.username, &self.password) {
            (Some(key), Some(secret), _, _) => Ok(Credentials::ApiKey {
                key: key.clone(),
                secret: secret.clone(),
            }),
            (_, _, Some(username), Some(password)) => Ok(Credentials::User {
                tenant: tenant_code.to_string(),
                username: username.clone(),
                password: password.clone(),
            }),
            _ => bail!("either --api-key/--api-secret or --username/--password is required"),
        }
    }

    pub fn scan_options(&self) -> ScanOptions {
        ScanOptions {
            scan_preference: self.scan_preference,
            audit_preference: self.audit_preference,
            entitlement_preference: self.entitlement_preference.unwrap_or_default(),
            run_sonatype_scan: self.run_sonatype_scan,
            include_third_party_libs: self.include_third_party_libs,
            is_remediation_scan: self.remediation_scan,
        }
    }

    /// Applies command-line overrides on top of the file configuration.
    pub fn apply_overrides(&self, config: &mut Config) {
        if let Some(url) = &self.api_url {
            config.api_url = Some(url.clone());
        }
        if let Some(size) = self.chunk_size {
            config.chunk_size = size;
        }
        if self.legacy_final_fragment {
            config.final_fragment_policy = FinalFragmentPolicy::ShortRead;
        }
        if self.resend_on_session_expiry {
            config.session_expiry_policy = SessionExpiryPolicy::Resend;
        }
    }
}
