//! Upload flow: login, entitlement lookup, fragment transfer.

use anyhow::Context;
use fodupload_client::FodClient;
use fodupload_scan_upload::{Authenticator, UploadEngine, UploadReport, resolve_target};
use fodupload_transfer::FragmentSource;
use tracing::info;

use crate::adapter::FodAdapter;
use crate::bsi::BsiToken;
use crate::cli::Cli;
use crate::config::Config;

/// Runs one upload to completion.
pub async fn run(cli: &Cli, mut config: Config) -> anyhow::Result<UploadReport> {
    cli.apply_overrides(&mut config);

    let bsi = BsiToken::parse(&cli.bsi_url)?;
    let api_url = config
        .api_url
        .clone()
        .unwrap_or_else(|| bsi.api_base_url());
    info!(
        api = %api_url,
        release = bsi.release_id,
        tenant = %bsi.tenant_code,
        tenant_id = bsi.tenant_id,
        "preparing upload"
    );

    let source = FragmentSource::open(
        &cli.zip_location,
        config.chunk_size,
        config.final_fragment_policy,
    )
    .await
    .with_context(|| format!("cannot open payload {}", cli.zip_location.display()))?;

    let client = FodClient::new(&api_url, config.request_timeout())?;
    let adapter = FodAdapter::new(client, cli.credentials(&bsi.tenant_code)?);

    let token = adapter.authenticate().await?;
    info!("authenticated");

    let descriptor = resolve_target(&adapter, &token, bsi.scan_target(), cli.scan_options()).await?;

    let mut engine = UploadEngine::new(
        descriptor,
        &adapter,
        &adapter,
        token,
        config.upload_settings(),
    );
    let report = engine.upload(source).await?;
    Ok(report)
}
