//! Handler for `apiprobe serve`.

use crate::config::GlobalConfig;
use crate::error::Error;
use crate::server;
use crate::service::TestService;
use std::sync::Arc;

pub async fn execute(
    host: Option<String>,
    port: Option<u16>,
    offline: bool,
    config: &GlobalConfig,
) -> Result<(), Error> {
    let host = host.unwrap_or_else(|| config.server.host.clone());
    let port = port.unwrap_or(config.server.port);

    let addr = tokio::net::lookup_host((host.as_str(), port))
        .await
        .map_err(|e| Error::from(e).with_context(&format!("Failed to resolve {host}")))?
        .next()
        .ok_or_else(|| Error::invalid_config(format!("No address found for {host}:{port}")))?;

    let service = Arc::new(TestService::from_config(config, offline)?);
    server::serve(service, addr).await
}
