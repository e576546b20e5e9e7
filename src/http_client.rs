//! Shared `reqwest` client construction

use crate::error::Error;
use std::sync::Once;
use std::time::Duration;

static CRYPTO_PROVIDER: Once = Once::new();

/// Installs the process-wide rustls crypto provider once.
///
/// reqwest is built without a bundled provider, so one must be installed
/// before the first client is constructed.
pub fn install_crypto_provider() {
    CRYPTO_PROVIDER.call_once(|| {
        #[cfg(not(windows))]
        let provider = rustls::crypto::ring::default_provider();
        #[cfg(windows)]
        let provider = rustls::crypto::aws_lc_rs::default_provider();

        // Another component may already have installed one
        let _ = provider.install_default();
    });
}

/// Builds an HTTP client with the given request and connect timeouts
///
/// # Errors
///
/// Returns `Error::Network` if the TLS backend cannot be initialized
pub fn build_http_client(
    request_timeout: Duration,
    connect_timeout: Duration,
) -> Result<reqwest::Client, Error> {
    install_crypto_provider();
    Ok(reqwest::Client::builder()
        .timeout(request_timeout)
        .connect_timeout(connect_timeout)
        .user_agent(concat!("apiprobe/", env!("CARGO_PKG_VERSION")))
        .build()?)
}
