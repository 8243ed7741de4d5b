//! Resolution of Qdrant connection settings from configuration

use crate::config::VectorDbConfig;
use secrecy::{ExposeSecret, Secret};
use tracing::warn;

/// Connection parameters derived from [`VectorDbConfig`]
#[derive(Debug, Clone)]
pub struct ConnectionSettings {
    pub host: String,
    pub port: Option<u16>,
    pub use_tls: bool,
    pub api_key: Option<Secret<String>>,
}

impl ConnectionSettings {
    /// Normalize host, port, TLS and credentials.
    ///
    /// An explicit `http://` or `https://` on the host decides TLS. Without
    /// one, TLS is used only when the port is 443.
    pub fn resolve(config: &VectorDbConfig) -> Self {
        let raw_host = config.host.trim();

        let (scheme_tls, host) = if let Some(rest) = raw_host.strip_prefix("https://") {
            (Some(true), rest)
        } else if let Some(rest) = raw_host.strip_prefix("http://") {
            (Some(false), rest)
        } else {
            (None, raw_host)
        };
        let host = host.trim_end_matches('/').to_string();

        let port = config
            .port
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .and_then(|p| match p.parse::<u16>() {
                Ok(port) => Some(port),
                Err(_) => {
                    warn!("Invalid port value: {}, ignoring", p);
                    None
                }
            });

        let use_tls = scheme_tls.unwrap_or(port == Some(443));

        let api_key = config
            .api_key
            .as_ref()
            .filter(|key| !key.expose_secret().is_empty())
            .cloned();

        Self {
            host,
            port,
            use_tls,
            api_key,
        }
    }

    /// URL handed to the gRPC client
    pub fn url(&self) -> String {
        let scheme = if self.use_tls { "https" } else { "http" };
        match self.port {
            Some(port) => format!("{}://{}:{}", scheme, self.host, port),
            None => format!("{}://{}", scheme, self.host),
        }
    }
}
