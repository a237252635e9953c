//! Process configuration parsed from CLI arguments and environment.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use url::Url;

const DEFAULT_PROVIDER_ENDPOINT: &str = "https://api.groq.com/openai/v1/chat/completions";

/// Runtime configuration for the caption service.
///
/// Every flag can also be supplied through the environment, which is how the
/// deployment manifests set them.
#[derive(Debug, Clone, Parser)]
#[command(name = "captions-backend", about = "Credit-gated caption generation service")]
pub struct AppConfig {
    /// Socket address to bind the HTTP server to.
    #[arg(long, env = "BIND_ADDR", default_value = "0.0.0.0:8080")]
    pub bind_addr: SocketAddr,

    /// PostgreSQL connection URL. When absent the process refuses to start
    /// unless `--in-memory` is set.
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,

    /// Serve from a process-local store instead of PostgreSQL.
    #[arg(long, env = "IN_MEMORY", default_value_t = false)]
    pub in_memory: bool,

    /// Chat-completion endpoint of the hosted model.
    #[arg(long, env = "PROVIDER_ENDPOINT", default_value = DEFAULT_PROVIDER_ENDPOINT)]
    pub provider_endpoint: Url,

    /// Bearer token for the provider endpoint.
    #[arg(long, env = "PROVIDER_API_KEY", default_value = "")]
    pub provider_api_key: String,

    /// Model identifier requested from the provider.
    #[arg(long, env = "PROVIDER_MODEL", default_value = "llama-3.1-70b-versatile")]
    pub provider_model: String,

    /// Provider request timeout in seconds.
    #[arg(long, env = "PROVIDER_TIMEOUT_SECS", default_value_t = 30)]
    pub provider_timeout_secs: u64,

    /// File holding the session cookie signing key material.
    #[arg(
        long,
        env = "SESSION_KEY_FILE",
        default_value = "/var/run/secrets/session_key"
    )]
    pub session_key_file: PathBuf,

    /// Allow an ephemeral signing key when the key file is unreadable.
    #[arg(long, env = "SESSION_ALLOW_EPHEMERAL", default_value_t = false)]
    pub session_allow_ephemeral: bool,

    /// Mark session cookies as Secure.
    #[arg(long, env = "SESSION_COOKIE_SECURE", default_value_t = true)]
    pub session_cookie_secure: bool,
}

impl AppConfig {
    /// Provider timeout as a [`Duration`].
    pub fn provider_timeout(&self) -> Duration {
        Duration::from_secs(self.provider_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn defaults_cover_a_runnable_dev_setup() {
        let config = AppConfig::parse_from(["captions-backend", "--in-memory"]);

        assert_eq!(config.bind_addr.port(), 8080);
        assert!(config.in_memory);
        assert!(config.database_url.is_none());
        assert_eq!(config.provider_model, "llama-3.1-70b-versatile");
        assert_eq!(config.provider_timeout(), Duration::from_secs(30));
        assert_eq!(config.provider_endpoint.as_str(), DEFAULT_PROVIDER_ENDPOINT);
    }

    #[rstest]
    fn flags_override_defaults() {
        let config = AppConfig::parse_from([
            "captions-backend",
            "--bind-addr",
            "127.0.0.1:9900",
            "--database-url",
            "postgres://localhost/captions",
            "--provider-timeout-secs",
            "5",
        ]);

        assert_eq!(config.bind_addr.port(), 9900);
        assert_eq!(
            config.database_url.as_deref(),
            Some("postgres://localhost/captions")
        );
        assert_eq!(config.provider_timeout(), Duration::from_secs(5));
    }
}
