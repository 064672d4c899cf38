//! Client configuration shared by the CLI and the terminal UI.

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::Url;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:3000";
pub const DEFAULT_PORT: u16 = 3000;

/// Flags for reaching a data service. Each falls back to an environment
/// variable, then to the local mock server.
#[derive(Debug, Clone, clap::Args)]
pub struct ClientArgs {
    /// Base URL of the data service
    #[arg(long, env = "AGENDA_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Request timeout in seconds
    #[arg(long, env = "AGENDA_TIMEOUT_SECS", default_value_t = 10)]
    pub timeout_secs: u64,
}

impl Default for ClientArgs {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.into(),
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub base_url: Url,
    pub timeout: Duration,
}

impl Config {
    pub fn from_args(args: &ClientArgs) -> Result<Self> {
        let base_url = Url::parse(&args.base_url)
            .with_context(|| format!("invalid data service URL {:?}", args.base_url))?;
        anyhow::ensure!(
            !base_url.cannot_be_a_base(),
            "data service URL {} cannot carry a path",
            base_url
        );

        Ok(Self {
            base_url,
            timeout: Duration::from_secs(args.timeout_secs),
        })
    }

    pub fn http_client(&self) -> reqwest::Result<reqwest::Client> {
        reqwest::Client::builder().timeout(self.timeout).build()
    }
}
