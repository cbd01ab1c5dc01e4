//! Client configuration
//!
//! Defaults, overridden by environment variables, overridden by command-line
//! flags (see `cli.rs`).

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:6800/jsonrpc";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

pub const ENV_ENDPOINT: &str = "ARIA2_RPC_URL";
pub const ENV_SECRET: &str = "ARIA2_RPC_SECRET";
pub const ENV_TIMEOUT: &str = "ARIA2_RPC_TIMEOUT";

/// How to reach the daemon
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// JSON-RPC endpoint of the daemon
    pub endpoint: Url,

    /// Value of aria2's `--rpc-secret`, if the daemon requires one
    #[serde(skip_serializing)]
    pub secret: Option<String>,

    /// Per-request deadline enforced by the HTTP transport
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: Url::parse(DEFAULT_ENDPOINT).expect("default endpoint is a valid URL"),
            secret: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl ClientConfig {
    /// Defaults with any `ARIA2_RPC_*` environment variables applied.
    pub fn from_env() -> Result<Self> {
        Self::default().merge_lookup(|key| std::env::var(key).ok())
    }

    fn merge_lookup(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        if let Some(endpoint) = lookup(ENV_ENDPOINT) {
            self = self.with_endpoint(&endpoint)?;
        }
        if let Some(secret) = lookup(ENV_SECRET) {
            if !secret.is_empty() {
                self.secret = Some(secret);
            }
        }
        if let Some(timeout) = lookup(ENV_TIMEOUT) {
            let secs: u64 = timeout.trim().parse().map_err(|_| {
                Error::InvalidInput(format!("{} must be a number of seconds, got {:?}", ENV_TIMEOUT, timeout))
            })?;
            self.timeout = Duration::from_secs(secs);
        }
        Ok(self)
    }

    pub fn with_endpoint(mut self, endpoint: &str) -> Result<Self> {
        self.endpoint = Url::parse(endpoint)
            .map_err(|e| Error::InvalidInput(format!("invalid endpoint URL {:?}: {}", endpoint, e)))?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<()> {
        match self.endpoint.scheme() {
            "http" | "https" => {}
            other => {
                return Err(Error::InvalidInput(format!(
                    "endpoint must use http:// or https://, got {}://",
                    other
                )))
            }
        }
        if self.timeout.is_zero() {
            return Err(Error::InvalidInput("timeout must be greater than zero".into()));
        }
        Ok(())
    }
}
