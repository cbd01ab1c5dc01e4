//! JSON-RPC gateway
//!
//! Wraps "call a named aria2 method with positional parameters" over a
//! pluggable [`Transport`]. The gateway qualifies the method name, prepends
//! the RPC secret and turns JSON-RPC error objects into [`Error::Remote`],
//! leaving transport failures as [`Error::Transport`].

use crate::config::ClientConfig;
use crate::{Error, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicU64, Ordering};
use url::Url;

/// Namespace every daemon method lives under.
pub const METHOD_PREFIX: &str = "aria2.";

#[derive(Debug, Clone, Serialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: &'static str,
    pub id: String,
    pub method: String,
    pub params: Vec<Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JsonRpcResponse {
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default)]
    pub result: Option<Value>,
    #[serde(default)]
    pub error: Option<JsonRpcError>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JsonRpcError {
    pub code: i64,
    pub message: String,
}

/// Moves one request to the daemon and brings one response back.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: &JsonRpcRequest) -> Result<JsonRpcResponse>;
}

/// HTTP POST transport against aria2's `/jsonrpc` endpoint.
#[derive(Clone)]
pub struct HttpTransport {
    http: reqwest::Client,
    endpoint: Url,
}

impl HttpTransport {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(format!("aria2-remote/{}", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            http,
            endpoint: config.endpoint.clone(),
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: &JsonRpcRequest) -> Result<JsonRpcResponse> {
        let response = self
            .http
            .post(self.endpoint.clone())
            .json(request)
            .send()
            .await?;

        // aria2 reports RPC errors with a 4xx status and a JSON-RPC body, so
        // the body is inspected before the status code.
        let status = response.status();
        let body = response.bytes().await?;
        match serde_json::from_slice::<JsonRpcResponse>(&body) {
            Ok(parsed) => Ok(parsed),
            Err(_) if !status.is_success() => Err(Error::Transport(format!(
                "HTTP {} from {}",
                status, self.endpoint
            ))),
            Err(e) => Err(Error::malformed(&request.method, e)),
        }
    }
}

/// Stateless apart from the request id counter used for framing.
pub struct Gateway<T = HttpTransport> {
    transport: T,
    token: Option<String>,
    request_id: AtomicU64,
}

impl<T: Transport> Gateway<T> {
    pub fn new(transport: T, secret: Option<&str>) -> Self {
        Self {
            transport,
            token: secret.map(|s| format!("token:{}", s)),
            request_id: AtomicU64::new(1),
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Call `aria2.<method>` and return the raw `result` payload.
    pub async fn call(&self, method: &str, params: Vec<Value>) -> Result<Value> {
        let id = self.request_id.fetch_add(1, Ordering::SeqCst);

        let mut full_params = Vec::with_capacity(params.len() + 1);
        if let Some(token) = &self.token {
            full_params.push(json!(token));
        }
        full_params.extend(params);

        let request = JsonRpcRequest {
            jsonrpc: "2.0",
            id: id.to_string(),
            method: format!("{}{}", METHOD_PREFIX, method),
            params: full_params,
        };

        log::debug!(
            "RPC {} (id {}, {} params)",
            request.method,
            request.id,
            request.params.len()
        );

        let response = self.transport.send(&request).await?;

        if let Some(error) = response.error {
            log::debug!("RPC {} failed: {} {}", request.method, error.code, error.message);
            return Err(Error::Remote {
                code: error.code,
                message: error.message,
            });
        }

        response
            .result
            .ok_or_else(|| Error::malformed(method, "response has neither result nor error"))
    }
}
