use crate::config::ClientConfig;
use crate::decode::decode;
use crate::rpc::{Gateway, HttpTransport, Transport};
use crate::types::*;
use crate::{Error, Result};
use base64::Engine as _;
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::path::Path;

/// Typed aria2 client. Every method is one RPC round trip.
pub struct Aria2Client<T = HttpTransport> {
    rpc: Gateway<T>,
}

impl Aria2Client<HttpTransport> {
    pub fn connect(config: &ClientConfig) -> Result<Self> {
        config.validate()?;
        let transport = HttpTransport::new(config)?;
        log::debug!("Using aria2 endpoint {}", transport.endpoint());
        Ok(Self::with_transport(transport, config.secret.as_deref()))
    }
}

impl<T: Transport> Aria2Client<T> {
    pub fn with_transport(transport: T, secret: Option<&str>) -> Self {
        Self {
            rpc: Gateway::new(transport, secret),
        }
    }

    pub fn gateway(&self) -> &Gateway<T> {
        &self.rpc
    }

    async fn call<R: serde::de::DeserializeOwned>(
        &self,
        method: &str,
        params: Vec<Value>,
    ) -> Result<R> {
        let result = self.rpc.call(method, params).await?;
        decode(method, result)
    }

    /// Mutations answer with the GID they acted on; anything else means we
    /// cannot tell which download was touched.
    async fn call_confirming_gid(&self, method: &str, gid: &str) -> Result<Gid> {
        let echoed: String = self.call(method, vec![json!(gid)]).await?;
        if echoed != gid {
            return Err(Error::ProtocolMismatch {
                method: method.to_string(),
                expected: gid.to_string(),
                actual: echoed,
            });
        }
        Ok(Gid::new(echoed))
    }

    // Status queries
    pub async fn get_global_stat(&self) -> Result<GlobalStat> {
        self.call("getGlobalStat", vec![]).await
    }

    /// Full status of one download. All keys are returned when `keys` is empty.
    pub async fn tell_status(&self, gid: &str, keys: &[&str]) -> Result<DownloadStatus> {
        let mut params = vec![json!(gid)];
        if !keys.is_empty() {
            params.push(json!(keys));
        }
        self.call("tellStatus", params).await
    }

    /// Active downloads. An empty `keys` requests [`DEFAULT_STATUS_KEYS`].
    pub async fn tell_active(&self, keys: &[&str]) -> Result<Vec<DownloadStatus>> {
        self.call("tellActive", vec![status_keys(keys)]).await
    }

    /// Waiting and paused downloads, `num` entries starting at `offset`.
    /// A negative offset counts from the end of the queue.
    pub async fn tell_waiting(
        &self,
        offset: i64,
        num: u64,
        keys: &[&str],
    ) -> Result<Vec<DownloadStatus>> {
        self.call(
            "tellWaiting",
            vec![json!(offset), json!(num), status_keys(keys)],
        )
        .await
    }

    /// Stopped downloads, `num` entries starting at `offset`.
    pub async fn tell_stopped(
        &self,
        offset: i64,
        num: u64,
        keys: &[&str],
    ) -> Result<Vec<DownloadStatus>> {
        self.call(
            "tellStopped",
            vec![json!(offset), json!(num), status_keys(keys)],
        )
        .await
    }

    pub async fn get_files(&self, gid: &str) -> Result<Vec<DownloadFile>> {
        self.call("getFiles", vec![json!(gid)]).await
    }

    pub async fn get_peers(&self, gid: &str) -> Result<Vec<BtPeer>> {
        self.call("getPeers", vec![json!(gid)]).await
    }

    // Download operations

    /// Queue a single URI.
    ///
    /// aria2 takes an array of URIs that must all point at the same resource.
    /// Whether extra entries act as failover mirrors or parallel sources is up
    /// to the daemon, so only one URI is ever sent.
    pub async fn add_uri(&self, uri: &str) -> Result<Gid> {
        let gid: Gid = self.call("addUri", vec![json!([uri])]).await?;
        log::info!("Added download with GID: {}", gid);
        Ok(gid)
    }

    /// Queue a torrent given as base64 of the `.torrent` file contents.
    pub async fn add_torrent(&self, torrent_base64: &str) -> Result<Gid> {
        let gid: Gid = self.call("addTorrent", vec![json!(torrent_base64)]).await?;
        log::info!("Added torrent with GID: {}", gid);
        Ok(gid)
    }

    pub async fn add_torrent_file(&self, path: &Path) -> Result<Gid> {
        let contents = tokio::fs::read(path).await?;
        let encoded = base64::engine::general_purpose::STANDARD.encode(contents);
        self.add_torrent(&encoded).await
    }

    // Control operations
    pub async fn pause(&self, gid: &str) -> Result<Gid> {
        let gid = self.call_confirming_gid("pause", gid).await?;
        log::info!("Paused download: {}", gid);
        Ok(gid)
    }

    pub async fn force_pause(&self, gid: &str) -> Result<Gid> {
        let gid = self.call_confirming_gid("forcePause", gid).await?;
        log::info!("Force paused download: {}", gid);
        Ok(gid)
    }

    pub async fn unpause(&self, gid: &str) -> Result<Gid> {
        let gid = self.call_confirming_gid("unpause", gid).await?;
        log::info!("Resumed download: {}", gid);
        Ok(gid)
    }

    pub async fn remove(&self, gid: &str) -> Result<Gid> {
        let gid = self.call_confirming_gid("remove", gid).await?;
        log::info!("Removed download: {}", gid);
        Ok(gid)
    }

    pub async fn force_remove(&self, gid: &str) -> Result<Gid> {
        let gid = self.call_confirming_gid("forceRemove", gid).await?;
        log::info!("Force removed download: {}", gid);
        Ok(gid)
    }

    // Introspection
    pub async fn list_methods(&self) -> Result<Vec<String>> {
        self.call("listMethods", vec![]).await
    }

    pub async fn list_notifications(&self) -> Result<Vec<String>> {
        self.call("listNotifications", vec![]).await
    }

    pub async fn get_version(&self) -> Result<VersionInfo> {
        self.call("getVersion", vec![]).await
    }

    // Options
    pub async fn get_global_option(&self) -> Result<BTreeMap<String, String>> {
        self.call("getGlobalOption", vec![]).await
    }

    pub async fn change_global_option(&self, options: &BTreeMap<String, String>) -> Result<()> {
        let ack: String = self
            .call("changeGlobalOption", vec![json!(options)])
            .await?;
        if ack != "OK" {
            return Err(Error::Rejected(ack));
        }
        log::info!("Changed global options: {:?}", options.keys().collect::<Vec<_>>());
        Ok(())
    }
}

fn status_keys(keys: &[&str]) -> Value {
    if keys.is_empty() {
        json!(DEFAULT_STATUS_KEYS)
    } else {
        json!(keys)
    }
}
