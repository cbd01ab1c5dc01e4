//! Types module - typed records decoded from aria2 responses
//!
//! Every record is a read-only snapshot of daemon state at the time of the
//! call. Fields that were not requested (see `DEFAULT_STATUS_KEYS`) are left
//! at their empty value; fields that were sent but do not parse fail the
//! decode.

use crate::decode::{
    bool_from_str, bool_str, bytes_from_hex, decimal_str, hex_str, u16_from_str, u64_from_str,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Fields requested by list queries when the caller does not name any.
/// This is the set the `list` and `peers` views need.
pub const DEFAULT_STATUS_KEYS: [&str; 11] = [
    "gid",
    "status",
    "totalLength",
    "completedLength",
    "uploadLength",
    "downloadSpeed",
    "uploadSpeed",
    "infoHash",
    "numSeeders",
    "connections",
    "bittorrent",
];

/// Global download statistics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalStat {
    #[serde(deserialize_with = "u64_from_str", serialize_with = "decimal_str")]
    pub download_speed: u64,
    #[serde(deserialize_with = "u64_from_str", serialize_with = "decimal_str")]
    pub upload_speed: u64,
    #[serde(deserialize_with = "u64_from_str", serialize_with = "decimal_str")]
    pub num_active: u64,
    #[serde(deserialize_with = "u64_from_str", serialize_with = "decimal_str")]
    pub num_waiting: u64,
    #[serde(deserialize_with = "u64_from_str", serialize_with = "decimal_str")]
    pub num_stopped: u64,
    /// Not reported by daemons older than 1.18.
    #[serde(default, deserialize_with = "u64_from_str", serialize_with = "decimal_str")]
    pub num_stopped_total: u64,
}

/// Download lifecycle as reported by the daemon
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Active,
    Waiting,
    Paused,
    Error,
    Complete,
    Removed,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Active => "active",
            Status::Waiting => "waiting",
            Status::Paused => "paused",
            Status::Error => "error",
            Status::Complete => "complete",
            Status::Removed => "removed",
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Opaque download identifier assigned by the daemon.
///
/// aria2 GIDs are 16 hex characters, but the client never relies on that:
/// whatever the daemon sends is kept as-is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Gid(String);

impl Gid {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First `n` characters, used as a compact row key.
    pub fn short(&self, n: usize) -> &str {
        match self.0.char_indices().nth(n) {
            Some((idx, _)) => &self.0[..idx],
            None => &self.0,
        }
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl std::fmt::Display for Gid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Gid {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for Gid {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl AsRef<str> for Gid {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for Gid {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl Serialize for Gid {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Gid {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        String::deserialize(deserializer).map(Gid)
    }
}

/// One row of `tellStatus` / `tellActive` / `tellWaiting` / `tellStopped`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadStatus {
    #[serde(default)]
    pub gid: Gid,
    /// `None` only when the caller did not request the `status` key.
    #[serde(default)]
    pub status: Option<Status>,
    #[serde(default, deserialize_with = "u64_from_str", serialize_with = "decimal_str")]
    pub total_length: u64,
    #[serde(default, deserialize_with = "u64_from_str", serialize_with = "decimal_str")]
    pub completed_length: u64,
    #[serde(default, deserialize_with = "u64_from_str", serialize_with = "decimal_str")]
    pub upload_length: u64,
    #[serde(default, deserialize_with = "u64_from_str", serialize_with = "decimal_str")]
    pub download_speed: u64,
    #[serde(default, deserialize_with = "u64_from_str", serialize_with = "decimal_str")]
    pub upload_speed: u64,
    /// Only BitTorrent downloads have one.
    #[serde(default)]
    pub info_hash: Option<String>,
    #[serde(default, deserialize_with = "u64_from_str", serialize_with = "decimal_str")]
    pub num_seeders: u64,
    #[serde(default, deserialize_with = "u64_from_str", serialize_with = "decimal_str")]
    pub connections: u64,
    #[serde(default, deserialize_with = "u64_from_str", serialize_with = "decimal_str")]
    pub piece_length: u64,
    #[serde(default, deserialize_with = "u64_from_str", serialize_with = "decimal_str")]
    pub num_pieces: u64,
    #[serde(default)]
    pub error_code: Option<String>,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default)]
    pub dir: String,
    #[serde(default)]
    pub files: Vec<DownloadFile>,
    /// Present iff the download is a torrent.
    #[serde(default)]
    pub bittorrent: Option<TorrentStatus>,
    /// Non-zero only while a hash check is running.
    #[serde(default, deserialize_with = "u64_from_str", serialize_with = "decimal_str")]
    pub verified_length: u64,
    #[serde(default, deserialize_with = "bool_from_str", serialize_with = "bool_str")]
    pub verify_integrity_pending: bool,
}

impl DownloadStatus {
    pub fn is_torrent(&self) -> bool {
        self.bittorrent.is_some()
    }
}

/// One file inside a download
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadFile {
    #[serde(deserialize_with = "u64_from_str", serialize_with = "decimal_str")]
    pub index: u64,
    #[serde(default)]
    pub path: String,
    #[serde(deserialize_with = "u64_from_str", serialize_with = "decimal_str")]
    pub length: u64,
    #[serde(deserialize_with = "u64_from_str", serialize_with = "decimal_str")]
    pub completed_length: u64,
    #[serde(deserialize_with = "bool_from_str", serialize_with = "bool_str")]
    pub selected: bool,
    #[serde(default)]
    pub uris: Vec<FileUri>,
}

/// Source URI of a file and whether aria2 is currently using it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileUri {
    pub uri: String,
    pub status: String,
}

/// The `bittorrent` sub-record of a download
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TorrentStatus {
    #[serde(default)]
    pub announce_list: Vec<Vec<String>>,
    #[serde(default)]
    pub comment: Option<String>,
    /// Seconds since the epoch. aria2 sends this one as a JSON number.
    #[serde(default)]
    pub creation_date: Option<i64>,
    /// "single" or "multi"
    #[serde(default)]
    pub mode: Option<String>,
    /// Absent for magnet links whose metadata has not arrived yet.
    #[serde(default)]
    pub info: Option<TorrentInfo>,
}

impl TorrentStatus {
    pub fn name(&self) -> Option<&str> {
        self.info
            .as_ref()
            .map(|info| info.name.as_str())
            .filter(|name| !name.is_empty())
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.creation_date
            .and_then(|secs| DateTime::from_timestamp(secs, 0))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TorrentInfo {
    #[serde(default)]
    pub name: String,
}

/// One swarm peer of a torrent download
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BtPeer {
    /// Percent-encoded peer id
    pub peer_id: String,
    pub ip: String,
    #[serde(deserialize_with = "u16_from_str", serialize_with = "decimal_str")]
    pub port: u16,
    /// Piece availability, one bit per piece, high bit first.
    #[serde(deserialize_with = "bytes_from_hex", serialize_with = "hex_str")]
    pub bitfield: Vec<u8>,
    #[serde(deserialize_with = "bool_from_str", serialize_with = "bool_str")]
    pub am_choking: bool,
    #[serde(deserialize_with = "bool_from_str", serialize_with = "bool_str")]
    pub peer_choking: bool,
    #[serde(deserialize_with = "u64_from_str", serialize_with = "decimal_str")]
    pub download_speed: u64,
    #[serde(deserialize_with = "u64_from_str", serialize_with = "decimal_str")]
    pub upload_speed: u64,
    #[serde(deserialize_with = "bool_from_str", serialize_with = "bool_str")]
    pub seeder: bool,
}

/// Result of `getVersion`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionInfo {
    pub version: String,
    #[serde(default)]
    pub enabled_features: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::decode;
    use crate::Error;
    use serde_json::json;

    fn torrent_status_json() -> serde_json::Value {
        json!({
            "gid": "2089b05ecca3d829",
            "status": "active",
            "totalLength": "1048576",
            "completedLength": "524288",
            "uploadLength": "0",
            "downloadSpeed": "65536",
            "uploadSpeed": "1024",
            "infoHash": "248d0a1cd08284299de78d5c1ed359bb46717d8c",
            "numSeeders": "3",
            "connections": "7",
            "dir": "/downloads",
            "files": [{
                "index": "1",
                "path": "/downloads/debian.iso",
                "length": "1048576",
                "completedLength": "524288",
                "selected": "true",
                "uris": []
            }],
            "bittorrent": {
                "announceList": [["http://tracker.example/announce"]],
                "comment": "Debian CD",
                "creationDate": 1_700_000_000,
                "mode": "single",
                "info": {"name": "debian.iso"}
            },
            "verifiedLength": "0",
            "verifyIntegrityPending": "false"
        })
    }

    #[test]
    fn test_decode_full_status() {
        let status: DownloadStatus = decode("tellStatus", torrent_status_json()).unwrap();
        assert_eq!(status.gid.as_str(), "2089b05ecca3d829");
        assert_eq!(status.status, Some(Status::Active));
        assert_eq!(status.total_length, 1_048_576);
        assert_eq!(status.completed_length, 524_288);
        assert_eq!(status.download_speed, 65_536);
        assert_eq!(status.num_seeders, 3);
        assert_eq!(status.connections, 7);
        assert_eq!(status.files.len(), 1);
        assert!(status.files[0].selected);
        assert_eq!(status.files[0].index, 1);
        assert!(status.is_torrent());

        let bt = status.bittorrent.unwrap();
        assert_eq!(bt.name(), Some("debian.iso"));
        assert_eq!(bt.comment.as_deref(), Some("Debian CD"));
        assert_eq!(bt.created_at().unwrap().timestamp(), 1_700_000_000);
        assert_eq!(bt.announce_list[0][0], "http://tracker.example/announce");
    }

    #[test]
    fn test_http_download_has_no_torrent_record() {
        let status: DownloadStatus = decode(
            "tellStatus",
            json!({"gid": "a", "status": "complete", "bittorrent": null}),
        )
        .unwrap();
        assert!(status.bittorrent.is_none());

        let status: DownloadStatus =
            decode("tellStatus", json!({"gid": "a", "status": "waiting"})).unwrap();
        assert!(status.bittorrent.is_none());
        assert!(status.info_hash.is_none());
    }

    #[test]
    fn test_torrent_without_name_is_still_torrent() {
        let status: DownloadStatus =
            decode("tellStatus", json!({"gid": "a", "bittorrent": {}})).unwrap();
        let bt = status.bittorrent.as_ref().unwrap();
        assert!(status.is_torrent());
        assert_eq!(bt.name(), None);
    }

    #[test]
    fn test_bad_numeric_is_malformed() {
        let mut raw = torrent_status_json();
        raw["totalLength"] = json!("abc");
        let err = decode::<DownloadStatus>("tellStatus", raw).unwrap_err();
        assert!(matches!(err, Error::MalformedResponse { .. }));
    }

    #[test]
    fn test_bad_bool_is_malformed() {
        let mut raw = torrent_status_json();
        raw["verifyIntegrityPending"] = json!("maybe");
        assert!(decode::<DownloadStatus>("tellStatus", raw).is_err());
    }

    #[test]
    fn test_unknown_status_is_malformed() {
        let err = decode::<DownloadStatus>("tellStatus", json!({"status": "sleeping"})).unwrap_err();
        assert!(matches!(err, Error::MalformedResponse { .. }));
    }

    #[test]
    fn test_gid_only_projection() {
        let list: Vec<DownloadStatus> = decode(
            "tellActive",
            json!([{"gid": "2089b05ecca3d829"}, {"gid": "d270c8a3be5d2e10"}]),
        )
        .unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list[1].gid.as_str(), "d270c8a3be5d2e10");
        assert_eq!(list[1].status, None);
        assert_eq!(list[1].total_length, 0);
    }

    #[test]
    fn test_list_keeps_order_and_duplicates() {
        let list: Vec<DownloadStatus> = decode(
            "tellStopped",
            json!([{"gid": "b"}, {"gid": "a"}, {"gid": "b"}]),
        )
        .unwrap();
        let gids: Vec<&str> = list.iter().map(|s| s.gid.as_str()).collect();
        assert_eq!(gids, vec!["b", "a", "b"]);
    }

    #[test]
    fn test_decode_global_stat() {
        let stat: GlobalStat = decode(
            "getGlobalStat",
            json!({
                "downloadSpeed": "21846",
                "uploadSpeed": "0",
                "numActive": "2",
                "numWaiting": "0",
                "numStopped": "1"
            }),
        )
        .unwrap();
        assert_eq!(stat.download_speed, 21_846);
        assert_eq!(stat.num_active, 2);
        assert_eq!(stat.num_stopped, 1);
        assert_eq!(stat.num_stopped_total, 0);
    }

    #[test]
    fn test_decode_peer() {
        let peer: BtPeer = decode(
            "getPeers",
            json!({
                "peerId": "-AR1250-%8F%A3%C4",
                "ip": "203.0.113.9",
                "port": "6881",
                "bitfield": "ff0f",
                "amChoking": "true",
                "peerChoking": "false",
                "downloadSpeed": "10240",
                "uploadSpeed": "0",
                "seeder": "false"
            }),
        )
        .unwrap();
        assert_eq!(peer.port, 6881);
        assert_eq!(peer.bitfield, vec![0xFF, 0x0F]);
        assert!(peer.am_choking);
        assert!(!peer.peer_choking);
        assert_eq!(peer.download_speed, 10_240);
    }

    #[test]
    fn test_peer_with_bad_bitfield_is_malformed() {
        let err = decode::<BtPeer>(
            "getPeers",
            json!({
                "peerId": "x", "ip": "203.0.113.9", "port": "6881",
                "bitfield": "zz",
                "amChoking": "true", "peerChoking": "false",
                "downloadSpeed": "0", "uploadSpeed": "0", "seeder": "false"
            }),
        )
        .unwrap_err();
        assert!(matches!(err, Error::MalformedResponse { .. }));
    }

    #[test]
    fn test_gid_short() {
        let gid = Gid::new("2089b05ecca3d829");
        assert_eq!(gid.short(4), "2089");
        assert_eq!(Gid::new("ab").short(4), "ab");
        assert_eq!(gid.to_string(), "2089b05ecca3d829");
    }

    #[test]
    fn test_serialized_records_decode_again() {
        let peer: BtPeer = decode(
            "getPeers",
            json!({
                "peerId": "-AR1250-", "ip": "203.0.113.9", "port": "6881",
                "bitfield": "ff0f", "amChoking": "true", "peerChoking": "false",
                "downloadSpeed": "2000", "uploadSpeed": "0", "seeder": "false"
            }),
        )
        .unwrap();
        let value = serde_json::to_value(&peer).unwrap();
        assert_eq!(value["port"], json!("6881"));
        assert_eq!(value["bitfield"], json!("ff0f"));
        assert_eq!(value["amChoking"], json!("true"));
        assert_eq!(decode::<BtPeer>("getPeers", value).unwrap(), peer);

        let status: DownloadStatus = decode("tellStatus", torrent_status_json()).unwrap();
        let value = serde_json::to_value(&status).unwrap();
        assert_eq!(value["totalLength"], json!("1048576"));
        assert_eq!(decode::<DownloadStatus>("tellStatus", value).unwrap(), status);

        let stat = GlobalStat {
            download_speed: 10,
            num_active: 1,
            ..Default::default()
        };
        let value = serde_json::to_value(&stat).unwrap();
        assert_eq!(decode::<GlobalStat>("getGlobalStat", value).unwrap(), stat);
    }
}
