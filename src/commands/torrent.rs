use crate::client::Aria2Client;
use crate::format;
use crate::rpc::Transport;
use crate::{Error, Result};
use std::path::Path;

/// Validate a torrent file path: must end with .torrent and exist on disk.
fn validate_torrent_path(file_path: &str) -> Result<()> {
    if file_path.is_empty() {
        return Err(Error::InvalidInput("Torrent file path cannot be empty".into()));
    }
    if !file_path.to_lowercase().ends_with(".torrent") {
        return Err(Error::InvalidInput(format!(
            "File must have a .torrent extension: {}",
            file_path
        )));
    }
    if !Path::new(file_path).exists() {
        return Err(Error::InvalidInput(format!(
            "Torrent file does not exist: {}",
            file_path
        )));
    }
    Ok(())
}

pub async fn add_torrent_files<T: Transport>(
    client: &Aria2Client<T>,
    paths: &[String],
) -> Result<Vec<String>> {
    let mut gids = Vec::with_capacity(paths.len());
    for path in paths {
        let added = match validate_torrent_path(path) {
            Ok(()) => client.add_torrent_file(Path::new(path)).await,
            Err(e) => Err(e),
        };
        match added {
            Ok(gid) => {
                log::info!("Added torrent from file: {} with GID: {}", path, gid);
                gids.push(gid.into_inner());
            }
            Err(e) => {
                log::warn!("Failed to add torrent {}: {}", path, e);
                return Err(Error::interrupted(gids, e));
            }
        }
    }
    Ok(gids)
}

/// Peer tables for the given downloads, or for every active download when
/// `gids` is empty. Downloads without peers print nothing.
pub async fn peers<T: Transport>(client: &Aria2Client<T>, gids: &[String]) -> Result<Vec<String>> {
    let gids: Vec<String> = if gids.is_empty() {
        client
            .tell_active(&["gid"])
            .await?
            .into_iter()
            .map(|s| s.gid.into_inner())
            .collect()
    } else {
        gids.to_vec()
    };

    let mut lines = Vec::new();
    for gid in &gids {
        let peers = client.get_peers(gid).await?;
        if peers.is_empty() {
            continue;
        }
        lines.push(gid.clone());
        lines.push("-".repeat(44));
        lines.extend(peers.iter().map(format::render_peer));
        lines.push(String::new());
    }
    Ok(lines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rpc::tests::ScriptedTransport;
    use serde_json::json;

    fn peer_json(ip: &str, bitfield: &str) -> serde_json::Value {
        json!({
            "peerId": "-AR1250-", "ip": ip, "port": "6881",
            "bitfield": bitfield,
            "amChoking": "true", "peerChoking": "false",
            "downloadSpeed": "2000", "uploadSpeed": "0", "seeder": "false"
        })
    }

    #[tokio::test]
    async fn test_peers_for_active_downloads() {
        let client = Aria2Client::with_transport(
            ScriptedTransport::default()
                .reply_result(json!([{"gid": "aaaa000000000000"}, {"gid": "bbbb000000000000"}]))
                .reply_result(json!([peer_json("203.0.113.9", "ff0f")]))
                .reply_result(json!([])),
            None,
        );
        let lines = peers(&client, &[]).await.unwrap();

        let sent = client.gateway().transport().sent();
        assert_eq!(sent[0].params, vec![json!(["gid"])]);
        assert_eq!(sent[1].params, vec![json!("aaaa000000000000")]);

        assert_eq!(lines[0], "aaaa000000000000");
        assert!(lines[2].contains("203.0.113.9: 6881"));
        assert!(lines[2].ends_with("75.0%"));
        assert_eq!(lines.len(), 4);
    }

    #[tokio::test]
    async fn test_peer_with_empty_bitfield() {
        let client = Aria2Client::with_transport(
            ScriptedTransport::default().reply_result(json!([peer_json("198.51.100.1", "")])),
            None,
        );
        let lines = peers(&client, &["aaaa000000000000".to_string()]).await.unwrap();
        assert!(lines[2].ends_with(" -"));
    }

    #[tokio::test]
    async fn test_bad_path_after_upload_keeps_gid() {
        let mut file = tempfile::Builder::new().suffix(".torrent").tempfile().unwrap();
        std::io::Write::write_all(&mut file, b"d8:announce3:urle").unwrap();
        let good = file.path().to_string_lossy().into_owned();

        let client = Aria2Client::with_transport(
            ScriptedTransport::default().reply_result(json!("aaaa000000000000")),
            None,
        );
        let err = add_torrent_files(&client, &[good, "missing.torrent".to_string()])
            .await
            .unwrap_err();
        assert_eq!(err.completed(), ["aaaa000000000000".to_string()]);
        assert!(
            matches!(err, Error::Interrupted { ref source, .. } if matches!(**source, Error::InvalidInput(_)))
        );
        assert_eq!(client.gateway().transport().sent().len(), 1);
    }

    #[tokio::test]
    async fn test_rejects_non_torrent_path() {
        let client = Aria2Client::with_transport(ScriptedTransport::default(), None);
        let err = add_torrent_files(&client, &["notes.txt".to_string()])
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
        assert!(client.gateway().transport().sent().is_empty());
    }
}
