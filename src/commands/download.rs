use crate::client::Aria2Client;
use crate::format;
use crate::rpc::Transport;
use crate::types::{DownloadStatus, Gid};
use crate::{Error, Result};

/// Page size used when listing waiting and stopped downloads.
pub const LIST_PAGE_SIZE: u64 = 1000;

/// Which queues `list` shows besides the active one.
#[derive(Debug, Clone, Copy, Default)]
pub struct ListScope {
    pub waiting: bool,
    pub stopped: bool,
}

pub async fn list<T: Transport>(client: &Aria2Client<T>, scope: ListScope) -> Result<Vec<String>> {
    let mut statuses: Vec<DownloadStatus> = client.tell_active(&[]).await?;
    if scope.waiting {
        statuses.extend(client.tell_waiting(0, LIST_PAGE_SIZE, &[]).await?);
    }
    if scope.stopped {
        statuses.extend(client.tell_stopped(0, LIST_PAGE_SIZE, &[]).await?);
    }
    Ok(format::render_list(&statuses))
}

/// Queue each URI as its own download. On failure the GIDs already queued
/// travel with the error.
pub async fn add_uris<T: Transport>(client: &Aria2Client<T>, uris: &[String]) -> Result<Vec<String>> {
    let mut gids = Vec::with_capacity(uris.len());
    for uri in uris {
        match client.add_uri(uri).await {
            Ok(gid) => gids.push(gid.into_inner()),
            Err(e) => {
                log::warn!("Failed to add {}: {}", uri, e);
                return Err(Error::interrupted(gids, e));
            }
        }
    }
    Ok(gids)
}

/// Mutations the CLI exposes for a list of GIDs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Pause,
    ForcePause,
    Remove,
    ForceRemove,
}

impl Control {
    pub fn name(&self) -> &'static str {
        match self {
            Control::Pause => "pause",
            Control::ForcePause => "forcePause",
            Control::Remove => "remove",
            Control::ForceRemove => "forceRemove",
        }
    }
}

pub async fn control<T: Transport>(
    client: &Aria2Client<T>,
    action: Control,
    gids: &[String],
) -> Result<Vec<String>> {
    let mut done = Vec::with_capacity(gids.len());
    for gid in gids {
        let result: Result<Gid> = match action {
            Control::Pause => client.pause(gid).await,
            Control::ForcePause => client.force_pause(gid).await,
            Control::Remove => client.remove(gid).await,
            Control::ForceRemove => client.force_remove(gid).await,
        };
        match result {
            Ok(confirmed) => done.push(confirmed.into_inner()),
            Err(e) => {
                log::warn!("{} {} failed: {}", action.name(), gid, e);
                return Err(Error::interrupted(done, e));
            }
        }
    }
    Ok(done)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rpc::tests::ScriptedTransport;
    use serde_json::json;

    #[tokio::test]
    async fn test_list_active_only() {
        let client = Aria2Client::with_transport(
            ScriptedTransport::default().reply_result(json!([
                {"gid": "2089b05ecca3d829", "status": "active",
                 "totalLength": "1000", "completedLength": "250",
                 "downloadSpeed": "0", "uploadSpeed": "0"}
            ])),
            None,
        );
        let lines = list(&client, ListScope::default()).await.unwrap();
        assert_eq!(lines.len(), 3);
        assert!(lines[2].contains("25.0%"));
        assert_eq!(client.gateway().transport().sent().len(), 1);
    }

    #[tokio::test]
    async fn test_list_all_queues() {
        let client = Aria2Client::with_transport(
            ScriptedTransport::default()
                .reply_result(json!([]))
                .reply_result(json!([{"gid": "aaaa0000", "status": "paused"}]))
                .reply_result(json!([{"gid": "bbbb0000", "status": "complete"}])),
            None,
        );
        let lines = list(
            &client,
            ListScope {
                waiting: true,
                stopped: true,
            },
        )
        .await
        .unwrap();
        assert!(lines[0].contains("total (2)"));
        let methods: Vec<String> = client
            .gateway()
            .transport()
            .sent()
            .into_iter()
            .map(|r| r.method)
            .collect();
        assert_eq!(
            methods,
            vec!["aria2.tellActive", "aria2.tellWaiting", "aria2.tellStopped"]
        );
    }

    #[tokio::test]
    async fn test_control_stops_at_first_failure() {
        let client = Aria2Client::with_transport(
            ScriptedTransport::default()
                .reply_result(json!("aaaa000000000000"))
                .reply_result(json!("ffff000000000000")),
            None,
        );
        let gids = vec![
            "aaaa000000000000".to_string(),
            "bbbb000000000000".to_string(),
            "cccc000000000000".to_string(),
        ];
        let err = control(&client, Control::Pause, &gids).await.unwrap_err();
        assert_eq!(err.completed(), ["aaaa000000000000".to_string()]);
        assert!(
            matches!(err, Error::Interrupted { ref source, .. } if matches!(**source, Error::ProtocolMismatch { .. }))
        );
        assert_eq!(client.gateway().transport().sent().len(), 2);
    }

    #[tokio::test]
    async fn test_control_first_item_failure_is_plain() {
        let client = Aria2Client::with_transport(
            ScriptedTransport::default().reply_error(1, "GID aaaa000000000000 is not found"),
            None,
        );
        let err = control(&client, Control::Remove, &["aaaa000000000000".to_string()])
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Remote { code: 1, .. }));
        assert!(err.completed().is_empty());
    }

    #[tokio::test]
    async fn test_add_uris_reports_queued_gids_on_failure() {
        let client = Aria2Client::with_transport(
            ScriptedTransport::default()
                .reply_result(json!("aaaa000000000000"))
                .reply_error(1, "bad uri"),
            None,
        );
        let err = add_uris(
            &client,
            &["http://a.example/x".to_string(), "http://b.example/y".to_string()],
        )
        .await
        .unwrap_err();
        assert_eq!(err.completed(), ["aaaa000000000000".to_string()]);
        assert_eq!(err.to_string(), "aria2: bad uri");
        assert_eq!(client.gateway().transport().sent().len(), 2);
    }

    #[tokio::test]
    async fn test_add_uris_returns_gids() {
        let client = Aria2Client::with_transport(
            ScriptedTransport::default()
                .reply_result(json!("aaaa000000000000"))
                .reply_result(json!("bbbb000000000000")),
            None,
        );
        let gids = add_uris(
            &client,
            &["http://a.example/x".to_string(), "http://b.example/y".to_string()],
        )
        .await
        .unwrap();
        assert_eq!(gids, vec!["aaaa000000000000", "bbbb000000000000"]);
    }
}
