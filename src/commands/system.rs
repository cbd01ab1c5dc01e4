use crate::client::Aria2Client;
use crate::format::{download_progress, humanize_bytes};
use crate::rpc::Transport;
use crate::Result;

pub async fn global_stat<T: Transport>(client: &Aria2Client<T>) -> Result<Vec<String>> {
    let stat = client.get_global_stat().await?;
    Ok(vec![
        format!("download  {:>6}/s", humanize_bytes(stat.download_speed)),
        format!("upload    {:>6}/s", humanize_bytes(stat.upload_speed)),
        format!(
            "active {}  waiting {}  stopped {} ({} total)",
            stat.num_active, stat.num_waiting, stat.num_stopped, stat.num_stopped_total
        ),
    ])
}

/// Detail view of one download, including files and torrent metadata.
pub async fn status<T: Transport>(client: &Aria2Client<T>, gid: &str) -> Result<Vec<String>> {
    let s = client.tell_status(gid, &[]).await?;
    let mut lines = vec![
        format!("gid       {}", s.gid),
        format!(
            "status    {}",
            s.status.map(|st| st.as_str()).unwrap_or("unknown")
        ),
        format!(
            "progress  {} ({} / {})",
            download_progress(&s),
            humanize_bytes(s.completed_length),
            humanize_bytes(s.total_length)
        ),
        format!(
            "speed     {} down, {} up",
            humanize_bytes(s.download_speed),
            humanize_bytes(s.upload_speed)
        ),
        format!("dir       {}", s.dir),
    ];
    if let Some(message) = &s.error_message {
        lines.push(format!(
            "error     [{}] {}",
            s.error_code.as_deref().unwrap_or("?"),
            message
        ));
    }
    if let Some(bt) = &s.bittorrent {
        lines.push(format!("torrent   {}", bt.name().unwrap_or("n/a")));
        if let Some(hash) = &s.info_hash {
            lines.push(format!("infohash  {}", hash));
        }
        if let Some(comment) = &bt.comment {
            lines.push(format!("comment   {}", comment));
        }
        if let Some(created) = bt.created_at() {
            lines.push(format!("created   {}", created.format("%Y-%m-%d %H:%M:%S UTC")));
        }
    }
    for file in &s.files {
        lines.push(format!(
            "{:>3} {} {:>6} / {:>6}  {}",
            file.index,
            if file.selected { '*' } else { ' ' },
            humanize_bytes(file.completed_length),
            humanize_bytes(file.length),
            file.path
        ));
    }
    Ok(lines)
}

pub async fn methods<T: Transport>(client: &Aria2Client<T>) -> Result<Vec<String>> {
    let mut lines = client.list_methods().await?;
    lines.extend(client.list_notifications().await?);
    Ok(lines)
}
