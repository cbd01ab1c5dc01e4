//! Presentation helpers
//!
//! Pure functions over decoded records. Nothing here talks to the daemon or
//! returns an error.

use crate::types::{BtPeer, DownloadStatus, Status};

const UNITS: [&str; 7] = ["B", "k", "M", "G", "T", "P", "E"];
const BASE: u64 = 1000;

/// Human-readable byte count using base-1000 units.
///
/// Zero renders as `" -"` so idle columns stay quiet; counts that stay in
/// the byte unit are exact integers, larger ones get one decimal.
pub fn humanize_bytes(bytes: u64) -> String {
    if bytes == 0 {
        return " -".to_string();
    }

    let mut exponent = 0;
    let mut rest = bytes;
    while rest >= BASE && exponent < UNITS.len() - 1 {
        rest /= BASE;
        exponent += 1;
    }
    if exponent == 0 {
        return format!("{}B", bytes);
    }

    let scaled = bytes as f64 / (BASE as f64).powi(exponent as i32);
    // Round half up at the tenths place.
    let rounded = (scaled * 10.0 + 0.5).floor() / 10.0;
    format!("{:.1}{}", rounded, UNITS[exponent])
}

/// `"-"` when the total is unknown, `"done"` when complete, else `"x.y%"`.
pub fn to_percentage(done: u64, total: u64) -> String {
    if total == 0 {
        return "-".to_string();
    }
    if done == total {
        return "done".to_string();
    }
    format!("{:.1}%", 100.0 * done as f64 / total as f64)
}

/// Progress of a download. While a hash check runs, aria2 reports progress
/// through `verifiedLength`, so that takes precedence.
pub fn download_progress(status: &DownloadStatus) -> String {
    let done = if status.verified_length > 0 {
        status.verified_length
    } else {
        status.completed_length
    };
    to_percentage(done, status.total_length)
}

/// One-letter state code for the list view.
///
/// `q` queued for a hash check, `k` checking, otherwise the first letter of
/// the daemon's status word. `?` if the status key was not requested.
pub fn status_label(status: &DownloadStatus) -> char {
    if status.verify_integrity_pending {
        return 'q';
    }
    if status.verified_length > 0 {
        return 'k';
    }
    match status.status {
        Some(Status::Active) => 'a',
        Some(Status::Waiting) => 'w',
        Some(Status::Paused) => 'p',
        Some(Status::Error) => 'e',
        Some(Status::Complete) => 'c',
        Some(Status::Removed) => 'r',
        None => '?',
    }
}

/// Torrent name when known, `"n/a"` otherwise.
pub fn display_name(status: &DownloadStatus) -> &str {
    status
        .bittorrent
        .as_ref()
        .and_then(|bt| bt.name())
        .unwrap_or("n/a")
}

/// Pieces a peer has, out of an upper bound of `8 * bitfield bytes`.
///
/// The upper bound is never corrected against the torrent's real piece count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PieceCompletion {
    pub completed: u64,
    pub total: u64,
}

impl PieceCompletion {
    pub fn from_bitfield(bitfield: &[u8]) -> Self {
        let completed = bitfield.iter().map(|b| u64::from(b.count_ones())).sum();
        Self {
            completed,
            total: 8 * bitfield.len() as u64,
        }
    }

    /// `None` for an empty bitfield.
    pub fn ratio(&self) -> Option<f64> {
        if self.total == 0 {
            None
        } else {
            Some(self.completed as f64 / self.total as f64)
        }
    }
}

impl BtPeer {
    pub fn pieces_completed_total(&self) -> PieceCompletion {
        PieceCompletion::from_bitfield(&self.bitfield)
    }
}

/// Totals over a list response. An empty list sums to zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueueSummary {
    pub count: usize,
    pub completed_length: u64,
    pub total_length: u64,
    pub download_speed: u64,
    pub upload_speed: u64,
}

impl QueueSummary {
    pub fn from_statuses(statuses: &[DownloadStatus]) -> Self {
        statuses.iter().fold(
            QueueSummary {
                count: statuses.len(),
                ..Default::default()
            },
            |acc, s| QueueSummary {
                completed_length: acc.completed_length.saturating_add(s.completed_length),
                total_length: acc.total_length.saturating_add(s.total_length),
                download_speed: acc.download_speed.saturating_add(s.download_speed),
                upload_speed: acc.upload_speed.saturating_add(s.upload_speed),
                ..acc
            },
        )
    }
}

#[allow(clippy::too_many_arguments)]
fn list_line(
    key: &str,
    name: &str,
    progress: &str,
    label: &str,
    completed: u64,
    total: u64,
    down: u64,
    up: u64,
) -> String {
    format!(
        "{:>4}  {:>20}  {:>5}  {:>1}  {:>6}  {:>6}  {:>6}  {:>6}",
        key,
        name,
        progress,
        label,
        humanize_bytes(completed),
        humanize_bytes(total),
        humanize_bytes(down),
        humanize_bytes(up)
    )
}

/// The `list` table: a totals row, a blank line, then one row per download.
pub fn render_list(statuses: &[DownloadStatus]) -> Vec<String> {
    let summary = QueueSummary::from_statuses(statuses);
    let mut lines = Vec::with_capacity(statuses.len() + 2);
    lines.push(list_line(
        "",
        &format!("total ({})", summary.count),
        "",
        "",
        summary.completed_length,
        summary.total_length,
        summary.download_speed,
        summary.upload_speed,
    ));
    lines.push(String::new());

    for status in statuses {
        lines.push(list_line(
            status.gid.short(4),
            display_name(status),
            &download_progress(status),
            &status_label(status).to_string(),
            status.completed_length,
            status.total_length,
            status.download_speed,
            status.upload_speed,
        ));
    }
    lines
}

/// One row of the `peers` table: `ip:port  down  up  pct%`.
pub fn render_peer(peer: &BtPeer) -> String {
    let pct = match peer.pieces_completed_total().ratio() {
        Some(r) => format!("{:.1}%", 100.0 * r),
        None => "-".to_string(),
    };
    format!(
        "{:>15}:{:>5}  {:>6}  {:>6}  {}",
        peer.ip,
        peer.port,
        humanize_bytes(peer.download_speed),
        humanize_bytes(peer.upload_speed),
        pct
    )
}
