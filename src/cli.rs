//! Command-line surface

use crate::client::Aria2Client;
use crate::commands::{self, Control, ListScope};
use crate::config::ClientConfig;
use crate::rpc::Transport;
use crate::Result;
use clap::{Parser, Subcommand};
use std::time::Duration;

/// Control a running aria2 daemon over JSON-RPC.
#[derive(Parser, Debug)]
#[command(name = "aria2-remote")]
#[command(version)]
pub struct Cli {
    /// JSON-RPC endpoint of the daemon [env: ARIA2_RPC_URL]
    #[arg(short = 'u', long = "endpoint-url", global = true, value_name = "URL")]
    pub endpoint_url: Option<String>,

    /// RPC secret configured with --rpc-secret [env: ARIA2_RPC_SECRET]
    #[arg(long, global = true, value_name = "TOKEN")]
    pub secret: Option<String>,

    /// Request timeout in seconds [env: ARIA2_RPC_TIMEOUT]
    #[arg(long, global = true, value_name = "SECS")]
    pub timeout: Option<u64>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List downloads with a totals row
    List {
        /// Include waiting and paused downloads
        #[arg(long)]
        waiting: bool,
        /// Include stopped downloads
        #[arg(long)]
        stopped: bool,
    },

    /// Print global options, or set one with KEY VALUE
    Config {
        #[arg(num_args = 0..=2, value_name = "KEY VALUE")]
        args: Vec<String>,
    },

    /// Peer information for torrents (all active downloads by default)
    Peers { gids: Vec<String> },

    /// Queue URIs, one download per URI
    #[command(alias = "addU")]
    Add {
        #[arg(required = true)]
        uris: Vec<String>,
    },

    /// Queue .torrent files
    #[command(name = "addT")]
    AddTorrent {
        #[arg(required = true)]
        paths: Vec<String>,
    },

    /// Pause downloads
    Pause {
        #[arg(required = true)]
        gids: Vec<String>,
    },

    /// Pause downloads without waiting for tracker/peer shutdown
    #[command(name = "forcePause")]
    ForcePause {
        #[arg(required = true)]
        gids: Vec<String>,
    },

    /// Remove downloads
    Remove {
        #[arg(required = true)]
        gids: Vec<String>,
    },

    /// Remove downloads without waiting for tracker/peer shutdown
    #[command(name = "forceRemove")]
    ForceRemove {
        #[arg(required = true)]
        gids: Vec<String>,
    },

    /// Global transfer statistics
    Stat,

    /// Detailed status of one download
    Status { gid: String },

    /// RPC methods and notifications the daemon supports
    Methods,
}

impl Cli {
    /// Environment-derived configuration with command-line flags on top.
    pub fn config(&self) -> Result<ClientConfig> {
        let mut config = ClientConfig::from_env()?;
        if let Some(endpoint) = &self.endpoint_url {
            config = config.with_endpoint(endpoint)?;
        }
        if let Some(secret) = &self.secret {
            config.secret = Some(secret.clone());
        }
        if let Some(secs) = self.timeout {
            config.timeout = Duration::from_secs(secs);
        }
        config.validate()?;
        Ok(config)
    }
}

pub async fn run<T: Transport>(client: &Aria2Client<T>, command: &Command) -> Result<Vec<String>> {
    match command {
        Command::List { waiting, stopped } => {
            commands::list(
                client,
                ListScope {
                    waiting: *waiting,
                    stopped: *stopped,
                },
            )
            .await
        }
        Command::Config { args } => match args.as_slice() {
            [] => commands::show_config(client).await,
            [key, value] => commands::set_config(client, key, value).await,
            _ => Err(crate::Error::InvalidInput(
                "config requires either 0, or 2 arguments".into(),
            )),
        },
        Command::Peers { gids } => commands::peers(client, gids).await,
        Command::Add { uris } => commands::add_uris(client, uris).await,
        Command::AddTorrent { paths } => commands::add_torrent_files(client, paths).await,
        Command::Pause { gids } => commands::control(client, Control::Pause, gids).await,
        Command::ForcePause { gids } => commands::control(client, Control::ForcePause, gids).await,
        Command::Remove { gids } => commands::control(client, Control::Remove, gids).await,
        Command::ForceRemove { gids } => commands::control(client, Control::ForceRemove, gids).await,
        Command::Stat => commands::global_stat(client).await,
        Command::Status { gid } => commands::status(client, gid).await,
        Command::Methods => commands::methods(client).await,
    }
}
