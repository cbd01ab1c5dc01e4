pub mod cli;
pub mod client;
pub mod commands;
pub mod config;
pub mod decode;
pub mod error;
pub mod format;
pub mod rpc;
pub mod types;

pub use client::Aria2Client;
pub use config::ClientConfig;
pub use error::{Error, Result};
pub use types::*;
