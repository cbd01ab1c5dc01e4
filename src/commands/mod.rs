//! One function per CLI command. Each returns the lines to print; the first
//! client error ends the command.

mod download;
mod settings;
mod system;
mod torrent;

pub use download::*;
pub use settings::*;
pub use system::*;
pub use torrent::*;
