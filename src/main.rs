use aria2_remote::cli::{self, Cli};
use aria2_remote::{Aria2Client, Result};
use clap::Parser;

async fn execute(cli: &Cli) -> Result<Vec<String>> {
    let config = cli.config()?;
    let client = Aria2Client::connect(&config)?;
    cli::run(&client, &cli.command).await
}

#[tokio::main]
async fn main() {
    env_logger::init();

    let cli = Cli::parse();

    match execute(&cli).await {
        Ok(lines) => {
            for line in lines {
                println!("{}", line);
            }
        }
        Err(e) => {
            for gid in e.completed() {
                println!("{}", gid);
            }
            log::error!("Command failed: {}", e);
            eprintln!("{}", e);
            std::process::exit(1);
        }
    }
}
