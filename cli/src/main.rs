use std::io;
use std::time::Duration;

use anyhow::Result;
use board_cli::commands::{self, Command};
use board_cli::transport::UreqTransport;
use board_core::{ApiClient, Synchronizer};
use clap::Parser;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "board", version, about = "Browse and edit posts, albums, todos, and users")]
struct Cli {
    #[arg(
        long,
        env = "BOARD_BASE_URL",
        default_value = "https://jsonplaceholder.typicode.com"
    )]
    base_url: String,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 30)]
    timeout: u64,

    #[command(subcommand)]
    command: Command,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let transport = UreqTransport::new(Duration::from_secs(cli.timeout));
    let mut sync = Synchronizer::new(ApiClient::new(&cli.base_url), transport);

    let mut out = io::stdout().lock();
    commands::run(cli.command, &mut sync, &mut out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_repeated_toggles() {
        let cli = Cli::try_parse_from([
            "board", "todos", "--filter", "pending", "--toggle", "3", "--toggle", "5",
        ])
        .unwrap();
        match cli.command {
            Command::Todos(args) => {
                assert_eq!(args.toggles, vec![3, 5]);
                assert_eq!(args.filter, board_core::TodoFilter::Pending);
            }
            _ => panic!("expected todos"),
        }
    }

    #[test]
    fn rejects_unknown_filter() {
        assert!(Cli::try_parse_from(["board", "todos", "--filter", "done"]).is_err());
    }
}
