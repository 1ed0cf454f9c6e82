//! CLI parser.

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "screentime")]
#[command(about = "Screen-time tracking Telegram bot", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Run the bot until Ctrl-C (config from env; token can override BOT_TOKEN).
    Run {
        #[arg(short, long)]
        token: Option<String>,
    },
    /// Open the operator console; the bot starts stopped.
    Dashboard {
        #[arg(short, long)]
        token: Option<String>,
    },
    /// Print the usage table once and exit.
    Table,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_subcommands() {
        let cli = Cli::parse_from(["screentime", "run", "--token", "abc"]);
        assert_eq!(cli.command, Commands::Run { token: Some("abc".into()) });

        let cli = Cli::parse_from(["screentime", "dashboard"]);
        assert_eq!(cli.command, Commands::Dashboard { token: None });

        let cli = Cli::parse_from(["screentime", "table"]);
        assert_eq!(cli.command, Commands::Table);
    }
}
