//! CLI commands and argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Command-line client for the registry hub API
#[derive(Parser, Debug)]
#[command(name = "hubctl")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Hub host (overrides config and DOCKER_HUB_HOST)
    #[arg(long, global = true)]
    pub host: Option<String>,

    /// Maximum pages per list operation (0 = unlimited)
    #[arg(long, global = true)]
    pub max_pages: Option<u64>,

    /// Configuration file (YAML)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true, default_value = "pretty")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Log in and show the account in use
    Whoami,

    /// List the repositories of a namespace
    Repos {
        /// User or organization name
        namespace: String,
    },

    /// List the tags of a repository
    Tags {
        /// User or organization name
        namespace: String,

        /// Repository name
        repository: String,
    },

    /// List your personal access tokens
    Tokens,

    /// List the members of an organization
    Members {
        /// Organization name
        org: String,
    },

    /// List the members of a team
    Teams {
        /// Organization name
        org: String,

        /// Team name
        team: String,
    },
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Compact JSON, one document per line
    Json,
    /// Indented JSON
    Pretty,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_tags_with_globals() {
        let cli = Cli::parse_from([
            "hubctl",
            "tags",
            "alice",
            "app",
            "--max-pages",
            "0",
            "--host",
            "hub-stage.docker.com",
        ]);
        assert_eq!(cli.max_pages, Some(0));
        assert_eq!(cli.host.as_deref(), Some("hub-stage.docker.com"));
        assert!(matches!(
            cli.command,
            Commands::Tags { ref namespace, ref repository } if namespace == "alice" && repository == "app"
        ));
        assert_eq!(cli.format, OutputFormat::Pretty);
    }

    #[test]
    fn test_parse_json_format() {
        let cli = Cli::parse_from(["hubctl", "-f", "json", "tokens"]);
        assert_eq!(cli.format, OutputFormat::Json);
        assert!(matches!(cli.command, Commands::Tokens));
    }
}
