//! CLI command definitions and subcommands

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// rqm - rate-limited MusicBrainz edit submitter
#[derive(Parser)]
#[command(
    name = "rqm",
    about = "Submit MusicBrainz edits at a fixed rate, retrying failures first",
    version,
    after_help = "Logs are written to: ~/.local/share/requestmanager/logs/requestmanager.log"
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, help = "Path to config file")]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// CLI subcommands
#[derive(Subcommand)]
pub enum Command {
    /// Submit every edit of a batch file, in order
    Submit {
        /// YAML file with an `edits:` list
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Fetch an entity from the web service and print the raw response
    Lookup {
        /// Entity type (artist, work, ...)
        entity: String,

        /// Entity MBID
        mbid: String,

        /// Extra data to include, comma separated
        #[arg(long, value_delimiter = ',')]
        inc: Vec<String>,
    },

    /// Escape text for a search query
    Escape {
        /// Text to escape
        text: String,
    },

    /// List known work types
    WorkTypes,
}

/// Output format for submit results
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "plain" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(format!("Unknown format: {}. Use: text or json", s)),
        }
    }
}

/// Get the path to the log file
pub fn get_log_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("requestmanager")
        .join("logs")
        .join("requestmanager.log")
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_output_format_parse() {
        assert_eq!("json".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!("TEXT".parse::<OutputFormat>().unwrap(), OutputFormat::Text);
        assert!("table".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_parse_lookup_inc() {
        let cli = Cli::try_parse_from([
            "rqm",
            "lookup",
            "work",
            "b10bbbfc-cf9e-42e0-be17-e2c3e1d2600d",
            "--inc",
            "aliases,artist-rels",
        ])
        .unwrap();

        match cli.command {
            Some(Command::Lookup { inc, .. }) => assert_eq!(inc, vec!["aliases", "artist-rels"]),
            _ => panic!("expected lookup"),
        }
    }
}
