//! CLI definitions for Pull2Sheet.

use std::path::PathBuf;

use clap::{ArgGroup, Args, Parser, Subcommand};

/// Pull2Sheet CLI.
#[derive(Debug, Parser)]
#[command(name = "pull2sheet")]
#[command(about = "Extract structured fields from text or images into sheet rows")]
#[command(version)]
pub(crate) struct Cli {
    /// Configuration file path (defaults to ~/.pull2sheet/config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub(crate) enum Commands {
    /// Check whether the configured model can be used
    Check,

    /// Extract fields from text or an image into rows
    Extract(ExtractArgs),

    /// Describe sheet headers and print a template
    Analyze {
        /// Comma-separated header names
        #[arg(long)]
        headers: String,

        /// Comma-separated example values, one per header
        #[arg(long)]
        example: Option<String>,
    },

    /// Show or change the persisted panel settings
    Settings {
        /// Split selections into items by default
        #[arg(long, value_name = "BOOL")]
        batch_mode: Option<bool>,

        /// Describe the headers of loaded sheets with AI
        #[arg(long, value_name = "BOOL")]
        analyze_headers: Option<bool>,
    },
}

#[derive(Debug, Args)]
#[command(group(
    ArgGroup::new("input")
        .required(true)
        .args(["text", "stdin", "image_url"])
))]
#[command(group(
    ArgGroup::new("schema")
        .required(true)
        .multiple(true)
        .args(["template", "sheet"])
))]
pub(crate) struct ExtractArgs {
    /// Template JSON describing the fields
    #[arg(short, long)]
    pub template: Option<PathBuf>,

    /// Existing sheet JSON (as written by a previous run) to append to
    #[arg(long)]
    pub sheet: Option<PathBuf>,

    /// Read the selection from a file
    #[arg(long)]
    pub text: Option<PathBuf>,

    /// Read the selection from standard input
    #[arg(long)]
    pub stdin: bool,

    /// Extract from an image at this URL
    #[arg(long)]
    pub image_url: Option<String>,

    /// Split the selection into items, one row each
    #[arg(long)]
    pub batch: bool,

    /// Write rows as JSON to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Split a comma-separated list, trimming each entry.
pub(crate) fn split_list(raw: &str) -> Vec<String> {
    raw.split(',').map(|s| s.trim().to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_check() {
        let cli = Cli::try_parse_from(["pull2sheet", "-c", "p2s.toml", "check"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("p2s.toml")));
        assert!(matches!(cli.command, Commands::Check));
    }

    #[test]
    fn test_parse_extract_text() {
        let cli = Cli::try_parse_from([
            "pull2sheet", "extract", "--template", "t.json", "--text", "in.txt", "--batch",
        ])
        .unwrap();
        match cli.command {
            Commands::Extract(args) => {
                assert_eq!(args.template, Some(PathBuf::from("t.json")));
                assert_eq!(args.text, Some(PathBuf::from("in.txt")));
                assert!(args.sheet.is_none());
                assert!(!args.stdin);
                assert!(args.batch);
                assert!(args.output.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_extract_requires_template_or_sheet() {
        assert!(Cli::try_parse_from(["pull2sheet", "extract", "--stdin"]).is_err());
        assert!(Cli::try_parse_from([
            "pull2sheet", "extract", "--sheet", "rows.json", "--template", "t.json", "--stdin",
        ])
        .is_ok());
    }

    #[test]
    fn test_parse_settings() {
        let cli = Cli::try_parse_from(["pull2sheet", "settings", "--batch-mode", "true"]).unwrap();
        match cli.command {
            Commands::Settings { batch_mode, analyze_headers } => {
                assert_eq!(batch_mode, Some(true));
                assert_eq!(analyze_headers, None);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_extract_requires_one_input() {
        assert!(Cli::try_parse_from(["pull2sheet", "extract", "--template", "t.json"]).is_err());
        assert!(Cli::try_parse_from([
            "pull2sheet", "extract", "--template", "t.json", "--stdin", "--image-url", "http://x/a.png",
        ])
        .is_err());
    }

    #[test]
    fn test_split_list() {
        assert_eq!(split_list("Name, Price ,Date"), vec!["Name", "Price", "Date"]);
    }
}
