//! Command-line interface for the rehearsal room

use clap::Parser;
use rehearsal_room::Overrides;
use std::path::PathBuf;

/// Rehearse difficult conversations and get simulated feedback
#[derive(Parser, Debug, Clone)]
#[command(name = "rehearse")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file (defaults to the user config directory)
    #[arg(short, long, env = "REHEARSE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Initial AI mood: calm, assertive, friendly or professional
    #[arg(short, long)]
    pub mood: Option<String>,

    /// Delay before the simulated reply, in milliseconds
    #[arg(long)]
    pub delay_ms: Option<u64>,

    /// Let replies that were pending during a scenario reset still land
    #[arg(long)]
    pub keep_stale_replies: bool,

    /// Write logs to this file
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    pub fn overrides(&self) -> Overrides {
        Overrides {
            mood: self.mood.clone(),
            delay_ms: self.delay_ms,
            keep_stale_replies: self.keep_stale_replies,
            log_file: self.log_file.clone(),
            verbose: self.verbose,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_defaults() {
        let cli = Cli::try_parse_from(["rehearse"]).unwrap();
        assert!(cli.mood.is_none());
        assert!(!cli.keep_stale_replies);
        assert!(!cli.verbose);
    }

    #[test]
    fn test_parse_overrides() {
        let cli = Cli::try_parse_from([
            "rehearse",
            "--mood",
            "friendly",
            "--delay-ms",
            "250",
            "--keep-stale-replies",
            "-v",
        ])
        .unwrap();
        let overrides = cli.overrides();
        assert_eq!(overrides.mood.as_deref(), Some("friendly"));
        assert_eq!(overrides.delay_ms, Some(250));
        assert!(overrides.keep_stale_replies);
        assert!(overrides.verbose);
    }
}
