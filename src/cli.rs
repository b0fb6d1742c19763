use std::path::PathBuf;

use clap::Parser;

use crate::download::format::FormatChoice;

/// Interactive downloader
#[derive(Parser, Debug)]
#[command(name = "ytgrab")]
#[command(author, version, about = "Interactive YouTube downloader helper", long_about = None)]
pub struct Cli {
    /// Optional URLs to skip the interactive prompt
    pub urls: Vec<String>,

    /// Only list formats for a URL
    #[arg(long)]
    pub list_formats: bool,

    /// Output directory override
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Concurrent downloads (1-5)
    #[arg(long)]
    pub workers: Option<usize>,

    /// Skip the format prompt
    #[arg(long, value_enum)]
    pub format_choice: Option<FormatChoice>,

    /// Log progress details to the terminal
    #[arg(short, long)]
    pub verbose: bool,
}

/// Telegram bot
#[derive(Parser, Debug)]
#[command(name = "ytgrab-bot")]
#[command(author, version, about = "Telegram bot that downloads YouTube links as MP4 or MP3", long_about = None)]
pub struct BotCli {
    /// Load environment variables from this file instead of `.env`
    #[arg(long)]
    pub env_file: Option<PathBuf>,
}

/// Partial-download cleanup
#[derive(Parser, Debug)]
#[command(name = "cleanup-downloads")]
#[command(author, version, about = "Clean up incomplete downloads produced by yt-dlp", long_about = None)]
pub struct CleanupCli {
    /// Folder to scan
    #[arg(long, default_value = "downloads")]
    pub path: PathBuf,

    /// List files without deleting
    #[arg(long)]
    pub dry_run: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definitions_are_valid() {
        Cli::command().debug_assert();
        BotCli::command().debug_assert();
        CleanupCli::command().debug_assert();
    }

    #[test]
    fn test_cli_parses_flags() {
        let cli = Cli::parse_from([
            "ytgrab",
            "https://youtu.be/a",
            "https://youtu.be/b",
            "--workers",
            "4",
            "--format-choice",
            "mp3",
            "--output",
            "/tmp/out",
        ]);
        assert_eq!(cli.urls.len(), 2);
        assert_eq!(cli.workers, Some(4));
        assert_eq!(cli.format_choice, Some(FormatChoice::Mp3));
        assert_eq!(cli.output, Some(PathBuf::from("/tmp/out")));
        assert!(!cli.list_formats);
    }

    #[test]
    fn test_cli_rejects_unknown_format() {
        assert!(Cli::try_parse_from(["ytgrab", "--format-choice", "flac"]).is_err());
    }

    #[test]
    fn test_cleanup_defaults() {
        let cli = CleanupCli::parse_from(["cleanup-downloads"]);
        assert_eq!(cli.path, PathBuf::from("downloads"));
        assert!(!cli.dry_run);

        let cli = CleanupCli::parse_from(["cleanup-downloads", "--path", "/srv/dl", "--dry-run"]);
        assert_eq!(cli.path, PathBuf::from("/srv/dl"));
        assert!(cli.dry_run);
    }
}
