use anyhow::Result;
use clap::Parser;
use simplelog::LevelFilter;

use ytgrab::cleanup::cleanup;
use ytgrab::cli::CleanupCli;
use ytgrab::core::init_logger;

/// Removes incomplete yt-dlp artifacts from a downloads folder
fn main() -> Result<()> {
    let cli = CleanupCli::parse();
    init_logger(LevelFilter::Warn, None)?;

    let folder = cli.path;
    let report = cleanup(&folder, cli.dry_run)?;

    if !report.root_exists {
        println!("Folder {} does not exist; nothing to clean.", folder.display());
        return Ok(());
    }
    if report.files.is_empty() {
        println!("No partial files found.");
        return Ok(());
    }

    for path in &report.files {
        if report.dry_run {
            println!("Would delete: {}", path.display());
        } else {
            println!("Deleted: {}", path.display());
        }
    }

    if report.dry_run {
        println!("\nWould remove {} file(s).", report.files.len());
    } else {
        println!("\nRemoved {} file(s).", report.removed);
    }
    Ok(())
}
