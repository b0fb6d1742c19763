use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use crossterm::style::Stylize;
use dotenvy::dotenv;
use simplelog::LevelFilter;
use tokio::signal;
use tokio_util::sync::CancellationToken;

use ytgrab::cli::Cli;
use ytgrab::core::process::is_tool_available;
use ytgrab::core::validation::validate;
use ytgrab::core::{init_logger, AppError, DownloaderConfig};
use ytgrab::download::formats::render_format_table;
use ytgrab::download::progress::ConsoleProgress;
use ytgrab::download::source::Extractor;
use ytgrab::download::{summarize, JobRunner, Orchestrator, YtDlpExtractor};
use ytgrab::interactive::{ask_cancellable, until_cancelled, Prompter};

/// Entry point for the interactive downloader
///
/// Exits with status 1 when the user interrupts the run, at any point.
fn main() -> ExitCode {
    let cli = Cli::parse();

    // Load environment variables from .env if present
    let _ = dotenv();
    let config = DownloaderConfig::from_env();

    let console_level = if cli.verbose { LevelFilter::Info } else { LevelFilter::Warn };
    if let Err(e) = init_logger(console_level, config.log_file.as_deref()) {
        eprintln!("Failed to initialize logging: {}", e);
    }

    let runtime = match tokio::runtime::Builder::new_multi_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("Failed to start the async runtime: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let code = runtime.block_on(async {
        match run(cli, config).await {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) if matches!(e.downcast_ref::<AppError>(), Some(AppError::Cancelled)) => {
                println!("\nCancelled by user.");
                ExitCode::from(1)
            }
            Err(e) => {
                log::error!("{:#}", e);
                eprintln!("{}", format!("Error: {:#}", e).red());
                ExitCode::FAILURE
            }
        }
    });

    // A cancelled prompt is still parked on stdin; don't wait for it
    runtime.shutdown_background();
    code
}

async fn run(cli: Cli, config: DownloaderConfig) -> Result<()> {
    let cancel = CancellationToken::new();
    let ctrl_c_token = cancel.clone();
    tokio::spawn(async move {
        if signal::ctrl_c().await.is_ok() {
            ctrl_c_token.cancel();
        }
    });

    if !is_tool_available(&config.ffmpeg_bin, "-version").await {
        log::warn!("ffmpeg ('{}') not found", config.ffmpeg_bin);
        println!(
            "{}",
            "Warning: FFmpeg not found on PATH. yt-dlp will still run but muxing may fail."
                .yellow()
                .bold()
        );
    }

    let extractor = Arc::new(YtDlpExtractor::new(config.ytdl_bin.clone()));
    let positional = cli.urls.clone();

    if cli.list_formats {
        let Some(url) = ask_cancellable(&cancel, move || Prompter::stdio().inspect_url(&positional)).await? else {
            println!("No URL provided.");
            return Ok(());
        };
        let info = until_cancelled(&cancel, extractor.probe(&url)).await?;
        println!("\n{}", render_format_table(&info));
        return Ok(());
    }

    let urls = ask_cancellable(&cancel, move || Prompter::stdio().resolve_urls(&positional)).await?;
    let (urls, skipped) = validate(&urls);
    if !skipped.is_empty() {
        println!("{}", "Skipping non-YouTube URLs:".yellow().bold());
        for item in &skipped {
            println!("  - {}", item);
        }
    }
    if urls.is_empty() {
        println!("No valid URLs provided. Exiting.");
        return Ok(());
    }

    let preset_format = cli.format_choice;
    let format = ask_cancellable(&cancel, move || Prompter::stdio().format_choice(preset_format)).await?;
    let (preset_output, default_output) = (cli.output, config.download_folder.clone());
    let output_dir =
        ask_cancellable(&cancel, move || Prompter::stdio().output_dir(preset_output, &default_output)).await?;
    let (job_count, preset_workers) = (urls.len(), cli.workers);
    let workers = ask_cancellable(&cancel, move || Prompter::stdio().workers(job_count, preset_workers)).await?;

    println!(
        "\nStarting session with {} job(s), workers={}, format={}.\n",
        urls.len(),
        workers,
        format
    );

    let runner = JobRunner::new(extractor, Arc::new(ConsoleProgress));
    let orchestrator = Orchestrator::new(runner);
    let results = orchestrator
        .run_all(&urls, format, &output_dir, workers, &cancel)
        .await?;

    println!();
    print!("{}", summarize(&results).to_colored_string());
    Ok(())
}
