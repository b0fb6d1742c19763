//! ytgrab - thin front-ends over yt-dlp
//!
//! An interactive batch downloader, a Telegram bot and a cleanup tool, all
//! sharing the same job pipeline: classify a URL, build a job descriptor,
//! run it through the extractor and report the outcome.
//!
//! # Module Structure
//!
//! - `core`: configuration, errors, logging, validation and helpers
//! - `download`: classification, job building, extraction and batching
//! - `telegram`: bot commands, format keyboard and file delivery
//! - `cleanup`: removal of incomplete download artifacts
//! - `interactive`: terminal prompts for the CLI
//! - `cli`: command-line argument definitions

pub mod cleanup;
pub mod cli;
pub mod core;
pub mod download;
pub mod interactive;
pub mod telegram;

// Re-export commonly used types for convenience
pub use crate::core::{config, AppError, AppResult};
pub use crate::download::{classify, summarize, Classification, FormatChoice, JobOutcome, JobResult, JobRunner, Orchestrator};
