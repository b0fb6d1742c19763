//! Download-and-deliver flow behind a format button.
//!
//! The flow talks to the chat only through [`ChatReply`], so it can be driven
//! without Telegram. Every produced file is deleted once it has been handled,
//! and the per-request scratch directory is removed when the request ends.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use teloxide::prelude::*;
use tokio::sync::{Semaphore, TryAcquireError};
use teloxide::types::{InputFile, MessageId};

use crate::core::config::BYTES_PER_MB;
use crate::core::error::AppError;
use crate::core::utils::whole_megabytes;
use crate::download::format::FormatChoice;
use crate::download::runner::{JobOutcome, JobRunner};

/// Label used for the bot's progress lines
pub const BOT_JOB_LABEL: &str = "Bot";

/// Status shown while a request waits for a free job slot
pub const QUEUED_TEXT: &str = "Queued…";

/// Status shown while a job downloads
pub fn downloading_message(format: FormatChoice) -> String {
    format!("Downloading {}…", format)
}

/// Operations the delivery flow needs from a chat
#[async_trait]
pub trait ChatReply: Send + Sync {
    /// Replace the text of the status message
    async fn status(&self, text: &str) -> Result<(), AppError>;
    async fn send_audio(&self, path: &Path) -> Result<(), AppError>;
    async fn send_video(&self, path: &Path) -> Result<(), AppError>;
    /// Remove the status message
    async fn clear_status(&self) -> Result<(), AppError>;
}

/// [`ChatReply`] backed by a Telegram chat and its status message
pub struct TelegramReply {
    bot: Bot,
    chat_id: ChatId,
    status_message: MessageId,
}

impl TelegramReply {
    /// Posts the initial status text and binds to that message.
    pub async fn start(bot: Bot, chat_id: ChatId, text: &str) -> Result<Self, AppError> {
        let message = bot.send_message(chat_id, text).await?;
        Ok(Self {
            bot,
            chat_id,
            status_message: message.id,
        })
    }
}

#[async_trait]
impl ChatReply for TelegramReply {
    async fn status(&self, text: &str) -> Result<(), AppError> {
        self.bot
            .edit_message_text(self.chat_id, self.status_message, text)
            .await?;
        Ok(())
    }

    async fn send_audio(&self, path: &Path) -> Result<(), AppError> {
        self.bot.send_audio(self.chat_id, InputFile::file(path)).await?;
        Ok(())
    }

    async fn send_video(&self, path: &Path) -> Result<(), AppError> {
        self.bot.send_video(self.chat_id, InputFile::file(path)).await?;
        Ok(())
    }

    async fn clear_status(&self) -> Result<(), AppError> {
        self.bot.delete_message(self.chat_id, self.status_message).await?;
        Ok(())
    }
}

/// What happened to the files of one request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeliveryReport {
    pub sent: Vec<PathBuf>,
    pub oversized: Vec<PathBuf>,
    pub failed: Vec<PathBuf>,
}

impl DeliveryReport {
    /// True when at least one file was produced and all of them were sent
    pub fn all_sent(&self) -> bool {
        !self.sent.is_empty() && self.oversized.is_empty() && self.failed.is_empty()
    }
}

/// Text shown when a file exceeds the upload ceiling
pub fn too_large_message(size_bytes: u64, max_upload_mb: u64) -> String {
    format!(
        "File too large ({} MB). Max allowed: {} MB.",
        whole_megabytes(size_bytes),
        max_upload_mb
    )
}

/// Status updates are best effort: a failed edit must not stop the flow.
async fn notify<R: ChatReply + ?Sized>(reply: &R, text: &str) {
    if let Err(e) = reply.status(text).await {
        log::warn!("Failed to update status message to '{}': {}", text, e);
    }
}

fn remove_file(path: &Path) {
    if let Err(e) = fs_err::remove_file(path) {
        if e.kind() != std::io::ErrorKind::NotFound {
            log::warn!("Failed to delete {}: {}", path.display(), e);
        }
    }
}

/// Sends each file (or reports it as too large), deleting it afterwards.
///
/// Deletes the status message when every file was sent.
pub async fn deliver<R: ChatReply + ?Sized>(
    reply: &R,
    files: &[PathBuf],
    format: FormatChoice,
    max_upload_mb: u64,
) -> DeliveryReport {
    let max_upload_bytes = max_upload_mb.saturating_mul(BYTES_PER_MB);
    let mut report = DeliveryReport::default();

    if files.is_empty() {
        notify(reply, "Download failed: no output file was produced").await;
        return report;
    }

    for path in files {
        let size = match fs_err::metadata(path) {
            Ok(meta) => meta.len(),
            Err(e) => {
                log::error!("Cannot stat downloaded file: {}", e);
                notify(reply, &format!("Download failed: {}", e)).await;
                report.failed.push(path.clone());
                continue;
            }
        };

        if size > max_upload_bytes {
            log::info!("{} is {} bytes, over the {} MB limit", path.display(), size, max_upload_mb);
            notify(reply, &too_large_message(size, max_upload_mb)).await;
            remove_file(path);
            report.oversized.push(path.clone());
            continue;
        }

        notify(reply, "Uploading…").await;
        let sent = if format.is_audio() {
            reply.send_audio(path).await
        } else {
            reply.send_video(path).await
        };
        remove_file(path);

        match sent {
            Ok(()) => report.sent.push(path.clone()),
            Err(e) => {
                log::error!("Upload of {} failed: {}", path.display(), e);
                notify(reply, &format!("Upload failed: {}", e)).await;
                report.failed.push(path.clone());
            }
        }
    }

    if report.all_sent() {
        if let Err(e) = reply.clear_status().await {
            log::warn!("Failed to delete status message: {}", e);
        }
    }

    report
}

/// Runs one job for `url` in a fresh scratch directory under `temp_root`
/// and delivers the result to the chat.
///
/// # Errors
/// Only scratch-directory setup can fail; download and upload problems are
/// reported to the chat and in the returned report.
pub async fn handle_format_choice<R: ChatReply + ?Sized>(
    reply: &R,
    runner: &JobRunner,
    format: FormatChoice,
    url: &str,
    temp_root: &Path,
    max_upload_mb: u64,
) -> Result<DeliveryReport, AppError> {
    fs_err::create_dir_all(temp_root)?;
    // Removed on drop, whichever way this function returns
    let scratch = tempfile::Builder::new().prefix("job-").tempdir_in(temp_root)?;
    log::info!("Downloading {} as {} into {}", url, format, scratch.path().display());

    let result = runner.run(BOT_JOB_LABEL, url, format, scratch.path()).await;
    let report = match &result.outcome {
        JobOutcome::Failed { message } => {
            log::error!("Download failed: {}", message);
            notify(reply, &format!("Download failed: {}", message)).await;
            DeliveryReport::default()
        }
        JobOutcome::Success { files, .. } => deliver(reply, files, format, max_upload_mb).await,
    };

    Ok(report)
}

/// Waits for a free slot in `jobs`, then runs [`handle_format_choice`].
///
/// While every slot is taken the status reads [`QUEUED_TEXT`].
///
/// # Errors
/// [`AppError::Cancelled`] when the job slots have been closed, otherwise as
/// [`handle_format_choice`].
pub async fn handle_queued_choice<R: ChatReply + ?Sized>(
    reply: &R,
    jobs: &Semaphore,
    runner: &JobRunner,
    format: FormatChoice,
    url: &str,
    temp_root: &Path,
    max_upload_mb: u64,
) -> Result<DeliveryReport, AppError> {
    let _permit = match jobs.try_acquire() {
        Ok(permit) => permit,
        Err(TryAcquireError::NoPermits) => {
            log::info!("All job slots busy, queueing {}", url);
            notify(reply, QUEUED_TEXT).await;
            let permit = jobs.acquire().await.map_err(|_| AppError::Cancelled)?;
            notify(reply, &downloading_message(format)).await;
            permit
        }
        Err(TryAcquireError::Closed) => return Err(AppError::Cancelled),
    };

    handle_format_choice(reply, runner, format, url, temp_root, max_upload_mb).await
}
