//! Interactive prompts for the CLI downloader.
//!
//! Every question can be pre-answered by a command-line flag; only the
//! missing answers are asked for. The prompter is generic over its input and
//! output so the dialogue can be driven from tests.
//!
//! Terminal reads block, so the CLI runs each question on the blocking pool
//! through [`ask_cancellable`] and stops waiting as soon as the user presses
//! Ctrl+C.

use std::future::Future;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use tokio_util::sync::CancellationToken;

use crate::core::error::AppError;
use crate::core::config::workers::{DEFAULT_WORKERS, MAX_WORKERS};
use crate::core::validation::clean_urls;
use crate::download::format::FormatChoice;

/// Awaits `work` unless `cancel` fires first.
///
/// # Errors
/// [`AppError::Cancelled`] on cancellation, otherwise whatever `work` returns.
pub async fn until_cancelled<T, F>(cancel: &CancellationToken, work: F) -> Result<T, AppError>
where
    F: Future<Output = Result<T, AppError>>,
{
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(AppError::Cancelled),
        result = work => result,
    }
}

/// Runs a blocking question on the blocking pool, giving up on cancellation.
///
/// A cancelled question's thread stays parked on its read until the runtime
/// is shut down.
pub async fn ask_cancellable<T, F>(cancel: &CancellationToken, question: F) -> Result<T, AppError>
where
    T: Send + 'static,
    F: FnOnce() -> io::Result<T> + Send + 'static,
{
    until_cancelled(cancel, async {
        let answer = tokio::task::spawn_blocking(question)
            .await
            .map_err(|e| AppError::Io(io::Error::other(e)))?;
        Ok(answer?)
    })
    .await
}

/// Asks the user questions on `output` and reads answers from `input`
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl Prompter<io::StdinLock<'static>, io::Stdout> {
    /// Prompter bound to the terminal
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Prints `prompt` and reads one trimmed line. `None` at end of input.
    fn ask(&mut self, prompt: &str) -> io::Result<Option<String>> {
        write!(self.output, "{}", prompt)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    fn say(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.output, "{}", text)
    }

    /// URLs from the command line, or asked for interactively.
    ///
    /// An empty first answer switches to multi-line mode: one URL per line
    /// until a blank line.
    pub fn resolve_urls(&mut self, positional: &[String]) -> io::Result<Vec<String>> {
        if !positional.is_empty() {
            return Ok(clean_urls(positional));
        }

        let first = self.ask("Enter YouTube URL(s): ")?.unwrap_or_default();
        if !first.is_empty() {
            return Ok(clean_urls(&[first]));
        }

        self.say("\nMulti-line mode activated! Enter one URL per line, blank line to finish.\n")?;
        let mut collected: Vec<String> = Vec::new();
        loop {
            let prompt = format!("URL {}: ", collected.len() + 1);
            match self.ask(&prompt)? {
                Some(entry) if !entry.is_empty() => collected.extend(clean_urls(&[entry])),
                _ => break,
            }
        }
        // Entries are cleaned one line at a time; drop repeats across lines
        Ok(clean_urls(&collected))
    }

    /// Format from the flag, or the 1-3 menu (default 1).
    pub fn format_choice(&mut self, preset: Option<FormatChoice>) -> io::Result<FormatChoice> {
        if let Some(choice) = preset {
            return Ok(choice);
        }

        self.say("\nChoose format:\n  1. MP4 Video (up to 1080p)\n  2. MP4 Video (up to 720p)\n  3. MP3 Audio only\n")?;
        loop {
            let Some(answer) = self.ask("Enter choice (1-3, default=1): ")? else {
                return Ok(FormatChoice::Mp4FullHd);
            };
            let answer = if answer.is_empty() { "1" } else { answer.as_str() };
            if let Some(choice) = FormatChoice::from_menu_index(answer) {
                return Ok(choice);
            }
            self.say("Enter 1, 2, or 3.")?;
        }
    }

    /// Output folder from the flag or a prompt, tilde-expanded and created.
    pub fn output_dir(&mut self, preset: Option<PathBuf>, default: &Path) -> io::Result<PathBuf> {
        let path = match preset {
            Some(path) => path,
            None => {
                let prompt = format!("Output folder (default: {}): ", default.display());
                match self.ask(&prompt)? {
                    Some(raw) if !raw.is_empty() => PathBuf::from(shellexpand::tilde(&raw).into_owned()),
                    _ => default.to_path_buf(),
                }
            }
        };
        fs_err::create_dir_all(&path)?;
        Ok(path)
    }

    /// Worker count: 1 for a single job, the clamped flag, or a prompt.
    pub fn workers(&mut self, job_count: usize, preset: Option<usize>) -> io::Result<usize> {
        if job_count <= 1 {
            return Ok(1);
        }
        if let Some(requested) = preset {
            return Ok(crate::core::config::workers::clamp(requested));
        }

        let prompt = format!(
            "Number of concurrent downloads (1-{}, default={}): ",
            MAX_WORKERS, DEFAULT_WORKERS
        );
        loop {
            let answer = match self.ask(&prompt)? {
                Some(answer) if !answer.is_empty() => answer,
                _ => return Ok(DEFAULT_WORKERS),
            };
            match answer.parse::<usize>() {
                Ok(value) if (1..=MAX_WORKERS).contains(&value) => return Ok(value),
                _ => self.say(&format!("Pick a number between 1 and {}.", MAX_WORKERS))?,
            }
        }
    }

    /// URL to inspect for `--list-formats`.
    pub fn inspect_url(&mut self, positional: &[String]) -> io::Result<Option<String>> {
        if let Some(first) = positional.first() {
            return Ok(Some(first.trim().to_string()));
        }
        Ok(self.ask("Enter URL to inspect: ")?.filter(|url| !url.is_empty()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn prompter(input: &str) -> Prompter<Cursor<Vec<u8>>, Vec<u8>> {
        Prompter::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    fn transcript(p: &Prompter<Cursor<Vec<u8>>, Vec<u8>>) -> String {
        String::from_utf8_lossy(&p.output).into_owned()
    }

    #[tokio::test]
    async fn test_cancel_stops_waiting_for_an_answer() {
        let cancel = CancellationToken::new();
        let (release_tx, release_rx) = std::sync::mpsc::channel::<()>();

        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(std::time::Duration::from_millis(50)).await;
            trigger.cancel();
        });

        let started = std::time::Instant::now();
        let result = ask_cancellable(&cancel, move || {
            // Stands in for a terminal read nobody answers
            let _ = release_rx.recv();
            Ok(1)
        })
        .await;

        assert!(matches!(result, Err(AppError::Cancelled)));
        assert!(started.elapsed() < std::time::Duration::from_secs(5));
        let _ = release_tx.send(());
    }

    #[tokio::test]
    async fn test_answer_passes_through_when_not_cancelled() {
        let cancel = CancellationToken::new();
        let urls = ask_cancellable(&cancel, || prompter("https://youtu.be/a\n").resolve_urls(&[])).await;
        assert_eq!(urls.unwrap(), vec!["https://youtu.be/a".to_string()]);

        let failed = ask_cancellable(&cancel, || -> io::Result<()> { Err(io::Error::other("closed")) }).await;
        assert!(matches!(failed, Err(AppError::Io(_))));
    }

    #[tokio::test]
    async fn test_already_cancelled_skips_the_work() {
        let cancel = CancellationToken::new();
        cancel.cancel();
        let result = until_cancelled(&cancel, std::future::pending::<Result<(), AppError>>()).await;
        assert!(matches!(result, Err(AppError::Cancelled)));
    }

    #[test]
    fn test_positional_urls_skip_prompt() {
        let mut p = prompter("");
        let urls = p
            .resolve_urls(&["https://youtu.be/a, https://youtu.be/b".to_string()])
            .unwrap();
        assert_eq!(urls, vec!["https://youtu.be/a", "https://youtu.be/b"]);
        assert!(transcript(&p).is_empty());
    }

    #[test]
    fn test_single_line_answer() {
        let mut p = prompter("https://youtu.be/a https://youtu.be/a\n");
        assert_eq!(p.resolve_urls(&[]).unwrap(), vec!["https://youtu.be/a"]);
    }

    #[test]
    fn test_multi_line_mode() {
        let mut p = prompter("\nhttps://youtu.be/a\nnot-a-url\nhttps://youtu.be/b\nhttps://youtu.be/a\n\n");
        let urls = p.resolve_urls(&[]).unwrap();
        assert_eq!(urls, vec!["https://youtu.be/a", "https://youtu.be/b"]);
        let out = transcript(&p);
        assert!(out.contains("Multi-line mode activated!"));
        assert!(out.contains("URL 1: "));
    }

    #[test]
    fn test_format_menu_default_and_retry() {
        let mut p = prompter("\n");
        assert_eq!(p.format_choice(None).unwrap(), FormatChoice::Mp4FullHd);

        let mut p = prompter("9\n3\n");
        assert_eq!(p.format_choice(None).unwrap(), FormatChoice::Mp3);
        assert!(transcript(&p).contains("Enter 1, 2, or 3."));

        let mut p = prompter("");
        assert_eq!(p.format_choice(Some(FormatChoice::Mp4Hd)).unwrap(), FormatChoice::Mp4Hd);
    }

    #[test]
    fn test_workers() {
        let mut p = prompter("");
        assert_eq!(p.workers(1, Some(5)).unwrap(), 1);
        assert_eq!(p.workers(4, Some(99)).unwrap(), 5);
        assert_eq!(p.workers(4, Some(0)).unwrap(), 1);

        let mut p = prompter("\n");
        assert_eq!(p.workers(4, None).unwrap(), DEFAULT_WORKERS);

        let mut p = prompter("7\nabc\n2\n");
        assert_eq!(p.workers(4, None).unwrap(), 2);
        assert_eq!(transcript(&p).matches("Pick a number between 1 and 5.").count(), 2);
    }

    #[test]
    fn test_output_dir_default_is_created() {
        let tmp = tempfile::tempdir().unwrap();
        let default = tmp.path().join("downloads");
        let mut p = prompter("\n");
        let dir = p.output_dir(None, &default).unwrap();
        assert_eq!(dir, default);
        assert!(dir.is_dir());
    }

    #[test]
    fn test_output_dir_answer() {
        let tmp = tempfile::tempdir().unwrap();
        let custom = tmp.path().join("custom");
        let mut p = prompter(&format!("{}\n", custom.display()));
        let dir = p.output_dir(None, &tmp.path().join("unused")).unwrap();
        assert_eq!(dir, custom);
        assert!(custom.is_dir());
    }

    #[test]
    fn test_inspect_url() {
        let mut p = prompter("\n");
        assert_eq!(p.inspect_url(&[]).unwrap(), None);
        let mut p = prompter("https://youtu.be/z\n");
        assert_eq!(p.inspect_url(&[]).unwrap().as_deref(), Some("https://youtu.be/z"));
    }
}
