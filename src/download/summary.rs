//! End-of-run summary.

use std::fmt;

use crossterm::style::Stylize;

use crate::download::runner::{JobOutcome, JobResult};

/// Width of the separator line printed before the summary
const SEPARATOR_WIDTH: usize = 50;

/// Results split into successes and failures, in their original order
#[derive(Debug, Clone)]
pub struct Summary<'a> {
    pub succeeded: Vec<&'a JobResult>,
    pub failed: Vec<&'a JobResult>,
}

#[derive(Clone, Copy)]
enum Tone {
    Good,
    Bad,
    Plain,
}

/// Partitions results into successes and failures.
pub fn summarize(results: &[JobResult]) -> Summary<'_> {
    let (succeeded, failed) = results.iter().partition(|r| r.is_success());
    Summary { succeeded, failed }
}

impl Summary<'_> {
    pub fn all_succeeded(&self) -> bool {
        self.failed.is_empty()
    }

    /// Same report as `Display`, with ANSI colors on the headline lines.
    pub fn to_colored_string(&self) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail
        let _ = self.render(&mut out, |tone, text| match tone {
            Tone::Good => text.green().bold().to_string(),
            Tone::Bad => text.red().bold().to_string(),
            Tone::Plain => text,
        });
        out
    }

    fn render<W, P>(&self, out: &mut W, paint: P) -> fmt::Result
    where
        W: fmt::Write,
        P: Fn(Tone, String) -> String,
    {
        writeln!(out, "{}", "=".repeat(SEPARATOR_WIDTH))?;
        writeln!(out, "{}", paint(Tone::Good, format!("Success: {}", self.succeeded.len())))?;
        for item in &self.succeeded {
            writeln!(out, "  • {:8} -> {}", item.classification.as_ref(), item.url)?;
        }
        if self.failed.is_empty() {
            writeln!(out, "{}", paint(Tone::Good, "All jobs completed.".to_string()))?;
        } else {
            writeln!(out, "{}", paint(Tone::Bad, format!("Failed: {}", self.failed.len())))?;
            for item in &self.failed {
                let message = match &item.outcome {
                    JobOutcome::Failed { message } => message.as_str(),
                    JobOutcome::Success { .. } => "",
                };
                writeln!(out, "{}", paint(Tone::Plain, format!("  • {} :: {}", item.url, message)))?;
            }
        }
        Ok(())
    }
}

impl fmt::Display for Summary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.render(f, |_, text| text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::download::classify::Classification;
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;

    fn ok(url: &str, classification: Classification) -> JobResult {
        JobResult {
            url: url.to_string(),
            classification,
            outcome: JobOutcome::Success {
                output_path: "/out/%(title)s.%(ext)s".to_string(),
                files: vec![PathBuf::from("/out/a.mp4")],
            },
        }
    }

    #[test]
    fn test_partition_preserves_order() {
        let results = vec![
            ok("u1", Classification::Video),
            JobResult::failed("u2", "boom"),
            ok("u3", Classification::Playlist),
        ];
        let summary = summarize(&results);
        assert_eq!(summary.succeeded.len() + summary.failed.len(), results.len());
        assert_eq!(summary.succeeded[0].url, "u1");
        assert_eq!(summary.succeeded[1].url, "u3");
        assert_eq!(summary.failed[0].url, "u2");
        assert!(!summary.all_succeeded());
    }

    #[test]
    fn test_report_with_failures() {
        let results = vec![
            ok("https://youtu.be/a", Classification::Video),
            JobResult::failed("https://youtu.be/b", "ERROR: Private video"),
        ];
        let expected = format!(
            "{}\nSuccess: 1\n  • video    -> https://youtu.be/a\nFailed: 1\n  • https://youtu.be/b :: ERROR: Private video\n",
            "=".repeat(50)
        );
        assert_eq!(summarize(&results).to_string(), expected);
    }

    #[test]
    fn test_report_all_completed() {
        let results = vec![ok("https://youtube.com/@x", Classification::Channel)];
        let text = summarize(&results).to_string();
        assert!(text.contains("  • channel  -> https://youtube.com/@x"));
        assert!(text.ends_with("All jobs completed.\n"));
        assert!(!text.contains("Failed:"));
    }

    #[test]
    fn test_empty_results() {
        let summary = summarize(&[]);
        assert!(summary.all_succeeded());
        assert!(summary.to_string().contains("Success: 0"));
    }

    #[test]
    fn test_colored_output_keeps_text() {
        let results = vec![JobResult::failed("u", "bad")];
        let colored = summarize(&results).to_colored_string();
        assert!(colored.contains("Failed: 1"));
        assert!(colored.contains("  • u :: bad"));
    }
}
