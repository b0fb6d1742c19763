//! `--list-formats`: a table of what the extractor can fetch for one URL.

use std::fmt::Write as _;

use crate::core::utils::human_bytes;
use crate::download::source::{FormatEntry, MediaInfo};

fn resolution(entry: &FormatEntry) -> String {
    match (&entry.resolution, entry.height) {
        (Some(res), _) => res.clone(),
        (None, Some(height)) => format!("{}p", height),
        (None, None) => "?p".to_string(),
    }
}

fn fps(entry: &FormatEntry) -> String {
    match entry.fps {
        Some(fps) if fps.fract() == 0.0 => format!("{}", fps as u64),
        Some(fps) => format!("{:.1}", fps),
        None => "-".to_string(),
    }
}

/// Renders the formats table for a probed video
pub fn render_format_table(info: &MediaInfo) -> String {
    let mut out = String::new();
    let title = info.title.as_deref().unwrap_or("unknown");

    let _ = writeln!(out, "Formats for {}", title);
    let _ = writeln!(out, "{:>6}  {:<4}  {:<9}  {:<3}  {:>10}", "ID", "EXT", "RES", "FPS", "SIZE");
    let _ = writeln!(out, "{}", "-".repeat(40));
    for entry in &info.formats {
        let size = entry.filesize.or(entry.filesize_approx);
        let _ = writeln!(
            out,
            "{:>6}  {:<4}  {:<9}  {:>3}  {:>10}",
            entry.format_id.as_deref().unwrap_or("?"),
            entry.ext.as_deref().unwrap_or("?"),
            resolution(entry),
            fps(entry),
            human_bytes(size)
        );
    }
    out
}
