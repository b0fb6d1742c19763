//! URL input handling
//!
//! Provides the pre-orchestration gate for user input:
//! - Tokenizing free-form input into candidate URLs (deduplicated)
//! - Host allow-list check (case-insensitive substring match)
//!
//! Validation is intentionally shallow: the extractor is the authority on
//! whether a link actually resolves to media.

/// Hosts accepted by both front-ends
pub const SUPPORTED_HOSTS: &[&str] = &["youtube.com", "youtu.be"];

/// Checks a single URL against the host allow-list.
///
/// # Examples
/// ```
/// use ytgrab::core::validation::is_supported_url;
///
/// assert!(is_supported_url("https://www.YouTube.com/watch?v=abc"));
/// assert!(is_supported_url("https://youtu.be/abc"));
/// assert!(!is_supported_url("https://vimeo.com/123"));
/// ```
pub fn is_supported_url(url: &str) -> bool {
    let lowered = url.to_lowercase();
    SUPPORTED_HOSTS.iter().any(|host| lowered.contains(host))
}

/// Splits URLs into `(accepted, rejected)`, preserving input order.
///
/// Rejected URLs never reach the orchestrator.
pub fn validate<S: AsRef<str>>(urls: &[S]) -> (Vec<String>, Vec<String>) {
    let mut accepted = Vec::new();
    let mut rejected = Vec::new();
    for url in urls {
        let url = url.as_ref();
        if is_supported_url(url) {
            accepted.push(url.to_string());
        } else {
            rejected.push(url.to_string());
        }
    }
    (accepted, rejected)
}

/// Extracts candidate URLs from raw user input.
///
/// Each input may hold several links separated by spaces, commas or
/// newlines. Only tokens starting with `http` (any case) are kept, and
/// duplicates are dropped keeping the first occurrence.
pub fn clean_urls<S: AsRef<str>>(inputs: &[S]) -> Vec<String> {
    let mut unique: Vec<String> = Vec::new();
    for raw in inputs {
        let tokens = raw
            .as_ref()
            .split(|c: char| c.is_whitespace() || c == ',')
            .map(str::trim)
            .filter(|t| !t.is_empty() && t.to_lowercase().starts_with("http"));
        for token in tokens {
            if !unique.iter().any(|u| u == token) {
                unique.push(token.to_string());
            }
        }
    }
    unique
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_validate_partitions_by_host() {
        let (accepted, rejected) = validate(&["https://youtube.com/x", "https://vimeo.com/y"]);
        assert_eq!(accepted, vec!["https://youtube.com/x".to_string()]);
        assert_eq!(rejected, vec!["https://vimeo.com/y".to_string()]);
    }

    #[test]
    fn test_validate_is_case_insensitive() {
        let (accepted, rejected) = validate(&["HTTPS://YOUTU.BE/abc", "https://m.YouTube.com/watch?v=1"]);
        assert_eq!(accepted.len(), 2);
        assert!(rejected.is_empty());
    }

    #[test]
    fn test_validate_preserves_order() {
        let urls = ["https://youtu.be/b", "https://example.com", "https://youtu.be/a"];
        let (accepted, rejected) = validate(&urls);
        assert_eq!(accepted, vec!["https://youtu.be/b", "https://youtu.be/a"]);
        assert_eq!(rejected, vec!["https://example.com"]);
    }

    #[test]
    fn test_validate_empty() {
        let (accepted, rejected) = validate::<&str>(&[]);
        assert!(accepted.is_empty());
        assert!(rejected.is_empty());
    }

    #[test]
    fn test_clean_urls_splits_and_dedups() {
        let input = ["https://youtu.be/a, https://youtu.be/b\nhttps://youtu.be/a", "  https://youtu.be/c  "];
        assert_eq!(
            clean_urls(&input),
            vec!["https://youtu.be/a", "https://youtu.be/b", "https://youtu.be/c"]
        );
    }

    #[test]
    fn test_clean_urls_drops_non_http_tokens() {
        let input = ["watch this: HTTP://youtu.be/x and www.youtube.com/y"];
        assert_eq!(clean_urls(&input), vec!["HTTP://youtu.be/x"]);
    }
}
