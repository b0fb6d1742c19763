//! URL classification.
//!
//! Decides whether a link points at a single video, a playlist or a channel.
//! The classification only selects the output naming template, so a cheap
//! substring heuristic is enough.

use strum::{AsRefStr, Display, EnumString};

/// Kind of media a URL points at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum Classification {
    Video,
    Playlist,
    Channel,
}

/// Marker present in every playlist page URL
const PLAYLIST_MARKER: &str = "playlist?list=";

/// Path fragments used by the different channel URL styles
const CHANNEL_MARKERS: &[&str] = &["/@", "/channel/", "/c/", "/user/"];

/// Classifies a URL. Playlist markers win over channel markers; anything
/// unrecognised (including malformed input) is a video.
pub fn classify(url: &str) -> Classification {
    let lowered = url.to_lowercase();
    if lowered.contains(PLAYLIST_MARKER) {
        return Classification::Playlist;
    }
    if CHANNEL_MARKERS.iter().any(|marker| lowered.contains(marker)) {
        return Classification::Channel;
    }
    Classification::Video
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_video() {
        assert_eq!(classify("https://youtube.com/watch?v=abc"), Classification::Video);
        assert_eq!(classify("https://youtu.be/abc"), Classification::Video);
    }

    #[test]
    fn test_classify_playlist() {
        assert_eq!(
            classify("https://www.youtube.com/playlist?list=PL123"),
            Classification::Playlist
        );
        assert_eq!(
            classify("https://www.youtube.com/PLAYLIST?LIST=PL123"),
            Classification::Playlist
        );
    }

    #[test]
    fn test_classify_channel_markers() {
        for url in [
            "https://www.youtube.com/@somecreator",
            "https://www.youtube.com/channel/UC123",
            "https://www.youtube.com/c/SomeName",
            "https://www.youtube.com/user/legacyname",
        ] {
            assert_eq!(classify(url), Classification::Channel, "{}", url);
        }
    }

    #[test]
    fn test_playlist_takes_precedence_over_channel() {
        assert_eq!(
            classify("https://www.youtube.com/@creator/playlist?list=PL1"),
            Classification::Playlist
        );
        assert_eq!(
            classify("https://www.youtube.com/channel/UC1/playlist?list=PL1"),
            Classification::Playlist
        );
    }

    #[test]
    fn test_malformed_input_falls_back_to_video() {
        assert_eq!(classify(""), Classification::Video);
        assert_eq!(classify("not a url at all"), Classification::Video);
        // watch URLs with a list parameter are still single videos
        assert_eq!(
            classify("https://youtube.com/watch?v=a&list=PL1"),
            Classification::Video
        );
    }

    #[test]
    fn test_display_is_lowercase() {
        assert_eq!(Classification::Playlist.to_string(), "playlist");
        assert_eq!(Classification::Channel.as_ref(), "channel");
        assert_eq!("video".parse::<Classification>().unwrap(), Classification::Video);
    }
}
