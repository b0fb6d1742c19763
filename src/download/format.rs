//! User-facing format choices.

use clap::ValueEnum;
use strum::{AsRefStr, Display, EnumIter, EnumString};

/// Output profile picked by the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr, EnumString, EnumIter, ValueEnum)]
pub enum FormatChoice {
    /// MP4 video, capped at 1080p
    #[strum(serialize = "mp4-1080")]
    #[value(name = "mp4-1080")]
    Mp4FullHd,
    /// MP4 video, capped at 720p
    #[strum(serialize = "mp4-720")]
    #[value(name = "mp4-720")]
    Mp4Hd,
    /// MP3 audio only
    #[strum(serialize = "mp3")]
    #[value(name = "mp3")]
    Mp3,
}

impl FormatChoice {
    /// Vertical resolution cap, `None` for audio-only
    pub fn height_cap(self) -> Option<u32> {
        match self {
            FormatChoice::Mp4FullHd => Some(1080),
            FormatChoice::Mp4Hd => Some(720),
            FormatChoice::Mp3 => None,
        }
    }

    pub fn is_audio(self) -> bool {
        matches!(self, FormatChoice::Mp3)
    }

    /// Button / menu label
    pub fn label(self) -> &'static str {
        match self {
            FormatChoice::Mp4FullHd => "MP4 1080p",
            FormatChoice::Mp4Hd => "MP4 720p",
            FormatChoice::Mp3 => "MP3 Audio",
        }
    }

    /// Maps the interactive menu answer (`1`-`3`) to a choice
    pub fn from_menu_index(answer: &str) -> Option<Self> {
        match answer {
            "1" => Some(FormatChoice::Mp4FullHd),
            "2" => Some(FormatChoice::Mp4Hd),
            "3" => Some(FormatChoice::Mp3),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_string_forms_round_trip() {
        for choice in FormatChoice::iter() {
            let text = choice.to_string();
            assert_eq!(text.parse::<FormatChoice>().unwrap(), choice);
        }
        assert_eq!(FormatChoice::Mp4FullHd.to_string(), "mp4-1080");
        assert_eq!(FormatChoice::Mp4Hd.as_ref(), "mp4-720");
        assert_eq!(FormatChoice::Mp3.to_string(), "mp3");
    }

    #[test]
    fn test_unknown_string_rejected() {
        assert!("mp4".parse::<FormatChoice>().is_err());
        assert!("flac".parse::<FormatChoice>().is_err());
    }

    #[test]
    fn test_height_caps() {
        assert_eq!(FormatChoice::Mp4FullHd.height_cap(), Some(1080));
        assert_eq!(FormatChoice::Mp4Hd.height_cap(), Some(720));
        assert_eq!(FormatChoice::Mp3.height_cap(), None);
    }

    #[test]
    fn test_menu_index() {
        assert_eq!(FormatChoice::from_menu_index("1"), Some(FormatChoice::Mp4FullHd));
        assert_eq!(FormatChoice::from_menu_index("3"), Some(FormatChoice::Mp3));
        assert_eq!(FormatChoice::from_menu_index("4"), None);
    }

    #[test]
    fn test_clap_value_names() {
        let parsed = <FormatChoice as ValueEnum>::from_str("mp4-720", false).unwrap();
        assert_eq!(parsed, FormatChoice::Mp4Hd);
    }
}
