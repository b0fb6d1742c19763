//! Mock implementations for integration tests
//!
//! Stand-ins for the external extractor so the pipeline can be exercised
//! without network access or a yt-dlp binary.

pub mod mock_extractor;

pub use mock_extractor::{MockExtractor, MockExtractorConfig};
