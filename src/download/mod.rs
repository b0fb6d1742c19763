//! Download management: classification, job building, extraction and batching

pub mod builder;
pub mod classify;
pub mod format;
pub mod formats;
pub mod progress;
pub mod queue;
pub mod runner;
pub mod source;
pub mod summary;

// Re-exports for convenience
pub use builder::JobDescriptor;
pub use classify::{classify, Classification};
pub use format::FormatChoice;
pub use queue::Orchestrator;
pub use runner::{JobOutcome, JobResult, JobRunner};
pub use source::{Extractor, YtDlpExtractor};
pub use summary::{summarize, Summary};
