// Extraction layer - ordered client profiles against the yt-dlp binary
//
// The fallback engine presents each client profile to the extractor in a
// fixed order and stops at the first one that yields usable metadata;
// diagnostics keep the surviving error message meaningful.

mod cli;
mod diagnostics;
mod orchestrator;
mod traits;

pub use cli::YtDlpExtractor;
pub use diagnostics::{classify_failure, summarize_failure, FailureKind};
pub use orchestrator::{Extracted, ExtractionFallbackEngine};
pub use traits::MediaExtractor;
