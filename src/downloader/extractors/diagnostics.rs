// Extractor failure classification
//
// The extraction binary reports everything on stderr. When the whole
// profile chain is exhausted only the last cause reaches the caller, so
// that message should name the actual failure rather than the tail of a
// stack trace.

/// Broad classes of extraction failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Item deleted, private, or otherwise gone
    Unavailable,
    /// No stream matched the profile's format selector
    FormatUnavailable,
    /// The host did not answer in time
    Timeout,
    /// Connection-level trouble
    Network,
    Unknown,
}

impl FailureKind {
    pub fn description(&self) -> &'static str {
        match self {
            Self::Unavailable => "media unavailable",
            Self::FormatUnavailable => "requested format not available",
            Self::Timeout => "extraction timed out",
            Self::Network => "network error",
            Self::Unknown => "extraction failed",
        }
    }
}

/// Classify a stderr dump into a failure kind.
pub fn classify_failure(stderr: &str) -> FailureKind {
    let lower = stderr.to_lowercase();

    if lower.contains("requested format is not available")
        || lower.contains("no video formats")
    {
        return FailureKind::FormatUnavailable;
    }

    if lower.contains("video unavailable")
        || lower.contains("private video")
        || lower.contains("has been removed")
        || lower.contains("no longer available")
    {
        return FailureKind::Unavailable;
    }

    if lower.contains("timed out") || lower.contains("timeout") {
        return FailureKind::Timeout;
    }

    if lower.contains("connection") || lower.contains("unable to download") {
        return FailureKind::Network;
    }

    FailureKind::Unknown
}

/// Pick the line that actually names the failure: the first `ERROR:` line,
/// else the last non-empty one, truncated to keep event payloads readable.
pub fn summarize_failure(stderr: &str) -> String {
    let line = stderr
        .lines()
        .map(str::trim)
        .find(|l| l.starts_with("ERROR:"))
        .or_else(|| stderr.lines().map(str::trim).filter(|l| !l.is_empty()).last())
        .unwrap_or("no output");
    line.chars().take(200).collect()
}
