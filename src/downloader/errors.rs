// Error types for the acquisition pipeline

use std::fmt;

use super::models::MediaKind;

#[derive(Debug, Clone)]
pub enum AcquireError {
    /// The Spotify lookup collaborator failed to resolve a reference
    Resolution(String),

    /// A single extraction attempt failed; aggregated into
    /// `ExtractionExhausted` once every profile has been tried
    Extraction(String),

    /// Every client profile failed; carries the last underlying cause
    ExtractionExhausted(String),

    /// Live streams terminate the pipeline before any cache or conversion step
    Livestream,

    /// Raw media retrieval failed after metadata extraction succeeded
    Fetch(String),

    /// A specific encoder exited non-zero or could not be spawned; local
    /// to one artifact, the sibling conversion and the request continue
    Conversion(MediaKind, String),

    /// Anything that does not match a known kind
    Unknown(String),
}

impl fmt::Display for AcquireError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Resolution(msg) => write!(f, "Failed to resolve media reference: {}", msg),
            Self::Extraction(msg) => write!(f, "Extraction failed: {}", msg),
            Self::ExtractionExhausted(msg) => {
                write!(f, "Failed to get media information: {}", msg)
            }
            Self::Livestream => write!(f, "Livestreams are not supported"),
            Self::Fetch(msg) => write!(f, "Failed to download resource: {}", msg),
            Self::Conversion(kind, _) => write!(f, "Failed to convert {}!", kind),
            Self::Unknown(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for AcquireError {}

impl AcquireError {
    /// Fatal errors end the request with a single error event; non-fatal
    /// ones (a failed conversion) only lose that artifact.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::Conversion(..))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conversion_messages_name_the_kind() {
        let audio = AcquireError::Conversion(MediaKind::Audio, "exit 1".to_string());
        let video = AcquireError::Conversion(MediaKind::Video, "exit 1".to_string());
        assert_eq!(audio.to_string(), "Failed to convert audio!");
        assert_eq!(video.to_string(), "Failed to convert video!");
    }

    #[test]
    fn only_conversion_failures_are_non_fatal() {
        assert!(AcquireError::Livestream.is_fatal());
        assert!(AcquireError::Fetch("x".to_string()).is_fatal());
        assert!(!AcquireError::Conversion(MediaKind::Video, "x".to_string()).is_fatal());
    }
}
