// Common data models for the acquisition pipeline

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which of the two target artifacts a conversion produces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MediaKind {
    /// DFPWM audio, one file per media id
    Audio,
    /// 32vid raw frames, one file per media id and target dimensions
    Video,
}

impl MediaKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Audio => "audio",
            Self::Video => "video",
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One incoming acquisition request. Immutable once constructed; dimensions
/// are clamped to the configured maximums before any use.
#[derive(Debug, Clone, Deserialize)]
pub struct MediaRequest {
    /// Direct URL, search text, or a Spotify track/playlist reference
    pub reference: String,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

impl MediaRequest {
    pub fn audio(reference: impl Into<String>) -> Self {
        Self {
            reference: reference.into(),
            width: None,
            height: None,
        }
    }

    pub fn video(reference: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            reference: reference.into(),
            width: Some(width),
            height: Some(height),
        }
    }

    /// Video output is requested iff both dimensions were supplied.
    pub fn want_video(&self) -> bool {
        self.dimensions().is_some()
    }

    pub fn dimensions(&self) -> Option<(u32, u32)> {
        match (self.width, self.height) {
            (Some(w), Some(h)) => Some((w, h)),
            _ => None,
        }
    }
}

/// Narrow typed view over the extractor's metadata output. Only the fields
/// the pipeline reads are represented; everything else in the extractor's
/// JSON is ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractionOutcome {
    pub media_id: String,
    pub title: Option<String>,
    pub like_count: Option<i64>,
    pub view_count: Option<i64>,
    pub is_live: bool,
    /// Extractor that produced the result ("youtube", "generic", ...)
    pub extractor_name: String,
    pub webpage_url: Option<String>,
    /// Domain the item was extracted from, used to disambiguate ids of
    /// generically-extracted media
    pub source_domain: Option<String>,
    pub is_playlist: bool,
    /// Flat playlist entries, in playlist order; empty for single items
    pub entries: Vec<ExtractionOutcome>,
}

/// Metadata carried by the terminal media event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaInfo {
    pub id: String,
    pub title: Option<String>,
    pub like_count: Option<i64>,
    pub view_count: Option<i64>,
    /// Continuation queue of further references; empty when the request
    /// resolved to a single item
    pub playlist_videos: Vec<String>,
}

/// Final outcome of one request: metadata plus the artifact filenames the
/// caller may expect inside the data directory. Filenames are listed even
/// when an individual conversion failed; the caller checks existence.
#[derive(Debug, Clone)]
pub struct AcquireOutcome {
    pub media: MediaInfo,
    pub files: Vec<String>,
}
