// Extraction collaborator seam

use async_trait::async_trait;
use std::path::Path;

use crate::downloader::errors::AcquireError;
use crate::downloader::events::EventSink;
use crate::downloader::models::ExtractionOutcome;
use crate::downloader::profiles::ClientProfile;

/// The media-extraction collaborator. The production implementation drives
/// the yt-dlp binary; tests substitute scripted versions.
#[async_trait]
pub trait MediaExtractor: Send + Sync {
    /// Metadata-only extraction for a resolved URL or search string,
    /// presented through one client profile. No stream bytes move.
    async fn extract_info(
        &self,
        url: &str,
        profile: &ClientProfile,
    ) -> Result<ExtractionOutcome, AcquireError>;

    /// Metadata-only re-extraction keyed by media id. Used to backfill
    /// fields a flat playlist enumeration leaves empty.
    async fn extract_by_id(
        &self,
        media_id: &str,
        profile: &ClientProfile,
    ) -> Result<ExtractionOutcome, AcquireError>;

    /// Download the raw stream for an already-extracted item into `dest`,
    /// forwarding download progress to `sink`.
    async fn fetch(
        &self,
        url: &str,
        profile: &ClientProfile,
        dest: &Path,
        sink: &dyn EventSink,
    ) -> Result<(), AcquireError>;
}
