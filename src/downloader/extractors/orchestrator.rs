// Extraction fallback engine
//
// Walks the client profiles in their fixed order until one yields usable
// metadata, then normalizes the winning outcome: playlist flattening,
// generic-id rewrite, partial-metadata backfill, livestream rejection.
// When every profile fails, the reported cause is the LAST failure; by the
// end of the chain the site has usually settled on its final answer.

use crate::downloader::errors::AcquireError;
use crate::downloader::models::ExtractionOutcome;
use crate::downloader::profiles::{profile_set, ClientProfile};

use super::traits::MediaExtractor;

/// Prefix for rewritten ids of generically-extracted media. Two sites can
/// serve the same path-derived id; the domain keeps the cache keys apart.
const GENERIC_ID_PREFIX: &str = "g";

/// A normalized extraction result: the primary item, the profile that won,
/// and the continuation queue of further references.
#[derive(Debug)]
pub struct Extracted {
    pub outcome: ExtractionOutcome,
    pub profile: ClientProfile,
    pub continuation: Vec<String>,
}

pub struct ExtractionFallbackEngine<'a> {
    extractor: &'a dyn MediaExtractor,
}

impl<'a> ExtractionFallbackEngine<'a> {
    pub fn new(extractor: &'a dyn MediaExtractor) -> Self {
        Self { extractor }
    }

    /// Try every profile in order against `url`. `upstream_queue` is the
    /// continuation queue the URL resolver produced (Spotify playlists);
    /// site-playlist entries replace it (see DESIGN.md).
    pub async fn extract(
        &self,
        url: &str,
        want_video: bool,
        upstream_queue: Vec<String>,
    ) -> Result<Extracted, AcquireError> {
        let mut last_error: Option<AcquireError> = None;
        let mut winner: Option<(ClientProfile, ExtractionOutcome)> = None;

        for profile in profile_set(want_video) {
            log::info!("trying extraction profile {}", profile.name);
            match self.extractor.extract_info(url, &profile).await {
                Ok(outcome) => {
                    log::info!("profile {} succeeded", profile.name);
                    winner = Some((profile, outcome));
                    break;
                }
                Err(e) => {
                    log::warn!("profile {} failed: {}", profile.name, e);
                    last_error = Some(e);
                }
            }
        }

        let (profile, outcome) = match winner {
            Some(pair) => pair,
            None => {
                let cause = last_error
                    .map(|e| e.to_string())
                    .unwrap_or_else(|| "no extraction profiles configured".to_string());
                return Err(AcquireError::ExtractionExhausted(cause));
            }
        };

        self.postprocess(profile, outcome, upstream_queue).await
    }

    async fn postprocess(
        &self,
        profile: ClientProfile,
        mut outcome: ExtractionOutcome,
        upstream_queue: Vec<String>,
    ) -> Result<Extracted, AcquireError> {
        let mut continuation = upstream_queue;

        if outcome.is_playlist {
            let mut entries = std::mem::take(&mut outcome.entries);
            if entries.is_empty() {
                return Err(AcquireError::Extraction(
                    "playlist contained no entries".to_string(),
                ));
            }
            let primary = entries.remove(0);
            // playlist-derived ids replace whatever the resolver queued
            continuation = entries.into_iter().map(|e| e.media_id).collect();
            outcome = primary;
        }

        if outcome.extractor_name == "generic" {
            let domain = outcome.source_domain.clone().unwrap_or_default();
            outcome.media_id = format!("{}{}{}", GENERIC_ID_PREFIX, domain, outcome.media_id);
        }

        // Flat playlist enumeration returns partial metadata; a second
        // id-keyed pass fills in the counts. Keep the partial data if the
        // secondary call fails.
        if outcome.extractor_name.starts_with("youtube")
            && (outcome.view_count.is_none() || outcome.like_count.is_none())
        {
            let backfill = self
                .extractor
                .extract_by_id(&outcome.media_id, &profile)
                .await;
            match backfill {
                Ok(full) => outcome = full,
                Err(e) => {
                    log::warn!("metadata backfill for {} failed: {}", outcome.media_id, e)
                }
            }
        }

        if outcome.is_live {
            return Err(AcquireError::Livestream);
        }

        continuation.retain(|id| id != &outcome.media_id);

        Ok(Extracted {
            outcome,
            profile,
            continuation,
        })
    }
}
