// Acquisition pipeline
//
// resolve -> extract -> cache check -> fetch -> convert -> assemble, with
// status events emitted along the way. Fatal failures end the request with
// a single error event; a failed conversion only loses that artifact. The
// temp fetch directory is dropped on every exit path.

use std::path::{Path, PathBuf};

use crate::config::PipelineConfig;

use super::cache::{audio_name, video_name, ArtifactStore, DiskCache};
use super::convert::ConversionPipeline;
use super::errors::AcquireError;
use super::events::{EventSink, StatusEvent};
use super::extractors::{Extracted, ExtractionFallbackEngine, MediaExtractor, YtDlpExtractor};
use super::models::{AcquireOutcome, MediaInfo, MediaRequest};
use super::resolver::{SpotifyResolver, UrlResolver};

pub struct MediaPipeline {
    config: PipelineConfig,
    extractor: Box<dyn MediaExtractor>,
    store: Box<dyn ArtifactStore>,
    spotify: Option<Box<dyn SpotifyResolver>>,
}

impl MediaPipeline {
    /// Wire the default collaborators: the yt-dlp extractor and the
    /// on-disk artifact cache under the configured data directory.
    pub fn new(config: PipelineConfig) -> Self {
        let extractor = Box::new(YtDlpExtractor::new(&config));
        let store = Box::new(DiskCache::new(config.data_dir.clone()));
        Self {
            config,
            extractor,
            store,
            spotify: None,
        }
    }

    pub fn with_spotify(mut self, spotify: Box<dyn SpotifyResolver>) -> Self {
        self.spotify = Some(spotify);
        self
    }

    pub fn with_extractor(mut self, extractor: Box<dyn MediaExtractor>) -> Self {
        self.extractor = extractor;
        self
    }

    pub fn with_store(mut self, store: Box<dyn ArtifactStore>) -> Self {
        self.store = store;
        self
    }

    /// Process one request, emitting progress to `sink` and closing the
    /// stream with either a media event or a single error event.
    pub async fn run(
        &self,
        request: &MediaRequest,
        sink: &dyn EventSink,
    ) -> Result<AcquireOutcome, AcquireError> {
        match self.acquire(request, sink).await {
            Ok(outcome) => {
                sink.send(StatusEvent::media(&outcome.media));
                Ok(outcome)
            }
            Err(err) => {
                log::warn!("request for {:?} failed: {}", request.reference, err);
                sink.send(StatusEvent::error(err.to_string()));
                Err(err)
            }
        }
    }

    async fn acquire(
        &self,
        request: &MediaRequest,
        sink: &dyn EventSink,
    ) -> Result<AcquireOutcome, AcquireError> {
        // clamp before the dimensions reach selectors or filenames
        let dims = request
            .dimensions()
            .map(|(w, h)| self.config.clamp(w, h));

        sink.send(StatusEvent::status("Getting resource information ..."));

        let resolved = UrlResolver::new(self.spotify.as_deref())
            .resolve(&request.reference)
            .await?;

        let engine = ExtractionFallbackEngine::new(self.extractor.as_ref());
        let extracted = engine
            .extract(&resolved.url, dims.is_some(), resolved.queue)
            .await?;
        let media_id = extracted.outcome.media_id.clone();

        let audio_ready = self.store.audio_present(&media_id);
        let video_ready = match dims {
            Some((w, h)) => self.store.video_present(&media_id, w, h),
            None => true,
        };

        if !audio_ready || !video_ready {
            self.fetch_and_convert(&extracted, dims, audio_ready, video_ready, sink)
                .await?;
        }

        let mut files = vec![audio_name(&media_id)];
        if let Some((w, h)) = dims {
            files.push(video_name(&media_id, w, h));
        }

        Ok(AcquireOutcome {
            media: MediaInfo {
                id: media_id,
                title: extracted.outcome.title,
                like_count: extracted.outcome.like_count,
                view_count: extracted.outcome.view_count,
                playlist_videos: extracted.continuation,
            },
            files,
        })
    }

    /// One fetch covers however many artifacts are missing; both encodes
    /// read the same raw source.
    async fn fetch_and_convert(
        &self,
        extracted: &Extracted,
        dims: Option<(u32, u32)>,
        audio_ready: bool,
        video_ready: bool,
        sink: &dyn EventSink,
    ) -> Result<(), AcquireError> {
        self.store
            .prepare()
            .map_err(|e| AcquireError::Unknown(format!("failed to create data directory: {}", e)))?;

        sink.send(StatusEvent::status("Downloading resource ..."));

        // dropped (and recursively deleted) on every exit path below
        let temp = tempfile::Builder::new()
            .prefix("blockcast-")
            .tempdir()
            .map_err(|e| AcquireError::Fetch(format!("failed to create temp directory: {}", e)))?;

        let media_id = &extracted.outcome.media_id;
        let fetch_url = extracted
            .outcome
            .webpage_url
            .clone()
            .unwrap_or_else(|| media_id.clone());
        self.extractor
            .fetch(&fetch_url, &extracted.profile, temp.path(), sink)
            .await?;

        let source = fetched_file(temp.path())?;
        let converter = ConversionPipeline::new(&self.config);

        if !audio_ready {
            let dest = self.store.artifact_path(&audio_name(media_id));
            converter
                .run_job(converter.audio_job(&source, &dest), sink)
                .await;
        }

        if let Some((w, h)) = dims {
            if !video_ready {
                let dest = self.store.artifact_path(&video_name(media_id, w, h));
                converter
                    .run_job(converter.video_job(&source, &dest, w, h), sink)
                    .await;
            }
        }

        Ok(())
    }
}

/// The fetch writes exactly one raw file into the temp directory.
fn fetched_file(dir: &Path) -> Result<PathBuf, AcquireError> {
    let mut entries = std::fs::read_dir(dir)
        .map_err(|e| AcquireError::Fetch(format!("failed to read temp directory: {}", e)))?;
    match entries.next() {
        Some(Ok(entry)) => Ok(entry.path()),
        _ => Err(AcquireError::Fetch(
            "fetch produced no file".to_string(),
        )),
    }
}
