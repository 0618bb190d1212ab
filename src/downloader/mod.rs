// Acquisition module - resolution, extraction fallback, cache, conversion

pub mod cache;
pub mod convert;
pub mod errors;
pub mod events;
pub mod extractors;
pub mod models;
pub mod pipeline;
pub mod profiles;
pub mod resolver;
pub mod spotify;
pub mod utils;

pub use cache::{ArtifactStore, DiskCache};
pub use errors::AcquireError;
pub use events::{ChannelSink, EventSink, StatusEvent};
pub use extractors::{ExtractionFallbackEngine, MediaExtractor, YtDlpExtractor};
pub use models::{AcquireOutcome, MediaInfo, MediaKind, MediaRequest};
pub use pipeline::MediaPipeline;
pub use resolver::{SpotifyResolution, SpotifyResolver, UrlResolver};
pub use spotify::SpotifyClient;
