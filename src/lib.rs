// blockcast - media acquisition and conversion core
//
// Resolves a media reference (direct URL, search text, or a Spotify
// track/playlist link) into one concrete item, fetches its raw streams
// through an ordered set of extraction client profiles, and drives FFmpeg
// and sanjuuni to produce the DFPWM audio / 32vid video artifacts a
// constrained playback client consumes. Progress flows to the caller as a
// stream of structured status events.

pub mod config;
pub mod downloader;

pub use config::PipelineConfig;
pub use downloader::{
    AcquireError, AcquireOutcome, ChannelSink, EventSink, MediaPipeline, MediaRequest,
    SpotifyClient, StatusEvent,
};
