// Conversion pipeline
//
// One encoder subprocess per missing artifact: FFmpeg turns the fetched
// stream into DFPWM audio, sanjuuni into 32vid raw frames. Output is
// captured line by line and forwarded as status events while the process
// runs. A failing encoder is reported and swallowed so the sibling
// conversion and the request itself still finish.

use std::path::Path;

use crate::config::PipelineConfig;

use super::errors::AcquireError;
use super::events::{EventSink, StatusEvent};
use super::models::MediaKind;
use super::utils::run_with_live_output;

/// One encoder invocation for a missing artifact.
#[derive(Debug, Clone)]
pub struct ConversionJob {
    pub kind: MediaKind,
    program: String,
    args: Vec<String>,
    prefix: &'static str,
    start_message: &'static str,
}

pub struct ConversionPipeline<'a> {
    config: &'a PipelineConfig,
}

impl<'a> ConversionPipeline<'a> {
    pub fn new(config: &'a PipelineConfig) -> Self {
        Self { config }
    }

    /// Mono 48 kHz DFPWM; destination is named from the media id alone.
    pub fn audio_job(&self, source: &Path, destination: &Path) -> ConversionJob {
        ConversionJob {
            kind: MediaKind::Audio,
            program: self.config.ffmpeg_path.clone(),
            args: vec![
                "-i".to_string(),
                source.display().to_string(),
                "-f".to_string(),
                "dfpwm".to_string(),
                "-ar".to_string(),
                "48000".to_string(),
                "-ac".to_string(),
                "1".to_string(),
                destination.display().to_string(),
            ],
            prefix: "[FFmpeg] ",
            start_message: "Converting audio to dfpwm ...",
        }
    }

    /// Raw 32vid frames at the clamped target dimensions.
    pub fn video_job(
        &self,
        source: &Path,
        destination: &Path,
        width: u32,
        height: u32,
    ) -> ConversionJob {
        let mut args = vec![
            format!("--width={}", width),
            format!("--height={}", height),
            "-i".to_string(),
            source.display().to_string(),
            "--raw".to_string(),
            "-o".to_string(),
            destination.display().to_string(),
        ];
        if self.config.disable_opencl {
            args.push("--disable-opencl".to_string());
        }
        ConversionJob {
            kind: MediaKind::Video,
            program: self.config.sanjuuni_path.clone(),
            args,
            prefix: "[Sanjuuni] ",
            start_message: "Converting video to 32vid ...",
        }
    }

    /// Run one job to completion, forwarding its output. Failure is
    /// reported through `sink` instead of propagating; returns whether the
    /// encoder succeeded.
    pub async fn run_job(&self, job: ConversionJob, sink: &dyn EventSink) -> bool {
        sink.send(StatusEvent::status(job.start_message));

        let result = run_with_live_output(&job.program, &job.args, |line| {
            log::debug!("{}{}", job.prefix, line);
            sink.send(StatusEvent::status(format!("{}{}", job.prefix, line)));
        })
        .await;

        let failure = match result {
            Ok(status) if status.success() => return true,
            Ok(status) => {
                log::warn!("{} exited with {}", job.program, status);
                AcquireError::Conversion(job.kind, format!("exited with {}", status))
            }
            Err(e) => {
                log::warn!("{} failed to run: {}", job.program, e);
                AcquireError::Conversion(job.kind, e)
            }
        };
        sink.send(StatusEvent::error(failure.to_string()));
        false
    }
}
