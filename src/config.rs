// Pipeline configuration
//
// Every path and limit is handed to the pipeline's constructor explicitly;
// there is no process-wide mutable state. The host process builds one of
// these from its own settings layer.

use std::path::{Path, PathBuf};
use std::process::Command;

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Extraction binary
    pub ytdlp_path: String,
    /// Audio encoder binary
    pub ffmpeg_path: String,
    /// Video encoder binary
    pub sanjuuni_path: String,
    /// Pass the acceleration-disable flag to the video encoder
    pub disable_opencl: bool,
    /// Root directory for converted artifacts
    pub data_dir: PathBuf,
    pub max_width: u32,
    pub max_height: u32,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            ytdlp_path: "yt-dlp".to_string(),
            ffmpeg_path: "ffmpeg".to_string(),
            sanjuuni_path: "sanjuuni".to_string(),
            disable_opencl: false,
            data_dir: dirs::data_local_dir()
                .map(|d| d.join("blockcast"))
                .unwrap_or_else(|| PathBuf::from("data")),
            max_width: 640,
            max_height: 360,
        }
    }
}

impl PipelineConfig {
    /// Default configuration with the three binaries located through the
    /// common install paths.
    pub fn discovered() -> Self {
        let base = Self::default();
        Self {
            ytdlp_path: find_binary("yt-dlp"),
            ffmpeg_path: find_binary("ffmpeg"),
            sanjuuni_path: find_binary("sanjuuni"),
            ..base
        }
    }

    pub fn with_ytdlp_path(mut self, path: impl Into<String>) -> Self {
        self.ytdlp_path = path.into();
        self
    }

    pub fn with_ffmpeg_path(mut self, path: impl Into<String>) -> Self {
        self.ffmpeg_path = path.into();
        self
    }

    pub fn with_sanjuuni_path(mut self, path: impl Into<String>) -> Self {
        self.sanjuuni_path = path.into();
        self
    }

    pub fn with_disable_opencl(mut self, disable: bool) -> Self {
        self.disable_opencl = disable;
        self
    }

    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = dir.into();
        self
    }

    pub fn with_max_dimensions(mut self, width: u32, height: u32) -> Self {
        self.max_width = width;
        self.max_height = height;
        self
    }

    /// Cap requested dimensions to the configured maximums.
    pub fn clamp(&self, width: u32, height: u32) -> (u32, u32) {
        (width.min(self.max_width), height.min(self.max_height))
    }
}

/// Locate a binary: common install paths first, then `which`, then fall
/// back to bare name resolution through PATH at spawn time.
pub fn find_binary(name: &str) -> String {
    let common_paths = [
        format!("/opt/homebrew/bin/{}", name),
        format!("/usr/local/bin/{}", name),
        format!("/usr/bin/{}", name),
    ];

    for path in common_paths {
        if Path::new(&path).exists() {
            return path;
        }
    }

    if let Ok(output) = Command::new("which").arg(name).output() {
        if output.status.success() {
            let path = String::from_utf8_lossy(&output.stdout).trim().to_string();
            if !path.is_empty() {
                return path;
            }
        }
    }

    name.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_caps_both_dimensions() {
        let config = PipelineConfig::default().with_max_dimensions(640, 360);
        assert_eq!(config.clamp(1000, 1000), (640, 360));
        assert_eq!(config.clamp(320, 200), (320, 200));
    }

    #[test]
    fn builders_override_defaults() {
        let config = PipelineConfig::default()
            .with_ffmpeg_path("/opt/ffmpeg")
            .with_disable_opencl(true)
            .with_data_dir("/tmp/bc");
        assert_eq!(config.ffmpeg_path, "/opt/ffmpeg");
        assert!(config.disable_opencl);
        assert_eq!(config.data_dir, PathBuf::from("/tmp/bc"));
    }
}
