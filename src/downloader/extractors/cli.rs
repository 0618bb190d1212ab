// yt-dlp driver
//
// Metadata extraction runs `yt-dlp -J` once per client profile; format
// selection happens during the simulated extraction, so a profile whose
// selector matches nothing fails here and the fallback engine moves on.
// Fetch re-runs the binary in download mode against the scoped temp
// directory and forwards `[download]` progress lines as status events.

use async_trait::async_trait;
use lazy_static::lazy_static;
use regex::Regex;
use std::path::Path;

use super::diagnostics::{classify_failure, summarize_failure};
use super::traits::MediaExtractor;
use crate::config::PipelineConfig;
use crate::downloader::errors::AcquireError;
use crate::downloader::events::{EventSink, StatusEvent};
use crate::downloader::models::ExtractionOutcome;
use crate::downloader::profiles::ClientProfile;
use crate::downloader::utils::{
    remove_whitespace, run_output_with_timeout, run_with_live_output, strip_ansi,
};

const EXTRACT_TIMEOUT_SECS: u64 = 120;

pub struct YtDlpExtractor {
    ytdlp_path: String,
}

impl YtDlpExtractor {
    pub fn new(config: &PipelineConfig) -> Self {
        Self {
            ytdlp_path: config.ytdlp_path.clone(),
        }
    }

    fn common_args(&self, profile: &ClientProfile) -> Vec<String> {
        let mut args = vec![
            "--no-warnings".to_string(),
            "--default-search".to_string(),
            "auto".to_string(),
            "--restrict-filenames".to_string(),
            "--socket-timeout".to_string(),
            "15".to_string(),
            "--retries".to_string(),
            "2".to_string(),
            "--format".to_string(),
            profile.format_selector.to_string(),
            "--user-agent".to_string(),
            profile.identity_header.to_string(),
        ];
        for (name, value) in &profile.extra_headers {
            args.push("--add-header".to_string());
            args.push(format!("{}:{}", name, value));
        }
        args.push("--extractor-args".to_string());
        args.push(format!("youtube:player_client={}", profile.player_client));
        args
    }

    fn info_args(&self, url: &str, profile: &ClientProfile) -> Vec<String> {
        let mut args = vec![
            "--dump-single-json".to_string(),
            // playlists come back as one flat document; entries stay unresolved
            "--flat-playlist".to_string(),
        ];
        args.extend(self.common_args(profile));
        args.push(url.to_string());
        args
    }

    fn fetch_args(&self, url: &str, profile: &ClientProfile, dest: &Path) -> Vec<String> {
        let mut args = vec!["--newline".to_string(), "--no-playlist".to_string()];
        args.extend(self.common_args(profile));
        args.push("--output".to_string());
        args.push(format!("{}/%(id)s.%(ext)s", dest.display()));
        args.push(url.to_string());
        args
    }

    async fn run_info(
        &self,
        url: &str,
        profile: &ClientProfile,
    ) -> Result<ExtractionOutcome, AcquireError> {
        let args = self.info_args(url, profile);
        log::debug!("[yt-dlp] {} {}", self.ytdlp_path, args.join(" "));

        let output = run_output_with_timeout(&self.ytdlp_path, &args, EXTRACT_TIMEOUT_SECS)
            .await
            .map_err(AcquireError::Extraction)?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(AcquireError::Extraction(format!(
                "{}: {}",
                classify_failure(&stderr).description(),
                summarize_failure(&stderr)
            )));
        }

        let json: serde_json::Value = serde_json::from_slice(&output.stdout)
            .map_err(|e| AcquireError::Extraction(format!("invalid extractor JSON: {}", e)))?;
        Ok(parse_outcome(&json))
    }
}

/// Map the extractor's JSON document onto the narrow outcome type. Flat
/// playlist entries carry `ie_key` instead of `extractor`.
fn parse_outcome(json: &serde_json::Value) -> ExtractionOutcome {
    let entries = json["entries"]
        .as_array()
        .map(|list| list.iter().map(parse_outcome).collect())
        .unwrap_or_default();

    let extractor_name = json["extractor"]
        .as_str()
        .map(str::to_string)
        .or_else(|| json["ie_key"].as_str().map(str::to_lowercase))
        .unwrap_or_default();

    ExtractionOutcome {
        media_id: json["id"].as_str().unwrap_or_default().to_string(),
        title: json["title"].as_str().map(str::to_string),
        like_count: json["like_count"].as_i64(),
        view_count: json["view_count"].as_i64(),
        is_live: json["is_live"].as_bool().unwrap_or(false),
        extractor_name,
        webpage_url: json["webpage_url"].as_str().map(str::to_string),
        source_domain: json["webpage_url_domain"].as_str().map(str::to_string),
        is_playlist: json["_type"].as_str() == Some("playlist"),
        entries,
    }
}

lazy_static! {
    // [download]   6.2% of ~ 343.72MiB at  420.30KiB/s ETA 12:32
    static ref PROGRESS_RE: Regex =
        Regex::new(r"\[download\]\s+(\d+\.?\d*%)\s+of.*?ETA\s+(\S+)").unwrap();
}

/// Turn a raw downloader output line into the compact progress message the
/// client renders, or `None` for lines that carry no percentage.
fn parse_fetch_progress(line: &str) -> Option<String> {
    let clean = strip_ansi(line);
    let caps = PROGRESS_RE.captures(&clean)?;
    let percent = remove_whitespace(caps.get(1)?.as_str());
    let eta = caps.get(2)?.as_str();
    Some(format!("download {} ETA {}", percent, eta))
}

#[async_trait]
impl MediaExtractor for YtDlpExtractor {
    async fn extract_info(
        &self,
        url: &str,
        profile: &ClientProfile,
    ) -> Result<ExtractionOutcome, AcquireError> {
        self.run_info(url, profile).await
    }

    async fn extract_by_id(
        &self,
        media_id: &str,
        profile: &ClientProfile,
    ) -> Result<ExtractionOutcome, AcquireError> {
        self.run_info(media_id, profile).await
    }

    async fn fetch(
        &self,
        url: &str,
        profile: &ClientProfile,
        dest: &Path,
        sink: &dyn EventSink,
    ) -> Result<(), AcquireError> {
        let args = self.fetch_args(url, profile, dest);
        log::debug!("[yt-dlp] {} {}", self.ytdlp_path, args.join(" "));

        let mut stderr_tail = String::new();
        let status = run_with_live_output(&self.ytdlp_path, &args, |line| {
            log::debug!("[yt-dlp] {}", line);
            if let Some(message) = parse_fetch_progress(line) {
                sink.send(StatusEvent::status(message));
            }
            if line.starts_with("ERROR:") || stderr_tail.is_empty() {
                stderr_tail = line.to_string();
            }
        })
        .await
        .map_err(AcquireError::Fetch)?;

        if !status.success() {
            return Err(AcquireError::Fetch(summarize_failure(&stderr_tail)));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_lines_become_compact_messages() {
        let line = "[download]   6.2% of ~ 343.72MiB at  420.30KiB/s ETA 12:32";
        assert_eq!(
            parse_fetch_progress(line),
            Some("download 6.2% ETA 12:32".to_string())
        );
    }

    #[test]
    fn colored_progress_lines_are_cleaned_first() {
        let line = "[download] \x1b[0;94m 12.5%\x1b[0m of 10.00MiB at 1.00MiB/s ETA 00:08";
        assert_eq!(
            parse_fetch_progress(line),
            Some("download 12.5% ETA 00:08".to_string())
        );
    }

    #[test]
    fn non_progress_lines_are_ignored() {
        assert_eq!(parse_fetch_progress("[youtube] abc: Downloading webpage"), None);
        assert_eq!(parse_fetch_progress("[download] Destination: /tmp/abc.mp4"), None);
        assert_eq!(
            parse_fetch_progress("[download] 100% of 3.17MiB in 00:02"),
            None
        );
    }

    #[test]
    fn outcome_parsing_reads_the_narrow_fields() {
        let json: serde_json::Value = serde_json::json!({
            "id": "dQw4w9WgXcQ",
            "title": "a title",
            "like_count": 10,
            "view_count": 2000,
            "is_live": false,
            "extractor": "youtube",
            "webpage_url": "https://www.youtube.com/watch?v=dQw4w9WgXcQ",
            "webpage_url_domain": "youtube.com",
            "formats": [{"ignored": true}],
        });
        let outcome = parse_outcome(&json);
        assert_eq!(outcome.media_id, "dQw4w9WgXcQ");
        assert_eq!(outcome.view_count, Some(2000));
        assert!(!outcome.is_playlist);
        assert!(outcome.entries.is_empty());
    }

    #[test]
    fn playlist_documents_keep_entry_order() {
        let json: serde_json::Value = serde_json::json!({
            "id": "PL123",
            "_type": "playlist",
            "extractor": "youtube:tab",
            "entries": [
                {"id": "a", "ie_key": "Youtube"},
                {"id": "b", "ie_key": "Youtube"},
                {"id": "c", "ie_key": "Youtube"},
            ],
        });
        let outcome = parse_outcome(&json);
        assert!(outcome.is_playlist);
        let ids: Vec<&str> = outcome.entries.iter().map(|e| e.media_id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
        // flat entries report their extractor through ie_key
        assert_eq!(outcome.entries[0].extractor_name, "youtube");
    }

    #[test]
    fn info_args_carry_the_profile_identity() {
        let config = PipelineConfig::default();
        let extractor = YtDlpExtractor::new(&config);
        let profile = &crate::downloader::profiles::profile_set(true)[0];
        let args = extractor.info_args("https://example.com/v", profile);

        assert!(args.contains(&"--dump-single-json".to_string()));
        assert!(args.contains(&profile.identity_header.to_string()));
        assert!(args.contains(&profile.format_selector.to_string()));
        assert!(args.contains(&"youtube:player_client=android".to_string()));
        assert_eq!(args.last().unwrap(), "https://example.com/v");
    }
}
