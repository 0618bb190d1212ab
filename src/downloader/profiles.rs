// Extraction client profiles
//
// Each profile bundles a request identity (User-Agent plus extra headers)
// with the format preferences handed to the extractor. The set is ordered,
// fixed at process start, and never depends on request content; the
// fallback engine walks it front to back.

/// Low-bandwidth selectors: the playback client renders tiny frames, so
/// the smallest usable stream wins.
pub const VIDEO_FORMAT: &str = "worst[ext=mp4]/worstvideo[ext=mp4]/worstvideo/worst/best";
pub const AUDIO_FORMAT: &str = "worstaudio/worst/bestaudio/best";

// The last-resort profile drops the ext filters entirely; some sites only
// expose a handful of muxed formats.
const VIDEO_FORMAT_BASIC: &str = "worst/best";
const AUDIO_FORMAT_BASIC: &str = "worstaudio/bestaudio";

// Each profile presents its own identity; the set stays useful when a
// site starts rejecting one of them.
const ANDROID_UA: &str = "com.google.android.youtube/19.09.37 (Linux; U; Android 11) gzip";
const EMBEDDED_UA: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/121.0.0.0 Safari/537.36";
const MUSIC_UA: &str = "Mozilla/5.0 (X11; Linux x86_64; rv:124.0) Gecko/20100101 Firefox/124.0";
const BASIC_UA: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.3 Safari/605.1.15";

#[derive(Debug, Clone)]
pub struct ClientProfile {
    pub name: &'static str,
    /// User-Agent presented to the media host
    pub identity_header: &'static str,
    pub extra_headers: Vec<(&'static str, &'static str)>,
    /// Player-client hint for youtube-class extractors
    pub player_client: &'static str,
    pub format_selector: &'static str,
}

/// The fixed profile order, with format selectors resolved for the
/// requested output kind.
pub fn profile_set(want_video: bool) -> Vec<ClientProfile> {
    let format = if want_video { VIDEO_FORMAT } else { AUDIO_FORMAT };
    let basic = if want_video {
        VIDEO_FORMAT_BASIC
    } else {
        AUDIO_FORMAT_BASIC
    };

    vec![
        ClientProfile {
            name: "android-app",
            identity_header: ANDROID_UA,
            extra_headers: vec![("X-YouTube-Client-Name", "3")],
            player_client: "android",
            format_selector: format,
        },
        ClientProfile {
            name: "web-embedded",
            identity_header: EMBEDDED_UA,
            extra_headers: vec![("Referer", "https://www.youtube.com/embed/")],
            player_client: "web_embedded",
            format_selector: format,
        },
        ClientProfile {
            name: "music-focused",
            identity_header: MUSIC_UA,
            extra_headers: vec![("Referer", "https://music.youtube.com/")],
            player_client: "web_music",
            format_selector: format,
        },
        ClientProfile {
            name: "web-basic",
            identity_header: BASIC_UA,
            extra_headers: Vec::new(),
            player_client: "web",
            format_selector: basic,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_is_fixed() {
        let names: Vec<&str> = profile_set(true).iter().map(|p| p.name).collect();
        assert_eq!(
            names,
            vec!["android-app", "web-embedded", "music-focused", "web-basic"]
        );
        let audio_names: Vec<&str> = profile_set(false).iter().map(|p| p.name).collect();
        assert_eq!(names, audio_names);
    }

    #[test]
    fn selector_follows_requested_kind() {
        assert_eq!(profile_set(true)[0].format_selector, VIDEO_FORMAT);
        assert_eq!(profile_set(false)[0].format_selector, AUDIO_FORMAT);
    }

    #[test]
    fn every_profile_has_its_own_identity() {
        let profiles = profile_set(true);
        for (i, a) in profiles.iter().enumerate() {
            for b in &profiles[i + 1..] {
                assert_ne!(a.identity_header, b.identity_header);
                assert_ne!(a.player_client, b.player_client);
            }
        }
    }

    #[test]
    fn last_profile_uses_the_basic_selector() {
        let video = profile_set(true);
        assert_eq!(video.last().unwrap().format_selector, "worst/best");
        let audio = profile_set(false);
        assert_eq!(
            audio.last().unwrap().format_selector,
            "worstaudio/bestaudio"
        );
    }
}
