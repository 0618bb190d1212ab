// Artifact cache
//
// Converted artifacts are named deterministically from the media id (plus
// target dimensions for video), so presence is a plain existence check
// against the data directory. The check runs strictly before any fetch or
// conversion; a hit skips that work entirely.

use std::path::{Path, PathBuf};

pub const AUDIO_EXT: &str = "dfpwm";
pub const VIDEO_EXT: &str = "32v";

pub fn audio_name(media_id: &str) -> String {
    format!("{}.{}", media_id, AUDIO_EXT)
}

pub fn video_name(media_id: &str, width: u32, height: u32) -> String {
    format!("{}_{}x{}.{}", media_id, width, height, VIDEO_EXT)
}

/// Presence predicates over the artifact store. Injectable so tests can
/// observe when (and whether) the pipeline consults the cache.
pub trait ArtifactStore: Send + Sync {
    fn audio_present(&self, media_id: &str) -> bool;
    fn video_present(&self, media_id: &str, width: u32, height: u32) -> bool;

    /// Absolute destination for an artifact name.
    fn artifact_path(&self, name: &str) -> PathBuf;

    /// Called once before conversions write into the store.
    fn prepare(&self) -> std::io::Result<()> {
        Ok(())
    }
}

pub struct DiskCache {
    data_dir: PathBuf,
}

impl DiskCache {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

impl ArtifactStore for DiskCache {
    fn audio_present(&self, media_id: &str) -> bool {
        self.artifact_path(&audio_name(media_id)).exists()
    }

    fn video_present(&self, media_id: &str, width: u32, height: u32) -> bool {
        self.artifact_path(&video_name(media_id, width, height))
            .exists()
    }

    fn artifact_path(&self, name: &str) -> PathBuf {
        self.data_dir.join(name)
    }

    fn prepare(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.data_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_deterministic() {
        assert_eq!(audio_name("dQw4w9WgXcQ"), "dQw4w9WgXcQ.dfpwm");
        assert_eq!(video_name("dQw4w9WgXcQ", 640, 360), "dQw4w9WgXcQ_640x360.32v");
    }

    #[test]
    fn presence_is_an_existence_check() {
        let dir = tempfile::tempdir().unwrap();
        let cache = DiskCache::new(dir.path());

        assert!(!cache.audio_present("abc"));
        assert!(!cache.video_present("abc", 640, 360));

        std::fs::write(dir.path().join("abc.dfpwm"), b"x").unwrap();
        std::fs::write(dir.path().join("abc_640x360.32v"), b"x").unwrap();

        assert!(cache.audio_present("abc"));
        assert!(cache.video_present("abc", 640, 360));
        // other dimensions are a different cache key
        assert!(!cache.video_present("abc", 320, 200));
    }

    #[test]
    fn prepare_creates_the_data_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a/b");
        let cache = DiskCache::new(&nested);
        cache.prepare().unwrap();
        assert!(nested.is_dir());
    }
}
