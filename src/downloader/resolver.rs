// Spotify reference resolution
//
// Expands a Spotify reference into a primary search string plus a
// continuation queue of further references. Non-Spotify references pass
// through untouched, as does everything when no lookup collaborator is
// wired in.

use async_trait::async_trait;

use super::errors::AcquireError;

/// What a Spotify reference resolved to
#[derive(Debug, Clone, PartialEq)]
pub enum SpotifyResolution {
    /// A single track, already turned into a search string
    Track(String),
    /// An ordered multi-track source; entries are still Spotify references
    Playlist(Vec<String>),
}

/// Spotify lookup collaborator. `Ok(None)` means "not a Spotify
/// reference"; lookup failures propagate as `Resolution` errors.
#[async_trait]
pub trait SpotifyResolver: Send + Sync {
    async fn resolve(&self, reference: &str)
        -> Result<Option<SpotifyResolution>, AcquireError>;
}

/// A resolved request: the primary URL/search string and the continuation
/// queue, first entry excluded.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolved {
    pub url: String,
    pub queue: Vec<String>,
}

impl Resolved {
    fn passthrough(reference: &str) -> Self {
        Self {
            url: reference.to_string(),
            queue: Vec::new(),
        }
    }
}

pub struct UrlResolver<'a> {
    spotify: Option<&'a dyn SpotifyResolver>,
}

impl<'a> UrlResolver<'a> {
    pub fn new(spotify: Option<&'a dyn SpotifyResolver>) -> Self {
        Self { spotify }
    }

    pub async fn resolve(&self, reference: &str) -> Result<Resolved, AcquireError> {
        let Some(spotify) = self.spotify else {
            return Ok(Resolved::passthrough(reference));
        };

        match spotify.resolve(reference).await? {
            None => Ok(Resolved::passthrough(reference)),
            Some(SpotifyResolution::Track(search)) => Ok(Resolved {
                url: search,
                queue: Vec::new(),
            }),
            Some(SpotifyResolution::Playlist(mut entries)) => {
                if entries.is_empty() {
                    return Err(AcquireError::Resolution(
                        "playlist has no tracks".to_string(),
                    ));
                }
                let first = entries.remove(0);
                // the consumed first entry becomes the primary item; the
                // rest stays unresolved until its own request comes in
                let first_resolution = spotify.resolve(&first).await?;
                let url = match first_resolution {
                    Some(SpotifyResolution::Track(search)) => search,
                    _ => first,
                };
                Ok(Resolved {
                    url,
                    queue: entries,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FakeSpotify;

    #[async_trait]
    impl SpotifyResolver for FakeSpotify {
        async fn resolve(
            &self,
            reference: &str,
        ) -> Result<Option<SpotifyResolution>, AcquireError> {
            match reference {
                "spotify:track:1" => Ok(Some(SpotifyResolution::Track(
                    "Artist One Song".to_string(),
                ))),
                "spotify:playlist:p" => Ok(Some(SpotifyResolution::Playlist(vec![
                    "spotify:track:1".to_string(),
                    "spotify:track:2".to_string(),
                    "spotify:track:3".to_string(),
                ]))),
                "spotify:playlist:empty" => Ok(Some(SpotifyResolution::Playlist(Vec::new()))),
                "spotify:broken" => Err(AcquireError::Resolution("api down".to_string())),
                _ => Ok(None),
            }
        }
    }

    #[tokio::test]
    async fn passthrough_without_collaborator() {
        let resolver = UrlResolver::new(None);
        let resolved = resolver.resolve("https://example.com/v").await.unwrap();
        assert_eq!(resolved, Resolved::passthrough("https://example.com/v"));
    }

    #[tokio::test]
    async fn non_spotify_references_pass_through() {
        let spotify = FakeSpotify;
        let resolver = UrlResolver::new(Some(&spotify));
        let resolved = resolver.resolve("https://example.com/v").await.unwrap();
        assert_eq!(resolved.url, "https://example.com/v");
        assert!(resolved.queue.is_empty());
    }

    #[tokio::test]
    async fn tracks_resolve_to_a_search_string() {
        let spotify = FakeSpotify;
        let resolver = UrlResolver::new(Some(&spotify));
        let resolved = resolver.resolve("spotify:track:1").await.unwrap();
        assert_eq!(resolved.url, "Artist One Song");
        assert!(resolved.queue.is_empty());
    }

    #[tokio::test]
    async fn playlists_resolve_first_entry_and_queue_the_rest() {
        let spotify = FakeSpotify;
        let resolver = UrlResolver::new(Some(&spotify));
        let resolved = resolver.resolve("spotify:playlist:p").await.unwrap();
        assert_eq!(resolved.url, "Artist One Song");
        assert_eq!(
            resolved.queue,
            vec!["spotify:track:2".to_string(), "spotify:track:3".to_string()]
        );
    }

    #[tokio::test]
    async fn empty_playlists_are_a_resolution_failure() {
        let spotify = FakeSpotify;
        let resolver = UrlResolver::new(Some(&spotify));
        let err = resolver.resolve("spotify:playlist:empty").await.unwrap_err();
        assert!(matches!(err, AcquireError::Resolution(_)));
    }

    #[tokio::test]
    async fn collaborator_failures_propagate() {
        let spotify = FakeSpotify;
        let resolver = UrlResolver::new(Some(&spotify));
        let err = resolver.resolve("spotify:broken").await.unwrap_err();
        assert!(matches!(err, AcquireError::Resolution(_)));
    }
}
