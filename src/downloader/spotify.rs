// Spotify Web API lookup collaborator
//
// Client-credentials flow only; no user authorization is involved. Track
// and playlist references become plain search strings that the extractor
// resolves through its default search.

use async_trait::async_trait;
use reqwest::Client;

use super::errors::AcquireError;
use super::resolver::{SpotifyResolution, SpotifyResolver};

const TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
const API_BASE: &str = "https://api.spotify.com/v1";

pub struct SpotifyClient {
    http: Client,
    client_id: String,
    client_secret: String,
}

impl SpotifyClient {
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        }
    }

    /// Extract the object id from `open.spotify.com/<kind>/<id>` and
    /// `spotify:<kind>:<id>` references.
    fn reference_id(reference: &str, kind: &str) -> Option<String> {
        let uri_prefix = format!("spotify:{}:", kind);
        if let Some(id) = reference.strip_prefix(&uri_prefix) {
            return Some(id.to_string());
        }

        let marker = format!("open.spotify.com/{}/", kind);
        let at = reference.find(&marker)?;
        let tail = &reference[at + marker.len()..];
        let id: String = tail
            .chars()
            .take_while(|c| c.is_ascii_alphanumeric())
            .collect();
        if id.is_empty() {
            None
        } else {
            Some(id)
        }
    }

    async fn token(&self) -> Result<String, AcquireError> {
        let response = self
            .http
            .post(TOKEN_URL)
            .basic_auth(&self.client_id, Some(&self.client_secret))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await
            .map_err(|e| AcquireError::Resolution(format!("Spotify token request: {}", e)))?;

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| AcquireError::Resolution(format!("Spotify token response: {}", e)))?;

        json["access_token"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| {
                AcquireError::Resolution("Spotify token response had no access_token".to_string())
            })
    }

    async fn get(&self, token: &str, path: &str) -> Result<serde_json::Value, AcquireError> {
        let response = self
            .http
            .get(format!("{}{}", API_BASE, path))
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| AcquireError::Resolution(format!("Spotify lookup: {}", e)))?;

        if !response.status().is_success() {
            return Err(AcquireError::Resolution(format!(
                "Spotify lookup returned {}",
                response.status()
            )));
        }

        response
            .json()
            .await
            .map_err(|e| AcquireError::Resolution(format!("Spotify lookup body: {}", e)))
    }

    /// "<artists> <title>" — enough for the extractor's default search to
    /// land on the right upload.
    fn search_string(track: &serde_json::Value) -> String {
        let artists = track["artists"]
            .as_array()
            .map(|list| {
                list.iter()
                    .filter_map(|a| a["name"].as_str())
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .unwrap_or_default();
        let name = track["name"].as_str().unwrap_or_default();
        format!("{} {}", artists, name).trim().to_string()
    }
}

#[async_trait]
impl SpotifyResolver for SpotifyClient {
    async fn resolve(
        &self,
        reference: &str,
    ) -> Result<Option<SpotifyResolution>, AcquireError> {
        if let Some(id) = Self::reference_id(reference, "track") {
            let token = self.token().await?;
            let track = self.get(&token, &format!("/tracks/{}", id)).await?;
            return Ok(Some(SpotifyResolution::Track(Self::search_string(&track))));
        }

        if let Some(id) = Self::reference_id(reference, "playlist") {
            let token = self.token().await?;
            let page = self
                .get(&token, &format!("/playlists/{}/tracks?limit=100", id))
                .await?;
            let entries: Vec<String> = page["items"]
                .as_array()
                .map(|items| {
                    items
                        .iter()
                        .filter_map(|item| {
                            item["track"]["external_urls"]["spotify"]
                                .as_str()
                                .map(str::to_string)
                        })
                        .collect()
                })
                .unwrap_or_default();
            return Ok(Some(SpotifyResolution::Playlist(entries)));
        }

        Ok(None)
    }
}
