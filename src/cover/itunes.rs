//! iTunes Search API artwork provider.
//!
//! Plain JSON REST, no auth. https://itunes.apple.com/search

use super::{best_match, ArtCandidate};
use anyhow::Context;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<ItunesTrack>,
}

#[derive(Debug, Deserialize)]
struct ItunesTrack {
    #[serde(rename = "trackName")]
    track_name: Option<String>,
    #[serde(rename = "artistName")]
    artist_name: Option<String>,
    #[serde(rename = "artworkUrl100")]
    artwork_url_100: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ItunesClient {
    client: reqwest::Client,
    base_url: String,
}

impl ItunesClient {
    const DEFAULT_BASE_URL: &'static str = "https://itunes.apple.com";

    pub fn new() -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(std::time::Duration::from_secs(10))
                .build()
                .expect("failed to create reqwest client"),
            base_url: Self::DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Returns `Ok(None)` when nothing usable was found; `Err` only for
    /// transport/decoding problems (translated to not-found by the caller).
    pub(super) async fn lookup(&self, track: &str, artist: &str) -> anyhow::Result<Option<String>> {
        let query = format!("{track} {artist}");
        let url = format!(
            "{}/search?term={}&entity=song&limit=5",
            self.base_url,
            urlencoding::encode(&query)
        );

        let response = self.client.get(&url).send().await.context("itunes search")?;
        if !response.status().is_success() {
            anyhow::bail!("itunes search returned HTTP {}", response.status());
        }

        let data: SearchResponse = response.json().await.context("parse itunes response")?;
        let candidates: Vec<ArtCandidate> = data
            .results
            .into_iter()
            .map(|r| ArtCandidate {
                title: r.track_name.unwrap_or_default(),
                artist: r.artist_name.unwrap_or_default(),
                art_url: r.artwork_url_100,
            })
            .collect();

        let Some(hit) = best_match(&candidates, track, artist, false) else {
            return Ok(None);
        };

        // iTunes hands back a 100x100 thumbnail; the same path serves 600x600.
        Ok(hit
            .art_url
            .as_ref()
            .map(|u| u.replace("100x100", "600x600")))
    }
}

impl Default for ItunesClient {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_tolerates_missing_fields() {
        let raw = r#"{"results": [{"trackName": "Foo"}, {}]}"#;
        let data: SearchResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(data.results.len(), 2);
        assert!(data.results[1].artwork_url_100.is_none());
    }

    #[test]
    fn artwork_url_upscale() {
        let url = "https://is1.mzstatic.com/a/100x100bb.jpg".replace("100x100", "600x600");
        assert_eq!(url, "https://is1.mzstatic.com/a/600x600bb.jpg");
    }
}
