//! LRCLIB API client
//!
//! LRCLIB is a free lyrics API; search results carry both plain and
//! synchronized (LRC format) lyrics when available.
//! API Documentation: https://lrclib.net/docs

use serde::Deserialize;

/// A song as returned by LRCLIB search. Immutable once fetched.
#[derive(Debug, Deserialize, Clone)]
pub struct Song {
    pub id: i64,
    #[serde(rename = "trackName")]
    pub name: String,
    #[serde(rename = "artistName")]
    pub artist: String,
    #[serde(rename = "albumName")]
    pub album: Option<String>,
    /// Track length in seconds.
    pub duration: Option<f64>,
    #[serde(rename = "plainLyrics")]
    pub plain_lyrics: Option<String>,
    #[serde(rename = "syncedLyrics")]
    pub synced_lyrics: Option<String>,
}

/// LRCLIB API client
#[derive(Debug, Clone)]
pub struct LrclibClient {
    client: reqwest::Client,
    base_url: String,
}

impl LrclibClient {
    const DEFAULT_BASE_URL: &'static str = "https://lrclib.net/api";
    const USER_AGENT: &'static str = "lyricard/0.1.0 (https://github.com/lyricard)";

    pub fn new() -> Self {
        Self {
            client: reqwest::Client::builder()
                .user_agent(Self::USER_AGENT)
                .timeout(std::time::Duration::from_secs(10))
                .build()
                .expect("failed to create reqwest client"),
            base_url: Self::DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Free-text song search. Transport and HTTP failures surface as errors
    /// with a user-presentable message; the caller keeps them retryable.
    pub async fn search(&self, query: &str) -> anyhow::Result<Vec<Song>> {
        let url = format!("{}/search?q={}", self.base_url, urlencoding::encode(query));

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| anyhow::anyhow!("search request failed: {e}"))?;

        if !response.status().is_success() {
            anyhow::bail!("search failed (HTTP {}), try again later", response.status());
        }

        let songs: Vec<Song> = response
            .json()
            .await
            .map_err(|e| anyhow::anyhow!("unexpected search response: {e}"))?;
        Ok(songs)
    }
}

impl Default for LrclibClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Format a duration in seconds as `m:ss` for list display.
pub fn format_duration(seconds: Option<f64>) -> String {
    match seconds {
        Some(s) if s > 0.0 => {
            let total = s as u64;
            format!("{}:{:02}", total / 60, total % 60)
        }
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duration_formats_minutes_and_seconds() {
        assert_eq!(format_duration(Some(225.0)), "3:45");
        assert_eq!(format_duration(Some(59.8)), "0:59");
        assert_eq!(format_duration(None), "");
    }

    #[test]
    fn song_deserializes_with_optional_fields_absent() {
        let raw = r#"{"id": 7, "trackName": "Foo", "artistName": "Bar"}"#;
        let song: Song = serde_json::from_str(raw).unwrap();
        assert_eq!(song.name, "Foo");
        assert!(song.album.is_none());
        assert!(song.plain_lyrics.is_none());
        assert!(song.synced_lyrics.is_none());
    }
}
