//! Spotify Web API artwork provider.
//!
//! Search is gated on a client-credentials bearer token. The token is
//! memoized process-wide with its expiry; refreshing happens under a mutex so
//! concurrent cold-start callers produce a single outbound exchange.

use super::{best_match, ArtCandidate};
use anyhow::Context;
use serde::Deserialize;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::sync::Mutex;
use tracing::warn;

/// A memoized bearer token.
#[derive(Debug, Clone)]
pub struct AuthToken {
    pub value: String,
    pub expires_at_ms: i64,
}

/// Single-flight token store. The mutex is held across the refresh call, so
/// a second caller arriving mid-exchange waits for the first result instead
/// of issuing its own request.
#[derive(Debug, Default)]
pub struct TokenCache {
    slot: Mutex<Option<AuthToken>>,
}

impl TokenCache {
    /// Refresh this long before the nominal expiry.
    const SAFETY_MARGIN_MS: i64 = 60_000;

    /// Return the cached token, or run `refresh` to obtain a new one.
    /// A failed refresh clears the slot and yields `None`; it never raises.
    pub async fn get_with<F, Fut>(&self, refresh: F) -> Option<String>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = anyhow::Result<AuthToken>>,
    {
        let mut slot = self.slot.lock().await;

        if let Some(token) = slot.as_ref()
            && now_ms() < token.expires_at_ms - Self::SAFETY_MARGIN_MS
        {
            return Some(token.value.clone());
        }

        match refresh().await {
            Ok(token) => {
                let value = token.value.clone();
                *slot = Some(token);
                Some(value)
            }
            Err(e) => {
                warn!("token exchange failed: {e:#}");
                *slot = None;
                None
            }
        }
    }
}

fn now_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as i64
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: i64,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    tracks: Option<TrackPage>,
}

#[derive(Debug, Deserialize)]
struct TrackPage {
    #[serde(default)]
    items: Vec<SpotifyTrack>,
}

#[derive(Debug, Deserialize)]
struct SpotifyTrack {
    name: Option<String>,
    #[serde(default)]
    artists: Vec<SpotifyArtist>,
    album: Option<SpotifyAlbum>,
}

#[derive(Debug, Deserialize)]
struct SpotifyArtist {
    name: String,
}

#[derive(Debug, Deserialize)]
struct SpotifyAlbum {
    #[serde(default)]
    images: Vec<SpotifyImage>,
}

#[derive(Debug, Deserialize)]
struct SpotifyImage {
    url: String,
}

#[derive(Debug)]
struct Inner {
    http: reqwest::Client,
    tokens: TokenCache,
    client_id: String,
    client_secret: String,
    api_base: String,
    token_url: String,
}

#[derive(Debug, Clone)]
pub struct SpotifyClient {
    inner: Arc<Inner>,
}

impl SpotifyClient {
    const DEFAULT_API_BASE: &'static str = "https://api.spotify.com";
    const DEFAULT_TOKEN_URL: &'static str = "https://accounts.spotify.com/api/token";

    pub fn new(client_id: String, client_secret: String) -> Self {
        Self {
            inner: Arc::new(Inner {
                http: reqwest::Client::builder()
                    .timeout(std::time::Duration::from_secs(10))
                    .build()
                    .expect("failed to create reqwest client"),
                tokens: TokenCache::default(),
                client_id,
                client_secret,
                api_base: Self::DEFAULT_API_BASE.to_string(),
                token_url: Self::DEFAULT_TOKEN_URL.to_string(),
            }),
        }
    }

    pub(super) async fn lookup(&self, track: &str, artist: &str) -> anyhow::Result<Option<String>> {
        let Some(token) = self
            .inner
            .tokens
            .get_with(|| self.exchange_client_credentials())
            .await
        else {
            return Ok(None);
        };

        let query = format!("{track} {artist}");
        let url = format!(
            "{}/v1/search?q={}&type=track&limit=5",
            self.inner.api_base,
            urlencoding::encode(&query)
        );

        let response = self
            .inner
            .http
            .get(&url)
            .bearer_auth(&token)
            .send()
            .await
            .context("spotify search")?;
        if !response.status().is_success() {
            anyhow::bail!("spotify search returned HTTP {}", response.status());
        }

        let data: SearchResponse = response.json().await.context("parse spotify response")?;
        let items = data.tracks.map(|t| t.items).unwrap_or_default();
        let candidates: Vec<ArtCandidate> = items
            .into_iter()
            .map(|t| ArtCandidate {
                title: t.name.unwrap_or_default(),
                artist: t
                    .artists
                    .iter()
                    .map(|a| a.name.as_str())
                    .collect::<Vec<_>>()
                    .join(" "),
                // The first image is the largest (typically 640x640).
                art_url: t
                    .album
                    .and_then(|a| a.images.into_iter().next())
                    .map(|i| i.url),
            })
            .collect();

        let Some(hit) = best_match(&candidates, track, artist, false) else {
            return Ok(None);
        };
        Ok(hit.art_url.clone())
    }

    async fn exchange_client_credentials(&self) -> anyhow::Result<AuthToken> {
        let params = [
            ("grant_type", "client_credentials"),
            ("client_id", self.inner.client_id.as_str()),
            ("client_secret", self.inner.client_secret.as_str()),
        ];

        let response = self
            .inner
            .http
            .post(&self.inner.token_url)
            .form(&params)
            .send()
            .await
            .context("spotify token request")?;
        if !response.status().is_success() {
            anyhow::bail!("spotify token endpoint returned HTTP {}", response.status());
        }

        let data: TokenResponse = response.json().await.context("parse token response")?;
        Ok(AuthToken {
            value: data.access_token,
            expires_at_ms: now_ms() + data.expires_in * 1000,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn cached_token_is_reused_until_expiry() {
        let cache = TokenCache::default();
        let calls = AtomicUsize::new(0);

        let fetch = || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(AuthToken {
                value: "tok".into(),
                expires_at_ms: now_ms() + 3_600_000,
            })
        };

        assert_eq!(cache.get_with(fetch).await.as_deref(), Some("tok"));
        assert_eq!(cache.get_with(fetch).await.as_deref(), Some("tok"));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn token_within_safety_margin_is_treated_as_absent() {
        let cache = TokenCache::default();
        let calls = AtomicUsize::new(0);

        // Nominally valid for 30s, but inside the 60s margin.
        let fetch = || async {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            Ok(AuthToken {
                value: format!("tok{n}"),
                expires_at_ms: now_ms() + 30_000,
            })
        };

        assert_eq!(cache.get_with(fetch).await.as_deref(), Some("tok0"));
        assert_eq!(cache.get_with(fetch).await.as_deref(), Some("tok1"));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn failed_exchange_yields_none_without_raising() {
        let cache = TokenCache::default();
        let got = cache
            .get_with(|| async { anyhow::bail!("exchange down") })
            .await;
        assert!(got.is_none());
    }

    #[tokio::test]
    async fn concurrent_cold_start_produces_one_exchange() {
        let cache = Arc::new(TokenCache::default());
        let calls = Arc::new(AtomicUsize::new(0));

        let task = |cache: Arc<TokenCache>, calls: Arc<AtomicUsize>| async move {
            cache
                .get_with(|| async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    // Hold the exchange long enough for the other caller to queue up.
                    tokio::time::sleep(std::time::Duration::from_millis(50)).await;
                    Ok(AuthToken {
                        value: "tok".into(),
                        expires_at_ms: now_ms() + 3_600_000,
                    })
                })
                .await
        };

        let (a, b) = tokio::join!(
            tokio::spawn(task(cache.clone(), calls.clone())),
            tokio::spawn(task(cache.clone(), calls.clone()))
        );
        assert_eq!(a.unwrap().as_deref(), Some("tok"));
        assert_eq!(b.unwrap().as_deref(), Some("tok"));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
