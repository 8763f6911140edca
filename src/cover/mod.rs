//! Album artwork resolution.
//!
//! A fixed, configurable list of providers is tried in order; the first one
//! that yields an artwork URL wins. Provider failures of any kind (transport,
//! HTTP status, empty results, missing artwork field) degrade to "not found"
//! and are only reported to the log; the caller falls back to the placeholder
//! cover.

pub mod itunes;
pub mod qq;
pub mod spotify;

pub use itunes::ItunesClient;
pub use qq::QqMusicClient;
pub use spotify::SpotifyClient;

use crate::config::CoverConfig;
use tracing::{debug, info, warn};

/// One provider search hit, reduced to the fields the match heuristic needs.
#[derive(Debug, Clone)]
pub struct ArtCandidate {
    pub title: String,
    pub artist: String,
    pub art_url: Option<String>,
}

/// Pick the most likely candidate for (track, artist).
///
/// Pass 1: normalized title equals the query title and the candidate artist
/// string contains the query artist. Pass 2: title equals or contains the
/// query title; with `loose_both_ways` the query containing the candidate
/// title also counts. Fallback: the first candidate. Total over non-empty
/// input, first match wins.
pub fn best_match<'a>(
    candidates: &'a [ArtCandidate],
    track: &str,
    artist: &str,
    loose_both_ways: bool,
) -> Option<&'a ArtCandidate> {
    let track_norm = normalize(track);
    let artist_norm = normalize(artist);

    for c in candidates {
        if normalize(&c.title) == track_norm && normalize(&c.artist).contains(&artist_norm) {
            return Some(c);
        }
    }

    for c in candidates {
        let title = normalize(&c.title);
        if title == track_norm
            || title.contains(&track_norm)
            || (loose_both_ways && !title.is_empty() && track_norm.contains(&title))
        {
            return Some(c);
        }
    }

    candidates.first()
}

fn normalize(s: &str) -> String {
    s.trim().to_lowercase()
}

/// A configured artwork provider. Enum dispatch keeps the per-provider
/// transports (plain REST, token-gated REST) behind one call.
#[derive(Debug, Clone)]
pub enum CoverSource {
    Itunes(ItunesClient),
    Spotify(SpotifyClient),
    Qq(QqMusicClient),
    #[cfg(test)]
    Fixed(FixedSource),
}

impl CoverSource {
    pub fn name(&self) -> &'static str {
        match self {
            CoverSource::Itunes(_) => "itunes",
            CoverSource::Spotify(_) => "spotify",
            CoverSource::Qq(_) => "qq",
            #[cfg(test)]
            CoverSource::Fixed(_) => "fixed",
        }
    }

    /// Resolve artwork for (track, artist). Never fails: any underlying error
    /// is logged and reported as `None`.
    pub async fn fetch_art(&self, track: &str, artist: &str) -> Option<String> {
        let result = match self {
            CoverSource::Itunes(c) => c.lookup(track, artist).await,
            CoverSource::Spotify(c) => c.lookup(track, artist).await,
            CoverSource::Qq(c) => c.lookup(track, artist).await,
            #[cfg(test)]
            CoverSource::Fixed(c) => c.lookup(),
        };
        match result {
            Ok(url) => url,
            Err(e) => {
                warn!("cover provider {} failed: {e:#}", self.name());
                None
            }
        }
    }
}

#[cfg(test)]
#[derive(Debug, Clone)]
pub struct FixedSource {
    pub url: Option<String>,
    pub calls: std::sync::Arc<std::sync::atomic::AtomicUsize>,
}

#[cfg(test)]
impl FixedSource {
    pub fn new(url: Option<&str>) -> Self {
        Self {
            url: url.map(str::to_string),
            calls: std::sync::Arc::new(std::sync::atomic::AtomicUsize::new(0)),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(std::sync::atomic::Ordering::SeqCst)
    }

    fn lookup(&self) -> anyhow::Result<Option<String>> {
        self.calls
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        Ok(self.url.clone())
    }
}

/// Multi-provider cascade. Order comes from configuration, not code.
#[derive(Debug, Clone)]
pub struct CoverResolver {
    sources: Vec<CoverSource>,
}

impl CoverResolver {
    pub fn new(sources: Vec<CoverSource>) -> Self {
        Self { sources }
    }

    pub fn from_config(cfg: &CoverConfig) -> Self {
        let mut sources = Vec::new();
        for name in &cfg.providers {
            match name.as_str() {
                "itunes" => sources.push(CoverSource::Itunes(ItunesClient::new())),
                "spotify" => sources.push(CoverSource::Spotify(SpotifyClient::new(
                    cfg.spotify_client_id.clone(),
                    cfg.spotify_client_secret.clone(),
                ))),
                "qq" => sources.push(CoverSource::Qq(QqMusicClient::new())),
                other => warn!("unknown cover provider in config: {other:?}"),
            }
        }
        Self { sources }
    }

    /// Try each provider in order; first hit wins and later providers are
    /// never contacted.
    pub async fn resolve(&self, track: &str, artist: &str) -> Option<String> {
        for source in &self.sources {
            debug!("trying cover provider {}", source.name());
            if let Some(url) = source.fetch_art(track, artist).await {
                info!("cover resolved via {}", source.name());
                return Some(url);
            }
        }
        debug!("no cover found for {track:?} / {artist:?}");
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(title: &str, artist: &str) -> ArtCandidate {
        ArtCandidate {
            title: title.into(),
            artist: artist.into(),
            art_url: Some(format!("http://art/{title}/{artist}")),
        }
    }

    #[test]
    fn exact_match_is_first_match_wins() {
        let candidates = vec![candidate("Foo", "Bar"), candidate("Foo", "Baz Bar")];
        let best = best_match(&candidates, "Foo", "Bar", false).unwrap();
        assert_eq!(best.artist, "Bar");
    }

    #[test]
    fn exact_match_requires_artist_substring() {
        let candidates = vec![candidate("Foo", "Someone Else"), candidate("Foo", "The Bar Band")];
        let best = best_match(&candidates, "Foo", "bar", false).unwrap();
        assert_eq!(best.artist, "The Bar Band");
    }

    #[test]
    fn loose_pass_accepts_title_containment() {
        let candidates = vec![candidate("Other", "X"), candidate("Foo (Live)", "X")];
        let best = best_match(&candidates, "Foo", "Nobody", false).unwrap();
        assert_eq!(best.title, "Foo (Live)");
    }

    #[test]
    fn loose_both_ways_accepts_query_containing_candidate() {
        let candidates = vec![candidate("Zzz", "X"), candidate("Foo", "X")];
        // Query "Foo - Remastered" contains candidate title "Foo".
        assert!(best_match(&candidates, "Foo - Remastered", "Nobody", false).is_some());
        let best = best_match(&candidates, "Foo - Remastered", "Nobody", true).unwrap();
        assert_eq!(best.title, "Foo");
    }

    #[test]
    fn falls_back_to_first_candidate() {
        let candidates = vec![candidate("A", "B"), candidate("C", "D")];
        let best = best_match(&candidates, "Nothing", "Matches", false).unwrap();
        assert_eq!(best.title, "A");
    }

    #[test]
    fn empty_candidates_yield_none() {
        assert!(best_match(&[], "x", "y", false).is_none());
    }

    #[test]
    fn normalization_is_case_insensitive_and_trimmed() {
        let candidates = vec![candidate("  FOO  ", "BAR")];
        let best = best_match(&candidates, "foo", "bar", false).unwrap();
        assert_eq!(best.artist, "BAR");
    }

    #[tokio::test]
    async fn cascade_stops_at_first_hit() {
        let a = FixedSource::new(None);
        let b = FixedSource::new(Some("http://b/art.jpg"));
        let c = FixedSource::new(Some("http://c/art.jpg"));
        let resolver = CoverResolver::new(vec![
            CoverSource::Fixed(a.clone()),
            CoverSource::Fixed(b.clone()),
            CoverSource::Fixed(c.clone()),
        ]);

        let url = resolver.resolve("track", "artist").await;
        assert_eq!(url.as_deref(), Some("http://b/art.jpg"));
        assert_eq!(a.call_count(), 1);
        assert_eq!(b.call_count(), 1);
        assert_eq!(c.call_count(), 0);
    }

    #[tokio::test]
    async fn cascade_reports_not_found_when_all_miss() {
        let a = FixedSource::new(None);
        let resolver = CoverResolver::new(vec![CoverSource::Fixed(a)]);
        assert!(resolver.resolve("track", "artist").await.is_none());
    }
}
