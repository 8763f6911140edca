//! QQ Music artwork provider.
//!
//! The upstream web player consumes this endpoint via script-injection JSONP;
//! a native client can hit the same search endpoint directly with
//! `format=json`. Responses occasionally still arrive wrapped in a callback,
//! so the body is unwrapped before decoding. The original 5s JSONP deadline
//! is kept as the request timeout.

use super::{best_match, ArtCandidate};
use anyhow::Context;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct SearchResponse {
    data: Option<SearchData>,
}

#[derive(Debug, Deserialize)]
struct SearchData {
    song: Option<SongList>,
}

#[derive(Debug, Deserialize)]
struct SongList {
    #[serde(default)]
    list: Vec<QqSong>,
}

#[derive(Debug, Deserialize)]
struct QqSong {
    songname: Option<String>,
    albummid: Option<String>,
    #[serde(default)]
    singer: Vec<QqSinger>,
}

#[derive(Debug, Deserialize)]
struct QqSinger {
    name: String,
}

#[derive(Debug, Clone)]
pub struct QqMusicClient {
    client: reqwest::Client,
    base_url: String,
}

impl QqMusicClient {
    const DEFAULT_BASE_URL: &'static str = "https://c.y.qq.com";
    const ART_BASE_URL: &'static str = "https://y.gtimg.cn/music/photo_new";

    pub fn new() -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(std::time::Duration::from_secs(5))
                .build()
                .expect("failed to create reqwest client"),
            base_url: Self::DEFAULT_BASE_URL.to_string(),
        }
    }

    pub(super) async fn lookup(&self, track: &str, artist: &str) -> anyhow::Result<Option<String>> {
        let query = format!("{track} {artist}");
        let url = format!(
            "{}/soso/fcgi-bin/client_search_cp?p=1&n=5&w={}&format=json",
            self.base_url,
            urlencoding::encode(&query)
        );

        let response = self.client.get(&url).send().await.context("qq search")?;
        if !response.status().is_success() {
            anyhow::bail!("qq search returned HTTP {}", response.status());
        }

        let body = response.text().await.context("read qq response")?;
        let data: SearchResponse =
            serde_json::from_str(strip_callback(&body)).context("parse qq response")?;

        let songs = data
            .data
            .and_then(|d| d.song)
            .map(|s| s.list)
            .unwrap_or_default();
        let candidates: Vec<ArtCandidate> = songs
            .into_iter()
            .map(|s| ArtCandidate {
                title: s.songname.unwrap_or_default(),
                artist: s
                    .singer
                    .iter()
                    .map(|a| a.name.as_str())
                    .collect::<Vec<_>>()
                    .join(" "),
                art_url: s
                    .albummid
                    .map(|mid| format!("{}/T002R300x300M000{mid}.jpg", Self::ART_BASE_URL)),
            })
            .collect();

        // QQ titles are often decorated, so containment is checked both ways.
        let Some(hit) = best_match(&candidates, track, artist, true) else {
            return Ok(None);
        };
        Ok(hit.art_url.clone())
    }
}

impl Default for QqMusicClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Strip a `callback( ... )` wrapper if present, returning the inner JSON.
fn strip_callback(body: &str) -> &str {
    let trimmed = body.trim();
    if trimmed.starts_with('{') {
        return trimmed;
    }
    let Some(open) = trimmed.find('(') else {
        return trimmed;
    };
    let Some(close) = trimmed.rfind(')') else {
        return trimmed;
    };
    if open < close {
        trimmed[open + 1..close].trim()
    } else {
        trimmed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_jsonp_wrapper() {
        assert_eq!(strip_callback("cb({\"a\":1})"), "{\"a\":1}");
        assert_eq!(strip_callback("  {\"a\":1}  "), "{\"a\":1}");
        assert_eq!(strip_callback("not json"), "not json");
    }

    #[test]
    fn decodes_wrapped_search_response() {
        let raw = r#"qqCallback1({"data":{"song":{"list":[
            {"songname":"Foo","albummid":"abc123","singer":[{"name":"Bar"}]}
        ]}}})"#;
        let data: SearchResponse = serde_json::from_str(strip_callback(raw)).unwrap();
        let list = data.data.unwrap().song.unwrap().list;
        assert_eq!(list[0].songname.as_deref(), Some("Foo"));
        assert_eq!(list[0].singer[0].name, "Bar");
    }

    #[test]
    fn artwork_url_is_built_from_albummid() {
        let url = format!(
            "{}/T002R300x300M000{}.jpg",
            QqMusicClient::ART_BASE_URL,
            "abc123"
        );
        assert_eq!(
            url,
            "https://y.gtimg.cn/music/photo_new/T002R300x300M000abc123.jpg"
        );
    }
}
