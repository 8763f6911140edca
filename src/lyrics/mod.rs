//! Lyrics: LRCLIB search client, lyric parsers, and script conversion.

pub mod lrclib;
pub mod parser;
pub mod variant;

pub use lrclib::{LrclibClient, Song};
pub use variant::ScriptVariant;

/// The selectable lyric lines for a song.
///
/// Synced lyrics win when present (timestamps are discarded for selection),
/// plain lyrics are the fallback, and a song with neither yields an empty
/// sequence; the caller offers manual entry in that case.
pub fn lyric_lines(song: &Song) -> Vec<String> {
    if let Some(synced) = song.synced_lyrics.as_deref()
        && !synced.is_empty()
    {
        return parser::parse_synced(synced)
            .into_iter()
            .map(|l| l.text)
            .collect();
    }
    if let Some(plain) = song.plain_lyrics.as_deref()
        && !plain.is_empty()
    {
        return parser::parse_plain(plain);
    }
    Vec::new()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn song(plain: Option<&str>, synced: Option<&str>) -> Song {
        Song {
            id: 1,
            name: "Test".into(),
            artist: "Artist".into(),
            album: None,
            duration: None,
            plain_lyrics: plain.map(str::to_string),
            synced_lyrics: synced.map(str::to_string),
        }
    }

    #[test]
    fn synced_lyrics_take_priority() {
        let s = song(Some("plain one\nplain two"), Some("[00:01.00]synced one"));
        assert_eq!(lyric_lines(&s), vec!["synced one"]);
    }

    #[test]
    fn plain_lyrics_are_the_fallback() {
        let s = song(Some("plain one\nplain two"), None);
        assert_eq!(lyric_lines(&s), vec!["plain one", "plain two"]);
    }

    #[test]
    fn empty_synced_falls_back_to_plain() {
        let s = song(Some("only plain"), Some(""));
        assert_eq!(lyric_lines(&s), vec!["only plain"]);
    }

    #[test]
    fn no_lyrics_yields_empty_sequence() {
        assert!(lyric_lines(&song(None, None)).is_empty());
    }
}
