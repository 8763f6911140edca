//! Card content: turning a lyric selection into display lines, and the full
//! description of the exported artifact.

use rand::Rng;
use std::collections::BTreeSet;

/// Marker line inserted where the selection skips over unselected lyrics.
pub const GAP_MARKER: &str = "...";

/// Shown instead of an empty card when nothing is selected.
pub const EMPTY_SELECTION_PROMPT: &str = "Tap some lyrics to fill the card";

/// Preset card background colors.
pub const PALETTE: &[&str] = &[
    "#f6d365", "#fda085", "#a1c4fd", "#c2e9fb", "#fbc2eb", "#84fab0", "#d4fc79", "#8fd3f4",
];

/// Uniform random pick from the preset palette, the default for a new card.
pub fn random_palette_color() -> &'static str {
    PALETTE[rand::rng().random_range(0..PALETTE.len())]
}

/// Build the card's display lines from the selected line indices.
///
/// Indices are walked in ascending order; a gap marker goes between two
/// selected lines whenever at least one unselected line sits between them.
/// No marker ever leads the output. An empty selection yields the
/// placeholder prompt rather than an empty sequence.
pub fn compose_lines(lines: &[String], selection: &BTreeSet<usize>) -> Vec<String> {
    let mut out = Vec::new();
    let mut prev: Option<usize> = None;

    for &idx in selection {
        let Some(text) = lines.get(idx) else {
            continue;
        };
        if let Some(p) = prev
            && idx > p + 1
        {
            out.push(GAP_MARKER.to_string());
        }
        out.push(text.clone());
        prev = Some(idx);
    }

    if out.is_empty() {
        out.push(EMPTY_SELECTION_PROMPT.to_string());
    }
    out
}

/// Light or dark card text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextMode {
    #[default]
    Dark,
    Light,
}

impl TextMode {
    pub fn toggled(self) -> Self {
        match self {
            TextMode::Dark => TextMode::Light,
            TextMode::Light => TextMode::Dark,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TextMode::Dark => "dark",
            TextMode::Light => "light",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
}

impl Alignment {
    pub fn next(self) -> Self {
        match self {
            Alignment::Left => Alignment::Center,
            Alignment::Center => Alignment::Right,
            Alignment::Right => Alignment::Left,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Alignment::Left => "left",
            Alignment::Center => "center",
            Alignment::Right => "right",
        }
    }
}

/// The cover slot: either resolved artwork or the generated placeholder
/// showing the song's initial.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoverImage {
    Placeholder { initial: char },
    Url(String),
}

/// Default placeholder cover for a song: its first character, uppercased.
pub fn placeholder_cover(song_name: &str) -> CoverImage {
    let initial = song_name
        .chars()
        .next()
        .map(|c| c.to_uppercase().next().unwrap_or(c))
        .unwrap_or('?');
    CoverImage::Placeholder { initial }
}

/// Everything that determines the exported artifact. Fully populated before
/// the exporter is ever invoked.
#[derive(Debug, Clone)]
pub struct CardDescription {
    pub song_name: String,
    pub artist_name: String,
    pub lines: Vec<String>,
    pub background: String,
    pub text_mode: TextMode,
    pub alignment: Alignment,
    pub line_spacing: f32,
    pub cover: CoverImage,
}

impl CardDescription {
    pub const DEFAULT_LINE_SPACING: f32 = 1.6;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("line{i}")).collect()
    }

    #[test]
    fn gap_markers_between_non_adjacent_runs() {
        let selection: BTreeSet<usize> = [0, 1, 3, 4, 7].into_iter().collect();
        assert_eq!(
            compose_lines(&lines(8), &selection),
            vec!["line0", "line1", "...", "line3", "line4", "...", "line7"]
        );
    }

    #[test]
    fn adjacent_selection_has_no_markers() {
        let selection: BTreeSet<usize> = [2, 3, 4].into_iter().collect();
        assert_eq!(
            compose_lines(&lines(6), &selection),
            vec!["line2", "line3", "line4"]
        );
    }

    #[test]
    fn no_marker_before_first_selected_line() {
        let selection: BTreeSet<usize> = [5].into_iter().collect();
        assert_eq!(compose_lines(&lines(8), &selection), vec!["line5"]);
    }

    #[test]
    fn empty_selection_yields_placeholder_prompt() {
        let selection = BTreeSet::new();
        assert_eq!(
            compose_lines(&lines(4), &selection),
            vec![EMPTY_SELECTION_PROMPT]
        );
    }

    #[test]
    fn out_of_range_indices_are_skipped() {
        let selection: BTreeSet<usize> = [1, 99].into_iter().collect();
        assert_eq!(compose_lines(&lines(3), &selection), vec!["line1"]);
    }

    #[test]
    fn random_color_comes_from_palette() {
        for _ in 0..32 {
            assert!(PALETTE.contains(&random_palette_color()));
        }
    }

    #[test]
    fn placeholder_uses_uppercased_initial() {
        assert_eq!(
            placeholder_cover("hello"),
            CoverImage::Placeholder { initial: 'H' }
        );
        assert_eq!(
            placeholder_cover(""),
            CoverImage::Placeholder { initial: '?' }
        );
    }
}
