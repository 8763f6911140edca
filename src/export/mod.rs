//! Card export.
//!
//! Rasterizing to an image is an external concern; what ships here is the
//! collaborator seam plus a text renderer that writes the fully determined
//! card to disk. Export failures leave no partial file behind.

use crate::card::{Alignment, CardDescription, CoverImage};
use anyhow::Context;
use std::path::{Path, PathBuf};

pub trait Exporter {
    /// Write the card and return the path of the produced file.
    fn export(&self, card: &CardDescription) -> anyhow::Result<PathBuf>;
}

/// Writes the card as a plain-text rendering named `Artist - Song.txt`.
#[derive(Debug, Clone)]
pub struct TextExporter {
    output_dir: PathBuf,
}

impl TextExporter {
    pub fn new(output_dir: PathBuf) -> Self {
        Self { output_dir }
    }
}

impl Exporter for TextExporter {
    fn export(&self, card: &CardDescription) -> anyhow::Result<PathBuf> {
        std::fs::create_dir_all(&self.output_dir)
            .with_context(|| format!("create dir {}", self.output_dir.display()))?;

        let filename = sanitize_filename(&format!(
            "{} - {}.txt",
            card.artist_name, card.song_name
        ));
        let path = self.output_dir.join(filename);
        let rendered = render_card_text(card);

        // Write to a temp name first so a failed write leaves nothing behind.
        let tmp = path.with_extension("txt.tmp");
        std::fs::write(&tmp, rendered).with_context(|| format!("write {}", tmp.display()))?;
        std::fs::rename(&tmp, &path).with_context(|| format!("rename to {}", path.display()))?;
        Ok(path)
    }
}

/// Render the card content with its styling noted in a trailer.
pub fn render_card_text(card: &CardDescription) -> String {
    let width = card
        .lines
        .iter()
        .map(|l| l.chars().count())
        .chain([card.song_name.chars().count() + card.artist_name.chars().count() + 3])
        .max()
        .unwrap_or(0)
        .max(24);

    let mut out = String::new();
    let cover = match &card.cover {
        CoverImage::Placeholder { initial } => format!("[{initial}]"),
        CoverImage::Url(url) => url.clone(),
    };

    out.push_str(&format!("{} — {}\n", card.song_name, card.artist_name));
    out.push_str(&format!("cover: {cover}\n"));
    out.push_str(&"-".repeat(width));
    out.push('\n');
    for line in &card.lines {
        out.push_str(&align(line, card.alignment, width));
        out.push('\n');
    }
    out.push_str(&"-".repeat(width));
    out.push('\n');
    out.push_str(&format!(
        "background {} | text {} | align {} | spacing {:.1}\n",
        card.background,
        card.text_mode.label(),
        card.alignment.label(),
        card.line_spacing
    ));
    out
}

fn align(line: &str, alignment: Alignment, width: usize) -> String {
    let len = line.chars().count();
    let pad = width.saturating_sub(len);
    match alignment {
        Alignment::Left => line.to_string(),
        Alignment::Center => format!("{}{line}", " ".repeat(pad / 2)),
        Alignment::Right => format!("{}{line}", " ".repeat(pad)),
    }
}

fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c => c,
        })
        .collect()
}

/// Default export location: the user's current directory.
pub fn default_output_dir() -> PathBuf {
    std::env::current_dir().unwrap_or_else(|_| Path::new(".").to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::TextMode;

    fn card() -> CardDescription {
        CardDescription {
            song_name: "Foo".into(),
            artist_name: "Bar".into(),
            lines: vec!["one".into(), "...".into(), "three".into()],
            background: "#f6d365".into(),
            text_mode: TextMode::Dark,
            alignment: Alignment::Center,
            line_spacing: CardDescription::DEFAULT_LINE_SPACING,
            cover: CoverImage::Placeholder { initial: 'F' },
        }
    }

    #[test]
    fn rendering_contains_all_determining_fields() {
        let text = render_card_text(&card());
        assert!(text.contains("Foo — Bar"));
        assert!(text.contains("one"));
        assert!(text.contains("..."));
        assert!(text.contains("#f6d365"));
        assert!(text.contains("text dark"));
        assert!(text.contains("align center"));
        assert!(text.contains("[F]"));
    }

    #[test]
    fn filenames_are_sanitized() {
        assert_eq!(sanitize_filename("AC/DC - T.N.T?.txt"), "AC_DC - T.N.T_.txt");
    }

    #[test]
    fn export_writes_file() {
        let dir = std::env::temp_dir().join(format!("lyricard-test-{}", std::process::id()));
        let exporter = TextExporter::new(dir.clone());
        let path = exporter.export(&card()).unwrap();
        assert_eq!(path, dir.join("Bar - Foo.txt"));
        assert!(std::fs::read_to_string(&path).unwrap().contains("three"));
        let _ = std::fs::remove_dir_all(&dir);
    }
}
