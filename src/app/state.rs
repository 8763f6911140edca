use crate::card::{
    self, Alignment, CardDescription, CoverImage, TextMode, PALETTE,
};
use crate::config::ThemeMode;
use crate::lyrics::{self, ScriptVariant, Song};
use std::collections::BTreeSet;

/// The workflow step. Results is only reachable with a non-empty song list;
/// LyricPick and Preview only with a selected song.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Step {
    #[default]
    Search,
    Results,
    LyricPick,
    Preview,
}

impl Step {
    /// The step "back" navigates to. Pure navigation, nothing is refetched.
    pub fn back(self) -> Self {
        match self {
            Step::Search => Step::Search,
            Step::Results => Step::Search,
            Step::LyricPick => Step::Results,
            Step::Preview => Step::LyricPick,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Step::Search => "Search",
            Step::Results => "Pick a song",
            Step::LyricPick => "Pick lyrics",
            Step::Preview => "Preview",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Toast {
    pub message: String,
    pub kind: ToastKind,
    pub created_at: std::time::Instant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Info,
    Success,
    Error,
}

impl Toast {
    pub fn info(message: impl Into<String>) -> Self {
        Self::new(message, ToastKind::Info)
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(message, ToastKind::Success)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(message, ToastKind::Error)
    }

    fn new(message: impl Into<String>, kind: ToastKind) -> Self {
        Self {
            message: message.into(),
            kind,
            created_at: std::time::Instant::now(),
        }
    }

    pub fn is_expired(&self) -> bool {
        self.created_at.elapsed() > std::time::Duration::from_secs(4)
    }
}

/// Snapshot captured when entering Preview. The exported artifact is built
/// from this alone.
#[derive(Debug, Clone)]
pub struct PreviewState {
    pub song_name: String,
    pub artist_name: String,
    pub lines: Vec<String>,
    pub background: String,
    pub text_mode: TextMode,
    pub alignment: Alignment,
    pub line_spacing: f32,
    pub cover: CoverImage,
}

impl PreviewState {
    pub fn to_card(&self) -> CardDescription {
        CardDescription {
            song_name: self.song_name.clone(),
            artist_name: self.artist_name.clone(),
            lines: self.lines.clone(),
            background: self.background.clone(),
            text_mode: self.text_mode,
            alignment: self.alignment,
            line_spacing: self.line_spacing,
            cover: self.cover.clone(),
        }
    }

    /// Step to the next preset background color.
    pub fn cycle_background(&mut self) {
        let next = PALETTE
            .iter()
            .position(|&c| c == self.background)
            .map(|i| (i + 1) % PALETTE.len())
            .unwrap_or(0);
        self.background = PALETTE[next].to_string();
    }
}

pub struct AppState {
    pub should_quit: bool,
    pub step: Step,
    pub theme: ThemeMode,

    // Search
    pub query: String,
    pub searching: bool,

    // Results
    pub songs: Vec<Song>,
    pub song_cursor: usize,
    pub song_scroll: usize,

    // LyricPick
    pub selected_song: Option<Song>,
    /// Lyric lines as fetched; never mutated by the variant toggle.
    pub lyric_lines: Vec<String>,
    /// Lines as displayed, with the current script variant applied.
    pub view_lines: Vec<String>,
    pub lyric_cursor: usize,
    pub lyric_scroll: usize,
    pub selection: BTreeSet<usize>,
    pub variant: ScriptVariant,

    // Preview
    pub preview: Option<PreviewState>,
    pub cover_loading: bool,
    pub exporting: bool,

    pub toast: Option<Toast>,
}

impl AppState {
    pub fn new(theme: ThemeMode) -> Self {
        Self {
            should_quit: false,
            step: Step::Search,
            theme,
            query: String::new(),
            searching: false,
            songs: Vec::new(),
            song_cursor: 0,
            song_scroll: 0,
            selected_song: None,
            lyric_lines: Vec::new(),
            view_lines: Vec::new(),
            lyric_cursor: 0,
            lyric_scroll: 0,
            selection: BTreeSet::new(),
            variant: ScriptVariant::default(),
            preview: None,
            cover_loading: false,
            exporting: false,
            toast: None,
        }
    }

    /// Search succeeded with a non-empty result list.
    pub fn enter_results(&mut self, songs: Vec<Song>) {
        debug_assert!(!songs.is_empty());
        self.songs = songs;
        self.song_cursor = 0;
        self.song_scroll = 0;
        self.step = Step::Results;
    }

    /// Pick the song under the cursor and move to lyric selection. The
    /// selection set and the script variant always start fresh here, so no
    /// indices from a previous song can leak through.
    pub fn select_song(&mut self) {
        let Some(song) = self.songs.get(self.song_cursor).cloned() else {
            return;
        };
        self.lyric_lines = lyrics::lyric_lines(&song);
        self.view_lines = self.lyric_lines.clone();
        self.selected_song = Some(song);
        self.selection.clear();
        self.variant = ScriptVariant::default();
        self.lyric_cursor = 0;
        self.lyric_scroll = 0;
        self.preview = None;
        self.step = Step::LyricPick;
    }

    pub fn toggle_line(&mut self) {
        let idx = self.lyric_cursor;
        if idx >= self.view_lines.len() {
            return;
        }
        if !self.selection.remove(&idx) {
            self.selection.insert(idx);
        }
    }

    /// Flip the script variant and rebuild the display lines from the
    /// untouched originals.
    pub fn toggle_variant(&mut self) {
        self.variant = self.variant.toggled();
        self.view_lines = self
            .lyric_lines
            .iter()
            .map(|l| self.variant.apply(l))
            .collect();
    }

    /// Proceed from LyricPick: compute the card text now (not at render
    /// time), snapshot it, and default the background to a random preset.
    pub fn proceed_to_preview(&mut self) {
        let Some(song) = self.selected_song.as_ref() else {
            return;
        };
        let name = self.variant.apply(&song.name);
        self.preview = Some(PreviewState {
            song_name: name.clone(),
            artist_name: song.artist.clone(),
            lines: card::compose_lines(&self.view_lines, &self.selection),
            background: card::random_palette_color().to_string(),
            text_mode: TextMode::default(),
            alignment: Alignment::default(),
            line_spacing: CardDescription::DEFAULT_LINE_SPACING,
            cover: card::placeholder_cover(&name),
        });
        self.step = Step::Preview;
    }

    pub fn go_back(&mut self) {
        self.step = self.step.back();
    }

    /// Current list length for cursor movement on the active step.
    fn active_len(&self) -> usize {
        match self.step {
            Step::Results => self.songs.len(),
            Step::LyricPick => self.view_lines.len(),
            _ => 0,
        }
    }

    fn cursor_mut(&mut self) -> Option<&mut usize> {
        match self.step {
            Step::Results => Some(&mut self.song_cursor),
            Step::LyricPick => Some(&mut self.lyric_cursor),
            _ => None,
        }
    }

    pub fn cursor_up(&mut self) {
        if let Some(c) = self.cursor_mut() {
            *c = c.saturating_sub(1);
        }
    }

    pub fn cursor_down(&mut self) {
        let len = self.active_len();
        if len == 0 {
            return;
        }
        if let Some(c) = self.cursor_mut() {
            *c = (*c + 1).min(len - 1);
        }
    }

    pub fn cursor_top(&mut self) {
        if let Some(c) = self.cursor_mut() {
            *c = 0;
        }
    }

    pub fn cursor_bottom(&mut self) {
        let len = self.active_len();
        if let Some(c) = self.cursor_mut() {
            *c = len.saturating_sub(1);
        }
    }

    /// Keep the cursor visible within `visible_height` rows.
    pub fn update_scroll(&mut self, visible_height: usize) {
        if visible_height == 0 {
            return;
        }
        let (cursor, scroll) = match self.step {
            Step::Results => (self.song_cursor, &mut self.song_scroll),
            Step::LyricPick => (self.lyric_cursor, &mut self.lyric_scroll),
            _ => return,
        };
        if cursor < *scroll {
            *scroll = cursor;
        } else if cursor >= *scroll + visible_height {
            *scroll = cursor - visible_height + 1;
        }
    }
}
