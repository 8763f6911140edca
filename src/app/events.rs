use crate::lyrics::Song;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub enum Event {
    Input(InputEvent),
    Network(NetworkEvent),
}

#[derive(Debug, Clone)]
pub enum InputEvent {
    Key(crossterm::event::KeyEvent),
    Resize,
}

/// Results of background work. Each carries enough identity (query, song id)
/// for the handler to drop results that arrive after the user moved on.
#[derive(Debug, Clone)]
pub enum NetworkEvent {
    SearchResults { query: String, songs: Vec<Song> },
    SearchFailed { query: String, message: String },
    CoverResolved { song_id: i64, url: String },
    CoverNotFound { song_id: i64 },
    ExportFinished { path: PathBuf },
    ExportFailed { message: String },
}
