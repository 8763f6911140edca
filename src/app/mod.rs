pub mod actions;
pub mod events;
pub mod state;

use crate::card::CoverImage;
use crate::config::{self, Config};
use crate::cover::CoverResolver;
use crate::export::{self, Exporter, TextExporter};
use crate::input;
use crate::lyrics::LrclibClient;
use crate::tui::{self, TuiTerminal};
use actions::Action;
use events::{Event, NetworkEvent};
use state::{AppState, Step, Toast};
use tokio::sync::mpsc;
use tracing::debug;

/// Workflow controller. Owns the state machine and every external
/// collaborator; services are constructed here and passed around by handle,
/// never reached through globals.
pub struct App {
    cfg: Config,
    config_path: std::path::PathBuf,
    state: AppState,
    lrclib: LrclibClient,
    resolver: CoverResolver,
    exporter: TextExporter,
}

impl App {
    pub fn new(cfg: Config, config_path: std::path::PathBuf) -> Self {
        let lrclib = LrclibClient::new();
        let resolver = CoverResolver::from_config(&cfg.cover);
        let output_dir = cfg
            .export
            .output_dir
            .clone()
            .unwrap_or_else(export::default_output_dir);
        let state = AppState::new(cfg.theme.mode);

        Self {
            cfg,
            config_path,
            state,
            lrclib,
            resolver,
            exporter: TextExporter::new(output_dir),
        }
    }

    pub async fn run(&mut self, terminal: &mut TuiTerminal) -> anyhow::Result<()> {
        let (tx, mut rx) = mpsc::channel::<Event>(256);

        input::spawn_input_task(tx.clone());

        // Redraw on events only; there is no ticker.
        tui::draw(terminal, &mut self.state)?;

        while let Some(ev) = rx.recv().await {
            match ev {
                Event::Input(input_ev) => {
                    if let Some(action) = input::map_input_to_action(&self.state, input_ev) {
                        self.handle_action(action, &tx);
                    }
                }
                Event::Network(ne) => self.handle_network(ne),
            }

            if self.state.should_quit {
                break;
            }

            tui::draw(terminal, &mut self.state)?;
        }

        self.save_on_quit();
        Ok(())
    }

    fn save_on_quit(&mut self) {
        self.cfg.theme.mode = self.state.theme;
        let _ = config::save(&self.cfg, Some(&self.config_path));
    }

    fn handle_action(&mut self, action: Action, tx: &mpsc::Sender<Event>) {
        match action {
            Action::Quit => self.state.should_quit = true,
            Action::Resize => {}

            Action::InputChar(c) => self.state.query.push(c),
            Action::Backspace => {
                self.state.query.pop();
            }
            Action::ClearQuery => self.state.query.clear(),
            Action::StartSearch => self.start_search(tx),

            Action::CursorUp => self.state.cursor_up(),
            Action::CursorDown => self.state.cursor_down(),
            Action::GoTop => self.state.cursor_top(),
            Action::GoBottom => self.state.cursor_bottom(),

            Action::SelectSong => {
                self.state.select_song();
                if self.state.step == Step::LyricPick && self.state.lyric_lines.is_empty() {
                    self.state.toast = Some(Toast::info(
                        "No lyrics for this song; press Enter for a blank card",
                    ));
                }
            }
            Action::ToggleLine => self.state.toggle_line(),
            Action::Proceed => self.state.proceed_to_preview(),
            Action::Back => self.state.go_back(),

            Action::FetchCover => self.start_cover_fetch(tx),
            Action::CycleColor => {
                if let Some(p) = self.state.preview.as_mut() {
                    p.cycle_background();
                }
            }
            Action::ToggleTextMode => {
                if let Some(p) = self.state.preview.as_mut() {
                    p.text_mode = p.text_mode.toggled();
                }
            }
            Action::CycleAlignment => {
                if let Some(p) = self.state.preview.as_mut() {
                    p.alignment = p.alignment.next();
                }
            }
            Action::ToggleVariant => self.state.toggle_variant(),
            Action::Export => self.start_export(tx),

            Action::ToggleTheme => self.state.theme = self.state.theme.toggled(),
        }
    }

    /// Validation happens here: an empty query never leaves the Search step.
    fn start_search(&mut self, tx: &mpsc::Sender<Event>) {
        let query = self.state.query.trim().to_string();
        if query.is_empty() {
            self.state.toast = Some(Toast::error("Type a song or artist name first"));
            return;
        }
        if self.state.searching {
            return;
        }
        self.state.searching = true;

        let lrclib = self.lrclib.clone();
        let tx = tx.clone();
        tokio::spawn(async move {
            let ev = match lrclib.search(&query).await {
                Ok(songs) => NetworkEvent::SearchResults { query, songs },
                Err(e) => NetworkEvent::SearchFailed {
                    query,
                    message: format!("{e:#}"),
                },
            };
            let _ = tx.send(Event::Network(ev)).await;
        });
    }

    fn start_cover_fetch(&mut self, tx: &mpsc::Sender<Event>) {
        if self.state.step != Step::Preview || self.state.cover_loading {
            return;
        }
        let Some(song) = self.state.selected_song.as_ref() else {
            return;
        };
        self.state.cover_loading = true;

        let song_id = song.id;
        let track = song.name.clone();
        let artist = song.artist.clone();
        let resolver = self.resolver.clone();
        let tx = tx.clone();
        tokio::spawn(async move {
            let ev = match resolver.resolve(&track, &artist).await {
                Some(url) => NetworkEvent::CoverResolved { song_id, url },
                None => NetworkEvent::CoverNotFound { song_id },
            };
            let _ = tx.send(Event::Network(ev)).await;
        });
    }

    fn start_export(&mut self, tx: &mpsc::Sender<Event>) {
        if self.state.exporting {
            return;
        }
        let Some(card) = self.state.preview.as_ref().map(|p| p.to_card()) else {
            return;
        };
        self.state.exporting = true;

        let exporter = self.exporter.clone();
        let tx = tx.clone();
        tokio::spawn(async move {
            let result = tokio::task::spawn_blocking(move || exporter.export(&card)).await;
            let ev = match result {
                Ok(Ok(path)) => NetworkEvent::ExportFinished { path },
                Ok(Err(e)) => NetworkEvent::ExportFailed {
                    message: format!("{e:#}"),
                },
                Err(e) => NetworkEvent::ExportFailed {
                    message: format!("export task failed: {e}"),
                },
            };
            let _ = tx.send(Event::Network(ev)).await;
        });
    }

    /// Apply background results. Anything that no longer matches the active
    /// query or song is dropped; late callbacks must never touch fresh state.
    fn handle_network(&mut self, ev: NetworkEvent) {
        match ev {
            NetworkEvent::SearchResults { query, songs } => {
                self.state.searching = false;
                if query != self.state.query.trim() {
                    debug!("dropping stale search results for {query:?}");
                    return;
                }
                if songs.is_empty() {
                    self.state.toast =
                        Some(Toast::info("No songs found, try other keywords"));
                    return;
                }
                self.state.enter_results(songs);
            }
            NetworkEvent::SearchFailed { query, message } => {
                self.state.searching = false;
                if query != self.state.query.trim() {
                    return;
                }
                self.state.toast = Some(Toast::error(message));
            }
            NetworkEvent::CoverResolved { song_id, url } => {
                self.state.cover_loading = false;
                if !self.is_active_song(song_id) || self.state.step != Step::Preview {
                    debug!("dropping stale cover for song {song_id}");
                    return;
                }
                if let Some(p) = self.state.preview.as_mut() {
                    p.cover = CoverImage::Url(url);
                }
            }
            NetworkEvent::CoverNotFound { song_id } => {
                self.state.cover_loading = false;
                if !self.is_active_song(song_id) {
                    return;
                }
                self.state.toast =
                    Some(Toast::info("No cover found, keeping the placeholder"));
            }
            NetworkEvent::ExportFinished { path } => {
                self.state.exporting = false;
                self.state.toast = Some(Toast::success(format!("Saved {}", path.display())));
            }
            NetworkEvent::ExportFailed { message } => {
                self.state.exporting = false;
                self.state.toast = Some(Toast::error(format!("{message}; try again")));
            }
        }
    }

    fn is_active_song(&self, song_id: i64) -> bool {
        self.state
            .selected_song
            .as_ref()
            .is_some_and(|s| s.id == song_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lyrics::Song;

    fn song(id: i64) -> Song {
        Song {
            id,
            name: format!("Song{id}"),
            artist: "Artist".into(),
            album: None,
            duration: None,
            plain_lyrics: Some("a\nb".into()),
            synced_lyrics: None,
        }
    }

    fn app_at_preview() -> App {
        let mut app = App::new(Config::default(), std::path::PathBuf::from("/dev/null"));
        app.state.query = "q".into();
        app.state.enter_results(vec![song(1), song(2)]);
        app.state.select_song();
        app.state.proceed_to_preview();
        app
    }

    #[test]
    fn cover_for_active_song_is_applied() {
        let mut app = app_at_preview();
        app.handle_network(NetworkEvent::CoverResolved {
            song_id: 1,
            url: "http://art".into(),
        });
        assert_eq!(
            app.state.preview.as_ref().unwrap().cover,
            CoverImage::Url("http://art".into())
        );
    }

    #[test]
    fn stale_cover_for_previous_song_is_ignored() {
        let mut app = app_at_preview();

        // User goes back and picks the other song before the cover arrives.
        app.state.go_back();
        app.state.go_back();
        app.state.song_cursor = 1;
        app.state.select_song();
        app.state.proceed_to_preview();

        app.handle_network(NetworkEvent::CoverResolved {
            song_id: 1,
            url: "http://stale".into(),
        });
        assert!(matches!(
            app.state.preview.as_ref().unwrap().cover,
            CoverImage::Placeholder { .. }
        ));
    }

    #[test]
    fn cover_arriving_off_the_preview_step_is_ignored() {
        let mut app = app_at_preview();
        app.state.go_back();
        app.handle_network(NetworkEvent::CoverResolved {
            song_id: 1,
            url: "http://late".into(),
        });
        assert!(matches!(
            app.state.preview.as_ref().unwrap().cover,
            CoverImage::Placeholder { .. }
        ));
    }

    #[test]
    fn stale_search_results_are_ignored() {
        let mut app = App::new(Config::default(), std::path::PathBuf::from("/dev/null"));
        app.state.query = "new query".into();
        app.handle_network(NetworkEvent::SearchResults {
            query: "old query".into(),
            songs: vec![song(1)],
        });
        assert_eq!(app.state.step, Step::Search);
        assert!(app.state.songs.is_empty());
    }

    #[test]
    fn zero_results_stay_on_search_with_a_notice() {
        let mut app = App::new(Config::default(), std::path::PathBuf::from("/dev/null"));
        app.state.query = "q".into();
        app.handle_network(NetworkEvent::SearchResults {
            query: "q".into(),
            songs: vec![],
        });
        assert_eq!(app.state.step, Step::Search);
        assert!(app.state.toast.is_some());
    }

    #[test]
    fn search_failure_is_retryable_in_place() {
        let mut app = App::new(Config::default(), std::path::PathBuf::from("/dev/null"));
        app.state.query = "q".into();
        app.state.searching = true;
        app.handle_network(NetworkEvent::SearchFailed {
            query: "q".into(),
            message: "boom".into(),
        });
        assert_eq!(app.state.step, Step::Search);
        assert!(!app.state.searching);
    }
}
