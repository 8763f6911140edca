//! Per-step screens for the card workflow.

use crate::app::state::{AppState, Step, ToastKind};
use crate::card::CoverImage;
use crate::config::ThemeMode;
use crate::lyrics::lrclib::format_duration;
use ratatui::{
    layout::{Alignment as RtAlignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

/// Colors derived from the persisted light/dark preference.
struct Palette {
    fg: Color,
    dim: Color,
    accent: Color,
    border: Color,
}

fn palette(mode: ThemeMode) -> Palette {
    match mode {
        ThemeMode::Dark => Palette {
            fg: Color::White,
            dim: Color::DarkGray,
            accent: Color::Yellow,
            border: Color::DarkGray,
        },
        ThemeMode::Light => Palette {
            fg: Color::Black,
            dim: Color::Gray,
            accent: Color::Blue,
            border: Color::Gray,
        },
    }
}

pub fn render(frame: &mut Frame, state: &mut AppState) {
    let p = palette(state.theme);
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // breadcrumbs
            Constraint::Min(5),    // step content
            Constraint::Length(1), // key hints / toast
        ])
        .split(frame.area());

    render_breadcrumbs(frame, state, &p, rows[0]);

    match state.step {
        Step::Search => render_search(frame, state, &p, rows[1]),
        Step::Results => render_results(frame, state, &p, rows[1]),
        Step::LyricPick => render_lyric_pick(frame, state, &p, rows[1]),
        Step::Preview => render_preview(frame, state, &p, rows[1]),
    }

    render_footer(frame, state, &p, rows[2]);
}

fn render_breadcrumbs(frame: &mut Frame, state: &AppState, p: &Palette, area: Rect) {
    let steps = [Step::Search, Step::Results, Step::LyricPick, Step::Preview];
    let mut spans = Vec::new();
    for (i, step) in steps.iter().enumerate() {
        let style = if *step == state.step {
            Style::default().fg(p.accent).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(p.dim)
        };
        spans.push(Span::styled(step.title(), style));
        if i < steps.len() - 1 {
            spans.push(Span::styled(" > ", Style::default().fg(p.dim)));
        }
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_search(frame: &mut Frame, state: &AppState, p: &Palette, area: Rect) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(1)])
        .split(area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(p.border))
        .title(" Song or artist ")
        .title_style(Style::default().fg(p.accent));
    let input = Paragraph::new(Line::from(vec![
        Span::styled(state.query.as_str(), Style::default().fg(p.fg)),
        Span::styled("_", Style::default().fg(p.accent)),
    ]))
    .block(block);
    frame.render_widget(input, rows[0]);

    let hint = if state.searching {
        "Searching..."
    } else {
        "Press Enter to search"
    };
    frame.render_widget(
        Paragraph::new(hint)
            .style(Style::default().fg(p.dim))
            .alignment(RtAlignment::Center),
        rows[1],
    );
}

fn render_results(frame: &mut Frame, state: &mut AppState, p: &Palette, area: Rect) {
    let visible = area.height.saturating_sub(2) as usize;
    state.update_scroll(visible);

    let items: Vec<ListItem> = state
        .songs
        .iter()
        .enumerate()
        .skip(state.song_scroll)
        .take(visible)
        .map(|(i, song)| {
            let style = if i == state.song_cursor {
                Style::default().fg(p.accent).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(p.fg)
            };
            let album = song
                .album
                .as_deref()
                .map(|a| format!(" · {a}"))
                .unwrap_or_default();
            let duration = format_duration(song.duration);
            ListItem::new(Line::from(vec![
                Span::styled(format!("{} — {}{}", song.name, song.artist, album), style),
                Span::styled(format!("  {duration}"), Style::default().fg(p.dim)),
            ]))
        })
        .collect();

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(p.border))
        .title(format!(" {} songs ", state.songs.len()))
        .title_style(Style::default().fg(p.accent));
    let mut list_state = ListState::default();
    list_state.select(Some(state.song_cursor.saturating_sub(state.song_scroll)));
    frame.render_stateful_widget(List::new(items).block(block), area, &mut list_state);
}

fn render_lyric_pick(frame: &mut Frame, state: &mut AppState, p: &Palette, area: Rect) {
    let visible = area.height.saturating_sub(2) as usize;
    state.update_scroll(visible);

    let title = state
        .selected_song
        .as_ref()
        .map(|s| format!(" {} — {} ", s.name, s.artist))
        .unwrap_or_default();
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(p.border))
        .title(title)
        .title_style(Style::default().fg(p.accent));

    if state.view_lines.is_empty() {
        let hint = Paragraph::new("No lyrics available; press Enter to continue with a blank card")
            .style(Style::default().fg(p.dim))
            .block(block)
            .wrap(Wrap { trim: true });
        frame.render_widget(hint, area);
        return;
    }

    let items: Vec<ListItem> = state
        .view_lines
        .iter()
        .enumerate()
        .skip(state.lyric_scroll)
        .take(visible)
        .map(|(i, line)| {
            let selected = state.selection.contains(&i);
            let mark = if selected { "[x] " } else { "[ ] " };
            let mut style = if i == state.lyric_cursor {
                Style::default().fg(p.accent).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(p.fg)
            };
            if selected {
                style = style.add_modifier(Modifier::UNDERLINED);
            }
            ListItem::new(Line::from(Span::styled(format!("{mark}{line}"), style)))
        })
        .collect();

    let mut list_state = ListState::default();
    list_state.select(Some(state.lyric_cursor.saturating_sub(state.lyric_scroll)));
    frame.render_stateful_widget(List::new(items).block(block), area, &mut list_state);
}

fn render_preview(frame: &mut Frame, state: &AppState, p: &Palette, area: Rect) {
    let Some(preview) = state.preview.as_ref() else {
        return;
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(p.border))
        .title(format!(" Card · {} ", preview.background))
        .title_style(Style::default().fg(p.accent));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let alignment = match preview.alignment {
        crate::card::Alignment::Left => RtAlignment::Left,
        crate::card::Alignment::Center => RtAlignment::Center,
        crate::card::Alignment::Right => RtAlignment::Right,
    };

    let cover = match &preview.cover {
        CoverImage::Placeholder { initial } => {
            if state.cover_loading {
                "cover: fetching...".to_string()
            } else {
                format!("cover: [{initial}]")
            }
        }
        CoverImage::Url(url) => format!("cover: {url}"),
    };

    let mut lines = vec![
        Line::from(Span::styled(
            format!("{} — {}", preview.song_name, preview.artist_name),
            Style::default().fg(p.accent).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(cover, Style::default().fg(p.dim))),
        Line::default(),
    ];
    for text in &preview.lines {
        lines.push(Line::from(Span::styled(
            text.as_str(),
            Style::default().fg(p.fg),
        )));
    }
    lines.push(Line::default());
    lines.push(Line::from(Span::styled(
        format!(
            "text {} · align {} · spacing {:.1}",
            preview.text_mode.label(),
            preview.alignment.label(),
            preview.line_spacing
        ),
        Style::default().fg(p.dim),
    )));

    frame.render_widget(
        Paragraph::new(lines)
            .alignment(alignment)
            .wrap(Wrap { trim: false }),
        inner,
    );
}

fn render_footer(frame: &mut Frame, state: &AppState, p: &Palette, area: Rect) {
    if let Some(toast) = &state.toast {
        let color = match toast.kind {
            ToastKind::Info => p.dim,
            ToastKind::Success => Color::Green,
            ToastKind::Error => Color::Red,
        };
        frame.render_widget(
            Paragraph::new(toast.message.as_str()).style(Style::default().fg(color)),
            area,
        );
        return;
    }

    let hints = match state.step {
        Step::Search => "Enter search · Ctrl-u clear · Ctrl-t theme · Esc quit",
        Step::Results => "Enter pick · j/k move · Esc back · q quit",
        Step::LyricPick => "Space select · Enter preview · v script · Esc back",
        Step::Preview => "s save · f cover · c color · t text · a align · v script · Esc back",
    };
    frame.render_widget(
        Paragraph::new(hints).style(Style::default().fg(p.dim)),
        area,
    );
}
