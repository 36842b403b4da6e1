//! Movie detail view
//!
//! Poster link, title, year/runtime, rating, then labelled info rows, with a
//! "go back" button pinned to the bottom.

use ratatui::{
    prelude::*,
    widgets::{Block, BorderType, Borders, Paragraph, Wrap},
};

use crate::app::{App, MovieScreen};
use crate::fetch::FetchState;
use crate::models::{MovieRecord, NOT_AVAILABLE};
use crate::ui::Theme;

/// Height of the footer holding the back button and key hints
const FOOTER_HEIGHT: u16 = 4;

/// Render the current screen of `app`
pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    frame.render_widget(Block::default().style(Theme::text()), area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(FOOTER_HEIGHT)])
        .split(area);

    match app.current() {
        Some(screen) => render_screen(frame, chunks[0], app, screen),
        None => render_empty(frame, chunks[0]),
    }

    render_footer(frame, chunks[1]);
}

fn render_screen(frame: &mut Frame, area: Rect, app: &App, screen: &MovieScreen) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Theme::border())
        .title(Span::styled(format!(" MOVIE {} ", screen.id), Theme::title()));

    let state = screen.state();
    let poster = app.poster_url();

    let paragraph = Paragraph::new(movie_lines(&state, poster.as_deref()))
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((screen.scroll, 0));

    frame.render_widget(paragraph, area);
}

fn render_empty(frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Theme::border());

    let empty = Paragraph::new("No movie open")
        .style(Theme::label())
        .alignment(Alignment::Center)
        .block(block);

    frame.render_widget(empty, area);
}

fn render_footer(frame: &mut Frame, area: Rect) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Length(1)])
        .split(area);

    let button = Paragraph::new(Line::from(Span::styled("← Go back", Theme::button())))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Theme::keybind()),
        );
    frame.render_widget(button, rows[0]);

    let hints = Line::from(vec![
        Span::styled("Esc", Theme::keybind()),
        Span::styled(" back  ", Theme::keybind_desc()),
        Span::styled("r", Theme::keybind()),
        Span::styled(" reload  ", Theme::keybind_desc()),
        Span::styled("↑↓", Theme::keybind()),
        Span::styled(" scroll  ", Theme::keybind_desc()),
        Span::styled("Ctrl+C", Theme::keybind()),
        Span::styled(" quit", Theme::keybind_desc()),
    ]);
    frame.render_widget(Paragraph::new(hints).alignment(Alignment::Center), rows[1]);
}

/// Text lines for one fetch snapshot
///
/// Stale data stays on screen while a reload is in flight or after it fails;
/// the status line above it says which.
pub fn movie_lines(state: &FetchState<MovieRecord>, poster: Option<&str>) -> Vec<Line<'static>> {
    let mut lines = Vec::new();

    if state.loading {
        let msg = if state.data.is_some() {
            "⟳ Refreshing..."
        } else {
            "⟳ Loading movie..."
        };
        lines.push(Line::from(Span::styled(msg, Theme::loading())));
    }

    if let Some(err) = &state.error {
        lines.push(Line::from(Span::styled(format!("✗ {}", err), Theme::error())));
        lines.push(Line::from(vec![
            Span::styled("Press ", Theme::keybind_desc()),
            Span::styled("r", Theme::keybind()),
            Span::styled(" to retry", Theme::keybind_desc()),
        ]));
    }

    let Some(movie) = &state.data else {
        return lines;
    };

    if !lines.is_empty() {
        lines.push(Line::default());
    }

    lines.push(Line::from(vec![
        Span::styled("Poster: ", Theme::label()),
        Span::styled(poster.unwrap_or(NOT_AVAILABLE).to_string(), Theme::link()),
    ]));
    lines.push(Line::default());

    lines.push(Line::from(Span::styled(movie.title_label(), Theme::title())));
    lines.push(Line::from(vec![
        Span::styled(movie.release_year().unwrap_or_default().to_string(), Theme::meta()),
        Span::raw("  "),
        Span::styled(movie.runtime_label(), Theme::meta()),
    ]));
    lines.push(Line::from(vec![
        Span::styled(" ★ ", Theme::star()),
        Span::styled(format!("{} ", movie.rating_label()), Theme::rating()),
        Span::raw(" "),
        Span::styled(movie.votes_label(), Theme::meta()),
    ]));

    for (label, value) in movie.info_rows() {
        lines.push(Line::default());
        lines.push(Line::from(Span::styled(label, Theme::label())));
        lines.push(Line::from(Span::styled(value, Theme::value())));
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::FetchError;

    fn text(lines: &[Line]) -> String {
        lines
            .iter()
            .map(|l| l.spans.iter().map(|s| s.content.as_ref()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_loading_without_data() {
        let state = FetchState::<MovieRecord> {
            loading: true,
            ..Default::default()
        };
        let out = text(&movie_lines(&state, None));
        assert_eq!(out, "⟳ Loading movie...");
    }

    #[test]
    fn test_error_without_data() {
        let state = FetchState::<MovieRecord> {
            error: Some(FetchError::NotFound("Resource not found (404)".into())),
            ..Default::default()
        };
        let out = text(&movie_lines(&state, None));
        assert!(out.contains("✗ Not found: Resource not found (404)"));
        assert!(out.contains("Press r to retry"));
        assert!(!out.contains("Poster"));
    }

    #[test]
    fn test_data_rows() {
        let state = FetchState {
            data: Some(MovieRecord {
                title: Some("Dune".into()),
                release_date: Some("2021-09-15".into()),
                runtime: Some(155),
                vote_average: Some(7.8),
                vote_count: Some(10),
                ..Default::default()
            }),
            ..Default::default()
        };
        let out = text(&movie_lines(&state, Some("https://img/w500/p.jpg")));

        assert!(out.starts_with("Poster: https://img/w500/p.jpg"));
        assert!(out.contains("Dune"));
        assert!(out.contains("2021  155m"));
        assert!(out.contains(" ★ 8/10  (10 votes)"));
        assert!(out.contains("Overview\nN/A"));
        assert!(out.contains("Production Companies\nN/A"));
    }

    #[test]
    fn test_refresh_keeps_stale_data() {
        let state = FetchState {
            data: Some(MovieRecord {
                title: Some("Dune".into()),
                ..Default::default()
            }),
            loading: true,
            error: None,
        };
        let out = text(&movie_lines(&state, None));
        assert!(out.starts_with("⟳ Refreshing..."));
        assert!(out.contains("Poster: N/A"));
        assert!(out.contains("Dune"));
    }
}
