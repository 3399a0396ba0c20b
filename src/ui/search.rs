use crate::app::{App, InputMode, SearchState, MIN_QUERY_LEN};
use crate::ui::truncate_str;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};
use unicode_width::UnicodeWidthStr;

pub fn render(app: &App, frame: &mut Frame) {
    let area = frame.area();

    // Layout: header(3) + query(3) + results(min) + status(1)
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(1),
        ])
        .split(area);

    // ── Header ──
    let header_text = match app.search_state {
        SearchState::Loaded => format!(
            " 🍿 popcorn   Found {} of {} results",
            app.results.len(),
            app.total_results
        ),
        _ => " 🍿 popcorn".to_string(),
    };
    let header = Paragraph::new(header_text)
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Left)
        .block(
            Block::default()
                .borders(Borders::BOTTOM)
                .border_style(Style::default().fg(Color::DarkGray)),
        );
    frame.render_widget(header, chunks[0]);

    // ── Query bar ──
    let query_style = match app.input_mode {
        InputMode::Editing => Style::default().fg(Color::Yellow),
        InputMode::Normal => Style::default().fg(Color::DarkGray),
    };
    let query_label = if app.input_mode == InputMode::Editing {
        " 🔍 Search movies (Enter to apply, Esc to cancel): "
    } else {
        " 🔍 Search movies (/): "
    };
    let query_text = format!("{}{}", query_label, app.query);
    let query_bar = Paragraph::new(query_text).style(query_style).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(query_style)
            .title(" Search "),
    );
    frame.render_widget(query_bar, chunks[1]);

    // Set cursor position when editing
    if app.input_mode == InputMode::Editing {
        let cursor_x =
            chunks[1].x + query_label.width() as u16 + app.query.width() as u16;
        let cursor_y = chunks[1].y + 1;
        frame.set_cursor_position((cursor_x, cursor_y));
    }

    // ── Results ──
    let results_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(" Results ");

    match &app.search_state {
        SearchState::Idle => {
            let hint = if app.query.is_empty() {
                format!(" Press / and type at least {MIN_QUERY_LEN} characters to search")
            } else {
                format!(" Keep typing, {MIN_QUERY_LEN} characters minimum")
            };
            let placeholder = Paragraph::new(hint)
                .style(Style::default().fg(Color::DarkGray))
                .block(results_block);
            frame.render_widget(placeholder, chunks[2]);
        }
        SearchState::Loading => {
            let loading = Paragraph::new(" Loading…")
                .style(Style::default().fg(Color::Yellow))
                .block(results_block);
            frame.render_widget(loading, chunks[2]);
        }
        SearchState::Failed(message) => {
            let error = Paragraph::new(format!(" ⛔ {message}"))
                .style(Style::default().fg(Color::Red))
                .block(results_block);
            frame.render_widget(error, chunks[2]);
        }
        SearchState::Loaded if app.results.is_empty() => {
            let empty = Paragraph::new(format!(" No movies match \"{}\"", app.query))
                .style(Style::default().fg(Color::DarkGray))
                .block(results_block);
            frame.render_widget(empty, chunks[2]);
        }
        SearchState::Loaded => {
            let title_width = (area.width as usize).saturating_sub(16);
            let items: Vec<ListItem> = app
                .results
                .iter()
                .map(|result| {
                    let watched_mark = if app.watched.contains(&result.imdb_id) {
                        "●"
                    } else {
                        " "
                    };
                    let line = Line::from(vec![
                        Span::styled(
                            format!("{watched_mark} "),
                            Style::default().fg(Color::Green),
                        ),
                        Span::raw(truncate_str(&result.title, title_width)),
                        Span::styled(
                            format!("  ({})", result.year),
                            Style::default().fg(Color::DarkGray),
                        ),
                    ]);
                    ListItem::new(line)
                })
                .collect();

            let list_widget = List::new(items)
                .block(results_block)
                .highlight_style(
                    Style::default()
                        .bg(Color::DarkGray)
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                )
                .highlight_symbol("▸ ");

            let mut list_state = ListState::default();
            list_state.select(Some(app.results_selected));
            frame.render_stateful_widget(list_widget, chunks[2], &mut list_state);
        }
    }

    // ── Status bar ──
    let status_line = Line::from(vec![
        Span::styled(
            " ↑↓",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" Navigate  "),
        Span::styled(
            "/",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" Search  "),
        Span::styled(
            "Enter",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" Detail  "),
        Span::styled(
            "w",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" Watched  "),
        Span::styled(
            "?",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" Help  "),
        Span::styled(
            "q",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" Quit  "),
        Span::styled(&app.status_msg, Style::default().fg(Color::DarkGray)),
    ]);
    let status_bar = Paragraph::new(status_line);
    frame.render_widget(status_bar, chunks[3]);
}
