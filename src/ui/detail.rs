use crate::app::{App, DetailState, MAX_RATING};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};

pub fn render(app: &App, frame: &mut Frame) {
    let state = match &app.detail {
        Some(s) => s,
        None => return,
    };

    match state {
        DetailState::Loading => render_message(frame, " Loading…", Color::Yellow),
        DetailState::Failed(message) => {
            render_message(frame, &format!(" ⛔ {message}"), Color::Red)
        }
        DetailState::Loaded(detail) => render_detail(app, frame, detail),
    }
}

fn render_message(frame: &mut Frame, text: &str, color: Color) {
    let message = Paragraph::new(text.to_string())
        .style(Style::default().fg(color))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray))
                .title(" Movie Detail ")
                .title_bottom(
                    Line::from(" Esc Back ").style(Style::default().fg(Color::DarkGray)),
                ),
        );
    frame.render_widget(message, frame.area());
}

fn render_detail(app: &App, frame: &mut Frame, detail: &crate::api::MovieDetail) {
    let area = frame.area();

    // Layout: header(5) + rating(3) + content(min) + status(1)
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5),
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(1),
        ])
        .split(area);

    render_header(frame, chunks[0], detail);
    render_rating(app, frame, chunks[1]);
    render_body(app, frame, chunks[2], detail);
    render_status(app, frame, chunks[3]);
}

fn render_header(frame: &mut Frame, area: Rect, detail: &crate::api::MovieDetail) {
    let meta_lines = vec![
        Line::from(vec![
            Span::styled(
                format!(" {}", detail.title),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("  ({})", detail.year),
                Style::default().fg(Color::DarkGray),
            ),
        ]),
        Line::from(vec![
            Span::styled(" Released: ", Style::default().fg(Color::DarkGray)),
            Span::styled(&detail.released, Style::default().fg(Color::White)),
            Span::raw("   "),
            Span::styled("Runtime: ", Style::default().fg(Color::DarkGray)),
            Span::styled(&detail.runtime, Style::default().fg(Color::White)),
            Span::raw("   "),
            Span::styled("Genre: ", Style::default().fg(Color::DarkGray)),
            Span::styled(&detail.genre, Style::default().fg(Color::Cyan)),
        ]),
        Line::from(vec![
            Span::styled(" ⭐ ", Style::default().fg(Color::Yellow)),
            Span::styled(
                format!("{} IMDb rating", detail.imdb_rating),
                Style::default().fg(Color::Yellow),
            ),
        ]),
    ];

    let meta_block = Paragraph::new(meta_lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(" Movie Detail "),
    );
    frame.render_widget(meta_block, area);
}

fn render_rating(app: &App, frame: &mut Frame, area: Rect) {
    let rating_line = if let Some(existing) = app.selected_watched_rating() {
        Line::from(vec![
            Span::styled(
                format!(" {}", "★".repeat(existing as usize)),
                Style::default().fg(Color::Yellow),
            ),
            Span::styled(
                format!("  You've rated it {existing}/{MAX_RATING}"),
                Style::default().fg(Color::White),
            ),
        ])
    } else {
        let mut spans = vec![Span::raw(" ")];
        for i in 1..=MAX_RATING {
            let (symbol, style) = if i <= app.user_rating {
                ("★ ", Style::default().fg(Color::Yellow))
            } else {
                ("☆ ", Style::default().fg(Color::DarkGray))
            };
            spans.push(Span::styled(symbol, style));
        }
        if app.user_rating > 0 {
            spans.push(Span::styled(
                format!(" {}/{MAX_RATING} — Enter to add to list", app.user_rating),
                Style::default().fg(Color::Green),
            ));
        } else {
            spans.push(Span::styled(
                " ←/→ or 1-9, 0 for 10".to_string(),
                Style::default().fg(Color::DarkGray),
            ));
        }
        Line::from(spans)
    };

    let rating_block = Paragraph::new(rating_line).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(" Your Rating "),
    );
    frame.render_widget(rating_block, area);
}

fn render_body(app: &App, frame: &mut Frame, area: Rect, detail: &crate::api::MovieDetail) {
    let content_lines = vec![
        Line::from(detail.plot.as_str()),
        Line::from(""),
        Line::from(vec![
            Span::styled("Starring: ", Style::default().fg(Color::DarkGray)),
            Span::raw(detail.actors.as_str()),
        ]),
        Line::from(vec![
            Span::styled("Directed by: ", Style::default().fg(Color::DarkGray)),
            Span::raw(detail.director.as_str()),
        ]),
    ];

    let content = Paragraph::new(content_lines)
        .wrap(Wrap { trim: false })
        .scroll((app.detail_scroll, 0))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray))
                .title(" Plot ")
                .title_bottom(
                    Line::from(format!(" scroll: {} ", app.detail_scroll))
                        .alignment(Alignment::Right),
                ),
        );
    frame.render_widget(content, area);
}

fn render_status(app: &App, frame: &mut Frame, area: Rect) {
    let status_line = Line::from(vec![
        Span::styled(
            " ←/→",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" Rate  "),
        Span::styled(
            "Enter",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" Add  "),
        Span::styled(
            "↑↓",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" Scroll  "),
        Span::styled(
            "Esc",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" Back  "),
        Span::styled(&app.status_msg, Style::default().fg(Color::DarkGray)),
    ]);
    let status_bar = Paragraph::new(status_line);
    frame.render_widget(status_bar, area);
}
