use crate::app::App;
use crate::ui::truncate_str;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};

pub fn render(app: &App, frame: &mut Frame) {
    let area = frame.area();

    // Layout: summary(4) + list(min) + status(1)
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Min(5),
            Constraint::Length(1),
        ])
        .split(area);

    // ── Summary ──
    let stats = app.watched.stats();
    let summary_lines = vec![
        Line::from(Span::styled(
            " Movies you watched",
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(vec![
            Span::styled(
                format!(" #️⃣ {} movies", stats.count),
                Style::default().fg(Color::White),
            ),
            Span::raw("   "),
            Span::styled(
                format!("⭐ {:.1}", stats.avg_imdb_rating),
                Style::default().fg(Color::Yellow),
            ),
            Span::raw("   "),
            Span::styled(
                format!("🌟 {:.1}", stats.avg_user_rating),
                Style::default().fg(Color::Green),
            ),
            Span::raw("   "),
            Span::styled(
                format!("⏳ {:.0} min", stats.avg_runtime_min),
                Style::default().fg(Color::Cyan),
            ),
        ]),
    ];
    let summary = Paragraph::new(summary_lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(" Summary "),
    );
    frame.render_widget(summary, chunks[0]);

    // ── Watched list ──
    let list_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(" Watched ");

    if app.watched.is_empty() {
        let empty = Paragraph::new(" Nothing here yet. Rate a movie from its detail view.")
            .style(Style::default().fg(Color::DarkGray))
            .block(list_block);
        frame.render_widget(empty, chunks[1]);
    } else {
        let title_width = (area.width as usize).saturating_sub(34);
        let items: Vec<ListItem> = app
            .watched
            .entries()
            .iter()
            .map(|entry| {
                let imdb = entry
                    .imdb_rating
                    .map(|v| format!("{v:.1}"))
                    .unwrap_or_else(|| "–".to_string());
                let runtime = entry
                    .runtime_min
                    .map(|m| format!("{m} min"))
                    .unwrap_or_else(|| "–".to_string());
                let line = Line::from(vec![
                    Span::raw(format!(" {}", truncate_str(&entry.title, title_width))),
                    Span::styled(
                        format!("  ⭐ {imdb}"),
                        Style::default().fg(Color::Yellow),
                    ),
                    Span::styled(
                        format!("  🌟 {}", entry.user_rating),
                        Style::default().fg(Color::Green),
                    ),
                    Span::styled(
                        format!("  ⏳ {runtime}"),
                        Style::default().fg(Color::Cyan),
                    ),
                ]);
                ListItem::new(line)
            })
            .collect();

        let list_widget = List::new(items)
            .block(list_block)
            .highlight_style(
                Style::default()
                    .bg(Color::DarkGray)
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("▸ ");

        let mut list_state = ListState::default();
        list_state.select(Some(app.watched_selected));
        frame.render_stateful_widget(list_widget, chunks[1], &mut list_state);
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
            "Enter",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" Detail  "),
        Span::styled(
            "d",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" Remove  "),
        Span::styled(
            "w",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" Search  "),
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
    frame.render_widget(status_bar, chunks[2]);
}
