mod api;
mod app;
mod fetch;
mod store;
mod ui;

use app::{App, InputMode, View};
use clap::Parser;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::path::PathBuf;

/// TUI for searching movies via OMDb and keeping a rated watchlist
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// OMDb API key (falls back to $OMDB_API_KEY, then the built-in key)
    #[arg(short, long)]
    api_key: Option<String>,

    /// Path to the watched-list JSON file
    #[arg(short, long)]
    data_file: Option<PathBuf>,

    /// Start with this search query already applied
    #[arg(short, long)]
    query: Option<String>,
}

const DEFAULT_API_KEY: &str = "ee0844bf";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let api_key = cli
        .api_key
        .or_else(|| std::env::var("OMDB_API_KEY").ok())
        .unwrap_or_else(|| DEFAULT_API_KEY.to_string());

    let data_file = match cli.data_file {
        Some(path) => path,
        None => store::WatchedStore::default_path()
            .ok_or("Could not determine home directory")?,
    };

    let watched = match store::WatchedStore::load(&data_file) {
        Ok(watched) => watched,
        Err(e) => {
            eprintln!(
                "Error: failed to load watched list from {}: {e}",
                data_file.display()
            );
            std::process::exit(1);
        }
    };

    // Create app
    let client = api::OmdbClient::new(api_key);
    let mut app = App::new(client, watched);

    if let Some(query) = cli.query {
        app.set_query(query);
    }

    // Init terminal
    let mut terminal = ratatui::init();

    // Main loop
    let result = run_app(&mut terminal, &mut app).await;

    // Restore terminal
    ratatui::restore();

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }

    Ok(())
}

async fn run_app(
    terminal: &mut ratatui::DefaultTerminal,
    app: &mut App,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        // Replies from search/detail tasks arrive over the fetch channel.
        app.pump_fetch_events();

        terminal.draw(|frame| ui::render(app, frame))?;

        if app.should_quit {
            return Ok(());
        }

        // Poll for events with a 250ms timeout so fetch replies keep flowing
        if crossterm::event::poll(std::time::Duration::from_millis(250))? {
            match event::read()? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    handle_key(app, key);
                }
                _ => {}
            }
        }
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    // Help toggle (global)
    if key.code == KeyCode::Char('?') && app.input_mode == InputMode::Normal {
        app.show_help = !app.show_help;
        return;
    }

    // If help is showing, any key closes it
    if app.show_help {
        app.show_help = false;
        return;
    }

    // Ctrl+C always quits
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return;
    }

    // Handle based on input mode and view
    if app.input_mode == InputMode::Editing {
        handle_query_input(app, key);
        return;
    }
    match app.view {
        View::Search => handle_search_key(app, key),
        View::Detail => handle_detail_key(app, key),
        View::Watched => handle_watched_key(app, key),
    }
}

fn handle_query_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Enter => {
            app.input_mode = InputMode::Normal;
        }
        KeyCode::Esc => {
            app.input_mode = InputMode::Normal;
        }
        KeyCode::Backspace => {
            app.query_backspace();
        }
        KeyCode::Char(c) => {
            app.query_char(c);
        }
        _ => {}
    }
}

fn handle_search_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => {
            app.should_quit = true;
        }
        KeyCode::Char('/') => {
            app.input_mode = InputMode::Editing;
        }
        KeyCode::Down | KeyCode::Char('j') => {
            app.results_next();
        }
        KeyCode::Up | KeyCode::Char('k') => {
            app.results_prev();
        }
        KeyCode::Enter => {
            app.open_detail();
        }
        KeyCode::Char('w') | KeyCode::Tab => {
            app.toggle_watched_view();
        }
        KeyCode::Esc => {
            // Clear query
            if !app.query.is_empty() {
                app.clear_query();
            }
        }
        _ => {}
    }
}

fn handle_detail_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => {
            app.close_detail();
        }
        KeyCode::Right | KeyCode::Char('l') => {
            app.rating_up();
        }
        KeyCode::Left | KeyCode::Char('h') => {
            app.rating_down();
        }
        KeyCode::Char(c @ '1'..='9') => {
            app.set_rating(c as u8 - b'0');
        }
        KeyCode::Char('0') => {
            app.set_rating(app::MAX_RATING);
        }
        KeyCode::Enter => {
            app.commit_rating();
        }
        KeyCode::Down | KeyCode::Char('j') => {
            app.scroll_down();
        }
        KeyCode::Up | KeyCode::Char('k') => {
            app.scroll_up();
        }
        _ => {}
    }
}

fn handle_watched_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => {
            app.should_quit = true;
        }
        KeyCode::Esc | KeyCode::Char('w') | KeyCode::Tab => {
            app.toggle_watched_view();
        }
        KeyCode::Down | KeyCode::Char('j') => {
            app.watched_next();
        }
        KeyCode::Up | KeyCode::Char('k') => {
            app.watched_prev();
        }
        KeyCode::Enter => {
            app.open_detail();
        }
        KeyCode::Char('d') | KeyCode::Delete => {
            app.remove_watched();
        }
        _ => {}
    }
}
