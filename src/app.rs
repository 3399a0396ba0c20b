use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;

use crate::api::{MovieDetail, OmdbClient, SearchResult};
use crate::fetch::{self, FetchEvent};
use crate::store::{WatchedEntry, WatchedStore};

/// Which view is currently active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Search,
    Detail,
    Watched,
}

/// Input mode for the query bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Editing,
}

/// State of the keystroke-driven search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchState {
    /// Query below the minimum length; nothing fetched.
    Idle,
    Loading,
    Loaded,
    Failed(String),
}

/// State of the on-demand detail fetch.
#[derive(Debug)]
pub enum DetailState {
    Loading,
    Loaded(MovieDetail),
    Failed(String),
}

/// Queries shorter than this never reach the network.
pub const MIN_QUERY_LEN: usize = 3;
pub const MAX_RATING: u8 = 10;

/// Main application state.
pub struct App {
    pub client: OmdbClient,
    pub should_quit: bool,
    pub view: View,
    pub show_help: bool,

    // Search view state
    pub query: String,
    pub input_mode: InputMode,
    pub search_state: SearchState,
    pub results: Vec<SearchResult>,
    pub total_results: usize,
    pub results_selected: usize,

    // Detail view state
    pub detail: Option<DetailState>,
    pub selected_id: Option<String>,
    pub detail_scroll: u16,
    pub user_rating: u8, // 0 = not chosen yet
    pub rating_revisions: u32,
    detail_origin: View,

    // Watched view state
    pub watched: WatchedStore,
    pub watched_selected: usize,

    // Fetch plumbing. Sequence numbers pair spawned tasks with their replies;
    // a reply whose sequence is stale is dropped in apply_fetch_event.
    search_seq: u64,
    detail_seq: u64,
    pending_search: Option<JoinHandle<()>>,
    pending_detail: Option<JoinHandle<()>>,
    events_tx: UnboundedSender<FetchEvent>,
    events_rx: UnboundedReceiver<FetchEvent>,

    // Status message
    pub status_msg: String,
}

impl App {
    pub fn new(client: OmdbClient, watched: WatchedStore) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let status_msg = format!("{} watched movies loaded", watched.len());
        Self {
            client,
            should_quit: false,
            view: View::Search,
            show_help: false,

            query: String::new(),
            input_mode: InputMode::Normal,
            search_state: SearchState::Idle,
            results: Vec::new(),
            total_results: 0,
            results_selected: 0,

            detail: None,
            selected_id: None,
            detail_scroll: 0,
            user_rating: 0,
            rating_revisions: 0,
            detail_origin: View::Search,

            watched,
            watched_selected: 0,

            search_seq: 0,
            detail_seq: 0,
            pending_search: None,
            pending_detail: None,
            events_tx,
            events_rx,

            status_msg,
        }
    }

    // ── Query editing ──

    pub fn query_char(&mut self, c: char) {
        self.query.push(c);
        self.on_query_changed();
    }

    pub fn query_backspace(&mut self) {
        self.query.pop();
        self.on_query_changed();
    }

    pub fn clear_query(&mut self) {
        self.query.clear();
        self.on_query_changed();
    }

    /// Replace the whole query at once (CLI-provided initial search).
    pub fn set_query(&mut self, query: String) {
        self.query = query;
        self.on_query_changed();
    }

    /// Restart the search pipeline for the current query. The previous
    /// in-flight request (if any) is aborted and its reply discarded.
    fn on_query_changed(&mut self) {
        self.search_seq += 1;
        if let Some(handle) = self.pending_search.take() {
            handle.abort();
        }
        self.results_selected = 0;
        if self.query.chars().count() < MIN_QUERY_LEN {
            self.results.clear();
            self.total_results = 0;
            self.search_state = SearchState::Idle;
            return;
        }
        self.search_state = SearchState::Loading;
        self.pending_search = Some(fetch::spawn_search(
            self.client.clone(),
            self.query.clone(),
            self.search_seq,
            self.events_tx.clone(),
        ));
    }

    // ── Fetch events ──

    /// Drain replies from fetch tasks. Called once per loop iteration.
    pub fn pump_fetch_events(&mut self) {
        while let Ok(event) = self.events_rx.try_recv() {
            self.apply_fetch_event(event);
        }
    }

    fn apply_fetch_event(&mut self, event: FetchEvent) {
        match event {
            FetchEvent::SearchLoaded { seq, page } => {
                if seq != self.search_seq {
                    return;
                }
                self.pending_search = None;
                self.results = page.results;
                self.total_results = page.total_results;
                self.results_selected = 0;
                self.search_state = SearchState::Loaded;
                self.status_msg = format!(
                    "Found {} of {} results for \"{}\"",
                    self.results.len(),
                    self.total_results,
                    self.query
                );
            }
            FetchEvent::SearchFailed { seq, message } => {
                if seq != self.search_seq {
                    return;
                }
                self.pending_search = None;
                self.results.clear();
                self.total_results = 0;
                self.search_state = SearchState::Failed(message);
            }
            FetchEvent::DetailLoaded { seq, detail } => {
                if seq != self.detail_seq {
                    return;
                }
                self.pending_detail = None;
                self.detail = Some(DetailState::Loaded(detail));
            }
            FetchEvent::DetailFailed { seq, message } => {
                if seq != self.detail_seq {
                    return;
                }
                self.pending_detail = None;
                self.detail = Some(DetailState::Failed(message));
            }
        }
    }

    // ── List navigation ──

    pub fn results_next(&mut self) {
        if self.results_selected + 1 < self.results.len() {
            self.results_selected += 1;
        }
    }

    pub fn results_prev(&mut self) {
        self.results_selected = self.results_selected.saturating_sub(1);
    }

    pub fn watched_next(&mut self) {
        if self.watched_selected + 1 < self.watched.len() {
            self.watched_selected += 1;
        }
    }

    pub fn watched_prev(&mut self) {
        self.watched_selected = self.watched_selected.saturating_sub(1);
    }

    // ── Detail view ──

    /// Open the detail view for the currently selected item.
    pub fn open_detail(&mut self) {
        let id = match self.view {
            View::Search => self
                .results
                .get(self.results_selected)
                .map(|r| r.imdb_id.clone()),
            View::Watched => self
                .watched
                .entries()
                .get(self.watched_selected)
                .map(|e| e.imdb_id.clone()),
            View::Detail => None,
        };
        if let Some(id) = id {
            self.open_detail_by_id(id);
        }
    }

    fn open_detail_by_id(&mut self, imdb_id: String) {
        self.detail_seq += 1;
        if let Some(handle) = self.pending_detail.take() {
            handle.abort();
        }
        self.detail_origin = self.view;
        self.detail = Some(DetailState::Loading);
        self.selected_id = Some(imdb_id.clone());
        self.detail_scroll = 0;
        self.user_rating = 0;
        self.rating_revisions = 0;
        self.view = View::Detail;
        self.pending_detail = Some(fetch::spawn_detail(
            self.client.clone(),
            imdb_id,
            self.detail_seq,
            self.events_tx.clone(),
        ));
    }

    /// Leave the detail view, discarding any in-flight fetch.
    pub fn close_detail(&mut self) {
        self.detail_seq += 1;
        if let Some(handle) = self.pending_detail.take() {
            handle.abort();
        }
        self.detail = None;
        self.selected_id = None;
        self.detail_scroll = 0;
        self.user_rating = 0;
        self.rating_revisions = 0;
        self.view = self.detail_origin;
    }

    pub fn scroll_down(&mut self) {
        self.detail_scroll = self.detail_scroll.saturating_add(1);
    }

    pub fn scroll_up(&mut self) {
        self.detail_scroll = self.detail_scroll.saturating_sub(1);
    }

    // ── Rating ──

    /// True when the displayed movie is already on the watched list.
    pub fn selected_is_watched(&self) -> bool {
        self.selected_id
            .as_deref()
            .is_some_and(|id| self.watched.contains(id))
    }

    /// Stored rating for the displayed movie, if it was already added.
    pub fn selected_watched_rating(&self) -> Option<u8> {
        let id = self.selected_id.as_deref()?;
        self.watched.get(id).map(|e| e.user_rating)
    }

    /// Set the star rating, clamped to 1..=10. Each change counts as one
    /// revision; committing records the revision total with the entry.
    pub fn set_rating(&mut self, rating: u8) {
        if self.selected_is_watched() {
            return;
        }
        let clamped = rating.clamp(1, MAX_RATING);
        if clamped != self.user_rating {
            self.user_rating = clamped;
            self.rating_revisions += 1;
        }
    }

    pub fn rating_up(&mut self) {
        self.set_rating(self.user_rating.saturating_add(1));
    }

    pub fn rating_down(&mut self) {
        self.set_rating(self.user_rating.saturating_sub(1));
    }

    /// Commit the chosen rating: build a watched entry from the loaded detail,
    /// persist it, and return to the view the detail was opened from.
    pub fn commit_rating(&mut self) {
        if self.user_rating == 0 || self.selected_is_watched() {
            return;
        }
        let Some(DetailState::Loaded(detail)) = &self.detail else {
            return;
        };
        let entry = WatchedEntry {
            imdb_id: detail.imdb_id.clone(),
            title: detail.title.clone(),
            year: detail.year.clone(),
            poster: detail.poster.clone(),
            imdb_rating: detail.imdb_rating_value(),
            user_rating: self.user_rating,
            runtime_min: detail.runtime_minutes(),
            rating_revisions: self.rating_revisions,
            added_at: chrono::Utc::now(),
        };
        let title = entry.title.clone();
        let rating = entry.user_rating;
        match self.watched.add(entry) {
            Ok(()) => {
                self.status_msg = format!("Added {title} ({rating}★)");
                self.close_detail();
            }
            Err(e) => {
                self.status_msg = e.to_string();
            }
        }
    }

    // ── Watched list ──

    /// Remove the selected watched entry and persist the change.
    pub fn remove_watched(&mut self) {
        let target = self
            .watched
            .entries()
            .get(self.watched_selected)
            .map(|e| (e.imdb_id.clone(), e.title.clone()));
        let Some((id, title)) = target else {
            return;
        };
        match self.watched.remove(&id) {
            Ok(true) => {
                if self.watched_selected >= self.watched.len() {
                    self.watched_selected = self.watched.len().saturating_sub(1);
                }
                self.status_msg = format!("Removed {title}");
            }
            Ok(false) => {}
            Err(e) => self.status_msg = e.to_string(),
        }
    }

    /// Switch between the search and watched views.
    pub fn toggle_watched_view(&mut self) {
        self.view = match self.view {
            View::Watched => View::Search,
            _ => View::Watched,
        };
        if self.watched_selected >= self.watched.len() {
            self.watched_selected = self.watched.len().saturating_sub(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::SearchPage;

    fn test_app() -> (App, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let store = WatchedStore::load(dir.path().join("watched.json")).unwrap();
        (App::new(OmdbClient::new("test-key"), store), dir)
    }

    fn loaded_detail(id: &str) -> DetailState {
        DetailState::Loaded(MovieDetail {
            imdb_id: id.to_string(),
            title: "Inception".to_string(),
            year: "2010".to_string(),
            runtime: "148 min".to_string(),
            imdb_rating: "8.8".to_string(),
            ..Default::default()
        })
    }

    #[test]
    fn test_short_query_never_spawns_a_fetch() {
        let (mut app, _dir) = test_app();
        app.query_char('i');
        app.query_char('n');
        assert_eq!(app.search_state, SearchState::Idle);
        assert!(app.pending_search.is_none());

        // Shrinking back below the threshold clears previous results too.
        app.query_backspace();
        assert_eq!(app.search_state, SearchState::Idle);
        assert!(app.pending_search.is_none());
        assert!(app.results.is_empty());
    }

    #[tokio::test]
    async fn test_third_character_starts_a_fetch() {
        let (mut app, _dir) = test_app();
        app.query_char('i');
        app.query_char('n');
        app.query_char('c');
        assert_eq!(app.search_state, SearchState::Loading);
        assert!(app.pending_search.is_some());
    }

    #[tokio::test]
    async fn test_superseding_query_discards_stale_results() {
        let (mut app, _dir) = test_app();
        for c in "matrix".chars() {
            app.query_char(c);
        }
        let stale_seq = app.search_seq;
        app.query_char('!');
        assert!(app.search_seq > stale_seq);

        // A reply from the superseded request arrives late: dropped.
        app.apply_fetch_event(FetchEvent::SearchLoaded {
            seq: stale_seq,
            page: SearchPage {
                results: vec![SearchResult {
                    imdb_id: "tt0133093".to_string(),
                    title: "The Matrix".to_string(),
                    year: "1999".to_string(),
                    poster: String::new(),
                }],
                total_results: 1,
            },
        });
        assert_eq!(app.search_state, SearchState::Loading);
        assert!(app.results.is_empty());

        // The current request's reply is applied.
        app.apply_fetch_event(FetchEvent::SearchLoaded {
            seq: app.search_seq,
            page: SearchPage::default(),
        });
        assert_eq!(app.search_state, SearchState::Loaded);
    }

    #[test]
    fn test_stale_search_failure_is_suppressed() {
        let (mut app, _dir) = test_app();
        app.apply_fetch_event(FetchEvent::SearchFailed {
            seq: 99,
            message: "boom".to_string(),
        });
        assert_eq!(app.search_state, SearchState::Idle);
    }

    #[test]
    fn test_rating_clamps_and_counts_revisions() {
        let (mut app, _dir) = test_app();
        app.selected_id = Some("tt1375666".to_string());
        app.detail = Some(loaded_detail("tt1375666"));

        app.set_rating(4);
        assert_eq!(app.user_rating, 4);
        assert_eq!(app.rating_revisions, 1);

        // Setting the same value again is not a revision.
        app.set_rating(4);
        assert_eq!(app.rating_revisions, 1);

        app.rating_up();
        assert_eq!(app.user_rating, 5);
        assert_eq!(app.rating_revisions, 2);

        app.set_rating(99);
        assert_eq!(app.user_rating, MAX_RATING);

        app.user_rating = 0;
        app.rating_down();
        assert_eq!(app.user_rating, 1);
    }

    #[test]
    fn test_commit_rating_adds_watched_entry() {
        let (mut app, _dir) = test_app();
        app.view = View::Detail;
        app.detail_origin = View::Search;
        app.selected_id = Some("tt1375666".to_string());
        app.detail = Some(loaded_detail("tt1375666"));

        // Nothing happens with no rating chosen.
        app.commit_rating();
        assert!(app.watched.is_empty());

        app.set_rating(9);
        app.set_rating(8);
        app.commit_rating();

        assert_eq!(app.view, View::Search);
        let entry = app.watched.get("tt1375666").expect("entry added");
        assert_eq!(entry.user_rating, 8);
        assert_eq!(entry.rating_revisions, 2);
        assert_eq!(entry.runtime_min, Some(148));
        assert_eq!(entry.imdb_rating, Some(8.8));
    }

    #[test]
    fn test_rating_locked_once_watched() {
        let (mut app, _dir) = test_app();
        app.view = View::Detail;
        app.selected_id = Some("tt1375666".to_string());
        app.detail = Some(loaded_detail("tt1375666"));
        app.set_rating(7);
        app.commit_rating();

        // Reopen the same movie: the stored rating shows, the widget is inert.
        app.view = View::Detail;
        app.selected_id = Some("tt1375666".to_string());
        app.detail = Some(loaded_detail("tt1375666"));
        assert!(app.selected_is_watched());
        assert_eq!(app.selected_watched_rating(), Some(7));
        app.set_rating(3);
        assert_eq!(app.user_rating, 0);
    }

    #[test]
    fn test_remove_watched_clamps_selection() {
        let (mut app, _dir) = test_app();
        for (i, id) in ["tt1", "tt2", "tt3"].iter().enumerate() {
            app.view = View::Detail;
            app.selected_id = Some(id.to_string());
            let mut detail = loaded_detail(id);
            if let DetailState::Loaded(d) = &mut detail {
                d.title = format!("Movie {i}");
            }
            app.detail = Some(detail);
            app.set_rating(5);
            app.commit_rating();
        }
        assert_eq!(app.watched.len(), 3);

        app.view = View::Watched;
        app.watched_selected = 2;
        app.remove_watched();
        assert_eq!(app.watched.len(), 2);
        assert_eq!(app.watched_selected, 1);

        app.remove_watched();
        app.remove_watched();
        assert!(app.watched.is_empty());
        assert_eq!(app.watched_selected, 0);

        // Removing from an empty list is a no-op.
        app.remove_watched();
    }
}
