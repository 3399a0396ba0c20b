use std::time::Duration;

use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;

use crate::api::{MovieDetail, OmdbClient, SearchPage};

/// Delay before a spawned search hits the network. A superseding keystroke
/// aborts the task inside this window, so no request is ever issued for it.
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);

/// Messages sent from fetch tasks to the UI loop.
///
/// Every message carries the sequence number of the request that produced it.
/// The receiver drops anything that does not match its current sequence, so
/// an aborted or slow stale request can never overwrite fresher state.
#[derive(Debug)]
pub enum FetchEvent {
    /// Search request completed
    SearchLoaded { seq: u64, page: SearchPage },

    /// Search request failed
    SearchFailed { seq: u64, message: String },

    /// Detail fetch completed
    DetailLoaded { seq: u64, detail: MovieDetail },

    /// Detail fetch failed
    DetailFailed { seq: u64, message: String },
}

/// Spawn a debounced search against the OMDb API.
pub fn spawn_search(
    client: OmdbClient,
    query: String,
    seq: u64,
    tx: UnboundedSender<FetchEvent>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        tokio::time::sleep(SEARCH_DEBOUNCE).await;
        let event = match client.search(&query).await {
            Ok(page) => FetchEvent::SearchLoaded { seq, page },
            Err(e) => FetchEvent::SearchFailed {
                seq,
                message: e.user_message(),
            },
        };
        // The receiver may be gone during shutdown.
        let _ = tx.send(event);
    })
}

/// Spawn a detail fetch for a single movie.
pub fn spawn_detail(
    client: OmdbClient,
    imdb_id: String,
    seq: u64,
    tx: UnboundedSender<FetchEvent>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let event = match client.detail(&imdb_id).await {
            Ok(detail) => FetchEvent::DetailLoaded { seq, detail },
            Err(e) => FetchEvent::DetailFailed {
                seq,
                message: e.user_message(),
            },
        };
        let _ = tx.send(event);
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_event_variants() {
        let msg = FetchEvent::SearchLoaded {
            seq: 1,
            page: SearchPage::default(),
        };
        assert!(matches!(msg, FetchEvent::SearchLoaded { seq: 1, .. }));

        let msg = FetchEvent::SearchFailed {
            seq: 2,
            message: "Network timeout".to_string(),
        };
        assert!(matches!(msg, FetchEvent::SearchFailed { seq: 2, .. }));

        let msg = FetchEvent::DetailFailed {
            seq: 3,
            message: "Incorrect IMDb ID.".to_string(),
        };
        assert!(matches!(msg, FetchEvent::DetailFailed { seq: 3, .. }));
    }

    #[tokio::test]
    async fn test_channel_round_trip() {
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        tx.send(FetchEvent::SearchFailed {
            seq: 7,
            message: "boom".to_string(),
        })
        .unwrap();
        match rx.try_recv().unwrap() {
            FetchEvent::SearchFailed { seq, message } => {
                assert_eq!(seq, 7);
                assert_eq!(message, "boom");
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }
}
