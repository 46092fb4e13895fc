//! As-you-type category suggestions with a trailing-edge debounce
//!
//! Local rules answer immediately. When they cannot, a remote lookup is
//! scheduled and only fires once the input has been quiet for the configured
//! interval. Every call gets a sequence number; a remote answer is published
//! only while its request is still the newest one and no newer answer has
//! been published.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::core::categorize::Categorizer;
use crate::core::stock::StockItem;

/// Shorter inputs are ignored entirely
pub const MIN_SUGGEST_LEN: usize = 2;

/// Shorter inputs never reach the network
pub const MIN_REMOTE_LEN: usize = 3;

/// Immediate answer to a suggestion request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Suggestion {
    /// Input too short to suggest anything
    Skipped,
    /// Answered by stock knowledge or keywords
    Local(String),
    /// A remote lookup was scheduled under this sequence number
    Pending(u64),
    /// Nothing local and too short for a remote lookup
    Unresolved,
}

/// A published remote answer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteSuggestion {
    pub seq: u64,
    pub name: String,
    pub category: String,
}

#[derive(Default)]
struct DebounceState {
    /// Sequence number of the newest request
    latest: u64,
    /// Sequence number of the newest published answer
    applied: u64,
    pending: Option<JoinHandle<()>>,
}

fn lock(state: &Mutex<DebounceState>) -> MutexGuard<'_, DebounceState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Debounced suggestion source for one input field
pub struct Suggester {
    categorizer: Categorizer,
    quiet: Duration,
    state: Arc<Mutex<DebounceState>>,
    tx: Arc<watch::Sender<Option<RemoteSuggestion>>>,
}

impl Suggester {
    pub fn new(categorizer: Categorizer, quiet: Duration) -> Self {
        let (tx, _rx) = watch::channel(None);
        Self {
            categorizer,
            quiet,
            state: Arc::new(Mutex::new(DebounceState::default())),
            tx: Arc::new(tx),
        }
    }

    /// Receiver of published remote answers
    pub fn subscribe(&self) -> watch::Receiver<Option<RemoteSuggestion>> {
        self.tx.subscribe()
    }

    /// Most recently published remote answer
    pub fn latest(&self) -> Option<RemoteSuggestion> {
        self.tx.borrow().clone()
    }

    /// Suggest a category for the current input
    ///
    /// Every call supersedes the previous one, including any remote lookup
    /// that is still waiting or in flight.
    pub fn suggest(&self, name: &str, known: &[StockItem]) -> Suggestion {
        let query = name.trim().to_string();
        let seq = {
            let mut state = lock(&self.state);
            state.latest += 1;
            if let Some(pending) = state.pending.take() {
                pending.abort();
            }
            state.latest
        };

        let length = query.chars().count();
        if length < MIN_SUGGEST_LEN {
            return Suggestion::Skipped;
        }
        if let Some(category) = self.categorizer.classify(&query, known) {
            return Suggestion::Local(category);
        }
        if length < MIN_REMOTE_LEN {
            return Suggestion::Unresolved;
        }

        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            warn!("No async runtime, skipping remote suggestion");
            return Suggestion::Unresolved;
        };

        let categorizer = self.categorizer.clone();
        let quiet = self.quiet;
        let state = Arc::clone(&self.state);
        let tx = Arc::clone(&self.tx);

        let handle = runtime.spawn(async move {
            tokio::time::sleep(quiet).await;
            if lock(&state).latest != seq {
                return;
            }

            let Some(category) = categorizer.classify_remote(&query).await else {
                return;
            };

            let mut state = lock(&state);
            if state.latest != seq || seq <= state.applied {
                debug!(seq, latest = state.latest, "Dropping stale suggestion");
                return;
            }
            state.applied = seq;
            tx.send_replace(Some(RemoteSuggestion {
                seq,
                name: query,
                category,
            }));
        });

        lock(&self.state).pending = Some(handle);
        Suggestion::Pending(seq)
    }
}

impl Drop for Suggester {
    fn drop(&mut self) {
        if let Some(pending) = lock(&self.state).pending.take() {
            pending.abort();
        }
    }
}
