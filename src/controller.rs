//! Search session state and the operations that mutate it.
//!
//! [`SearchController`] owns the [`SessionState`] and is the only thing that
//! changes it: `mount`, `submit`, `load_more` and `dismiss` come from the UI,
//! and `poll` folds finished fetches back in on the UI thread.
//!
//! Each fetch runs on its own worker thread and reports back over a channel.
//! Requests carry a [`FetchTicket`] captured when they are issued, so the hits
//! are merged under the key that was searched rather than whatever key is
//! active when the response lands. Issuing a new request (or a cache hit on
//! submit for a different key) moves the generation on and cancels the
//! previous request; outcomes from an older generation are dropped.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread;

use crate::error::FetchError;
use crate::hn_client::SearchBackend;
use crate::models::{Hit, PageResult};
use crate::store::ResultStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchStatus {
    Idle,
    Loading,
    Success,
    Failed,
}

/// Identity of one issued request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub search_key: String,
    pub page: u32,
    pub generation: u64,
}

#[derive(Debug)]
pub struct FetchOutcome {
    pub ticket: FetchTicket,
    pub result: Result<PageResult, FetchError>,
}

#[derive(Debug, Clone)]
pub struct SessionState {
    /// Contents of the search box; only becomes a search key on submit.
    pub query_text: String,
    pub active_search_key: String,
    pub results: ResultStore,
    pub last_error: Option<FetchError>,
    pub status: SearchStatus,
}

impl SessionState {
    pub fn new(default_query: &str) -> Self {
        Self {
            query_text: default_query.to_string(),
            active_search_key: String::new(),
            results: ResultStore::new(),
            last_error: None,
            status: SearchStatus::Idle,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.status == SearchStatus::Loading
    }

    pub fn active_hits(&self) -> &[Hit] {
        self.results.hits(&self.active_search_key)
    }

    pub fn active_page(&self) -> u32 {
        self.results.page(&self.active_search_key)
    }
}

struct InFlight {
    ticket: FetchTicket,
    cancelled: Arc<AtomicBool>,
}

type Notifier = Arc<dyn Fn() + Send + Sync>;

pub struct SearchController<B: SearchBackend> {
    backend: Arc<B>,
    session: SessionState,
    generation: u64,
    in_flight: Option<InFlight>,
    outcome_tx: Sender<FetchOutcome>,
    outcome_rx: Receiver<FetchOutcome>,
    notifier: Option<Notifier>,
}

impl<B: SearchBackend> SearchController<B> {
    pub fn new(backend: B, default_query: &str) -> Self {
        let (outcome_tx, outcome_rx) = mpsc::channel();
        Self {
            backend: Arc::new(backend),
            session: SessionState::new(default_query),
            generation: 0,
            in_flight: None,
            outcome_tx,
            outcome_rx,
            notifier: None,
        }
    }

    /// Called from the worker thread after an outcome is sent, e.g. to wake the UI.
    pub fn with_notifier<F>(mut self, notify: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.notifier = Some(Arc::new(notify));
        self
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn set_query_text(&mut self, text: impl Into<String>) {
        self.session.query_text = text.into();
    }

    /// Initial search for the default query text.
    pub fn mount(&mut self) {
        let query = self.session.query_text.clone();
        self.submit(&query);
    }

    pub fn submit(&mut self, query: &str) {
        self.session.active_search_key = query.to_string();

        if self.session.results.needs_fetch(query) {
            self.issue(query.to_string(), 0);
        } else if self.in_flight_for(query) {
            // A pending page for the same key (e.g. from load_more) keeps going
            tracing::debug!(query, "search served from cache, next page still loading");
        } else {
            tracing::debug!(query, "search served from cache");
            self.cancel_in_flight();
            self.session.status = SearchStatus::Success;
            self.session.last_error = None;
        }
    }

    /// Always fetches the next page of the active key, cached or not.
    pub fn load_more(&mut self) {
        let key = self.session.active_search_key.clone();
        let page = self.session.active_page() + 1;
        self.issue(key, page);
    }

    pub fn dismiss(&mut self, object_id: &str) {
        let key = &self.session.active_search_key;
        self.session.results.dismiss(key, object_id);
    }

    /// Applies every finished fetch; returns true if the session changed.
    pub fn poll(&mut self) -> bool {
        let mut changed = false;
        while let Ok(outcome) = self.outcome_rx.try_recv() {
            changed |= self.apply_outcome(outcome);
        }
        changed
    }

    #[cfg(test)]
    pub(crate) fn in_flight_ticket(&self) -> Option<&FetchTicket> {
        self.in_flight.as_ref().map(|in_flight| &in_flight.ticket)
    }

    fn in_flight_for(&self, search_key: &str) -> bool {
        self.in_flight
            .as_ref()
            .is_some_and(|in_flight| in_flight.ticket.search_key == search_key)
    }

    pub(crate) fn apply_outcome(&mut self, outcome: FetchOutcome) -> bool {
        let current = self
            .in_flight
            .as_ref()
            .is_some_and(|in_flight| in_flight.ticket == outcome.ticket);
        if !current {
            tracing::warn!(
                key = %outcome.ticket.search_key,
                page = outcome.ticket.page,
                generation = outcome.ticket.generation,
                "discarding stale search response"
            );
            return false;
        }
        self.in_flight = None;

        let FetchOutcome { ticket, result } = outcome;
        match result {
            Ok(PageResult { hits, page }) => {
                tracing::info!(key = %ticket.search_key, page, hits = hits.len(), "merging search results");
                self.session.results.merge(&ticket.search_key, hits, page);
                self.session.status = SearchStatus::Success;
                self.session.last_error = None;
            }
            Err(err) => {
                tracing::warn!(key = %ticket.search_key, page = ticket.page, error = %err, "search request failed");
                self.session.status = SearchStatus::Failed;
                self.session.last_error = Some(err);
            }
        }
        true
    }

    fn cancel_in_flight(&mut self) {
        if let Some(in_flight) = self.in_flight.take() {
            in_flight.cancelled.store(true, Ordering::SeqCst);
            tracing::debug!(
                key = %in_flight.ticket.search_key,
                page = in_flight.ticket.page,
                "cancelled in-flight search"
            );
        }
        self.generation += 1;
    }

    fn issue(&mut self, search_key: String, page: u32) {
        self.cancel_in_flight();

        let ticket = FetchTicket {
            search_key,
            page,
            generation: self.generation,
        };
        let cancelled = Arc::new(AtomicBool::new(false));
        tracing::debug!(key = %ticket.search_key, page, generation = ticket.generation, "issuing search");

        self.session.status = SearchStatus::Loading;
        self.in_flight = Some(InFlight {
            ticket: ticket.clone(),
            cancelled: cancelled.clone(),
        });

        let backend = self.backend.clone();
        let tx = self.outcome_tx.clone();
        let notifier = self.notifier.clone();

        thread::spawn(move || {
            let result = backend.search(&ticket.search_key, ticket.page);

            // A blocking request can't be aborted mid-flight; drop its result instead.
            if cancelled.load(Ordering::SeqCst) {
                return;
            }
            if tx.send(FetchOutcome { ticket, result }).is_err() {
                return;
            }
            if let Some(notify) = notifier {
                notify();
            }
        });
    }
}
