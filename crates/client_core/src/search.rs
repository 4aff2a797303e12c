//! Live hero search.
//!
//! Terms pushed through [`SearchTerms`] are debounced, deduplicated against
//! the last accepted term, and looked up through [`HeroService::search_heroes`].
//! Accepting a term aborts the lookup of the previous one, and a lookup's
//! batch is only delivered while its token is still current, so batches
//! always arrive in acceptance order.

use std::{
    pin::Pin,
    task::{Context, Poll},
    time::Duration,
};

use futures::Stream;
use shared::domain::Hero;
use tokio::{
    sync::mpsc,
    task::JoinHandle,
    time::{sleep_until, Instant},
};
use tokio_stream::{wrappers::UnboundedReceiverStream, StreamExt};
use tracing::{debug, trace};

use crate::HeroService;

/// Quiet period a term must survive before it is looked up.
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);

pub struct HeroSearch {
    service: HeroService,
    debounce: Duration,
}

impl HeroSearch {
    pub fn new(service: HeroService) -> Self {
        Self {
            service,
            debounce: SEARCH_DEBOUNCE,
        }
    }

    pub fn debounce(mut self, window: Duration) -> Self {
        self.debounce = window;
        self
    }

    /// Starts the driver task. Must be called inside a tokio runtime.
    pub fn spawn(self) -> (SearchTerms, SearchResults) {
        let (terms_tx, terms_rx) = mpsc::unbounded_channel();
        let (results_tx, results_rx) = mpsc::unbounded_channel();

        let driver = SearchDriver {
            service: self.service,
            window: self.debounce,
            results: results_tx,
            pending: None,
            deadline: Instant::now(),
            last_accepted: None,
            token: 0,
            outstanding: None,
        };
        let driver = tokio::spawn(driver.run(terms_rx));

        (
            SearchTerms { tx: terms_tx },
            SearchResults {
                inner: UnboundedReceiverStream::new(results_rx),
                driver,
            },
        )
    }
}

/// Input side of the pipeline. Cheap to clone; pushing never blocks.
#[derive(Clone)]
pub struct SearchTerms {
    tx: mpsc::UnboundedSender<String>,
}

impl SearchTerms {
    pub fn search(&self, term: impl Into<String>) {
        if self.tx.send(term.into()).is_err() {
            debug!("search pipeline stopped; term dropped");
        }
    }
}

/// Output side of the pipeline: one batch per accepted term.
///
/// Dropping it stops the pipeline and aborts any lookup in flight.
pub struct SearchResults {
    inner: UnboundedReceiverStream<Vec<Hero>>,
    driver: JoinHandle<()>,
}

impl SearchResults {
    pub async fn next_batch(&mut self) -> Option<Vec<Hero>> {
        self.inner.next().await
    }

    /// A batch that has already been delivered, without waiting.
    pub fn try_next_batch(&mut self) -> Option<Vec<Hero>> {
        self.inner.as_mut().try_recv().ok()
    }
}

impl Stream for SearchResults {
    type Item = Vec<Hero>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.inner).poll_next(cx)
    }
}

impl Drop for SearchResults {
    fn drop(&mut self) {
        self.driver.abort();
    }
}

struct Lookup {
    token: u64,
    heroes: Vec<Hero>,
}

struct SearchDriver {
    service: HeroService,
    window: Duration,
    results: mpsc::UnboundedSender<Vec<Hero>>,
    pending: Option<String>,
    deadline: Instant,
    last_accepted: Option<String>,
    token: u64,
    outstanding: Option<JoinHandle<()>>,
}

impl SearchDriver {
    async fn run(mut self, mut terms: mpsc::UnboundedReceiver<String>) {
        let (done_tx, mut done_rx) = mpsc::unbounded_channel::<Lookup>();
        let mut input_open = true;

        loop {
            tokio::select! {
                term = terms.recv(), if input_open => match term {
                    Some(term) => self.hold(term),
                    None => {
                        // Input closed: a held term goes out right away.
                        input_open = false;
                        if let Some(term) = self.pending.take() {
                            self.accept(term, &done_tx);
                        }
                    }
                },
                () = sleep_until(self.deadline), if self.pending.is_some() => {
                    if let Some(term) = self.pending.take() {
                        self.accept(term, &done_tx);
                    }
                }
                Some(lookup) = done_rx.recv() => {
                    if lookup.token == self.token {
                        self.outstanding = None;
                        if self.results.send(lookup.heroes).is_err() {
                            debug!("search results receiver dropped; stopping pipeline");
                            break;
                        }
                    } else {
                        trace!(token = lookup.token, current = self.token, "dropping superseded lookup");
                    }
                }
            }

            if !input_open && self.pending.is_none() && self.outstanding.is_none() {
                break;
            }
        }
    }

    fn hold(&mut self, term: String) {
        trace!(%term, "holding search term");
        self.pending = Some(term);
        self.deadline = Instant::now() + self.window;
    }

    fn accept(&mut self, term: String, done: &mpsc::UnboundedSender<Lookup>) {
        if self.last_accepted.as_deref() == Some(term.as_str()) {
            debug!(%term, "search term unchanged; no lookup");
            return;
        }
        self.last_accepted = Some(term.clone());
        self.token += 1;

        if let Some(previous) = self.outstanding.take() {
            previous.abort();
        }

        debug!(%term, token = self.token, "search term accepted");
        let service = self.service.clone();
        let done = done.clone();
        let token = self.token;
        self.outstanding = Some(tokio::spawn(async move {
            let heroes = service.search_heroes(&term).await;
            let _ = done.send(Lookup { token, heroes });
        }));
    }
}

impl Drop for SearchDriver {
    fn drop(&mut self) {
        if let Some(outstanding) = self.outstanding.take() {
            outstanding.abort();
        }
    }
}

#[cfg(test)]
#[path = "tests/search_tests.rs"]
mod tests;
