//! Contact fetcher: single-request fetch with error classification and
//! stale-response sequencing.
//!
//! Repeated calls are safe; every call re-requests from the backend. There
//! is no cache and no pagination. Overlapping calls are legal: each request
//! takes a ticket, and a completion whose ticket is no longer the newest is
//! discarded without touching the observable state (last-started-wins).

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use crate::client::BackendClient;
use crate::contacts::ContactRecord;
use crate::error::FetchError;

/// Observable state of the fetcher.
#[derive(Debug, Clone, Default)]
pub struct FetchState {
    pub loading: bool,
    pub error: Option<String>,
    pub contacts: Vec<ContactRecord>,
}

/// Fetches stored contacts for one user.
pub struct ContactFetcher {
    user_id: String,
    state: Mutex<FetchState>,
    /// Ticket of the most recently started request.
    latest: AtomicU64,
}

impl ContactFetcher {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            state: Mutex::new(FetchState::default()),
            latest: AtomicU64::new(0),
        }
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// Snapshot of the current observable state.
    pub fn state(&self) -> FetchState {
        self.state.lock().unwrap().clone()
    }

    /// Issue one contacts request. Sets the loading flag, clears any prior
    /// error, and finalizes in a single step on every path.
    pub async fn fetch(&self, client: &BackendClient) -> Result<Vec<ContactRecord>, FetchError> {
        let ticket = self.begin();
        let result = client.fetch_contacts(&self.user_id).await;
        self.finalize(ticket, &result);
        result
    }

    fn begin(&self) -> u64 {
        let ticket = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        let mut state = self.state.lock().unwrap();
        state.loading = true;
        state.error = None;
        ticket
    }

    /// Single finalization step: clears the loading flag and applies the
    /// outcome, unless a newer request has started since.
    fn finalize(&self, ticket: u64, result: &Result<Vec<ContactRecord>, FetchError>) {
        let mut state = self.state.lock().unwrap();
        if ticket != self.latest.load(Ordering::SeqCst) {
            tracing::debug!(ticket, "discarding stale fetch completion");
            return;
        }
        state.loading = false;
        match result {
            Ok(contacts) => {
                state.error = None;
                state.contacts = contacts.clone();
            }
            Err(err) => {
                state.error = Some(err.to_string());
                state.contacts.clear();
            }
        }
    }
}
