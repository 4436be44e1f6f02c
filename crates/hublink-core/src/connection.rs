//! Per-integration connection status and the composing view state.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::client::HUBSPOT;
use crate::contacts::ContactRecord;
use crate::error::FetchError;
use crate::events::{AuthSignal, CODE_AUTHORIZATION_DENIED, CODE_CALLBACK_FAILED};
use crate::fetcher::FetchState;

/// Connection status of one integration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionStatus {
    Disconnected,
    Connecting,
    Connected,
    Error,
}

/// A provider the hub knows how to connect.
#[derive(Debug, Clone)]
pub struct IntegrationEntry {
    pub id: &'static str,
    pub display_name: &'static str,
}

/// Registered providers. List-shaped so further providers slot in, but only
/// the CRM provider is registered.
pub fn registry() -> Vec<IntegrationEntry> {
    vec![IntegrationEntry {
        id: HUBSPOT,
        display_name: "HubSpot",
    }]
}

/// Fixed user-facing messages for the known failure codes.
pub fn message_for_code(code: &str) -> &'static str {
    match code {
        CODE_AUTHORIZATION_DENIED => {
            "Authorization was denied. Please try again and accept the requested permissions."
        }
        CODE_CALLBACK_FAILED => "The connection could not be completed. Please try again.",
        _ => "Connection failed. Please try again.",
    }
}

/// What the composing view should render for an integration.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewState {
    Disconnected,
    Connecting,
    ConnectionError { message: String },
    /// Replaces the contact panel entirely; the only recovery is starting
    /// the connect flow over.
    SessionExpired,
    Loading,
    ContactsError { message: String },
    Empty,
    Contacts(Vec<ContactRecord>),
}

/// Owns the per-integration connection status, the pending auth signal, and
/// the rendering policy that composes the contact panel.
pub struct IntegrationHub {
    statuses: HashMap<String, ConnectionStatus>,
    errors: HashMap<String, String>,
    expired: HashSet<String>,
    pending: Option<AuthSignal>,
}

impl Default for IntegrationHub {
    fn default() -> Self {
        Self::new()
    }
}

impl IntegrationHub {
    pub fn new() -> Self {
        let statuses = registry()
            .into_iter()
            .map(|entry| (entry.id.to_string(), ConnectionStatus::Disconnected))
            .collect();
        Self {
            statuses,
            errors: HashMap::new(),
            expired: HashSet::new(),
            pending: None,
        }
    }

    pub fn status(&self, integration: &str) -> ConnectionStatus {
        self.statuses
            .get(integration)
            .copied()
            .unwrap_or(ConnectionStatus::Disconnected)
    }

    pub fn error_message(&self, integration: &str) -> Option<&str> {
        self.errors.get(integration).map(String::as_str)
    }

    pub fn is_expired(&self, integration: &str) -> bool {
        self.expired.contains(integration)
    }

    /// User-initiated connect: enter Connecting. The caller then performs
    /// the authorization navigation.
    pub fn begin_connect(&mut self, integration: &str) {
        self.errors.remove(integration);
        self.expired.remove(integration);
        self.statuses
            .insert(integration.to_string(), ConnectionStatus::Connecting);
    }

    /// Navigation failed to start; the flow never left this process.
    pub fn fail_connect(&mut self, integration: &str, message: impl Into<String>) {
        self.errors.insert(integration.to_string(), message.into());
        self.statuses
            .insert(integration.to_string(), ConnectionStatus::Error);
    }

    /// Post the outcome signal from the callback flow. Held until consumed.
    pub fn post_signal(&mut self, signal: AuthSignal) {
        self.pending = Some(signal);
    }

    /// Take the pending signal, at most once.
    pub fn take_signal(&mut self) -> Option<AuthSignal> {
        self.pending.take()
    }

    /// Consume the pending signal and apply its transition. Returns the new
    /// status of the signalled integration, or None if nothing was pending.
    pub fn consume_signal(&mut self) -> Option<ConnectionStatus> {
        let signal = self.take_signal()?;
        let integration = signal.integration().to_string();
        match signal {
            AuthSignal::Success { .. } => {
                self.errors.remove(&integration);
                self.statuses
                    .insert(integration.clone(), ConnectionStatus::Connected);
            }
            AuthSignal::Failure { code, .. } => {
                self.errors
                    .insert(integration.clone(), message_for_code(&code).to_string());
                self.statuses
                    .insert(integration.clone(), ConnectionStatus::Error);
            }
        }
        Some(self.status(&integration))
    }

    /// Feed a fetch failure back into the status machine. A session-expiry
    /// error drops a connected integration back to Disconnected and raises
    /// the expired panel; every other failure stays component-local to the
    /// fetcher.
    pub fn note_fetch_error(&mut self, integration: &str, error: &FetchError) {
        if !matches!(error, FetchError::SessionExpired) {
            return;
        }
        if self.status(integration) != ConnectionStatus::Connected {
            return;
        }
        tracing::info!(integration, "session expired, dropping connection");
        self.statuses
            .insert(integration.to_string(), ConnectionStatus::Disconnected);
        self.expired.insert(integration.to_string());
    }

    /// Rendering policy: the contact panel is mounted only while Connected;
    /// a detected expiry replaces it with a dedicated panel.
    pub fn view_state(&self, integration: &str, fetch: &FetchState) -> ViewState {
        if self.is_expired(integration) {
            return ViewState::SessionExpired;
        }
        match self.status(integration) {
            ConnectionStatus::Disconnected => ViewState::Disconnected,
            ConnectionStatus::Connecting => ViewState::Connecting,
            ConnectionStatus::Error => ViewState::ConnectionError {
                message: self
                    .error_message(integration)
                    .unwrap_or(message_for_code(""))
                    .to_string(),
            },
            ConnectionStatus::Connected => {
                if fetch.loading {
                    ViewState::Loading
                } else if let Some(message) = &fetch.error {
                    ViewState::ContactsError {
                        message: message.clone(),
                    }
                } else if fetch.contacts.is_empty() {
                    ViewState::Empty
                } else {
                    ViewState::Contacts(fetch.contacts.clone())
                }
            }
        }
    }
}
