//! Error types for hublink-core.
//!
//! Every asynchronous operation in this crate catches at its own boundary
//! and converts to one of these types; nothing here is fatal to the process.

use thiserror::Error;

/// Phrase the backend returns inside an otherwise-successful contacts
/// response when the stored tokens can no longer be refreshed. This string
/// is part of the backend contract; it is matched in exactly one place
/// (`BackendClient::fetch_contacts`) and becomes
/// [`FetchError::SessionExpired`] from there on.
pub const TOKEN_EXPIRED_PHRASE: &str = "Token expired, please reconnect.";

/// Message shown when a request never reached the backend at all.
pub const NETWORK_UNREACHABLE: &str =
    "Unable to connect to the server. Please try again later.";

/// Errors from initiating the authorization navigation.
#[derive(Error, Debug)]
pub enum AuthError {
    /// The authorization URL could not be constructed.
    #[error("Invalid authorization URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The system browser could not be launched.
    #[error("Failed to open browser: {0}")]
    BrowserLaunch(#[source] std::io::Error),
}

/// Errors from the callback exchange.
#[derive(Error, Debug)]
pub enum CallbackError {
    /// The redirect carried neither an error nor an authorization code.
    #[error("No authorization code found in the callback")]
    MissingCode,

    /// The backend exchange request failed. The message follows the
    /// precedence: server detail, server error field, HTTP status text,
    /// network-failure message, underlying error message.
    #[error("{0}")]
    Exchange(String),
}

/// Errors from fetching contacts, classified per response path.
#[derive(Error, Debug)]
pub enum FetchError {
    /// The backend answered with a non-2xx status.
    #[error("{message}")]
    Server { message: String },

    /// No response reached the server.
    #[error("{}", NETWORK_UNREACHABLE)]
    Network,

    /// HTTP 200 with an application-level error embedded in the payload.
    #[error("{message}")]
    Logical { message: String },

    /// The backend reported the stored session/tokens as expired.
    #[error("{}", TOKEN_EXPIRED_PHRASE)]
    SessionExpired,

    /// Anything else; carries the underlying error's own message.
    #[error("{0}")]
    Other(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn network_error_displays_fixed_message() {
        assert_eq!(FetchError::Network.to_string(), NETWORK_UNREACHABLE);
    }

    #[test]
    fn session_expired_displays_backend_phrase() {
        assert_eq!(FetchError::SessionExpired.to_string(), TOKEN_EXPIRED_PHRASE);
    }

    #[test]
    fn missing_code_message_names_the_code() {
        let missing = CallbackError::MissingCode.to_string();
        assert!(missing.contains("authorization code"));
    }
}
