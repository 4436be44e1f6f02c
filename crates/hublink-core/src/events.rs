//! Signals exchanged between the callback flow and the composing view.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Failure code the backend reports when the user denied authorization at
/// the provider's consent screen.
pub const CODE_AUTHORIZATION_DENIED: &str = "authorization_denied";

/// Failure code for a token exchange that failed server-side.
pub const CODE_CALLBACK_FAILED: &str = "callback_failed";

/// Outcome of one authorization round trip, posted by the callback flow and
/// consumed by the hub. Replaces the query-parameter indicator a redirect
/// would carry; posted once, consumed at most once.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum AuthSignal {
    Success {
        integration: String,
        at: DateTime<Utc>,
    },
    Failure {
        integration: String,
        /// One of the known failure codes, or whatever the backend sent.
        code: String,
        at: DateTime<Utc>,
    },
}

impl AuthSignal {
    pub fn integration(&self) -> &str {
        match self {
            AuthSignal::Success { integration, .. } => integration,
            AuthSignal::Failure { integration, .. } => integration,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signal_serializes_with_type_tag() {
        let signal = AuthSignal::Failure {
            integration: "hubspot".to_string(),
            code: CODE_AUTHORIZATION_DENIED.to_string(),
            at: Utc::now(),
        };
        let json = serde_json::to_value(&signal).unwrap();
        assert_eq!(json["type"], "Failure");
        assert_eq!(json["code"], CODE_AUTHORIZATION_DENIED);
    }
}
