//! One-shot callback handling: parse the redirect parameters, exchange the
//! authorization code via the backend, report the outcome.

use std::io::{Read, Write};
use std::net::TcpListener;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::client::BackendClient;
use crate::error::CallbackError;
use crate::events::{AuthSignal, CODE_AUTHORIZATION_DENIED, CODE_CALLBACK_FAILED};

/// Port the redirect listener binds by default (the original frontend's
/// development port).
pub const DEFAULT_CALLBACK_PORT: u16 = 3000;

/// Query parameters carried by the OAuth redirect. `code`/`state` and
/// `error` are mutually exclusive per redirect.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
    pub error_description: Option<String>,
}

impl CallbackParams {
    pub fn from_url(url: &Url) -> Self {
        let mut params = Self::default();
        for (key, value) in url.query_pairs() {
            match key.as_ref() {
                "code" => params.code = Some(value.into_owned()),
                "state" => params.state = Some(value.into_owned()),
                "error" => params.error = Some(value.into_owned()),
                "error_description" => params.error_description = Some(value.into_owned()),
                _ => {}
            }
        }
        params
    }
}

/// Phases of one callback page instance. Success and Error are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CallbackPhase {
    Processing,
    Success,
    Error,
}

/// Terminal result of running the callback once.
#[derive(Debug, Clone, PartialEq)]
pub enum CallbackOutcome {
    Success,
    Error {
        /// Coarse failure code carried onward to the hub.
        code: &'static str,
        /// Detailed message shown on the callback page itself.
        message: String,
    },
}

impl CallbackOutcome {
    /// The signal to post to the hub for this outcome.
    pub fn signal(&self, integration: &str) -> AuthSignal {
        match self {
            CallbackOutcome::Success => AuthSignal::Success {
                integration: integration.to_string(),
                at: Utc::now(),
            },
            CallbackOutcome::Error { code, .. } => AuthSignal::Failure {
                integration: integration.to_string(),
                code: (*code).to_string(),
                at: Utc::now(),
            },
        }
    }
}

/// A callback page instance. The exchange request fires at most once per
/// instance; running a finished page returns the stored outcome.
pub struct CallbackPage {
    params: CallbackParams,
    phase: CallbackPhase,
    outcome: Option<CallbackOutcome>,
}

impl CallbackPage {
    pub fn new(params: CallbackParams) -> Self {
        Self {
            params,
            phase: CallbackPhase::Processing,
            outcome: None,
        }
    }

    pub fn phase(&self) -> CallbackPhase {
        self.phase
    }

    /// Drive the page to a terminal phase.
    pub async fn run(&mut self, client: &BackendClient) -> CallbackOutcome {
        if let Some(outcome) = &self.outcome {
            return outcome.clone();
        }

        let outcome = self.evaluate(client).await;
        self.phase = match &outcome {
            CallbackOutcome::Success => CallbackPhase::Success,
            CallbackOutcome::Error { .. } => CallbackPhase::Error,
        };
        self.outcome = Some(outcome.clone());
        outcome
    }

    async fn evaluate(&self, client: &BackendClient) -> CallbackOutcome {
        if let Some(error) = &self.params.error {
            let message = self
                .params
                .error_description
                .clone()
                .unwrap_or_else(|| error.clone());
            tracing::warn!(%error, "authorization denied by provider");
            return CallbackOutcome::Error {
                code: CODE_AUTHORIZATION_DENIED,
                message,
            };
        }

        let Some(code) = self.params.code.as_deref() else {
            return CallbackOutcome::Error {
                code: CODE_CALLBACK_FAILED,
                message: CallbackError::MissingCode.to_string(),
            };
        };

        let state = self.params.state.as_deref().unwrap_or_default();
        match client.exchange_code(code, state).await {
            Ok(_) => CallbackOutcome::Success,
            Err(err) => CallbackOutcome::Error {
                code: CODE_CALLBACK_FAILED,
                message: err.to_string(),
            },
        }
    }
}

/// Listen on localhost for the single redirect that ends the browser flow
/// and answer with a small page telling the user to close the tab.
pub fn receive_redirect(port: u16) -> Result<CallbackParams, std::io::Error> {
    let listener = TcpListener::bind(("127.0.0.1", port))?;

    let (mut stream, _) = listener.accept()?;
    let mut buf = [0u8; 4096];
    let n = stream.read(&mut buf)?;
    let request = String::from_utf8_lossy(&buf[..n]);

    let params = parse_request_line(&request).unwrap_or_default();

    let response = "HTTP/1.1 200 OK\r\nContent-Type: text/html\r\n\r\n<html><body><h2>Connection flow finished</h2><p>You can close this tab and return to the terminal.</p></body></html>";
    stream.write_all(response.as_bytes())?;

    Ok(params)
}

fn parse_request_line(request: &str) -> Option<CallbackParams> {
    let first_line = request.lines().next()?;
    let path = first_line.split_whitespace().nth(1)?;
    let url = Url::parse(&format!("http://localhost{path}")).ok()?;
    Some(CallbackParams::from_url(&url))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_params_from_code_redirect() {
        let url = Url::parse("http://localhost:3000/callback?code=abc123&state=user-1").unwrap();
        let params = CallbackParams::from_url(&url);
        assert_eq!(params.code.as_deref(), Some("abc123"));
        assert_eq!(params.state.as_deref(), Some("user-1"));
        assert_eq!(params.error, None);
    }

    #[test]
    fn test_params_from_error_redirect() {
        let url = Url::parse(
            "http://localhost:3000/callback?error=access_denied&error_description=User%20denied",
        )
        .unwrap();
        let params = CallbackParams::from_url(&url);
        assert_eq!(params.code, None);
        assert_eq!(params.error.as_deref(), Some("access_denied"));
        assert_eq!(params.error_description.as_deref(), Some("User denied"));
    }

    #[test]
    fn test_params_ignore_unknown_keys() {
        let url = Url::parse("http://localhost:3000/callback?code=abc&utm_source=mail").unwrap();
        let params = CallbackParams::from_url(&url);
        assert_eq!(params.code.as_deref(), Some("abc"));
    }

    #[test]
    fn test_parse_request_line() {
        let request = "GET /callback?code=xyz&state=user-2 HTTP/1.1\r\nHost: localhost\r\n\r\n";
        let params = parse_request_line(request).unwrap();
        assert_eq!(params.code.as_deref(), Some("xyz"));
        assert_eq!(params.state.as_deref(), Some("user-2"));
    }

    #[test]
    fn test_outcome_signal_codes() {
        let success = CallbackOutcome::Success.signal("hubspot");
        assert!(matches!(success, AuthSignal::Success { .. }));

        let failure = CallbackOutcome::Error {
            code: CODE_AUTHORIZATION_DENIED,
            message: "denied".to_string(),
        }
        .signal("hubspot");
        match failure {
            AuthSignal::Failure { code, .. } => assert_eq!(code, CODE_AUTHORIZATION_DENIED),
            _ => panic!("expected failure signal"),
        }
    }

    #[test]
    fn test_new_page_starts_processing() {
        let page = CallbackPage::new(CallbackParams::default());
        assert_eq!(page.phase(), CallbackPhase::Processing);
    }
}
