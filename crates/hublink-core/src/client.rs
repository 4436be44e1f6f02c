//! BackendClient: HTTP operations against the integration backend.
//!
//! The backend owns token exchange, refresh, and storage; this client only
//! speaks the three integration endpoints plus the healthcheck, and owns
//! the response/error classification for each.

use reqwest::{Client, StatusCode};
use serde_json::Value;
use url::Url;

use crate::contacts::ContactRecord;
use crate::error::{
    AuthError, CallbackError, FetchError, NETWORK_UNREACHABLE, TOKEN_EXPIRED_PHRASE,
};

/// Integration id of the single registered provider.
pub const HUBSPOT: &str = "hubspot";

/// What the backend returns from a successful code exchange.
#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct ExchangeReceipt {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub scope: Option<String>,
}

/// Client for the backend integration API.
pub struct BackendClient {
    api_base: String,
    http_client: Client,
}

impl BackendClient {
    /// Create a new client against the given API base URL.
    pub fn new(api_base: impl Into<String>) -> Self {
        let api_base = api_base.into().trim_end_matches('/').to_string();
        Self {
            api_base,
            http_client: Client::new(),
        }
    }

    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    /// Authorization URL the browser is sent to. Construction errors
    /// surface synchronously; navigation itself is not observable here.
    pub fn authorize_url(&self, session_id: &str) -> Result<Url, AuthError> {
        let mut url = Url::parse(&format!(
            "{}/integrations/{HUBSPOT}/authorize",
            self.api_base
        ))?;
        url.query_pairs_mut().append_pair("user_id", session_id);
        Ok(url)
    }

    /// Exchange the authorization code via the backend. One shot, no retry.
    pub async fn exchange_code(
        &self,
        code: &str,
        state: &str,
    ) -> Result<ExchangeReceipt, CallbackError> {
        let url = format!("{}/integrations/{HUBSPOT}/callback", self.api_base);
        tracing::info!(%state, "exchanging authorization code");

        let resp = match self
            .http_client
            .get(&url)
            .query(&[("code", code), ("state", state)])
            .send()
            .await
        {
            Ok(resp) => resp,
            Err(err) if err.is_connect() || err.is_timeout() => {
                return Err(CallbackError::Exchange(NETWORK_UNREACHABLE.to_string()));
            }
            Err(err) => return Err(CallbackError::Exchange(err.to_string())),
        };

        let status = resp.status();
        if !status.is_success() {
            let body: Value = resp.json().await.unwrap_or(Value::Null);
            let message = body["detail"]
                .as_str()
                .or_else(|| body["error"].as_str())
                .map(String::from)
                .unwrap_or_else(|| status_text(status));
            tracing::warn!(%status, %message, "token exchange failed");
            return Err(CallbackError::Exchange(message));
        }

        resp.json::<ExchangeReceipt>()
            .await
            .map_err(|err| CallbackError::Exchange(err.to_string()))
    }

    /// Fetch stored contacts for the given user. Classification:
    /// non-2xx -> [`FetchError::Server`]; unreachable -> [`FetchError::Network`];
    /// in-band `{data:{error}}` -> [`FetchError::Logical`] (or
    /// [`FetchError::SessionExpired`] for the expiry phrase); anything else
    /// carries its own message.
    pub async fn fetch_contacts(&self, user_id: &str) -> Result<Vec<ContactRecord>, FetchError> {
        let url = format!("{}/integrations/{HUBSPOT}/contacts", self.api_base);
        tracing::debug!(%user_id, "fetching contacts");

        let resp = match self
            .http_client
            .get(&url)
            .query(&[("user_id", user_id)])
            .send()
            .await
        {
            Ok(resp) => resp,
            Err(err) if err.is_connect() || err.is_timeout() => {
                return Err(FetchError::Network);
            }
            Err(err) => return Err(FetchError::Other(err.to_string())),
        };

        let status = resp.status();
        if !status.is_success() {
            let body: Value = resp.json().await.unwrap_or(Value::Null);
            let message = body["error"]
                .as_str()
                .or_else(|| body["detail"].as_str())
                .map(String::from)
                .unwrap_or_else(|| status_text(status));
            tracing::warn!(%status, %message, "contacts request failed");
            return Err(FetchError::Server { message });
        }

        let body: Value = resp
            .json()
            .await
            .map_err(|err| FetchError::Other(err.to_string()))?;

        // HTTP 200 can still carry a logical failure in the envelope.
        if let Some(message) = body["data"]["error"].as_str() {
            if message == TOKEN_EXPIRED_PHRASE {
                return Err(FetchError::SessionExpired);
            }
            return Err(FetchError::Logical {
                message: message.to_string(),
            });
        }

        let contacts = body["data"]["contacts"].clone();
        if contacts.is_null() {
            return Ok(Vec::new());
        }
        serde_json::from_value(contacts).map_err(|err| FetchError::Other(err.to_string()))
    }

    /// Backend healthcheck. The `/ping` route lives at the server root,
    /// above the API base.
    pub async fn ping(&self) -> bool {
        let root = self.api_base.trim_end_matches("/api");
        let url = format!("{root}/ping");
        match self.http_client.get(&url).send().await {
            Ok(resp) => resp.status().is_success(),
            Err(_) => false,
        }
    }
}

fn status_text(status: StatusCode) -> String {
    status
        .canonical_reason()
        .map(String::from)
        .unwrap_or_else(|| status.to_string())
}
