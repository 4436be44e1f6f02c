//! Auth initiator: hands the browser to the backend's authorize endpoint.
//!
//! The backend answers with a redirect chain ending at the provider's
//! consent screen; everything after the launch happens out of process.

use crate::client::BackendClient;
use crate::error::AuthError;

/// Build the authorization URL for the session and launch the system
/// browser at it. Only construction and launch failures are observable.
pub fn start_auth(client: &BackendClient, session_id: &str) -> Result<(), AuthError> {
    let url = client.authorize_url(session_id)?;
    tracing::info!(%url, "opening browser for authorization");
    open::that(url.as_str()).map_err(AuthError::BrowserLaunch)?;
    Ok(())
}
