//! End-to-end flow: connect, fetch contacts, lose the session, reconnect.
//!
//! Drives the hub with the same signals the CLI produces, against a mocked
//! backend.

use mockito::Matcher;
use url::Url;

use hublink_core::{
    BackendClient, CallbackPage, CallbackParams, ConnectionStatus, ContactFetcher, FetchState,
    IntegrationHub, ViewState, HUBSPOT,
};

const USER: &str = "user-1722945600000-deadbeef";

/// Test: the full happy path ends Connected with a rendered contact list.
#[tokio::test]
async fn test_connect_then_view_contacts() {
    let mut server = mockito::Server::new_async().await;
    let _exchange = server
        .mock("GET", "/integrations/hubspot/callback")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"success":true,"user_id":"user-1722945600000-deadbeef"}"#)
        .create_async()
        .await;
    let _contacts = server
        .mock("GET", "/integrations/hubspot/contacts")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"success":true,"data":{"contacts":[{"id":"1","firstname":"A","lastname":"B"}]}}"#)
        .create_async()
        .await;

    let client = BackendClient::new(server.url());
    let mut hub = IntegrationHub::new();
    let fetcher = ContactFetcher::new(USER);

    hub.begin_connect(HUBSPOT);
    assert_eq!(hub.status(HUBSPOT), ConnectionStatus::Connecting);

    // The browser flow lands the redirect; the callback page runs once.
    let redirect =
        Url::parse(&format!("http://localhost:3000/callback?code=good&state={USER}")).unwrap();
    let mut page = CallbackPage::new(CallbackParams::from_url(&redirect));
    let outcome = page.run(&client).await;

    hub.post_signal(outcome.signal(HUBSPOT));
    assert_eq!(hub.consume_signal(), Some(ConnectionStatus::Connected));

    let _ = fetcher.fetch(&client).await;
    match hub.view_state(HUBSPOT, &fetcher.state()) {
        ViewState::Contacts(contacts) => {
            assert_eq!(contacts.len(), 1);
            assert_eq!(contacts[0].full_name(), "A B");
        }
        other => panic!("expected contact list, got {other:?}"),
    }
}

/// Test: an expiry reported by the fetcher drops the connection and the
/// view shows the dedicated expired panel instead of the contact list.
#[tokio::test]
async fn test_expiry_forces_disconnect() {
    let mut server = mockito::Server::new_async().await;
    let _contacts = server
        .mock("GET", "/integrations/hubspot/contacts")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"success":true,"data":{"error":"Token expired, please reconnect."}}"#)
        .create_async()
        .await;

    let client = BackendClient::new(server.url());
    let mut hub = IntegrationHub::new();
    let fetcher = ContactFetcher::new(USER);

    hub.begin_connect(HUBSPOT);
    hub.post_signal(hublink_core::CallbackOutcome::Success.signal(HUBSPOT));
    hub.consume_signal();
    assert_eq!(hub.status(HUBSPOT), ConnectionStatus::Connected);

    let result = fetcher.fetch(&client).await;
    if let Err(err) = &result {
        hub.note_fetch_error(HUBSPOT, err);
    }

    assert_eq!(hub.status(HUBSPOT), ConnectionStatus::Disconnected);
    assert_eq!(
        hub.view_state(HUBSPOT, &fetcher.state()),
        ViewState::SessionExpired
    );

    // Reconnecting clears the expired panel.
    hub.begin_connect(HUBSPOT);
    assert_eq!(
        hub.view_state(HUBSPOT, &FetchState::default()),
        ViewState::Connecting
    );
}

/// Test: a denied consent screen ends in Error with the fixed mapped
/// message, and nothing was exchanged.
#[tokio::test]
async fn test_denied_consent_maps_to_fixed_message() {
    let mut server = mockito::Server::new_async().await;
    let exchange = server
        .mock("GET", "/integrations/hubspot/callback")
        .match_query(Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let client = BackendClient::new(server.url());
    let mut hub = IntegrationHub::new();

    hub.begin_connect(HUBSPOT);

    let redirect = Url::parse("http://localhost:3000/callback?error=access_denied").unwrap();
    let mut page = CallbackPage::new(CallbackParams::from_url(&redirect));
    let outcome = page.run(&client).await;

    hub.post_signal(outcome.signal(HUBSPOT));
    assert_eq!(hub.consume_signal(), Some(ConnectionStatus::Error));
    assert!(hub
        .error_message(HUBSPOT)
        .unwrap()
        .contains("Authorization was denied"));

    exchange.assert_async().await;
}
