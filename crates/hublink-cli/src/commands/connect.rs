use hublink_core::callback::{receive_redirect, CallbackPage};
use hublink_core::{
    auth, session, BackendClient, CallbackOutcome, Config, ConnectionStatus, IntegrationHub,
    HUBSPOT,
};

/// Run the full browser connect flow for HubSpot.
pub fn run(port: u16) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::resolve();
    let session_id = session::get_or_create_session_id()?;
    let client = BackendClient::new(&config.api_base);
    let mut hub = IntegrationHub::new();

    hub.begin_connect(HUBSPOT);
    if let Err(err) = auth::start_auth(&client, &session_id) {
        hub.fail_connect(HUBSPOT, err.to_string());
        return Err(err.into());
    }

    println!("Browser opened. Waiting for the redirect on 127.0.0.1:{port} ...");
    let params = receive_redirect(port)?;

    let runtime = tokio::runtime::Runtime::new()?;
    let mut page = CallbackPage::new(params);
    let outcome = runtime.block_on(page.run(&client));

    hub.post_signal(outcome.signal(HUBSPOT));
    hub.consume_signal();

    match hub.status(HUBSPOT) {
        ConnectionStatus::Connected => {
            println!("HubSpot connected.");
            Ok(())
        }
        _ => {
            if let CallbackOutcome::Error { message, .. } = &outcome {
                eprintln!("{message}");
            }
            let summary = hub
                .error_message(HUBSPOT)
                .unwrap_or("Connection failed. Please try again.")
                .to_string();
            Err(summary.into())
        }
    }
}
