use hublink_core::{session, BackendClient, Config, ContactFetcher, FetchError};

/// Fetch and print the stored contacts for this session.
pub fn run(json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::resolve();
    let session_id = session::get_or_create_session_id()?;
    let client = BackendClient::new(&config.api_base);
    let fetcher = ContactFetcher::new(&session_id);

    let runtime = tokio::runtime::Runtime::new()?;
    match runtime.block_on(fetcher.fetch(&client)) {
        Ok(contacts) if json => {
            println!("{}", serde_json::to_string_pretty(&contacts)?);
        }
        Ok(contacts) if contacts.is_empty() => {
            println!("No contacts found.");
        }
        Ok(contacts) => {
            for contact in contacts {
                let name = match contact.full_name() {
                    name if name.is_empty() => "(no name)".to_string(),
                    name => name,
                };
                let email = contact.email.as_deref().unwrap_or("-");
                println!("{:<14} {:<30} {}", contact.id, name, email);
            }
        }
        Err(FetchError::SessionExpired) => {
            eprintln!("Session expired. Run `hublink connect` to reconnect HubSpot.");
            std::process::exit(1);
        }
        Err(err) => return Err(err.into()),
    }
    Ok(())
}
