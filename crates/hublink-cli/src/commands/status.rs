use hublink_core::connection::registry;
use hublink_core::{session, BackendClient, Config};

/// Show session identity, effective configuration, and backend health.
pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::resolve();
    let session_id = session::get_or_create_session_id()?;
    let client = BackendClient::new(&config.api_base);

    println!("api base: {}", client.api_base());
    println!("session:  {session_id}");

    let runtime = tokio::runtime::Runtime::new()?;
    let reachable = runtime.block_on(client.ping());
    println!(
        "backend:  {}",
        if reachable { "reachable" } else { "unreachable" }
    );

    println!("integrations:");
    for entry in registry() {
        println!("  {} ({})", entry.display_name, entry.id);
    }
    Ok(())
}
