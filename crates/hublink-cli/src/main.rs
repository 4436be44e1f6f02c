use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "hublink", version, about = "HubLink CRM connector CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Connect HubSpot via the browser OAuth flow
    Connect {
        /// Port the redirect listener binds on localhost
        #[arg(long, default_value_t = hublink_core::callback::DEFAULT_CALLBACK_PORT)]
        port: u16,
    },
    /// Fetch and display stored contacts
    Contacts {
        /// Print raw JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Show session identity, configuration, and backend reachability
    Status,
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Connect { port } => commands::connect::run(port),
        Commands::Contacts { json } => commands::contacts::run(json),
        Commands::Status => commands::status::run(),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
