use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use common::{ApiClient, ClientConfig, SessionManager, session::FileSessionStore, telemetry};
use tracing::debug;

mod account;
mod profile_cmd;

/// Shown whenever a command needs a session and none is stored
pub const SIGN_IN_REQUIRED: &str = "You need to sign in before setting up your profile.";

#[derive(Parser, Debug)]
#[command(name = "amiglot")]
#[command(author, version, about = "Amiglot language exchange client")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
enum Command {
    /// Request a magic sign-in link by email
    Login {
        #[arg(short, long)]
        email: String,
    },
    /// Complete sign-in with the token from the magic link
    Verify {
        #[arg(short, long)]
        token: String,
    },
    /// Forget the stored session
    Logout,
    /// Show the signed-in user id
    Whoami,
    /// Operate on your profile
    #[command(subcommand)]
    Profile(profile_cmd::Command),
}

#[tokio::main]
async fn main() -> Result<()> {
    telemetry::init_tracing()?;

    let cli = Cli::parse();
    let config = ClientConfig::from_env()?;

    let store = FileSessionStore::new(config.session_path.clone());
    let session = SessionManager::new(Arc::new(store));
    debug!("Session stored at {}", config.session_path.display());
    let client = ApiClient::new(&config, session);

    match cli.command {
        Command::Login { email } => account::login(client, &email).await,
        Command::Verify { token } => account::verify(client, &token).await,
        Command::Logout => account::logout(client),
        Command::Whoami => account::whoami(client),
        Command::Profile(cmd) => profile_cmd::handle(client, &config, cmd).await,
    }
}
