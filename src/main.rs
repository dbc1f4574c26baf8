//! mantisconnect - connectivity check for a MantisBT installation
//!
//! Connects with the configured account and prints the projects it can
//! see, with their subprojects, as JSON on stdout.
//!
//! # Configuration
//!
//! Set the following environment variables (or use a `.env` file):
//!
//! - `MANTIS_URL`: Mantis base URL
//! - `MANTIS_USERNAME`: Mantis account name
//! - `MANTIS_PASSWORD`: Mantis account password
//!
//! # Usage
//!
//! ```bash
//! MANTIS_URL=https://bugs.example.com/ MANTIS_USERNAME=admin MANTIS_PASSWORD=xxx ./mantisconnect
//! ```

use anyhow::{Context, Result};
use tracing_subscriber::{fmt, EnvFilter};

use mantisconnect::{Session, SessionConfig};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (ignore errors if not found)
    dotenvy::dotenv().ok();

    // stdout carries the JSON output, logs go to stderr
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("mantisconnect=info")),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    let config = SessionConfig::from_env().context("Failed to load configuration")?;

    tracing::debug!(url = %config.url, username = %config.username, "Configuration loaded");

    let session = Session::new(config).context("Failed to create session")?;

    session
        .connect()
        .await
        .with_context(|| format!("Failed to connect to {}", session.url()))?;

    let projects = session
        .request()
        .get_user_accessible_projects()
        .await
        .context("Failed to list accessible projects")?;

    let mut count = 0usize;
    for project in &projects {
        project.walk(&mut |_, _| count += 1);
    }
    tracing::info!(projects = count, "Fetched accessible projects");

    let json = serde_json::to_string_pretty(&projects).context("Failed to encode projects")?;
    println!("{}", json);

    Ok(())
}
