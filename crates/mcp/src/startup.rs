// Startup check against the Semaphore server

use anyhow::{Context, Result};
use semaphore_sdk::SemaphoreClient;

/// Verify the server is reachable and the token is accepted.
///
/// Returns the login of the authenticated user.
pub async fn verify_connection(client: &SemaphoreClient) -> Result<String> {
    let base = client.config().web_base();

    let pong = client
        .health()
        .ping()
        .await
        .with_context(|| format!("Semaphore at {} is not reachable", base))?;
    tracing::debug!(response = %pong.trim(), "Semaphore ping");

    let user = client
        .health()
        .current_user()
        .await
        .with_context(|| format!("Semaphore at {} rejected the API token", base))?;

    let login = user
        .get("username")
        .or_else(|| user.get("name"))
        .and_then(|v| v.as_str())
        .unwrap_or("unknown")
        .to_string();
    Ok(login)
}
