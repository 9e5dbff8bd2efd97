//! Basic SDK usage example.
//!
//! Connects to a Semaphore server, lists projects and shows the latest tasks
//! of each one.
//!
//! Run with: SEMAPHORE_API_TOKEN=... cargo run --example basic_usage

use semaphore_sdk::{SemaphoreClient, SemaphoreResult, TaskStatus};
use std::time::Duration;

#[tokio::main]
async fn main() -> SemaphoreResult<()> {
    // Initialize tracing for debug output
    tracing_subscriber::fmt::init();

    let base_url =
        std::env::var("SEMAPHORE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string());
    let token = std::env::var("SEMAPHORE_API_TOKEN").unwrap_or_default();

    let client = SemaphoreClient::builder()
        .base_url(base_url)
        .api_token(token)
        .timeout(Duration::from_secs(30))
        .build()?;

    println!("Checking server...");
    let pong = client.health().ping().await?;
    println!("Server replied: {}", pong.trim());

    let user = client.health().current_user().await?;
    println!("Authenticated as {}", user["username"]);

    let projects = client.projects().list().await?;
    println!("\nFound {} projects", projects.len());

    for project in &projects {
        let Some(project_id) = project["id"].as_i64() else {
            continue;
        };
        println!("\n{} (id {})", project["name"], project_id);

        let tasks = client.tasks().last(project_id).await?;
        for task in tasks.iter().take(5) {
            let status = TaskStatus::of(task)
                .map(|s| s.to_string())
                .unwrap_or_else(|| "unknown".to_string());
            println!("  task {} - {}", task["id"], status);
        }

        let failed = tasks
            .iter()
            .filter(|t| TaskStatus::of(t) == Some(TaskStatus::Error))
            .count();
        if failed > 0 {
            println!("  {} failed task(s) in recent history", failed);
            println!("  history: {}", client.project_tasks_url(project_id));
        }
    }

    Ok(())
}
