//! Example client for the tasktrack API
//!
//! Expects a server started with `tasktrack serve`.

use tasktrack::api::{Client, HttpClientImpl};
use tasktrack::models::{NewTask, Status, TaskUpdate};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Create a client with default configuration (127.0.0.1:8000)
    // You can customize with ClientConfig if needed
    let client = HttpClientImpl::new();
    println!("tasktrack API Client Example");
    println!("----------------------------");

    println!("\nCreating a project...");
    let project = client.create_project("Client example".to_string()).await?;
    println!("Created project {} ({})", project.id, project.name);

    // Let the intake classifier pick the title and priority
    let text = "The export button is broken for large files. Users see a timeout.";
    println!("\nClassifying: {:?}", text);
    let suggestion = client.intake(text.to_string()).await?;
    println!(
        "Suggested title: {:?}, priority: {}",
        suggestion.title, suggestion.priority
    );

    let task = client
        .create_task(
            project.id,
            NewTask::new(suggestion.title, suggestion.priority).with_description(text),
        )
        .await?;
    println!("Added task {}", task.id);

    println!("\nStarting the task...");
    let update = TaskUpdate {
        status: Some(Status::InProgress),
        ..Default::default()
    };
    let task = client.update_task(task.id, update).await?;
    println!("Task {} is now {}", task.id, task.status);

    let in_progress = client
        .list_tasks(project.id, Some(Status::InProgress))
        .await?;
    println!("\n{} task(s) in progress", in_progress.len());

    println!("\nCleaning up...");
    client.delete_project(project.id).await?;

    println!("\nAll operations completed successfully!");
    Ok(())
}
