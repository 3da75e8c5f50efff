//! CLI module
//!
//! This module provides the command-line interface for the tasktrack tool.

use std::io;
use std::net::{IpAddr, SocketAddr};

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use colored::{ColoredString, Colorize};

use crate::{
    api::{
        serve, server::DEFAULT_CORS_ORIGIN, Client, ClientConfig, CoreClient, HttpClientImpl,
        ServerConfig,
    },
    models::{
        IntakeSuggestion, NewTask, Priority, Project, ProjectId, Status, Task, TaskId, TaskUpdate,
    },
    Core,
};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// API server URL
    #[arg(
        short,
        long,
        global = true,
        env = "TASKTRACK_SERVER",
        default_value = "http://127.0.0.1:8000"
    )]
    server: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the tasktrack API server
    Serve {
        /// Address to bind
        #[arg(long, env = "TASKTRACK_HOST", default_value = "127.0.0.1")]
        host: IpAddr,

        /// Port to listen on
        #[arg(short, long, env = "TASKTRACK_PORT", default_value_t = 8000)]
        port: u16,

        /// Comma-separated list of allowed CORS origins, or `*`
        #[arg(long, env = "CORS_ORIGINS", default_value = DEFAULT_CORS_ORIGIN)]
        cors_origins: String,
    },

    /// Project management commands
    Project {
        #[command(subcommand)]
        command: ProjectCommands,
    },

    /// Task management commands
    Task {
        #[command(subcommand)]
        command: TaskCommands,
    },

    /// Suggest a title and priority for a free-text description
    Intake {
        /// The text to classify
        #[arg(required = true)]
        text: Vec<String>,

        /// Classify locally instead of asking the server
        #[arg(long)]
        offline: bool,
    },

    /// Check that the server is up
    Health,

    /// Generate shell completions
    Completions {
        /// The shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand)]
enum ProjectCommands {
    /// List all projects
    List,

    /// Create a project
    Create {
        /// Project name
        name: String,
    },

    /// Show a single project
    Show { id: ProjectId },

    /// Delete a project and all of its tasks
    Delete { id: ProjectId },
}

#[derive(Subcommand)]
enum TaskCommands {
    /// List the tasks of a project
    List {
        project_id: ProjectId,

        /// Only show tasks with this status (Todo, In-Progress, Done)
        #[arg(long)]
        status: Option<Status>,
    },

    /// Add a task to a project
    Add {
        project_id: ProjectId,

        /// Task title
        title: String,

        /// Longer description
        #[arg(short, long)]
        description: Option<String>,

        /// Initial status (Todo, In-Progress, Done)
        #[arg(long, default_value_t = Status::Todo)]
        status: Status,

        /// Priority (Low, Med, High)
        #[arg(short, long)]
        priority: Priority,
    },

    /// Show a single task
    Show { id: TaskId },

    /// Update some fields of a task
    Update {
        id: TaskId,

        #[arg(long)]
        title: Option<String>,

        #[arg(short, long, conflicts_with = "clear_description")]
        description: Option<String>,

        /// Remove the task's description
        #[arg(long)]
        clear_description: bool,

        #[arg(long)]
        status: Option<Status>,

        #[arg(short, long)]
        priority: Option<Priority>,
    },
}

/// Run the CLI application
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match &cli.command {
        Commands::Serve {
            host,
            port,
            cors_origins,
        } => {
            let config = ServerConfig {
                address: SocketAddr::new(*host, *port),
                cors_origins: ServerConfig::parse_origins(cors_origins),
            };
            println!("Starting tasktrack API server on {}...", config.address);

            serve(Core::new(), config).await?;
            Ok(())
        }

        Commands::Project { command } => {
            let client = create_client(&cli.server);
            run_project_command(&client, command).await
        }

        Commands::Task { command } => {
            let client = create_client(&cli.server);
            run_task_command(&client, command).await
        }

        Commands::Intake { text, offline } => {
            let input = text.join(" ");
            let suggestion = if *offline {
                CoreClient::default().intake(input).await?
            } else {
                create_client(&cli.server).intake(input).await?
            };
            print_suggestion(&suggestion);
            Ok(())
        }

        Commands::Health => {
            let client = create_client(&cli.server);
            if client.health().await? {
                println!("{} {}", "ok".green(), cli.server);
                Ok(())
            } else {
                Err(format!("server at {} reported unhealthy", cli.server).into())
            }
        }

        Commands::Completions { shell } => {
            // Generate completions for the specified shell
            let mut cmd = Cli::command();
            let bin_name = cmd.get_name().to_string();
            generate(*shell, &mut cmd, bin_name, &mut io::stdout());
            Ok(())
        }
    }
}

fn create_client(server_url: &str) -> HttpClientImpl {
    let config = ClientConfig {
        base_url: server_url.to_string(),
    };

    HttpClientImpl::with_config(config)
}

async fn run_project_command<C: Client>(
    client: &C,
    command: &ProjectCommands,
) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        ProjectCommands::List => {
            let projects = client.list_projects().await?;
            if projects.is_empty() {
                println!("No projects yet. Create one with 'tasktrack project create <NAME>'");
            }
            for project in &projects {
                println!("{}", format_project(project));
            }
        }
        ProjectCommands::Create { name } => {
            let project = client.create_project(name.clone()).await?;
            println!("Created project {}", format_project(&project));
        }
        ProjectCommands::Show { id } => {
            let project = client.get_project(*id).await?;
            let tasks = client.list_tasks(*id, None).await?;
            println!("{}", format_project(&project));
            print_tasks(&tasks);
        }
        ProjectCommands::Delete { id } => {
            client.delete_project(*id).await?;
            println!("Deleted project #{} and its tasks", id);
        }
    }
    Ok(())
}

async fn run_task_command<C: Client>(
    client: &C,
    command: &TaskCommands,
) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        TaskCommands::List { project_id, status } => {
            let tasks = client.list_tasks(*project_id, *status).await?;
            print_tasks(&tasks);
        }
        TaskCommands::Add {
            project_id,
            title,
            description,
            status,
            priority,
        } => {
            let new_task = NewTask {
                title: title.clone(),
                description: description.clone(),
                status: *status,
                priority: *priority,
            };
            let task = client.create_task(*project_id, new_task).await?;
            println!("Added task {}", format_task(&task));
        }
        TaskCommands::Show { id } => {
            let task = client.get_task(*id).await?;
            print_tasks(std::slice::from_ref(&task));
        }
        TaskCommands::Update {
            id,
            title,
            description,
            clear_description,
            status,
            priority,
        } => {
            let update = TaskUpdate {
                title: title.clone(),
                description: if *clear_description {
                    Some(None)
                } else {
                    description.clone().map(Some)
                },
                status: *status,
                priority: *priority,
            };
            if update.is_empty() {
                return Err("nothing to update; pass at least one field".into());
            }
            let task = client.update_task(*id, update).await?;
            println!("Updated task {}", format_task(&task));
        }
    }
    Ok(())
}

fn colored_priority(priority: Priority) -> ColoredString {
    match priority {
        Priority::High => priority.label().red().bold(),
        Priority::Med => priority.label().yellow(),
        Priority::Low => priority.label().green(),
    }
}

fn colored_status(status: Status) -> ColoredString {
    match status {
        Status::Todo => status.label().normal(),
        Status::InProgress => status.label().cyan(),
        Status::Done => status.label().green(),
    }
}

fn format_project(project: &Project) -> String {
    format!("#{} {}", project.id, project.name.bold())
}

fn format_task(task: &Task) -> String {
    format!(
        "#{} [{}] ({}) {}",
        task.id,
        colored_status(task.status),
        colored_priority(task.priority),
        task.title
    )
}

fn print_tasks(tasks: &[Task]) {
    if tasks.is_empty() {
        println!("  No tasks.");
        return;
    }
    for task in tasks {
        println!("  {}", format_task(task));
        if let Some(description) = &task.description {
            println!("      {}", description.dimmed());
        }
    }
}

fn print_suggestion(suggestion: &IntakeSuggestion) {
    println!("Title:    {}", suggestion.title);
    println!("Priority: {}", colored_priority(suggestion.priority));
}
