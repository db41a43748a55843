use std::path::PathBuf;

use clap::{Parser, Subcommand};
use colored::*;
use tracing::error;

use crate::{
    config::Config,
    models::task::Column,
    project_store::{DocumentProjectStore, ProjectStore},
    routes::Route,
    services::{
        auth::{LogInParameters, RegisterParameters, log_in, log_out, register},
        board::{BoardUpdate, MoveTaskParameters, OpenBoardError, WriteOutcome, move_task, open_board},
        projects::{
            CreateProjectError, CreateProjectParameters, ListProjectsError, create_project,
            list_projects,
        },
        tasks::{AddTaskError, AddTaskParameters, add_task},
    },
    session::{IdentityProvider, LocalIdentityProvider, SessionHolder},
    storage::{Storage, json::JsonFileStorage},
};

mod board;
mod config;
mod models;
mod project_store;
mod routes;
mod services;
mod session;
mod storage;
mod ui;

#[derive(Parser)]
#[command(
    name = "jira-lite",
    about = "Projects and a three-lane Kanban board for your terminal"
)]
struct Cli {
    /// Store file to use instead of the default one
    #[arg(long, global = true, env = config::STORE_ENV_VAR)]
    store: Option<PathBuf>,

    /// Log store reads and writes
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an account and log in
    Register { email: String, password: String },

    /// Log in with an existing account
    Login { email: String, password: String },

    /// Log out
    Logout,

    /// Show your projects (default)
    Home,

    /// Manage projects
    #[command(subcommand)]
    Project(ProjectCommands),

    /// Show a project's board
    Board { project_id: String },

    /// Manage tasks on a board
    #[command(subcommand)]
    Task(TaskCommands),

    /// Go to a page by path: /, /login, /register, /project/<projectId>
    Open { path: String },
}

#[derive(Debug, Subcommand)]
enum ProjectCommands {
    /// Create a new project and open its board
    New { name: String },
    /// List your projects
    List,
}

#[derive(Debug, Subcommand)]
enum TaskCommands {
    /// Add a task at the bottom of a lane
    Add {
        project_id: String,

        /// What needs doing
        content: String,

        /// Who it is assigned to (usually an email)
        #[arg(short, long)]
        assign: String,

        /// Lane: "To Do", "In Progress" or "Done"
        #[arg(short, long, default_value = "To Do")]
        status: Column,
    },

    /// Drag a task onto another task, or onto an empty lane by name
    Move {
        project_id: String,

        /// The task being dragged
        task_id: String,

        /// Task id to drop onto, or the name of an empty lane
        target: String,
    },
}

fn configure_logging(verbose: bool, quiet: bool) {
    use tracing::Level;
    use tracing_subscriber::{EnvFilter, fmt, prelude::*, registry};

    let log_level = if quiet {
        Level::ERROR
    } else if verbose {
        Level::DEBUG
    } else {
        Level::WARN
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{log_level}")));

    registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .init();
}

fn exit_with(message: impl std::fmt::Display) -> ! {
    eprintln!("Error: {}", message);
    std::process::exit(1);
}

fn show_home<P: IdentityProvider>(session: &SessionHolder<'_, P>, projects: &impl ProjectStore) {
    ui::render_user_bar(session.current_user());

    match list_projects(projects, session.current_user()) {
        Ok(list) => ui::render_project_list(&list),
        Err(ListProjectsError::NotSignedIn) => {
            println!("\n  Log in to see your projects.\n");
        }
        Err(ListProjectsError::Store(e)) => {
            error!(error = %e, "failed to fetch projects");
            ui::render_project_list(&[]);
        }
    }
}

fn show_board(projects: &impl ProjectStore, project_id: &str) {
    match open_board(projects, project_id) {
        Ok(board) => ui::render_board(&board),
        Err(OpenBoardError::ProjectNotFound(id)) => exit_with(format!("Project '{}' not found", id)),
        Err(OpenBoardError::Store(e)) => exit_with(format!("Failed to load project: {}", e)),
    }
}

fn report_write(update: &BoardUpdate) {
    if let WriteOutcome::Failed(e) = &update.write {
        eprintln!(
            "{} The board above was not saved: {}",
            "warning:".yellow().bold(),
            e
        );
    }
}

fn report_auth_failure(action: &str, code: &str, e: impl std::fmt::Display) -> ! {
    error!(code, error = %e, "{} failed", action);
    exit_with(format!("{} failed ({}): {}", action, code, e));
}

fn main() {
    let cli = Cli::parse();
    configure_logging(cli.verbose, cli.quiet);

    let config = Config::resolve(cli.store);

    if let Some(parent) = config.store_path.parent() {
        std::fs::create_dir_all(parent).unwrap_or_else(|e| {
            exit_with(format!("Failed to create data directory: {}", e));
        });
    }

    let storage = JsonFileStorage::new(config.store_path);

    // Fail early on an unreadable store rather than on the first command
    if let Err(e) = storage.load() {
        exit_with(format!("Failed to load store: {}", e));
    }

    let mut session = match SessionHolder::new(LocalIdentityProvider::new(&storage)) {
        Ok(session) => session,
        Err(e) => exit_with(format!("Failed to restore session: {}", e)),
    };

    let mut initial = true;
    let subscription = session.subscribe(move |user| {
        if std::mem::take(&mut initial) {
            return;
        }
        match user {
            Some(user) => println!("✓ Logged in as {}", user.email),
            None => println!("✓ Logged out"),
        }
    });

    let projects = DocumentProjectStore::new(&storage);

    match cli.command {
        None | Some(Commands::Home) | Some(Commands::Project(ProjectCommands::List)) => {
            show_home(&session, &projects);
        }
        Some(Commands::Register { email, password }) => {
            if let Err(e) = register(&mut session, RegisterParameters { email, password }) {
                report_auth_failure("Registration", e.code(), e);
            }
            show_home(&session, &projects);
        }
        Some(Commands::Login { email, password }) => {
            if let Err(e) = log_in(&mut session, LogInParameters { email, password }) {
                report_auth_failure("Login", e.code(), e);
            }
            show_home(&session, &projects);
        }
        Some(Commands::Logout) => {
            match log_out(&mut session) {
                Ok(true) => {}
                Ok(false) => println!("Not logged in"),
                Err(e) => report_auth_failure("Logout", e.code(), e),
            }
        }
        Some(Commands::Project(ProjectCommands::New { name })) => {
            let params = CreateProjectParameters { name };
            match create_project(&projects, session.current_user(), params) {
                Ok(project) => {
                    println!("✓ Project {} created", project.name);
                    show_board(&projects, &project.id);
                }
                Err(CreateProjectError::Store(e)) => {
                    error!(error = %e, "failed to create project");
                    exit_with(format!("Failed to create project: {}", e));
                }
                Err(e) => exit_with(e),
            }
        }
        Some(Commands::Board { project_id }) => show_board(&projects, &project_id),
        Some(Commands::Task(TaskCommands::Add {
            project_id,
            content,
            assign,
            status,
        })) => {
            let params = AddTaskParameters {
                project_id,
                content,
                assigned_to: assign,
                column: status,
            };
            match add_task(&projects, params) {
                Ok(result) => {
                    println!("✓ Task {} added to {}", result.task.id, status);
                    ui::render_board(&result.update.board);
                    report_write(&result.update);
                }
                Err(AddTaskError::Board(OpenBoardError::ProjectNotFound(id))) => {
                    exit_with(format!("Project '{}' not found", id));
                }
                Err(e) => exit_with(e),
            }
        }
        Some(Commands::Task(TaskCommands::Move {
            project_id,
            task_id,
            target,
        })) => {
            let params = MoveTaskParameters {
                project_id,
                source_id: task_id.clone(),
                destination: target.clone(),
            };
            match move_task(&projects, params) {
                Ok(update) => {
                    if matches!(update.write, WriteOutcome::Skipped) {
                        println!(
                            "Nothing moved: '{}' could not be dropped on '{}'",
                            task_id, target
                        );
                    }
                    ui::render_board(&update.board);
                    report_write(&update);
                }
                Err(e) => exit_with(e),
            }
        }
        Some(Commands::Open { path }) => match path.parse::<Route>() {
            Ok(Route::Home) => show_home(&session, &projects),
            Ok(Route::Login) => {
                println!("Log in with: jira-lite login <email> <password>");
                println!("No account yet? jira-lite register <email> <password>");
            }
            Ok(Route::Register) => {
                println!("Register with: jira-lite register <email> <password>");
                println!("Already have an account? jira-lite login <email> <password>");
            }
            Ok(Route::Project(id)) => show_board(&projects, &id),
            Err(e) => exit_with(e),
        },
    }

    session.unsubscribe(subscription);
}
