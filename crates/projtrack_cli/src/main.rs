//! Menu-driven console shell for the project tracker.
//!
//! # Responsibility
//! - Drive the interactive CRUD menu over `projtrack_core` services.
//! - Own console prompt formatting and input parsing.
//!
//! # Invariants
//! - The currently selected project is explicit loop state handed to and
//!   returned from handlers, never a field handlers mutate on the side.
//! - Every core or input error is displayed and the loop continues; the
//!   shell exits only on user request.
//! - Only already-parsed typed values cross into the core.

use log::info;
use projtrack_core::{
    default_log_level, init_logging, normalize_decimal, Project, ProjectId, ProjectRepository,
    ProjectService, ServiceError, SqliteProjectRepository,
};
use rust_decimal::Decimal;
use std::env;
use std::fmt::{Display, Formatter};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

const DEFAULT_DB_FILE: &str = "projtrack.db";

const OPERATIONS: &[&str] = &[
    "1) Add a project",
    "2) List projects",
    "3) Select a project",
    "4) Update project details",
    "5) Delete a project",
];

/// Everything the loop reports to the user and then moves past.
#[derive(Debug)]
enum ShellError {
    Service(ServiceError),
    Input(String),
}

impl Display for ShellError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Service(err) => write!(f, "{err}"),
            Self::Input(message) => write!(f, "{message}"),
        }
    }
}

impl From<ServiceError> for ShellError {
    fn from(value: ServiceError) -> Self {
        Self::Service(value)
    }
}

fn main() {
    if let Err(message) = init_shell_logging() {
        eprintln!("warning: file logging is disabled: {message}");
    }
    info!(
        "event=shell_start module=cli status=ok version={}",
        projtrack_core::core_version()
    );

    let db_path = env::var_os("PROJTRACK_DB")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DB_FILE));
    let service = ProjectService::new(SqliteProjectRepository::new(db_path));

    let stdin = io::stdin();
    let mut lines = stdin.lock();
    run_shell(&service, &mut lines);
}

fn init_shell_logging() -> Result<(), String> {
    let log_dir = env::current_dir()
        .map_err(|err| format!("cannot resolve working directory: {err}"))?
        .join("logs");
    let log_dir = log_dir
        .to_str()
        .ok_or_else(|| "log directory path is not valid UTF-8".to_string())?;
    init_logging(default_log_level(), log_dir)
}

/// Prints the menu, reads selections, and performs the requested
/// operations until the user quits with a blank line.
fn run_shell<R: ProjectRepository>(service: &ProjectService<R>, lines: &mut impl BufRead) {
    let mut current: Option<Project> = None;

    loop {
        print_operations(current.as_ref());
        let Some(input) = read_input(lines, "Enter a menu selection") else {
            println!("Exiting the menu.");
            return;
        };

        if let Err(err) = dispatch(service, lines, &mut current, &input) {
            println!("\nError: {err} Try again.");
        }
    }
}

fn dispatch<R: ProjectRepository>(
    service: &ProjectService<R>,
    lines: &mut impl BufRead,
    current: &mut Option<Project>,
    input: &str,
) -> Result<(), ShellError> {
    let selection: i64 = input
        .parse()
        .map_err(|_| ShellError::Input(format!("`{input}` is not a valid number.")))?;

    match selection {
        1 => {
            let created = create_project(service, lines)?;
            *current = Some(created);
        }
        2 => list_projects(service)?,
        3 => {
            let selected = select_project(service, lines)?;
            print_project_details(&selected);
            *current = Some(selected);
        }
        4 => {
            let Some(selected) = current.clone() else {
                println!("\nPlease select a project.");
                return Ok(());
            };
            let refreshed = update_project_details(service, lines, &selected)?;
            *current = Some(refreshed);
        }
        5 => {
            let deleted_id = delete_project(service, lines)?;
            if current.as_ref().and_then(|project| project.project_id) == Some(deleted_id) {
                *current = None;
            }
        }
        other => println!("\n{other} is not a valid selection. Try again."),
    }

    Ok(())
}

/// Gathers project fields, creates the row, and returns the created
/// project re-fetched by id as the new selection.
fn create_project<R: ProjectRepository>(
    service: &ProjectService<R>,
    lines: &mut impl BufRead,
) -> Result<Project, ShellError> {
    let Some(project_name) = read_input(lines, "Enter the project name") else {
        return Err(ShellError::Input("a project name is required.".to_string()));
    };

    let mut project = Project::new(project_name);
    project.estimated_hours = read_decimal(lines, "Enter the estimated hours")?;
    project.actual_hours = read_decimal(lines, "Enter the actual hours")?;
    project.difficulty = read_difficulty(lines)?;
    project.notes = read_input(lines, "Enter the project notes");

    let created = service.add_project(&project)?;
    println!(
        "You have successfully created project: {}",
        project_banner(&created)
    );

    match created.project_id {
        Some(project_id) => Ok(service.fetch_project_by_id(project_id)?),
        None => Ok(created),
    }
}

fn list_projects<R: ProjectRepository>(service: &ProjectService<R>) -> Result<(), ShellError> {
    let projects = service.fetch_all_projects()?;

    println!("\nProjects:");
    for project in &projects {
        println!("   {}", project_banner(project));
    }
    Ok(())
}

fn select_project<R: ProjectRepository>(
    service: &ProjectService<R>,
    lines: &mut impl BufRead,
) -> Result<Project, ShellError> {
    list_projects(service)?;
    let project_id = read_project_id(lines, "Enter a project ID to select a project")?;
    Ok(service.fetch_project_by_id(project_id)?)
}

/// Prompts for each field with the current value in brackets; blank input
/// keeps the prior value. After a successful update the project is
/// re-fetched so the selection reflects stored values.
fn update_project_details<R: ProjectRepository>(
    service: &ProjectService<R>,
    lines: &mut impl BufRead,
    selected: &Project,
) -> Result<Project, ShellError> {
    let Some(project_id) = selected.project_id else {
        return Err(ShellError::Input(
            "the selected project has no ID.".to_string(),
        ));
    };

    let project_name = read_input(
        lines,
        &format!("Enter the project name [{}]", selected.project_name),
    );
    let estimated_hours = read_decimal(
        lines,
        &format!(
            "Enter the estimated hours [{}]",
            display_or_dash(selected.estimated_hours.as_ref())
        ),
    )?;
    let actual_hours = read_decimal(
        lines,
        &format!(
            "Enter the actual hours [{}]",
            display_or_dash(selected.actual_hours.as_ref())
        ),
    )?;
    let difficulty = read_difficulty_with_default(lines, selected.difficulty)?;
    let notes = read_input(
        lines,
        &format!(
            "Enter the project notes [{}]",
            display_or_dash(selected.notes.as_ref())
        ),
    );

    let mut updated = Project::new(project_name.unwrap_or_else(|| selected.project_name.clone()));
    updated.project_id = Some(project_id);
    updated.estimated_hours = estimated_hours.or(selected.estimated_hours);
    updated.actual_hours = actual_hours.or(selected.actual_hours);
    updated.difficulty = difficulty.or(selected.difficulty);
    updated.notes = notes.or_else(|| selected.notes.clone());

    service.modify_project_details(project_id, &updated)?;
    Ok(service.fetch_project_by_id(project_id)?)
}

fn delete_project<R: ProjectRepository>(
    service: &ProjectService<R>,
    lines: &mut impl BufRead,
) -> Result<ProjectId, ShellError> {
    list_projects(service)?;
    let project_id = read_project_id(lines, "Enter the ID of the project to delete")?;

    service.delete_project(project_id)?;
    println!("Project {project_id} was deleted successfully.");
    Ok(project_id)
}

fn print_operations(current: Option<&Project>) {
    println!("\nThese are the available selections. Press the Enter key to quit:");
    for operation in OPERATIONS {
        println!("  {operation}");
    }
    match current {
        Some(project) => println!("\nYou are working with project: {}", project_banner(project)),
        None => println!("\nYou are not working with a project."),
    }
}

fn print_project_details(project: &Project) {
    println!("\nProject: {}", project_banner(project));
    println!(
        "   Estimated hours: {}",
        display_or_dash(project.estimated_hours.as_ref())
    );
    println!(
        "   Actual hours: {}",
        display_or_dash(project.actual_hours.as_ref())
    );
    println!(
        "   Difficulty: {}",
        display_or_dash(project.difficulty.as_ref())
    );
    println!("   Notes: {}", display_or_dash(project.notes.as_ref()));

    if !project.categories.is_empty() {
        println!("   Categories:");
        for category in &project.categories {
            println!("      {}", category.category_name);
        }
    }
    if !project.materials.is_empty() {
        println!("   Materials:");
        for material in &project.materials {
            println!(
                "      {} (cost {}, quantity {})",
                material.material_name,
                display_or_dash(material.cost.as_ref()),
                display_or_dash(material.quantity.as_ref())
            );
        }
    }
    if !project.steps.is_empty() {
        println!("   Steps:");
        for step in &project.steps {
            println!("      {}. {}", step.step_order, step.step_text);
        }
    }
}

fn project_banner(project: &Project) -> String {
    format!(
        "{}: {}",
        display_or_dash(project.project_id.as_ref()),
        project.project_name
    )
}

fn display_or_dash<T: Display>(value: Option<&T>) -> String {
    value.map_or_else(|| "-".to_string(), ToString::to_string)
}

/// Prints a prompt and reads one trimmed line. Blank input and end of
/// input both come back as `None`.
fn read_input(lines: &mut impl BufRead, prompt: &str) -> Option<String> {
    print!("{prompt}: ");
    let _ = io::stdout().flush();

    let mut line = String::new();
    match lines.read_line(&mut line) {
        Ok(0) | Err(_) => None,
        Ok(_) => {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        }
    }
}

fn read_decimal(
    lines: &mut impl BufRead,
    prompt: &str,
) -> Result<Option<Decimal>, ShellError> {
    match read_input(lines, prompt) {
        None => Ok(None),
        Some(raw) => raw
            .parse::<Decimal>()
            .map(|value| Some(normalize_decimal(value)))
            .map_err(|_| ShellError::Input(format!("`{raw}` is not a valid decimal number."))),
    }
}

fn read_difficulty(lines: &mut impl BufRead) -> Result<Option<u8>, ShellError> {
    read_difficulty_prompt(lines, "Enter the project difficulty (1-5)")
}

fn read_difficulty_with_default(
    lines: &mut impl BufRead,
    current: Option<u8>,
) -> Result<Option<u8>, ShellError> {
    read_difficulty_prompt(
        lines,
        &format!(
            "Enter the project difficulty (1-5) [{}]",
            display_or_dash(current.as_ref())
        ),
    )
}

fn read_difficulty_prompt(
    lines: &mut impl BufRead,
    prompt: &str,
) -> Result<Option<u8>, ShellError> {
    match read_input(lines, prompt) {
        None => Ok(None),
        Some(raw) => raw
            .parse::<u8>()
            .map(Some)
            .map_err(|_| ShellError::Input(format!("`{raw}` is not a valid number."))),
    }
}

fn read_project_id(lines: &mut impl BufRead, prompt: &str) -> Result<ProjectId, ShellError> {
    let Some(raw) = read_input(lines, prompt) else {
        return Err(ShellError::Input("a project ID is required.".to_string()));
    };
    raw.parse()
        .map_err(|_| ShellError::Input(format!("`{raw}` is not a valid number.")))
}
