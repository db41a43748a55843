use colored::*;

use crate::{
    board::Columns,
    models::{project::Project, task::Task, user::User},
    services::board::Board,
};

const LANE_GAP: &str = "  ";

/// Get the terminal width, defaulting to 80 if unavailable
fn get_terminal_width() -> usize {
    term_size::dimensions().map(|(w, _)| w).unwrap_or(80)
}

/// Width of one lane when three are laid side by side
fn lane_width(terminal_width: usize) -> usize {
    (terminal_width.saturating_sub(2 * LANE_GAP.len()) / 3).max(12)
}

/// Cuts `text` to at most `width` characters, marking the cut with an ellipsis
fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let kept: String = text.chars().take(width.saturating_sub(1)).collect();
    format!("{}…", kept)
}

fn pad(text: &str, width: usize) -> String {
    let visible = text.chars().count();
    format!("{}{}", text, " ".repeat(width.saturating_sub(visible)))
}

/// Top bar: who is signed in, or how to sign in
pub fn render_user_bar(user: Option<&User>) {
    match user {
        Some(user) => println!("  {} {}", "●".green(), user.email.bold()),
        None => println!(
            "  {} {}",
            "○".dimmed(),
            "Not logged in. Run `jira-lite login <email> <password>`".dimmed()
        ),
    }
}

pub fn render_project_list(projects: &[Project]) {
    println!("\n  {}\n", "Your Projects".cyan().bold());

    if projects.is_empty() {
        println!("  No projects found. Create a new one!");
        return;
    }

    for project in projects {
        let task_word = if project.tasks.len() == 1 { "task" } else { "tasks" };
        println!("{} {}", "•".green(), project.name.bold());
        println!(
            "    {} {}",
            format!("{} {}", project.tasks.len(), task_word).dimmed(),
            format!("/project/{}", project.id).dimmed()
        );
        println!("    {}", "─".repeat(30).dimmed());
    }
    println!();
}

fn task_cells(task: &Task, width: usize) -> [String; 3] {
    [
        truncate(&task.content, width),
        truncate(&format!("Assigned To: {}", task.assigned_to), width),
        truncate(task.id.as_str(), width),
    ]
}

fn render_lanes(columns: &Columns, width: usize) {
    let headers: Vec<String> = columns
        .iter()
        .map(|(column, tasks)| {
            let title = format!("{} ({})", column.label(), tasks.len());
            pad(&truncate(&title, width), width)
        })
        .collect();
    let rule = "─".repeat(width);
    println!("{}", headers.join(LANE_GAP).bold());
    println!("{}", [rule.as_str(); 3].join(LANE_GAP).dimmed());

    let depth = columns.iter().map(|(_, tasks)| tasks.len()).max().unwrap_or(0);
    for row in 0..depth {
        let cells: Vec<Option<[String; 3]>> = columns
            .iter()
            .map(|(_, tasks)| tasks.get(row).map(|task| task_cells(task, width)))
            .collect();

        for line in 0..3 {
            let rendered: Vec<String> = cells
                .iter()
                .map(|cell| {
                    let text = cell.as_ref().map(|c| c[line].as_str()).unwrap_or("");
                    let padded = pad(text, width);
                    match line {
                        0 => padded.normal().to_string(),
                        1 => padded.dimmed().to_string(),
                        _ => padded.dimmed().italic().to_string(),
                    }
                })
                .collect();
            println!("{}", rendered.join(LANE_GAP));
        }
        println!();
    }
}

pub fn render_board(board: &Board) {
    println!("\n  {}\n", board.name.cyan().bold());

    if board.columns.is_empty() {
        println!("  No tasks yet. Add one with `jira-lite task add {} ...`\n", board.project_id);
    } else {
        render_lanes(&board.columns, lane_width(get_terminal_width()));
    }

    if !board.unrecognized.is_empty() {
        println!(
            "  {} {} task(s) hidden: unrecognized status",
            "!".yellow(),
            board.unrecognized.len()
        );
        for task in &board.unrecognized {
            println!("    {} {} ({})", "-".dimmed(), task.content, task.status.to_string().yellow());
        }
        println!();
    }
}
