use colored::*;
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table};
use std::path::Path;
use crate::core::models::{Outcome, OutcomeStatus};
use crate::core::state::RunState;
use crate::utils::fs::count_lines;

pub fn stage_line(message: &str) -> String {
    format!("{} {}", "[+]".green().bold(), message)
}

pub fn status_line(outcome: &Outcome) -> String {
    match &outcome.status {
        OutcomeStatus::Succeeded => format!("\t{} {}", "[✔]".green().bold(), outcome.name),
        OutcomeStatus::Failed(e) => format!(
            "\t{} {} failed: {}",
            "[-]".red().bold(),
            outcome.name,
            e.message()
        ),
    }
}

fn outcome_table(state: &RunState) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Step").add_attribute(Attribute::Bold),
            Cell::new("Status").add_attribute(Attribute::Bold),
            Cell::new("Exit").add_attribute(Attribute::Bold),
            Cell::new("Details").add_attribute(Attribute::Bold),
        ]);

    for outcome in &state.outcomes {
        match &outcome.status {
            OutcomeStatus::Succeeded => {
                table.add_row(vec![
                    Cell::new(&outcome.name),
                    Cell::new("ok").fg(Color::Green),
                    Cell::new("0"),
                    Cell::new(""),
                ]);
            }
            OutcomeStatus::Failed(e) => {
                table.add_row(vec![
                    Cell::new(&outcome.name),
                    Cell::new("failed").fg(Color::Red),
                    Cell::new(e.exit_code.map(|c| c.to_string()).unwrap_or_else(|| "-".to_string())),
                    Cell::new(&e.stderr_tail),
                ]);
            }
        }
    }

    table
}

fn header(title: &str, state: &RunState) {
    println!("\n{}", "═══════════════════════════════════════".green().bold());
    println!("{}", title.green().bold());
    println!("{}", "═══════════════════════════════════════".green().bold());
    println!("\n{}: {}", "Pipeline".cyan().bold(), state.pipeline);
    println!("{}: {}", "Targets".cyan().bold(), state.targets);
    println!("{}: {}", "Stages".cyan().bold(), state.stages.join(" → "));

    if !state.outcomes.is_empty() {
        println!("\n{}", outcome_table(state));
    }
    if state.failures() > 0 {
        println!(
            "  {}: {} (see status lines above; the run continued)",
            "Failures".red().bold(),
            state.failures()
        );
    }
}

pub fn print_port_summary(state: &RunState, reports_dir: &Path) {
    header("Port triage complete", state);

    println!("\n{}", "Escalated hosts:".yellow().bold());
    if state.escalated.is_empty() {
        println!("  none");
    }
    for host in &state.escalated {
        println!("  • {}: {}", host.host.cyan(), host.port_list());
    }

    println!("\n{}", format!("Reports written to {}", reports_dir.display()).green().dimmed());
}

pub fn print_subdomain_summary(state: &RunState, final_file: &Path) {
    header("Subdomain enumeration complete", state);

    println!(
        "\n{}: {} ({} live hosts)",
        "Final list".yellow().bold(),
        final_file.display(),
        count_lines(final_file).to_string().green().bold()
    );
}
