use anyhow::Result;
use serde::Serialize;

use crate::cli::CliArgs;
use crate::data::aggregate::CountrySummary;
use crate::data::filter::{Selection, TerminalColumn};
use crate::state::AppState;

/// Run without a window: load, apply the CLI filters, print a summary.
///
/// A failed terminals source is part of the summary, not an error exit.
pub fn run_headless(state: &mut AppState, args: &CliArgs) -> Result<()> {
    let filters = [
        (TerminalColumn::FacilityType, &args.facility),
        (TerminalColumn::Status, &args.status),
        (TerminalColumn::Owner, &args.owner),
    ];
    for (column, value) in filters {
        if let Some(v) = value {
            state.set_terminal_filter(column, Selection::Only(v.clone()));
        }
    }

    let stats = build_headless_stats(state);
    if args.json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        render_headless_stats(&stats);
    }
    Ok(())
}

fn render_headless_stats(stats: &HeadlessStats) {
    println!("\n{}", stats.title);
    println!("{}", underline(&stats.title));

    match &stats.terminals_error {
        Some(err) => println!("Terminals: data unavailable ({err})"),
        None => {
            println!(
                "Terminals: {} loaded, {} dropped, {} visible",
                stats.terminals_loaded, stats.terminals_dropped, stats.terminals_visible
            );
            if !stats.active_filters.is_empty() {
                println!("Filters: {}", stats.active_filters.join(", "));
            }
            if stats.terminals_visible == 0 {
                println!("No terminals match the selected filters.");
            }
        }
    }

    if !stats.by_status.is_empty() {
        println!("\nVisible terminals by Status:");
        for (status, count) in &stats.by_status {
            println!("- {status}: {count}");
        }
    }

    if let Some(err) = &stats.deals_error {
        println!("\nDeals: data unavailable ({err})");
    } else if !stats.country_roles.is_empty() {
        println!("\nCountry roles:");
        for s in &stats.country_roles {
            println!("- {} | {} | {} deal(s)", s.country, s.role, s.deal_count);
        }
    }

    for (label, count) in &stats.trend_series {
        match count {
            Ok(n) => println!("\n{label}: {n} series"),
            Err(err) => println!("\n{label}: data unavailable ({err})"),
        }
    }
}

/// One `=` per character of `title`.
fn underline(title: &str) -> String {
    "=".repeat(title.chars().count())
}

fn build_headless_stats(state: &AppState) -> HeadlessStats {
    let (terminals_loaded, terminals_dropped, terminals_error, by_status) = match &state.terminals
    {
        Ok(table) => {
            let mut by_status: Vec<(String, usize)> = Vec::new();
            for &i in &state.visible_terminals {
                let status = &table.terminals[i].status;
                match by_status.iter_mut().find(|(s, _)| s == status) {
                    Some((_, n)) => *n += 1,
                    None => by_status.push((status.clone(), 1)),
                }
            }
            by_status.sort();
            (table.len(), table.dropped, None, by_status)
        }
        Err(e) => (0, 0, Some(e.to_string()), Vec::new()),
    };

    let deals_error = match &state.deals {
        Some(Err(e)) => Some(e.to_string()),
        _ => None,
    };

    let trend_series = state
        .trends
        .iter()
        .map(|t| {
            let count = match &t.series {
                Ok(series) => Ok(series.len()),
                Err(e) => Err(e.to_string()),
            };
            (t.label.to_string(), count)
        })
        .collect();

    HeadlessStats {
        title: format!("{} – {}", state.config.title, state.config.subtitle),
        terminals_loaded,
        terminals_dropped,
        terminals_visible: state.visible_terminals.len(),
        terminals_error,
        active_filters: state.active_terminal_filters(),
        by_status,
        country_roles: state.country_summary.clone(),
        deals_error,
        trend_series,
    }
}

#[derive(Serialize)]
struct HeadlessStats {
    title: String,
    terminals_loaded: usize,
    terminals_dropped: usize,
    terminals_visible: usize,
    terminals_error: Option<String>,
    active_filters: Vec<String>,
    by_status: Vec<(String, usize)>,
    country_roles: Vec<CountrySummary>,
    deals_error: Option<String>,
    trend_series: Vec<(String, Result<usize, String>)>,
}
