use owo_colors::OwoColorize;
use std::fmt::Write;
use std::io::IsTerminal;
use terminal_size::{terminal_size, Width};

use crate::config::Representative;
use crate::pipeline::{PipelineEntry, PipelineSummary};
use crate::scoring::{format_currency, DealFallback, LeadStatus, PipelineStages};

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Format a deal size in dashboard notation. An asterisk marks fees that
/// fell back to the minimum because the trade volume was unreadable.
pub fn format_deal(fee: u64, incomplete: bool) -> String {
    let formatted = format_currency(fee as f64);
    if incomplete {
        format!("{}*", formatted)
    } else {
        formatted
    }
}

fn colorize_status(status: LeadStatus, padded: &str) -> String {
    match status {
        LeadStatus::Hot => padded.red().bold().to_string(),
        LeadStatus::Warm => padded.yellow().to_string(),
        LeadStatus::Qualified => padded.cyan().to_string(),
        LeadStatus::Cold => padded.dimmed().to_string(),
    }
}

/// Get terminal width, defaulting to None for pipes (unlimited)
fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

/// Truncate text to fit available width, accounting for Unicode
fn truncate_text(text: &str, max_width: usize) -> String {
    let chars: Vec<char> = text.chars().collect();
    if chars.len() <= max_width {
        text.to_string()
    } else if max_width > 3 {
        format!("{}...", chars[..max_width - 3].iter().collect::<String>())
    } else {
        chars[..max_width].iter().collect()
    }
}

/// Format the pipeline as a table: index, probability, deal size, status,
/// due date, stage, company. No headers.
pub fn format_pipeline_table(entries: &[PipelineEntry], use_colors: bool) -> String {
    format_pipeline_table_with_width(entries, use_colors, get_terminal_width())
}

fn format_pipeline_table_with_width(
    entries: &[PipelineEntry],
    use_colors: bool,
    term_width: Option<usize>,
) -> String {
    if entries.is_empty() {
        return "No leads found.".to_string();
    }

    let index_width = 3;
    let probability_width = 4;
    let deal_width = 8;
    let status_width = 9;
    let due_width = 10;
    let stage_width = 16;
    let separator = "  ";
    let fixed_width = index_width
        + 1
        + probability_width
        + deal_width
        + status_width
        + due_width
        + stage_width
        + separator.len() * 5;

    entries
        .iter()
        .enumerate()
        .map(|(idx, entry)| {
            // 1-based index, right-aligned with trailing dot
            let index_str = format!("{:>2}.", idx + 1);
            let probability = format!(
                "{:>width$}",
                format!("{}%", entry.probability()),
                width = probability_width
            );
            let deal = format!(
                "{:>width$}",
                format_deal(entry.deal.fee, entry.deal.incomplete()),
                width = deal_width
            );
            let status = format!("{:<width$}", entry.status.as_str(), width = status_width);
            let stage = format!(
                "{:<width$}",
                truncate_text(&entry.stage, stage_width),
                width = stage_width
            );
            let due = entry.due_date.to_string();

            let company = match term_width {
                Some(width) if width > fixed_width + 10 => {
                    truncate_text(&entry.company_name, width - fixed_width)
                }
                // Very narrow terminal, show truncated
                Some(_) => truncate_text(&entry.company_name, 20),
                // No terminal (pipe), don't truncate
                None => entry.company_name.clone(),
            };

            if use_colors {
                format!(
                    "{} {}{}{}{}{}{}{}{}{}{}{}",
                    index_str.dimmed(),
                    probability.bold(),
                    separator,
                    deal.green(),
                    separator,
                    colorize_status(entry.status, &status),
                    separator,
                    due,
                    separator,
                    stage,
                    separator,
                    company.bold()
                )
            } else {
                format!(
                    "{} {}{}{}{}{}{}{}{}{}{}{}",
                    index_str,
                    probability,
                    separator,
                    deal,
                    separator,
                    status,
                    separator,
                    due,
                    separator,
                    stage,
                    separator,
                    company
                )
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format entries as tab-separated values for scripting
/// Columns: probability, deal_size, status, due_date, stage, next_action, company
pub fn format_pipeline_tsv(entries: &[PipelineEntry]) -> String {
    entries
        .iter()
        .map(|entry| {
            format!(
                "{}\t{}\t{}\t{}\t{}\t{}\t{}",
                entry.probability(),
                entry.deal.fee,
                entry.status,
                entry.due_date,
                entry.stage,
                entry.next_action,
                entry.company_name
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format a single lead with its score breakdown (for `show` and verbose mode)
pub fn format_entry_detail(entry: &PipelineEntry, use_colors: bool) -> String {
    let mut out = String::new();

    let title = if use_colors {
        entry.company_name.bold().to_string()
    } else {
        entry.company_name.clone()
    };
    let _ = writeln!(out, "{}", title);
    if let Some(ref id) = entry.id {
        let _ = writeln!(out, "  ID: {}", id);
    }
    if let Some(ref email) = entry.email {
        let _ = writeln!(out, "  Email: {}", email);
    }
    let _ = writeln!(out, "  Industry: {}", entry.industry);

    let status = if use_colors {
        colorize_status(entry.status, entry.status.as_str())
    } else {
        entry.status.to_string()
    };
    let _ = writeln!(out, "  Status: {}", status);
    let _ = writeln!(out, "  Stage: {}", entry.stage);

    let deal = format_deal(entry.deal.fee, entry.deal.incomplete());
    let tier = entry.deal.tier.as_deref().unwrap_or("none");
    let deal_note = match (&entry.deal.fallback, entry.deal.volume) {
        (Some(DealFallback::Missing), _) => "no trade volume, minimum fee".to_string(),
        (Some(DealFallback::Unparseable(e)), _) => format!("{}, minimum fee", e),
        (None, Some(volume)) => format!("volume {}", format_currency(volume)),
        (None, None) => String::new(),
    };
    let _ = writeln!(out, "  Deal size: {} ({} tier, {})", deal, tier, deal_note);
    let _ = writeln!(out, "  Next action: {}", entry.next_action);
    let _ = writeln!(out, "  Follow-up: {}", entry.due_date);

    let breakdown = &entry.score.breakdown;
    let _ = writeln!(out, "  Probability: {}%", entry.probability());
    let _ = writeln!(out, "    Base: {}", breakdown.base_probability);
    for factor in &breakdown.factors {
        let _ = writeln!(
            out,
            "    {}: {} ({} -> {})",
            factor.label,
            factor.description,
            factor.before.round(),
            factor.after.round()
        );
    }
    if breakdown.capped {
        let _ = writeln!(out, "    Capped at {}%", entry.probability());
    }

    out.trim_end().to_string()
}

pub fn format_summary(
    summary: &PipelineSummary,
    representative: &Representative,
    use_colors: bool,
) -> String {
    let mut out = String::new();

    let header = match representative.territory {
        Some(ref territory) => format!("{}'s pipeline ({})", representative.name, territory),
        None => format!("{}'s pipeline", representative.name),
    };
    let header = if use_colors {
        header.bold().to_string()
    } else {
        header
    };
    let _ = writeln!(out, "{}", header);
    let _ = writeln!(
        out,
        "  {} leads, {} total, {} weighted",
        summary.leads,
        format_currency(summary.total_value as f64),
        format_currency(summary.weighted_value.round())
    );

    let counts: Vec<String> = LeadStatus::all()
        .iter()
        .map(|status| {
            let count = summary.by_status.get(status).copied().unwrap_or(0);
            format!("{} {}", count, status)
        })
        .collect();
    let _ = write!(out, "  {}", counts.join(", "));

    out
}

/// Pipeline stage reference: probability, name and actions per stage
pub fn format_stages(stages: &PipelineStages) -> String {
    stages
        .iter()
        .map(|(key, stage)| {
            format!(
                "{:>4}  {} ({})\n      {}",
                format!("{:.0}%", stage.probability * 100.0),
                stage.name,
                key,
                if stage.actions.is_empty() {
                    "(no actions)".to_string()
                } else {
                    stage.actions.join(", ")
                }
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
