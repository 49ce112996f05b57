use anyhow::Result;
use chrono::Utc;
use colored::Colorize;
use std::io::Write;
use std::time::Duration;

use confplan_engine::{Category, EstimateSummary, format_cents};

use crate::runner::ScenarioResult;

fn pass_counts(results: &[ScenarioResult]) -> (usize, usize, f64) {
    let total = results.len();
    let passed = results.iter().filter(|r| r.passed).count();
    #[allow(clippy::cast_precision_loss)]
    let success_rate = if total == 0 {
        0.0
    } else {
        (passed as f64 / total as f64) * 100.0
    };
    (total, passed, success_rate)
}

fn result_label(result: &ScenarioResult) -> String {
    match result.seed {
        Some(seed) => format!("{} (seed {seed})", result.scenario_name),
        None => result.scenario_name.clone(),
    }
}

pub fn generate_console_report(
    out: &mut dyn Write,
    results: &[ScenarioResult],
    total_duration: Duration,
) -> Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", "📊 Scenario Results Summary".bright_cyan().bold())?;
    writeln!(out, "{}", "===========================".cyan())?;

    let (total, passed, success_rate) = pass_counts(results);
    writeln!(out, "Total scenarios: {total}")?;
    writeln!(out, "Passed: {}", passed.to_string().green())?;
    writeln!(out, "Failed: {}", (total - passed).to_string().red())?;
    writeln!(out, "Success rate: {success_rate:.1}%")?;
    writeln!(out, "Total time: {total_duration:?}")?;
    writeln!(out)?;

    for result in results {
        let status = if result.passed {
            "✅ PASS".green()
        } else {
            "❌ FAIL".red()
        };
        writeln!(out, "{} {}", status, result_label(result).bold())?;
        writeln!(
            out,
            "   Iterations: {}/{} successful",
            result.successful_iterations, result.iterations_run
        )?;
        writeln!(out, "   Average time: {:?}", result.average_duration)?;
        if !result.failures.is_empty() {
            writeln!(out, "   Failures:")?;
            for failure in &result.failures {
                writeln!(out, "     • {}", failure.red())?;
            }
        }
        writeln!(out)?;
    }

    if let (Some(fastest), Some(slowest)) = (
        results.iter().min_by_key(|r| r.average_duration),
        results.iter().max_by_key(|r| r.average_duration),
    ) {
        writeln!(out, "{}", "⚡ Performance Summary".bright_yellow().bold())?;
        writeln!(out, "{}", "=====================".yellow())?;
        writeln!(
            out,
            "Fastest: {} ({:?})",
            result_label(fastest).green(),
            fastest.average_duration
        )?;
        writeln!(
            out,
            "Slowest: {} ({:?})",
            result_label(slowest).yellow(),
            slowest.average_duration
        )?;
    }
    Ok(())
}

pub fn generate_json_report(out: &mut dyn Write, results: &[ScenarioResult]) -> Result<()> {
    let json_output = serde_json::to_string_pretty(results)?;
    writeln!(out, "{json_output}")?;
    Ok(())
}

pub fn generate_markdown_report(out: &mut dyn Write, results: &[ScenarioResult]) -> Result<()> {
    writeln!(out, "# Conference Planner Scenario Results\n")?;
    writeln!(out, "_Generated {}_\n", Utc::now().format("%Y-%m-%d %H:%M:%S UTC"))?;

    let (total, passed, success_rate) = pass_counts(results);
    writeln!(out, "## Summary\n")?;
    writeln!(out, "- **Total scenarios**: {total}")?;
    writeln!(out, "- **Passed**: {passed}")?;
    writeln!(out, "- **Failed**: {}", total - passed)?;
    writeln!(out, "- **Success rate**: {success_rate:.1}%\n")?;

    writeln!(out, "## Detailed Results\n")?;
    for result in results {
        let status = if result.passed { "✅" } else { "❌" };
        writeln!(out, "### {} {}\n", status, result_label(result))?;
        writeln!(
            out,
            "- **Iterations**: {}/{} successful",
            result.successful_iterations, result.iterations_run
        )?;
        writeln!(out, "- **Average time**: {:?}", result.average_duration)?;
        if !result.failures.is_empty() {
            writeln!(out, "- **Failures**:")?;
            for failure in &result.failures {
                writeln!(out, "  - {failure}")?;
            }
        }
        writeln!(out)?;
    }
    Ok(())
}

/// Details view for a replayed action script.
pub fn generate_estimate_report(
    out: &mut dyn Write,
    summary: &EstimateSummary,
    rejected: &[String],
    format: &str,
) -> Result<()> {
    match format {
        "json" => {
            writeln!(out, "{}", serde_json::to_string_pretty(summary)?)?;
        }
        "markdown" => {
            writeln!(out, "# Conference Estimate\n")?;
            writeln!(out, "Attendees: {}\n", summary.number_of_people)?;
            writeln!(out, "| Name | Unit Cost | Quantity | Subtotal |")?;
            writeln!(out, "|---|---|---|---|")?;
            for item in &summary.items {
                writeln!(
                    out,
                    "| {} | {} | {} | {} |",
                    item.name,
                    format_cents(item.unit_cost_cents),
                    item.effective_quantity,
                    format_cents(item.subtotal_cents)
                )?;
            }
            writeln!(out, "\n**Total**: {}", format_cents(summary.breakdown.total))?;
        }
        _ => {
            writeln!(out, "{}", "🧾 Conference Estimate".bright_cyan().bold())?;
            writeln!(out, "{}", "======================".cyan())?;
            writeln!(out, "Attendees: {}", summary.number_of_people)?;
            for category in Category::ALL {
                writeln!(
                    out,
                    "{}: {}",
                    category.label().bold(),
                    format_cents(summary.breakdown.for_category(category))
                )?;
                for item in summary.items_in(category) {
                    writeln!(
                        out,
                        "   • {} × {} = {}",
                        item.name,
                        item.effective_quantity,
                        format_cents(item.subtotal_cents)
                    )?;
                }
            }
            writeln!(
                out,
                "{} {}",
                "Total:".bold(),
                format_cents(summary.breakdown.total).green()
            )?;
        }
    }
    if !rejected.is_empty() && format != "json" {
        writeln!(out)?;
        writeln!(out, "Rejected actions:")?;
        for message in rejected {
            writeln!(out, "  - {message}")?;
        }
    }
    Ok(())
}
