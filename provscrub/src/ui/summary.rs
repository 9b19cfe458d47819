// provscrub/src/ui/summary.rs
//! Human-readable run summary, printed to stderr after every run.

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Row, Table};
use owo_colors::OwoColorize;
use std::io::{self, Write};

use provscrub_core::RunReport;

fn base_table(supports_color: bool) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    if !supports_color {
        table.force_no_tty();
    }
    table
}

fn header_cell(text: &str) -> Cell {
    Cell::new(text).fg(Color::Cyan).add_attribute(Attribute::Bold)
}

/// Writes the category counts, unit totals and any per-unit failures.
pub fn print_summary<W: Write>(report: &RunReport, writer: &mut W, supports_color: bool) -> io::Result<()> {
    let title = if report.dry_run {
        "Provscrub Summary (dry run, nothing written)"
    } else {
        "Provscrub Summary"
    };
    if supports_color {
        writeln!(writer, "\n{}", title.bold())?;
    } else {
        writeln!(writer, "\n{}", title)?;
    }

    if report.per_category_counts.is_empty() {
        writeln!(writer, "No provenance metadata found.")?;
    } else {
        let mut table = base_table(supports_color);
        table.set_header(vec![header_cell("Category"), header_cell("Matches")]);
        for (category, count) in &report.per_category_counts {
            table.add_row(Row::from(vec![
                Cell::new(category.as_str()).fg(Color::Magenta),
                Cell::new(count.to_string()),
            ]));
        }
        writeln!(writer, "{table}")?;
    }

    writeln!(
        writer,
        "Units processed: {}, matches: {}, failures: {}",
        report.units_processed,
        report.total_matches,
        report.failures.len()
    )?;
    if !report.skipped.is_empty() {
        writeln!(
            writer,
            "Skipped {} symlink(s): {}",
            report.skipped.len(),
            report.skipped.join(", ")
        )?;
    }

    if report.has_failures() {
        let mut table = base_table(supports_color);
        table.set_header(vec![header_cell("Failed unit"), header_cell("Reason")]);
        for failure in &report.failures {
            table.add_row(Row::from(vec![
                Cell::new(&failure.unit_id).fg(Color::Red),
                Cell::new(&failure.reason),
            ]));
        }
        writeln!(writer, "{table}")?;
    }
    Ok(())
}
