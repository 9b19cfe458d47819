// provscrub/src/ui/diff_viewer.rs
//! Unified diff rendering for sanitized units.
//!
//! Highlights exactly what was removed (red) and what was added (green).

use diffy::{create_patch, Line as DiffLine};
use owo_colors::OwoColorize;
use std::io::{self, Write};

/// Writes a line-oriented diff of `original` against `sanitized` for one unit.
pub fn print_diff<W: Write>(
    unit_id: &str,
    original: &str,
    sanitized: &str,
    writer: &mut W,
    supports_color: bool,
) -> io::Result<()> {
    let patch = create_patch(original, sanitized);

    let header_old = format!("--- {} (original)", unit_id);
    let header_new = format!("+++ {} (sanitized)", unit_id);
    if supports_color {
        writeln!(writer, "{}", header_old.bold())?;
        writeln!(writer, "{}", header_new.bold())?;
    } else {
        writeln!(writer, "{}", header_old)?;
        writeln!(writer, "{}", header_new)?;
    }

    if patch.hunks().is_empty() {
        writeln!(writer, "No changes detected.")?;
        return Ok(());
    }

    for hunk in patch.hunks() {
        if supports_color {
            writeln!(writer, "{}", "@@".cyan())?;
        } else {
            writeln!(writer, "@@")?;
        }
        for line_change in hunk.lines() {
            let (prefix, text) = match line_change {
                DiffLine::Delete(s) => ('-', *s),
                DiffLine::Insert(s) => ('+', *s),
                DiffLine::Context(s) => (' ', *s),
            };
            let text = text.strip_suffix('\n').unwrap_or(text);
            let rendered = format!("{}{}", prefix, text);
            match (supports_color, prefix) {
                (true, '-') => writeln!(writer, "{}", rendered.red())?,
                (true, '+') => writeln!(writer, "{}", rendered.green())?,
                _ => writeln!(writer, "{}", rendered)?,
            }
        }
    }
    Ok(())
}
