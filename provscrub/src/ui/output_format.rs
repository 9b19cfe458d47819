// provscrub/src/ui/output_format.rs
//! Formatting for one-line status messages written to stderr.
//!
//! Color is applied only when the caller says the destination supports it.

use owo_colors::{OwoColorize, Style};
use std::io::{self, Write};

fn print_tagged<W: Write>(writer: &mut W, tag: &str, style: Style, msg: &str, supports_color: bool) -> io::Result<()> {
    if supports_color {
        writeln!(writer, "{} {}", tag.style(style), msg)
    } else {
        writeln!(writer, "{} {}", tag, msg)
    }
}

pub fn print_info_message<W: Write>(writer: &mut W, msg: &str, supports_color: bool) -> io::Result<()> {
    print_tagged(writer, "info:", Style::new().cyan(), msg, supports_color)
}

pub fn print_warn_message<W: Write>(writer: &mut W, msg: &str, supports_color: bool) -> io::Result<()> {
    print_tagged(writer, "warning:", Style::new().yellow().bold(), msg, supports_color)
}

pub fn print_error_message<W: Write>(writer: &mut W, msg: &str, supports_color: bool) -> io::Result<()> {
    print_tagged(writer, "error:", Style::new().red().bold(), msg, supports_color)
}
