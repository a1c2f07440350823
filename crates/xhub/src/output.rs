//! Rendering for command output.
//!
//! Every handler funnels through here: `tabled` tables for people, JSON
//! and YAML for scripts, and bare identifiers for `--output plain`
//! pipelines. The aligned key-value blocks used by `hub status` and the
//! user views live here too, as does the severity coloring for launch
//! progress lines.

use std::io::{self, IsTerminal, Write};

use owo_colors::OwoColorize;
use tabled::{Table, Tabled, settings::Style};
use xhub_core::{ProgressLine, Severity};

use crate::cli::{ColorMode, OutputFormat};

pub fn should_color(mode: &ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => io::stdout().is_terminal() && std::env::var("NO_COLOR").is_err(),
    }
}

/// Render a collection. `to_row` feeds the table view; `id_fn` picks the
/// one value per item that `plain` emits. JSON and YAML always serialize
/// the full records, not the table rows.
pub fn render_list<T, R>(
    format: &OutputFormat,
    data: &[T],
    to_row: impl Fn(&T) -> R,
    id_fn: impl Fn(&T) -> String,
) -> String
where
    T: serde::Serialize,
    R: Tabled,
{
    match format {
        OutputFormat::Table => {
            let rows: Vec<R> = data.iter().map(to_row).collect();
            Table::new(&rows).with(Style::rounded()).to_string()
        }
        OutputFormat::Json => render_json_pretty(data),
        OutputFormat::JsonCompact => render_json_compact(data),
        OutputFormat::Yaml => render_yaml(data),
        OutputFormat::Plain => data.iter().map(&id_fn).collect::<Vec<_>>().join("\n"),
    }
}

/// Render one record. Single records have no table; `detail_fn` builds
/// the human view instead, usually via [`detail`] or a raw JSON dump.
pub fn render_single<T>(
    format: &OutputFormat,
    data: &T,
    detail_fn: impl Fn(&T) -> String,
    id_fn: impl Fn(&T) -> String,
) -> String
where
    T: serde::Serialize,
{
    match format {
        OutputFormat::Table => detail_fn(data),
        OutputFormat::Json => render_json_pretty(data),
        OutputFormat::JsonCompact => render_json_compact(data),
        OutputFormat::Yaml => render_yaml(data),
        OutputFormat::Plain => id_fn(data),
    }
}

/// An aligned `Label: value` block, one pair per line. Labels pad to the
/// widest so the values line up in a column.
pub fn detail(pairs: &[(&str, String)]) -> String {
    let width = pairs.iter().map(|(label, _)| label.len()).max().unwrap_or(0);
    pairs
        .iter()
        .map(|(label, value)| format!("{label}:{} {value}", " ".repeat(width - label.len())))
        .collect::<Vec<_>>()
        .join("\n")
}

/// One launch progress line, with the server link appended and the text
/// colored by severity when `color` is on.
pub fn progress_line(line: &ProgressLine, color: bool) -> String {
    let text = match &line.link {
        Some(link) => format!("{} ({link})", line.text),
        None => line.text.clone(),
    };
    if !color {
        return text;
    }
    match line.severity {
        Severity::Info => text,
        Severity::Warning => text.yellow().to_string(),
        Severity::Error => text.red().to_string(),
        Severity::Success => text.green().to_string(),
    }
}

pub fn print_output(output: &str, quiet: bool) {
    if quiet || output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{output}");
}

pub(crate) fn render_json_pretty<T: serde::Serialize + ?Sized>(data: &T) -> String {
    serde_json::to_string_pretty(data).unwrap_or_default()
}

pub(crate) fn render_json_compact<T: serde::Serialize + ?Sized>(data: &T) -> String {
    serde_json::to_string(data).unwrap_or_default()
}

pub(crate) fn render_yaml<T: serde::Serialize + ?Sized>(data: &T) -> String {
    serde_yaml::to_string(data).unwrap_or_default()
}
