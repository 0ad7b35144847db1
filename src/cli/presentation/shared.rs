//! Shared presentation: headings, status cells, table setup.

use comfy_table::presets::UTF8_FULL;
use comfy_table::Table;
use owo_colors::OwoColorize;
use std::io::IsTerminal;

/// Colors only when stdout is a terminal and NO_COLOR is unset.
pub fn use_color() -> bool {
    std::env::var_os("NO_COLOR").is_none() && std::io::stdout().is_terminal()
}

/// Format a section heading with bold/underline.
pub fn format_section_heading(title: &str) -> String {
    if use_color() {
        format!("{}", title.bold().underline())
    } else {
        title.to_string()
    }
}

pub fn status_cell(ok: bool) -> String {
    match (ok, use_color()) {
        (true, true) => format!("{}", "ok".green()),
        (false, true) => format!("{}", "failed".red()),
        (true, false) => "ok".to_string(),
        (false, false) => "failed".to_string(),
    }
}

pub fn warning_cell(text: &str) -> String {
    if use_color() {
        format!("{}", text.yellow())
    } else {
        text.to_string()
    }
}

pub fn new_table<I, S>(header: I) -> Table
where
    I: IntoIterator<Item = S>,
    S: Into<comfy_table::Cell>,
{
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(header);
    table
}
