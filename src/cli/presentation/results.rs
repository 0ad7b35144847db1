//! Per-target batch results (export, import, select).

use super::shared::{format_section_heading, new_table, status_cell};
use crate::types::TargetResults;
use serde_json::json;

pub fn format_results_text(title: &str, results: &TargetResults) -> String {
    let mut out = format!("{}\n\n", format_section_heading(title));
    if results.is_empty() {
        out.push_str("No targets matched.\n");
        return out;
    }

    let mut table = new_table(vec!["Target", "Status", "Message"]);
    for (target, result) in results {
        table.add_row(vec![
            target.clone(),
            status_cell(result.is_success()),
            result.message().to_string(),
        ]);
    }
    out.push_str(&format!("{}\n\n", table));

    let failed = results.values().filter(|r| !r.is_success()).count();
    out.push_str(&format!(
        "{} succeeded, {} failed\n",
        results.len() - failed,
        failed
    ));
    out
}

pub fn format_results_json(results: &TargetResults) -> serde_json::Value {
    let failed = results.values().filter(|r| !r.is_success()).count();
    json!({
        "results": results,
        "total": results.len(),
        "failed": failed,
    })
}
