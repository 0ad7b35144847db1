//! Target collection presentation: list, validate, modes.

use super::shared::{format_section_heading, new_table, status_cell, warning_cell};
use crate::config::targets::IssueSeverity;
use crate::config::{ExportTarget, TargetIssue};
use crate::types::ExportMode;
use serde_json::json;

pub fn format_targets_text(targets: &[&ExportTarget]) -> String {
    if targets.is_empty() {
        return "No export targets configured.".to_string();
    }
    let mut table = new_table(vec!["Provider", "Base Path", "Source", "Mode", "Policy"]);
    for target in targets {
        let base = if target.base_tag_path.is_empty() {
            "(provider root)".to_string()
        } else {
            target.base_tag_path.clone()
        };
        table.add_row(vec![
            target.provider.clone(),
            base,
            target.source_path.clone(),
            target.export_mode.display_name().to_string(),
            target.collision_policy.code().to_string(),
        ]);
    }
    format!(
        "{}\n\n{}\n\nTotal: {} target(s)",
        format_section_heading("Export Targets"),
        table,
        targets.len()
    )
}

pub fn format_targets_json(targets: &[&ExportTarget]) -> serde_json::Value {
    json!({ "targets": targets, "total": targets.len() })
}

pub fn format_issues_text(issues: &[TargetIssue]) -> String {
    if issues.is_empty() {
        return format!("Validation passed: {}", status_cell(true));
    }
    let mut table = new_table(vec!["#", "Source", "Severity", "Message"]);
    for issue in issues {
        let severity = match issue.severity {
            IssueSeverity::Error => status_cell(false),
            IssueSeverity::Warning => warning_cell("warning"),
        };
        table.add_row(vec![
            issue.index.to_string(),
            issue.source_path.clone(),
            severity,
            issue.message.clone(),
        ]);
    }
    let errors = issues
        .iter()
        .filter(|i| i.severity == IssueSeverity::Error)
        .count();
    format!(
        "Validation completed with issues:\n\n{}\n\n{} error(s), {} warning(s)",
        table,
        errors,
        issues.len() - errors
    )
}

pub fn format_issues_json(issues: &[TargetIssue]) -> serde_json::Value {
    let rows: Vec<_> = issues
        .iter()
        .map(|issue| {
            json!({
                "index": issue.index,
                "sourcePath": issue.source_path,
                "severity": match issue.severity {
                    IssueSeverity::Error => "error",
                    IssueSeverity::Warning => "warning",
                },
                "message": issue.message,
            })
        })
        .collect();
    json!({ "valid": !issues.iter().any(|i| i.severity == IssueSeverity::Error), "issues": rows })
}

pub fn format_modes_text() -> String {
    let mut table = new_table(vec!["Code", "Name"]);
    for mode in ExportMode::ALL {
        table.add_row(vec![mode.code(), mode.display_name()]);
    }
    table.to_string()
}

pub fn format_modes_json() -> serde_json::Value {
    let modes: Vec<_> = ExportMode::ALL
        .iter()
        .map(|m| json!({ "code": m.code(), "name": m.display_name() }))
        .collect();
    json!({ "modes": modes })
}
