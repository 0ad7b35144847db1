//! CLI presentation: text and json formatters per command family.

mod results;
mod shared;
mod targets;

pub use results::{format_results_json, format_results_text};
pub use shared::format_section_heading;
pub use targets::{
    format_issues_json, format_issues_text, format_modes_json, format_modes_text,
    format_targets_json, format_targets_text,
};

use serde_json::json;

pub fn format_providers_text(providers: &[String]) -> String {
    if providers.is_empty() {
        return "No providers found.".to_string();
    }
    let mut out = format!("{}\n", format_section_heading("Providers"));
    for provider in providers {
        out.push_str(&format!("  {}\n", provider));
    }
    out.push_str(&format!("\nTotal: {} provider(s)", providers.len()));
    out
}

pub fn format_providers_json(providers: &[String]) -> serde_json::Value {
    json!({ "providers": providers, "total": providers.len() })
}
