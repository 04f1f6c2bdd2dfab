//! Output formatting utilities.

use serde_json::json;

/// Outcome of checking one envelope id.
pub struct VerifyReport<'a> {
    pub id: &'a str,
    pub kind: &'a str,
    pub error: Option<String>,
}

/// Formats a verification outcome as JSON or a single table row.
pub fn format_report(report: &VerifyReport<'_>, json_output: bool) -> String {
    let verdict = if report.error.is_none() { "ok" } else { "invalid" };
    if json_output {
        let value = json!({
            "id": report.id,
            "kind": report.kind,
            "verdict": verdict,
            "error": report.error,
        });
        serde_json::to_string_pretty(&value).unwrap_or_else(|_| "{}".to_string())
    } else {
        format!("{:<8} {:<20} {}", verdict, truncate(report.kind, 20), report.id)
    }
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
