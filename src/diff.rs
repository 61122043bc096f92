use crate::config::OutputFormat;
use crate::format::render;
use crate::resolve::Resolution;
use anyhow::Result;
use crossterm::style::Stylize;
use similar::TextDiff;

pub fn format_unified_diff(original: &str, modified: &str, label_a: &str, label_b: &str) -> String {
    let diff = TextDiff::from_lines(original, modified);
    let mut output = String::new();

    output.push_str(&format!("--- {}\n", label_a));
    output.push_str(&format!("+++ {}\n", label_b));

    for hunk in diff.unified_diff().context_radius(3).iter_hunks() {
        output.push_str(&format!("{}", hunk));
    }

    output
}

/// Unified diff of what inheritance changed, both sides rendered as TOML.
pub fn diff_resolution(resolution: &Resolution) -> Result<String> {
    let merged = render(&resolution.merged, OutputFormat::Toml)?;
    let resolved = render(&resolution.resolved, OutputFormat::Toml)?;
    Ok(format_unified_diff(&merged, &resolved, "merged", "resolved"))
}

/// Colour diff lines for terminal output.
pub fn colorize_diff(diff: &str) -> String {
    let mut output = String::new();
    for line in diff.lines() {
        let styled = if line.starts_with('+') && !line.starts_with("+++") {
            format!("{}", line.green())
        } else if line.starts_with('-') && !line.starts_with("---") {
            format!("{}", line.red())
        } else if line.starts_with("@@") {
            format!("{}", line.cyan())
        } else {
            line.to_string()
        };
        output.push_str(&styled);
        output.push('\n');
    }
    output
}
