use crate::diff::HunkKind;
use crate::outcome::{NewPage, UpdatedPage};

const TRUNCATION_MARKER: &str = "...";

/// Presentation options for the notifier message bodies.
#[derive(Debug, Clone, Copy)]
pub struct ReportStyle {
    /// Maximum displayed length of one diff line, in characters.
    pub max_line_len: usize,
}

impl Default for ReportStyle {
    fn default() -> Self {
        Self { max_line_len: 120 }
    }
}

/// Message body for the updated-pages bucket, or `None` when empty.
///
/// Per page: title, URL, and a fenced diff block where added lines
/// are prefixed `+` and removed lines `-`.
pub fn updated_pages_message(updated: &[UpdatedPage], style: &ReportStyle) -> Option<String> {
    if updated.is_empty() {
        return None;
    }

    let mut body = String::from("Updated pages:\n");
    for page in updated {
        body.push('\n');
        body.push_str(&format!("{}\n{}\n```\n", display_title(&page.title), page.url));
        for hunk in &page.hunks {
            let prefix = match hunk.kind {
                HunkKind::Added => '+',
                HunkKind::Removed => '-',
            };
            for line in hunk.lines() {
                body.push(prefix);
                body.push(' ');
                body.push_str(&truncate_line(line, style.max_line_len));
                body.push('\n');
            }
        }
        body.push_str("```\n");
    }
    Some(body)
}

/// Message body for the new-pages bucket, or `None` when empty.
pub fn new_pages_message(new_pages: &[NewPage]) -> Option<String> {
    if new_pages.is_empty() {
        return None;
    }

    let mut body = String::from("Newly watched pages:\n");
    for page in new_pages {
        body.push_str(&format!(
            "\n- {} ({})",
            page.url,
            display_title(&page.title)
        ));
    }
    body.push('\n');
    Some(body)
}

/// Message body for the errors bucket, or `None` when empty.
pub fn errors_message(errors: &[String]) -> Option<String> {
    if errors.is_empty() {
        return None;
    }

    let mut body = String::from("Pages that could not be fetched:\n");
    for url in errors {
        body.push_str(&format!("\n- {url}"));
    }
    body.push('\n');
    Some(body)
}

fn display_title(title: &str) -> &str {
    if title.is_empty() {
        "untitled"
    } else {
        title
    }
}

/// Character-based truncation with an ellipsis suffix when exceeded.
fn truncate_line(line: &str, max_len: usize) -> String {
    if line.chars().count() <= max_len {
        return line.to_string();
    }
    let kept: String = line.chars().take(max_len).collect();
    format!("{kept}{TRUNCATION_MARKER}")
}
