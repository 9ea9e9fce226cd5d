//! Checklist parsing - TODO text into TaskItems
//!
//! Primary grammar, per line: `- [ ] description | note`. If the whole text
//! yields no strict match, a fallback grammar picks up lines that reference
//! a document without the separator.

use regex::Regex;
use std::sync::OnceLock;
use tracing::debug;

use super::TaskItem;

/// Keyword the upstream prompt instructs the model to use for review tasks
const REVIEW_KEYWORD: &str = "查閱";

/// Opening bracket of a quoted document name
const QUOTE_BRACKET: &str = "「";

fn checkbox_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^-\s*\[\s*\]\s*(.+?)\s*\|\s*(.+?)$").unwrap())
}

/// Parse generated TODO text into an ordered checklist
///
/// Items come out in source line order, without deduplication. Lines that
/// match neither grammar are silently skipped; fully non-matching or empty
/// input yields an empty checklist, which downstream treats as already
/// complete.
pub fn parse_checklist(raw: &str) -> Vec<TaskItem> {
    debug!(raw_len = raw.len(), "parse_checklist: called");

    // Fenced-block markers are noise from the generating model
    let cleaned = raw.replace("```json", "").replace("```", "");

    let mut items = Vec::new();
    for line in cleaned.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if let Some(caps) = checkbox_pattern().captures(line) {
            items.push(TaskItem::new(caps[1].trim(), caps[2].trim()));
        }
    }

    // Loose fallback when the strict grammar found nothing
    if items.is_empty() {
        for line in raw.lines() {
            if line.contains(REVIEW_KEYWORD) && line.contains(QUOTE_BRACKET) {
                items.push(TaskItem::new(line.trim(), ""));
            }
        }
    }

    debug!(item_count = items.len(), "parse_checklist: complete");
    items
}
