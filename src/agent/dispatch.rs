//! Action Directive Parsing
//!
//! The system prompt asks the model to emit lines of the form
//! `Action: internet_search: <query>` followed by `PAUSE`. In dispatch
//! mode the loop parses the first such directive out of a reply and runs
//! the real search.

use regex::Regex;

/// Extract the query of the first `internet_search` action directive in
/// `reply`, if any. The directive must start its own line.
pub fn parse_action(reply: &str) -> Option<String> {
    // Compiled per call; replies arrive at human conversation pace.
    let re = Regex::new(r"(?m)^\s*Action:\s*internet_search:\s*(.+)$").ok()?;
    re.captures(reply)
        .map(|caps| caps[1].trim().to_string())
        .filter(|q| !q.is_empty())
}
