//! Prompt template placeholders
//!
//! Templates use `{{name}}` placeholders. The single-brace `{name}` form is
//! also recognised because the test executor substitutes both.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::{Captures, Regex};

static PLACEHOLDER_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{\s*([A-Za-z_][A-Za-z0-9_]*)\s*\}\}|\{([A-Za-z_][A-Za-z0-9_]*)\}")
        .expect("Invalid placeholder regex")
});

fn placeholder_name<'a>(caps: &Captures<'a>) -> Option<&'a str> {
    caps.get(1).or_else(|| caps.get(2)).map(|m| m.as_str())
}

/// Variable names referenced by a template, in order of first appearance
pub fn extract_variables(template: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for caps in PLACEHOLDER_REGEX.captures_iter(template) {
        if let Some(name) = placeholder_name(&caps) {
            if !names.iter().any(|n| n == name) {
                names.push(name.to_string());
            }
        }
    }
    names
}

/// Substitute known variables; unknown placeholders are left untouched
pub fn render_template(template: &str, variables: &BTreeMap<String, String>) -> String {
    PLACEHOLDER_REGEX
        .replace_all(template, |caps: &Captures<'_>| {
            placeholder_name(caps)
                .and_then(|name| variables.get(name))
                .cloned()
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}
