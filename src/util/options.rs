//! Helpers for the free-form "additional compiler options" string.
//!
//! The string holds mxmlc/compc style options such as
//! `-debug=true -define+=CONFIG::x,1 -link-report report.xml`. An option
//! begins with `-` or `+`; following tokens that do not start a new option
//! are its values.

use std::sync::LazyLock;

use regex::Regex;

/// Matches the head of an option token and captures its name.
static OPTION_HEAD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[-+]([A-Za-z][A-Za-z0-9.\-]*?)(?:\+?=.*)?$").unwrap());

/// Split an options string into tokens, honouring double quotes.
pub fn split_options(options: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for ch in options.chars() {
        match ch {
            '"' => in_quotes = !in_quotes,
            c if c.is_whitespace() && !in_quotes => {
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
            }
            c => current.push(c),
        }
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    tokens
}

/// Name of the option a token starts, if any.
fn option_name(token: &str) -> Option<&str> {
    OPTION_HEAD
        .captures(token)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

fn quote(token: &str) -> String {
    if token.chars().any(char::is_whitespace) {
        format!("\"{}\"", token)
    } else {
        token.to_string()
    }
}

/// Remove every occurrence of the named options (and their values).
pub fn remove_options(options: &str, names: &[&str]) -> String {
    let mut kept = Vec::new();
    let mut skipping = false;

    for token in split_options(options) {
        if let Some(name) = option_name(&token) {
            skipping = names.contains(&name);
        }
        if !skipping {
            kept.push(quote(&token));
        }
    }

    kept.join(" ")
}
