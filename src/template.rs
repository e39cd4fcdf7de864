//! Flat `{name}` template substitution.
//!
//! # Responsibilities
//! - Replace `{key}` placeholders with variable values
//! - Detect placeholders that no variable resolves
//!
//! # Design Decisions
//! - [`substitute`] leaves unresolved placeholders as literal text, which
//!   is useful for diagnostics; production rendering always runs
//!   [`missing_vars`] first and refuses to emit broken URLs
//! - Placeholder names are restricted to `[A-Za-z0-9_]+`
//! - The missing list is deduplicated and sorted for stable errors

use std::collections::{BTreeSet, HashMap};

use once_cell::sync::Lazy;
use regex::Regex;

static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{([A-Za-z0-9_]+)\}").expect("placeholder pattern is valid"));

/// Replaces every literal `{key}` occurrence with `vars[key]`.
///
/// Placeholders with no matching variable are left untouched.
pub fn substitute(template: &str, vars: &HashMap<String, String>) -> String {
    PLACEHOLDER
        .replace_all(template, |caps: &regex::Captures<'_>| {
            match vars.get(&caps[1]) {
                Some(value) => value.clone(),
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}

/// Returns every placeholder name in `template` absent from `vars`.
///
/// Sorted and deduplicated.
pub fn missing_vars(template: &str, vars: &HashMap<String, String>) -> Vec<String> {
    let missing: BTreeSet<String> = PLACEHOLDER
        .captures_iter(template)
        .map(|caps| caps[1].to_string())
        .filter(|name| !vars.contains_key(name))
        .collect();

    missing.into_iter().collect()
}
