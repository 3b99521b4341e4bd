//! Key identity: placeholder tokens, key renames, and collision-free keys.
//!
//! A key-bearing element's `key` doubles as the placeholder token `{{key}}`
//! inside other elements' free text (`html`, `qrContent`, `barcodeContent`).
//! Tokens are matched literally, braces included, so renaming `Fecha` never
//! touches `{{FechaEnvasado}}`.

#[cfg(test)]
#[path = "keys_test.rs"]
mod keys_test;

use std::collections::{BTreeMap, HashSet};

use crate::doc::Element;

/// Upper bound on numbered suffix candidates before falling back to a uuid tail.
const MAX_SUFFIX: usize = 10_000;

/// Wrap `key` as a placeholder token.
#[must_use]
pub fn token(key: &str) -> String {
    format!("{{{{{key}}}}}")
}

/// Every `{{token}}` name in `text`, in order of appearance (duplicates kept).
#[must_use]
pub fn placeholders(text: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut rest = text;
    while let Some(start) = rest.find("{{") {
        let after = &rest[start + 2..];
        let Some(end) = after.find("}}") else {
            break;
        };
        let name = &after[..end];
        // `{{a {{b}}` names `b`, not `a {{b`.
        if let Some(inner) = name.rfind("{{") {
            rest = &after[inner..];
            continue;
        }
        if !name.is_empty() {
            out.push(name);
        }
        rest = &after[end + 2..];
    }
    out
}

/// Replace every exact `{{old}}` token in `text` with `{{new}}`.
///
/// Returns `None` when `text` holds no such token.
#[must_use]
pub fn rename_in_text(text: &str, old_key: &str, new_key: &str) -> Option<String> {
    let old_token = token(old_key);
    if !text.contains(&old_token) {
        return None;
    }
    Some(text.replace(&old_token, &token(new_key)))
}

/// Rewrite `{{old_key}}` to `{{new_key}}` in every element's placeholder text.
///
/// Returns the number of elements whose content changed. Empty or equal keys
/// are a no-op.
pub fn cascade_rename(elements: &mut [Element], old_key: &str, new_key: &str) -> usize {
    if old_key.is_empty() || new_key.is_empty() || old_key == new_key {
        return 0;
    }
    let mut changed = 0;
    for element in elements.iter_mut() {
        let Some(content) = element.kind.placeholder_text_mut() else {
            continue;
        };
        if let Some(rewritten) = rename_in_text(content, old_key, new_key) {
            *content = rewritten;
            changed += 1;
        }
    }
    changed
}

/// Strip a key to `[a-zA-Z0-9 ]` and capitalise its first letter.
#[must_use]
pub fn sanitize_key(raw: &str) -> String {
    let cleaned: String = raw.chars().filter(|c| c.is_ascii_alphanumeric() || *c == ' ').collect();
    let mut chars = cleaned.chars();
    match chars.next() {
        Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
        None => String::new(),
    }
}

/// Keys of every key-bearing element, skipping `exclude` if given.
#[must_use]
pub fn existing_keys<'a>(elements: &'a [Element], exclude: Option<&Element>) -> HashSet<&'a str> {
    elements
        .iter()
        .filter(|e| exclude.is_none_or(|x| x.id != e.id))
        .filter_map(Element::key)
        .filter(|k| !k.is_empty())
        .collect()
}

/// Key for the copy of an element whose key is `key`.
///
/// Candidates are `"<key> copia"`, then `"<key> 2"`, `"<key> 3"`, …; each is
/// sanitized and the first one absent from `existing` wins.
#[must_use]
pub fn duplicate_key(key: &str, existing: &HashSet<&str>) -> String {
    let copy = sanitize_key(&format!("{key} copia"));
    if !existing.contains(copy.as_str()) {
        return copy;
    }
    numbered_key(key, existing, 2)
}

/// `base` if free, else `"<base> 2"`, `"<base> 3"`, …
#[must_use]
pub fn unique_key(base: &str, existing: &HashSet<&str>) -> String {
    let first = sanitize_key(base);
    if !first.is_empty() && !existing.contains(first.as_str()) {
        return first;
    }
    numbered_key(base, existing, 2)
}

fn numbered_key(base: &str, existing: &HashSet<&str>, start: usize) -> String {
    for n in start..MAX_SUFFIX {
        let candidate = sanitize_key(&format!("{base} {n}"));
        if !existing.contains(candidate.as_str()) {
            return candidate;
        }
    }
    sanitize_key(&format!("{base} {}", uuid::Uuid::new_v4().simple()))
}

/// Keys used by more than one key-bearing element, with their counts.
#[must_use]
pub fn duplicate_keys(elements: &[Element]) -> BTreeMap<String, usize> {
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for key in elements.iter().filter_map(Element::key).filter(|k| !k.is_empty()) {
        *counts.entry(key.to_owned()).or_default() += 1;
    }
    counts.retain(|_, n| *n > 1);
    counts
}
