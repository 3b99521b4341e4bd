//! Field resolver: concrete preview/runtime values for every bindable key.
//!
//! DESIGN
//! ======
//! Resolution is a pure read over the element list. Catalog-bound fields take
//! an override when one is supplied, else the catalog example. Manual and
//! select fields take their sample, checkboxes their content, and date fields
//! are computed per `dateMode`.
//!
//! Date fields in `fieldOffset` mode form a same-type dependency graph. It is
//! walked iteratively: follow `fieldRef` links down to a value that is already
//! cached, fixed, or unreachable, then unwind applying each offset. A visited
//! set along the walk turns a cycle into an empty value; a cache keyed by field
//! key makes a diamond evaluate each key once.
//!
//! Nothing here fails. Unknown tokens, broken references and cycles degrade to
//! an empty string (or the raw referenced text) so a bad binding only affects
//! the preview.

#[cfg(test)]
#[path = "resolve_test.rs"]
mod resolve_test;

use std::collections::{BTreeMap, HashMap, HashSet};

use time::macros::format_description;
use time::{Date, Duration, OffsetDateTime};
use tracing::debug;

use crate::catalog::FieldCatalog;
use crate::doc::{DateField, DateMode, Element, ElementId, ElementKind};
use crate::keys;

/// Resolved value per key or catalog path.
pub type ResolvedValues = BTreeMap<String, String>;

/// Inputs that are not part of the document.
#[derive(Debug, Clone, Copy)]
pub struct ResolveContext<'a> {
    pub catalog: &'a FieldCatalog,
    /// Values that win over catalog examples and manual/select samples.
    pub overrides: &'a HashMap<String, String>,
    pub today: Date,
}

/// Output of [`resolve`]: the key map plus the final text of each element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    pub values: ResolvedValues,
    /// Display text per element, placeholders substituted. Lines are absent.
    pub element_text: HashMap<ElementId, String>,
}

/// Today's date in local time, or UTC when the local offset is unknown.
#[must_use]
pub fn today() -> Date {
    OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc()).date()
}

/// Resolve every key, path and placeholder token used by `elements`.
#[must_use]
pub fn resolve(elements: &[Element], ctx: &ResolveContext<'_>) -> Resolution {
    let mut dates = DateGraph::new(elements, ctx.today);
    let mut values = ResolvedValues::new();

    for element in elements {
        match &element.kind {
            ElementKind::Field(f) if !f.field.is_empty() => {
                let v = lookup(&f.field, ctx);
                values.entry(f.field.clone()).or_insert(v);
            }
            ElementKind::DateField(f) if !f.key.is_empty() => {
                let v = dates.resolve(&f.key);
                values.entry(f.key.clone()).or_insert(v);
            }
            kind => {
                if let (Some(key), Some(v)) = (kind.key().filter(|k| !k.is_empty()), keyed_value(kind, ctx)) {
                    values.entry(key.to_owned()).or_insert(v);
                }
            }
        }
    }

    for text in elements.iter().filter_map(|e| e.kind.placeholder_text()) {
        for name in keys::placeholders(text) {
            if !values.contains_key(name) {
                let v = lookup(name, ctx);
                values.insert(name.to_owned(), v);
            }
        }
    }

    let element_text = elements
        .iter()
        .filter_map(|e| display_text(e, &values, &mut dates).map(|t| (e.id, t)))
        .collect();

    Resolution { values, element_text }
}

/// Convenience wrapper returning only the key map.
#[must_use]
pub fn resolve_values(elements: &[Element], ctx: &ResolveContext<'_>) -> ResolvedValues {
    resolve(elements, ctx).values
}

/// Replace every `{{token}}` in `text` with its value; unknown tokens vanish.
#[must_use]
pub fn render_placeholders(text: &str, values: &ResolvedValues) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(start) = rest.find("{{") {
        let after = &rest[start + 2..];
        let Some(end) = after.find("}}") else {
            break;
        };
        let name = &after[..end];
        if let Some(inner) = name.rfind("{{") {
            out.push_str(&rest[..start + 2 + inner]);
            rest = &after[inner..];
            continue;
        }
        out.push_str(&rest[..start]);
        if let Some(v) = values.get(name) {
            out.push_str(v);
        }
        rest = &after[end + 2..];
    }
    out.push_str(rest);
    out
}

/// Format a date as `DD/MM/YYYY`.
#[must_use]
pub fn format_date(date: Date) -> String {
    // Calendar components always fit this description.
    date.format(format_description!("[day]/[month]/[year]")).unwrap_or_default()
}

/// Parse `DD/MM/YYYY` or ISO `YYYY-MM-DD`.
#[must_use]
pub fn parse_date(text: &str) -> Option<Date> {
    let text = text.trim();
    if let Ok(date) = Date::parse(text, format_description!("[day]/[month]/[year]")) {
        return Some(date);
    }
    match Date::parse(text, format_description!("[year]-[month]-[day]")) {
        Ok(date) => Some(date),
        Err(_) => None,
    }
}

/// `None` when the offset leaves the representable date range.
fn shift(date: Date, days: i64) -> Option<Date> {
    days.checked_mul(86_400).map(Duration::seconds).and_then(|d| date.checked_add(d))
}

/// Override, then catalog example, then empty.
fn lookup(name: &str, ctx: &ResolveContext<'_>) -> String {
    ctx.overrides
        .get(name)
        .map(String::as_str)
        .or_else(|| ctx.catalog.example(name))
        .unwrap_or_default()
        .to_owned()
}

fn keyed_value(kind: &ElementKind, ctx: &ResolveContext<'_>) -> Option<String> {
    match kind {
        ElementKind::ManualField(f) => Some(ctx.overrides.get(&f.key).cloned().unwrap_or_else(|| f.sample.clone())),
        ElementKind::SelectField(f) => Some(ctx.overrides.get(&f.key).cloned().unwrap_or_else(|| {
            if f.sample.is_empty() { f.options.first().cloned().unwrap_or_default() } else { f.sample.clone() }
        })),
        ElementKind::CheckboxField(f) => Some(f.content.clone()),
        _ => None,
    }
}

fn display_text(element: &Element, values: &ResolvedValues, dates: &mut DateGraph<'_>) -> Option<String> {
    let text = match &element.kind {
        ElementKind::Text(t) => t.text.clone(),
        ElementKind::Field(f) => values.get(&f.field).cloned().unwrap_or_default(),
        ElementKind::ManualField(_) | ElementKind::SelectField(_) | ElementKind::CheckboxField(_) => {
            element.key().and_then(|k| values.get(k)).cloned().unwrap_or_default()
        }
        ElementKind::DateField(f) if f.key.is_empty() => dates.evaluate_unkeyed(f),
        ElementKind::DateField(f) => values.get(&f.key).cloned().unwrap_or_default(),
        ElementKind::SanitaryRegister(s) => format!("{}\n{}\n{}", s.country_code, s.registry_number, s.suffix),
        ElementKind::Paragraph(p) => render_placeholders(&p.html, values),
        ElementKind::Qr(q) => render_placeholders(&q.qr_content, values),
        ElementKind::Barcode(b) => render_placeholders(&b.barcode_content, values),
        ElementKind::Line(_) => return None,
    };
    Some(text)
}

// =============================================================
// Date graph
// =============================================================

/// Date fields indexed by key, with a memo of resolved values.
struct DateGraph<'a> {
    fields: HashMap<&'a str, &'a DateField>,
    cache: HashMap<String, String>,
    today: Date,
}

impl<'a> DateGraph<'a> {
    fn new(elements: &'a [Element], today: Date) -> Self {
        let mut fields = HashMap::new();
        for element in elements {
            if let ElementKind::DateField(f) = &element.kind {
                if !f.key.is_empty() {
                    fields.entry(f.key.as_str()).or_insert(f);
                }
            }
        }
        Self { fields, cache: HashMap::new(), today }
    }

    /// Resolved value of the date field keyed `key`.
    fn resolve(&mut self, key: &str) -> String {
        let mut chain: Vec<&'a DateField> = Vec::new();
        let mut visited: HashSet<String> = HashSet::new();
        let mut cursor = key.to_owned();

        let mut value = loop {
            if let Some(hit) = self.cache.get(&cursor) {
                break hit.clone();
            }
            if !visited.insert(cursor.clone()) {
                debug!(key = %cursor, "date reference cycle");
                break String::new();
            }
            let Some(field) = self.fields.get(cursor.as_str()).copied() else {
                debug!(key = %cursor, "date reference not found");
                break String::new();
            };
            if field.date_mode == DateMode::FieldOffset && !field.field_ref.is_empty() {
                chain.push(field);
                cursor.clone_from(&field.field_ref);
                continue;
            }
            let leaf = self.leaf_value(field);
            self.remember(&field.key, &leaf);
            break leaf;
        };

        while let Some(field) = chain.pop() {
            value = offset_text(&value, field.field_offset_days);
            self.remember(&field.key, &value);
        }
        value
    }

    /// Value of a date field that has no key and so cannot be referenced.
    fn evaluate_unkeyed(&mut self, field: &DateField) -> String {
        if field.date_mode == DateMode::FieldOffset {
            if field.field_ref.is_empty() {
                return String::new();
            }
            let base = self.resolve(&field.field_ref);
            return offset_text(&base, field.field_offset_days);
        }
        self.leaf_value(field)
    }

    fn leaf_value(&self, field: &DateField) -> String {
        match field.date_mode {
            DateMode::Manual => field.sample.clone(),
            DateMode::System | DateMode::SystemOffset => {
                shift(self.today, field.system_offset_days).map(format_date).unwrap_or_default()
            }
            DateMode::FieldOffset => String::new(),
        }
    }

    fn remember(&mut self, key: &str, value: &str) {
        self.cache.insert(key.to_owned(), value.to_owned());
    }
}

/// Shift a date string by `days`, or return it unchanged if it is not a date.
fn offset_text(base: &str, days: i64) -> String {
    match parse_date(base).and_then(|d| shift(d, days)) {
        Some(date) => format_date(date),
        None => base.to_owned(),
    }
}
