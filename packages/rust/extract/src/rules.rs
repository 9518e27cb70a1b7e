//! Rule-driven field extraction over repeated HTML items.
//!
//! An [`ExtractionRules`] value names the selector for the repeated item
//! element and, per output field, an optional sub-selector plus an
//! [`ExtractMode`]. [`extract_fields`] applies the rules to a markup blob and
//! returns one [`Fields`] map per matched item, in document order.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use cims_shared::{CimsError, Result};

// ---------------------------------------------------------------------------
// Rule types
// ---------------------------------------------------------------------------

/// How a field value is read from the matched element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractMode {
    /// Attribute value of the item (no sub-selector) or of the first sub-match.
    Attr(String),
    /// Trimmed text of the first sub-match.
    FirstText,
    /// Trimmed text of the last sub-match.
    LastText,
    /// Whether the trimmed text of the first sub-match equals the constant.
    TextEquals(String),
    /// Integer parsed from the digits in the first sub-match's text.
    Integer,
}

/// One output field: name, optional relative selector, extraction mode.
#[derive(Debug, Clone)]
pub struct FieldRule {
    name: String,
    selector: Option<Selector>,
    mode: ExtractMode,
}

impl FieldRule {
    /// Build a rule. `selector` is resolved relative to the item element;
    /// `None` reads from the item itself.
    pub fn new(name: impl Into<String>, selector: Option<&str>, mode: ExtractMode) -> Result<Self> {
        let selector = selector.map(parse_selector).transpose()?;
        Ok(Self {
            name: name.into(),
            selector,
            mode,
        })
    }

    /// Output field name.
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Item selector plus the field rules applied to every matched item.
#[derive(Debug, Clone)]
pub struct ExtractionRules {
    item: Selector,
    fields: Vec<FieldRule>,
}

impl ExtractionRules {
    /// Build a rule set from an item selector and its field rules.
    pub fn new(item_selector: &str, fields: Vec<FieldRule>) -> Result<Self> {
        Ok(Self {
            item: parse_selector(item_selector)?,
            fields,
        })
    }
}

/// Parse a CSS selector, mapping failures into [`CimsError::Parse`].
pub fn parse_selector(selector: &str) -> Result<Selector> {
    Selector::parse(selector)
        .map_err(|e| CimsError::parse(format!("invalid selector '{selector}': {e}")))
}

// ---------------------------------------------------------------------------
// Extracted values
// ---------------------------------------------------------------------------

/// A single extracted value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    Integer(u32),
    Bool(bool),
    /// The selector or attribute was absent.
    Missing,
}

/// Field name → value map for one item.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fields(BTreeMap<String, FieldValue>);

impl Fields {
    /// Raw value lookup.
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.0.get(name)
    }

    /// Text value, `None` when missing or not textual.
    pub fn text(&self, name: &str) -> Option<&str> {
        match self.0.get(name) {
            Some(FieldValue::Text(s)) => Some(s),
            _ => None,
        }
    }

    /// Text value, or an empty string when missing.
    pub fn text_or_empty(&self, name: &str) -> String {
        self.text(name).unwrap_or_default().to_string()
    }

    pub fn integer(&self, name: &str) -> Option<u32> {
        match self.0.get(name) {
            Some(FieldValue::Integer(n)) => Some(*n),
            _ => None,
        }
    }

    /// Boolean value; anything but `Bool(true)` reads as `false`.
    pub fn flag(&self, name: &str) -> bool {
        matches!(self.0.get(name), Some(FieldValue::Bool(true)))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Extraction
// ---------------------------------------------------------------------------

/// Apply `rules` to `markup`, one [`Fields`] per matched item in document order.
///
/// Fails only when an [`ExtractMode::Integer`] field has no digits.
pub fn extract_fields(markup: &str, rules: &ExtractionRules) -> Result<Vec<Fields>> {
    let doc = Html::parse_document(markup);

    doc.select(&rules.item)
        .map(|item| -> Result<Fields> {
            let mut fields = BTreeMap::new();
            for rule in &rules.fields {
                fields.insert(rule.name.clone(), extract_one(item, rule)?);
            }
            Ok(Fields(fields))
        })
        .collect()
}

fn extract_one(item: ElementRef<'_>, rule: &FieldRule) -> Result<FieldValue> {
    let first = || match &rule.selector {
        Some(sel) => item.select(sel).next(),
        None => Some(item),
    };

    let value = match &rule.mode {
        ExtractMode::Attr(attr) => first()
            .and_then(|el| el.value().attr(attr))
            .map_or(FieldValue::Missing, |v| FieldValue::Text(v.to_string())),
        ExtractMode::FirstText => first().map_or(FieldValue::Missing, |el| {
            FieldValue::Text(element_text(el))
        }),
        ExtractMode::LastText => {
            let last = match &rule.selector {
                Some(sel) => item.select(sel).last(),
                None => Some(item),
            };
            last.map_or(FieldValue::Missing, |el| FieldValue::Text(element_text(el)))
        }
        ExtractMode::TextEquals(expected) => {
            let text = first().map(element_text).unwrap_or_default();
            FieldValue::Bool(text == *expected)
        }
        ExtractMode::Integer => {
            let text = first().map(element_text).unwrap_or_default();
            FieldValue::Integer(parse_integer(&text).map_err(|e| match e {
                CimsError::Parse { message } => {
                    CimsError::parse(format!("field '{}': {message}", rule.name))
                }
                other => other,
            })?)
        }
    };

    Ok(value)
}

/// Concatenated, trimmed text content of an element.
pub fn element_text(el: ElementRef<'_>) -> String {
    el.text().collect::<String>().trim().to_string()
}

/// A digit group, allowing `,` `.` or (narrow) no-break spaces as thousands separators.
static DIGITS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\d{1,3}(?:[,.\u{00a0}\u{202f} ]\d{3})+|\d+").expect("digits regex")
});

/// Parse the first number in free text, ignoring thousands separators.
///
/// `"1,200 m"` → `1200`, `"950 m"` → `950`. Text without digits is a parse error.
pub fn parse_integer(text: &str) -> Result<u32> {
    let matched = DIGITS_RE
        .find(text)
        .ok_or_else(|| CimsError::parse(format!("no digits in {text:?}")))?;

    let digits: String = matched
        .as_str()
        .chars()
        .filter(char::is_ascii_digit)
        .collect();

    digits
        .parse()
        .map_err(|e| CimsError::parse(format!("invalid number {digits:?}: {e}")))
}
