//! Anti-forgery nonce extraction from the bootstrap page's inline scripts.

use std::sync::LazyLock;

use regex::Regex;
use scraper::{Html, Selector};

use cims_shared::{CimsError, Result};

/// Substring identifying the script block that carries the catalog nonce.
pub const SCRIPT_MARKER: &str = "var ajaxcustom";

/// Matches `"nonce":"<alphanumeric token>"`.
static NONCE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""nonce":"([a-zA-Z0-9]+)""#).expect("nonce regex"));

static SCRIPT_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("script").expect("script selector"));

/// Find the first inline script containing [`SCRIPT_MARKER`] and pull its nonce.
pub fn extract_nonce(markup: &str) -> Result<String> {
    let doc = Html::parse_document(markup);

    let script = doc
        .select(&SCRIPT_SEL)
        .map(|el| el.text().collect::<String>())
        .find(|content| content.contains(SCRIPT_MARKER))
        .ok_or_else(|| {
            CimsError::token_not_found(format!("no script block contains {SCRIPT_MARKER:?}"))
        })?;

    NONCE_RE
        .captures(&script)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .ok_or_else(|| CimsError::token_not_found("script block has no \"nonce\" value"))
}
