//! Catalog page parsing: item cards and the pagination control.

use std::sync::LazyLock;

use scraper::{Html, Selector};
use tracing::debug;

use cims_shared::{BasicMountainRecord, CimsError, Result};

use crate::rules::{ExtractMode, ExtractionRules, FieldRule, extract_fields};

/// Selector for one catalog card.
pub const ITEM_SELECTOR: &str = ".item-100cims";

/// Marker label shown on cards of essential summits.
pub const ESSENCIAL_TEXT: &str = "Cim essencial";

/// Attribute on pagination anchors holding the page index.
const PAGE_ATTR: &str = "data-page";

static CATALOG_RULES: LazyLock<ExtractionRules> =
    LazyLock::new(|| catalog_rules().expect("catalog extraction rules"));

static ANCHOR_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a").expect("anchor selector"));

/// Field rules for a catalog card.
pub fn catalog_rules() -> Result<ExtractionRules> {
    ExtractionRules::new(
        ITEM_SELECTOR,
        vec![
            FieldRule::new("url", None, ExtractMode::Attr("href".into()))?,
            FieldRule::new("image", Some("img"), ExtractMode::Attr("src".into()))?,
            FieldRule::new("name", Some("h3"), ExtractMode::FirstText)?,
            FieldRule::new("height", Some("h5"), ExtractMode::Integer)?,
            FieldRule::new("region", Some("h5"), ExtractMode::LastText)?,
            FieldRule::new(
                "essencial",
                Some("strong"),
                ExtractMode::TextEquals(ESSENCIAL_TEXT.into()),
            )?,
        ],
    )
}

/// Parse one catalog page into basic records, in document order.
///
/// A page without cards yields an empty list. A card without a link or
/// without digits in its height line fails the whole page.
pub fn parse_catalog_page(markup: &str) -> Result<Vec<BasicMountainRecord>> {
    let items = extract_fields(markup, &CATALOG_RULES)?;

    let records = items
        .into_iter()
        .map(|fields| {
            let url = fields
                .text("url")
                .ok_or_else(|| CimsError::parse("catalog item has no href"))?
                .to_string();
            let id = derive_id(&url)
                .ok_or_else(|| CimsError::parse(format!("cannot derive id from url {url:?}")))?;
            let height = fields
                .integer("height")
                .ok_or_else(|| CimsError::parse(format!("catalog item {id} has no height")))?;

            Ok(BasicMountainRecord {
                id,
                image: fields.text_or_empty("image"),
                name: fields.text_or_empty("name"),
                height,
                region: fields.text_or_empty("region"),
                essencial: fields.flag("essencial"),
                url,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    debug!(count = records.len(), "parsed catalog page");
    Ok(records)
}

/// Read the highest page index from the last anchor's `data-page` attribute.
///
/// Returns `Ok(None)` when the page has no anchors or the last one carries no
/// page index; a present but non-numeric index is a parse error.
pub fn parse_total_pages(markup: &str) -> Result<Option<u32>> {
    let doc = Html::parse_document(markup);

    let Some(value) = doc
        .select(&ANCHOR_SEL)
        .last()
        .and_then(|a| a.value().attr(PAGE_ATTR))
    else {
        return Ok(None);
    };

    value
        .trim()
        .parse()
        .map(Some)
        .map_err(|e| CimsError::parse(format!("invalid {PAGE_ATTR} value {value:?}: {e}")))
}

/// Last non-empty `/`-separated segment of a URL.
pub fn derive_id(url: &str) -> Option<String> {
    url.split('/')
        .filter(|segment| !segment.is_empty())
        .next_back()
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture(name: &str) -> String {
        let path = format!("../../../fixtures/html/{name}");
        std::fs::read_to_string(&path).unwrap_or_else(|_| panic!("missing fixture: {path}"))
    }

    fn card(href: &str, strong: &str, height: &str) -> String {
        format!(
            r#"<a class="item-100cims" href="{href}">
                <img src="https://img.example/{height}.jpg">
                <strong>{strong}</strong>
                <h3> Test summit </h3>
                <h5>{height}</h5>
                <h5>Test region</h5>
            </a>"#
        )
    }

    #[test]
    fn parses_fixture_page_in_order() {
        let records = parse_catalog_page(&fixture("catalog-page-1.html")).unwrap();
        assert_eq!(records.len(), 3);

        let estats = &records[0];
        assert_eq!(estats.id, "pica-destats");
        assert_eq!(
            estats.url,
            "https://www.feec.cat/activitats/100-cims/cim/pica-destats/"
        );
        assert_eq!(
            estats.image,
            "https://www.feec.cat/wp-content/uploads/2021/03/pica-destats.jpg"
        );
        assert_eq!(estats.name, "Pica d'Estats");
        assert_eq!(estats.height, 3143);
        assert_eq!(estats.region, "Pallars Sobirà");
        assert!(estats.essencial);

        assert_eq!(records[1].id, "montcau");
        assert_eq!(records[1].height, 1057);
        assert!(!records[1].essencial);

        assert_eq!(records[2].id, "puigmal");
        assert_eq!(records[2].height, 2910);
    }

    #[test]
    fn fixture_total_pages() {
        assert_eq!(
            parse_total_pages(&fixture("catalog-page-1.html")).unwrap(),
            Some(3)
        );
    }

    #[test]
    fn comma_separated_height() {
        let records = parse_catalog_page(&card("/cims/x/", "", "1,200 m")).unwrap();
        assert_eq!(records[0].height, 1200);
    }

    #[test]
    fn height_without_digits_fails() {
        let err = parse_catalog_page(&card("/cims/x/", "", "sense dades")).unwrap_err();
        assert!(matches!(err, CimsError::Parse { .. }));
    }

    #[test]
    fn essencial_requires_exact_marker() {
        let exact = parse_catalog_page(&card("/c/a/", "Cim essencial", "100 m")).unwrap();
        assert!(exact[0].essencial);

        let other = parse_catalog_page(&card("/c/a/", "Cim essencial!", "100 m")).unwrap();
        assert!(!other[0].essencial);

        let lower = parse_catalog_page(&card("/c/a/", "cim essencial", "100 m")).unwrap();
        assert!(!lower[0].essencial);

        let empty = parse_catalog_page(&card("/c/a/", "", "100 m")).unwrap();
        assert!(!empty[0].essencial);
    }

    #[test]
    fn name_is_trimmed() {
        let records = parse_catalog_page(&card("/c/a/", "", "100 m")).unwrap();
        assert_eq!(records[0].name, "Test summit");
    }

    #[test]
    fn empty_page_yields_no_records() {
        assert!(parse_catalog_page("<div class=\"no-results\"></div>").unwrap().is_empty());
    }

    #[test]
    fn missing_pagination_is_none() {
        assert_eq!(parse_total_pages("<div>no links</div>").unwrap(), None);
        // The last anchor is a card, not a pagination control.
        assert_eq!(parse_total_pages(&card("/c/a/", "", "100 m")).unwrap(), None);
    }

    #[test]
    fn non_numeric_page_index_fails() {
        let err = parse_total_pages(r#"<a data-page="last">»</a>"#).unwrap_err();
        assert!(matches!(err, CimsError::Parse { .. }));
    }

    #[test]
    fn derive_id_takes_last_segment() {
        assert_eq!(
            derive_id("https://www.feec.cat/cim/montcau/").as_deref(),
            Some("montcau")
        );
        assert_eq!(derive_id("/a/b").as_deref(), Some("b"));
        assert_eq!(derive_id("///"), None);
    }
}
