//! Detail page parsing: latitude/longitude from the labelled data grid.

use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};

use cims_shared::GeoFields;

use crate::rules::element_text;

/// Grid holding the summit's key/value rows.
pub const GEO_CONTAINER_SELECTOR: &str = ".row.no-gutters.fw-light.lh-1-2";

pub const LATITUDE_LABEL: &str = "Latitud:";
pub const LONGITUDE_LABEL: &str = "Longitud:";

static CONTAINER_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(GEO_CONTAINER_SELECTOR).expect("geo container selector"));

static DIV_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("div").expect("div selector"));

/// Read latitude and longitude from a detail page.
///
/// Never fails: an absent container or label yields an empty string.
pub fn parse_geo_fields(markup: &str) -> GeoFields {
    let doc = Html::parse_document(markup);

    GeoFields {
        latitude: labelled_value(&doc, LATITUDE_LABEL),
        longitude: labelled_value(&doc, LONGITUDE_LABEL),
    }
}

/// Text of the element following the innermost `div` whose text contains `label`.
fn labelled_value(doc: &Html, label: &str) -> String {
    doc.select(&CONTAINER_SEL)
        .flat_map(|container| container.select(&DIV_SEL))
        .find(|div| contains_label(*div, label) && !has_inner_label(*div, label))
        .and_then(|div| div.next_siblings().find_map(ElementRef::wrap))
        .map(|value| clean_coordinate(&element_text(value)))
        .unwrap_or_default()
}

fn contains_label(el: ElementRef<'_>, label: &str) -> bool {
    el.text().collect::<String>().contains(label)
}

/// Whether a nested `div` also carries the label (so `el` is only a wrapper).
fn has_inner_label(el: ElementRef<'_>, label: &str) -> bool {
    el.descendants()
        .skip(1)
        .filter_map(ElementRef::wrap)
        .any(|inner| inner.value().name() == "div" && contains_label(inner, label))
}

/// Trim and drop the trailing degree sign (`º` on the site, `°` tolerated).
pub fn clean_coordinate(raw: &str) -> String {
    raw.trim()
        .trim_end_matches(['º', '°'])
        .trim_end()
        .to_string()
}
