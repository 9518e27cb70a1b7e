//! Core domain types for the summit catalog.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// BasicMountainRecord
// ---------------------------------------------------------------------------

/// A catalog entry built from the paginated listing alone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BasicMountainRecord {
    /// Last non-empty path segment of `url`.
    pub id: String,
    /// Detail page URL, verbatim from the listing link.
    pub url: String,
    /// Thumbnail image source.
    pub image: String,
    /// Summit name.
    pub name: String,
    /// Height in metres.
    pub height: u32,
    /// Region (comarca) label.
    pub region: String,
    /// Whether the summit carries the "Cim essencial" marker.
    pub essencial: bool,
}

// ---------------------------------------------------------------------------
// GeoFields
// ---------------------------------------------------------------------------

/// Geolocation scraped from a detail page.
///
/// Both fields are empty strings when the page lacks the expected labels.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeoFields {
    pub latitude: String,
    pub longitude: String,
}

impl GeoFields {
    /// `true` when neither coordinate could be read.
    pub fn is_empty(&self) -> bool {
        self.latitude.is_empty() && self.longitude.is_empty()
    }
}

// ---------------------------------------------------------------------------
// EnrichedMountainRecord
// ---------------------------------------------------------------------------

/// A basic record merged with its geolocation, serialized as one flat object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrichedMountainRecord {
    #[serde(flatten)]
    pub record: BasicMountainRecord,
    #[serde(flatten)]
    pub geo: GeoFields,
}

impl EnrichedMountainRecord {
    /// Merge a record with the geolocation fetched for it.
    pub fn merge(record: BasicMountainRecord, geo: GeoFields) -> Self {
        Self { record, geo }
    }
}
