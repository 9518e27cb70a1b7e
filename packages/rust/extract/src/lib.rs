//! HTML field extraction for the summit catalog.
//!
//! This crate provides:
//! - [`rules`] — generic rule-driven extractor ([`ExtractionRules`], [`extract_fields`])
//! - [`catalog`] — catalog cards and pagination
//! - [`detail`] — latitude/longitude from detail pages
//! - [`token`] — nonce lookup in the bootstrap page
//!
//! Everything here is pure: markup in, typed values out.

pub mod catalog;
pub mod detail;
pub mod rules;
pub mod token;

pub use catalog::{ESSENCIAL_TEXT, derive_id, parse_catalog_page, parse_total_pages};
pub use detail::parse_geo_fields;
pub use rules::{
    ExtractMode, ExtractionRules, FieldRule, FieldValue, Fields, extract_fields, parse_integer,
};
pub use token::extract_nonce;
