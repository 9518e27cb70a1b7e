//! Network stages of a scrape run.
//!
//! This crate provides:
//! - [`client`] — [`SiteClient`], the shared HTTP client and endpoints
//! - [`token`] — nonce acquisition from the bootstrap page
//! - [`catalog`] — pagination discovery and the unbounded page fan-out
//! - [`gate`] — [`AdmissionGate`], the concurrency cap for detail requests
//! - [`enrich`] — [`Enricher`], bounded detail fetching and positional merge

pub mod catalog;
pub mod client;
pub mod enrich;
pub mod gate;
pub mod token;

#[cfg(test)]
mod test_support;

pub use catalog::{CATALOG_ACTION, CATALOG_QUERY, fetch_catalog, fetch_page, fetch_total_pages};
pub use client::SiteClient;
pub use enrich::{EnrichProgress, Enricher, NoProgress};
pub use gate::AdmissionGate;
pub use token::acquire_token;
