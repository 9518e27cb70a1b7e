//! Detail-page enrichment under an admission gate.
//!
//! One task per record is created in input order and waits on the shared
//! [`AdmissionGate`]. Completion order is free, but the join hands back
//! results in dispatch order, so each geolocation is merged positionally
//! with the record that produced it.

use std::sync::atomic::{AtomicUsize, Ordering};

use futures::future::try_join_all;
use tracing::{debug, info, instrument};

use cims_extract::parse_geo_fields;
use cims_shared::{BasicMountainRecord, EnrichedMountainRecord, GeoFields, Result};

use crate::client::SiteClient;
use crate::gate::AdmissionGate;

/// Progress callback for the enrichment stage.
pub trait EnrichProgress: Send + Sync {
    /// Called each time a detail page has been fetched and parsed.
    fn record_enriched(&self, completed: usize, total: usize);
}

/// No-op progress for headless/test usage.
pub struct NoProgress;

impl EnrichProgress for NoProgress {
    fn record_enriched(&self, _completed: usize, _total: usize) {}
}

/// Fetches detail pages and merges their geolocation into basic records.
#[derive(Debug, Clone)]
pub struct Enricher {
    client: SiteClient,
    gate: AdmissionGate,
}

impl Enricher {
    pub fn new(client: SiteClient, gate: AdmissionGate) -> Self {
        Self { client, gate }
    }

    /// The gate bounding detail requests.
    pub fn gate(&self) -> &AdmissionGate {
        &self.gate
    }

    /// Enrich every record; output `i` always corresponds to input `i`.
    pub async fn enrich_all(
        &self,
        records: Vec<BasicMountainRecord>,
    ) -> Result<Vec<EnrichedMountainRecord>> {
        self.enrich_all_with(records, &NoProgress).await
    }

    /// [`Self::enrich_all`] with a progress callback.
    ///
    /// The first failed detail fetch fails the whole call; sibling requests
    /// still waiting or in flight are dropped.
    #[instrument(skip_all, fields(records = records.len(), cap = self.gate.capacity()))]
    pub async fn enrich_all_with(
        &self,
        records: Vec<BasicMountainRecord>,
        progress: &dyn EnrichProgress,
    ) -> Result<Vec<EnrichedMountainRecord>> {
        let total = records.len();
        let completed = &AtomicUsize::new(0);

        let geo = try_join_all(records.iter().map(|record| {
            self.gate.run(async move {
                let fields = self.fetch_geo(record).await?;
                let done = completed.fetch_add(1, Ordering::Relaxed) + 1;
                progress.record_enriched(done, total);
                Ok(fields)
            })
        }))
        .await?;

        let enriched: Vec<_> = records
            .into_iter()
            .zip(geo)
            .map(|(record, geo)| EnrichedMountainRecord::merge(record, geo))
            .collect();

        let missing = enriched.iter().filter(|r| r.geo.is_empty()).count();
        info!(
            records = enriched.len(),
            without_coordinates = missing,
            "enrichment complete"
        );
        Ok(enriched)
    }

    async fn fetch_geo(&self, record: &BasicMountainRecord) -> Result<GeoFields> {
        let body = self.client.get_text(&record.url).await?;
        let geo = parse_geo_fields(&body);
        debug!(id = %record.id, latitude = %geo.latitude, longitude = %geo.longitude, "detail parsed");
        Ok(geo)
    }
}
