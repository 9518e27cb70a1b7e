//! End-to-end scrape pipeline: confirm → nonce → catalog → enrich → write.

use std::time::{Duration, Instant};

use tracing::{info, instrument};

use cims_crawler::{AdmissionGate, EnrichProgress, Enricher, SiteClient};
use cims_shared::{EnrichedMountainRecord, Result, RunConfig};

use crate::sink::{JsonFileSink, RecordSink};

/// Operator gate consulted before any network traffic.
pub trait ConfirmProceed {
    /// `true` to run, `false` to stop without side effects.
    fn confirm_proceed(&self) -> bool;
}

impl<F: Fn() -> bool> ConfirmProceed for F {
    fn confirm_proceed(&self) -> bool {
        self()
    }
}

/// Proceeds without asking (non-interactive runs, tests).
pub struct AlwaysProceed;

impl ConfirmProceed for AlwaysProceed {
    fn confirm_proceed(&self) -> bool {
        true
    }
}

/// Summary of a completed run.
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// Records written.
    pub records: usize,
    /// Records whose detail page had no coordinates.
    pub without_coordinates: usize,
    /// Where the output went.
    pub destination: String,
    /// Total elapsed time.
    pub elapsed: Duration,
}

/// How a run ended when it did not fail.
#[derive(Debug, Clone)]
pub enum RunOutcome {
    /// The operator declined; nothing was fetched or written.
    Declined,
    Completed(RunSummary),
}

/// Progress callback for reporting pipeline status.
pub trait ProgressReporter: Send + Sync {
    /// Called when entering a new phase.
    fn phase(&self, name: &str);
    /// Called once the catalog has been parsed.
    fn catalog_loaded(&self, records: usize);
    /// Called as each detail page is merged.
    fn record_enriched(&self, current: usize, total: usize);
    /// Called when the pipeline completes.
    fn done(&self, summary: &RunSummary);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn phase(&self, _name: &str) {}
    fn catalog_loaded(&self, _records: usize) {}
    fn record_enriched(&self, _current: usize, _total: usize) {}
    fn done(&self, _summary: &RunSummary) {}
}

/// Run the full pipeline and write the JSON output configured in `config`.
pub async fn run(
    config: &RunConfig,
    confirm: &dyn ConfirmProceed,
    progress: &dyn ProgressReporter,
) -> Result<RunOutcome> {
    let sink = JsonFileSink::new(&config.output_path, config.pretty);
    run_with_sink(config, confirm, progress, &sink).await
}

/// Run the full pipeline, handing the result to `sink`.
///
/// 1. Ask `confirm` (before any request)
/// 2. Acquire the nonce
/// 3. Fetch and parse the catalog
/// 4. Enrich every record from its detail page
/// 5. Write once
///
/// Any failure returns early; the sink is only called with a complete collection.
#[instrument(skip_all, fields(concurrency = config.concurrency, output = %sink.describe()))]
pub async fn run_with_sink(
    config: &RunConfig,
    confirm: &dyn ConfirmProceed,
    progress: &dyn ProgressReporter,
    sink: &dyn RecordSink,
) -> Result<RunOutcome> {
    if !confirm.confirm_proceed() {
        info!("run declined by operator");
        return Ok(RunOutcome::Declined);
    }

    let start = Instant::now();
    let records = scrape(config, progress).await?;

    progress.phase("Writing output");
    sink.write(&records)?;

    let summary = RunSummary {
        records: records.len(),
        without_coordinates: records.iter().filter(|r| r.geo.is_empty()).count(),
        destination: sink.describe(),
        elapsed: start.elapsed(),
    };

    progress.done(&summary);

    info!(
        records = summary.records,
        without_coordinates = summary.without_coordinates,
        elapsed_ms = summary.elapsed.as_millis(),
        "run complete"
    );

    Ok(RunOutcome::Completed(summary))
}

/// Network stages only: nonce, catalog, enrichment.
pub async fn scrape(
    config: &RunConfig,
    progress: &dyn ProgressReporter,
) -> Result<Vec<EnrichedMountainRecord>> {
    let client = SiteClient::new(config.site.clone())?;

    // --- Phase 1: Nonce ---
    progress.phase("Acquiring nonce");
    let token = cims_crawler::acquire_token(&client).await?;

    // --- Phase 2: Catalog ---
    progress.phase("Fetching catalog pages");
    let records = cims_crawler::fetch_catalog(&client, &token).await?;
    progress.catalog_loaded(records.len());

    // --- Phase 3: Detail enrichment ---
    progress.phase("Fetching summit details");
    let enricher = Enricher::new(client, AdmissionGate::new(config.concurrency));
    let enrich_progress = PipelineEnrichProgress { inner: progress };
    enricher.enrich_all_with(records, &enrich_progress).await
}

// ---------------------------------------------------------------------------
// Enrichment progress adapter
// ---------------------------------------------------------------------------

/// Adapts a `ProgressReporter` to the `EnrichProgress` interface.
struct PipelineEnrichProgress<'a> {
    inner: &'a dyn ProgressReporter,
}

impl EnrichProgress for PipelineEnrichProgress<'_> {
    fn record_enriched(&self, completed: usize, total: usize) {
        self.inner.record_enriched(completed, total);
    }
}
