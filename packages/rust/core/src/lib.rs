//! Core pipeline orchestration for cims.
//!
//! This crate ties together nonce acquisition, catalog fetching, detail
//! enrichment, and output persistence into a single run (see [`pipeline::run`]).

pub mod pipeline;
pub mod sink;

pub use pipeline::{
    AlwaysProceed, ConfirmProceed, ProgressReporter, RunOutcome, RunSummary, SilentProgress, run,
    run_with_sink, scrape,
};
pub use sink::{JsonFileSink, RecordSink};
