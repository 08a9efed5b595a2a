// =============================================================================
// Analysis Pipeline
// =============================================================================
//
// The only part of the crate that knows about concurrency and collaborators:
// - `Analyzer`      — per-instrument flow with bounded collaborator calls
// - `analyze_batch` — semaphore-gated fan-out with a join barrier
// - `BatchReport`   — one outcome per submitted instrument

pub mod analyzer;
pub mod batch;
pub mod result;

pub use analyzer::{normalize_instrument_id, Analyzer};
pub use result::{AnalysisResult, BatchEntry, BatchReport, InstrumentOutcome};
