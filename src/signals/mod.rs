// =============================================================================
// Signals Module
// =============================================================================
//
// Threshold-based signal derivation:
// - `Signal` / `SignalSet` — named, payload-free tags with a stable order
// - `SignalDeriver` — fixed-threshold mapping from an indicator snapshot

pub mod deriver;
pub mod signal;

pub use deriver::{ContextThresholds, SignalDeriver};
pub use signal::{Signal, SignalSet};
