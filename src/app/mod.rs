//! Application orchestration: snapshot loading and the analysis cycle.

pub mod analysis;
pub mod snapshot;

pub use analysis::{AnalysisReport, Analyzer};
pub use snapshot::{load_snapshot, EconomySnapshot};
