//! The five pipeline steps
//!
//! Every step has the same shape: `(ctx, runner) -> StepOutcome`. Steps
//! never abort the pipeline; the orchestrator records the outcome and
//! moves on. A step that finds its terminal artifact already on disk
//! returns without touching the network.

mod engine;
mod langdata;
mod models;
mod packages;
mod runtime;

pub use engine::fetch_engine;
pub use langdata::fetch_language_data;
pub use models::fetch_models;
pub use packages::install_packages;
pub use runtime::fetch_runtime;

/// Result of one pipeline step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    /// Work was done and the artifact is now in place.
    Completed,
    /// The artifact was already on disk; nothing to do.
    AlreadySatisfied,
    /// The step cannot run here (no Linux-capable environment). Counted
    /// as unsuccessful when the artifact is required.
    Skipped(String),
    /// The step ran and failed.
    Failed(String),
}

impl StepOutcome {
    pub fn succeeded(&self) -> bool {
        matches!(self, StepOutcome::Completed | StepOutcome::AlreadySatisfied)
    }
}
