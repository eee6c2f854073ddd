//! Pipeline orchestration
//!
//! Runs the five steps in their fixed order, never aborting early: a
//! failed or skipped step is recorded and the next one still runs, so a
//! single bad download does not block the rest of the bundle. The summary
//! re-checks the artifacts on disk rather than trusting the outcomes.

use crate::context::FetchContext;
use crate::layout::{Artifact, Layout};
use crate::output;
use crate::runner::CommandRunner;
use crate::steps::{
    StepOutcome, fetch_engine, fetch_language_data, fetch_models, fetch_runtime, install_packages,
};

type StepFn = fn(&FetchContext, &dyn CommandRunner) -> StepOutcome;

/// The five steps, in execution order.
const STEPS: [(&str, StepFn); 5] = [
    ("tesseract binary", fetch_engine),
    ("language data", fetch_language_data),
    ("rapidocr models", fetch_models),
    ("python runtime", fetch_runtime),
    ("python packages", install_packages),
];

#[derive(Debug, Clone)]
pub struct StepResult {
    pub name: &'static str,
    pub outcome: StepOutcome,
}

#[derive(Debug, Clone)]
pub struct PipelineReport {
    pub steps: Vec<StepResult>,
    /// On-disk presence of each artifact after the run.
    pub artifacts: Vec<(Artifact, bool)>,
}

impl PipelineReport {
    /// True when every artifact is on disk, regardless of which steps ran.
    pub fn complete(&self) -> bool {
        self.artifacts.iter().all(|(_, present)| *present)
    }
}

/// Run all five steps against the context and re-check the tree.
pub fn run(ctx: &FetchContext, runner: &dyn CommandRunner) -> PipelineReport {
    let mut steps = Vec::with_capacity(STEPS.len());
    for (i, &(name, step)) in STEPS.iter().enumerate() {
        output::action_numbered(i + 1, STEPS.len(), name);
        let outcome = step(ctx, runner);
        match &outcome {
            StepOutcome::Completed => output::success(&format!("{} ready", name)),
            StepOutcome::AlreadySatisfied => {}
            StepOutcome::Skipped(reason) => {
                output::warning(&format!("{} skipped: {}", name, reason))
            }
            StepOutcome::Failed(reason) => {
                output::error(&format!("{} failed: {}", name, reason))
            }
        }
        steps.push(StepResult {
            name,
            outcome,
        });
    }

    PipelineReport {
        steps,
        artifacts: check_artifacts(&ctx.layout),
    }
}

/// Check every artifact against the bundle tree.
pub fn check_artifacts(layout: &Layout) -> Vec<(Artifact, bool)> {
    Artifact::ALL
        .iter()
        .map(|a| (*a, a.present(layout)))
        .collect()
}

/// Print the artifact table and the overall verdict.
pub fn print_summary(report: &PipelineReport) {
    output::action("Dependency summary");
    for (artifact, present) in &report.artifacts {
        output::artifact_row(artifact.label(), *present);
    }
    if report.complete() {
        output::success("all dependencies in place");
    } else {
        output::warning("bundle incomplete, re-run `depfetch fetch` or see above");
    }
}
