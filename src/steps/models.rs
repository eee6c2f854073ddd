//! Step 3: RapidOCR ONNX models
//!
//! The detect/recognize/classify PP-OCR models for the ONNX-runtime OCR
//! provider. Pure batch download; no platform requirement.

use crate::context::FetchContext;
use crate::fetch::batch::{self, BatchItem};
use crate::layout::RAPIDOCR_MODELS;
use crate::output;
use crate::runner::CommandRunner;
use crate::steps::StepOutcome;

pub fn fetch_models(ctx: &FetchContext, _runner: &dyn CommandRunner) -> StepOutcome {
    let items: Vec<BatchItem> = RAPIDOCR_MODELS
        .iter()
        .map(|name| BatchItem {
            label: name.to_string(),
            url: format!("{}/{}", ctx.sources.models_base, name),
            dest: ctx.layout.model(name),
        })
        .collect();

    let report = batch::fetch_batch(&ctx.agent, &items);
    output::detail(&format!("onnx models: {}", report.summary()));

    if !report.all_ok() {
        StepOutcome::Failed(format!(
            "{} of {} model files failed",
            report.failed,
            items.len()
        ))
    } else if report.downloaded == 0 {
        StepOutcome::AlreadySatisfied
    } else {
        StepOutcome::Completed
    }
}
