//! Step 2: tesseract language data
//!
//! One `<code>.traineddata` per bundled language, from the tessdata_fast
//! set. Pure batch download; no platform requirement.

use crate::context::FetchContext;
use crate::fetch::batch::{self, BatchItem};
use crate::layout::TESSERACT_LANGUAGES;
use crate::output;
use crate::runner::CommandRunner;
use crate::steps::StepOutcome;

pub fn fetch_language_data(ctx: &FetchContext, _runner: &dyn CommandRunner) -> StepOutcome {
    let items: Vec<BatchItem> = TESSERACT_LANGUAGES
        .iter()
        .map(|code| BatchItem {
            label: format!("{}.traineddata", code),
            url: format!("{}/{}.traineddata", ctx.sources.tessdata_base, code),
            dest: ctx.layout.traineddata(code),
        })
        .collect();

    let report = batch::fetch_batch(&ctx.agent, &items);
    output::detail(&format!("language data: {}", report.summary()));

    if !report.all_ok() {
        StepOutcome::Failed(format!(
            "{} of {} language files failed",
            report.failed,
            items.len()
        ))
    } else if report.downloaded == 0 {
        StepOutcome::AlreadySatisfied
    } else {
        StepOutcome::Completed
    }
}
