//! Shared per-run context for the pipeline steps
//!
//! Built once at startup and passed by reference into every step: the
//! bundle layout, the probed platform capabilities, the upstream source
//! URLs, and the shared HTTP agent. Source URLs are fields rather than
//! constants so tests can point the pipeline at a mock server.

use crate::fetch::http;
use crate::layout::Layout;
use crate::platform::Platform;

/// Upstream locations the pipeline fetches from.
#[derive(Debug, Clone)]
pub struct Sources {
    /// GitHub API base for release-listing queries.
    pub github_api: String,
    /// Raw-file base for `<code>.traineddata` downloads.
    pub tessdata_base: String,
    /// Base URL for the ONNX model files.
    pub models_base: String,
}

impl Default for Sources {
    fn default() -> Self {
        Self {
            github_api: "https://api.github.com".to_string(),
            tessdata_base: "https://github.com/tesseract-ocr/tessdata_fast/raw/main".to_string(),
            models_base: "https://github.com/RapidAI/RapidOCR/releases/download/v1.3.24"
                .to_string(),
        }
    }
}

pub struct FetchContext {
    pub layout: Layout,
    pub platform: Platform,
    pub sources: Sources,
    pub agent: ureq::Agent,
}

impl FetchContext {
    pub fn new(layout: Layout, platform: Platform) -> Self {
        Self {
            layout,
            platform,
            sources: Sources::default(),
            agent: http::agent(),
        }
    }
}
