//! Filesystem layout of the plugin bundle's dependency tree
//!
//! All five pipeline steps write under a single bundle root (the plugin's
//! `bin/` directory). Presence of a step's terminal artifact is the
//! idempotency marker: the fetch pipeline never re-validates content, it
//! only re-fetches what is absent.

use std::path::{Path, PathBuf};

/// Tesseract language codes bundled with the plugin.
///
/// Mirrors the plugin's language map (one `<code>.traineddata` per entry,
/// from the tessdata_fast set).
pub const TESSERACT_LANGUAGES: &[&str] = &[
    "eng", "jpn", "chi_sim", "chi_tra", "kor", "deu", "fra", "spa", "ita", "por", "rus", "ara",
    "nld", "pol", "tur", "ukr", "hin", "tha", "vie",
];

/// ONNX model files consumed by the RapidOCR provider (detect, recognize,
/// classify).
pub const RAPIDOCR_MODELS: &[&str] = &[
    "ch_PP-OCRv4_det_infer.onnx",
    "ch_PP-OCRv4_rec_infer.onnx",
    "ch_ppocr_mobile_v2.0_cls_infer.onnx",
];

/// Directories whose presence marks a completed pip install.
pub const PACKAGE_MARKERS: &[&str] = &["rapidocr_onnxruntime", "onnxruntime"];

/// Filename of the standalone Python runtime tarball (kept compressed;
/// it is unpacked on the device, not here).
pub const RUNTIME_TARBALL: &str = "python-3.11-standalone.tar.gz";

/// Paths of every artifact under the bundle root.
#[derive(Debug, Clone)]
pub struct Layout {
    root: PathBuf,
}

impl Layout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn engine_dir(&self) -> PathBuf {
        self.root.join("tesseract")
    }

    /// The extracted tesseract executable, step 1's terminal artifact.
    pub fn engine_binary(&self) -> PathBuf {
        self.engine_dir().join("tesseract")
    }

    /// Shared libraries copied out of the AppImage alongside the binary.
    pub fn engine_lib_dir(&self) -> PathBuf {
        self.engine_dir().join("lib")
    }

    pub fn tessdata_dir(&self) -> PathBuf {
        self.engine_dir().join("tessdata")
    }

    pub fn traineddata(&self, code: &str) -> PathBuf {
        self.tessdata_dir().join(format!("{}.traineddata", code))
    }

    pub fn models_dir(&self) -> PathBuf {
        self.root.join("rapidocr").join("models")
    }

    pub fn model(&self, name: &str) -> PathBuf {
        self.models_dir().join(name)
    }

    pub fn runtime_tarball(&self) -> PathBuf {
        self.root.join("python").join(RUNTIME_TARBALL)
    }

    pub fn packages_dir(&self) -> PathBuf {
        self.root.join("rapidocr").join("packages")
    }
}

/// The five terminal artifacts the summary re-checks on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Artifact {
    EngineBinary,
    LanguageData,
    Models,
    RuntimeTarball,
    Packages,
}

impl Artifact {
    pub const ALL: [Artifact; 5] = [
        Artifact::EngineBinary,
        Artifact::LanguageData,
        Artifact::Models,
        Artifact::RuntimeTarball,
        Artifact::Packages,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Artifact::EngineBinary => "tesseract binary",
            Artifact::LanguageData => "language data",
            Artifact::Models => "rapidocr models",
            Artifact::RuntimeTarball => "python runtime",
            Artifact::Packages => "python packages",
        }
    }

    /// Existence check against the bundle tree. Batches count as present
    /// only when every file in the fixed list is there.
    pub fn present(&self, layout: &Layout) -> bool {
        match self {
            Artifact::EngineBinary => layout.engine_binary().is_file(),
            Artifact::LanguageData => TESSERACT_LANGUAGES
                .iter()
                .all(|code| layout.traineddata(code).is_file()),
            Artifact::Models => RAPIDOCR_MODELS.iter().all(|name| layout.model(name).is_file()),
            Artifact::RuntimeTarball => layout.runtime_tarball().is_file(),
            Artifact::Packages => PACKAGE_MARKERS
                .iter()
                .all(|dir| layout.packages_dir().join(dir).is_dir()),
        }
    }
}
