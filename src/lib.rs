//! Dependency fetcher for the decky-translator plugin bundle
//!
//! Populates the plugin's `bin/` tree with everything the packaging step
//! needs: the tesseract OCR binary (extracted from an AppImage), per-language
//! tessdata files, RapidOCR ONNX models, a standalone Python runtime tarball,
//! and pip-installed packages for the manylinux target.
//!
//! The pipeline runs five steps in fixed order. Each step is idempotent
//! (presence of its terminal artifact means done) and independent: a failed
//! step is reported and the next one still runs. The final summary re-checks
//! the on-disk artifacts rather than trusting the in-memory results.
//!
//! ```text
//! depfetch fetch            run all five steps, print the summary
//! depfetch status           re-check artifacts, exit 1 if any are missing
//! ```
//!
//! Version discovery is two-tier: the GitHub release-listing API first, a
//! hard-coded last-known-good URL when the API is unreachable or has no
//! matching asset. Steps that shell out (AppImage extraction, pip install)
//! require a Linux-capable environment: native Linux, or WSL on Windows,
//! where every path handed to a command is translated to its `/mnt/<drive>`
//! form first.

pub mod context;
pub mod fetch;
pub mod layout;
pub mod output;
pub mod pipeline;
pub mod platform;
pub mod runner;
pub mod steps;
