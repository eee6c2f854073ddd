//! Step 1: tesseract engine binary
//!
//! Downloads the tesseract AppImage, extracts it in a scratch directory
//! (`--appimage-extract` needs no FUSE), and copies the executable plus its
//! shared libraries into the bundle. Extraction and copying run as an
//! ordered command sequence; the first failing command aborts the step.
//! Requires a Linux-capable environment and is skipped without running any
//! command when there is none.

use crate::context::FetchContext;
use crate::fetch::{http, release};
use crate::output;
use crate::runner::{Cmd, CommandRunner, run_sequence};
use crate::steps::StepOutcome;

const ENGINE_REPO: &str = "AlexanderP/tesseract-appimage";

/// Asset match: the 5.x AppImage for the Deck's architecture.
const ASSET_PATTERNS: &[&str] = &["tesseract-5.", "x86_64.AppImage"];

/// Last known good, used when release resolution fails.
const FALLBACK_VERSION: &str = "5.3.4";
const FALLBACK_URL: &str = "https://github.com/AlexanderP/tesseract-appimage/releases/download/v5.3.4/tesseract-5.3.4-x86_64.AppImage";

pub fn fetch_engine(ctx: &FetchContext, runner: &dyn CommandRunner) -> StepOutcome {
    if ctx.layout.engine_binary().is_file() {
        output::skip("tesseract binary already present");
        return StepOutcome::AlreadySatisfied;
    }

    if !ctx.platform.can_run_linux_commands {
        return StepOutcome::Skipped(
            "no Linux-capable environment to extract the AppImage".to_string(),
        );
    }

    let release = release::resolve_latest(
        &ctx.agent,
        &ctx.sources.github_api,
        ENGINE_REPO,
        ASSET_PATTERNS,
    )
    .unwrap_or_else(|| {
        output::warning(&format!(
            "could not resolve latest tesseract release, falling back to {}",
            FALLBACK_VERSION
        ));
        release::Release {
            version: FALLBACK_VERSION.to_string(),
            asset_name: format!("tesseract-{}-x86_64.AppImage", FALLBACK_VERSION),
            download_url: FALLBACK_URL.to_string(),
        }
    });
    output::detail(&format!("tesseract AppImage {}", release.version));

    let work = match tempfile::tempdir() {
        Ok(dir) => dir,
        Err(e) => return StepOutcome::Failed(format!("cannot create scratch dir: {}", e)),
    };
    let appimage = work.path().join("tesseract.AppImage");

    if let Err(e) = http::download(&ctx.agent, &release.download_url, &appimage) {
        return StepOutcome::Failed(format!("AppImage download failed: {}", e));
    }

    if let Err(e) = std::fs::create_dir_all(ctx.layout.engine_lib_dir()) {
        return StepOutcome::Failed(format!("cannot create engine dir: {}", e));
    }

    // The binary is the step's done-marker, so it is copied last: a run
    // that dies mid-extraction leaves no binary and retries from scratch.
    // The lib copy transfers directory contents into the pre-created dest,
    // which stays correct when a previous attempt already half-filled it.
    let p = &ctx.platform;
    let cmds = vec![
        Cmd::new("chmod", vec!["+x".to_string(), p.exec_path(&appimage)]),
        Cmd::new(p.exec_path(&appimage), ["--appimage-extract"]).cwd(work.path()),
        Cmd::new(
            "cp",
            vec![
                "-r".to_string(),
                "squashfs-root/usr/lib/.".to_string(),
                p.exec_path(&ctx.layout.engine_lib_dir()),
            ],
        )
        .cwd(work.path()),
        Cmd::new(
            "cp",
            vec![
                "squashfs-root/usr/bin/tesseract".to_string(),
                p.exec_path(&ctx.layout.engine_binary()),
            ],
        )
        .cwd(work.path()),
    ];

    match run_sequence(runner, p.uses_wsl, cmds) {
        Ok(()) => StepOutcome::Completed,
        Err(e) => StepOutcome::Failed(e.to_string()),
    }
}
