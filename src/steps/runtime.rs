//! Step 4: standalone Python runtime
//!
//! Fetches the python-build-standalone CPython 3.11 tarball for the Deck.
//! The tarball is stored as-is; the plugin loader extracts it on first run
//! on the device, so no platform capability is needed here.

use crate::context::FetchContext;
use crate::fetch::{http, release};
use crate::output;
use crate::runner::CommandRunner;
use crate::steps::StepOutcome;

const RUNTIME_REPO: &str = "indygreg/python-build-standalone";

/// Asset match: CPython 3.11, glibc x86_64, install-only layout.
const ASSET_PATTERNS: &[&str] = &["cpython-3.11.", "x86_64-unknown-linux-gnu-install_only.tar.gz"];

/// Last known good, used when release resolution fails.
const FALLBACK_VERSION: &str = "20240224";
const FALLBACK_URL: &str = "https://github.com/indygreg/python-build-standalone/releases/download/20240224/cpython-3.11.8+20240224-x86_64-unknown-linux-gnu-install_only.tar.gz";

pub fn fetch_runtime(ctx: &FetchContext, _runner: &dyn CommandRunner) -> StepOutcome {
    let dest = ctx.layout.runtime_tarball();
    if dest.is_file() {
        output::skip("python runtime tarball already present");
        return StepOutcome::AlreadySatisfied;
    }

    let release = release::resolve_latest(
        &ctx.agent,
        &ctx.sources.github_api,
        RUNTIME_REPO,
        ASSET_PATTERNS,
    )
    .unwrap_or_else(|| {
        output::warning(&format!(
            "could not resolve latest python-build-standalone release, falling back to {}",
            FALLBACK_VERSION
        ));
        release::Release {
            version: FALLBACK_VERSION.to_string(),
            asset_name: format!(
                "cpython-3.11.8+{}-x86_64-unknown-linux-gnu-install_only.tar.gz",
                FALLBACK_VERSION
            ),
            download_url: FALLBACK_URL.to_string(),
        }
    });
    output::detail(&format!("python runtime {}", release.version));

    match http::download(&ctx.agent, &release.download_url, &dest) {
        Ok(_) => StepOutcome::Completed,
        Err(e) => StepOutcome::Failed(format!("runtime download failed: {}", e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::Layout;
    use crate::platform::Platform;
    use crate::runner::testing::RecordingRunner;
    use tempfile::tempdir;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_existing_tarball_short_circuits() {
        let temp = tempdir().unwrap();
        let ctx = FetchContext::new(Layout::new(temp.path()), Platform::unsupported());
        let tarball = ctx.layout.runtime_tarball();
        std::fs::create_dir_all(tarball.parent().unwrap()).unwrap();
        std::fs::write(&tarball, "cached").unwrap();

        let outcome = fetch_runtime(&ctx, &RecordingRunner::new());
        assert_eq!(outcome, StepOutcome::AlreadySatisfied);
    }

    #[test]
    fn test_fallback_matches_own_asset_patterns() {
        let fallback_asset = format!(
            "cpython-3.11.8+{}-x86_64-unknown-linux-gnu-install_only.tar.gz",
            FALLBACK_VERSION
        );
        assert!(ASSET_PATTERNS.iter().all(|p| fallback_asset.contains(p)));
        assert!(FALLBACK_URL.ends_with(&fallback_asset));
    }

    #[tokio::test]
    async fn test_downloads_resolved_tarball() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(format!("/repos/{}/releases", RUNTIME_REPO)))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([{
                "tag_name": "20250115",
                "prerelease": false,
                "assets": [{
                    "name": "cpython-3.11.11+20250115-x86_64-unknown-linux-gnu-install_only.tar.gz",
                    "browser_download_url": format!("{}/assets/cpython.tar.gz", server.uri()),
                }],
            }])))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/assets/cpython.tar.gz"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"fake tarball".to_vec()))
            .mount(&server)
            .await;

        let temp = tempdir().unwrap();
        let mut ctx = FetchContext::new(Layout::new(temp.path()), Platform::unsupported());
        ctx.sources.github_api = server.uri();

        let outcome = fetch_runtime(&ctx, &RecordingRunner::new());
        assert_eq!(outcome, StepOutcome::Completed);
        assert_eq!(
            std::fs::read(ctx.layout.runtime_tarball()).unwrap(),
            b"fake tarball"
        );
    }

    #[tokio::test]
    async fn test_failed_download_leaves_no_tarball() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(format!("/repos/{}/releases", RUNTIME_REPO)))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([{
                "tag_name": "20250115",
                "prerelease": false,
                "assets": [{
                    "name": "cpython-3.11.11+20250115-x86_64-unknown-linux-gnu-install_only.tar.gz",
                    "browser_download_url": format!("{}/assets/cpython.tar.gz", server.uri()),
                }],
            }])))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/assets/cpython.tar.gz"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let temp = tempdir().unwrap();
        let mut ctx = FetchContext::new(Layout::new(temp.path()), Platform::unsupported());
        ctx.sources.github_api = server.uri();

        let outcome = fetch_runtime(&ctx, &RecordingRunner::new());
        assert!(matches!(outcome, StepOutcome::Failed(_)));
        assert!(!ctx.layout.runtime_tarball().exists());
    }
}
