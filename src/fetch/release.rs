//! Latest-release resolution against the GitHub release-listing API
//!
//! Resolution is best-effort by contract: any network, auth, or parse
//! failure yields `None` and the caller falls back to its hard-coded
//! last-known-good version/URL pair. The pipeline must never fail solely
//! because the release API is unreachable.
//!
//! ## GitHub Authentication
//!
//! Set `GITHUB_TOKEN` to raise the API rate limit from 60/hr to 5000/hr.

use serde::Deserialize;
use std::time::Duration;

/// Releases inspected per query; enough for a few prereleases at the top.
const RELEASE_PAGE_SIZE: usize = 20;

/// A resolved release asset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Release {
    /// Tag name with any leading `v` stripped.
    pub version: String,
    pub asset_name: String,
    pub download_url: String,
}

#[derive(Deserialize)]
struct ReleaseEntry {
    tag_name: String,
    #[serde(default)]
    prerelease: bool,
    #[serde(default)]
    assets: Vec<AssetEntry>,
}

#[derive(Deserialize)]
struct AssetEntry {
    name: String,
    browser_download_url: String,
}

/// Find the newest non-prerelease whose asset name contains every pattern
/// in `asset_patterns`. Returns `None` on any fetch or parse error, or
/// when nothing matches; it never panics and never errors.
pub fn resolve_latest(
    agent: &ureq::Agent,
    api_base: &str,
    repo: &str,
    asset_patterns: &[&str],
) -> Option<Release> {
    let url = format!(
        "{}/repos/{}/releases?per_page={}",
        api_base, repo, RELEASE_PAGE_SIZE
    );

    let mut request = agent
        .get(&url)
        .timeout(Duration::from_secs(30))
        .set("Accept", "application/vnd.github.v3+json")
        .set("User-Agent", "decky-depfetch");

    if let Ok(token) = std::env::var("GITHUB_TOKEN") {
        request = request.set("Authorization", &format!("Bearer {}", token));
    }

    let releases: Vec<ReleaseEntry> = request.call().ok()?.into_json().ok()?;

    for release in releases {
        if release.prerelease {
            continue;
        }
        for asset in release.assets {
            if asset_patterns.iter().all(|p| asset.name.contains(p)) {
                return Some(Release {
                    version: release.tag_name.trim_start_matches('v').to_string(),
                    asset_name: asset.name,
                    download_url: asset.browser_download_url,
                });
            }
        }
    }

    None
}
