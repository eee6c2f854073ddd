//! Multi-file batch fetch with partial-failure accounting
//!
//! Used by the language-data and model steps. Items are processed one at a
//! time in list order: present files are skipped without any network call,
//! a failed download is counted and the batch continues. The batch as a
//! whole succeeds only when nothing failed.

use crate::fetch::http::{self, DownloadError};
use crate::output;
use std::path::PathBuf;

/// One file to acquire.
#[derive(Debug, Clone)]
pub struct BatchItem {
    /// Short name for log lines, usually the destination filename.
    pub label: String,
    pub url: String,
    pub dest: PathBuf,
}

/// Counts for a finished batch.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BatchReport {
    pub downloaded: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl BatchReport {
    pub fn all_ok(&self) -> bool {
        self.failed == 0
    }

    pub fn summary(&self) -> String {
        format!(
            "{} downloaded, {} skipped, {} failed",
            self.downloaded, self.skipped, self.failed
        )
    }
}

/// Fetch every item, sequentially. Failed downloads leave no partial file
/// behind (the downloader removes the destination on failure).
pub fn fetch_batch(agent: &ureq::Agent, items: &[BatchItem]) -> BatchReport {
    let mut report = BatchReport::default();

    for item in items {
        // is_file, matching the summary's presence check: a directory
        // squatting on the path is not a usable artifact.
        if item.dest.is_file() {
            output::skip(&format!("{} already present", item.label));
            report.skipped += 1;
            continue;
        }

        match http::download(agent, &item.url, &item.dest) {
            Ok(bytes) => {
                output::detail(&format!("downloaded {} ({} bytes)", item.label, bytes));
                report.downloaded += 1;
            }
            Err(err) => {
                report_failure(&item.label, &err);
                report.failed += 1;
            }
        }
    }

    report
}

fn report_failure(label: &str, err: &DownloadError) {
    output::warning(&format!("{}: {}", label, err));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::http::agent;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn item(server_uri: &str, name: &str, dir: &std::path::Path) -> BatchItem {
        BatchItem {
            label: name.to_string(),
            url: format!("{}/{}", server_uri, name),
            dest: dir.join(name),
        }
    }

    #[tokio::test]
    async fn test_all_present_skips_without_network() {
        let server = MockServer::start().await;
        // Any request at all is a contract violation
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let temp = tempfile::tempdir().unwrap();
        std::fs::write(temp.path().join("a.bin"), "x").unwrap();
        std::fs::write(temp.path().join("b.bin"), "y").unwrap();

        let items = vec![
            item(&server.uri(), "a.bin", temp.path()),
            item(&server.uri(), "b.bin", temp.path()),
        ];

        let report = fetch_batch(&agent(), &items);
        assert_eq!(
            report,
            BatchReport {
                downloaded: 0,
                skipped: 2,
                failed: 0
            }
        );
        assert!(report.all_ok());
    }

    #[tokio::test]
    async fn test_mixed_batch_counts_and_cleanup() {
        // Entry 1 downloads, entry 2 already exists, entry 3 returns 404
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/one.traineddata"))
            .respond_with(ResponseTemplate::new(200).set_body_string("data"))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/three.traineddata"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let temp = tempfile::tempdir().unwrap();
        std::fs::write(temp.path().join("two.traineddata"), "old").unwrap();

        let items = vec![
            item(&server.uri(), "one.traineddata", temp.path()),
            item(&server.uri(), "two.traineddata", temp.path()),
            item(&server.uri(), "three.traineddata", temp.path()),
        ];

        let report = fetch_batch(&agent(), &items);
        assert_eq!(
            report,
            BatchReport {
                downloaded: 1,
                skipped: 1,
                failed: 1
            }
        );
        assert!(!report.all_ok());

        assert_eq!(
            std::fs::read_to_string(temp.path().join("one.traineddata")).unwrap(),
            "data"
        );
        // Pre-existing file untouched
        assert_eq!(
            std::fs::read_to_string(temp.path().join("two.traineddata")).unwrap(),
            "old"
        );
        // Failed entry leaves nothing behind
        assert!(!temp.path().join("three.traineddata").exists());
    }

    #[tokio::test]
    async fn test_failure_does_not_abort_later_items() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/bad.bin"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/good.bin"))
            .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
            .mount(&server)
            .await;

        let temp = tempfile::tempdir().unwrap();
        let items = vec![
            item(&server.uri(), "bad.bin", temp.path()),
            item(&server.uri(), "good.bin", temp.path()),
        ];

        let report = fetch_batch(&agent(), &items);
        assert_eq!(report.failed, 1);
        assert_eq!(report.downloaded, 1);
        assert!(temp.path().join("good.bin").exists());
    }

    #[tokio::test]
    async fn test_directory_at_destination_is_not_skipped() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/a.bin"))
            .respond_with(ResponseTemplate::new(200).set_body_string("data"))
            .mount(&server)
            .await;

        let temp = tempfile::tempdir().unwrap();
        std::fs::create_dir(temp.path().join("a.bin")).unwrap();

        let items = vec![item(&server.uri(), "a.bin", temp.path())];
        let report = fetch_batch(&agent(), &items);

        // The summary would count the directory as missing, so the batch
        // must not count it as skipped; the write attempt fails instead.
        assert_eq!(report.skipped, 0);
        assert_eq!(report.failed, 1);
    }

    #[test]
    fn test_report_summary_format() {
        let report = BatchReport {
            downloaded: 3,
            skipped: 2,
            failed: 1,
        };
        assert_eq!(report.summary(), "3 downloaded, 2 skipped, 1 failed");
    }
}
