use watch_logging::{watch_debug, watch_error, watch_info};

use pagewatch_core::{diff_lines, Outcome};

use crate::fetch::{fetch_with_retry, PageFetcher};
use crate::store::BaselineStore;

/// Classifies a single URL's outcome for one run: fetch with retries,
/// compare against the stored baseline, persist the new baseline.
pub struct ChangeDetector<'a> {
    fetcher: &'a dyn PageFetcher,
    store: &'a BaselineStore,
    max_retries: u32,
}

impl<'a> ChangeDetector<'a> {
    pub fn new(fetcher: &'a dyn PageFetcher, store: &'a BaselineStore, max_retries: u32) -> Self {
        Self {
            fetcher,
            store,
            max_retries,
        }
    }

    /// Never escalates: every failure collapses into `Outcome::Error`
    /// so one bad URL cannot take down the run.
    pub async fn detect(&self, url: &str) -> Outcome {
        let snapshot = match fetch_with_retry(self.fetcher, url, self.max_retries).await {
            Ok(snapshot) => snapshot,
            Err(err) => {
                watch_error!("giving up on {url} after {} attempts: {err}", self.max_retries + 1);
                return Outcome::Error;
            }
        };

        let baseline = match self.store.load(url) {
            Ok(baseline) => baseline,
            Err(err) => {
                watch_error!("baseline read failed for {url}: {err}");
                return Outcome::Error;
            }
        };

        match baseline {
            None => {
                if let Err(err) = self.store.save(url, &snapshot.content) {
                    watch_error!("baseline write failed for {url}: {err}");
                    return Outcome::Error;
                }
                watch_info!("first observation of {url}");
                Outcome::New {
                    title: snapshot.title,
                }
            }
            Some(ref old) if *old == snapshot.content => {
                watch_debug!("{url} unchanged");
                Outcome::Unchanged
            }
            Some(old) => {
                let hunks = diff_lines(&old, &snapshot.content);
                if let Err(err) = self.store.save(url, &snapshot.content) {
                    watch_error!("baseline write failed for {url}: {err}");
                    return Outcome::Error;
                }
                if hunks.is_empty() {
                    // Content differs only below line granularity;
                    // refresh the baseline but report nothing.
                    watch_debug!("{url} changed without line-level differences");
                    return Outcome::Unchanged;
                }
                watch_info!("{url} updated ({} hunks)", hunks.len());
                Outcome::Updated {
                    title: snapshot.title,
                    hunks,
                }
            }
        }
    }
}
