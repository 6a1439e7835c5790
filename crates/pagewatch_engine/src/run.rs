use futures_util::{stream, StreamExt};
use watch_logging::watch_info;

use pagewatch_core::RunReport;

use crate::detect::ChangeDetector;

/// Fans the detector out over all URLs and buckets the outcomes.
///
/// `concurrency` bounds the number of in-flight detections; `0` means
/// unbounded (every URL dispatched at once). Outcomes are merged into
/// the report sequentially after collection, so the buckets need no
/// locking; their internal order is unspecified.
pub async fn run_watch(
    detector: &ChangeDetector<'_>,
    urls: &[String],
    concurrency: usize,
) -> RunReport {
    let width = if concurrency == 0 {
        urls.len().max(1)
    } else {
        concurrency
    };
    watch_info!("starting run over {} urls (width {width})", urls.len());

    let outcomes: Vec<_> = stream::iter(urls)
        .map(|url| async move { (url.clone(), detector.detect(url).await) })
        .buffer_unordered(width)
        .collect()
        .await;

    let mut report = RunReport::new();
    for (url, outcome) in outcomes {
        report.record(url, outcome);
    }
    watch_info!(
        "run complete: {} updated, {} new, {} errors",
        report.updated.len(),
        report.new_pages.len(),
        report.errors.len()
    );
    report
}
