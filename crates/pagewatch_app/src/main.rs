mod config;
mod source;

use std::path::{Path, PathBuf};

use anyhow::Context;
use watch_logging::{watch_error, watch_info, LogDestination};

use pagewatch_core::{
    errors_message, new_pages_message, updated_pages_message, ReportStyle, RunReport,
};
use pagewatch_engine::{
    run_watch, send_report, BaselineStore, ChangeDetector, HttpPageFetcher, WebhookNotifier,
};

use crate::config::WatchConfig;

fn main() -> anyhow::Result<()> {
    watch_logging::init(LogDestination::Both(Path::new("./pagewatch.log")));

    let config_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("pagewatch.ron"));
    let config = WatchConfig::load(&config_path)?;

    // Pipeline setup failures abort the run before any fetch; per-URL
    // failures never reach this level.
    let urls = source::read_url_list(&config.urls_file)
        .with_context(|| format!("cannot read url list {:?}", config.urls_file))?;
    let store = BaselineStore::open(&config.baseline_dir)
        .with_context(|| format!("cannot open baseline dir {:?}", config.baseline_dir))?;

    let fetcher = HttpPageFetcher::new(config.fetch_settings());
    let detector = ChangeDetector::new(&fetcher, &store, config.max_retries);

    let runtime = tokio::runtime::Runtime::new().context("tokio runtime")?;
    runtime.block_on(async {
        let report = run_watch(&detector, &urls, config.concurrency).await;
        deliver(&report, &config).await
    })
}

async fn deliver(report: &RunReport, config: &WatchConfig) -> anyhow::Result<()> {
    if report.is_empty() {
        watch_info!("nothing to report");
        return Ok(());
    }

    let style = ReportStyle {
        max_line_len: config.max_diff_line_len,
    };

    match config.webhook_url.as_deref() {
        Some(endpoint) => {
            let notifier = WebhookNotifier::new(endpoint).context("webhook client")?;
            send_report(&notifier, report, &style).await;
        }
        None => {
            watch_error!("no webhook configured, logging report instead");
            let bodies = [
                updated_pages_message(&report.updated, &style),
                new_pages_message(&report.new_pages),
                errors_message(&report.errors),
            ];
            for body in bodies.into_iter().flatten() {
                watch_info!("{body}");
            }
        }
    }
    Ok(())
}
