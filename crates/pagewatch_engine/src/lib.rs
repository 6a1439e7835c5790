//! Pagewatch engine: fetching, baseline storage, change detection and
//! run aggregation.
mod detect;
mod fetch;
mod notify;
mod run;
mod store;
mod text;

pub use detect::ChangeDetector;
pub use fetch::{fetch_with_retry, FetchError, FetchSettings, HttpPageFetcher, PageFetcher};
pub use notify::{send_report, Notifier, NotifyError, WebhookNotifier};
pub use run::run_watch;
pub use store::{baseline_key, BaselineStore, StoreError};
pub use text::{decode_page, extract_snapshot, DecodeError};
