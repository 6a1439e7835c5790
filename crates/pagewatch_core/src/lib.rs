//! Pagewatch core: pure change classification, diffing and report formatting.
mod diff;
mod outcome;
mod report;
mod snapshot;

pub use diff::{diff_lines, DiffHunk, HunkKind};
pub use outcome::{NewPage, Outcome, RunReport, UpdatedPage};
pub use report::{errors_message, new_pages_message, updated_pages_message, ReportStyle};
pub use snapshot::Snapshot;
