use crate::diff::DiffHunk;

/// Classification result for one URL in one run. Exactly one variant
/// applies per URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// First successful observation of this URL.
    New { title: String },
    /// Content differs from the stored baseline.
    Updated { title: String, hunks: Vec<DiffHunk> },
    /// Content matches the stored baseline byte for byte.
    Unchanged,
    /// Fetch or baseline write failed after the retry budget.
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdatedPage {
    pub url: String,
    pub title: String,
    pub hunks: Vec<DiffHunk>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPage {
    pub url: String,
    pub title: String,
}

/// Bucketed outcomes of one pipeline run.
///
/// Ephemeral: built once per run and handed to the notifier. The only
/// state that survives a run is the baseline store. `Unchanged`
/// outcomes are dropped here; they are never reported outward.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    pub updated: Vec<UpdatedPage>,
    pub new_pages: Vec<NewPage>,
    pub errors: Vec<String>,
}

impl RunReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Files one URL's outcome into the matching bucket.
    pub fn record(&mut self, url: String, outcome: Outcome) {
        match outcome {
            Outcome::New { title } => self.new_pages.push(NewPage { url, title }),
            Outcome::Updated { title, hunks } => {
                self.updated.push(UpdatedPage { url, title, hunks });
            }
            Outcome::Unchanged => {}
            Outcome::Error => self.errors.push(url),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.updated.is_empty() && self.new_pages.is_empty() && self.errors.is_empty()
    }
}
