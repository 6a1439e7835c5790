/// The observable text state of a page at one point in time.
///
/// `content` is whitespace-normalized visible text, not markup. The
/// title is carried for reporting only; it is never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub content: String,
    pub title: String,
}

impl Snapshot {
    pub fn new(content: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            title: title.into(),
        }
    }
}
