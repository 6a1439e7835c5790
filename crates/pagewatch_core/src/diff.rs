use similar::{capture_diff_slices, Algorithm, DiffOp};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HunkKind {
    Added,
    Removed,
}

/// One contiguous run of lines that differs between the old and the
/// new content, in old-to-new order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffHunk {
    pub kind: HunkKind,
    pub text: String,
}

impl DiffHunk {
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.text.lines()
    }
}

/// Line-oriented LCS diff between two text snapshots.
///
/// Only added and removed runs are returned; unchanged lines are
/// filtered out. Identical inputs produce an empty sequence, and an
/// empty `old` yields all of `new` as a single added hunk. Line
/// terminators are not part of the comparison.
pub fn diff_lines(old: &str, new: &str) -> Vec<DiffHunk> {
    let old_lines: Vec<&str> = old.lines().collect();
    let new_lines: Vec<&str> = new.lines().collect();
    let ops = capture_diff_slices(Algorithm::Myers, &old_lines, &new_lines);

    let mut hunks = Vec::new();
    for op in ops {
        match op {
            DiffOp::Equal { .. } => {}
            DiffOp::Delete {
                old_index, old_len, ..
            } => {
                hunks.push(hunk(HunkKind::Removed, &old_lines[old_index..old_index + old_len]));
            }
            DiffOp::Insert {
                new_index, new_len, ..
            } => {
                hunks.push(hunk(HunkKind::Added, &new_lines[new_index..new_index + new_len]));
            }
            DiffOp::Replace {
                old_index,
                old_len,
                new_index,
                new_len,
            } => {
                hunks.push(hunk(HunkKind::Removed, &old_lines[old_index..old_index + old_len]));
                hunks.push(hunk(HunkKind::Added, &new_lines[new_index..new_index + new_len]));
            }
        }
    }
    hunks
}

fn hunk(kind: HunkKind, lines: &[&str]) -> DiffHunk {
    DiffHunk {
        kind,
        text: lines.join("\n"),
    }
}
