use std::fs;
use std::io;
use std::path::Path;

/// Reads the ordered URL list from a tabular text file.
///
/// Each line contributes its first tab- or comma-separated cell.
/// Blank lines and `#` comments are skipped. An unreadable file is
/// fatal to the run; no partial report is meaningful without it.
pub fn read_url_list(path: &Path) -> io::Result<Vec<String>> {
    let text = fs::read_to_string(path)?;
    Ok(parse_url_list(&text))
}

fn parse_url_list(raw: &str) -> Vec<String> {
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| {
            let cell = line.split(['\t', ',']).next().unwrap_or(line).trim();
            if cell.is_empty() {
                None
            } else {
                Some(cell.to_owned())
            }
        })
        .collect()
}
