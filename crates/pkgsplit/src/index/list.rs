use crate::classify::normalize_path;
use crate::error::Result;
use std::io::BufRead;

/// Reads newline separated install paths, skipping blank lines and `#` comments
pub fn read_path_list<R: BufRead>(reader: R) -> Result<Vec<String>> {
    let mut paths = Vec::new();
    for line in reader.lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        paths.push(normalize_path(line));
    }
    Ok(paths)
}
