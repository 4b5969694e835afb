//! RELION-3.0-style STAR block parser.
//!
//! Accepted grammar, line-oriented:
//!
//! ```text
//! data_<name>            (optional block header)
//! loop_                  (mandatory marker)
//! _<label> [#k]          (one per column)
//! v1 v2 ... vN           (one data row per line, whitespace-separated)
//! ```
//!
//! Blank lines and `#` comment lines are skipped everywhere. Parsing is
//! fail-fast: a malformed table cannot be safely partially interpreted, so
//! the first structural inconsistency aborts with a [`StartomoError`].
use std::fs;

use camino::Utf8Path;

use crate::startomo_errors::StartomoError;

use super::StarTable;

pub(super) fn read_table(path: &Utf8Path) -> Result<StarTable, StartomoError> {
    let content = fs::read_to_string(path)?;
    parse_table(&content, path.as_str())
}

/// Parse a STAR block from in-memory text. `source` names the origin of the
/// text in error messages (usually the file path).
pub(crate) fn parse_table(content: &str, source: &str) -> Result<StarTable, StartomoError> {
    let mut name = String::new();
    let mut columns: Vec<String> = Vec::new();
    let mut rows: Vec<Vec<String>> = Vec::new();

    let mut seen_loop = false;
    let mut seen_rows = false;

    for (line_idx, raw) in content.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if !seen_loop {
            if let Some(block) = line.strip_prefix("data_") {
                name = block.to_string();
            } else if line == "loop_" {
                seen_loop = true;
            } else {
                return Err(StartomoError::MissingLoopMarker(source.to_string()));
            }
            continue;
        }

        if !seen_rows && line.starts_with('_') {
            // `_rlnLabel #k`: the positional index is redundant, drop it.
            let label = line.split_whitespace().next().unwrap_or(line);
            columns.push(label.trim_start_matches('_').to_string());
            continue;
        }

        if columns.is_empty() {
            return Err(StartomoError::EmptyHeader(source.to_string()));
        }

        let values: Vec<String> = line.split_whitespace().map(str::to_string).collect();
        if values.len() != columns.len() {
            return Err(StartomoError::ColumnCountMismatch {
                line: line_idx + 1,
                expected: columns.len(),
                found: values.len(),
            });
        }
        rows.push(values);
        seen_rows = true;
    }

    if !seen_loop {
        return Err(StartomoError::MissingLoopMarker(source.to_string()));
    }
    if columns.is_empty() {
        return Err(StartomoError::EmptyHeader(source.to_string()));
    }

    Ok(StarTable {
        name,
        columns,
        rows,
    })
}
