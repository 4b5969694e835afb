//! # Table splitter
//!
//! Partitions one STAR table file into several smaller ones so the external
//! toolkit can run many short jobs (typically one per vesicle, or fixed-size
//! batches) instead of a single long one. Each output file owns a unique,
//! index-derived name, so concurrent consumers never share a file.
use std::fs;

use camino::{Utf8Path, Utf8PathBuf};
use log::debug;

use crate::constants::{SPLIT_INDEX_WIDTH, STAR_EXT};
use crate::startomo_errors::StartomoError;

use super::StarTable;

/// Split a STAR table file into consecutive groups of `group_size` rows.
///
/// Arguments
/// ---------------
/// * `in_star`: path of the table to split.
/// * `out_dir`: directory receiving the sub-table files (must exist).
/// * `group_size`: rows per output file; the last file may hold fewer. A
///   value of 0 is treated as 1.
/// * `prefix`: output file name prefix.
/// * `first_index`: index of the first output file. Output names are
///   `"{prefix}{index:03}.star"`; passing an index above 1 lets successive
///   invocations continue an existing numbering.
///
/// Return
/// ----------
/// * The written file paths, in emission order.
///
/// Remarks
/// -------
/// * For an `N`-row table the function writes `ceil(N / group_size)` files
///   whose rows concatenate back to the input row order.
/// * **Single-row special case:** a one-row input is hard-linked (copied if
///   linking fails, e.g. across filesystems) verbatim to the single output
///   file, preserving the original file byte-for-byte.
/// * Deterministic: the same table and `group_size` always produce the same
///   file contents and ordering.
pub fn split_table(
    in_star: &Utf8Path,
    out_dir: &Utf8Path,
    group_size: usize,
    prefix: &str,
    first_index: usize,
) -> Result<Vec<Utf8PathBuf>, StartomoError> {
    let group_size = group_size.max(1);
    let table = StarTable::read(in_star)?;

    let width = SPLIT_INDEX_WIDTH;
    let out_path = |index: usize| out_dir.join(format!("{prefix}{index:0width$}.{STAR_EXT}"));

    if table.len() == 1 {
        let out = out_path(first_index);
        if fs::hard_link(in_star, &out).is_err() {
            fs::copy(in_star, &out)?;
        }
        debug!("linked single-row table {in_star} to {out}");
        return Ok(vec![out]);
    }

    let mut written = Vec::new();
    for (offset, chunk) in table.raw_rows().chunks(group_size).enumerate() {
        let out = out_path(first_index + offset);
        table.with_rows(chunk).write(&out)?;
        debug!("wrote {} rows to {out}", chunk.len());
        written.push(out);
    }

    Ok(written)
}
