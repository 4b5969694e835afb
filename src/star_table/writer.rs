//! STAR block emission.
//!
//! Writes a [`StarTable`] back in the convention the reader accepts: block
//! header, `loop_` marker, one `_label #k` line per column, then one
//! tab-separated line per row in declared column order. Round-tripping a
//! table through write/read preserves names, column order, and cell values
//! (whitespace is normalized to single tabs).
use std::fs::File;
use std::io::{BufWriter, Write};

use camino::Utf8Path;
use itertools::Itertools;

use crate::startomo_errors::StartomoError;

use super::StarTable;

pub(super) fn write_table(table: &StarTable, path: &Utf8Path) -> Result<(), StartomoError> {
    let file = File::create(path)?;
    let mut out = BufWriter::new(file);

    writeln!(out, "data_{}", table.name())?;
    writeln!(out)?;
    writeln!(out, "loop_")?;
    for (k, label) in table.column_names().iter().enumerate() {
        writeln!(out, "_{label} #{}", k + 1)?;
    }
    for row in table.rows() {
        writeln!(out, "{}", row.iter().join("\t"))?;
    }

    out.flush()?;
    Ok(())
}
