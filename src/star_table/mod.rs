//! # STAR tables: reading, writing, and splitting
//!
//! In-memory representation of a **STAR-like table**: an ordered list of named
//! columns plus the data rows of a single `loop_` block. The central type is
//! [`StarTable`]; the submodules provide file-level ingestion and emission.
//!
//! Modules
//! -----------------
//! * `reader` *(crate-private)* – parses a RELION-3.0-style STAR block into a
//!   [`StarTable`] (exposed as [`StarTable::read`]).
//! * `writer` *(crate-private)* – emits the table back in the same convention
//!   (exposed as [`StarTable::write`]).
//! * [`splitter`] – partitions a table file into numbered sub-table files so
//!   the external toolkit can run several smaller jobs instead of one.
//!
//! Data Model
//! -----------------
//! * **Columns:** `Vec<String>` in declared order; the order is preserved on
//!   write so a read/write cycle is loss-less modulo whitespace.
//! * **Rows:** `Vec<Vec<String>>`, every row exactly as long as the column
//!   list. Values stay strings; numeric interpretation happens lazily through
//!   [`RowView`].
//!
//! Error Handling
//! -----------------
//! Structural problems (missing `loop_` marker, ragged rows) are fatal and
//! reported as [`StartomoError`]. *Missing columns* are not errors at this
//! layer: [`StarTable::missing_columns`] reports them and the record
//! converter degrades to documented defaults.
use camino::Utf8Path;

use crate::startomo_errors::StartomoError;

mod reader;
mod writer;

pub mod splitter;

/// A STAR-like table: one `data_` block with named columns and string rows.
#[derive(Debug, Clone, PartialEq)]
pub struct StarTable {
    /// Name of the `data_` block (may be empty).
    name: String,
    /// Column labels, in declared order, without the leading underscore.
    columns: Vec<String>,
    /// Row-major cell values; every row has `columns.len()` entries.
    rows: Vec<Vec<String>>,
}

impl StarTable {
    /// Create an empty table with the given block name and column labels.
    pub fn new(name: &str, columns: Vec<String>) -> Self {
        Self {
            name: name.to_string(),
            columns,
            rows: Vec::new(),
        }
    }

    /// Block name of the table (`data_<name>` in the file).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Column labels in declared order.
    pub fn column_names(&self) -> &[String] {
        &self.columns
    }

    /// Number of data rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// `true` if the table holds no data rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Append one row of values, in declared column order.
    ///
    /// Fails with [`StartomoError::RowShapeMismatch`] if the value count does
    /// not match the column count.
    pub fn add_row(&mut self, values: Vec<String>) -> Result<(), StartomoError> {
        if values.len() != self.columns.len() {
            return Err(StartomoError::RowShapeMismatch {
                expected: self.columns.len(),
                found: values.len(),
            });
        }
        self.rows.push(values);
        Ok(())
    }

    /// Drop all data rows, keeping the column declaration.
    pub fn clear_rows(&mut self) {
        self.rows.clear();
    }

    /// Index of a column label, if declared.
    pub fn column_index(&self, label: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == label)
    }

    /// `true` if every label of `required` is declared in this table.
    pub fn has_all_columns(&self, required: &[&str]) -> bool {
        required.iter().all(|label| self.column_index(label).is_some())
    }

    /// The subset of `required` labels that this table does *not* declare,
    /// in the order of `required`.
    pub fn missing_columns(&self, required: &[&str]) -> Vec<String> {
        required
            .iter()
            .filter(|label| self.column_index(label).is_none())
            .map(|label| label.to_string())
            .collect()
    }

    /// Cell value at `(row, label)`, or `None` if the column is not declared.
    ///
    /// Panics if `row` is out of range; use [`StarTable::row_view`] for a
    /// checked accessor.
    pub fn get(&self, row: usize, label: &str) -> Option<&str> {
        let col = self.column_index(label)?;
        Some(self.rows[row][col].as_str())
    }

    /// Checked view over one row, used for typed field extraction.
    pub fn row_view(&self, index: usize) -> Result<RowView<'_>, StartomoError> {
        if index >= self.rows.len() {
            return Err(StartomoError::RowOutOfRange(index));
        }
        Ok(RowView { table: self, index })
    }

    /// Iterate over the raw row values.
    pub fn rows(&self) -> impl Iterator<Item = &[String]> {
        self.rows.iter().map(|r| r.as_slice())
    }

    /// Shallow copy of the column declaration with a row subset, used by the
    /// splitter.
    pub(crate) fn with_rows(&self, rows: &[Vec<String>]) -> Self {
        Self {
            name: self.name.clone(),
            columns: self.columns.clone(),
            rows: rows.to_vec(),
        }
    }

    pub(crate) fn raw_rows(&self) -> &[Vec<String>] {
        &self.rows
    }
}

/// Read-only view over one table row with typed field accessors.
///
/// Absent columns are reported as `None` so callers can substitute their
/// documented defaults; a *present but unparsable* numeric cell is corruption
/// and surfaces as [`StartomoError::InvalidNumericField`].
#[derive(Debug, Clone, Copy)]
pub struct RowView<'a> {
    table: &'a StarTable,
    index: usize,
}

impl RowView<'_> {
    /// Raw cell value under `label`, or `None` if the column is absent.
    pub fn get(&self, label: &str) -> Option<&str> {
        self.table.get(self.index, label)
    }

    /// Cell under `label` parsed as `f64`; `None` if the column is absent.
    pub fn get_f64(&self, label: &str) -> Result<Option<f64>, StartomoError> {
        self.get(label)
            .map(|value| {
                value
                    .parse::<f64>()
                    .map_err(|_| StartomoError::InvalidNumericField {
                        column: label.to_string(),
                        value: value.to_string(),
                    })
            })
            .transpose()
    }

    /// Cell under `label` parsed as `i64`; `None` if the column is absent.
    ///
    /// Accepts a floating-point representation of an integral value
    /// (`"1.000000"`), as some producers emit class numbers that way.
    pub fn get_i64(&self, label: &str) -> Result<Option<i64>, StartomoError> {
        self.get(label)
            .map(|value| {
                value
                    .parse::<i64>()
                    .or_else(|_| {
                        value
                            .parse::<f64>()
                            .map_err(|_| ())
                            .and_then(|f| if f.fract() == 0.0 { Ok(f as i64) } else { Err(()) })
                    })
                    .map_err(|_| StartomoError::InvalidNumericField {
                        column: label.to_string(),
                        value: value.to_string(),
                    })
            })
            .transpose()
    }
}

impl StarTable {
    /// Parse a STAR table from a file.
    ///
    /// See the crate-private `reader` module for the accepted grammar.
    pub fn read(path: &Utf8Path) -> Result<Self, StartomoError> {
        reader::read_table(path)
    }

    /// Write the table to a file in the same structural convention the
    /// reader accepts, preserving column order.
    pub fn write(&self, path: &Utf8Path) -> Result<(), StartomoError> {
        writer::write_table(self, path)
    }
}
