//! Row-to-record conversion.
//!
//! ## Overview
//! -----------------
//! [`StarConverter`] turns STAR table rows into [`ParticleRecord`]s:
//! - every semantic field (paths, coordinates, shifts, angles, class) is
//!   resolved through a caller-supplied [`ColumnMap`], since producers name
//!   these columns differently;
//! - absent numeric columns default to `0`, absent path columns to `None`
//!   (the `not_found` marker at the file boundary);
//! - relative paths are resolved against the converter's base directory;
//! - the pose transform is assembled by
//!   [`build_transform`](crate::rigid_transform::build_transform) with the
//!   converter's `invert` flag.
//!
//! ## Link materialization
//! -----------------
//! When a working directory is configured, a sub-volume living outside it is
//! exposed *inside* it through a link under a sanitized, collision-free name
//! (`/` becomes `_`, `..` is removed), and the record's `sub_volume_path` is
//! rewritten to the link. This gives every particle a filesystem-safe name
//! without duplicating large volumes on disk. I/O failures propagate; no
//! retries happen at this layer.
use std::collections::HashMap;
use std::sync::LazyLock;

use camino::{Utf8Path, Utf8PathBuf};
use itertools::Itertools;
use log::warn;
use nalgebra::Vector3;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::constants::{
    ANGLE_PSI, ANGLE_ROT, ANGLE_TILT, CLASS_NUMBER, COORD_X, COORD_Y, COORD_Z, CTF_IMAGE,
    IMAGE_NAME, MICROGRAPH_NAME, NOT_FOUND, ORIGIN_X, ORIGIN_Y, ORIGIN_Z,
};
use crate::rigid_transform::build_transform;
use crate::star_table::{RowView, StarTable};
use crate::startomo_errors::StartomoError;

use super::{ParticleRecord, RecordCollection};

static TID_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"_tid_(.+)$").unwrap());
static ID_SPLIT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"_id_(.+?)_split_").unwrap());

/// Column-name convention of a STAR producer.
///
/// Maps each semantic field the converter needs to the column label carrying
/// it. [`ColumnMap::default`] is the RELION 3.0 tomography convention; other
/// conventions can be loaded from configuration through serde.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnMap {
    pub micrograph: String,
    pub image: String,
    pub coord_x: String,
    pub coord_y: String,
    pub coord_z: String,
    pub ctf_image: String,
    pub angle_rot: String,
    pub angle_tilt: String,
    pub angle_psi: String,
    pub origin_x: String,
    pub origin_y: String,
    pub origin_z: String,
    pub class_number: String,
}

impl Default for ColumnMap {
    fn default() -> Self {
        Self {
            micrograph: MICROGRAPH_NAME.to_string(),
            image: IMAGE_NAME.to_string(),
            coord_x: COORD_X.to_string(),
            coord_y: COORD_Y.to_string(),
            coord_z: COORD_Z.to_string(),
            ctf_image: CTF_IMAGE.to_string(),
            angle_rot: ANGLE_ROT.to_string(),
            angle_tilt: ANGLE_TILT.to_string(),
            angle_psi: ANGLE_PSI.to_string(),
            origin_x: ORIGIN_X.to_string(),
            origin_y: ORIGIN_Y.to_string(),
            origin_z: ORIGIN_Z.to_string(),
            class_number: CLASS_NUMBER.to_string(),
        }
    }
}

impl ColumnMap {
    /// All mapped column labels, in a stable order, for missing-column scans.
    pub fn labels(&self) -> Vec<&str> {
        vec![
            &self.micrograph,
            &self.coord_x,
            &self.coord_y,
            &self.coord_z,
            &self.image,
            &self.ctf_image,
            &self.angle_rot,
            &self.angle_tilt,
            &self.angle_psi,
            &self.origin_x,
            &self.origin_y,
            &self.origin_z,
            &self.class_number,
        ]
    }
}

/// Converter between STAR table rows and [`ParticleRecord`]s.
///
/// The struct is the single configuration point of a conversion pass: base
/// directory for relative paths, optional working directory for sub-volume
/// link materialization, column-name convention, and the transform `invert`
/// flag.
///
/// ```rust,no_run
/// use camino::{Utf8Path, Utf8PathBuf};
/// use startomo::records::StarConverter;
/// use startomo::star_table::StarTable;
///
/// # fn run() -> Result<(), startomo::startomo_errors::StartomoError> {
/// let table = StarTable::read(Utf8Path::new("particles.star"))?;
/// let converter = StarConverter::new(Utf8PathBuf::from("/data/run1"), true);
/// let (records, warning) = converter.records_from_table(&table)?;
/// if let Some(msg) = warning {
///     eprintln!("{msg}");
/// }
/// # Ok(()) }
/// ```
#[derive(Debug, Clone)]
pub struct StarConverter {
    base_dir: Utf8PathBuf,
    work_dir: Option<Utf8PathBuf>,
    columns: ColumnMap,
    invert: bool,
}

impl StarConverter {
    /// Create a converter resolving relative paths against `base_dir`
    /// (usually the directory holding the STAR file), with the default
    /// RELION column convention and no link materialization.
    pub fn new(base_dir: Utf8PathBuf, invert: bool) -> Self {
        Self {
            base_dir,
            work_dir: None,
            columns: ColumnMap::default(),
            invert,
        }
    }

    /// Materialize sub-volume links inside `work_dir` (see module docs).
    pub fn with_work_dir(mut self, work_dir: Utf8PathBuf) -> Self {
        self.work_dir = Some(work_dir);
        self
    }

    /// Use a non-default column-name convention.
    pub fn with_columns(mut self, columns: ColumnMap) -> Self {
        self.columns = columns;
        self
    }

    /// Convert every row of `table`.
    ///
    /// Return
    /// ----------
    /// * The records in row order, plus an optional warning naming every
    ///   mapped column the table does not declare. Missing columns are
    ///   non-fatal: the affected numeric fields default to 0 and path fields
    ///   to `None`. The warning is also emitted through the `log` facade.
    pub fn records_from_table(
        &self,
        table: &StarTable,
    ) -> Result<(RecordCollection, Option<String>), StartomoError> {
        let missing = table.missing_columns(&self.columns.labels());
        let warning = if missing.is_empty() {
            None
        } else {
            let listed = missing.iter().map(|c| format!("*{c}*")).join("  ");
            let msg = format!(
                "Columns {listed}\nwere not found in the star file provided.\n\
                 The corresponding numerical values will be considered as 0."
            );
            warn!("{}", msg.replace('\n', " "));
            Some(msg)
        };

        let mut records = Vec::with_capacity(table.len());
        for index in 0..table.len() {
            records.push(self.record_from_row(table, index)?);
        }
        Ok((records, warning))
    }

    /// Convert one table row into a [`ParticleRecord`].
    ///
    /// Errors
    /// ----------
    /// * [`StartomoError::RowOutOfRange`] for a bad index.
    /// * [`StartomoError::InvalidNumericField`] when a *present* numeric cell
    ///   does not parse (absent cells silently default).
    /// * I/O errors from link materialization.
    pub fn record_from_row(
        &self,
        table: &StarTable,
        index: usize,
    ) -> Result<ParticleRecord, StartomoError> {
        let row = table.row_view(index)?;
        let cols = &self.columns;

        let position = Vector3::new(
            row.get_f64(&cols.coord_x)?.unwrap_or(0.0),
            row.get_f64(&cols.coord_y)?.unwrap_or(0.0),
            row.get_f64(&cols.coord_z)?.unwrap_or(0.0),
        );

        let shift = Vector3::new(
            row.get_f64(&cols.origin_x)?.unwrap_or(0.0),
            row.get_f64(&cols.origin_y)?.unwrap_or(0.0),
            row.get_f64(&cols.origin_z)?.unwrap_or(0.0),
        );
        let rot = row.get_f64(&cols.angle_rot)?.unwrap_or(0.0);
        let tilt = row.get_f64(&cols.angle_tilt)?.unwrap_or(0.0);
        let psi = row.get_f64(&cols.angle_psi)?.unwrap_or(0.0);
        let transform = build_transform(rot, tilt, psi, &shift, self.invert)?;

        let volume_path = self.path_field(&row, &cols.micrograph);

        let mut aux_refs = HashMap::new();
        if let Some(ctf) = self.path_field(&row, &cols.ctf_image) {
            aux_refs.insert(cols.ctf_image.clone(), ctf);
        }

        let raw_image = row
            .get(&cols.image)
            .filter(|value| *value != NOT_FOUND)
            .map(str::to_string);
        let group_id = raw_image
            .as_deref()
            .and_then(vesicle_id_from_name);
        let sub_volume_path = match raw_image {
            Some(raw) => Some(self.materialize(&raw)?),
            None => None,
        };

        Ok(ParticleRecord {
            volume_path,
            sub_volume_path,
            position,
            transform,
            class_id: row.get_i64(&cols.class_number)?,
            group_id,
            aux_refs,
        })
    }

    /// Path cell under `label`, `None` when absent or marked `not_found`,
    /// resolved against the base directory otherwise.
    fn path_field(&self, row: &RowView<'_>, label: &str) -> Option<Utf8PathBuf> {
        row.get(label)
            .filter(|value| *value != NOT_FOUND)
            .map(|value| self.resolve(value))
    }

    fn resolve(&self, raw: &str) -> Utf8PathBuf {
        let path = Utf8Path::new(raw);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        }
    }

    /// Resolve the sub-volume path and, when a working directory is
    /// configured and the target lives outside it, expose the target through
    /// a link under a sanitized unique name and return the link path.
    fn materialize(&self, raw: &str) -> Result<Utf8PathBuf, StartomoError> {
        let resolved = self.resolve(raw);

        let Some(work_dir) = &self.work_dir else {
            return Ok(resolved);
        };
        if resolved.starts_with(work_dir) {
            return Ok(resolved);
        }

        let unique = raw.replace('/', "_").replace("..", "");
        let link = work_dir.join(unique);
        make_link(&resolved, &link)?;
        Ok(link)
    }
}

#[cfg(unix)]
fn make_link(target: &Utf8Path, link: &Utf8Path) -> Result<(), StartomoError> {
    std::os::unix::fs::symlink(target, link)?;
    Ok(())
}

#[cfg(not(unix))]
fn make_link(target: &Utf8Path, link: &Utf8Path) -> Result<(), StartomoError> {
    std::fs::hard_link(target, link)?;
    Ok(())
}

/// Extract the vesicle identifier embedded in a sub-volume file name.
///
/// The upstream segmentation tool suffixes sub-volume names with the index of
/// the vesicle the particle was extracted from, in one of two shapes:
///
/// * `<base>_tid_<N>.<ext>` — returns `<N>`
///   (e.g. `tomo_7_aliSIRT_EED_tid_0.mrc` → `"0"`);
/// * `<base>_id_<N>_split_<M>.<ext>` — returns `<N>`
///   (the sliced-vesicle variant, e.g. `..._EED_id_2_split_2.mrc` → `"2"`).
///
/// Returns `None` when neither suffix is present.
pub fn vesicle_id_from_name(name: &str) -> Option<String> {
    let stem = Utf8Path::new(name).file_stem()?;
    if let Some(caps) = ID_SPLIT_RE.captures(stem) {
        return Some(caps[1].to_string());
    }
    TID_RE.captures(stem).map(|caps| caps[1].to_string())
}
