//! # Particle records: STAR rows as structured poses
//!
//! One [`ParticleRecord`] is the in-memory form of one STAR table row: a 3-D
//! position, a 4×4 rigid transform, and the file references and identifiers
//! attached to the particle. Records are ephemeral — they exist for the
//! duration of one conversion pass and are owned by the caller through a
//! [`RecordCollection`].
//!
//! The conversion itself is driven by a [`StarConverter`]: it holds the base
//! directory, the optional working directory for link materialization, the
//! column-name convention, and the invert flag, and maps rows through the
//! [`rigid_transform`](crate::rigid_transform) codec.
use std::collections::HashMap;

use camino::Utf8PathBuf;
use nalgebra::{Matrix4, Vector3};

mod converter;

pub use converter::{vesicle_id_from_name, ColumnMap, StarConverter};

/// One particle (or vesicle) extracted from a STAR table row.
///
/// Absent file references are `None` in memory; the literal
/// [`NOT_FOUND`](crate::constants::NOT_FOUND) marker exists only at the
/// file-format boundary.
#[derive(Debug, Clone, PartialEq)]
pub struct ParticleRecord {
    /// Parent tomogram / micrograph volume, resolved against the base
    /// directory.
    pub volume_path: Option<Utf8PathBuf>,
    /// The particle's own sub-volume file. When a working directory is
    /// configured this points at the materialized link, not the original.
    pub sub_volume_path: Option<Utf8PathBuf>,
    /// 3-D coordinate in the parent volume, in voxels.
    pub position: Vector3<f64>,
    /// Homogeneous rigid transform of the particle pose (orthonormal 3×3
    /// rotation block, translation in the last column).
    pub transform: Matrix4<f64>,
    /// Class / group label, when the table declares one.
    pub class_id: Option<i64>,
    /// Vesicle identifier derived from the sub-volume file name
    /// (`_tid_<N>` or `_id_<N>_split_<M>` suffix), when present.
    pub group_id: Option<String>,
    /// Extra per-particle file references keyed by their column label
    /// (e.g. the CTF / missing-wedge volume).
    pub aux_refs: HashMap<String, Utf8PathBuf>,
}

/// Ordered collection of records produced from one table.
pub type RecordCollection = Vec<ParticleRecord>;
