//! # Constants and type definitions for Startomo
//!
//! This module centralizes the **column labels**, **file-format markers**, and
//! **common type definitions** used throughout the `startomo` library.
//!
//! ## Overview
//!
//! - RELION 3.0 tomography STAR column labels
//! - The `not_found` path marker used at the file-format boundary
//! - Numerical thresholds for the angle codec
//! - Type aliases shared across the crate
//!
//! The labels listed here are only the *default* column-name convention: the
//! record converter resolves every semantic field through a configurable
//! [`ColumnMap`](crate::records::ColumnMap), so producers using different
//! naming schemes can still be ingested.

// -------------------------------------------------------------------------------------------------
// RELION 3.0 tomography column labels
// -------------------------------------------------------------------------------------------------

/// Path to the parent tomogram / micrograph volume.
pub const MICROGRAPH_NAME: &str = "rlnMicrographName";

/// Path to the particle sub-volume file.
pub const IMAGE_NAME: &str = "rlnImageName";

/// Particle X coordinate in the parent volume, in voxels.
pub const COORD_X: &str = "rlnCoordinateX";
/// Particle Y coordinate in the parent volume, in voxels.
pub const COORD_Y: &str = "rlnCoordinateY";
/// Particle Z coordinate in the parent volume, in voxels.
pub const COORD_Z: &str = "rlnCoordinateZ";

/// Path to the per-particle CTF / missing-wedge volume.
pub const CTF_IMAGE: &str = "rlnCtfImage";

/// Nominal magnification of the acquisition.
pub const MAGNIFICATION: &str = "rlnMagnification";

/// Detector pixel size, in micrometers.
pub const DETECTOR_PIXEL_SIZE: &str = "rlnDetectorPixelSize";

/// First ZYZ Euler angle (rot), in degrees.
pub const ANGLE_ROT: &str = "rlnAngleRot";
/// Second ZYZ Euler angle (tilt), in degrees.
pub const ANGLE_TILT: &str = "rlnAngleTilt";
/// Third ZYZ Euler angle (psi), in degrees.
pub const ANGLE_PSI: &str = "rlnAnglePsi";

/// X component of the refinement origin shift, in voxels.
pub const ORIGIN_X: &str = "rlnOriginX";
/// Y component of the refinement origin shift, in voxels.
pub const ORIGIN_Y: &str = "rlnOriginY";
/// Z component of the refinement origin shift, in voxels.
pub const ORIGIN_Z: &str = "rlnOriginZ";

/// Class / group assignment of the particle.
pub const CLASS_NUMBER: &str = "rlnClassNumber";

/// Full RELION 3.0 tomography label set, in canonical output order.
pub const RELION_TOMO_LABELS: [&str; 14] = [
    MICROGRAPH_NAME,
    COORD_X,
    COORD_Y,
    COORD_Z,
    IMAGE_NAME,
    CTF_IMAGE,
    MAGNIFICATION,
    DETECTOR_PIXEL_SIZE,
    ANGLE_ROT,
    ANGLE_TILT,
    ANGLE_PSI,
    ORIGIN_X,
    ORIGIN_Y,
    ORIGIN_Z,
];

// -------------------------------------------------------------------------------------------------
// File-format markers and numerical thresholds
// -------------------------------------------------------------------------------------------------

/// Sentinel written in a path column when no file reference exists.
///
/// In-memory the absence of a reference is an `Option::None`; this literal
/// only appears at the STAR-file boundary, for compatibility with the
/// producers and consumers of the format.
pub const NOT_FOUND: &str = "not_found";

/// Gimbal-lock threshold on `sin(tilt)` for the angle decoder.
pub const GIMBAL_EPS: f64 = 1e-4;

/// Default zero-padded width of the split-file index (`prefix001.star`).
pub const SPLIT_INDEX_WIDTH: usize = 3;

/// STAR split-file extension.
pub const STAR_EXT: &str = "star";

// -------------------------------------------------------------------------------------------------
// Type aliases
// -------------------------------------------------------------------------------------------------

/// An angle in degrees.
pub type Degree = f64;

/// An angle in radians.
pub type Radian = f64;
