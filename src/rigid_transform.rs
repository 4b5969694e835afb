//! # Euler-angle ⇄ rigid-transform codec
//!
//! Conversions between the **ZYZ Euler angle triplet** `(rot, tilt, psi)` used
//! by the STAR particle-metadata format and 3×3 / 4×4 matrices, following the
//! RELION/PySeg convention: the rotation applies `psi` about Z, then `tilt`
//! about Y, then `rot` about Z.
//!
//! ## Units & Conventions
//! -----------------
//! - **Angles:** degrees at every public boundary, converted to radians
//!   internally.
//! - **Canonical ranges:** `rot, psi ∈ (-180, 180]`, `tilt ∈ [0, 180)`. The
//!   decoder always returns angles in these ranges; any triplet outside them
//!   maps to the equivalent canonical one.
//! - **Transforms:** 4×4 homogeneous matrices, rotation in the upper-left 3×3
//!   block, translation in the last column.
//!
//! ## Gimbal lock
//! -----------------
//! When `|sin(tilt)|` falls below [`GIMBAL_EPS`](crate::constants::GIMBAL_EPS)
//! the `rot` and `psi` angles are indistinguishable and the decoder falls back
//! to `(0, 0, atan2(m10, m00))`. This is the documented degeneracy of the ZYZ
//! parametrization, not a recoverable condition.
use nalgebra::{Matrix3, Matrix4, Vector3};

use crate::constants::{Degree, GIMBAL_EPS};
use crate::startomo_errors::StartomoError;

/// Build the ZYZ rotation matrix for an Euler angle triplet.
///
/// Arguments
/// ---------------
/// * `rot`: first Euler angle, rotation about Z, in degrees.
/// * `tilt`: second Euler angle, rotation about Y, in degrees.
/// * `psi`: third Euler angle, rotation about Z, in degrees.
///
/// Return
/// ----------
/// * The 3×3 rotation matrix `R` in the RELION/PySeg convention.
///
/// Formula
/// -------
/// With `ca = cos(rot)`, `sa = sin(rot)`, `cb = cos(tilt)`, `sb = sin(tilt)`,
/// `cg = cos(psi)`, `sg = sin(psi)`:
///
/// ```text
/// | cg*cb*ca - sg*sa    cg*cb*sa + sg*ca   -cg*sb |
/// | -sg*cb*ca - cg*sa  -sg*cb*sa + cg*ca    sg*sb |
/// | sb*ca               sb*sa               cb    |
/// ```
///
/// # See also
/// * [`matrix_to_euler`] – the inverse mapping.
/// * [`build_transform`] – embeds this rotation into a 4×4 transform.
pub fn euler_to_matrix(rot: Degree, tilt: Degree, psi: Degree) -> Matrix3<f64> {
    let (sa, ca) = rot.to_radians().sin_cos();
    let (sb, cb) = tilt.to_radians().sin_cos();
    let (sg, cg) = psi.to_radians().sin_cos();

    let cc = cb * ca;
    let cs = cb * sa;
    let sc = sb * ca;
    let ss = sb * sa;

    Matrix3::new(
        cg * cc - sg * sa,
        cg * cs + sg * ca,
        -cg * sb,
        -sg * cc - cg * sa,
        -sg * cs + cg * ca,
        sg * sb,
        sc,
        ss,
        cb,
    )
}

/// Decode a ZYZ rotation matrix back into its Euler angle triplet.
///
/// Arguments
/// ---------------
/// * `m`: a rotation matrix produced by (or compatible with)
///   [`euler_to_matrix`].
///
/// Return
/// ----------
/// * `(rot, tilt, psi)` in degrees, with `tilt ∈ [0, 180)` and
///   `rot, psi ∈ (-180, 180]`.
///
/// Remarks
/// -------
/// * Away from gimbal lock the round trip
///   `matrix_to_euler(euler_to_matrix(rot, tilt, psi))` reproduces canonical
///   inputs to better than 1e-4 degrees.
/// * At gimbal lock (`|sin(tilt)| < GIMBAL_EPS`) only the sum `rot + psi` is
///   observable; the decoder deterministically returns
///   `(0, 0, atan2(m10, m00))`.
pub fn matrix_to_euler(m: &Matrix3<f64>) -> (Degree, Degree, Degree) {
    let sin_tilt = (m[(0, 2)] * m[(0, 2)] + m[(1, 2)] * m[(1, 2)]).sqrt();

    if sin_tilt < GIMBAL_EPS {
        // Known ZYZ degeneracy: rot and psi are indistinguishable.
        let psi = m[(1, 0)].atan2(m[(0, 0)]);
        return (0.0, 0.0, psi.to_degrees());
    }

    let tilt = sin_tilt.atan2(m[(2, 2)]);
    let rot = m[(2, 1)].atan2(m[(2, 0)]);
    let psi = m[(1, 2)].atan2(-m[(0, 2)]);

    (rot.to_degrees(), tilt.to_degrees(), psi.to_degrees())
}

/// Assemble the 4×4 homogeneous transform of a particle pose.
///
/// Arguments
/// ---------------
/// * `rot`, `tilt`, `psi`: ZYZ Euler angles in degrees.
/// * `shift`: translation vector in voxels.
/// * `invert`: when `true`, the shift is negated before being stored *and*
///   the assembled 4×4 matrix is inverted before being returned.
///
/// Return
/// ----------
/// * The homogeneous transform, or [`StartomoError::SingularTransform`] if
///   the matrix inversion fails.
///
/// Remarks
/// -------
/// * The `invert` path reproduces the convention expected by the downstream
///   pose-composition code: negate the shift first, then invert the whole
///   matrix. Both steps are intentional and must not be collapsed into one.
/// * Satisfies `build_transform(r, t, p, s, true)` ==
///   `inverse(build_transform(r, t, p, -s, false))` to floating-point
///   tolerance.
pub fn build_transform(
    rot: Degree,
    tilt: Degree,
    psi: Degree,
    shift: &Vector3<f64>,
    invert: bool,
) -> Result<Matrix4<f64>, StartomoError> {
    let rotation = euler_to_matrix(rot, tilt, psi);

    let mut m = Matrix4::identity();
    m.fixed_view_mut::<3, 3>(0, 0).copy_from(&rotation);

    let translation = if invert { -shift } else { *shift };
    m.fixed_view_mut::<3, 1>(0, 3).copy_from(&translation);

    if invert {
        m.try_inverse().ok_or(StartomoError::SingularTransform)
    } else {
        Ok(m)
    }
}

#[cfg(test)]
mod rigid_transform_test {
    use super::*;

    use approx::assert_relative_eq;

    #[test]
    fn test_euler_identity() {
        let m = euler_to_matrix(0.0, 0.0, 0.0);
        assert_eq!(m, Matrix3::identity());
    }

    #[test]
    fn test_euler_quarter_turn() {
        let m = euler_to_matrix(90.0, 0.0, 0.0);
        let expected = Matrix3::new(0.0, 1.0, 0.0, -1.0, 0.0, 0.0, 0.0, 0.0, 1.0);
        assert_relative_eq!(m, expected, epsilon = 1e-15);
    }

    #[test]
    fn test_rotation_is_orthonormal() {
        let m = euler_to_matrix(10.0, 20.0, 30.0);
        assert_relative_eq!(m * m.transpose(), Matrix3::identity(), epsilon = 1e-12);
        assert_relative_eq!(m.determinant(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_euler_round_trip() {
        for rot in [-150.0, -45.0, 0.0, 10.0, 120.0, 180.0] {
            for tilt in [5.0, 20.0, 90.0, 150.0, 175.0] {
                for psi in [-170.0, -30.0, 0.0, 30.0, 179.0] {
                    let m = euler_to_matrix(rot, tilt, psi);
                    let (r, t, p) = matrix_to_euler(&m);
                    assert_relative_eq!(r, rot, epsilon = 1e-9);
                    assert_relative_eq!(t, tilt, epsilon = 1e-9);
                    assert_relative_eq!(p, psi, epsilon = 1e-9);
                }
            }
        }
    }

    #[test]
    fn test_gimbal_lock_fallback() {
        // At tilt = 0 only rot + psi is observable. The documented fallback
        // folds everything into psi = atan2(m10, m00) = -(rot + psi).
        let m = euler_to_matrix(30.0, 0.0, 40.0);
        let (r, t, p) = matrix_to_euler(&m);
        assert_eq!(r, 0.0);
        assert_eq!(t, 0.0);
        assert_relative_eq!(p, -70.0, epsilon = 1e-9);
    }

    #[test]
    fn test_build_transform_direct() {
        let shift = Vector3::new(1.0, 2.0, 3.0);
        let m = build_transform(10.0, 20.0, 30.0, &shift, false).unwrap();

        let r = euler_to_matrix(10.0, 20.0, 30.0);
        assert_eq!(m.fixed_view::<3, 3>(0, 0).clone_owned(), r);
        assert_eq!(m.fixed_view::<3, 1>(0, 3).clone_owned(), shift);
        assert_eq!(m[(3, 0)], 0.0);
        assert_eq!(m[(3, 1)], 0.0);
        assert_eq!(m[(3, 2)], 0.0);
        assert_eq!(m[(3, 3)], 1.0);
    }

    #[test]
    fn test_build_transform_composition_law() {
        let shift = Vector3::new(1.5, -2.0, 4.25);
        let inverted = build_transform(10.0, 20.0, 30.0, &shift, true).unwrap();
        let direct = build_transform(10.0, 20.0, 30.0, &-shift, false).unwrap();
        let expected = direct.try_inverse().unwrap();
        assert_relative_eq!(inverted, expected, epsilon = 1e-9);
    }

    #[test]
    fn test_build_transform_invert_is_involutive_on_rotation() {
        // With zero shift the inverted transform is the transposed rotation.
        let zero = Vector3::zeros();
        let inv = build_transform(25.0, 70.0, -40.0, &zero, true).unwrap();
        let rot = euler_to_matrix(25.0, 70.0, -40.0);
        assert_relative_eq!(
            inv.fixed_view::<3, 3>(0, 0).clone_owned(),
            rot.transpose(),
            epsilon = 1e-12
        );
    }
}
