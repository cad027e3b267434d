use super::config::AlignmentConfig;
use super::error::AlignError;
use crate::core::models::element::heavy_atom_indices;
use crate::core::models::point_set::PointSet;
use crate::core::utils::geometry::{
    calculate_rmsd as unfitted_rmsd, center, cross_covariance, find_max_atom_deviation,
};
use nalgebra::{Matrix3, Rotation3, Vector3};
use std::borrow::Cow;
use tracing::{debug, warn};

/// Optimal rigid-body superposition of a mobile set onto a target set.
#[derive(Debug, Clone, PartialEq)]
pub struct Superposition {
    /// Proper rotation (det = +1) taking centered mobile coordinates onto the target.
    pub rotation: Rotation3<f64>,
    /// Translation applied after `rotation` to land in the target frame.
    pub translation: Vector3<f64>,
    /// RMSD between the superposed mobile set and the target.
    pub rmsd: f64,
    /// Largest single-atom displacement remaining after superposition.
    pub max_deviation: f64,
    /// Number of atom pairs that entered the fit.
    pub atoms_compared: usize,
}

impl Superposition {
    /// Moves `points` into the target frame.
    pub fn apply(&self, points: &PointSet) -> PointSet {
        points.transformed(&self.rotation, &self.translation)
    }
}

/// RMSD between `a` and `b` after optimal rigid-body superposition.
///
/// See [`superpose`] for the input requirements.
pub fn calculate_rmsd(
    a: &PointSet,
    b: &PointSet,
    config: &AlignmentConfig,
) -> Result<f64, AlignError> {
    superpose(a, b, config).map(|s| s.rmsd)
}

/// RMSD between two flat `[x, y, z, ...]` coordinate arrays.
///
/// `atomic_numbers`, when given, must hold one entry per atom and is only
/// consulted for heavy-atom filtering.
pub fn calculate_rmsd_flat(
    coords_a: &[f64],
    coords_b: &[f64],
    atomic_numbers: Option<&[u8]>,
    config: &AlignmentConfig,
) -> Result<f64, AlignError> {
    let a = PointSet::from_flat(coords_a, atomic_numbers)?;
    let b = PointSet::from_flat(coords_b, None)?;
    calculate_rmsd(&a, &b, config)
}

/// Finds the rotation and translation that best superpose `mobile` onto `target`.
///
/// Both sets are centered on their centroids, the cross-covariance `H = Aᵗ·B`
/// is decomposed as `H = V·S·Wᵗ`, and the rotation `V·diag(1, 1, d)·Wᵗ` with
/// `d = sign(det(V·Wᵗ))` is applied to the mobile set. The `d` term keeps the
/// result a proper rotation when the best orthogonal fit would be a reflection.
///
/// # Arguments
///
/// * `mobile` - The set that is moved; its atomic numbers drive heavy-atom
///   filtering when present, otherwise those of `target` are used.
/// * `target` - The set that stays fixed.
/// * `config` - Atom selection and SVD convergence settings.
///
/// # Errors
///
/// Returns [`AlignError::InvalidInput`] if either set is empty, the sets differ
/// in size, heavy-atom filtering is requested without atomic numbers, or the
/// filter removes every atom. Returns [`AlignError::NumericFailure`] if the SVD
/// does not converge within `config.svd.max_iterations`, or if coordinates are
/// large enough that the covariance or the RMSD overflows.
pub fn superpose(
    mobile: &PointSet,
    target: &PointSet,
    config: &AlignmentConfig,
) -> Result<Superposition, AlignError> {
    let (mobile, target) = select_atoms(mobile, target, config)?;
    let n = mobile.len();

    let (centered_mobile, mobile_centroid) = center(mobile.positions())
        .ok_or_else(|| AlignError::InvalidInput("point set is empty".to_string()))?;
    let (centered_target, target_centroid) = center(target.positions())
        .ok_or_else(|| AlignError::InvalidInput("point set is empty".to_string()))?;

    let h = cross_covariance(&centered_mobile, &centered_target);
    let u = optimal_rotation(&h, config)?;

    // `u` acts on row vectors (A·U); column vectors take its transpose.
    let rotation_matrix = u.transpose();
    let rotated: Vec<Vector3<f64>> = centered_mobile
        .iter()
        .map(|v| rotation_matrix * v)
        .collect();

    let rmsd = unfitted_rmsd(&rotated, &centered_target)
        .ok_or_else(|| AlignError::InvalidInput("point counts differ".to_string()))?;
    if !rmsd.is_finite() {
        return Err(AlignError::NumericFailure(format!(
            "superposition produced a non-finite RMSD ({})",
            rmsd
        )));
    }
    let max_deviation = find_max_atom_deviation(&rotated, &centered_target)
        .map_or(0.0, |(dist, _)| dist);
    let translation = target_centroid.coords - rotation_matrix * mobile_centroid.coords;

    debug!(atoms = n, rmsd, "Superposition complete.");

    Ok(Superposition {
        rotation: Rotation3::from_matrix_unchecked(rotation_matrix),
        translation,
        rmsd,
        max_deviation,
        atoms_compared: n,
    })
}

fn select_atoms<'a>(
    a: &'a PointSet,
    b: &'a PointSet,
    config: &AlignmentConfig,
) -> Result<(Cow<'a, PointSet>, Cow<'a, PointSet>), AlignError> {
    if a.is_empty() || b.is_empty() {
        return Err(AlignError::InvalidInput(format!(
            "point sets must be non-empty (got {} and {} atoms)",
            a.len(),
            b.len()
        )));
    }
    if a.len() != b.len() {
        return Err(AlignError::InvalidInput(format!(
            "point counts differ: {} vs {}",
            a.len(),
            b.len()
        )));
    }
    if !config.heavy_atoms_only {
        return Ok((Cow::Borrowed(a), Cow::Borrowed(b)));
    }

    let numbers = match (a.atomic_numbers(), b.atomic_numbers()) {
        (Some(first), Some(second)) => {
            if first != second {
                warn!("Atomic numbers of the two structures differ; filtering with the first.");
            }
            first
        }
        (Some(numbers), None) | (None, Some(numbers)) => numbers,
        (None, None) => {
            return Err(AlignError::InvalidInput(
                "heavy-atom filtering requires atomic numbers".to_string(),
            ));
        }
    };
    if numbers.len() != a.len() {
        return Err(AlignError::InvalidInput(format!(
            "expected {} atomic numbers, found {}",
            a.len(),
            numbers.len()
        )));
    }

    let indices = heavy_atom_indices(numbers);
    if indices.is_empty() {
        return Err(AlignError::InvalidInput(
            "heavy-atom filtering removed every atom".to_string(),
        ));
    }
    debug!(
        kept = indices.len(),
        total = a.len(),
        "Filtered hydrogens before alignment."
    );
    Ok((Cow::Owned(a.select(&indices)), Cow::Owned(b.select(&indices))))
}

/// Kabsch rotation `U = V·diag(1, 1, d)·Wᵗ` for a cross-covariance `H = V·S·Wᵗ`.
fn optimal_rotation(
    h: &Matrix3<f64>,
    config: &AlignmentConfig,
) -> Result<Matrix3<f64>, AlignError> {
    if !is_finite(h) {
        return Err(AlignError::NumericFailure(
            "cross-covariance matrix is not finite".to_string(),
        ));
    }
    let svd = (*h)
        .try_svd(true, true, config.svd.epsilon, config.svd.max_iterations)
        .ok_or_else(|| {
            AlignError::NumericFailure(format!(
                "SVD of the cross-covariance matrix did not converge within {} iterations",
                config.svd.max_iterations
            ))
        })?;
    let (v, w_t) = match (svd.u, svd.v_t) {
        (Some(v), Some(w_t)) => (v, w_t),
        _ => {
            return Err(AlignError::NumericFailure(
                "SVD did not produce singular vectors".to_string(),
            ));
        }
    };

    // nalgebra hands back NaN factors rather than `None` for some degenerate inputs.
    if !svd.singular_values.iter().all(|x| x.is_finite()) || !is_finite(&v) || !is_finite(&w_t) {
        return Err(AlignError::NumericFailure(
            "SVD produced non-finite factors".to_string(),
        ));
    }

    let d = if (v * w_t).determinant() < 0.0 { -1.0 } else { 1.0 };
    let correction = Matrix3::from_diagonal(&Vector3::new(1.0, 1.0, d));

    Ok(v * correction * w_t)
}

fn is_finite(m: &Matrix3<f64>) -> bool {
    m.iter().all(|x| x.is_finite())
}
