use nalgebra::{Matrix3, Point3, Vector3};

/// Mean position of `points`, or `None` for an empty slice.
pub fn centroid(points: &[Point3<f64>]) -> Option<Point3<f64>> {
    if points.is_empty() {
        return None;
    }
    let sum: Vector3<f64> = points.iter().map(|p| p.coords).sum();
    Some(Point3::from(sum / points.len() as f64))
}

/// Translates `points` so their centroid sits at the origin.
///
/// Returns the centered vectors together with the centroid that was removed.
pub fn center(points: &[Point3<f64>]) -> Option<(Vec<Vector3<f64>>, Point3<f64>)> {
    let c = centroid(points)?;
    Some((points.iter().map(|p| p - c).collect(), c))
}

/// Cross-covariance `H = Aᵗ·B` of two paired, centered vector sets.
///
/// Rows of `A` and `B` are the individual vectors, so `H[(j, k)] = Σᵢ aᵢⱼ·bᵢₖ`.
pub fn cross_covariance(a: &[Vector3<f64>], b: &[Vector3<f64>]) -> Matrix3<f64> {
    a.iter()
        .zip(b.iter())
        .fold(Matrix3::zeros(), |acc, (ai, bi)| acc + ai * bi.transpose())
}

/// RMSD of two paired coordinate sets without any superposition.
pub fn calculate_rmsd(coords1: &[Vector3<f64>], coords2: &[Vector3<f64>]) -> Option<f64> {
    if coords1.len() != coords2.len() || coords1.is_empty() {
        return None;
    }
    let n = coords1.len() as f64;
    let squared_dist_sum: f64 = coords1
        .iter()
        .zip(coords2.iter())
        .map(|(p1, p2)| (p1 - p2).norm_squared())
        .sum();
    Some((squared_dist_sum / n).sqrt())
}

/// Largest per-atom displacement between two paired sets, with its index.
pub fn find_max_atom_deviation(
    coords1: &[Vector3<f64>],
    coords2: &[Vector3<f64>],
) -> Option<(f64, usize)> {
    if coords1.len() != coords2.len() {
        return None;
    }
    coords1
        .iter()
        .zip(coords2.iter())
        .enumerate()
        .map(|(i, (p1, p2))| ((p1 - p2).norm(), i))
        .max_by(|(dist1, _), (dist2, _)| {
            dist1
                .partial_cmp(dist2)
                .unwrap_or(std::cmp::Ordering::Equal)
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f64 = 1e-12;

    fn f64_approx_equal(a: f64, b: f64) -> bool {
        (a - b).abs() < TOLERANCE
    }

    #[test]
    fn centroid_of_empty_slice_is_none() {
        assert!(centroid(&[]).is_none());
    }

    #[test]
    fn centroid_is_mean_position() {
        let points = [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
            Point3::new(1.0, 3.0, -3.0),
        ];
        let c = centroid(&points).unwrap();
        assert!(f64_approx_equal(c.x, 1.0));
        assert!(f64_approx_equal(c.y, 1.0));
        assert!(f64_approx_equal(c.z, -1.0));
    }

    #[test]
    fn centered_vectors_sum_to_zero() {
        let points = [
            Point3::new(5.0, 1.0, 2.0),
            Point3::new(-1.0, 4.0, 0.5),
            Point3::new(3.0, 3.0, 3.0),
        ];
        let (centered, c) = center(&points).unwrap();
        let sum: Vector3<f64> = centered.iter().sum();
        assert!(sum.norm() < TOLERANCE);
        assert!(f64_approx_equal(c.x, 7.0 / 3.0));
    }

    #[test]
    fn cross_covariance_matches_manual_outer_products() {
        let a = [Vector3::new(1.0, 0.0, 0.0), Vector3::new(0.0, 2.0, 0.0)];
        let b = [Vector3::new(0.0, 1.0, 0.0), Vector3::new(0.0, 0.0, 3.0)];
        let h = cross_covariance(&a, &b);
        assert!(f64_approx_equal(h[(0, 1)], 1.0));
        assert!(f64_approx_equal(h[(1, 2)], 6.0));
        assert!(f64_approx_equal(h.sum(), 7.0));
    }

    #[test]
    fn unfitted_rmsd_rejects_mismatched_or_empty_input() {
        let a = [Vector3::zeros()];
        assert!(calculate_rmsd(&a, &[]).is_none());
        assert!(calculate_rmsd(&[], &[]).is_none());
    }

    #[test]
    fn unfitted_rmsd_of_unit_shift_is_one() {
        let a = [Vector3::new(0.0, 0.0, 0.0), Vector3::new(1.0, 1.0, 1.0)];
        let b = [Vector3::new(1.0, 0.0, 0.0), Vector3::new(2.0, 1.0, 1.0)];
        assert!(f64_approx_equal(calculate_rmsd(&a, &b).unwrap(), 1.0));
    }

    #[test]
    fn max_deviation_reports_largest_displacement_and_index() {
        let a = [Vector3::zeros(), Vector3::zeros(), Vector3::zeros()];
        let b = [
            Vector3::new(0.1, 0.0, 0.0),
            Vector3::new(0.0, 2.0, 0.0),
            Vector3::new(0.0, 0.0, 0.5),
        ];
        let (dist, index) = find_max_atom_deviation(&a, &b).unwrap();
        assert!(f64_approx_equal(dist, 2.0));
        assert_eq!(index, 1);
    }
}
