use super::element::heavy_atom_indices;
use nalgebra::{Point3, Rotation3, Vector3};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum PointSetError {
    #[error("Flat coordinate array length {len} is not a multiple of 3")]
    RaggedCoordinates { len: usize },
    #[error("Coordinate {index} is not a finite number")]
    NonFiniteCoordinate { index: usize },
    #[error("Expected {expected} atomic numbers (one per atom), found {found}")]
    AtomicNumberCountMismatch { expected: usize, found: usize },
}

/// An ordered set of atomic positions, optionally paired with atomic numbers.
///
/// A `PointSet` is the unit of input for structural alignment. Each position
/// corresponds to one atom; when atomic numbers are present they are
/// index-aligned with the positions. Instances are immutable once built, and
/// operations that select or move atoms return new sets.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PointSet {
    positions: Vec<Point3<f64>>,
    atomic_numbers: Option<Vec<u8>>,
}

impl PointSet {
    /// Creates a point set from positions and optional atomic numbers.
    ///
    /// # Errors
    ///
    /// Returns [`PointSetError::NonFiniteCoordinate`] if any coordinate is NaN
    /// or infinite, and [`PointSetError::AtomicNumberCountMismatch`] if the
    /// atomic numbers do not match the number of positions.
    pub fn new(
        positions: Vec<Point3<f64>>,
        atomic_numbers: Option<Vec<u8>>,
    ) -> Result<Self, PointSetError> {
        if let Some(index) = positions
            .iter()
            .flat_map(|p| p.coords.iter())
            .position(|c| !c.is_finite())
        {
            return Err(PointSetError::NonFiniteCoordinate { index });
        }
        if let Some(numbers) = &atomic_numbers {
            if numbers.len() != positions.len() {
                return Err(PointSetError::AtomicNumberCountMismatch {
                    expected: positions.len(),
                    found: numbers.len(),
                });
            }
        }
        Ok(Self {
            positions,
            atomic_numbers,
        })
    }

    /// Builds a point set from a flat `[x0, y0, z0, x1, y1, z1, ...]` array.
    ///
    /// # Arguments
    ///
    /// * `coords` - Flat coordinates, grouped as consecutive x,y,z triplets.
    /// * `atomic_numbers` - Optional atomic numbers, one per triplet.
    ///
    /// # Errors
    ///
    /// Returns [`PointSetError::RaggedCoordinates`] if `coords.len()` is not a
    /// multiple of 3, plus any error from [`PointSet::new`].
    pub fn from_flat(coords: &[f64], atomic_numbers: Option<&[u8]>) -> Result<Self, PointSetError> {
        if coords.len() % 3 != 0 {
            return Err(PointSetError::RaggedCoordinates { len: coords.len() });
        }
        let positions = coords
            .chunks_exact(3)
            .map(|c| Point3::new(c[0], c[1], c[2]))
            .collect();
        Self::new(positions, atomic_numbers.map(<[u8]>::to_vec))
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn positions(&self) -> &[Point3<f64>] {
        &self.positions
    }

    pub fn atomic_numbers(&self) -> Option<&[u8]> {
        self.atomic_numbers.as_deref()
    }

    /// Flattens the positions back into an `[x, y, z, ...]` array.
    pub fn to_flat(&self) -> Vec<f64> {
        self.positions
            .iter()
            .flat_map(|p| [p.x, p.y, p.z])
            .collect()
    }

    /// Returns a new set containing only the atoms at `indices`, in that order.
    ///
    /// Indices out of range are skipped.
    pub fn select(&self, indices: &[usize]) -> Self {
        let positions = indices
            .iter()
            .filter_map(|&i| self.positions.get(i).copied())
            .collect();
        let atomic_numbers = self.atomic_numbers.as_ref().map(|numbers| {
            indices
                .iter()
                .filter_map(|&i| numbers.get(i).copied())
                .collect()
        });
        Self {
            positions,
            atomic_numbers,
        }
    }

    /// Returns the non-hydrogen subset, or `None` if no atomic numbers are attached.
    pub fn heavy_atoms(&self) -> Option<Self> {
        self.atomic_numbers
            .as_deref()
            .map(|numbers| self.select(&heavy_atom_indices(numbers)))
    }

    /// Applies `rotation` followed by `translation` to every position.
    pub fn transformed(&self, rotation: &Rotation3<f64>, translation: &Vector3<f64>) -> Self {
        Self {
            positions: self
                .positions
                .iter()
                .map(|p| rotation * p + translation)
                .collect(),
            atomic_numbers: self.atomic_numbers.clone(),
        }
    }
}
