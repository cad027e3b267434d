use crate::core::io::source::{StructureKey, StructureSource};
use crate::engine::config::AlignmentConfig;
use crate::engine::error::EngineError;
use crate::engine::kabsch::superpose;
use tracing::{info, instrument};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RmsdRequest {
    pub molecule_id: String,
    /// Geometry moved onto the other one; `None` selects the molecule's default structure.
    pub geometry_a: Option<String>,
    pub geometry_b: Option<String>,
}

impl RmsdRequest {
    pub fn new(molecule_id: impl Into<String>) -> Self {
        Self {
            molecule_id: molecule_id.into(),
            ..Default::default()
        }
    }

    pub fn with_geometries(
        mut self,
        geometry_a: Option<String>,
        geometry_b: Option<String>,
    ) -> Self {
        self.geometry_a = geometry_a;
        self.geometry_b = geometry_b;
        self
    }

    fn key_a(&self) -> StructureKey {
        StructureKey::for_molecule(&self.molecule_id, self.geometry_a.as_deref())
    }

    fn key_b(&self) -> StructureKey {
        StructureKey::for_molecule(&self.molecule_id, self.geometry_b.as_deref())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RmsdReport {
    pub rmsd: f64,
    pub max_deviation: f64,
    pub atoms_compared: usize,
}

#[instrument(skip_all, name = "rmsd_workflow", fields(molecule_id = %request.molecule_id))]
pub fn run<S>(
    source: &S,
    request: &RmsdRequest,
    config: &AlignmentConfig,
) -> Result<RmsdReport, EngineError>
where
    S: StructureSource + ?Sized,
{
    let key_a = request.key_a();
    let key_b = request.key_b();
    info!("Comparing {} with {}.", key_a, key_b);

    let a = source.fetch(&key_a)?;
    let b = source.fetch(&key_b)?;
    let superposition = superpose(&a, &b, config)?;

    info!(
        rmsd = superposition.rmsd,
        atoms_compared = superposition.atoms_compared,
        "RMSD calculation finished."
    );
    Ok(RmsdReport {
        rmsd: superposition.rmsd,
        max_deviation: superposition.max_deviation,
        atoms_compared: superposition.atoms_compared,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::io::source::{InMemorySource, SourceError};
    use crate::core::models::point_set::PointSet;
    use crate::engine::error::AlignError;

    fn source() -> InMemorySource {
        let mut source = InMemorySource::new();
        let base = PointSet::from_flat(&[0.0, 0.0, 0.0, 1.0, 0.0, 0.0], Some(&[6, 8])).unwrap();
        let shifted =
            PointSet::from_flat(&[5.0, 5.0, 5.0, 5.0, 6.0, 5.0], Some(&[6, 8])).unwrap();
        let stretched =
            PointSet::from_flat(&[0.0, 0.0, 0.0, 3.0, 0.0, 0.0], Some(&[6, 8])).unwrap();
        source.insert_molecule("co", base.clone());
        source.insert_geometry("co", "shifted", shifted);
        source.insert_geometry("co", "stretched", stretched);
        source
    }

    #[test]
    fn default_structure_is_used_when_no_geometry_is_named() {
        let request = RmsdRequest::new("co").with_geometries(None, Some("shifted".into()));
        let report = run(&source(), &request, &AlignmentConfig::default()).unwrap();
        assert!(report.rmsd < 1e-9);
        assert_eq!(report.atoms_compared, 2);
    }

    #[test]
    fn two_named_geometries_are_compared() {
        let request = RmsdRequest::new("co")
            .with_geometries(Some("stretched".into()), Some("shifted".into()));
        let report = run(&source(), &request, &AlignmentConfig::default()).unwrap();
        assert!((report.rmsd - 1.0).abs() < 1e-9);
        assert!((report.max_deviation - 1.0).abs() < 1e-9);
    }

    #[test]
    fn default_against_itself_is_zero() {
        let report = run(&source(), &RmsdRequest::new("co"), &AlignmentConfig::default()).unwrap();
        assert!(report.rmsd < 1e-12);
    }

    #[test]
    fn missing_geometry_is_a_source_error() {
        let request = RmsdRequest::new("co").with_geometries(Some("nope".into()), None);
        let result = run(&source(), &request, &AlignmentConfig::default());
        assert!(matches!(
            result,
            Err(EngineError::Source {
                source: SourceError::NotFound(_)
            })
        ));
    }

    #[test]
    fn size_mismatch_is_an_alignment_error() {
        let mut source = source();
        source.insert_geometry(
            "co",
            "atom",
            PointSet::from_flat(&[0.0, 0.0, 0.0], Some(&[6])).unwrap(),
        );
        let request = RmsdRequest::new("co").with_geometries(Some("atom".into()), None);
        let result = run(&source, &request, &AlignmentConfig::default());
        assert!(matches!(
            result,
            Err(EngineError::Alignment {
                source: AlignError::InvalidInput(_)
            })
        ));
    }
}
