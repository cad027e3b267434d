use super::cjson::{CjsonError, CjsonFile};
use super::traits::StructureFile;
use crate::core::models::point_set::PointSet;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

const MOLECULE_FILE_NAME: &str = "molecule.cjson";
const GEOMETRIES_DIR_NAME: &str = "geometries";
const GEOMETRY_EXTENSION: &str = "cjson";

/// Identifies a stored structure: a molecule's default geometry or one of its
/// alternative geometries.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum StructureKey {
    Molecule {
        molecule_id: String,
    },
    Geometry {
        molecule_id: String,
        geometry_id: String,
    },
}

impl StructureKey {
    pub fn molecule(molecule_id: impl Into<String>) -> Self {
        Self::Molecule {
            molecule_id: molecule_id.into(),
        }
    }

    pub fn geometry(molecule_id: impl Into<String>, geometry_id: impl Into<String>) -> Self {
        Self::Geometry {
            molecule_id: molecule_id.into(),
            geometry_id: geometry_id.into(),
        }
    }

    /// A geometry key when `geometry_id` is given, otherwise the molecule's default.
    pub fn for_molecule(molecule_id: &str, geometry_id: Option<&str>) -> Self {
        match geometry_id {
            Some(geometry_id) => Self::geometry(molecule_id, geometry_id),
            None => Self::molecule(molecule_id),
        }
    }

    pub fn molecule_id(&self) -> &str {
        match self {
            Self::Molecule { molecule_id } | Self::Geometry { molecule_id, .. } => molecule_id,
        }
    }
}

impl fmt::Display for StructureKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Molecule { molecule_id } => write!(f, "molecule '{}'", molecule_id),
            Self::Geometry {
                molecule_id,
                geometry_id,
            } => write!(f, "geometry '{}' of molecule '{}'", geometry_id, molecule_id),
        }
    }
}

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("{0} not found")]
    NotFound(StructureKey),
    #[error("Invalid identifier '{0}'")]
    InvalidId(String),
    #[error("Failed to read {key}: {source}")]
    Parse {
        key: StructureKey,
        #[source]
        source: CjsonError,
    },
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Read access to stored molecular geometries.
///
/// The alignment engine never talks to storage directly; workflows obtain
/// point sets through this trait so any backing store can be plugged in.
pub trait StructureSource {
    /// Fetches one structure.
    fn fetch(&self, key: &StructureKey) -> Result<PointSet, SourceError>;

    /// Lists the identifiers of all alternative geometries of a molecule, sorted.
    fn geometry_ids(&self, molecule_id: &str) -> Result<Vec<String>, SourceError>;
}

fn validate_id(id: &str) -> Result<(), SourceError> {
    if id.is_empty() || id == "." || id == ".." || id.contains(['/', '\\']) {
        return Err(SourceError::InvalidId(id.to_string()));
    }
    Ok(())
}

/// A store laid out on disk as
/// `<root>/<molecule>/molecule.cjson` and `<root>/<molecule>/geometries/<geometry>.cjson`.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn molecule_dir(&self, molecule_id: &str) -> Result<PathBuf, SourceError> {
        validate_id(molecule_id)?;
        Ok(self.root.join(molecule_id))
    }

    /// Resolves a key to the file that would hold it.
    pub fn path_for(&self, key: &StructureKey) -> Result<PathBuf, SourceError> {
        let dir = self.molecule_dir(key.molecule_id())?;
        match key {
            StructureKey::Molecule { .. } => Ok(dir.join(MOLECULE_FILE_NAME)),
            StructureKey::Geometry { geometry_id, .. } => {
                validate_id(geometry_id)?;
                Ok(dir
                    .join(GEOMETRIES_DIR_NAME)
                    .join(format!("{}.{}", geometry_id, GEOMETRY_EXTENSION)))
            }
        }
    }
}

impl StructureSource for DirectorySource {
    fn fetch(&self, key: &StructureKey) -> Result<PointSet, SourceError> {
        let path = self.path_for(key)?;
        debug!("Fetching {} from {:?}", key, path);
        if !path.is_file() {
            return Err(SourceError::NotFound(key.clone()));
        }
        CjsonFile::read_from_path(&path)
            .map(|(set, _)| set)
            .map_err(|source| SourceError::Parse {
                key: key.clone(),
                source,
            })
    }

    fn geometry_ids(&self, molecule_id: &str) -> Result<Vec<String>, SourceError> {
        let dir = self.molecule_dir(molecule_id)?;
        if !dir.is_dir() {
            return Err(SourceError::NotFound(StructureKey::molecule(molecule_id)));
        }
        let geometries_dir = dir.join(GEOMETRIES_DIR_NAME);
        if !geometries_dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut ids = Vec::new();
        for entry in std::fs::read_dir(&geometries_dir)? {
            let path = entry?.path();
            // Exact match: `path_for` rebuilds names with the lower-case extension.
            let is_geometry =
                path.is_file() && path.extension().is_some_and(|ext| ext == GEOMETRY_EXTENSION);
            if !is_geometry {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                ids.push(stem.to_string());
            }
        }
        ids.sort();
        Ok(ids)
    }
}

#[derive(Debug, Clone, Default)]
struct StoredMolecule {
    structure: Option<PointSet>,
    geometries: BTreeMap<String, PointSet>,
}

/// A map-backed store for embedding and tests.
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    molecules: HashMap<String, StoredMolecule>,
}

impl InMemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_molecule(&mut self, molecule_id: impl Into<String>, structure: PointSet) {
        self.molecules
            .entry(molecule_id.into())
            .or_default()
            .structure = Some(structure);
    }

    pub fn insert_geometry(
        &mut self,
        molecule_id: impl Into<String>,
        geometry_id: impl Into<String>,
        structure: PointSet,
    ) {
        self.molecules
            .entry(molecule_id.into())
            .or_default()
            .geometries
            .insert(geometry_id.into(), structure);
    }
}

impl StructureSource for InMemorySource {
    fn fetch(&self, key: &StructureKey) -> Result<PointSet, SourceError> {
        let molecule = self.molecules.get(key.molecule_id());
        let found = match key {
            StructureKey::Molecule { .. } => molecule.and_then(|m| m.structure.as_ref()),
            StructureKey::Geometry { geometry_id, .. } => {
                molecule.and_then(|m| m.geometries.get(geometry_id))
            }
        };
        found
            .cloned()
            .ok_or_else(|| SourceError::NotFound(key.clone()))
    }

    fn geometry_ids(&self, molecule_id: &str) -> Result<Vec<String>, SourceError> {
        self.molecules
            .get(molecule_id)
            .map(|m| m.geometries.keys().cloned().collect())
            .ok_or_else(|| SourceError::NotFound(StructureKey::molecule(molecule_id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    const SINGLE_ATOM: &str = r#"{"atoms": {"coords": {"3d": [1.0, 2.0, 3.0]}, "elements": {"number": [6]}}}"#;

    fn populated_store() -> (tempfile::TempDir, DirectorySource) {
        let dir = tempdir().unwrap();
        let mol = dir.path().join("ethanol");
        fs::create_dir_all(mol.join("geometries")).unwrap();
        fs::write(mol.join("molecule.cjson"), SINGLE_ATOM).unwrap();
        fs::write(mol.join("geometries/opt.cjson"), SINGLE_ATOM).unwrap();
        fs::write(mol.join("geometries/input.cjson"), SINGLE_ATOM).unwrap();
        fs::write(mol.join("geometries/notes.txt"), "ignored").unwrap();
        let source = DirectorySource::new(dir.path());
        (dir, source)
    }

    #[test]
    fn key_display_names_molecule_and_geometry() {
        assert_eq!(StructureKey::molecule("m1").to_string(), "molecule 'm1'");
        assert_eq!(
            StructureKey::geometry("m1", "g2").to_string(),
            "geometry 'g2' of molecule 'm1'"
        );
    }

    #[test]
    fn for_molecule_selects_default_without_geometry() {
        assert_eq!(
            StructureKey::for_molecule("m", None),
            StructureKey::molecule("m")
        );
        assert_eq!(
            StructureKey::for_molecule("m", Some("g")),
            StructureKey::geometry("m", "g")
        );
    }

    #[test]
    fn directory_source_fetches_molecule_and_geometry() {
        let (_dir, source) = populated_store();

        let molecule = source.fetch(&StructureKey::molecule("ethanol")).unwrap();
        let geometry = source
            .fetch(&StructureKey::geometry("ethanol", "opt"))
            .unwrap();

        assert_eq!(molecule.len(), 1);
        assert_eq!(geometry.atomic_numbers(), Some(&[6u8][..]));
    }

    #[test]
    fn directory_source_lists_sorted_cjson_stems() {
        let (_dir, source) = populated_store();
        let ids = source.geometry_ids("ethanol").unwrap();
        assert_eq!(ids, vec!["input".to_string(), "opt".to_string()]);
    }

    #[test]
    fn every_listed_geometry_can_be_fetched() {
        let (dir, source) = populated_store();
        fs::write(dir.path().join("ethanol/geometries/B.CJSON"), SINGLE_ATOM).unwrap();

        let ids = source.geometry_ids("ethanol").unwrap();

        assert_eq!(ids, vec!["input".to_string(), "opt".to_string()]);
        for id in &ids {
            source
                .fetch(&StructureKey::geometry("ethanol", id.as_str()))
                .unwrap();
        }
    }

    #[test]
    fn directory_source_reports_missing_structures() {
        let (_dir, source) = populated_store();

        let result = source.fetch(&StructureKey::geometry("ethanol", "missing"));
        assert!(matches!(result, Err(SourceError::NotFound(_))));

        let result = source.geometry_ids("methane");
        assert!(matches!(result, Err(SourceError::NotFound(_))));
    }

    #[test]
    fn directory_source_wraps_parse_failures_with_key() {
        let (dir, source) = populated_store();
        fs::write(dir.path().join("ethanol/geometries/bad.cjson"), "{}").unwrap();

        let result = source.fetch(&StructureKey::geometry("ethanol", "bad"));

        match result {
            Err(SourceError::Parse { key, .. }) => {
                assert_eq!(key, StructureKey::geometry("ethanol", "bad"))
            }
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn directory_source_rejects_path_like_ids() {
        let (_dir, source) = populated_store();
        for id in ["", "..", "a/b", "a\\b"] {
            let result = source.fetch(&StructureKey::molecule(id));
            assert!(matches!(result, Err(SourceError::InvalidId(_))), "id {:?}", id);
        }
        let result = source.fetch(&StructureKey::geometry("ethanol", "../molecule"));
        assert!(matches!(result, Err(SourceError::InvalidId(_))));
    }

    #[test]
    fn molecule_without_geometries_directory_has_no_geometries() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("water")).unwrap();
        let source = DirectorySource::new(dir.path());
        assert!(source.geometry_ids("water").unwrap().is_empty());
    }

    #[test]
    fn in_memory_source_round_trips_inserted_structures() {
        let set = PointSet::from_flat(&[0.0, 0.0, 0.0], Some(&[8])).unwrap();
        let mut source = InMemorySource::new();
        source.insert_molecule("water", set.clone());
        source.insert_geometry("water", "b", set.clone());
        source.insert_geometry("water", "a", set.clone());

        assert_eq!(source.fetch(&StructureKey::molecule("water")).unwrap(), set);
        assert_eq!(
            source.geometry_ids("water").unwrap(),
            vec!["a".to_string(), "b".to_string()]
        );
        assert!(matches!(
            source.fetch(&StructureKey::geometry("water", "c")),
            Err(SourceError::NotFound(_))
        ));
    }

    #[test]
    fn in_memory_molecule_with_only_geometries_has_no_default_structure() {
        let set = PointSet::from_flat(&[0.0, 0.0, 0.0], None).unwrap();
        let mut source = InMemorySource::new();
        source.insert_geometry("water", "a", set);

        let result = source.fetch(&StructureKey::molecule("water"));

        assert!(matches!(result, Err(SourceError::NotFound(_))));
    }
}
