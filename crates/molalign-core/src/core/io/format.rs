use super::cjson::{CjsonError, CjsonFile, CjsonMetadata};
use super::traits::StructureFile;
use super::xyz::{XyzError, XyzFile, XyzMetadata};
use crate::core::models::point_set::PointSet;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StructureFormat {
    Cjson,
    Xyz,
}

impl StructureFormat {
    /// Picks a format from the file extension (case-insensitive).
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        match extension.as_str() {
            "cjson" | "json" => Some(Self::Cjson),
            "xyz" => Some(Self::Xyz),
            _ => None,
        }
    }
}

/// Format-specific metadata captured while reading, used when writing back.
#[derive(Debug, Clone, PartialEq)]
pub enum StructureMetadata {
    Cjson(CjsonMetadata),
    Xyz(XyzMetadata),
}

impl StructureMetadata {
    pub fn format(&self) -> StructureFormat {
        match self {
            Self::Cjson(_) => StructureFormat::Cjson,
            Self::Xyz(_) => StructureFormat::Xyz,
        }
    }
}

#[derive(Debug, Error)]
pub enum StructureIoError {
    #[error("Unrecognized structure format for '{}' (expected .cjson, .json or .xyz)", path.display())]
    UnknownFormat { path: PathBuf },
    #[error("Cannot write {found:?} metadata to '{}' ({expected:?} by extension)", path.display())]
    FormatMismatch {
        path: PathBuf,
        expected: StructureFormat,
        found: StructureFormat,
    },
    #[error(transparent)]
    Cjson(#[from] CjsonError),
    #[error(transparent)]
    Xyz(#[from] XyzError),
}

/// Reads a geometry, choosing the parser from the file extension.
pub fn read_structure(path: &Path) -> Result<(PointSet, StructureMetadata), StructureIoError> {
    match StructureFormat::from_path(path) {
        Some(StructureFormat::Cjson) => {
            let (set, metadata) = CjsonFile::read_from_path(path)?;
            Ok((set, StructureMetadata::Cjson(metadata)))
        }
        Some(StructureFormat::Xyz) => {
            let (set, metadata) = XyzFile::read_from_path(path)?;
            Ok((set, StructureMetadata::Xyz(metadata)))
        }
        None => Err(StructureIoError::UnknownFormat {
            path: path.to_path_buf(),
        }),
    }
}

/// Writes a geometry in the format named by the file extension.
///
/// The metadata must belong to that same format; it is never converted.
pub fn write_structure(
    path: &Path,
    point_set: &PointSet,
    metadata: &StructureMetadata,
) -> Result<(), StructureIoError> {
    let format =
        StructureFormat::from_path(path).ok_or_else(|| StructureIoError::UnknownFormat {
            path: path.to_path_buf(),
        })?;
    match (format, metadata) {
        (StructureFormat::Cjson, StructureMetadata::Cjson(m)) => {
            CjsonFile::write_to_path(point_set, m, path)?
        }
        (StructureFormat::Xyz, StructureMetadata::Xyz(m)) => {
            XyzFile::write_to_path(point_set, m, path)?
        }
        (expected, _) => {
            return Err(StructureIoError::FormatMismatch {
                path: path.to_path_buf(),
                expected,
                found: metadata.format(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn format_is_detected_from_extension() {
        assert_eq!(
            StructureFormat::from_path(Path::new("a/b/mol.cjson")),
            Some(StructureFormat::Cjson)
        );
        assert_eq!(
            StructureFormat::from_path(Path::new("mol.JSON")),
            Some(StructureFormat::Cjson)
        );
        assert_eq!(
            StructureFormat::from_path(Path::new("mol.xyz")),
            Some(StructureFormat::Xyz)
        );
        assert_eq!(StructureFormat::from_path(Path::new("mol.pdb")), None);
        assert_eq!(StructureFormat::from_path(Path::new("mol")), None);
    }

    #[test]
    fn unknown_extension_is_rejected_before_opening() {
        let result = read_structure(Path::new("does-not-exist.mol2"));
        assert!(matches!(result, Err(StructureIoError::UnknownFormat { .. })));
    }

    #[test]
    fn xyz_file_is_read_and_written_through_dispatch() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("in.xyz");
        fs::write(&input, "2\nCO\nC 0 0 0\nO 0 0 1.128\n").unwrap();

        let (set, metadata) = read_structure(&input).unwrap();
        assert_eq!(metadata.format(), StructureFormat::Xyz);
        assert_eq!(set.len(), 2);

        let output = dir.path().join("out.xyz");
        write_structure(&output, &set, &metadata).unwrap();
        let content = fs::read_to_string(&output).unwrap();
        assert!(content.starts_with("2\nCO\n"));
    }

    #[test]
    fn cjson_file_is_read_through_dispatch() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("in.cjson");
        fs::write(&input, r#"{"atoms": {"coords": {"3d": [0, 0, 0]}}}"#).unwrap();

        let (set, metadata) = read_structure(&input).unwrap();

        assert_eq!(metadata.format(), StructureFormat::Cjson);
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn write_rejects_metadata_of_another_format() {
        let dir = tempdir().unwrap();
        let output = dir.path().join("aligned.xyz");
        let set = PointSet::from_flat(&[0.0, 0.0, 0.0], Some(&[6])).unwrap();

        let result = write_structure(
            &output,
            &set,
            &StructureMetadata::Cjson(CjsonMetadata::default()),
        );

        assert!(matches!(
            result,
            Err(StructureIoError::FormatMismatch {
                expected: StructureFormat::Xyz,
                found: StructureFormat::Cjson,
                ..
            })
        ));
        assert!(!output.exists());
    }

    #[test]
    fn write_to_unknown_extension_is_rejected() {
        let dir = tempdir().unwrap();
        let set = PointSet::from_flat(&[0.0, 0.0, 0.0], None).unwrap();
        let metadata = StructureMetadata::Xyz(XyzMetadata {
            comment: String::new(),
        });

        let result = write_structure(&dir.path().join("aligned.pdb"), &set, &metadata);

        assert!(matches!(result, Err(StructureIoError::UnknownFormat { .. })));
    }

    #[test]
    fn missing_file_surfaces_io_error() {
        let dir = tempdir().unwrap();
        let result = read_structure(&dir.path().join("missing.xyz"));
        assert!(matches!(result, Err(StructureIoError::Xyz(XyzError::Io(_)))));
    }
}
