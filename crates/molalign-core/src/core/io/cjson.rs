use crate::core::io::traits::StructureFile;
use crate::core::models::point_set::{PointSet, PointSetError};
use serde::Deserialize;
use serde_json::{Map, Value, json};
use std::io::{self, BufRead, Write};
use thiserror::Error;

const COORDS_3D_POINTER: &str = "/atoms/coords/3d";

#[derive(Debug, Error)]
pub enum CjsonError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Malformed Chemical JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Missing required record: {0}")]
    MissingRecord(String),
    #[error("Inconsistent data: {0}")]
    Inconsistency(String),
}

impl From<PointSetError> for CjsonError {
    fn from(e: PointSetError) -> Self {
        CjsonError::Inconsistency(e.to_string())
    }
}

/// The full source document, kept so that writing only replaces the geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct CjsonMetadata {
    pub document: Value,
}

impl Default for CjsonMetadata {
    fn default() -> Self {
        Self {
            document: json!({ "chemicalJson": 1 }),
        }
    }
}

#[derive(Debug, Deserialize, Default)]
struct CjsonAtoms {
    #[serde(default)]
    coords: CjsonCoords,
    #[serde(default)]
    elements: CjsonElements,
}

#[derive(Debug, Deserialize, Default)]
struct CjsonCoords {
    #[serde(rename = "3d", default)]
    three_d: Vec<f64>,
}

#[derive(Debug, Deserialize, Default)]
struct CjsonElements {
    #[serde(default)]
    number: Vec<u8>,
}

/// Whether a Chemical JSON document carries a non-empty `atoms.coords.3d` array.
pub fn has_3d_coords(document: &Value) -> bool {
    document
        .pointer(COORDS_3D_POINTER)
        .and_then(Value::as_array)
        .is_some_and(|coords| !coords.is_empty())
}

/// Converts an already parsed Chemical JSON document into a point set.
///
/// # Errors
///
/// Returns [`CjsonError::MissingRecord`] if the document has no 3D coordinates,
/// and [`CjsonError::Inconsistency`] if the coordinate or element arrays have
/// the wrong length.
pub fn point_set_from_document(document: &Value) -> Result<PointSet, CjsonError> {
    if !has_3d_coords(document) {
        return Err(CjsonError::MissingRecord("atoms.coords.3d".into()));
    }
    let atoms: CjsonAtoms = match document.get("atoms") {
        Some(atoms) => CjsonAtoms::deserialize(atoms)?,
        None => CjsonAtoms::default(),
    };
    let numbers = &atoms.elements.number;
    let numbers = (!numbers.is_empty()).then_some(numbers.as_slice());
    Ok(PointSet::from_flat(&atoms.coords.three_d, numbers)?)
}

pub struct CjsonFile;

impl StructureFile for CjsonFile {
    type Metadata = CjsonMetadata;
    type Error = CjsonError;

    fn read_from(reader: &mut impl BufRead) -> Result<(PointSet, Self::Metadata), Self::Error> {
        let document: Value = serde_json::from_reader(reader)?;
        let point_set = point_set_from_document(&document)?;
        Ok((point_set, CjsonMetadata { document }))
    }

    fn write_to(
        point_set: &PointSet,
        metadata: &Self::Metadata,
        writer: &mut impl Write,
    ) -> Result<(), Self::Error> {
        let mut document = metadata.document.clone();
        let atoms = object_entry(&mut document, "atoms")?;
        *object_entry(object_entry(atoms, "coords")?, "3d")? = json!(point_set.to_flat());
        if let Some(numbers) = point_set.atomic_numbers() {
            *object_entry(object_entry(atoms, "elements")?, "number")? = json!(numbers);
        }

        serde_json::to_writer_pretty(&mut *writer, &document)?;
        writeln!(writer)?;
        Ok(())
    }

    fn write_point_set_to(point_set: &PointSet, writer: &mut impl Write) -> Result<(), Self::Error> {
        Self::write_to(point_set, &CjsonMetadata::default(), writer)
    }
}

fn object_entry<'a>(value: &'a mut Value, key: &str) -> Result<&'a mut Value, CjsonError> {
    if value.is_null() {
        *value = Value::Object(Map::new());
    }
    match value {
        Value::Object(map) => Ok(map.entry(key).or_insert(Value::Null)),
        other => Err(CjsonError::Inconsistency(format!(
            "expected an object to hold '{}', found {}",
            key, other
        ))),
    }
}
