use crate::core::io::traits::StructureFile;
use crate::core::models::element::{atomic_number_from_symbol, symbol_from_atomic_number};
use crate::core::models::point_set::{PointSet, PointSetError};
use nalgebra::Point3;
use std::io::{self, BufRead, Write};
use thiserror::Error;

const UNKNOWN_ELEMENT_SYMBOL: &str = "X";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct XyzMetadata {
    pub comment: String,
}

#[derive(Debug, Error)]
pub enum XyzError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Parse error on line {line}: {kind}")]
    Parse { line: usize, kind: XyzParseErrorKind },
    #[error("Missing required record: {0}")]
    MissingRecord(String),
    #[error("Inconsistent data: {0}")]
    Inconsistency(String),
}

#[derive(Debug, Error)]
pub enum XyzParseErrorKind {
    #[error("Invalid atom count '{0}'")]
    InvalidAtomCount(String),
    #[error("Atom line needs a symbol and three coordinates")]
    TooFewFields,
    #[error("Unknown element symbol '{0}'")]
    UnknownElement(String),
    #[error("Invalid coordinate '{0}'")]
    InvalidFloat(String),
}

impl From<PointSetError> for XyzError {
    fn from(e: PointSetError) -> Self {
        XyzError::Inconsistency(e.to_string())
    }
}

fn parse_element(field: &str) -> Option<u8> {
    atomic_number_from_symbol(field).or_else(|| field.parse::<u8>().ok().filter(|&n| n > 0))
}

pub struct XyzFile;

impl StructureFile for XyzFile {
    type Metadata = XyzMetadata;
    type Error = XyzError;

    /// Reads the first frame of an XYZ file.
    fn read_from(reader: &mut impl BufRead) -> Result<(PointSet, Self::Metadata), Self::Error> {
        let mut lines = reader.lines().enumerate().map(|(i, l)| (i + 1, l));

        let (line_num, count_line) = lines
            .next()
            .ok_or_else(|| XyzError::MissingRecord("atom count line".into()))?;
        let count_line = count_line?;
        let count: usize = count_line.trim().parse().map_err(|_| XyzError::Parse {
            line: line_num,
            kind: XyzParseErrorKind::InvalidAtomCount(count_line.trim().into()),
        })?;
        if count == 0 {
            return Err(XyzError::MissingRecord("atom records".into()));
        }

        let comment = match lines.next() {
            Some((_, line)) => line?,
            None => return Err(XyzError::MissingRecord("comment line".into())),
        };

        let mut positions = Vec::with_capacity(count);
        let mut numbers = Vec::with_capacity(count);
        for (line_num, line) in lines.by_ref().take(count) {
            let line = line?;
            let fields: Vec<&str> = line.split_whitespace().collect();
            if fields.len() < 4 {
                return Err(XyzError::Parse {
                    line: line_num,
                    kind: XyzParseErrorKind::TooFewFields,
                });
            }
            let number = parse_element(fields[0]).ok_or_else(|| XyzError::Parse {
                line: line_num,
                kind: XyzParseErrorKind::UnknownElement(fields[0].into()),
            })?;
            let mut xyz = [0.0; 3];
            for (slot, field) in xyz.iter_mut().zip(&fields[1..4]) {
                *slot = field.parse().map_err(|_| XyzError::Parse {
                    line: line_num,
                    kind: XyzParseErrorKind::InvalidFloat((*field).into()),
                })?;
            }
            positions.push(Point3::from(xyz));
            numbers.push(number);
        }

        if positions.len() != count {
            return Err(XyzError::MissingRecord(format!(
                "expected {} atom lines, found {}",
                count,
                positions.len()
            )));
        }

        let point_set = PointSet::new(positions, Some(numbers))?;
        Ok((point_set, XyzMetadata { comment }))
    }

    fn write_to(
        point_set: &PointSet,
        metadata: &Self::Metadata,
        writer: &mut impl Write,
    ) -> Result<(), Self::Error> {
        writeln!(writer, "{}", point_set.len())?;
        writeln!(writer, "{}", metadata.comment.replace('\n', " "))?;
        for (i, p) in point_set.positions().iter().enumerate() {
            let symbol = point_set
                .atomic_numbers()
                .and_then(|numbers| numbers.get(i).copied())
                .and_then(symbol_from_atomic_number)
                .unwrap_or(UNKNOWN_ELEMENT_SYMBOL);
            writeln!(
                writer,
                "{:<2} {:>15.8} {:>15.8} {:>15.8}",
                symbol, p.x, p.y, p.z
            )?;
        }
        Ok(())
    }

    fn write_point_set_to(point_set: &PointSet, writer: &mut impl Write) -> Result<(), Self::Error> {
        let metadata = XyzMetadata {
            comment: "Generated by molalign".to_string(),
        };
        Self::write_to(point_set, &metadata, writer)
    }
}
