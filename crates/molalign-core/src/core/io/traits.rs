use crate::core::models::point_set::PointSet;
use std::error::Error;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

/// Defines the interface for reading and writing molecular geometry files.
///
/// Implementors parse a format into a [`PointSet`] plus whatever format-specific
/// metadata is needed to write the geometry back out faithfully.
pub trait StructureFile {
    /// The type of metadata associated with the file format.
    type Metadata;

    /// The error type for I/O operations.
    type Error: Error + From<io::Error>;

    /// Reads a geometry from a buffered reader.
    ///
    /// # Arguments
    ///
    /// * `reader` - The buffered reader to read from.
    ///
    /// # Return
    ///
    /// Returns the parsed point set and associated metadata.
    ///
    /// # Errors
    ///
    /// Returns an error if parsing fails or I/O operations encounter issues.
    fn read_from(reader: &mut impl BufRead) -> Result<(PointSet, Self::Metadata), Self::Error>;

    /// Writes a geometry and its metadata to a writer.
    ///
    /// # Arguments
    ///
    /// * `point_set` - The geometry to write.
    /// * `metadata` - The metadata to include in the output.
    /// * `writer` - The writer to output to.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails or I/O operations encounter issues.
    fn write_to(
        point_set: &PointSet,
        metadata: &Self::Metadata,
        writer: &mut impl Write,
    ) -> Result<(), Self::Error>;

    /// Writes a geometry without any source metadata.
    fn write_point_set_to(point_set: &PointSet, writer: &mut impl Write) -> Result<(), Self::Error>;

    /// Reads a geometry from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or parsing fails.
    fn read_from_path<P: AsRef<Path>>(path: P) -> Result<(PointSet, Self::Metadata), Self::Error> {
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);
        Self::read_from(&mut reader)
    }

    /// Writes a geometry and its metadata to a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created or writing fails.
    fn write_to_path<P: AsRef<Path>>(
        point_set: &PointSet,
        metadata: &Self::Metadata,
        path: P,
    ) -> Result<(), Self::Error> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        Self::write_to(point_set, metadata, &mut writer)?;
        writer.flush()?;
        Ok(())
    }

    /// Writes a geometry to a file path without metadata.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created or writing fails.
    fn write_point_set_to_path<P: AsRef<Path>>(
        point_set: &PointSet,
        path: P,
    ) -> Result<(), Self::Error> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        Self::write_point_set_to(point_set, &mut writer)?;
        writer.flush()?;
        Ok(())
    }
}
