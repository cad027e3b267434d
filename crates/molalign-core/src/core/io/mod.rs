//! Reading, writing and locating molecular geometries.
//!
//! File formats implement [`traits::StructureFile`]; [`format`] picks one from a
//! path. Stored molecules and their alternative geometries are reached through
//! the [`source::StructureSource`] trait.

pub mod cjson;
pub mod format;
pub mod source;
pub mod traits;
pub mod xyz;
