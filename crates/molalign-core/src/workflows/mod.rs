//! # Workflows Module
//!
//! High-level entry points that pull structures from a
//! [`StructureSource`](crate::core::io::source::StructureSource), run the
//! superposition engine on them and package the results.
//!
//! - **RMSD** ([`rmsd`]) - Compares two geometries of one molecule, falling back
//!   to the molecule's default structure when a geometry is not named.
//! - **Pairwise matrix** ([`matrix`]) - Compares every stored geometry of a
//!   molecule against every other one.

pub mod matrix;
pub mod rmsd;
