//! # Core Models Module
//!
//! This module contains the data structures used to represent molecular geometries
//! in molalign.
//!
//! ## Overview
//!
//! A geometry is reduced to what structural alignment needs: an ordered list of
//! atomic positions and, optionally, the atomic number of each atom. These models
//! are designed to:
//!
//! - **Validate on construction** - Ragged, non-finite, or mismatched inputs never reach the aligner
//! - **Stay immutable** - Selections and transforms produce new sets
//! - **Bridge flat arrays** - Convert to and from the `[x, y, z, ...]` layout used by file formats
//!
//! ## Key Components
//!
//! - [`point_set`] - Positions plus optional atomic numbers
//! - [`element`] - Element symbol lookup and heavy-atom classification
//!
//! ## Usage
//!
//! ```ignore
//! use molalign::core::models::point_set::PointSet;
//!
//! let water = PointSet::from_flat(
//!     &[0.0, 0.0, 0.0, 0.96, 0.0, 0.0, -0.24, 0.93, 0.0],
//!     Some(&[8, 1, 1]),
//! )?;
//! let heavy = water.heavy_atoms().unwrap();
//! assert_eq!(heavy.len(), 1);
//! ```

pub mod element;
pub mod point_set;
