//! # molalign
//!
//! Rigid-body superposition of molecular geometries and RMSD scoring.
//!
//! ## Layout
//!
//! - **[`core`]: Data and I/O.** The [`PointSet`](core::models::point_set::PointSet)
//!   model, the element table, geometric helpers and readers/writers for
//!   Chemical JSON and XYZ files, plus the structure store abstraction.
//!
//! - **[`engine`]: The algorithm.** Kabsch superposition with optional heavy-atom
//!   filtering, its configuration and the error types shared by all layers.
//!
//! - **[`workflows`]: The public entry points.** Comparing two stored geometries
//!   of a molecule and building the pairwise RMSD matrix across all of them.

pub mod core;
pub mod engine;
pub mod workflows;
