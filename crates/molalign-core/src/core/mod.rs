//! # Core Module
//!
//! This module provides the stateless building blocks of molalign: geometry
//! models, structure file I/O, and small geometric utilities.
//!
//! ## Overview
//!
//! Everything in `core` is a plain data type or a pure function. Alignment logic
//! lives in [`crate::engine`]; `core` only supplies validated coordinates and the
//! means to read and write them.
//!
//! ## Architecture
//!
//! - **Geometry Representation** ([`models`]) - Point sets and element data
//! - **File I/O** ([`io`]) - Chemical JSON and XYZ readers/writers, structure sources
//! - **Geometry Utilities** ([`utils`]) - Centroids, covariance, and unfitted RMSD

pub mod io;
pub mod models;
pub mod utils;
