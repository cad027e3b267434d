//! # Engine Module
//!
//! This module implements the alignment engine of molalign: the Kabsch
//! superposition itself together with its configuration, error taxonomy, and
//! progress reporting.
//!
//! ## Overview
//!
//! Every computation in the engine is a pure function of two point sets and an
//! [`config::AlignmentConfig`]. Independent alignments share no state, so callers
//! are free to run them in parallel; the workflows in [`crate::workflows`] do so
//! for pairwise matrices.
//!
//! ## Architecture
//!
//! - **Configuration** ([`config`]) - Heavy-atom selection and SVD convergence controls
//! - **Superposition** ([`kabsch`]) - Centering, cross-covariance, SVD, and RMSD
//! - **Progress Monitoring** ([`progress`]) - Callback-based progress reporting
//! - **Error Handling** ([`error`]) - `AlignError` for single fits, `EngineError` for workflows

pub mod config;
pub mod error;
pub mod kabsch;
pub mod progress;
