pub mod compare;
pub mod matrix;
pub mod rmsd;
pub mod store;
