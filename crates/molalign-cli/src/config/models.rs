use molalign::engine::config::AlignmentConfig;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub alignment: AlignmentConfig,
    /// Decimal places for printed and exported RMSD values.
    pub precision: usize,
    /// Store root from the config file or `--set`; `None` defers to the store manager.
    pub store_path: Option<PathBuf>,
}
