use super::defaults::DefaultsConfig;
use super::file::FileConfig;
use super::models::AppConfig;
use crate::cli::AlignmentArgs;
use crate::error::{CliError, Result};
use molalign::engine::config::AlignmentConfigBuilder;
use tracing::debug;

pub fn build_config(args: &AlignmentArgs) -> Result<AppConfig> {
    let defaults = DefaultsConfig::default();

    let mut file_config = match &args.config {
        Some(config_path) => FileConfig::from_file(config_path)?,
        None => FileConfig::default(),
    };
    file_config.apply_set_values(&args.set_values)?;

    let alignment_file = file_config.alignment.take().unwrap_or_default();
    let output_file = file_config.output.take().unwrap_or_default();
    let store_file = file_config.store.take().unwrap_or_default();

    let heavy_atoms_only = if args.heavy_atoms_only {
        true
    } else {
        alignment_file
            .heavy_atoms_only
            .unwrap_or(defaults.heavy_atoms_only)
    };

    let alignment = AlignmentConfigBuilder::new()
        .heavy_atoms_only(heavy_atoms_only)
        .svd_epsilon(alignment_file.svd_epsilon.unwrap_or(defaults.svd_epsilon))
        .svd_max_iterations(
            alignment_file
                .svd_max_iterations
                .unwrap_or(defaults.svd_max_iterations),
        )
        .build()
        .map_err(|e| CliError::Config(e.to_string()))?;

    let precision = args
        .precision
        .or(output_file.precision)
        .unwrap_or(defaults.precision);

    let config = AppConfig {
        alignment,
        precision,
        store_path: store_file.path,
    };
    debug!("Resolved configuration: {:?}", config);
    Ok(config)
}
