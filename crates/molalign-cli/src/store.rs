use crate::error::{CliError, Result};
use directories::ProjectDirs;
use molalign::core::io::source::DirectorySource;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

const PATH_CONFIG_FILE_NAME: &str = "store-path.conf";

/// Resolves and persists the location of the on-disk structure store.
#[derive(Debug)]
pub struct StoreManager {
    base_path: PathBuf,
}

impl StoreManager {
    /// Picks the store root: an explicit `--store` path, then the configured path,
    /// then the persisted custom path, then the OS data directory.
    pub fn new(cli_path: Option<&Path>, config_path: Option<&Path>) -> Result<Self> {
        let path = match cli_path.or(config_path) {
            Some(path) => path.to_path_buf(),
            None => Self::determine_store_path()?,
        };
        debug!("StoreManager initialized with path: {:?}", &path);
        Ok(Self { base_path: path })
    }

    #[cfg(test)]
    pub fn with_custom_path(path: PathBuf) -> Self {
        Self { base_path: path }
    }

    pub fn store_path(&self) -> &Path {
        &self.base_path
    }

    pub fn source(&self) -> Result<DirectorySource> {
        if !self.base_path.is_dir() {
            return Err(CliError::Store(format!(
                "Store directory {:?} does not exist. Pass --store or run 'molalign store set-path'.",
                self.base_path
            )));
        }
        Ok(DirectorySource::new(&self.base_path))
    }

    pub fn set_custom_path(path: &Path) -> Result<PathBuf> {
        let absolute = std::path::absolute(path)?;
        write_persisted_path(&Self::get_path_config_file()?, &absolute)?;
        Ok(absolute)
    }

    pub fn reset_path() -> Result<()> {
        if let Ok(config_path) = Self::get_path_config_file() {
            if config_path.exists() {
                fs::remove_file(config_path)?;
            }
        }
        Ok(())
    }

    fn determine_store_path() -> Result<PathBuf> {
        match Self::get_path_config_file() {
            Ok(config_path) => match read_persisted_path(&config_path)? {
                Some(path) => Ok(path),
                None => Self::get_default_store_path(),
            },
            Err(_) => Self::get_default_store_path(),
        }
    }

    fn project_dirs() -> Result<ProjectDirs> {
        ProjectDirs::from("org", "molalign", "molalign").ok_or_else(|| {
            CliError::Store("Could not determine the user's home directory.".to_string())
        })
    }

    fn get_path_config_file() -> Result<PathBuf> {
        Self::project_dirs().map(|dirs| dirs.config_dir().join(PATH_CONFIG_FILE_NAME))
    }

    fn get_default_store_path() -> Result<PathBuf> {
        Self::project_dirs().map(|dirs| dirs.data_dir().join("store"))
    }
}

fn read_persisted_path(config_file: &Path) -> Result<Option<PathBuf>> {
    if !config_file.exists() {
        return Ok(None);
    }
    let custom_path = fs::read_to_string(config_file)?.trim().to_string();
    if custom_path.is_empty() {
        warn!("Custom store path file is empty, falling back to default path.");
        return Ok(None);
    }
    Ok(Some(PathBuf::from(custom_path)))
}

fn write_persisted_path(config_file: &Path, path: &Path) -> Result<()> {
    let path_str = path.to_str().ok_or_else(|| {
        CliError::Argument(format!("Store path {:?} is not valid UTF-8.", path))
    })?;
    if let Some(parent) = config_file.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(config_file, path_str)?;
    Ok(())
}
