use crate::error::{CliError, Result};
use crate::utils::parser::{self, ParseError};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileAlignmentConfig {
    pub heavy_atoms_only: Option<bool>,
    pub svd_epsilon: Option<f64>,
    pub svd_max_iterations: Option<usize>,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileOutputConfig {
    pub precision: Option<usize>,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileStoreConfig {
    pub path: Option<PathBuf>,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileConfig {
    pub alignment: Option<FileAlignmentConfig>,
    pub output: Option<FileOutputConfig>,
    pub store: Option<FileStoreConfig>,
}

impl FileConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })?;
        toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }

    pub fn apply_set_values(&mut self, set_values: &[String]) -> Result<()> {
        for kv_pair in set_values {
            self.apply_set_value(kv_pair)
                .map_err(|e| CliError::Config(e.to_string()))?;
        }
        Ok(())
    }

    fn apply_set_value(&mut self, kv_pair: &str) -> std::result::Result<(), ParseError> {
        let (key, value) = parser::parse_key_value(kv_pair)?;
        debug!("Applying override {} = {}", key, value);

        match key {
            "alignment.heavy-atoms-only" => {
                self.alignment
                    .get_or_insert_with(Default::default)
                    .heavy_atoms_only = Some(parser::parse_value(key, value, "boolean")?);
            }
            "alignment.svd-epsilon" => {
                self.alignment
                    .get_or_insert_with(Default::default)
                    .svd_epsilon = Some(parser::parse_value(key, value, "float")?);
            }
            "alignment.svd-max-iterations" => {
                self.alignment
                    .get_or_insert_with(Default::default)
                    .svd_max_iterations = Some(parser::parse_value(key, value, "integer")?);
            }
            "output.precision" => {
                self.output.get_or_insert_with(Default::default).precision =
                    Some(parser::parse_value(key, value, "integer")?);
            }
            "store.path" => {
                self.store.get_or_insert_with(Default::default).path = Some(PathBuf::from(value));
            }
            _ => {
                return Err(ParseError::UnknownKey(key.to_string()));
            }
        }
        Ok(())
    }
}
