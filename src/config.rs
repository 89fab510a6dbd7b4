use anyhow::{Context, Result};
use std::path::PathBuf;

use crate::store::{StoreConfig, ValidationMode};

pub(crate) const DATA_ENV: &str = "SPENDBOOK_DATA";
pub(crate) const VALIDATION_ENV: &str = "SPENDBOOK_VALIDATION";

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Config {
    pub(crate) data_path: PathBuf,
    pub(crate) validation: ValidationMode,
}

impl Config {
    /// Read configuration from the environment, falling back to the
    /// platform data directory.
    pub(crate) fn load() -> Result<Self> {
        Self::from_values(
            std::env::var(DATA_ENV).ok(),
            std::env::var(VALIDATION_ENV).ok(),
        )
    }

    fn from_values(data_path: Option<String>, validation: Option<String>) -> Result<Self> {
        let data_path = match data_path.filter(|p| !p.trim().is_empty()) {
            Some(p) => PathBuf::from(crate::run::shellexpand(p.trim())),
            None => default_data_path()?,
        };

        let validation = match validation.as_deref().map(str::trim) {
            None | Some("") => ValidationMode::default(),
            Some(v) => ValidationMode::parse(v).with_context(|| {
                format!("Invalid {VALIDATION_ENV} '{v}' (expected 'lenient' or 'strict')")
            })?,
        };

        Ok(Self {
            data_path,
            validation,
        })
    }

    pub(crate) fn store_config(&self) -> StoreConfig {
        StoreConfig {
            validation: self.validation,
        }
    }
}

fn default_data_path() -> Result<PathBuf> {
    let proj_dirs = directories::ProjectDirs::from("com", "spendbook", "Spendbook")
        .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
    let data_dir = proj_dirs.data_dir();
    std::fs::create_dir_all(data_dir)
        .with_context(|| format!("Failed to create data directory: {}", data_dir.display()))?;
    Ok(data_dir.join("spendbook.db"))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn test_explicit_values() {
        let config =
            Config::from_values(Some("/tmp/books.db".into()), Some("strict".into())).unwrap();
        assert_eq!(config.data_path, PathBuf::from("/tmp/books.db"));
        assert_eq!(config.validation, ValidationMode::Strict);
        assert_eq!(config.store_config().validation, ValidationMode::Strict);
    }

    #[test]
    fn test_validation_defaults_to_lenient() {
        let config = Config::from_values(Some("/tmp/books.db".into()), None).unwrap();
        assert_eq!(config.validation, ValidationMode::Lenient);

        let blank = Config::from_values(Some("/tmp/books.db".into()), Some(" ".into())).unwrap();
        assert_eq!(blank.validation, ValidationMode::Lenient);
    }

    #[test]
    fn test_invalid_validation_mode() {
        let err = Config::from_values(Some("/tmp/books.db".into()), Some("paranoid".into()))
            .unwrap_err();
        assert!(err.to_string().contains("paranoid"));
    }

    #[test]
    fn test_tilde_expansion() {
        let config = Config::from_values(Some("~/books.db".into()), None).unwrap();
        assert!(config.data_path.ends_with("books.db"));
        assert!(!config.data_path.starts_with("~"));
    }
}
