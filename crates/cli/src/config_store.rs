//! YAML file backed configuration store.

use std::fs;
use std::path::{Path, PathBuf};

use demoslides_core::{ConfigStore, Configuration, Error, Result};

/// Configuration file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "demoslides.yml";

pub struct YamlConfigStore {
    path: PathBuf,
}

impl YamlConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Write a configuration for the first time. Never replaces an existing file.
    pub fn create(&mut self, config: &Configuration) -> Result<()> {
        if self.exists() {
            return Err(Error::ConfigStoreError(format!(
                "{} already exists. Remove it to create a new one.",
                self.path.display()
            )));
        }
        self.save_config(config)
    }
}

impl ConfigStore for YamlConfigStore {
    fn load_config(&mut self) -> Result<Option<Configuration>> {
        if !self.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&self.path)?;
        let config: Configuration = serde_yml::from_str(&content).map_err(|e| {
            Error::ConfigStoreError(format!("Failed to parse {}: {}", self.path.display(), e))
        })?;

        log::debug!("Loaded configuration from {}", self.path.display());
        Ok(Some(config))
    }

    /// Save through a temporary file and rename, so readers never see a partial file.
    fn save_config(&mut self, config: &Configuration) -> Result<()> {
        let content = serde_yml::to_string(config)
            .map_err(|e| Error::ConfigStoreError(format!("Failed to serialize configuration: {}", e)))?;

        let temp_path = self.path.with_extension("yml.tmp");
        fs::write(&temp_path, content)?;
        fs::rename(&temp_path, &self.path)?;

        log::debug!("Saved configuration to {}", self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use demoslides_core::{Category, Color};

    fn temp_path(name: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("demoslides-{}-{}.yml", name, std::process::id()));
        let _ = fs::remove_file(&path);
        path
    }

    #[test]
    fn test_missing_file_loads_none() {
        let mut store = YamlConfigStore::new(temp_path("missing"));
        assert!(store.load_config().unwrap().is_none());
    }

    #[test]
    fn test_round_trip() {
        let path = temp_path("round-trip");
        let mut store = YamlConfigStore::new(&path);

        let mut config = Configuration::default();
        config.items_per_page = 4;
        config.categories.insert(
            "Payments".to_string(),
            Category::new(vec!["Checkout".to_string()], Color::from_components(200, 10, 10, 255)),
        );
        store.save_config(&config).unwrap();

        let loaded = store.load_config().unwrap().unwrap();
        assert_eq!(loaded, config);

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_create_refuses_overwrite() {
        let path = temp_path("create");
        let mut store = YamlConfigStore::new(&path);

        store.create(&Configuration::default()).unwrap();
        assert!(matches!(
            store.create(&Configuration::default()),
            Err(Error::ConfigStoreError(_))
        ));

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_invalid_yaml_is_reported() {
        let path = temp_path("invalid");
        fs::write(&path, "items_per_page: [not, a, number]").unwrap();

        let mut store = YamlConfigStore::new(&path);
        assert!(matches!(store.load_config(), Err(Error::ConfigStoreError(_))));

        fs::remove_file(&path).unwrap();
    }
}
