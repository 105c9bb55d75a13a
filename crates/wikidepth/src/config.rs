//! Configuration loading.
//!
//! Settings come from a YAML file (`wikidepth.yaml` by default) and can be
//! overridden per run from the command line:
//!
//! ```yaml
//! database: ./data/wiki.sqlite
//! cache: ./data/subcategory_links_cache
//! output-dir: ./data
//! jobs: 4
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};

/// Name of the configuration file looked up in the working directory
pub const CONFIG_FILE_NAME: &str = "wikidepth.yaml";

/// Default path of the category database
pub const DEFAULT_DATABASE: &str = "./data/wiki.sqlite";

/// Default path of the subcategory edge-list cache
pub const DEFAULT_CACHE: &str = "./data/subcategory_links_cache";

/// Default directory for result files
pub const DEFAULT_OUTPUT_DIR: &str = "./data";

/// Default number of database worker threads
pub const DEFAULT_JOBS: usize = 4;

/// Runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields, default)]
pub struct Config {
    /// `SQLite` file holding the `page` and `categorylinks` tables
    pub database: PathBuf,

    /// Subcategory edge-list cache file
    pub cache: PathBuf,

    /// Directory receiving the subcategories and pages files
    pub output_dir: PathBuf,

    /// Worker threads (and database connections) for page queries
    pub jobs: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: PathBuf::from(DEFAULT_DATABASE),
            cache: PathBuf::from(DEFAULT_CACHE),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            jobs: DEFAULT_JOBS,
        }
    }
}

/// Command-line values that take precedence over the file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    /// `--database`
    pub database: Option<PathBuf>,
    /// `--cache`
    pub cache: Option<PathBuf>,
    /// `--output-dir`
    pub output_dir: Option<PathBuf>,
    /// `--jobs`
    pub jobs: Option<usize>,
}

impl Config {
    /// Load configuration from a YAML file.
    ///
    /// Keys missing from the file keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, or [`Error::Config`] if
    /// it is not valid configuration.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_yaml::from_str(&content)
            .map_err(|e| Error::Config(format!("{}: {e}", path.display())))
    }

    /// Save configuration to a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content =
            serde_yaml::to_string(self).map_err(|e| Error::Config(format!("YAML error: {e}")))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Find and load the configuration for a run.
    ///
    /// An explicit path must exist. Without one, `wikidepth.yaml` in `dir`
    /// is used if present, otherwise the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the explicit file is missing, or any
    /// error from [`Config::load`].
    pub fn resolve(explicit: Option<&Path>, dir: &Path) -> Result<Self> {
        if let Some(path) = explicit {
            if !path.is_file() {
                return Err(Error::Config(format!(
                    "config file not found: {}",
                    path.display()
                )));
            }
            debug!(path = %path.display(), "Loading configuration");
            return Self::load(path);
        }

        let implicit = dir.join(CONFIG_FILE_NAME);
        if implicit.is_file() {
            debug!(path = %implicit.display(), "Loading configuration");
            Self::load(&implicit)
        } else {
            debug!("No configuration file, using defaults");
            Ok(Self::default())
        }
    }

    /// Replace every field that has an override.
    #[must_use]
    pub fn with_overrides(mut self, overrides: Overrides) -> Self {
        if let Some(database) = overrides.database {
            self.database = database;
        }
        if let Some(cache) = overrides.cache {
            self.cache = cache;
        }
        if let Some(output_dir) = overrides.output_dir {
            self.output_dir = output_dir;
        }
        if let Some(jobs) = overrides.jobs {
            self.jobs = jobs;
        }
        self
    }

    /// Check that the configuration is usable.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if `jobs` is zero or a path is empty.
    pub fn validate(&self) -> Result<()> {
        if self.jobs == 0 {
            return Err(Error::Config("jobs must be at least 1".to_string()));
        }
        for (name, path) in [
            ("database", &self.database),
            ("cache", &self.cache),
            ("output-dir", &self.output_dir),
        ] {
            if path.as_os_str().is_empty() {
                return Err(Error::Config(format!("{name} path is empty")));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn defaults_match_documented_paths() {
        let config = Config::default();
        assert_eq!(config.database, Path::new("./data/wiki.sqlite"));
        assert_eq!(config.cache, Path::new("./data/subcategory_links_cache"));
        assert_eq!(config.output_dir, Path::new("./data"));
        assert_eq!(config.jobs, 4);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let config: Config =
            serde_yaml::from_str("database: /srv/enwiki.sqlite\njobs: 8\n").expect("parse");

        assert_eq!(config.database, Path::new("/srv/enwiki.sqlite"));
        assert_eq!(config.jobs, 8);
        assert_eq!(config.cache, Path::new(DEFAULT_CACHE));
    }

    #[test]
    fn kebab_case_output_dir() {
        let config: Config = serde_yaml::from_str("output-dir: out\n").expect("parse");
        assert_eq!(config.output_dir, Path::new("out"));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "host: localhost\n").expect("write config");

        let err = Config::load(&path).expect_err("unknown key");
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn save_then_load_preserves_values() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join(CONFIG_FILE_NAME);
        let config = Config {
            jobs: 2,
            ..Config::default()
        };

        config.save(&path).expect("save");
        assert_eq!(Config::load(&path).expect("load"), config);
    }

    #[test]
    fn explicit_missing_file_is_fatal() {
        let dir = TempDir::new().expect("temp dir");
        let missing = dir.path().join("nope.yaml");

        let err = Config::resolve(Some(&missing), dir.path()).expect_err("missing");
        assert!(err.to_string().contains("nope.yaml"));
    }

    #[test]
    fn implicit_file_is_used_when_present() {
        let dir = TempDir::new().expect("temp dir");
        std::fs::write(dir.path().join(CONFIG_FILE_NAME), "jobs: 9\n").expect("write");

        let config = Config::resolve(None, dir.path()).expect("resolve");
        assert_eq!(config.jobs, 9);
    }

    #[test]
    fn no_file_means_defaults() {
        let dir = TempDir::new().expect("temp dir");
        let config = Config::resolve(None, dir.path()).expect("resolve");
        assert_eq!(config, Config::default());
    }

    #[test]
    fn overrides_win() {
        let config = Config::default().with_overrides(Overrides {
            cache: Some(PathBuf::from("/tmp/links")),
            jobs: Some(1),
            ..Overrides::default()
        });

        assert_eq!(config.cache, Path::new("/tmp/links"));
        assert_eq!(config.jobs, 1);
        assert_eq!(config.database, Path::new(DEFAULT_DATABASE));
    }

    #[test]
    fn zero_jobs_is_invalid() {
        let config = Config {
            jobs: 0,
            ..Config::default()
        };
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn empty_path_is_invalid() {
        let config = Config {
            output_dir: PathBuf::new(),
            ..Config::default()
        };
        let err = config.validate().expect_err("empty path");
        assert!(err.to_string().contains("output-dir"));
    }
}
