use std::{
    collections::HashSet,
    fs,
    path::PathBuf,
    sync::{LazyLock, RwLock},
};

use documented::{Documented, DocumentedFields};
use serde::{Deserialize, Serialize};
use toml_edit::DocumentMut;
use tracing::{debug, info};
use yumrev_utils::path::{resolve_path, xdg_config_home};

use crate::{
    annotations::{annotate_toml_array_of_tables, annotate_toml_table},
    error::{ConfigError, Result},
    repository::Repository,
};

pub const DEFAULT_REPOQUERY: &str = "repoquery";
pub const DEFAULT_LATEST_LIMIT: u32 = 1;

/// Application's configuration
#[derive(Clone, Debug, Deserialize, Serialize, Documented, DocumentedFields)]
pub struct Config {
    /// Path to the `repoquery` executable.
    /// Bare names are looked up in PATH.
    /// Default: "repoquery"
    pub repoquery_path: Option<String>,

    /// Number of latest builds repoquery reports per package (`--latest-limit`).
    /// Values above 1 make most queries ambiguous.
    /// Default: 1
    pub latest_limit: Option<u32>,

    /// List of configured repositories.
    #[serde(default)]
    pub repositories: Vec<Repository>,
}

pub static CONFIG: LazyLock<RwLock<Option<Config>>> = LazyLock::new(|| RwLock::new(None));

pub static CONFIG_PATH: LazyLock<RwLock<PathBuf>> = LazyLock::new(|| {
    RwLock::new(match std::env::var("YUMREV_CONFIG") {
        Ok(path_str) => PathBuf::from(path_str),
        Err(_) => xdg_config_home().join("yumrev").join("config.toml"),
    })
});

fn config_path() -> PathBuf {
    CONFIG_PATH
        .read()
        .map(|path| path.to_path_buf())
        .unwrap_or_else(|poisoned| poisoned.into_inner().to_path_buf())
}

/// Overrides the config file location for the rest of the process.
pub fn set_config_path(path: PathBuf) {
    let mut config_path = CONFIG_PATH
        .write()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    *config_path = path;
}

/// Loads the config file into the global slot.
pub fn init() -> Result<()> {
    let config = Config::new()?;
    let mut global_config = CONFIG
        .write()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    *global_config = Some(config);
    Ok(())
}

/// Returns the loaded config, or the default one when `init` was never called.
pub fn get_config() -> Config {
    let global_config = CONFIG
        .read()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    global_config.clone().unwrap_or_else(Config::empty)
}

impl Config {
    fn empty() -> Self {
        Self {
            repoquery_path: Some(DEFAULT_REPOQUERY.to_string()),
            latest_limit: Some(DEFAULT_LATEST_LIMIT),
            repositories: Vec::new(),
        }
    }

    /// Builds the default configuration, seeded with `ID=URL` repository specs.
    pub fn default_config<T: AsRef<str>>(repos: &[T]) -> Result<Self> {
        let repositories = repos
            .iter()
            .map(|spec| Repository::from_spec(spec.as_ref()))
            .collect::<Result<Vec<_>>>()?;

        let mut config = Self {
            repositories,
            ..Self::empty()
        };
        config.resolve()?;
        Ok(config)
    }

    /// Creates a new configuration by loading it from the configuration file.
    /// If the configuration file is not found, it uses the default configuration.
    pub fn new() -> Result<Self> {
        let config_path = config_path();

        let mut config: Config = match fs::read_to_string(&config_path) {
            Ok(content) => toml::from_str(&content)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(
                    "no config at {}, using defaults",
                    config_path.display()
                );
                Self::empty()
            }
            Err(err) => return Err(ConfigError::IoError(err)),
        };

        config.resolve()?;

        Ok(config)
    }

    pub fn resolve(&mut self) -> Result<()> {
        match self.repoquery_path.as_deref() {
            None => self.repoquery_path = Some(DEFAULT_REPOQUERY.to_string()),
            Some(path) if path.trim().is_empty() => return Err(ConfigError::EmptyRepoqueryPath),
            Some(_) => {}
        }

        match self.latest_limit {
            None => self.latest_limit = Some(DEFAULT_LATEST_LIMIT),
            Some(0) => return Err(ConfigError::InvalidLatestLimit(0)),
            Some(_) => {}
        }

        let mut seen_repos = HashSet::new();

        for repo in &mut self.repositories {
            repo.validate()?;
            if !seen_repos.insert(&repo.id) {
                return Err(ConfigError::DuplicateRepositoryName(repo.id.clone()));
            }
            repo.enabled.get_or_insert(true);
        }

        Ok(())
    }

    /// Returns the executable to spawn for queries.
    ///
    /// `YUMREV_REPOQUERY` overrides the config. Values containing a path
    /// separator are resolved; bare names are left for PATH lookup.
    pub fn get_repoquery_path(&self) -> Result<PathBuf> {
        let value = match std::env::var("YUMREV_REPOQUERY") {
            Ok(env_path) => env_path,
            Err(_) => {
                self.repoquery_path
                    .clone()
                    .unwrap_or_else(|| DEFAULT_REPOQUERY.to_string())
            }
        };

        if value.contains('/') || value.starts_with('~') {
            Ok(resolve_path(&value)?)
        } else {
            Ok(PathBuf::from(value))
        }
    }

    pub fn get_latest_limit(&self) -> u32 {
        self.latest_limit.unwrap_or(DEFAULT_LATEST_LIMIT)
    }

    pub fn get_repository(&self, id: &str) -> Option<&Repository> {
        self.repositories
            .iter()
            .find(|repo| repo.id == id && repo.is_enabled())
    }

    /// Like [`Config::get_repository`], but a missing repository is an error.
    pub fn require_repository(&self, id: &str) -> Result<&Repository> {
        self.get_repository(id)
            .ok_or_else(|| ConfigError::UnknownRepository(id.to_string()))
    }

    pub fn to_annotated_document(&self) -> Result<DocumentMut> {
        let toml_string = toml::to_string_pretty(self)?;
        let mut doc = toml_string.parse::<DocumentMut>()?;

        annotate_toml_table::<Config>(doc.as_table_mut(), true)?;

        if let Some(repositories_item) = doc.get_mut("repositories") {
            if let Some(repositories_array) = repositories_item.as_array_of_tables_mut() {
                annotate_toml_array_of_tables::<Repository>(repositories_array)?;
            }
        }

        Ok(doc)
    }
}

/// Writes an annotated default config to the configured path.
pub fn generate_default_config<T: AsRef<str>>(repos: &[T]) -> Result<PathBuf> {
    let config_path = config_path();

    if config_path.exists() {
        return Err(ConfigError::ConfigAlreadyExists);
    }

    let def_config = Config::default_config(repos)?;
    let annotated_doc = def_config.to_annotated_document()?;

    if let Some(parent) = config_path.parent() {
        fs::create_dir_all(parent)?;
    }

    fs::write(&config_path, annotated_doc.to_string())?;
    info!(
        "Default configuration file generated with documentation at: {}",
        config_path.display()
    );
    Ok(config_path)
}

#[cfg(test)]
mod tests {
    use serial_test::serial;

    use super::*;
    use crate::test_utils::with_env;

    #[test]
    fn test_default_config_creation() {
        let config = Config::default_config::<&str>(&[]).unwrap();

        assert_eq!(config.repoquery_path.as_deref(), Some("repoquery"));
        assert_eq!(config.latest_limit, Some(1));
        assert!(config.repositories.is_empty());
    }

    #[test]
    fn test_default_config_with_repos() {
        let config =
            Config::default_config(&["base=file:///srv/base", "epel=https://example.com/epel"])
                .unwrap();

        assert_eq!(config.repositories.len(), 2);
        assert_eq!(config.repositories[0].enabled, Some(true));
        assert!(config.get_repository("epel").is_some());
    }

    #[test]
    fn test_config_resolve_duplicate_repo() {
        let result = Config::default_config(&["dup=file:///a", "dup=file:///b"]);
        assert!(matches!(
            result,
            Err(ConfigError::DuplicateRepositoryName(ref id)) if id == "dup"
        ));
    }

    #[test]
    fn test_config_resolve_empty_repoquery_path() {
        let mut config = Config::default_config::<&str>(&[]).unwrap();
        config.repoquery_path = Some("  ".into());
        assert!(matches!(
            config.resolve(),
            Err(ConfigError::EmptyRepoqueryPath)
        ));

        config.repoquery_path = None;
        config.resolve().unwrap();
        assert_eq!(config.repoquery_path.as_deref(), Some("repoquery"));
    }

    #[test]
    fn test_config_resolve_latest_limit() {
        let mut config = Config::default_config::<&str>(&[]).unwrap();

        config.latest_limit = None;
        config.resolve().unwrap();
        assert_eq!(config.latest_limit, Some(1));
        assert_eq!(config.get_latest_limit(), 1);

        config.latest_limit = Some(0);
        assert!(matches!(
            config.resolve(),
            Err(ConfigError::InvalidLatestLimit(0))
        ));

        config.latest_limit = Some(3);
        config.resolve().unwrap();
        assert_eq!(config.get_latest_limit(), 3);
    }

    #[test]
    fn test_get_repository_skips_disabled() {
        let mut config = Config::default_config(&["base=file:///srv/base"]).unwrap();
        config.repositories[0].enabled = Some(false);

        assert!(config.get_repository("base").is_none());
        assert!(matches!(
            config.require_repository("base"),
            Err(ConfigError::UnknownRepository(_))
        ));
    }

    #[test]
    fn test_config_deserialize_minimal() {
        let mut config: Config = toml::from_str(
            r#"
            [[repositories]]
            id = "base"
            url = "file:///srv/base"
            display_url = "https://mirror.example.com/base"
            "#,
        )
        .unwrap();
        config.resolve().unwrap();

        let repo = config.require_repository("base").unwrap();
        assert_eq!(repo.display_url(), "https://mirror.example.com/base");
        assert_eq!(config.repoquery_path.as_deref(), Some("repoquery"));
        assert_eq!(config.get_latest_limit(), 1);
    }

    #[test]
    fn test_config_serialization_roundtrip() {
        let config = Config::default_config(&["base=file:///srv/base"]).unwrap();
        let serialized = toml::to_string(&config).unwrap();
        let deserialized: Config = toml::from_str(&serialized).unwrap();
        assert_eq!(deserialized.repositories, config.repositories);
    }

    #[test]
    #[serial]
    fn test_repoquery_path_env_override() {
        let config = Config::default_config::<&str>(&[]).unwrap();

        with_env(vec![("YUMREV_REPOQUERY", "/opt/dnf/bin/repoquery")], || {
            assert_eq!(
                config.get_repoquery_path().unwrap(),
                PathBuf::from("/opt/dnf/bin/repoquery")
            );
        });

        std::env::remove_var("YUMREV_REPOQUERY");
        assert_eq!(
            config.get_repoquery_path().unwrap(),
            PathBuf::from("repoquery")
        );
    }

    #[test]
    #[serial]
    fn test_load_and_generate_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("yumrev").join("config.toml");
        set_config_path(path.clone());

        let config = Config::new().unwrap();
        assert!(config.repositories.is_empty());

        let written = generate_default_config(&["base=file:///srv/base"]).unwrap();
        assert_eq!(written, path);
        assert!(matches!(
            generate_default_config::<&str>(&[]),
            Err(ConfigError::ConfigAlreadyExists)
        ));

        init().unwrap();
        assert!(get_config().get_repository("base").is_some());
    }
}
