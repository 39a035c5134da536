use miette::Diagnostic;
use thiserror::Error;
use yumrev_utils::error::{PathError, UtilsError};

#[derive(Error, Diagnostic, Debug)]
pub enum ConfigError {
    #[error("TOML serialization error: {0}")]
    #[diagnostic(
        code(yumrev_config::toml_serialize),
        help("Check your configuration structure for invalid values")
    )]
    TomlSerError(#[from] toml::ser::Error),

    #[error("TOML deserialization error: {0}")]
    #[diagnostic(
        code(yumrev_config::toml_deserialize),
        help("Check your config.toml syntax and structure")
    )]
    TomlDeError(#[from] toml::de::Error),

    #[error("Configuration file already exists")]
    #[diagnostic(
        code(yumrev_config::already_exists),
        help("Remove the existing config file or use a different location")
    )]
    ConfigAlreadyExists,

    #[error("Invalid repository id: {0}")]
    #[diagnostic(
        code(yumrev_config::invalid_repository),
        help("Repository ids must be non-empty and may not contain whitespace or ','")
    )]
    InvalidRepository(String),

    #[error("Invalid repository URL for '{0}'")]
    #[diagnostic(
        code(yumrev_config::invalid_repository_url),
        help("Set `url` to a repository path or URL understood by repoquery")
    )]
    InvalidRepositoryUrl(String),

    #[error("Invalid repository spec: {0}")]
    #[diagnostic(
        code(yumrev_config::invalid_repository_spec),
        help("Use the form ID=URL, e.g. 'epel=https://dl.fedoraproject.org/pub/epel/9/Everything/x86_64/'")
    )]
    InvalidRepositorySpec(String),

    #[error("Duplicate repository id: {0}")]
    #[diagnostic(
        code(yumrev_config::duplicate_repo),
        help("Each repository must have a unique id")
    )]
    DuplicateRepositoryName(String),

    #[error("Repository '{0}' is not configured or disabled")]
    #[diagnostic(
        code(yumrev_config::unknown_repo),
        help("Add the repository to your config file or pass --repo-id and --url")
    )]
    UnknownRepository(String),

    #[error("repoquery_path is empty")]
    #[diagnostic(
        code(yumrev_config::empty_repoquery_path),
        help("Remove the key to use `repoquery` from PATH")
    )]
    EmptyRepoqueryPath,

    #[error("latest_limit must be at least 1, got {0}")]
    #[diagnostic(
        code(yumrev_config::invalid_latest_limit),
        help("Remove the key to query only the newest build")
    )]
    InvalidLatestLimit(u32),

    #[error("IO error: {0}")]
    #[diagnostic(code(yumrev_config::io))]
    IoError(#[from] std::io::Error),

    #[error(transparent)]
    #[diagnostic(code(yumrev_config::utils))]
    Utils(#[from] UtilsError),

    #[error("Failed to parse TOML: {0}")]
    #[diagnostic(code(yumrev_config::toml))]
    Toml(#[from] toml_edit::TomlError),

    #[error("Encountered unexpected TOML item: {0}")]
    #[diagnostic(code(yumrev_config::unexpected_toml_item))]
    UnexpectedTomlItem(String),

    #[error("Failed to annotate first table in array: {0}")]
    #[diagnostic(code(yumrev_config::annotate_first_table))]
    AnnotateFirstTable(String),
}

impl From<PathError> for ConfigError {
    fn from(err: PathError) -> Self {
        Self::Utils(UtilsError::Path(err))
    }
}

pub type Result<T> = std::result::Result<T, ConfigError>;
