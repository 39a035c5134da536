//! Error types for yumrev-core.

use miette::Diagnostic;
use thiserror::Error;
use yumrev_config::error::ConfigError;
use yumrev_utils::error::LockError;

/// Failures while querying a repository or decoding what repoquery printed.
#[derive(Error, Diagnostic, Debug)]
pub enum QueryError {
    #[error(
        "Error while querying repository with path '{repo_url}' and package spec '{package_spec}'. {stderr}"
    )]
    #[diagnostic(
        code(yumrev::query::execution),
        help("Check that the repository is reachable and the package spec exists")
    )]
    Execution {
        repo_url: String,
        package_spec: String,
        exit_code: i32,
        stderr: String,
    },

    #[error(
        "Given package spec ({package_spec}) resolves to more than one file on the repository: {}",
        .files.join(", ")
    )]
    #[diagnostic(
        code(yumrev::query::ambiguous_package),
        help("Narrow the package spec with a version, release or architecture")
    )]
    AmbiguousPackage {
        package_spec: String,
        files: Vec<String>,
    },

    #[error("Failed to parse build time `{token}` according to format: {expected}")]
    #[diagnostic(code(yumrev::query::build_time))]
    UnparseableTimestamp {
        token: String,
        expected: String,
        #[source]
        source: Option<chrono::ParseError>,
    },

    #[error("Malformed repoquery output, expected 9 fields but found {found}: {line}")]
    #[diagnostic(
        code(yumrev::query::malformed_output),
        help("The repoquery version in use may not support the requested query tags")
    )]
    MalformedOutput { line: String, found: usize },

    #[error("Failed to execute `{program}`")]
    #[diagnostic(
        code(yumrev::query::spawn),
        help("Install dnf-utils/yum-utils or point `repoquery_path` at the binary")
    )]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Error while {action}")]
    #[diagnostic(code(yumrev::io), help("Check file permissions"))]
    IoError {
        action: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize package revision: {0}")]
    #[diagnostic(code(yumrev::query::json))]
    JsonError(#[from] serde_json::Error),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Lock(#[from] LockError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),
}

/// Trait for adding context to IO errors.
pub trait ErrorContext<T> {
    fn with_context<C>(self, context: C) -> std::result::Result<T, QueryError>
    where
        C: FnOnce() -> String;
}

impl<T> ErrorContext<T> for std::io::Result<T> {
    fn with_context<C>(self, context: C) -> std::result::Result<T, QueryError>
    where
        C: FnOnce() -> String,
    {
        self.map_err(|err| {
            QueryError::IoError {
                action: context(),
                source: err,
            }
        })
    }
}
