use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Diagnostic, Debug)]
pub enum PathError {
    #[error("Failed to get current directory: {source}")]
    #[diagnostic(code(yumrev_utils::path::current_dir))]
    CurrentDir { source: std::io::Error },

    #[error("Path is empty")]
    #[diagnostic(code(yumrev_utils::path::empty))]
    Empty,

    #[error("Environment variable `{var}` not set in `{input}`")]
    #[diagnostic(
        code(yumrev_utils::path::missing_env_var),
        help("Export `{var}` or use an absolute path")
    )]
    MissingEnvVar { var: String, input: String },

    #[error("Unclosed variable expression starting at `{input}`")]
    #[diagnostic(code(yumrev_utils::path::unclosed_variable))]
    UnclosedVariable { input: String },
}

#[derive(Error, Diagnostic, Debug)]
pub enum LockError {
    #[error("Lock for `{0}` was poisoned by a panicking holder")]
    #[diagnostic(
        code(yumrev_utils::lock::poisoned),
        help("This is an internal error, please report it")
    )]
    Poisoned(String),
}

#[derive(Error, Diagnostic, Debug)]
pub enum UtilsError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Path(#[from] PathError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Lock(#[from] LockError),
}

pub type LockResult<T> = std::result::Result<T, LockError>;
pub type PathResult<T> = std::result::Result<T, PathError>;

pub type UtilsResult<T> = std::result::Result<T, UtilsError>;
