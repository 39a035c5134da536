use std::{
    path::PathBuf,
    sync::{Arc, LazyLock},
};

use tracing::debug;
use yumrev_config::config::{Config, DEFAULT_LATEST_LIMIT, DEFAULT_REPOQUERY};
use yumrev_utils::lock::KeyedLock;

use crate::{
    constants::query_format,
    params::RepoQueryParams,
    parser::parse_process_output,
    process::{ProcessRunner, SystemProcessRunner},
    revision::PackageRevision,
    QueryResult,
};

/// Locks shared by every command in the process, keyed by repository id.
pub static REPOQUERY_LOCKS: LazyLock<Arc<KeyedLock>> =
    LazyLock::new(|| Arc::new(KeyedLock::new()));

/// Asks repoquery for the latest build matching a package spec.
pub struct RepoQueryCommand {
    runner: Arc<dyn ProcessRunner>,
    locks: Arc<KeyedLock>,
    program: PathBuf,
    latest_limit: u32,
    params: RepoQueryParams,
}

impl RepoQueryCommand {
    pub fn new(params: RepoQueryParams) -> Self {
        Self::with_runner(Arc::new(SystemProcessRunner), params)
    }

    pub fn with_runner(runner: Arc<dyn ProcessRunner>, params: RepoQueryParams) -> Self {
        Self {
            runner,
            locks: Arc::clone(&REPOQUERY_LOCKS),
            program: PathBuf::from(DEFAULT_REPOQUERY),
            latest_limit: DEFAULT_LATEST_LIMIT,
            params,
        }
    }

    /// Builds a command using the executable and latest limit configured in `config`.
    pub fn from_config(config: &Config, params: RepoQueryParams) -> QueryResult<Self> {
        Ok(Self::new(params)
            .with_program(config.get_repoquery_path()?)
            .with_latest_limit(config.get_latest_limit()))
    }

    pub fn with_program(mut self, program: impl Into<PathBuf>) -> Self {
        self.program = program.into();
        self
    }

    pub fn with_latest_limit(mut self, latest_limit: u32) -> Self {
        self.latest_limit = latest_limit;
        self
    }

    /// Uses a private lock registry instead of [`REPOQUERY_LOCKS`].
    pub fn with_locks(mut self, locks: Arc<KeyedLock>) -> Self {
        self.locks = locks;
        self
    }

    pub fn params(&self) -> &RepoQueryParams {
        &self.params
    }

    pub fn command_line(&self) -> Vec<String> {
        vec![
            self.program.to_string_lossy().into_owned(),
            format!("--latest-limit={}", self.latest_limit),
            format!("--repofrompath={}", self.params.repo_from_path()),
            format!("--repoid={}", self.params.repo_id()),
            "-q".to_string(),
            self.params.package_spec().to_string(),
            "--qf".to_string(),
            query_format(),
        ]
    }

    /// Runs repoquery and parses its output.
    ///
    /// Only the process run holds the repository lock; parsing happens after
    /// it is released.
    pub fn execute(&self) -> QueryResult<PackageRevision> {
        let command = self.command_line();
        debug!("running {}", command.join(" "));

        let output = self
            .locks
            .with_lock(self.params.repo_id(), || self.runner.execute(&command))??;

        parse_process_output(&self.params, &output)
    }
}
