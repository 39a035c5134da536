use documented::{Documented, DocumentedFields};
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// A yum/dnf repository that packages are queried from.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, Documented, DocumentedFields)]
pub struct Repository {
    /// Identifier passed to repoquery as `--repoid`.
    /// Queries against the same id never run concurrently.
    pub id: String,

    /// Repository path or URL handed to repoquery via `--repofrompath`.
    pub url: String,

    /// URL shown in error messages instead of `url`.
    /// Default: same as `url`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_url: Option<String>,

    /// Whether the repository is enabled.
    /// Default: true
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
}

impl Repository {
    pub fn new(id: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            url: url.into(),
            display_url: None,
            enabled: None,
        }
    }

    /// Parses the `ID=URL` form accepted on the command line.
    pub fn from_spec(spec: &str) -> Result<Self> {
        let (id, url) = spec
            .split_once('=')
            .ok_or_else(|| ConfigError::InvalidRepositorySpec(spec.to_string()))?;
        let repo = Self::new(id.trim(), url.trim());
        repo.validate()?;
        Ok(repo)
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.unwrap_or(true)
    }

    pub fn display_url(&self) -> &str {
        self.display_url.as_deref().unwrap_or(&self.url)
    }

    /// Checks the fields that end up on the repoquery command line.
    pub fn validate(&self) -> Result<()> {
        if self.id.is_empty() || self.id.contains(|c: char| c.is_whitespace() || c == ',') {
            return Err(ConfigError::InvalidRepository(self.id.clone()));
        }
        if self.url.trim().is_empty() {
            return Err(ConfigError::InvalidRepositoryUrl(self.id.clone()));
        }
        Ok(())
    }
}
