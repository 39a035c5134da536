use yumrev_config::repository::Repository;

/// Inputs for one repoquery run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RepoQueryParams {
    repo_id: String,
    repo_url: String,
    display_url: String,
    package_spec: String,
}

impl RepoQueryParams {
    pub fn new(
        repo_id: impl Into<String>,
        repo_url: impl Into<String>,
        package_spec: impl Into<String>,
    ) -> Self {
        let repo_url = repo_url.into();
        Self {
            repo_id: repo_id.into(),
            display_url: repo_url.clone(),
            repo_url,
            package_spec: package_spec.into(),
        }
    }

    pub fn from_repository(repo: &Repository, package_spec: impl Into<String>) -> Self {
        Self::new(&repo.id, &repo.url, package_spec).with_display_url(repo.display_url())
    }

    pub fn with_display_url(mut self, display_url: impl Into<String>) -> Self {
        self.display_url = display_url.into();
        self
    }

    pub fn repo_id(&self) -> &str {
        &self.repo_id
    }

    pub fn repo_url(&self) -> &str {
        &self.repo_url
    }

    pub fn display_url(&self) -> &str {
        &self.display_url
    }

    pub fn package_spec(&self) -> &str {
        &self.package_spec
    }

    /// Value of `--repofrompath`: `<repoid>,<path>`.
    pub fn repo_from_path(&self) -> String {
        format!("{},{}", self.repo_id, self.repo_url)
    }
}
