use std::{
    fs,
    io::{self, Read},
};

use nu_ansi_term::Color::{Blue, Cyan, Green, Yellow};
use tabled::{
    builder::Builder,
    settings::{themes::BorderCorrection, Panel, Style},
};
use tracing::info;
use yumrev_config::{config::Config, repository::Repository};
use yumrev_core::{
    command::RepoQueryCommand,
    error::ErrorContext,
    params::RepoQueryParams,
    parser::parse_output,
    revision::PackageRevision,
    QueryResult,
};

use crate::utils::Colored;

/// Where to point repoquery: a configured repository or an ad-hoc one.
pub enum RepoTarget {
    Configured(String),
    AdHoc { id: String, url: String },
}

impl RepoTarget {
    /// Picks the target from the `query` flags; `None` when neither form is complete.
    pub fn from_args(
        repo: Option<String>,
        repo_id: Option<String>,
        url: Option<String>,
    ) -> Option<Self> {
        match (repo, repo_id, url) {
            (Some(repo), _, _) => Some(Self::Configured(repo)),
            (None, Some(id), Some(url)) => Some(Self::AdHoc { id, url }),
            _ => None,
        }
    }
}

/// Resolves the target into query parameters.
///
/// Ad-hoc repositories go through the same validation as configured ones, so
/// an id containing `,` cannot leak into `--repofrompath`.
fn query_params(
    config: &Config,
    target: RepoTarget,
    package_spec: String,
) -> QueryResult<RepoQueryParams> {
    let params = match target {
        RepoTarget::Configured(id) => {
            RepoQueryParams::from_repository(config.require_repository(&id)?, package_spec)
        }
        RepoTarget::AdHoc { id, url } => {
            let repo = Repository::new(id, url);
            repo.validate()?;
            RepoQueryParams::from_repository(&repo, package_spec)
        }
    };
    Ok(params)
}

pub fn query_package(
    config: &Config,
    target: RepoTarget,
    package_spec: String,
    json: bool,
) -> QueryResult<()> {
    let params = query_params(config, target, package_spec)?;
    let revision = RepoQueryCommand::from_config(config, params)?.execute()?;
    print_revision(&revision, json)
}

fn read_captured(file: Option<String>) -> QueryResult<Vec<String>> {
    let content = match file.as_deref() {
        Some(path) if path != "-" => {
            fs::read_to_string(path).with_context(|| format!("reading {path}"))?
        }
        _ => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .with_context(|| "reading stdin".to_string())?;
            buffer
        }
    };

    Ok(content.lines().map(String::from).collect())
}

pub fn parse_captured(file: Option<String>, package_spec: &str, json: bool) -> QueryResult<()> {
    let lines = read_captured(file)?;
    let revision = parse_output(package_spec, &lines)?;
    print_revision(&revision, json)
}

fn print_revision(revision: &PackageRevision, json: bool) -> QueryResult<()> {
    if json {
        let out = serde_json::to_string_pretty(revision)?;
        println!("{out}");
        return Ok(());
    }

    let mut builder = Builder::new();
    builder.push_record(["Package".to_string(), Colored(Blue, revision.name()).to_string()]);
    builder.push_record([
        "Build Time".to_string(),
        Colored(Cyan, revision.timestamp().to_rfc3339()).to_string(),
    ]);
    builder.push_record([
        "Packager".to_string(),
        Colored(Green, revision.packager().unwrap_or("-")).to_string(),
    ]);
    builder.push_record([
        "Trackback URL".to_string(),
        Colored(Yellow, revision.trackback_url().unwrap_or("-")).to_string(),
    ]);
    for (key, value) in revision.data().iter() {
        builder.push_record([key.to_string(), value.to_string()]);
    }

    let table = builder
        .build()
        .with(Panel::header("Package Revision"))
        .with(Style::rounded())
        .with(BorderCorrection {})
        .to_string();

    info!("\n{table}");
    Ok(())
}
