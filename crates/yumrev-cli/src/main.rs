use std::{env, path::PathBuf};

use clap::Parser;
use cli::{Args, Commands};
use logging::setup_logging;
use query::{parse_captured, query_package, RepoTarget};
use tracing::info;
use yumrev_config::config::{self, generate_default_config, get_config, set_config_path};
use yumrev_core::{error::QueryError, QueryResult};

mod cli;
mod logging;
mod query;
mod utils;

fn handle_cli() -> QueryResult<()> {
    let args = Args::parse();

    setup_logging(&args);

    if args.no_color {
        utils::set_color(false);
    }

    if let Some(ref c) = args.config {
        let path = PathBuf::from(c);
        let path = if path.is_absolute() {
            path
        } else {
            env::current_dir()
                .map_err(|err| {
                    QueryError::IoError {
                        action: "retrieving current directory".into(),
                        source: err,
                    }
                })?
                .join(path)
        };
        set_config_path(path);
    }

    match args.command {
        Commands::DefConfig {
            repositories,
        } => {
            generate_default_config(repositories.as_slice())?;
        }
        Commands::Parse {
            file,
            spec,
        } => parse_captured(file, &spec, args.json)?,
        command => {
            config::init()?;
            let config = get_config();

            match command {
                Commands::Query {
                    package_spec,
                    repo,
                    repo_id,
                    url,
                } => {
                    // clap enforces one of the two forms
                    let Some(target) = RepoTarget::from_args(repo, repo_id, url) else {
                        unreachable!()
                    };
                    query_package(&config, target, package_spec, args.json)?;
                }
                Commands::Config => {
                    let content = toml::to_string_pretty(&config)
                        .map_err(yumrev_config::error::ConfigError::from)?;
                    info!("{}", content);
                }
                _ => unreachable!(),
            }
        }
    }

    Ok(())
}

fn main() {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .build(),
        )
    }))
    .ok();

    if let Err(err) = handle_cli() {
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(1);
    }
}
