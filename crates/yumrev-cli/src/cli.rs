use clap::{ArgAction, Parser, Subcommand, ValueHint};

#[derive(Parser)]
#[command(
    author,
    version,
    about,
    help_template = "{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}",
    arg_required_else_help = true
)]
pub struct Args {
    /// Set output verbosity
    #[arg(short = 'v', long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress outputs
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output as json
    #[arg(short, long, global = true)]
    pub json: bool,

    /// Disable colors in output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Provide custom config file
    #[arg(short, long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<String>,

    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Resolve the latest build matching a package spec
    #[command(arg_required_else_help = true)]
    #[clap(name = "query", visible_alias = "q")]
    Query {
        /// Package spec understood by repoquery (name, glob or name-version)
        #[arg(required = true)]
        package_spec: String,

        /// Configured repository to query
        #[arg(required_unless_present = "repo_id", short, long, conflicts_with_all = ["repo_id", "url"])]
        repo: Option<String>,

        /// Ad-hoc repository id, used with --url
        #[arg(required = false, long, requires = "url")]
        repo_id: Option<String>,

        /// Ad-hoc repository path or URL, used with --repo-id
        #[arg(required = false, long, requires = "repo_id")]
        url: Option<String>,
    },

    /// Parse captured repoquery output without running repoquery
    #[clap(name = "parse")]
    Parse {
        /// File holding the captured stdout; reads stdin when omitted
        #[arg(required = false, value_hint = ValueHint::FilePath)]
        file: Option<String>,

        /// Package spec reported in error messages
        #[arg(required = false, short, long, default_value = "-")]
        spec: String,
    },

    /// Print the effective configuration
    Config,

    /// Generate default config with documentation
    #[clap(name = "defconfig")]
    DefConfig {
        /// Repositories to include, as ID=URL
        #[arg(required = false, short, long)]
        repositories: Vec<String>,
    },
}
