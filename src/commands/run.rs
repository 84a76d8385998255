use std::path::PathBuf;

use clap::Args;
use serde::Serialize;

use orgforge::actions;
use orgforge::defaults;
use orgforge::executor::api::RestApiExecutor;
use orgforge::executor::cli::OrgCliExecutor;
use orgforge::progress::{ProgressSink, SilentProgress, StderrProgress};
use orgforge::recipe::{self, HandlerTable, Recipe, StepDisposition};
use orgforge::resolve::CliUsernameResolver;
use orgforge::sequencer::{self, Sequencer};
use orgforge::{ActionContext, ResultNode, Verbosity};

use super::CmdResult;

#[derive(Args)]
pub struct RunArgs {
    /// Path to the recipe JSON file
    pub recipe: String,

    /// Alias of the org the recipe runs against
    #[arg(long, short = 'o')]
    pub target_org: String,

    /// Alias of the Dev Hub org, when the recipe needs one
    #[arg(long)]
    pub dev_hub: Option<String>,

    /// Directory the recipe's relative paths resolve against
    #[arg(long, default_value = ".")]
    pub project_dir: String,

    /// Directory for definition files (defaults to the project directory)
    #[arg(long)]
    pub config_dir: Option<String>,

    /// Validate the recipe and exit without touching the org
    #[arg(long)]
    pub check: bool,

    /// Suppress progress output on stderr
    #[arg(long, short = 'q')]
    pub quiet: bool,

    /// Emit extra diagnostic detail
    #[arg(long)]
    pub debug: bool,

    /// Skip pacing delays between steps
    #[arg(long)]
    pub no_pacing: bool,

    /// Org CLI binary to shell out to
    #[arg(long, default_value = defaults::CLI_BINARY)]
    pub binary: String,

    /// Base URL for the org REST API
    #[arg(long, default_value = defaults::API_URL)]
    pub api_url: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunOutput {
    pub recipe: String,
    pub target_org: String,
    pub total_steps: usize,
    pub check_only: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tree: Option<ResultNode>,
}

/// Handlers a recipe may name in `onError`. The engine itself attaches no
/// meaning to handler names; this table is the CLI's vocabulary.
fn default_handlers() -> HandlerTable {
    let mut table = HandlerTable::new();
    table.insert("continue", StepDisposition::Continue);
    table.insert("abort", StepDisposition::Abort);
    table
}

pub fn run(args: &RunArgs) -> CmdResult<RunOutput> {
    let recipe = Recipe::load(&args.recipe)?;
    let registry = actions::builtin();
    let handlers = default_handlers();

    recipe::validate(&recipe, &registry, &handlers)?;

    if args.check {
        let output = RunOutput {
            recipe: recipe.recipe_name.clone(),
            target_org: args.target_org.clone(),
            total_steps: recipe.step_count(),
            check_only: true,
            tree: None,
        };
        return Ok((output, 0));
    }

    let cli = OrgCliExecutor::new(args.binary.clone());
    let api = RestApiExecutor::new(args.api_url.clone());
    let resolver = CliUsernameResolver { cli: &cli };
    let progress: &dyn ProgressSink = if args.quiet {
        &SilentProgress
    } else {
        &StderrProgress
    };

    let project_root = PathBuf::from(shellexpand::tilde(&args.project_dir).to_string());
    let config_root = args
        .config_dir
        .as_deref()
        .map(|dir| PathBuf::from(shellexpand::tilde(dir).to_string()))
        .unwrap_or_else(|| project_root.clone());

    let ctx = ActionContext {
        target_org: args.target_org.clone(),
        dev_hub: args.dev_hub.clone(),
        project_root,
        config_root,
        verbosity: if args.quiet {
            Verbosity::Quiet
        } else if args.debug {
            Verbosity::Debug
        } else {
            Verbosity::Normal
        },
        pacing: !args.no_pacing,
        progress,
        cli: &cli,
        api: &api,
        resolver: &resolver,
    };

    let engine = Sequencer::new(&registry, &handlers).run(&recipe, &ctx)?;

    // an Error-terminal engine node becomes the command's error; the full
    // tree rides along in the details so nothing about the run is lost
    if let Some(err) = sequencer::run_error(&engine) {
        return Err(err.with_tree(&engine));
    }

    let output = RunOutput {
        recipe: recipe.recipe_name.clone(),
        target_org: args.target_org.clone(),
        total_steps: recipe.step_count(),
        check_only: false,
        tree: Some(engine),
    };
    Ok((output, 0))
}
