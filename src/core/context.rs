//! Read-only snapshot passed to every action.

use std::path::PathBuf;

use crate::core::executor::api::ApiExecutor;
use crate::core::executor::cli::CommandExecutor;
use crate::core::progress::{ProgressEventKind, ProgressSink};
use crate::utils::resolve::UsernameResolver;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    Quiet,
    Normal,
    Debug,
}

/// Everything an action may read while executing: the target environment,
/// filesystem roots, and the collaborator seams (executors, resolver,
/// progress sink) that production wires to real implementations and tests
/// wire to mocks. Actions never mutate the context.
pub struct ActionContext<'a> {
    /// Alias of the org the recipe runs against.
    pub target_org: String,
    /// Alias of the Dev Hub, when one is involved.
    pub dev_hub: Option<String>,
    /// Root the recipe's relative paths resolve against.
    pub project_root: PathBuf,
    /// Root for definition/config files referenced by step options.
    pub config_root: PathBuf,
    pub verbosity: Verbosity,
    /// Whether pacing delays throttle progress notifications.
    pub pacing: bool,
    pub progress: &'a dyn ProgressSink,
    pub cli: &'a dyn CommandExecutor,
    pub api: &'a dyn ApiExecutor,
    pub resolver: &'a dyn UsernameResolver,
}

impl ActionContext<'_> {
    /// Emit a diagnostic notification, shown only at Debug verbosity.
    /// Actions use this to surface the exact command lines and API
    /// operations they compose.
    pub fn debug(&self, message: &str) {
        if self.verbosity == Verbosity::Debug {
            self.progress.notify(ProgressEventKind::Progress, message);
        }
    }
}
