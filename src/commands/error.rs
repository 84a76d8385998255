use clap::{Args, Subcommand};
use serde::Serialize;

use orgforge::error::codes::parse_code;
use orgforge::error::help::{self, ErrorHelp, ErrorHelpSummary};
use orgforge::Error;

use super::CmdResult;

#[derive(Args)]
pub struct ErrorArgs {
    #[command(subcommand)]
    command: ErrorCommand,
}

#[derive(Subcommand)]
enum ErrorCommand {
    /// List every error code with a one-line summary
    Codes,
    /// Explain one error code: details schema and remediation hints
    Explain {
        /// Error code, e.g. action.missing_option
        code: String,
    },
}

#[derive(Serialize)]
#[serde(untagged)]
pub enum ErrorOutput {
    Codes { codes: Vec<ErrorHelpSummary> },
    Explain(ErrorHelp),
}

pub fn run(args: &ErrorArgs) -> CmdResult<ErrorOutput> {
    match &args.command {
        ErrorCommand::Codes => Ok((
            ErrorOutput::Codes {
                codes: help::list(),
            },
            0,
        )),
        ErrorCommand::Explain { code } => {
            let parsed =
                parse_code(code).ok_or_else(|| Error::validation_unknown_error_code(code.as_str()))?;
            Ok((ErrorOutput::Explain(help::explain(parsed)), 0))
        }
    }
}
