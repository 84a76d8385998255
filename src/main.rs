use clap::{Parser, Subcommand};

mod commands;
mod output;

use commands::{actions, error, run};

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser)]
#[command(name = "orgforge")]
#[command(version = VERSION)]
#[command(about = "Recipe-driven org build and deployment automation")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a recipe against a target org
    Run(run::RunArgs),
    /// List registered actions and their required options
    Actions(actions::ActionsArgs),
    /// Inspect the error code taxonomy
    #[command(visible_alias = "errors")]
    Error(error::ErrorArgs),
}

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();

    let (json_result, exit_code) = match cli.command {
        Commands::Run(args) => output::response::map_cmd_result_to_json(run::run(&args)),
        Commands::Actions(args) => output::response::map_cmd_result_to_json(actions::run(&args)),
        Commands::Error(args) => output::response::map_cmd_result_to_json(error::run(&args)),
    };

    if output::response::print_json_result(json_result).is_err() {
        return std::process::ExitCode::from(1);
    }
    std::process::ExitCode::from(exit_code_to_u8(exit_code))
}

fn exit_code_to_u8(code: i32) -> u8 {
    if code <= 0 {
        0
    } else if code >= 255 {
        255
    } else {
        code as u8
    }
}
