use clap::Args;
use serde::Serialize;

use orgforge::actions;
use orgforge::ActionCategory;

use super::CmdResult;

#[derive(Args)]
pub struct ActionsArgs {}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionInfo {
    pub name: String,
    pub description: String,
    pub category: String,
    pub required_options: Vec<String>,
}

#[derive(Serialize)]
pub struct ActionsOutput {
    pub actions: Vec<ActionInfo>,
}

pub fn run(_args: &ActionsArgs) -> CmdResult<ActionsOutput> {
    let registry = actions::builtin();
    let actions = registry
        .metas()
        .into_iter()
        .map(|meta| ActionInfo {
            name: meta.name.to_string(),
            description: meta.description.to_string(),
            category: match meta.category {
                ActionCategory::Api => "api".to_string(),
                ActionCategory::Cli => "cli".to_string(),
            },
            required_options: meta
                .required_options
                .iter()
                .map(|o| o.to_string())
                .collect(),
        })
        .collect();
    Ok((ActionsOutput { actions }, 0))
}
