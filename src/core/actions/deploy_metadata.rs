//! Deploys an MDAPI source directory to the target org.

use serde_json::Value;

use crate::core::action::{action_node, require_str, Action, ActionCategory, ActionMeta};
use crate::core::context::ActionContext;
use crate::core::defaults;
use crate::core::detail::ActionDetail;
use crate::core::error::Result;
use crate::core::executor::cli::CommandDescriptor;
use crate::core::executor::cli_outcome_node;
use crate::core::node::{Attach, ResultNode};
use crate::core::progress::MessageSet;

const META: ActionMeta = ActionMeta {
    name: "deploy-metadata",
    description: "Deploy an MDAPI source directory to the target org",
    category: ActionCategory::Cli,
    required_options: &["mdapiSource"],
    progress_delay: 5,
    success_delay: 1,
    error_delay: 1,
};

pub struct DeployMetadata;

impl Action for DeployMetadata {
    fn meta(&self) -> &ActionMeta {
        &META
    }

    fn execute(&self, ctx: &ActionContext, options: &Value) -> Result<ResultNode> {
        let mdapi_source = require_str(&META, options, "mdapiSource")?;

        let messages = MessageSet::new(
            format!("Deploying {} to {}", mdapi_source, ctx.target_org),
            format!("Deployed {} to {}", mdapi_source, ctx.target_org),
            format!("Failed to deploy {} to {}", mdapi_source, ctx.target_org),
        );

        // Fixed wait, no test execution, JSON output: deploys inside a
        // recipe must be non-interactive and machine-readable.
        let desc = CommandDescriptor::new("force:mdapi:deploy", messages.clone())
            .flag("deploydir", mdapi_source)
            .flag("targetusername", ctx.target_org.as_str())
            .flag("wait", defaults::DEPLOY_WAIT_MINUTES)
            .flag("testlevel", "NoTestRun")
            .flag("json", true);

        let mut node = action_node(
            &META,
            ActionDetail::DeployMetadata {
                mdapi_source: mdapi_source.to_string(),
                command_line: desc.to_command_line(),
                messages,
            },
        );

        ctx.debug(&desc.to_command_line());
        let outcome = ctx.cli.execute(&desc, ctx.progress);
        match node.add_child(cli_outcome_node(&desc, outcome))? {
            Attach::Kept => node.succeed()?,
            Attach::BubbledFailure | Attach::BubbledError => {}
        }
        Ok(node)
    }
}
