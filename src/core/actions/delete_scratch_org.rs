//! Deletes a scratch org by alias.
//!
//! Deleting an org that is already gone must not fail the recipe, so this
//! action absorbs every executor rejection: the rejection is recorded in
//! detail and in the executor child, and the action still succeeds.

use serde_json::Value;

use crate::core::action::{require_str, Action, ActionCategory, ActionMeta};
use crate::core::context::ActionContext;
use crate::core::detail::{ActionDetail, Detail};
use crate::core::error::Result;
use crate::core::executor::cli::CommandDescriptor;
use crate::core::executor::cli_outcome_node;
use crate::core::node::{NodeOptions, ResultNode};
use crate::core::progress::MessageSet;

const META: ActionMeta = ActionMeta {
    name: "delete-scratch-org",
    description: "Delete a scratch org, tolerating an already-absent org",
    category: ActionCategory::Cli,
    required_options: &["scratchOrgAlias"],
    progress_delay: 2,
    success_delay: 1,
    error_delay: 1,
};

pub struct DeleteScratchOrg;

impl Action for DeleteScratchOrg {
    fn meta(&self) -> &ActionMeta {
        &META
    }

    fn execute(&self, ctx: &ActionContext, options: &Value) -> Result<ResultNode> {
        let scratch_org_alias = require_str(&META, options, "scratchOrgAlias")?;

        let messages = MessageSet::new(
            format!("Deleting scratch org {}", scratch_org_alias),
            format!("Deleted scratch org {}", scratch_org_alias),
            format!("Could not delete scratch org {}", scratch_org_alias),
        );

        let desc = CommandDescriptor::new("force:org:delete", messages.clone())
            .flag("targetusername", scratch_org_alias)
            .flag("noprompt", true)
            .flag("json", true);

        // No bubbling: the child may terminate Failure or Error and this
        // node still decides its own outcome.
        let mut node = ResultNode::new(
            crate::core::node::NodeKind::Action,
            META.name,
            Detail::Action(ActionDetail::DeleteScratchOrg {
                scratch_org_alias: scratch_org_alias.to_string(),
                swallowed_error: None,
                messages,
            }),
            NodeOptions::detached(),
        );

        ctx.debug(&desc.to_command_line());
        let outcome = ctx.cli.execute(&desc, ctx.progress);
        let swallowed = match &outcome {
            Ok(_) => None,
            Err(err) => Some(err.message.clone()),
        };

        let _ = node.add_child(cli_outcome_node(&desc, outcome))?;

        if let Detail::Action(ActionDetail::DeleteScratchOrg {
            swallowed_error, ..
        }) = &mut node.detail
        {
            *swallowed_error = swallowed;
        }

        node.succeed()?;
        Ok(node)
    }
}
