//! Configures the acting administrator of the target org from a definition
//! file.

use serde_json::Value;

use crate::core::action::{action_node, require_str, utility_node, Action, ActionCategory, ActionMeta};
use crate::core::context::ActionContext;
use crate::core::detail::ActionDetail;
use crate::core::error::Result;
use crate::core::executor::api::ApiRequest;
use crate::core::executor::api_outcome_node;
use crate::core::node::{Attach, ResultNode};
use crate::core::progress::MessageSet;
use crate::utils::io;

const META: ActionMeta = ActionMeta {
    name: "configure-admin-user",
    description: "Apply a definition file to the org's administrator user",
    category: ActionCategory::Api,
    required_options: &["definitionFile"],
    progress_delay: 3,
    success_delay: 1,
    error_delay: 1,
};

pub struct ConfigureAdminUser;

impl Action for ConfigureAdminUser {
    fn meta(&self) -> &ActionMeta {
        &META
    }

    fn execute(&self, ctx: &ActionContext, options: &Value) -> Result<ResultNode> {
        let definition_file = require_str(&META, options, "definitionFile")?;

        let definition = io::read_config_file(&ctx.config_root, definition_file)?;
        // the definition applies to whichever admin is authenticated against
        // the target org alias
        let admin_username = ctx.resolver.username_for_alias(&ctx.target_org)?;

        let messages = MessageSet::new(
            format!("Configuring admin user {}", admin_username),
            format!("Configured admin user {}", admin_username),
            format!("Failed to configure admin user {}", admin_username),
        );

        let mut node = action_node(
            &META,
            ActionDetail::ConfigureAdminUser {
                definition_file: definition_file.to_string(),
                admin_username: admin_username.clone(),
                messages: messages.clone(),
            },
        );
        let _ = node.add_child(utility_node(
            format!("resolve admin username for '{}'", ctx.target_org),
            Some(Value::String(admin_username.clone())),
        ))?;

        let mut params = definition;
        if let Some(map) = params.as_object_mut() {
            map.insert("Username".to_string(), Value::String(admin_username));
        }

        let req = ApiRequest {
            operation: "user.configure".to_string(),
            org_alias: ctx.target_org.clone(),
            params,
            messages,
        };

        ctx.debug(&format!("api {} against {}", req.operation, req.org_alias));
        let outcome = ctx.api.execute(&req, ctx.progress);
        match node.add_child(api_outcome_node(&req, outcome))? {
            Attach::Kept => node.succeed()?,
            Attach::BubbledFailure | Attach::BubbledError => {}
        }
        Ok(node)
    }
}
