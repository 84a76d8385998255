//! Creates a demo user in the target org from a definition file.

use serde_json::Value;

use crate::core::action::{action_node, require_str, utility_node, Action, ActionCategory, ActionMeta};
use crate::core::context::ActionContext;
use crate::core::defaults;
use crate::core::detail::ActionDetail;
use crate::core::error::{Error, Result};
use crate::core::executor::api::ApiRequest;
use crate::core::executor::api_outcome_node;
use crate::core::node::{Attach, ResultNode};
use crate::core::progress::MessageSet;
use crate::utils::{io, resolve};

const META: ActionMeta = ActionMeta {
    name: "create-user",
    description: "Create a user in the target org from a definition file",
    category: ActionCategory::Api,
    required_options: &["definitionFile", "userAlias"],
    progress_delay: 3,
    success_delay: 1,
    error_delay: 1,
};

pub struct CreateUser;

impl Action for CreateUser {
    fn meta(&self) -> &ActionMeta {
        &META
    }

    fn execute(&self, ctx: &ActionContext, options: &Value) -> Result<ResultNode> {
        let definition_file = require_str(&META, options, "definitionFile")?;
        let user_alias = require_str(&META, options, "userAlias")?;

        let definition = io::read_config_file(&ctx.config_root, definition_file)?;
        let base_username = definition
            .get("Username")
            .and_then(Value::as_str)
            .ok_or_else(|| {
                Error::action_invalid_option(
                    META.name,
                    "definitionFile",
                    "definition file has no Username field",
                )
            })?
            .to_string();

        // Usernames must be globally unique across orgs, so the definition's
        // username only serves as a base.
        let unique_username = resolve::create_unique_username(&base_username);
        let default_password = match definition.get("password") {
            Some(_) => None,
            None => Some(defaults::USER_PASSWORD.to_string()),
        };

        let messages = MessageSet::new(
            format!("Creating user {}", unique_username),
            format!("Created user {}", unique_username),
            format!("Failed to create user {}", unique_username),
        );

        let mut node = action_node(
            &META,
            ActionDetail::CreateUser {
                definition_file: definition_file.to_string(),
                user_alias: user_alias.to_string(),
                base_username,
                unique_username: unique_username.clone(),
                default_password: default_password.clone(),
                messages: messages.clone(),
            },
        );
        let _ = node.add_child(utility_node(
            format!("read definition {}", definition_file),
            None,
        ))?;

        let mut params = definition.clone();
        if let Some(map) = params.as_object_mut() {
            map.insert("Username".to_string(), Value::String(unique_username));
            if let Some(password) = &default_password {
                map.insert("password".to_string(), Value::String(password.clone()));
            }
            map.insert("alias".to_string(), Value::String(user_alias.to_string()));
        }

        let req = ApiRequest {
            operation: "user.create".to_string(),
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::actions::testing::{context, FixedResolver, MockApi, MockCli};
    use crate::core::detail::Detail;
    use crate::core::node::NodeStatus;

    fn write_definition(dir: &std::path::Path, body: &str) {
        std::fs::write(dir.join("user-def.json"), body).expect("write definition");
    }

    #[test]
    fn definition_without_password_gets_fixed_default() {
        let dir = tempfile::tempdir().expect("tempdir");
        write_definition(dir.path(), r#"{"Username":"admin@example.org"}"#);

        let cli = MockCli::ok(serde_json::json!({}));
        let api = MockApi::ok(serde_json::json!({"id": "005000000000001"}));
        let resolver = FixedResolver {
            username: "admin@example.org".to_string(),
        };
        let ctx = context(&cli, &api, &resolver, dir.path().to_path_buf());

        let options =
            serde_json::json!({"definitionFile": "user-def.json", "userAlias": "demo-user"});
        let node = CreateUser.execute(&ctx, &options).expect("executes");

        assert_eq!(node.status, NodeStatus::Success);
        match &node.detail {
            Detail::Action(ActionDetail::CreateUser {
                default_password,
                unique_username,
                base_username,
                ..
            }) => {
                assert_eq!(default_password.as_deref(), Some("1HappyCloud"));
                assert!(!unique_username.is_empty());
                assert_ne!(unique_username, base_username);
                assert!(unique_username.ends_with("@example.org"));
            }
            other => panic!("unexpected detail: {:?}", other),
        }

        // the API saw the derived username and default password
        let seen = api.seen.borrow();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].params["password"], "1HappyCloud");
        assert_ne!(seen[0].params["Username"], "admin@example.org");
    }

    #[test]
    fn definition_with_password_is_left_alone() {
        let dir = tempfile::tempdir().expect("tempdir");
        write_definition(
            dir.path(),
            r#"{"Username":"admin@example.org","password":"s3cret"}"#,
        );

        let cli = MockCli::ok(serde_json::json!({}));
        let api = MockApi::ok(serde_json::json!({}));
        let resolver = FixedResolver {
            username: "admin@example.org".to_string(),
        };
        let ctx = context(&cli, &api, &resolver, dir.path().to_path_buf());

        let options =
            serde_json::json!({"definitionFile": "user-def.json", "userAlias": "demo-user"});
        let node = CreateUser.execute(&ctx, &options).expect("executes");

        match &node.detail {
            Detail::Action(ActionDetail::CreateUser {
                default_password, ..
            }) => assert!(default_password.is_none()),
            other => panic!("unexpected detail: {:?}", other),
        }
        assert_eq!(api.seen.borrow()[0].params["password"], "s3cret");
    }

    #[test]
    fn api_rejection_bubbles_to_action_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        write_definition(dir.path(), r#"{"Username":"admin@example.org"}"#);

        let cli = MockCli::ok(serde_json::json!({}));
        let api = MockApi::rejecting(crate::core::executor::ExecutorError::api(
            Some(500),
            Some("DUPLICATE_USERNAME".to_string()),
            "duplicate username",
            None,
        ));
        let resolver = FixedResolver {
            username: "admin@example.org".to_string(),
        };
        let ctx = context(&cli, &api, &resolver, dir.path().to_path_buf());

        let options =
            serde_json::json!({"definitionFile": "user-def.json", "userAlias": "demo-user"});
        let node = CreateUser.execute(&ctx, &options).expect("node returned");
        assert_eq!(node.status, NodeStatus::Error);
    }

    #[test]
    fn validate_requires_definition_file_first() {
        let err = CreateUser
            .validate_options(&serde_json::json!({}))
            .expect_err("missing options");
        assert_eq!(err.details["option"], "definitionFile");
    }
}
