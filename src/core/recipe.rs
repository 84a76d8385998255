//! Declarative recipe: ordered groups of steps, each binding an action name
//! to options.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::action::ActionRegistry;
use crate::core::error::{Error, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub recipe_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub groups: Vec<Group>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    pub name: String,
    pub steps: Vec<Step>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Step {
    pub action: String,
    #[serde(default)]
    pub options: Value,
    /// Handler names resolved against an externally supplied table; the
    /// engine defines no handler semantics of its own.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_success: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_error: Option<String>,
}

impl Recipe {
    pub fn parse(raw: &str, path: &str) -> Result<Self> {
        serde_json::from_str(raw).map_err(|e| Error::recipe_invalid_json(path, e))
    }

    pub fn load(path: &str) -> Result<Self> {
        let expanded = shellexpand::tilde(path).to_string();
        let raw = std::fs::read_to_string(&expanded)
            .map_err(|_| Error::config_file_not_found(expanded.clone()))?;
        Self::parse(&raw, &expanded)
    }

    pub fn step_count(&self) -> usize {
        self.groups.iter().map(|g| g.steps.len()).sum()
    }
}

/// What the surrounding system wants done when a step with this handler
/// terminates in error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepDisposition {
    Continue,
    Abort,
}

/// Explicit handler-name table supplied by the caller. The engine never
/// invents dispatch semantics: a step naming a handler absent from this
/// table is a validation error, and a step with no handler aborts on error.
#[derive(Debug, Clone, Default)]
pub struct HandlerTable {
    handlers: HashMap<String, StepDisposition>,
}

impl HandlerTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, disposition: StepDisposition) {
        self.handlers.insert(name.into(), disposition);
    }

    pub fn get(&self, name: &str) -> Option<StepDisposition> {
        self.handlers.get(name).copied()
    }
}

/// Validate a recipe without touching the remote org: every action name
/// resolves, every step's options pass the action's validation, and every
/// handler name is present in the table.
pub fn validate(recipe: &Recipe, registry: &ActionRegistry, handlers: &HandlerTable) -> Result<()> {
    for group in &recipe.groups {
        for step in &group.steps {
            let action = registry
                .get(&step.action)
                .ok_or_else(|| Error::recipe_unknown_action(&step.action))?;
            action.validate_options(&step.options)?;

            for handler in [&step.on_success, &step.on_error].into_iter().flatten() {
                if handlers.get(handler).is_none() {
                    return Err(Error::recipe_unknown_handler(&step.action, handler));
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::actions;
    use crate::core::error::ErrorCode;

    fn recipe_json(step: Value) -> String {
        serde_json::json!({
            "recipeName": "demo",
            "groups": [{"name": "main", "steps": [step]}]
        })
        .to_string()
    }

    #[test]
    fn parses_groups_and_steps_in_order() {
        let raw = r#"{
            "recipeName": "build-demo",
            "description": "Build the demo org",
            "groups": [
                {"name": "prepare", "steps": [
                    {"action": "deploy-metadata", "options": {"mdapiSource": "unpackaged/pre"}}
                ]},
                {"name": "users", "steps": [
                    {"action": "create-user",
                     "options": {"definitionFile": "u.json", "userAlias": "u"},
                     "onError": "skip-user"}
                ]}
            ]
        }"#;
        let recipe = Recipe::parse(raw, "test.json").expect("parses");
        assert_eq!(recipe.recipe_name, "build-demo");
        assert_eq!(recipe.step_count(), 2);
        assert_eq!(recipe.groups[0].steps[0].action, "deploy-metadata");
        assert_eq!(
            recipe.groups[1].steps[0].on_error.as_deref(),
            Some("skip-user")
        );
    }

    #[test]
    fn invalid_json_is_a_recipe_error() {
        let err = Recipe::parse("{broken", "bad.json").expect_err("invalid");
        assert_eq!(err.code, ErrorCode::RecipeInvalidJson);
    }

    #[test]
    fn validate_rejects_unknown_action() {
        let raw = recipe_json(serde_json::json!({"action": "no-such-action", "options": {}}));
        let recipe = Recipe::parse(&raw, "test.json").expect("parses");
        let err = validate(&recipe, &actions::builtin(), &HandlerTable::new())
            .expect_err("unknown action");
        assert_eq!(err.code, ErrorCode::RecipeUnknownAction);
    }

    #[test]
    fn validate_rejects_missing_required_option() {
        let raw = recipe_json(serde_json::json!({"action": "deploy-metadata", "options": {}}));
        let recipe = Recipe::parse(&raw, "test.json").expect("parses");
        let err = validate(&recipe, &actions::builtin(), &HandlerTable::new())
            .expect_err("missing option");
        assert_eq!(err.code, ErrorCode::ActionMissingOption);
    }

    #[test]
    fn validate_rejects_handler_missing_from_table() {
        let raw = recipe_json(serde_json::json!({
            "action": "deploy-metadata",
            "options": {"mdapiSource": "src"},
            "onError": "unregistered"
        }));
        let recipe = Recipe::parse(&raw, "test.json").expect("parses");
        let err = validate(&recipe, &actions::builtin(), &HandlerTable::new())
            .expect_err("unknown handler");
        assert_eq!(err.code, ErrorCode::RecipeUnknownHandler);

        let mut table = HandlerTable::new();
        table.insert("unregistered", StepDisposition::Continue);
        validate(&recipe, &actions::builtin(), &table).expect("handler now known");
    }
}
