//! Built-in actions.

pub mod configure_admin_user;
pub mod create_user;
pub mod delete_scratch_org;
pub mod deploy_metadata;

use crate::core::action::ActionRegistry;

/// Registry with every built-in action registered.
pub fn builtin() -> ActionRegistry {
    let mut registry = ActionRegistry::new();
    registry.register(Box::new(create_user::CreateUser));
    registry.register(Box::new(configure_admin_user::ConfigureAdminUser));
    registry.register(Box::new(deploy_metadata::DeployMetadata));
    registry.register(Box::new(delete_scratch_org::DeleteScratchOrg));
    registry
}
