//! Identity helpers: unique usernames and alias resolution.

use serde_json::Value;
use uuid::Uuid;

use crate::core::error::{Error, Result};
use crate::core::executor::cli::{CommandDescriptor, CommandExecutor};
use crate::core::progress::{MessageSet, SilentProgress};

const UNIQUE_SUFFIX_LEN: usize = 8;

/// Derive a globally-unique username from a base username by appending a
/// generated suffix before the domain part.
///
/// `admin@example.org` becomes `admin-1a2b3c4d@example.org`.
pub fn create_unique_username(base: &str) -> String {
    let uuid = Uuid::new_v4().simple().to_string();
    let suffix = &uuid[..UNIQUE_SUFFIX_LEN];
    match base.split_once('@') {
        Some((local, domain)) => format!("{}-{}@{}", local, suffix, domain),
        None => format!("{}-{}", base, suffix),
    }
}

/// Resolves an org alias to the username authenticated against it.
pub trait UsernameResolver {
    fn username_for_alias(&self, alias: &str) -> Result<String>;
}

/// Production resolver backed by the org CLI's display command.
pub struct CliUsernameResolver<'a> {
    pub cli: &'a dyn CommandExecutor,
}

impl UsernameResolver for CliUsernameResolver<'_> {
    fn username_for_alias(&self, alias: &str) -> Result<String> {
        let desc = CommandDescriptor::new(
            "force:org:display",
            MessageSet::new(
                format!("Resolving username for org '{}'", alias),
                format!("Resolved username for org '{}'", alias),
                format!("Could not resolve username for org '{}'", alias),
            ),
        )
        .flag("targetusername", alias)
        .flag("json", true);

        let command_line = desc.to_command_line();
        let output = self
            .cli
            .execute(&desc, &SilentProgress)
            .map_err(|e| e.into_command_error(&command_line))?;

        output
            .get("result")
            .and_then(|r| r.get("username"))
            .and_then(Value::as_str)
            .map(|s| s.to_string())
            .ok_or_else(|| Error::org_not_found(alias))
    }
}
