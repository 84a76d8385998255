//! Fixed defaults shared across actions and executors.

/// Org CLI binary invoked by the production command-line executor.
pub const CLI_BINARY: &str = "sfdx";

/// Base URL used by the production API executor when none is configured.
pub const API_URL: &str = "https://login.salesforce.com";

/// Password assigned to created users when the definition file supplies none.
pub const USER_PASSWORD: &str = "1HappyCloud";

/// Minutes a metadata deploy waits for completion before the CLI gives up.
pub const DEPLOY_WAIT_MINUTES: i64 = 5;
