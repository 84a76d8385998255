pub mod actions;
pub mod error;
pub mod run;

/// Every command returns its serializable payload plus the process exit
/// code to use when the payload itself carries a non-fatal outcome.
pub type CmdResult<T> = orgforge::Result<(T, i32)>;
