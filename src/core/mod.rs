pub mod action;
pub mod actions;
pub mod context;
pub mod defaults;
pub mod detail;
pub mod error;
pub mod executor;
pub mod node;
pub mod progress;
pub mod recipe;
pub mod sequencer;

pub use action::{Action, ActionCategory, ActionMeta, ActionRegistry};
pub use context::{ActionContext, Verbosity};
pub use detail::{ActionDetail, Detail};
pub use error::{Error, ErrorCode, Hint, Result};
pub use node::{Attach, NodeKind, NodeOptions, NodeStatus, ResultNode};
pub use progress::{MessageSet, ProgressEventKind, ProgressSink, SilentProgress, StderrProgress};
pub use recipe::{Group, HandlerTable, Recipe, Step, StepDisposition};
pub use sequencer::Sequencer;
