//! Walks a recipe strictly in order and drives the action registry,
//! producing one top-level ENGINE-kind node per run.
//!
//! Steps are never parallel: each may depend on remote state mutated by the
//! previous one. The engine node does not use bubbling; continue-vs-abort on
//! a step error is the sequencer's decision, taken from the handler table.

use serde_json::Value;

use crate::core::action::{ActionMeta, ActionRegistry};
use crate::core::context::ActionContext;
use crate::core::detail::Detail;
use crate::core::error::{Error, Result};
use crate::core::node::{NodeKind, NodeOptions, NodeStatus, ResultNode};
use crate::core::progress::{throttle, ProgressEventKind};
use crate::core::recipe::{HandlerTable, Recipe, Step, StepDisposition};

pub struct Sequencer<'a> {
    registry: &'a ActionRegistry,
    handlers: &'a HandlerTable,
}

impl<'a> Sequencer<'a> {
    pub fn new(registry: &'a ActionRegistry, handlers: &'a HandlerTable) -> Self {
        Self { registry, handlers }
    }

    /// Run the recipe to completion or first abort. Always returns the
    /// engine node; `Err` is reserved for engine-internal invariant
    /// violations.
    pub fn run(&self, recipe: &Recipe, ctx: &ActionContext) -> Result<ResultNode> {
        let mut engine = ResultNode::new(
            NodeKind::Engine,
            recipe.recipe_name.clone(),
            Detail::Engine {
                recipe: recipe.recipe_name.clone(),
                target_org: ctx.target_org.clone(),
                dev_hub: ctx.dev_hub.clone(),
                total_steps: recipe.step_count(),
                completed_steps: 0,
            },
            NodeOptions {
                bubble_error: false,
                bubble_failure: false,
                failure_is_error: false,
                start_now: true,
            },
        );

        let mut completed = 0usize;

        'run: for group in &recipe.groups {
            for step in &group.steps {
                let Some(action) = self.registry.get(&step.action) else {
                    engine.error(Error::recipe_unknown_action(&step.action))?;
                    break 'run;
                };
                let meta = action.meta();

                // validation aborts the run before any remote call
                if let Err(err) = action.validate_options(&step.options) {
                    engine.error(err)?;
                    break 'run;
                }

                let node = match action.execute(ctx, &step.options) {
                    Ok(node) => node,
                    // normalize an unexpected rejection into an errored
                    // ACTION node so no foreign error enters the tree
                    Err(err) => aborted_action_node(meta, &step.options, err)?,
                };

                let status = node.status;
                let cause = node.terminal_error().map(|e| e.to_error());
                let _ = engine.add_child(node)?;

                match status {
                    NodeStatus::Error => {
                        ctx.progress
                            .notify(ProgressEventKind::Error, &step_label(step, "errored"));
                        throttle(meta.error_delay, ctx.pacing);

                        match self.error_disposition(step) {
                            StepDisposition::Continue => {
                                completed += 1;
                                set_completed(&mut engine, completed);
                            }
                            StepDisposition::Abort => {
                                set_completed(&mut engine, completed);
                                let err = cause.unwrap_or_else(|| {
                                    Error::internal_unexpected(format!(
                                        "step '{}' errored without a cause",
                                        step.action
                                    ))
                                });
                                engine.error(err)?;
                                break 'run;
                            }
                        }
                    }
                    _ => {
                        ctx.progress
                            .notify(ProgressEventKind::Success, &step_label(step, "finished"));
                        throttle(meta.success_delay, ctx.pacing);
                        completed += 1;
                        set_completed(&mut engine, completed);
                    }
                }
            }
        }

        if !engine.is_terminal() {
            engine.succeed()?;
        }
        Ok(engine)
    }

    fn error_disposition(&self, step: &Step) -> StepDisposition {
        step.on_error
            .as_deref()
            .and_then(|name| self.handlers.get(name))
            .unwrap_or(StepDisposition::Abort)
    }
}

/// Rebuild the engine error from a terminal engine node, for the outer
/// boundary's `{status: 1, result: <error>}` envelope.
pub fn run_error(engine: &ResultNode) -> Option<Error> {
    engine.terminal_error().map(|e| e.to_error())
}

fn aborted_action_node(meta: &ActionMeta, options: &Value, err: Error) -> Result<ResultNode> {
    let mut node = ResultNode::new(
        NodeKind::Action,
        meta.name,
        Detail::Aborted {
            options: options.clone(),
        },
        NodeOptions::default(),
    );
    node.error(err)?;
    Ok(node)
}

fn set_completed(engine: &mut ResultNode, completed: usize) {
    if let Detail::Engine {
        completed_steps, ..
    } = &mut engine.detail
    {
        *completed_steps = completed;
    }
}

fn step_label(step: &Step, outcome: &str) -> String {
    format!("Step '{}' {}", step.action, outcome)
}
