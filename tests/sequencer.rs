//! End-to-end sequencer runs over scripted and builtin actions.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use serde_json::{json, Value};

use orgforge::action::{Action, ActionCategory, ActionMeta, ActionRegistry};
use orgforge::actions;
use orgforge::detail::Detail;
use orgforge::error::ErrorCode;
use orgforge::executor::api::{ApiExecutor, ApiRequest};
use orgforge::executor::cli::{CommandDescriptor, CommandExecutor};
use orgforge::executor::ExecutorError;
use orgforge::node::{NodeKind, NodeOptions, NodeStatus, ResultNode};
use orgforge::progress::{ProgressSink, SilentProgress};
use orgforge::recipe::{HandlerTable, Recipe, StepDisposition};
use orgforge::resolve::UsernameResolver;
use orgforge::sequencer::Sequencer;
use orgforge::{ActionContext, Error, Verbosity};

#[derive(Clone, Copy)]
enum Script {
    Succeed,
    ErrorNode,
    Reject,
}

struct Scripted {
    meta: ActionMeta,
    script: Script,
    log: Rc<RefCell<Vec<&'static str>>>,
}

impl Action for Scripted {
    fn meta(&self) -> &ActionMeta {
        &self.meta
    }

    fn execute(&self, _ctx: &ActionContext, options: &Value) -> orgforge::Result<ResultNode> {
        self.log.borrow_mut().push(self.meta.name);
        match self.script {
            Script::Reject => Err(Error::internal_unexpected("scripted rejection")),
            script => {
                let mut node = ResultNode::new(
                    NodeKind::Action,
                    self.meta.name,
                    Detail::Utility {
                        operation: "scripted".to_string(),
                        output: Some(options.clone()),
                    },
                    NodeOptions::default(),
                );
                match script {
                    Script::Succeed => node.succeed()?,
                    _ => node.error(Error::action_failed(self.meta.name))?,
                }
                Ok(node)
            }
        }
    }
}

fn scripted_meta(name: &'static str, required: &'static [&'static str]) -> ActionMeta {
    ActionMeta {
        name,
        description: "scripted",
        category: ActionCategory::Cli,
        required_options: required,
        progress_delay: 0,
        success_delay: 0,
        error_delay: 0,
    }
}

fn scripted_registry(
    steps: &[(&'static str, Script)],
    log: &Rc<RefCell<Vec<&'static str>>>,
) -> ActionRegistry {
    let mut registry = ActionRegistry::new();
    for (name, script) in steps {
        registry.register(Box::new(Scripted {
            meta: scripted_meta(name, &[]),
            script: *script,
            log: Rc::clone(log),
        }));
    }
    registry
}

struct CountingCli {
    calls: Cell<usize>,
    outcome: std::result::Result<Value, ExecutorError>,
}

impl CountingCli {
    fn ok() -> Self {
        Self {
            calls: Cell::new(0),
            outcome: Ok(json!({"status": 0})),
        }
    }
}

impl CommandExecutor for CountingCli {
    fn execute(
        &self,
        _desc: &CommandDescriptor,
        _progress: &dyn ProgressSink,
    ) -> std::result::Result<Value, ExecutorError> {
        self.calls.set(self.calls.get() + 1);
        self.outcome.clone()
    }
}

struct CountingApi {
    calls: Cell<usize>,
}

impl ApiExecutor for CountingApi {
    fn execute(
        &self,
        _req: &ApiRequest,
        _progress: &dyn ProgressSink,
    ) -> std::result::Result<Value, ExecutorError> {
        self.calls.set(self.calls.get() + 1);
        Ok(json!({}))
    }
}

struct FixedResolver;

impl UsernameResolver for FixedResolver {
    fn username_for_alias(&self, _alias: &str) -> orgforge::Result<String> {
        Ok("admin@demo".to_string())
    }
}

fn context<'a>(
    cli: &'a CountingCli,
    api: &'a CountingApi,
    resolver: &'a FixedResolver,
) -> ActionContext<'a> {
    ActionContext {
        target_org: "demo-org".to_string(),
        dev_hub: None,
        project_root: std::env::temp_dir(),
        config_root: std::env::temp_dir(),
        verbosity: Verbosity::Quiet,
        pacing: false,
        progress: &SilentProgress,
        cli,
        api,
        resolver,
    }
}

fn three_step_recipe(middle_on_error: Option<&str>) -> Recipe {
    let mut step_two = json!({"action": "step-two", "options": {}});
    if let Some(handler) = middle_on_error {
        step_two["onError"] = json!(handler);
    }
    let raw = json!({
        "recipeName": "three-steps",
        "groups": [{"name": "main", "steps": [
            {"action": "step-one", "options": {}},
            step_two,
            {"action": "step-three", "options": {}},
        ]}]
    })
    .to_string();
    Recipe::parse(&raw, "test.json").expect("recipe parses")
}

fn completed_steps(engine: &ResultNode) -> usize {
    match &engine.detail {
        Detail::Engine {
            completed_steps, ..
        } => *completed_steps,
        other => panic!("unexpected engine detail: {:?}", other),
    }
}

#[test]
fn errored_step_aborts_the_run_before_later_steps() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let registry = scripted_registry(
        &[
            ("step-one", Script::Succeed),
            ("step-two", Script::ErrorNode),
            ("step-three", Script::Succeed),
        ],
        &log,
    );
    let handlers = HandlerTable::new();
    let cli = CountingCli::ok();
    let api = CountingApi { calls: Cell::new(0) };
    let resolver = FixedResolver;
    let ctx = context(&cli, &api, &resolver);

    let engine = Sequencer::new(&registry, &handlers)
        .run(&three_step_recipe(None), &ctx)
        .expect("run returns the engine node");

    assert_eq!(engine.status, NodeStatus::Error);
    assert_eq!(*log.borrow(), vec!["step-one", "step-two"]);
    assert_eq!(engine.children.len(), 2);
    let last = engine.children.last().expect("two children attached");
    assert_eq!(last.name, "step-two");
    assert_eq!(last.status, NodeStatus::Error);
    assert_eq!(completed_steps(&engine), 1);
    assert_eq!(
        engine.terminal_error().expect("engine carries cause").code,
        ErrorCode::ActionFailed.as_str()
    );
}

#[test]
fn continue_handler_keeps_the_run_going() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let registry = scripted_registry(
        &[
            ("step-one", Script::Succeed),
            ("step-two", Script::ErrorNode),
            ("step-three", Script::Succeed),
        ],
        &log,
    );
    let mut handlers = HandlerTable::new();
    handlers.insert("keep-going", StepDisposition::Continue);
    let cli = CountingCli::ok();
    let api = CountingApi { calls: Cell::new(0) };
    let resolver = FixedResolver;
    let ctx = context(&cli, &api, &resolver);

    let engine = Sequencer::new(&registry, &handlers)
        .run(&three_step_recipe(Some("keep-going")), &ctx)
        .expect("run returns the engine node");

    assert_eq!(engine.status, NodeStatus::Success);
    assert_eq!(*log.borrow(), vec!["step-one", "step-two", "step-three"]);
    assert_eq!(engine.children.len(), 3);
    assert_eq!(engine.children[1].status, NodeStatus::Error);
    assert_eq!(completed_steps(&engine), 3);
}

#[test]
fn rejecting_action_is_normalized_into_an_errored_node() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let registry = scripted_registry(&[("step-one", Script::Reject)], &log);
    let handlers = HandlerTable::new();
    let cli = CountingCli::ok();
    let api = CountingApi { calls: Cell::new(0) };
    let resolver = FixedResolver;
    let ctx = context(&cli, &api, &resolver);

    let raw = json!({
        "recipeName": "rejecting",
        "groups": [{"name": "main", "steps": [{"action": "step-one", "options": {}}]}]
    })
    .to_string();
    let recipe = Recipe::parse(&raw, "test.json").expect("recipe parses");

    let engine = Sequencer::new(&registry, &handlers)
        .run(&recipe, &ctx)
        .expect("run returns the engine node");

    assert_eq!(engine.status, NodeStatus::Error);
    let child = engine.children.last().expect("aborted node attached");
    assert_eq!(child.status, NodeStatus::Error);
    assert!(matches!(child.detail, Detail::Aborted { .. }));
}

#[test]
fn validation_failure_aborts_before_any_remote_call() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let mut registry = ActionRegistry::new();
    registry.register(Box::new(Scripted {
        meta: scripted_meta("needs-option", &["definitionFile"]),
        script: Script::Succeed,
        log: Rc::clone(&log),
    }));
    let handlers = HandlerTable::new();
    let cli = CountingCli::ok();
    let api = CountingApi { calls: Cell::new(0) };
    let resolver = FixedResolver;
    let ctx = context(&cli, &api, &resolver);

    let raw = json!({
        "recipeName": "invalid",
        "groups": [{"name": "main", "steps": [{"action": "needs-option", "options": {}}]}]
    })
    .to_string();
    let recipe = Recipe::parse(&raw, "test.json").expect("recipe parses");

    let engine = Sequencer::new(&registry, &handlers)
        .run(&recipe, &ctx)
        .expect("run returns the engine node");

    assert_eq!(engine.status, NodeStatus::Error);
    assert!(engine.children.is_empty());
    assert!(log.borrow().is_empty());
    assert_eq!(cli.calls.get(), 0);
    assert_eq!(api.calls.get(), 0);
    assert_eq!(
        engine.terminal_error().expect("engine carries cause").code,
        ErrorCode::ActionMissingOption.as_str()
    );
}

#[test]
fn unknown_action_aborts_the_run() {
    let handlers = HandlerTable::new();
    let registry = ActionRegistry::new();
    let cli = CountingCli::ok();
    let api = CountingApi { calls: Cell::new(0) };
    let resolver = FixedResolver;
    let ctx = context(&cli, &api, &resolver);

    let raw = json!({
        "recipeName": "unknown",
        "groups": [{"name": "main", "steps": [{"action": "no-such-action", "options": {}}]}]
    })
    .to_string();
    let recipe = Recipe::parse(&raw, "test.json").expect("recipe parses");

    let engine = Sequencer::new(&registry, &handlers)
        .run(&recipe, &ctx)
        .expect("run returns the engine node");

    assert_eq!(engine.status, NodeStatus::Error);
    assert_eq!(
        engine.terminal_error().expect("engine carries cause").code,
        ErrorCode::RecipeUnknownAction.as_str()
    );
}

#[test]
fn builtin_recipe_runs_end_to_end() {
    let registry = actions::builtin();
    let handlers = HandlerTable::new();
    let cli = CountingCli::ok();
    let api = CountingApi { calls: Cell::new(0) };
    let resolver = FixedResolver;
    let ctx = context(&cli, &api, &resolver);

    let raw = json!({
        "recipeName": "build-org",
        "groups": [
            {"name": "deploy", "steps": [
                {"action": "deploy-metadata", "options": {"mdapiSource": "unpackaged/pre"}},
            ]},
            {"name": "cleanup", "steps": [
                {"action": "delete-scratch-org", "options": {"scratchOrgAlias": "old-org"}},
            ]}
        ]
    })
    .to_string();
    let recipe = Recipe::parse(&raw, "test.json").expect("recipe parses");

    let engine = Sequencer::new(&registry, &handlers)
        .run(&recipe, &ctx)
        .expect("run returns the engine node");

    assert_eq!(engine.status, NodeStatus::Success);
    assert_eq!(engine.children.len(), 2);
    assert!(engine.children.iter().all(|c| c.status == NodeStatus::Success));
    assert_eq!(completed_steps(&engine), 2);
    assert_eq!(cli.calls.get(), 2);
}
