//! Collaborator doubles shared by the integration tests.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use futures::FutureExt;
use futures::future::LocalBoxFuture;
use serde_json::Value;
use waterui_reconcile::{
    BoxError, ComponentExecutor, ContainerState, DiffEngine, ElementId, ExecutedComponent,
    HostContext, IntermediateNode, RawNode, RenderConfig, RenderContext, RenderFlags, Renderer,
    SubscriptionManager, TreeReconstructor,
};

/// Ordered record of collaborator calls.
pub type Journal = Rc<RefCell<Vec<String>>>;

pub struct RecordingSubscriptions {
    pub journal: Journal,
}

impl SubscriptionManager for RecordingSubscriptions {
    fn clear_subscriptions(&self, host: ElementId) {
        self.journal.borrow_mut().push(format!("clear {host}"));
    }
}

type Render = Box<dyn Fn(&HostContext) -> Result<RawNode, BoxError>>;

/// Executes whatever render function is currently installed.
pub struct ScriptedExecutor {
    pub journal: Journal,
    render: RefCell<Render>,
}

impl ScriptedExecutor {
    pub fn set(&self, render: impl Fn(&HostContext) -> Result<RawNode, BoxError> + 'static) {
        *self.render.borrow_mut() = Box::new(render);
    }
}

impl ComponentExecutor for ScriptedExecutor {
    fn execute<'a>(
        &'a self,
        ctx: &'a RenderContext,
        host: &'a HostContext,
    ) -> LocalBoxFuture<'a, Result<ExecutedComponent, BoxError>> {
        async move {
            self.journal
                .borrow_mut()
                .push(format!("execute {}", host.element()));
            let node = (self.render.borrow())(host)?;
            Ok(ExecutedComponent {
                node,
                render_ctx: ctx.for_component(host.element()),
            })
        }
        .boxed_local()
    }
}

/// One recorded call to the diff engine.
#[derive(Debug, Clone)]
pub struct Commit {
    pub old: Value,
    pub new: Value,
    pub root_id: String,
    pub flags: RenderFlags,
    pub component: Option<ElementId>,
}

pub struct RecordingDiff {
    pub journal: Journal,
    pub commits: RefCell<Vec<Commit>>,
    pub fail_next: Cell<bool>,
}

impl DiffEngine for RecordingDiff {
    fn smart_update_children<'a>(
        &'a self,
        ctx: &'a RenderContext,
        old: &'a IntermediateNode,
        new: &'a IntermediateNode,
        root_id: &'a str,
        flags: RenderFlags,
    ) -> LocalBoxFuture<'a, Result<(), BoxError>> {
        async move {
            self.journal.borrow_mut().push("commit".to_owned());
            if self.fail_next.replace(false) {
                return Err("target detached".into());
            }
            self.commits.borrow_mut().push(Commit {
                old: old.snapshot(),
                new: new.snapshot(),
                root_id: root_id.to_owned(),
                flags,
                component: ctx.component(),
            });
            Ok(())
        }
        .boxed_local()
    }
}

/// Live children per element, as server markup would have produced them.
#[derive(Default)]
pub struct MemoryMarkup {
    pub children: RefCell<HashMap<ElementId, Vec<IntermediateNode>>>,
    pub reads: Cell<usize>,
}

impl TreeReconstructor for MemoryMarkup {
    fn reconstruct_tree(&self, element: ElementId) -> Vec<IntermediateNode> {
        self.reads.set(self.reads.get() + 1);
        self.children
            .borrow()
            .get(&element)
            .cloned()
            .unwrap_or_default()
    }
}

pub struct Harness {
    pub journal: Journal,
    pub executor: Rc<ScriptedExecutor>,
    pub diff: Rc<RecordingDiff>,
    pub markup: Rc<MemoryMarkup>,
    pub container: Rc<ContainerState>,
    pub renderer: Renderer,
}

impl Harness {
    pub fn new(config: RenderConfig) -> Self {
        let journal = Journal::default();
        let executor = Rc::new(ScriptedExecutor {
            journal: Rc::clone(&journal),
            render: RefCell::new(Box::new(|_| Ok(RawNode::Null))),
        });
        let diff = Rc::new(RecordingDiff {
            journal: Rc::clone(&journal),
            commits: RefCell::default(),
            fail_next: Cell::new(false),
        });
        let markup = Rc::new(MemoryMarkup::default());
        let container = Rc::new(ContainerState::new(Rc::new(RecordingSubscriptions {
            journal: Rc::clone(&journal),
        })));
        let renderer = Renderer::new(
            config,
            executor.clone(),
            diff.clone(),
            markup.clone(),
        );
        Self {
            journal,
            executor,
            diff,
            markup,
            container,
            renderer,
        }
    }

    pub fn context(&self) -> RenderContext {
        self.renderer.root_context(Rc::clone(&self.container))
    }

    pub fn journal(&self) -> Vec<String> {
        self.journal.borrow().clone()
    }
}
