//! Render passes driven against recording collaborators.

mod support;

use futures::executor::block_on;
use nami::{Binding, binding};
use serde_json::json;
use support::Harness;
use waterui_reconcile::{
    Component, ElementId, HeadStyle, HostContext, IntermediateNode, JsxNode, NodeType, Props,
    RawNode, ReactiveBinding, RenderConfig, RenderError, RenderFlags, WrapPolicy,
};

const HOST: ElementId = ElementId::new(10);

fn counter(count: i64) -> RawNode {
    RawNode::from(
        JsxNode::element("div")
            .with_prop("class", "counter")
            .with_children(vec![RawNode::from("Count: "), RawNode::Int(count)]),
    )
}

#[test]
fn first_pass_mounts_and_caches_tree() {
    let harness = Harness::new(RenderConfig::new());
    harness.executor.set(|_| Ok(counter(1)));
    let mut host = HostContext::new(HOST);
    host.append_style(HeadStyle::new("counter-css", ".counter{}"));
    let ctx = harness.context();

    let report = block_on(harness.renderer.render_host(&ctx, &mut host, RenderFlags::empty()))
        .expect("first render should succeed");
    assert!(report.just_mounted);
    assert_eq!(report.styles_flushed, 1);
    assert!(host.is_mounted());

    let cached = host.cached_tree().expect("tree cached after the pass");
    assert_eq!(cached.bound_element(), Some(HOST));
    assert_eq!(cached.children()[0].id(), "div");
    assert_eq!(ctx.static_ctx().head_styles().len(), 1);
    assert_eq!(ctx.static_ctx().host_elements(), [HOST]);

    harness.executor.set(|_| Ok(counter(2)));
    let report = block_on(harness.renderer.render_host(&ctx, &mut host, RenderFlags::empty()))
        .expect("second render should succeed");
    assert!(!report.just_mounted);
    assert_eq!(report.styles_flushed, 0);
    assert_eq!(ctx.static_ctx().head_styles().len(), 1);

    let commits = harness.diff.commits.borrow();
    assert_eq!(commits.len(), 2);
    assert_eq!(commits[1].old, commits[0].new);
    assert_eq!(
        commits[1].new["children"][0]["children"][1]["text"],
        json!("2")
    );
}

#[test]
fn subscriptions_clear_before_the_component_runs() {
    let harness = Harness::new(RenderConfig::new());
    harness.executor.set(|_| Ok(RawNode::from("hi")));
    let mut host = HostContext::new(HOST);
    let ctx = harness.context();

    block_on(harness.renderer.render_host(&ctx, &mut host, RenderFlags::empty()))
        .expect("render should succeed");
    assert_eq!(
        harness.journal(),
        ["clear #10", "execute #10", "commit"]
    );
}

#[test]
fn pass_unstages_the_host() {
    let harness = Harness::new(RenderConfig::new());
    let mut host = HostContext::new(HOST);
    harness.container.mark_dirty(HOST);
    harness.container.mark_dirty(ElementId::new(11));
    let ctx = harness.context();

    block_on(harness.renderer.render_host(&ctx, &mut host, RenderFlags::empty()))
        .expect("render should succeed");
    assert!(!harness.container.is_staged(HOST));
    assert_eq!(harness.container.staged_hosts(), [ElementId::new(11)]);
}

#[test]
fn diff_receives_root_id_flags_and_component_context() {
    let harness = Harness::new(RenderConfig::new().with_root_id("app-root"));
    harness.executor.set(|_| Ok(RawNode::from(vec!["a", "b"])));
    let mut host = HostContext::new(HOST);
    let ctx = harness.context();

    block_on(harness.renderer.render_host(&ctx, &mut host, RenderFlags::IS_SVG))
        .expect("render should succeed");
    let commits = harness.diff.commits.borrow();
    assert_eq!(commits[0].root_id, "app-root");
    assert_eq!(commits[0].flags, RenderFlags::IS_SVG);
    assert_eq!(commits[0].component, Some(HOST));
    assert_eq!(commits[0].new["id"], json!(":virtual"));
    assert_eq!(commits[0].new["children"].as_array().map(Vec::len), Some(2));
}

#[test]
fn hydration_reads_existing_markup_once() {
    let harness = Harness::new(RenderConfig::new());
    harness.markup.children.borrow_mut().insert(
        HOST,
        vec![IntermediateNode::element(
            "p",
            Props::new(),
            vec![IntermediateNode::text("from server")],
        )],
    );
    harness.executor.set(|_| Ok(RawNode::from(JsxNode::element("p").with_children("live"))));
    let mut host = HostContext::new(HOST);
    let ctx = harness.context();

    block_on(harness.renderer.render_host(&ctx, &mut host, RenderFlags::empty()))
        .expect("first render should succeed");
    block_on(harness.renderer.render_host(&ctx, &mut host, RenderFlags::empty()))
        .expect("second render should succeed");

    assert_eq!(harness.markup.reads.get(), 1);
    let commits = harness.diff.commits.borrow();
    assert_eq!(
        commits[0].old["children"][0]["children"][0]["text"],
        json!("from server")
    );
    assert_eq!(
        commits[1].old["children"][0]["children"][0]["text"],
        json!("live")
    );
}

#[test]
fn previous_tree_of_empty_host_is_empty_fragment() {
    let harness = Harness::new(RenderConfig::new());
    let mut host = HostContext::new(HOST);
    let tree = harness.renderer.previous_tree(&mut host);
    assert_eq!(tree.id(), ":virtual");
    assert!(tree.children().is_empty());
    assert_eq!(tree.bound_element(), Some(HOST));
}

#[test]
fn invalid_node_type_keeps_cached_tree() {
    let harness = Harness::new(RenderConfig::new());
    harness.executor.set(|_| Ok(RawNode::from("stable")));
    let mut host = HostContext::new(HOST);
    let ctx = harness.context();
    block_on(harness.renderer.render_host(&ctx, &mut host, RenderFlags::empty()))
        .expect("first render should succeed");
    let before = host.cached_tree().map(IntermediateNode::snapshot);

    harness
        .executor
        .set(|_| Ok(RawNode::from(JsxNode::new(NodeType::from(json!(42))))));
    harness.container.mark_dirty(HOST);
    let err = block_on(harness.renderer.render_host(&ctx, &mut host, RenderFlags::empty()))
        .expect_err("numeric node type must abort the pass");

    assert!(err.is_invalid_node_type());
    assert_eq!(host.cached_tree().map(IntermediateNode::snapshot), before);
    assert!(!harness.container.is_staged(HOST));
    assert_eq!(
        harness.journal(),
        ["clear #10", "execute #10", "commit", "clear #10", "execute #10"]
    );
}

#[test]
fn failed_first_pass_stays_unmounted() {
    let harness = Harness::new(RenderConfig::new());
    harness.executor.set(|_| Ok(RawNode::from("x")));
    harness.diff.fail_next.set(true);
    let mut host = HostContext::new(HOST);
    host.append_style(HeadStyle::new("s", "p{}"));
    let ctx = harness.context();

    let err = block_on(harness.renderer.render_host(&ctx, &mut host, RenderFlags::empty()))
        .expect_err("commit failure must propagate");
    assert!(matches!(err, RenderError::Commit(_)));
    assert!(!host.is_mounted());
    assert!(harness.diff.commits.borrow().is_empty());

    let report = block_on(harness.renderer.render_host(&ctx, &mut host, RenderFlags::empty()))
        .expect("retry should succeed");
    assert!(report.just_mounted);
    assert_eq!(report.styles_flushed, 0);
    assert_eq!(ctx.static_ctx().head_styles().len(), 1);
}

#[test]
fn executor_failure_propagates_unchanged() {
    let harness = Harness::new(RenderConfig::new());
    harness.executor.set(|_| Err("component panicked".into()));
    let mut host = HostContext::new(HOST);
    let ctx = harness.context();

    let err = block_on(harness.renderer.render_host(&ctx, &mut host, RenderFlags::empty()))
        .expect_err("executor failure must propagate");
    match err {
        RenderError::Executor(source) => assert_eq!(source.to_string(), "component panicked"),
        other => panic!("unexpected error {other:?}"),
    }
    assert!(host.cached_tree().is_none());
    assert_eq!(harness.journal(), ["clear #10", "execute #10"]);
}

#[test]
fn components_see_configured_locale_and_policy() {
    let harness = Harness::new(
        RenderConfig::new()
            .with_locale("de")
            .with_wrap_policy(WrapPolicy::Always),
    );
    let greeting = Component::new("Greeting", |ctx, _| {
        RawNode::from(format!("locale={}", ctx.locale()))
    });
    harness
        .executor
        .set(move |_| Ok(RawNode::from(JsxNode::component(greeting.clone()))));
    let mut host = HostContext::new(HOST);
    let ctx = harness.context();

    block_on(harness.renderer.render_host(&ctx, &mut host, RenderFlags::empty()))
        .expect("render should succeed");
    let tree = host.cached_tree().expect("tree cached");
    let wrapper = &tree.children()[0];
    assert_eq!(wrapper.id(), ":virtual");
    assert_eq!(wrapper.children()[0].text_value(), Some("locale=de"));
}

#[test]
fn reactive_leaves_subscribe_under_the_host() {
    let harness = Harness::new(RenderConfig::new());
    let name: Binding<String> = binding(String::from("Ada"));
    let bound = ReactiveBinding::new(name.clone());
    harness
        .executor
        .set(move |_| Ok(RawNode::from(vec![RawNode::from("Hi "), bound.clone().into()])));
    let mut host = HostContext::new(HOST);
    let ctx = harness.context();

    block_on(harness.renderer.render_host(&ctx, &mut host, RenderFlags::empty()))
        .expect("render should succeed");
    let tree = host.cached_tree().expect("tree cached");
    let leaf = tree.children()[1]
        .reactive_leaf()
        .expect("second child is reactive");
    assert_eq!(leaf.subscriber.map(|s| s.host), Some(HOST));
    name.set(String::from("Grace"));
    assert_eq!(leaf.binding.current(), "Grace");
}

#[test]
fn pending_component_output_is_awaited() {
    let harness = Harness::new(RenderConfig::new());
    harness.executor.set(|_| {
        Ok(RawNode::pending(async {
            RawNode::from(JsxNode::element("ul").with_children(vec![
                RawNode::pending(async { RawNode::from(JsxNode::element("li").with_key("a")) }),
                RawNode::SkipRender,
            ]))
        }))
    });
    let mut host = HostContext::new(HOST);
    let ctx = harness.context();

    block_on(harness.renderer.render_host(&ctx, &mut host, RenderFlags::empty()))
        .expect("render should succeed");
    let tree = host.cached_tree().expect("tree cached");
    let list = &tree.children()[0];
    let ids: Vec<&str> = list.children().iter().map(IntermediateNode::id).collect();
    assert_eq!(ids, ["li:a", ":skipRender"]);
}
