//! The route tree: named procedures nested under namespace groups.

use std::collections::BTreeMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use serde_json::Value;

use wrpc_schema::Schema;

use crate::handler::{FnHandler, Handler, HandlerResult};

/// A leaf of the route tree: an input schema plus its handler.
///
/// A procedure is always a leaf; it can never contain nested routes.
pub struct Procedure<C> {
    input: Schema,
    handler: Arc<dyn Handler<C>>,
}

impl<C: Send + Sync + 'static> Procedure<C> {
    /// Define a procedure from an async closure.
    pub fn new<F, Fut>(input: Schema, f: F) -> Self
    where
        F: Fn(Value, Arc<C>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HandlerResult> + Send + 'static,
    {
        Self {
            input,
            handler: Arc::new(FnHandler::new(f)),
        }
    }

    /// Define a procedure from a handler object.
    pub fn from_handler<H>(input: Schema, handler: H) -> Self
    where
        H: Handler<C> + 'static,
    {
        Self {
            input,
            handler: Arc::new(handler),
        }
    }

    /// The procedure's input contract.
    pub fn input_schema(&self) -> &Schema {
        &self.input
    }

    /// Invoke the handler with already-validated input.
    pub async fn call(&self, input: Value, ctx: Arc<C>) -> HandlerResult {
        self.handler.call(input, ctx).await
    }
}

impl<C> Clone for Procedure<C> {
    fn clone(&self) -> Self {
        Self {
            input: self.input.clone(),
            handler: Arc::clone(&self.handler),
        }
    }
}

impl<C> fmt::Debug for Procedure<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Procedure")
            .field("input", &self.input)
            .finish_non_exhaustive()
    }
}

/// One node of the route tree, explicitly tagged.
///
/// Resolution matches on the tag; a group that happens to contain a child
/// named `handler` is still a group, never mistaken for a leaf.
#[derive(Debug, Clone)]
pub enum RouteNode<C> {
    /// A namespace group of named children.
    Group(BTreeMap<String, RouteNode<C>>),
    /// A callable leaf.
    Procedure(Procedure<C>),
}

/// An immutable tree of named procedures.
///
/// Built once at startup via [`Router::builder`]; there is no way to add or
/// remove routes afterwards.
#[derive(Debug)]
pub struct Router<C> {
    root: BTreeMap<String, RouteNode<C>>,
}

impl<C: Send + Sync + 'static> Router<C> {
    pub fn builder() -> RouterBuilder<C> {
        RouterBuilder::new()
    }

    /// Resolve a dotted path to a procedure.
    ///
    /// Walks namespace groups left to right. An empty path, an empty segment,
    /// a missing segment, a path that walks past a leaf, or a path ending on a
    /// group all resolve to `None` — a group is reachable but not callable.
    pub fn resolve(&self, path: &str) -> Option<&Procedure<C>> {
        let mut current: Option<&RouteNode<C>> = None;
        for segment in path.split('.') {
            if segment.is_empty() {
                return None;
            }
            let children = match current {
                None => &self.root,
                Some(RouteNode::Group(children)) => children,
                Some(RouteNode::Procedure(_)) => return None,
            };
            current = Some(children.get(segment)?);
        }
        match current {
            Some(RouteNode::Procedure(procedure)) => Some(procedure),
            _ => None,
        }
    }

    /// Names registered at the top level, in iteration order.
    pub fn top_level_names(&self) -> impl Iterator<Item = &str> {
        self.root.keys().map(String::as_str)
    }
}

/// Builder for a [`Router`].
///
/// Names are unique within one group; registering the same name twice keeps
/// the later registration.
pub struct RouterBuilder<C> {
    root: BTreeMap<String, RouteNode<C>>,
}

impl<C: Send + Sync + 'static> RouterBuilder<C> {
    pub fn new() -> Self {
        Self {
            root: BTreeMap::new(),
        }
    }

    /// Register a procedure under `name`.
    pub fn route(mut self, name: impl Into<String>, procedure: Procedure<C>) -> Self {
        self.root
            .insert(name.into(), RouteNode::Procedure(procedure));
        self
    }

    /// Register a nested namespace group under `name`.
    pub fn nest(mut self, name: impl Into<String>, group: RouterBuilder<C>) -> Self {
        self.root.insert(name.into(), RouteNode::Group(group.root));
        self
    }

    pub fn build(self) -> Router<C> {
        Router { root: self.root }
    }
}

impl<C: Send + Sync + 'static> Default for RouterBuilder<C> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_router() -> Router<()> {
        Router::builder()
            .route(
                "hello",
                Procedure::new(Schema::object([("name", Schema::string())]), |input, _| async move {
                    Ok(json!(format!(
                        "Hello {}",
                        input["name"].as_str().unwrap_or_default()
                    )))
                }),
            )
            .nest(
                "subRouter",
                RouterBuilder::new().route(
                    "subRoute",
                    Procedure::new(
                        Schema::object([("ids", Schema::array(Schema::string()))]),
                        |input, _| async move { Ok(json!({"ids": input["ids"]})) },
                    ),
                ),
            )
            .build()
    }

    #[test]
    fn test_resolves_top_level_leaf() {
        let router = sample_router();
        assert!(router.resolve("hello").is_some());
    }

    #[test]
    fn test_resolves_nested_leaf() {
        let router = sample_router();
        assert!(router.resolve("subRouter.subRoute").is_some());
    }

    #[test]
    fn test_group_is_not_callable() {
        let router = sample_router();
        assert!(router.resolve("subRouter").is_none());
    }

    #[test]
    fn test_walking_past_a_leaf_fails() {
        let router = sample_router();
        assert!(router.resolve("hello.notFound").is_none());
    }

    #[test]
    fn test_malformed_paths_fail() {
        let router = sample_router();
        assert!(router.resolve("").is_none());
        assert!(router.resolve("subRouter..subRoute").is_none());
        assert!(router.resolve("hello.").is_none());
        assert!(router.resolve(".hello").is_none());
        assert!(router.resolve("missing").is_none());
        assert!(router.resolve("subRouter.missing").is_none());
    }

    #[test]
    fn test_resolve_is_idempotent() {
        let router = sample_router();
        let first = router.resolve("hello").unwrap();
        let second = router.resolve("hello").unwrap();
        assert!(std::ptr::eq(first, second));
    }

    #[test]
    fn test_later_registration_wins() {
        let router: Router<()> = Router::builder()
            .route(
                "x",
                Procedure::new(Schema::any(), |_, _| async move { Ok(json!(1)) }),
            )
            .route(
                "x",
                Procedure::new(Schema::any(), |_, _| async move { Ok(json!(2)) }),
            )
            .build();
        assert_eq!(router.top_level_names().count(), 1);
    }

    #[test]
    fn test_leaf_marker_names_are_ordinary() {
        // "input" and "handler" carry no special meaning as route names.
        let router: Router<()> = Router::builder()
            .nest(
                "group",
                RouterBuilder::new()
                    .route(
                        "input",
                        Procedure::new(Schema::any(), |_, _| async move { Ok(json!("input")) }),
                    )
                    .route(
                        "handler",
                        Procedure::new(Schema::any(), |_, _| async move { Ok(json!("handler")) }),
                    ),
            )
            .build();
        assert!(router.resolve("group.input").is_some());
        assert!(router.resolve("group.handler").is_some());
        assert!(router.resolve("group").is_none());
    }
}
