use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

/// Error type handlers fail with.
///
/// Any error goes; the dispatcher reports it as an internal failure unless it
/// downcasts to [`wrpc_schema::SchemaViolation`], which is reported as a
/// validation failure instead.
pub type HandlerError = Box<dyn std::error::Error + Send + Sync>;

/// What a handler invocation settles to.
pub type HandlerResult = Result<Value, HandlerError>;

/// A procedure's executable body.
///
/// Receives the schema-validated input and the deployment's opaque context.
/// The context is shared across all in-flight calls and is never touched by
/// the dispatcher itself.
#[async_trait]
pub trait Handler<C: Send + Sync>: Send + Sync {
    async fn call(&self, input: Value, ctx: Arc<C>) -> HandlerResult;
}

/// Adapter turning an async closure into a [`Handler`].
pub(crate) struct FnHandler<F> {
    f: F,
}

impl<F> FnHandler<F> {
    pub(crate) fn new(f: F) -> Self {
        Self { f }
    }
}

#[async_trait]
impl<C, F, Fut> Handler<C> for FnHandler<F>
where
    C: Send + Sync + 'static,
    F: Fn(Value, Arc<C>) -> Fut + Send + Sync,
    Fut: Future<Output = HandlerResult> + Send,
{
    async fn call(&self, input: Value, ctx: Arc<C>) -> HandlerResult {
        (self.f)(input, ctx).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct Echo;

    #[async_trait]
    impl Handler<()> for Echo {
        async fn call(&self, input: Value, _ctx: Arc<()>) -> HandlerResult {
            Ok(input)
        }
    }

    #[tokio::test]
    async fn test_struct_handler() {
        let result = Echo.call(json!({"x": 1}), Arc::new(())).await.unwrap();
        assert_eq!(result, json!({"x": 1}));
    }

    #[tokio::test]
    async fn test_fn_handler() {
        let handler = FnHandler::new(|input: Value, _ctx: Arc<u32>| async move { Ok(input) });
        let result = handler.call(json!(7), Arc::new(0u32)).await.unwrap();
        assert_eq!(result, json!(7));
    }
}
