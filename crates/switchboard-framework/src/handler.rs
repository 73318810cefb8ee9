//! Handler traits for commands, components and raw events.
//!
//! Handlers are plain async closures or functions. A blanket implementation of
//! [`Handler`] covers any `Fn(I, A) -> impl Future` whose output implements
//! [`HandlerReturn`], so both of these work:
//!
//! ```rust,ignore
//! async fn ping(mut ctx: CommandInteraction, _args: CommandArgs) -> Result<(), BoxError> {
//!     ctx.ack_with_message("pong".into()).await?;
//!     Ok(())
//! }
//!
//! let on_ready = |payload: Value| async move {
//!     println!("ready: {payload}");
//! };
//! ```

use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::pin::Pin;
use std::sync::Arc;

use futures::FutureExt;
use serde_json::Value;
use switchboard_core::CommandArgs;
use tower::BoxError;

use crate::interaction::{CommandInteraction, ComponentInteraction, ModalSubmitInteraction};

/// A type alias for a boxed, pinned future that is `Send`.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// What every handler invocation resolves to once its return value is
/// normalized.
pub type HandlerResult = Result<(), BoxError>;

// ============================================================================
// HandlerReturn
// ============================================================================

/// Types a handler may return.
pub trait HandlerReturn: Send + 'static {
    /// Normalizes the return value into a [`HandlerResult`].
    fn into_result(self) -> HandlerResult;
}

impl HandlerReturn for () {
    fn into_result(self) -> HandlerResult {
        Ok(())
    }
}

impl<E> HandlerReturn for Result<(), E>
where
    E: Into<BoxError> + Send + 'static,
{
    fn into_result(self) -> HandlerResult {
        self.map_err(Into::into)
    }
}

// ============================================================================
// Handler
// ============================================================================

/// An async callback taking an input `I` and arguments `A`.
pub trait Handler<I, A>: Send + Sync + 'static {
    /// Invokes the handler.
    fn call(&self, input: I, args: A) -> BoxFuture<'static, HandlerResult>;
}

impl<F, Fut, R, I, A> Handler<I, A> for F
where
    F: Fn(I, A) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: HandlerReturn,
{
    fn call(&self, input: I, args: A) -> BoxFuture<'static, HandlerResult> {
        let fut = (self)(input, args);
        Box::pin(async move { fut.await.into_result() })
    }
}

/// Handler for slash and context menu commands.
pub type BoxedCommandHandler = Arc<dyn Handler<CommandInteraction, CommandArgs>>;

/// Handler for buttons and select menus; receives the decoded bound data.
pub type BoxedComponentHandler = Arc<dyn Handler<ComponentInteraction, Value>>;

/// Handler for modal submissions; receives the decoded bound data.
pub type BoxedModalHandler = Arc<dyn Handler<ModalSubmitInteraction, Value>>;

/// A raw event subscriber; receives the event payload.
pub trait EventHandler: Send + Sync + 'static {
    /// Invokes the subscriber.
    fn call(&self, payload: Value) -> BoxFuture<'static, HandlerResult>;
}

impl<F, Fut, R> EventHandler for F
where
    F: Fn(Value) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: HandlerReturn,
{
    fn call(&self, payload: Value) -> BoxFuture<'static, HandlerResult> {
        let fut = (self)(payload);
        Box::pin(async move { fut.await.into_result() })
    }
}

/// A shared, type-erased [`EventHandler`].
pub type BoxedEventHandler = Arc<dyn EventHandler>;

// ============================================================================
// Guarded invocation
// ============================================================================

/// How a guarded handler invocation failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Fault {
    Error(String),
    Panic(String),
}

/// Invokes a handler, converting both `Err` returns and panics into a
/// [`Fault`].
///
/// `call` runs inside the guard too, so a handler that panics before it
/// builds its future is caught like one that panics while polled.
pub(crate) async fn run_guarded<F>(call: F) -> Result<(), Fault>
where
    F: FnOnce() -> BoxFuture<'static, HandlerResult>,
{
    match AssertUnwindSafe(async move { call().await })
        .catch_unwind()
        .await
    {
        Ok(Ok(())) => Ok(()),
        Ok(Err(e)) => Err(Fault::Error(e.to_string())),
        Err(payload) => Err(Fault::Panic(panic_message(payload.as_ref()))),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "handler panicked".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn test_unit_and_result_returns() {
        let calls = Arc::new(AtomicUsize::new(0));
        let c = calls.clone();
        let unit = move |_payload: Value| {
            let c = c.clone();
            async move {
                c.fetch_add(1, Ordering::SeqCst);
            }
        };
        let failing = |_payload: Value| async { Err::<(), _>("boom") };

        assert!(EventHandler::call(&unit, Value::Null).await.is_ok());
        let err = EventHandler::call(&failing, Value::Null).await.unwrap_err();
        assert_eq!(err.to_string(), "boom");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_run_guarded_catches_panics() {
        let fut: BoxFuture<'static, HandlerResult> = Box::pin(async {
            if true {
                panic!("kaboom");
            }
            Ok::<(), BoxError>(())
        });
        assert_eq!(run_guarded(|| fut).await, Err(Fault::Panic("kaboom".into())));

        let fut: BoxFuture<'static, HandlerResult> = Box::pin(async { Err::<(), BoxError>("bad".into()) });
        assert_eq!(run_guarded(|| fut).await, Err(Fault::Error("bad".into())));
    }

    #[tokio::test]
    async fn test_run_guarded_catches_panic_before_future() {
        let eager = |_payload: Value| -> futures::future::Ready<()> { panic!("eager boom") };
        let result = run_guarded(|| EventHandler::call(&eager, Value::Null)).await;
        assert_eq!(result, Err(Fault::Panic("eager boom".into())));
    }
}
