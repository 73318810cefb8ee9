//! Tag-keyed event multiplexing.
//!
//! An [`EventMuxer`] maps event tags to ordered subscriber lists. Dispatching
//! an event invokes every subscriber registered for its tag, one after the
//! other, in registration order. Subscribers of other tags are untouched.
//!
//! # Tower Service Integration
//!
//! `EventMuxer` implements `tower::Service<InboundEvent>`, so transport code
//! can stack middleware in front of it:
//!
//! ```rust,ignore
//! use tower::ServiceBuilder;
//! use tower::timeout::TimeoutLayer;
//!
//! let muxer = EventMuxer::new()
//!     .on("GUILD_CREATE", on_guild_create)
//!     .on("GUILD_CREATE", warm_cache);
//!
//! let service = ServiceBuilder::new()
//!     .layer(TimeoutLayer::new(Duration::from_secs(5)))
//!     .service(muxer);
//! ```

use std::collections::HashMap;
use std::convert::Infallible;
use std::fmt;
use std::sync::Arc;
use std::task::{Context, Poll};

use async_trait::async_trait;
use serde_json::Value;
use tower::Service;
use tracing::{trace, warn};

use crate::dispatch::{Dispatch, DispatchOutcome, InboundEvent, SubscriberFailure};
use crate::handler::{BoxFuture, BoxedEventHandler, EventHandler, Fault, run_guarded};

/// Internal data for an `EventMuxer`, shared copy-on-write.
#[derive(Clone, Default)]
struct MuxerInner {
    name: Option<String>,
    subscribers: HashMap<String, Vec<BoxedEventHandler>>,
}

/// Routes events to subscribers by tag.
///
/// Cloning is cheap; the subscriber table is shared until one of the clones
/// is modified.
#[derive(Clone, Default)]
pub struct EventMuxer {
    inner: Arc<MuxerInner>,
}

impl EventMuxer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a muxer with a name used in logs and failure reports.
    pub fn named(name: impl Into<String>) -> Self {
        let mut muxer = Self::new();
        muxer.inner_mut().name = Some(name.into());
        muxer
    }

    fn inner_mut(&mut self) -> &mut MuxerInner {
        Arc::make_mut(&mut self.inner)
    }

    /// Appends a subscriber for `tag`.
    pub fn subscribe<H: EventHandler>(&mut self, tag: impl Into<String>, handler: H) {
        self.inner_mut()
            .subscribers
            .entry(tag.into())
            .or_default()
            .push(Arc::new(handler));
    }

    /// Appends a subscriber for `tag` (builder pattern).
    pub fn on<H: EventHandler>(mut self, tag: impl Into<String>, handler: H) -> Self {
        self.subscribe(tag, handler);
        self
    }

    /// Number of subscribers registered for `tag`.
    pub fn subscriber_count(&self, tag: &str) -> usize {
        self.inner.subscribers.get(tag).map_or(0, Vec::len)
    }

    /// Every tag with at least one subscriber.
    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.inner.subscribers.keys().map(String::as_str)
    }

    /// Invokes every subscriber of `tag` in order.
    ///
    /// A subscriber that fails or panics is recorded in the outcome; the
    /// remaining subscribers still run.
    pub async fn dispatch(&self, tag: &str, payload: &Value) -> DispatchOutcome {
        let mut outcome = DispatchOutcome::default();
        let Some(subscribers) = self.inner.subscribers.get(tag) else {
            return outcome;
        };

        for (index, subscriber) in subscribers.iter().enumerate() {
            trace!(muxer = self.label(), tag, index, "Invoking subscriber");
            outcome.delivered += 1;

            if let Err(fault) = run_guarded(|| subscriber.call(payload.clone())).await {
                let (error, panicked) = match fault {
                    Fault::Error(e) => (e, false),
                    Fault::Panic(p) => (p, true),
                };
                warn!(muxer = self.label(), tag, index, panicked, "Subscriber failed: {error}");
                outcome.failures.push(SubscriberFailure {
                    target: self.label().to_string(),
                    tag: tag.to_string(),
                    subscriber: format!("#{index}"),
                    error,
                    panicked,
                });
            }
        }

        outcome
    }

    fn label(&self) -> &str {
        self.inner.name.as_deref().unwrap_or("muxer")
    }
}

#[async_trait]
impl Dispatch for EventMuxer {
    fn name(&self) -> &str {
        self.label()
    }

    async fn dispatch(&self, tag: &str, payload: &Value) -> DispatchOutcome {
        EventMuxer::dispatch(self, tag, payload).await
    }
}

impl Service<InboundEvent> for EventMuxer {
    type Response = DispatchOutcome;
    type Error = Infallible;
    type Future = BoxFuture<'static, Result<DispatchOutcome, Infallible>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, event: InboundEvent) -> Self::Future {
        let muxer = self.clone();
        Box::pin(async move { Ok(muxer.dispatch(&event.tag, &event.payload).await) })
    }
}

impl fmt::Debug for EventMuxer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut tags: Vec<_> = self.tags().collect();
        tags.sort_unstable();
        f.debug_struct("EventMuxer")
            .field("name", &self.inner.name)
            .field("tags", &tags)
            .finish()
    }
}
