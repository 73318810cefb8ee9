//! Event dispatch for the Switchboard framework.
//!
//! This module provides the [`DispatchRoot`], the single entry point a
//! transport calls for every platform event. The root holds independent
//! dispatch targets ([`EventMuxer`](crate::EventMuxer)s and
//! [`InteractionRouter`](crate::InteractionRouter)s) and hands each event to
//! all of them in registration order.
//!
//! A failing subscriber never stops delivery: its error or panic is recorded
//! in the [`DispatchOutcome`] and passed to the root's [`FailureReporter`].
//!
//! ```rust,ignore
//! let mut root = DispatchRoot::new();
//! root.add(router);
//! root.add(EventMuxer::new().on("READY", on_ready));
//!
//! // From the transport loop:
//! root.spawn_dispatch(InboundEvent::new(tag, payload));
//! ```

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::task::JoinHandle;
use tracing::{Instrument, Level, debug, error, span};

// ============================================================================
// Events and outcomes
// ============================================================================

/// A platform event as delivered by the transport.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InboundEvent {
    pub tag: String,
    #[serde(default)]
    pub payload: Value,
}

impl InboundEvent {
    pub fn new(tag: impl Into<String>, payload: Value) -> Self {
        Self {
            tag: tag.into(),
            payload,
        }
    }
}

/// A subscriber that returned an error or panicked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriberFailure {
    /// Name of the dispatch target the subscriber belongs to.
    pub target: String,
    /// Tag of the event being dispatched.
    pub tag: String,
    /// Which subscriber failed, e.g. `#2` or `command:mod hard kick`.
    pub subscriber: String,
    pub error: String,
    pub panicked: bool,
}

impl fmt::Display for SubscriberFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let what = if self.panicked { "panicked" } else { "failed" };
        write!(
            f,
            "subscriber {} of '{}' {what} on {}: {}",
            self.subscriber, self.target, self.tag, self.error
        )
    }
}

/// Summary of one dispatch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchOutcome {
    /// Number of subscribers invoked, including those that failed.
    pub delivered: usize,
    pub failures: Vec<SubscriberFailure>,
}

impl DispatchOutcome {
    /// Whether every invoked subscriber succeeded.
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn merge(&mut self, other: DispatchOutcome) {
        self.delivered += other.delivered;
        self.failures.extend(other.failures);
    }
}

// ============================================================================
// Dispatch trait
// ============================================================================

/// Something that can receive dispatched events.
#[async_trait]
pub trait Dispatch: Send + Sync {
    /// Name used in logs and failure reports.
    fn name(&self) -> &str;

    /// Delivers one event. Tags the target does not handle are a no-op.
    async fn dispatch(&self, tag: &str, payload: &Value) -> DispatchOutcome;
}

// ============================================================================
// Failure reporting
// ============================================================================

/// Receives every subscriber failure.
pub trait FailureReporter: Send + Sync {
    fn report(&self, failure: &SubscriberFailure);
}

/// Logs failures with `tracing::error!`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogReporter;

impl FailureReporter for LogReporter {
    fn report(&self, failure: &SubscriberFailure) {
        error!(
            target_name = %failure.target,
            tag = %failure.tag,
            subscriber = %failure.subscriber,
            panicked = failure.panicked,
            "Subscriber failed: {}",
            failure.error
        );
    }
}

impl<F> FailureReporter for F
where
    F: Fn(&SubscriberFailure) + Send + Sync,
{
    fn report(&self, failure: &SubscriberFailure) {
        (self)(failure)
    }
}

// ============================================================================
// DispatchRoot
// ============================================================================

/// The set of dispatch targets for a process.
#[derive(Clone)]
pub struct DispatchRoot {
    targets: Vec<Arc<dyn Dispatch>>,
    reporter: Arc<dyn FailureReporter>,
}

impl Default for DispatchRoot {
    fn default() -> Self {
        Self::new()
    }
}

impl DispatchRoot {
    pub fn new() -> Self {
        Self {
            targets: Vec::new(),
            reporter: Arc::new(LogReporter),
        }
    }

    /// Adds a dispatch target. Targets receive events in the order added.
    pub fn add<D: Dispatch + 'static>(&mut self, target: D) {
        self.targets.push(Arc::new(target));
    }

    /// Adds a dispatch target (builder pattern).
    pub fn with<D: Dispatch + 'static>(mut self, target: D) -> Self {
        self.add(target);
        self
    }

    /// Adds an already shared dispatch target.
    pub fn add_shared(&mut self, target: Arc<dyn Dispatch>) {
        self.targets.push(target);
    }

    /// Replaces the failure reporter.
    pub fn set_reporter<R: FailureReporter + 'static>(&mut self, reporter: R) {
        self.reporter = Arc::new(reporter);
    }

    /// Replaces the failure reporter (builder pattern).
    pub fn with_reporter<R: FailureReporter + 'static>(mut self, reporter: R) -> Self {
        self.set_reporter(reporter);
        self
    }

    pub fn target_count(&self) -> usize {
        self.targets.len()
    }

    /// Dispatches an event to every target and waits for all subscribers.
    pub async fn dispatch(&self, tag: &str, payload: &Value) -> DispatchOutcome {
        let span = span!(Level::DEBUG, "dispatch", tag = %tag);

        async {
            let mut outcome = DispatchOutcome::default();
            for target in &self.targets {
                outcome.merge(target.dispatch(tag, payload).await);
            }

            for failure in &outcome.failures {
                self.reporter.report(failure);
            }
            debug!(
                delivered = outcome.delivered,
                failures = outcome.failures.len(),
                "Dispatch finished"
            );
            outcome
        }
        .instrument(span)
        .await
    }

    /// Spawns the dispatch of an event on the tokio runtime and returns
    /// immediately.
    pub fn spawn_dispatch(self: &Arc<Self>, event: InboundEvent) -> JoinHandle<DispatchOutcome> {
        let root = Arc::clone(self);
        tokio::spawn(async move { root.dispatch(&event.tag, &event.payload).await })
    }
}

impl fmt::Debug for DispatchRoot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DispatchRoot")
            .field(
                "targets",
                &self.targets.iter().map(|t| t.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}
