//! Main runtime orchestration.
//!
//! The runtime owns the process's [`DispatchRoot`], registers commands with the
//! platform on startup and drains an event channel the transport feeds.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use switchboard_runtime::SwitchboardRuntime;
//!
//! let mut runtime = SwitchboardRuntime::builder()
//!     .config_file("switchboard.toml")
//!     .api(api)
//!     .registrar(registrar)
//!     .build()?;
//!
//! let mut router = runtime.router("main");
//! router.command(Command::chat("ping", "Pong!").build(ping)?)?;
//! runtime.add_router(router)?;
//!
//! // Hand this to the transport.
//! let events = runtime.event_sender();
//! tokio::spawn(gateway.pump(events));
//!
//! // Runs until the transport drops every sender or Ctrl+C.
//! let stats = runtime.run().await?;
//! ```

use std::future::Future;
use std::path::Path;
use std::sync::Arc;

use futures::StreamExt;
use futures::stream::FuturesUnordered;
use switchboard_core::{BoxedCommandRegistrar, BoxedInteractionApi, FlatCommand, FlatGroup};
use switchboard_framework::{
    Dispatch, DispatchOutcome, DispatchRoot, DuplicateCommandError, EventMuxer, FailureReporter,
    InboundEvent, InteractionRouter, merge_group,
};
use tokio::signal;
use tokio::sync::mpsc;
use tokio::task::JoinError;
use tracing::{debug, info, warn};

use crate::config::{ConfigLoader, SwitchboardConfig};
use crate::error::{RuntimeError, RuntimeResult};
use crate::logging;

/// Counters collected while the runtime runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RuntimeStats {
    /// Events taken off the event channel.
    pub events_received: u64,
    /// Dispatches that ran to completion.
    pub events_dispatched: u64,
    /// Subscriber invocations that completed, successful or not.
    pub deliveries: u64,
    /// Subscribers that returned an error or panicked.
    pub subscriber_failures: u64,
}

impl RuntimeStats {
    fn record(&mut self, outcome: &DispatchOutcome) {
        self.events_dispatched += 1;
        self.deliveries += outcome.delivered as u64;
        self.subscriber_failures += outcome.failures.len() as u64;
    }

    fn record_joined(&mut self, joined: Result<DispatchOutcome, JoinError>) {
        match joined {
            Ok(outcome) => self.record(&outcome),
            Err(e) => warn!(error = %e, "Dispatch task did not complete"),
        }
    }
}

/// Wires routers and muxers to the platform.
pub struct SwitchboardRuntime {
    config: SwitchboardConfig,
    api: BoxedInteractionApi,
    registrar: Option<BoxedCommandRegistrar>,
    root: DispatchRoot,
    routers: Vec<Arc<InteractionRouter>>,
    sender: mpsc::Sender<InboundEvent>,
    receiver: mpsc::Receiver<InboundEvent>,
    started: bool,
}

impl SwitchboardRuntime {
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    /// Creates a runtime from an already loaded configuration.
    ///
    /// Installs the global log subscriber described by `config.logging`
    /// unless one is already set.
    pub fn from_config(config: SwitchboardConfig, api: BoxedInteractionApi) -> Self {
        logging::init_from_config(&config.logging);

        let (sender, receiver) = mpsc::channel(config.dispatch.event_buffer.max(1));

        info!(
            log_level = %config.logging.level,
            event_buffer = config.dispatch.event_buffer,
            spawn_per_event = config.dispatch.spawn_per_event,
            "Runtime initialized from configuration"
        );

        Self {
            config,
            api,
            registrar: None,
            root: DispatchRoot::new(),
            routers: Vec::new(),
            sender,
            receiver,
            started: false,
        }
    }

    pub fn config(&self) -> &SwitchboardConfig {
        &self.config
    }

    pub fn api(&self) -> &BoxedInteractionApi {
        &self.api
    }

    pub fn set_registrar(&mut self, registrar: BoxedCommandRegistrar) {
        self.registrar = Some(registrar);
    }

    pub fn set_reporter<R: FailureReporter + 'static>(&mut self, reporter: R) {
        self.root.set_reporter(reporter);
    }

    /// A new router bound to this runtime's API.
    pub fn router(&self, name: impl Into<String>) -> InteractionRouter {
        InteractionRouter::named(name, Arc::clone(&self.api))
    }

    /// Adds a router. Its commands are registered on [`start`](Self::start).
    ///
    /// # Errors
    ///
    /// Returns [`RuntimeError::DuplicateCommand`] if another router already
    /// holds a command with the same name, group and parent group. The
    /// router is not added in that case.
    pub fn add_router(&mut self, router: InteractionRouter) -> RuntimeResult<()> {
        let clash = router.registry().iter().find(|definition| {
            self.routers.iter().any(|existing| existing.registry().contains(definition))
        });
        if let Some(definition) = clash {
            return Err(DuplicateCommandError { path: definition.path() }.into());
        }

        let router = Arc::new(router);
        debug!(router = router.name(), commands = router.registry().len(), "Added router");
        self.routers.push(Arc::clone(&router));
        self.root.add_shared(router);
        Ok(())
    }

    pub fn add_muxer(&mut self, muxer: EventMuxer) {
        debug!(muxer = Dispatch::name(&muxer), "Added event muxer");
        self.root.add(muxer);
    }

    pub fn router_count(&self) -> usize {
        self.routers.len()
    }

    /// The channel a transport pushes inbound events into.
    pub fn event_sender(&self) -> mpsc::Sender<InboundEvent> {
        self.sender.clone()
    }

    /// Every router's commands and groups as one bulk-registration payload.
    ///
    /// Groups are merged by name across routers. The first description seen
    /// wins and sub-groups are merged by name.
    pub fn compile(&self) -> (Vec<FlatCommand>, Vec<FlatGroup>) {
        let mut commands = Vec::new();
        let mut groups: Vec<FlatGroup> = Vec::new();

        for router in &self.routers {
            let (router_commands, router_groups) = router.compile();
            commands.extend(router_commands);
            for group in router_groups {
                merge_group(&mut groups, group);
            }
        }

        (commands, groups)
    }

    /// Registers commands with the platform. Runs once; later calls are no-ops.
    ///
    /// # Errors
    ///
    /// Returns [`RuntimeError::Registration`] if the registrar rejects the
    /// payload.
    pub async fn start(&mut self) -> RuntimeResult<()> {
        if self.started {
            warn!("Runtime is already started");
            return Ok(());
        }

        if !self.config.commands.register_on_start {
            debug!("Command registration on start is disabled");
        } else if let Some(registrar) = &self.registrar {
            let (commands, groups) = self.compile();
            registrar.register_commands(&commands, &groups).await?;
            info!(
                commands = commands.len(),
                groups = groups.len(),
                "Registered commands with the platform"
            );
        } else {
            warn!("No command registrar configured, skipping command registration");
        }

        self.started = true;
        info!(targets = self.root.target_count(), "Runtime started");
        Ok(())
    }

    /// Runs until every event sender is dropped or a shutdown signal
    /// (Ctrl+C, or SIGTERM on Unix) arrives.
    pub async fn run(self) -> RuntimeResult<RuntimeStats> {
        self.run_until(wait_for_shutdown()).await
    }

    /// Runs until every event sender is dropped or `shutdown` completes.
    ///
    /// Dispatches still in flight when the loop stops are awaited before
    /// returning.
    pub async fn run_until<F>(mut self, shutdown: F) -> RuntimeResult<RuntimeStats>
    where
        F: Future<Output = ()>,
    {
        self.start().await?;

        let Self {
            config,
            root,
            sender,
            mut receiver,
            ..
        } = self;
        drop(sender);

        let root = Arc::new(root);
        let spawn_per_event = config.dispatch.spawn_per_event;
        let mut in_flight = FuturesUnordered::new();
        let mut stats = RuntimeStats::default();
        tokio::pin!(shutdown);

        info!("Switchboard runtime is now running");

        loop {
            tokio::select! {
                event = receiver.recv() => match event {
                    Some(event) => {
                        stats.events_received += 1;
                        if spawn_per_event {
                            in_flight.push(root.spawn_dispatch(event));
                        } else {
                            let outcome = root.dispatch(&event.tag, &event.payload).await;
                            stats.record(&outcome);
                        }
                    }
                    None => {
                        debug!("Event channel closed");
                        break;
                    }
                },
                Some(joined) = in_flight.next(), if !in_flight.is_empty() => {
                    stats.record_joined(joined);
                }
                () = &mut shutdown => {
                    info!("Shutdown requested");
                    break;
                }
            }
        }

        receiver.close();
        while let Some(joined) = in_flight.next().await {
            stats.record_joined(joined);
        }

        info!(
            received = stats.events_received,
            dispatched = stats.events_dispatched,
            failures = stats.subscriber_failures,
            "Runtime stopped"
        );
        Ok(stats)
    }
}

/// Waits for Ctrl+C, or SIGTERM on Unix.
async fn wait_for_shutdown() {
    #[cfg(unix)]
    {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = signal::ctrl_c() => info!("Received Ctrl+C, shutting down"),
                    _ = sigterm.recv() => info!("Received SIGTERM, shutting down"),
                }
                return;
            }
            Err(e) => warn!(error = %e, "Failed to register SIGTERM handler"),
        }
    }

    match signal::ctrl_c().await {
        Ok(()) => info!("Received Ctrl+C, shutting down"),
        Err(e) => {
            warn!(error = %e, "Failed to listen for Ctrl+C, running until the event channel closes");
            std::future::pending::<()>().await;
        }
    }
}

// =============================================================================
// RuntimeBuilder
// =============================================================================

/// Builder for a [`SwitchboardRuntime`].
///
/// Configuration is loaded with a [`ConfigLoader`] searching the current
/// directory unless [`config`](Self::config) supplies it directly.
pub struct RuntimeBuilder {
    config_loader: ConfigLoader,
    config: Option<SwitchboardConfig>,
    api: Option<BoxedInteractionApi>,
    registrar: Option<BoxedCommandRegistrar>,
}

impl Default for RuntimeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RuntimeBuilder {
    pub fn new() -> Self {
        Self {
            config_loader: ConfigLoader::new(),
            config: None,
            api: None,
            registrar: None,
        }
    }

    pub fn config_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config_loader = self.config_loader.file(path);
        self
    }

    pub fn profile(mut self, profile: impl AsRef<str>) -> Self {
        self.config_loader = self.config_loader.profile(profile);
        self
    }

    pub fn search_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config_loader = self.config_loader.search_path(path);
        self
    }

    pub fn without_env(mut self) -> Self {
        self.config_loader = self.config_loader.without_env();
        self
    }

    /// Uses this configuration instead of loading one.
    pub fn config(mut self, config: SwitchboardConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn api(mut self, api: BoxedInteractionApi) -> Self {
        self.api = Some(api);
        self
    }

    pub fn registrar(mut self, registrar: BoxedCommandRegistrar) -> Self {
        self.registrar = Some(registrar);
        self
    }

    /// # Errors
    ///
    /// Fails if no API was supplied or the configuration cannot be loaded.
    pub fn build(self) -> RuntimeResult<SwitchboardRuntime> {
        let api = self.api.ok_or(RuntimeError::MissingApi)?;
        let config = match self.config {
            Some(config) => config,
            None => self.config_loader.load()?,
        };

        let mut runtime = SwitchboardRuntime::from_config(config, api);
        runtime.registrar = self.registrar;
        Ok(runtime)
    }
}

// =============================================================================
// Tests
// =============================================================================
