//! Interaction routing.
//!
//! The [`InteractionRouter`] is a dispatch target that turns the three
//! interaction tags into handler calls:
//!
//! | Tag                        | Payload               | Routed by                    |
//! |----------------------------|-----------------------|------------------------------|
//! | `INTERACTION_COMMAND`      | [`CommandEnvelope`]   | command registry             |
//! | `INTERACTION_COMPONENT`    | [`ComponentEnvelope`] | custom id name, per kind     |
//! | `INTERACTION_MODAL_SUBMIT` | [`ModalSubmitEnvelope`] | custom id name             |
//!
//! Every other tag is ignored.
//!
//! # Example
//!
//! ```rust,ignore
//! let mut router = InteractionRouter::new(api);
//! router.command(Command::chat("ping", "Pong!").build(ping)?)?;
//! router.on_button("confirm", |mut ctx: ComponentInteraction, data: Value| async move {
//!     ctx.ack_with_update_message(format!("Confirmed {data}").into()).await?;
//!     Ok::<_, BoxError>(())
//! })?;
//!
//! let root = DispatchRoot::new().with(router);
//! ```

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use switchboard_core::custom_id::decode;
use switchboard_core::{
    BoxedInteractionApi, CommandArgs, CommandEnvelope, ComponentEnvelope, FlatCommand, FlatGroup,
    ModalSubmitEnvelope, TAG_COMMAND, TAG_COMPONENT, TAG_MODAL_SUBMIT, resolve_args,
    resolve_target,
};
use tracing::debug;

use crate::command::{CommandDefinition, CommandRegistry};
use crate::dispatch::{Dispatch, DispatchOutcome, SubscriberFailure};
use crate::error::RouterError;
use crate::handler::{
    BoxFuture, BoxedComponentHandler, BoxedModalHandler, Fault, Handler, HandlerResult,
    run_guarded,
};
use crate::interaction::{CommandInteraction, ComponentInteraction, ModalSubmitInteraction};

/// Routes interaction events to command, component and modal handlers.
pub struct InteractionRouter {
    name: String,
    api: BoxedInteractionApi,
    commands: CommandRegistry,
    buttons: HashMap<String, BoxedComponentHandler>,
    select_menus: HashMap<String, BoxedComponentHandler>,
    modals: HashMap<String, BoxedModalHandler>,
}

impl InteractionRouter {
    pub fn new(api: BoxedInteractionApi) -> Self {
        Self::named("router", api)
    }

    /// Creates a router with a name used in logs and failure reports.
    pub fn named(name: impl Into<String>, api: BoxedInteractionApi) -> Self {
        Self {
            name: name.into(),
            api,
            commands: CommandRegistry::new(),
            buttons: HashMap::new(),
            select_menus: HashMap::new(),
            modals: HashMap::new(),
        }
    }

    // ========================================================================
    // Registration
    // ========================================================================

    /// Registers a command.
    pub fn command(&mut self, definition: CommandDefinition) -> Result<(), RouterError> {
        self.commands.register(definition)?;
        Ok(())
    }

    /// Registers the handler for buttons whose custom id names `name`.
    pub fn on_button<H>(&mut self, name: impl Into<String>, handler: H) -> Result<(), RouterError>
    where
        H: Handler<ComponentInteraction, Value>,
    {
        let handler: BoxedComponentHandler = Arc::new(handler);
        insert_route(&mut self.buttons, "button", name.into(), handler)
    }

    /// Registers the handler for select menus whose custom id names `name`.
    pub fn on_select_menu<H>(
        &mut self,
        name: impl Into<String>,
        handler: H,
    ) -> Result<(), RouterError>
    where
        H: Handler<ComponentInteraction, Value>,
    {
        let handler: BoxedComponentHandler = Arc::new(handler);
        insert_route(&mut self.select_menus, "select menu", name.into(), handler)
    }

    /// Registers the handler for modals whose custom id names `name`.
    pub fn on_modal_submit<H>(
        &mut self,
        name: impl Into<String>,
        handler: H,
    ) -> Result<(), RouterError>
    where
        H: Handler<ModalSubmitInteraction, Value>,
    {
        let handler: BoxedModalHandler = Arc::new(handler);
        insert_route(&mut self.modals, "modal", name.into(), handler)
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.commands
    }

    /// The bulk-registration payload for this router's commands.
    pub fn compile(&self) -> (Vec<FlatCommand>, Vec<FlatGroup>) {
        self.commands.compile()
    }

    // ========================================================================
    // Routing
    // ========================================================================

    async fn route_command(&self, payload: &Value) -> DispatchOutcome {
        let envelope: CommandEnvelope = match parse(payload) {
            Ok(envelope) => envelope,
            Err(error) => return self.failed(TAG_COMMAND, "command", error),
        };

        let Some(definition) = self.commands.find(&envelope) else {
            debug!(command = %envelope.qualified_name(), "No command matched");
            return DispatchOutcome::default();
        };
        let subscriber = format!("command:{}", definition.path());

        let args: CommandArgs = match resolve_args(definition.options(), &envelope) {
            Ok(args) => args,
            Err(e) => return self.failed(TAG_COMMAND, &subscriber, e.to_string()),
        };
        let target = match resolve_target(&envelope) {
            Ok(target) => target,
            Err(e) => return self.failed(TAG_COMMAND, &subscriber, e.to_string()),
        };

        debug!(command = %subscriber, interaction_id = %envelope.id, "Routing command");
        let interaction = CommandInteraction::new(Arc::new(envelope), target, self.api.clone());
        let handler = definition.handler();
        self.invoke(TAG_COMMAND, subscriber, || handler.call(interaction, args))
            .await
    }

    async fn route_component(&self, payload: &Value) -> DispatchOutcome {
        let envelope: ComponentEnvelope = match parse(payload) {
            Ok(envelope) => envelope,
            Err(error) => return self.failed(TAG_COMPONENT, "component", error),
        };

        let token = match decode(&envelope.custom_id) {
            Ok(token) => token,
            Err(e) => {
                debug!(custom_id = %envelope.custom_id, "Ignoring foreign component: {e}");
                return DispatchOutcome::default();
            }
        };

        let (kind, routes) = if envelope.component_kind.is_select_menu() {
            ("select_menu", &self.select_menus)
        } else {
            ("button", &self.buttons)
        };
        let Some(handler) = routes.get(&token.name) else {
            debug!(kind, name = %token.name, "No component handler registered");
            return DispatchOutcome::default();
        };

        let subscriber = format!("{kind}:{}", token.name);
        let data = token.data.clone();
        let interaction = ComponentInteraction::new(Arc::new(envelope), token, self.api.clone());
        self.invoke(TAG_COMPONENT, subscriber, || handler.call(interaction, data))
            .await
    }

    async fn route_modal_submit(&self, payload: &Value) -> DispatchOutcome {
        let envelope: ModalSubmitEnvelope = match parse(payload) {
            Ok(envelope) => envelope,
            Err(error) => return self.failed(TAG_MODAL_SUBMIT, "modal", error),
        };

        let token = match decode(&envelope.custom_id) {
            Ok(token) => token,
            Err(e) => {
                debug!(custom_id = %envelope.custom_id, "Ignoring foreign modal: {e}");
                return DispatchOutcome::default();
            }
        };
        let Some(handler) = self.modals.get(&token.name) else {
            debug!(name = %token.name, "No modal handler registered");
            return DispatchOutcome::default();
        };

        let subscriber = format!("modal:{}", token.name);
        let data = token.data.clone();
        let interaction =
            ModalSubmitInteraction::new(Arc::new(envelope), token, self.api.clone());
        self.invoke(TAG_MODAL_SUBMIT, subscriber, || handler.call(interaction, data))
            .await
    }

    async fn invoke<F>(&self, tag: &str, subscriber: String, call: F) -> DispatchOutcome
    where
        F: FnOnce() -> BoxFuture<'static, HandlerResult>,
    {
        let mut outcome = DispatchOutcome {
            delivered: 1,
            failures: Vec::new(),
        };
        if let Err(fault) = run_guarded(call).await {
            let (error, panicked) = match fault {
                Fault::Error(e) => (e, false),
                Fault::Panic(p) => (p, true),
            };
            outcome.failures.push(SubscriberFailure {
                target: self.name.clone(),
                tag: tag.to_string(),
                subscriber,
                error,
                panicked,
            });
        }
        outcome
    }

    /// An outcome for an event that failed before any handler was invoked.
    fn failed(&self, tag: &str, subscriber: &str, error: String) -> DispatchOutcome {
        DispatchOutcome {
            delivered: 0,
            failures: vec![SubscriberFailure {
                target: self.name.clone(),
                tag: tag.to_string(),
                subscriber: subscriber.to_string(),
                error,
                panicked: false,
            }],
        }
    }
}

fn insert_route<H: ?Sized>(
    routes: &mut HashMap<String, Arc<H>>,
    kind: &'static str,
    name: String,
    handler: Arc<H>,
) -> Result<(), RouterError> {
    if name.contains(':') {
        return Err(RouterError::InvalidHandlerName(name));
    }
    if routes.contains_key(&name) {
        return Err(RouterError::DuplicateComponentHandler { kind, name });
    }
    routes.insert(name, handler);
    Ok(())
}

fn parse<T: DeserializeOwned>(payload: &Value) -> Result<T, String> {
    T::deserialize(payload).map_err(|e| format!("malformed payload: {e}"))
}

#[async_trait]
impl Dispatch for InteractionRouter {
    fn name(&self) -> &str {
        &self.name
    }

    async fn dispatch(&self, tag: &str, payload: &Value) -> DispatchOutcome {
        match tag {
            TAG_COMMAND => self.route_command(payload).await,
            TAG_COMPONENT => self.route_component(payload).await,
            TAG_MODAL_SUBMIT => self.route_modal_submit(payload).await,
            _ => DispatchOutcome::default(),
        }
    }
}

impl fmt::Debug for InteractionRouter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InteractionRouter")
            .field("name", &self.name)
            .field("commands", &self.commands.len())
            .field("buttons", &self.buttons.len())
            .field("select_menus", &self.select_menus.len())
            .field("modals", &self.modals.len())
            .finish()
    }
}
