//! # Switchboard
//!
//! An interaction router for Discord-like chat platforms.
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────┐  InboundEvent  ┌──────────────┐     ┌─────────────────────────────────┐
//! │ Transport │───────────────▶│ DispatchRoot │────▶│ InteractionRouter (commands,    │──▶ handlers
//! │ (gateway) │   mpsc chan    │              │     │   buttons, selects, modals)     │
//! └───────────┘                └──────────────┘────▶│ EventMuxer (raw event tags)     │──▶ subscribers
//!       ▲                                           └─────────────────────────────────┘
//!       └──────────── InteractionApi / CommandRegistrar ◀──── Interaction acks, follow-ups
//! ```
//!
//! - **Runtime**: loads configuration, installs logging, registers commands
//!   and drains the transport's event channel
//! - **Router**: matches commands against the registry (top-level, group and
//!   sub-group), resolves options and decodes component custom ids
//! - **Interaction**: the one-shot acknowledgement state machine handed to
//!   each handler
//! - **Muxer**: tag-keyed subscribers for every other gateway event
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use switchboard::prelude::*;
//!
//! async fn ping(mut ctx: CommandInteraction, _args: CommandArgs) -> Result<(), BoxError> {
//!     ctx.ack_with_message(MessageFields::content("pong")).await?;
//!     Ok(())
//! }
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let mut runtime = SwitchboardRuntime::builder()
//!         .api(api)
//!         .registrar(registrar)
//!         .build()?;
//!
//!     let mut router = runtime.router("main");
//!     router.command(Command::chat("ping", "Replies with pong").build(ping)?)?;
//!     runtime.add_router(router)?;
//!
//!     tokio::spawn(gateway.pump(runtime.event_sender()));
//!     runtime.run().await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - `toml-config`: TOML configuration files (default)
//! - `yaml-config`: YAML configuration files
//! - `json-log`: JSON log output

pub use switchboard_core as core;
pub use switchboard_framework as framework;
pub use switchboard_runtime as runtime;

/// Prelude module for convenient imports.
///
/// ```rust,ignore
/// use switchboard::prelude::*;
/// ```
pub mod prelude {
    // Runtime - main entry point
    pub use switchboard_runtime::{SwitchboardConfig, SwitchboardRuntime};

    // Command definition
    pub use switchboard_framework::{Command, CommandDefinition, Group, InteractionRouter};

    // Handler inputs
    pub use switchboard_core::{CommandArgs, CommandTarget, CustomToken, TypedOptionValue};
    pub use switchboard_framework::{
        BoxError, CommandInteraction, ComponentInteraction, ModalSubmitInteraction,
    };

    // Replies
    pub use switchboard_core::{InteractionCallback, MessageFields, ModalFields, OptionSpec};

    // Raw events
    pub use switchboard_framework::{EventMuxer, InboundEvent};

    // Platform collaborators
    pub use switchboard_core::{CommandRegistrar, InteractionApi};
}
