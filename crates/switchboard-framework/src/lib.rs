//! # Switchboard Framework
//!
//! Command matching, the interaction lifecycle and event dispatch.
//!
//! - [`command`]: command definitions, groups and the registry/matcher
//! - [`interaction`]: the one-shot acknowledgement state machine
//! - [`muxer`]: tag-keyed raw event subscribers
//! - [`router`]: routes interaction events to command and component handlers
//! - [`dispatch`]: the [`DispatchRoot`] a transport feeds events into
//!
//! # Example
//!
//! ```rust,ignore
//! use switchboard_framework::*;
//!
//! let mut router = InteractionRouter::new(api);
//! router.command(Command::chat("ping", "Pong!").build(ping)?)?;
//!
//! let root = Arc::new(
//!     DispatchRoot::new()
//!         .with(router)
//!         .with(EventMuxer::new().on("READY", on_ready)),
//! );
//! root.spawn_dispatch(InboundEvent::new("READY", payload));
//! ```

pub mod command;
pub mod dispatch;
pub mod error;
pub mod handler;
pub mod interaction;
pub mod muxer;
pub mod router;

#[cfg(test)]
mod test_util;

pub use command::{merge_group, Command, CommandDefinition, CommandRegistry, Group};
pub use dispatch::{
    Dispatch, DispatchOutcome, DispatchRoot, FailureReporter, InboundEvent, LogReporter,
    SubscriberFailure,
};
pub use error::{CommandBuildError, DuplicateCommandError, GroupError, RouterError};
pub use handler::{
    BoxFuture, BoxedCommandHandler, BoxedComponentHandler, BoxedEventHandler, BoxedModalHandler,
    EventHandler, Handler, HandlerResult, HandlerReturn,
};
pub use interaction::{
    AckState, CommandInteraction, ComponentInteraction, Interaction, InteractionOrigin,
    ModalSubmitInteraction,
};
pub use muxer::EventMuxer;
pub use router::InteractionRouter;
pub use tower::BoxError;
