//! Interaction lifecycle.
//!
//! Every platform interaction must be answered exactly once with an initial
//! callback. After that, the original response can be edited or deleted and
//! follow-up messages can be sent. [`Interaction`] enforces those rules and
//! fails with a [`ProtocolViolation`](switchboard_core::ProtocolViolation)
//! before anything reaches the platform.
//!
//! The three wrappers add what is specific to each interaction kind:
//!
//! - [`CommandInteraction`]: the command envelope and context menu target
//! - [`ComponentInteraction`]: update-message callbacks and selected values
//! - [`ModalSubmitInteraction`]: update-message callbacks and submitted text
//!
//! # Example
//!
//! ```rust,ignore
//! async fn slow(mut ctx: CommandInteraction, _args: CommandArgs) -> Result<(), BoxError> {
//!     ctx.ack_with_deferred_message(None).await?;
//!     let report = build_report().await;
//!     ctx.edit_original_response(MessageFields::content(report)).await?;
//!     ctx.create_followup("Anything else?".into()).await?;
//!     Ok(())
//! }
//! ```

mod command;
mod component;
mod handle;
mod modal;
mod state;

pub use command::CommandInteraction;
pub use component::ComponentInteraction;
pub use handle::{Interaction, InteractionOrigin};
pub use modal::ModalSubmitInteraction;
pub use state::AckState;
