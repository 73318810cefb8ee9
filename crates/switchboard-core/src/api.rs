//! Platform collaborator traits.
//!
//! Switchboard does not talk to the network itself. The transport layer
//! implements these traits and Switchboard calls them; retries, rate limits and
//! authentication are entirely the implementor's concern.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::ApiResult;
use crate::foundation::message::{InteractionCallback, MessageFields};
use crate::foundation::model::Message;
use crate::foundation::registration::{FlatCommand, FlatGroup};

/// Sends interaction callbacks and follow-ups to the platform.
#[async_trait]
pub trait InteractionApi: Send + Sync {
    /// Sends the initial callback for an interaction.
    async fn send_callback(
        &self,
        interaction_id: &str,
        token: &str,
        callback: &InteractionCallback,
    ) -> ApiResult<()>;

    /// Fetches the original response message.
    async fn get_original_response(&self, token: &str) -> ApiResult<Message>;

    /// Edits the original response message.
    async fn edit_original_response(&self, token: &str, fields: &MessageFields)
    -> ApiResult<Message>;

    /// Deletes the original response message.
    async fn delete_original_response(&self, token: &str) -> ApiResult<()>;

    /// Creates a follow-up message.
    async fn create_followup(&self, token: &str, fields: &MessageFields) -> ApiResult<Message>;

    /// Fetches a follow-up message.
    async fn get_followup(&self, token: &str, message_id: &str) -> ApiResult<Message>;

    /// Edits a follow-up message.
    async fn edit_followup(
        &self,
        token: &str,
        message_id: &str,
        fields: &MessageFields,
    ) -> ApiResult<Message>;

    /// Deletes a follow-up message.
    async fn delete_followup(&self, token: &str, message_id: &str) -> ApiResult<()>;
}

/// A shared, type-erased [`InteractionApi`].
pub type BoxedInteractionApi = Arc<dyn InteractionApi>;

/// Bulk-registers compiled commands with the platform.
#[async_trait]
pub trait CommandRegistrar: Send + Sync {
    /// Replaces the registered command set with the given payload.
    async fn register_commands(&self, commands: &[FlatCommand], groups: &[FlatGroup])
    -> ApiResult<()>;
}

/// A shared, type-erased [`CommandRegistrar`].
pub type BoxedCommandRegistrar = Arc<dyn CommandRegistrar>;
