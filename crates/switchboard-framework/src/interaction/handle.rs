//! The live interaction handle shared by every interaction kind.

use std::fmt;

use switchboard_core::{
    BoxedInteractionApi, InteractionCallback, InteractionResult, Message, MessageFields,
    ModalFields, ProtocolViolation,
};
use tracing::debug;

use super::state::AckState;

/// Which kind of inbound event created an interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionOrigin {
    Command,
    Component,
    ModalSubmit,
}

/// A live interaction: its credentials, acknowledgement state and the API
/// used to answer it.
///
/// Owned by the single handler invocation processing it. Every illegal
/// transition fails with a [`ProtocolViolation`] before the API is touched.
pub struct Interaction {
    id: String,
    token: String,
    origin: InteractionOrigin,
    state: AckState,
    api: BoxedInteractionApi,
}

impl Interaction {
    pub fn new(
        id: impl Into<String>,
        token: impl Into<String>,
        origin: InteractionOrigin,
        api: BoxedInteractionApi,
    ) -> Self {
        Self {
            id: id.into(),
            token: token.into(),
            origin,
            state: AckState::default(),
            api,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn origin(&self) -> InteractionOrigin {
        self.origin
    }

    pub fn state(&self) -> AckState {
        self.state
    }

    // ========================================================================
    // Initial callback
    // ========================================================================

    /// Replies immediately with a message.
    pub async fn ack_with_message(&mut self, fields: MessageFields) -> InteractionResult<()> {
        self.send_initial("ack_with_message", InteractionCallback::Message(fields))
            .await
    }

    /// Acknowledges now; the reply is delivered later through
    /// [`edit_original_response`](Self::edit_original_response).
    pub async fn ack_with_deferred_message(
        &mut self,
        fields: Option<MessageFields>,
    ) -> InteractionResult<()> {
        self.send_initial(
            "ack_with_deferred_message",
            InteractionCallback::DeferredMessage(fields),
        )
        .await
    }

    /// Opens a modal. Not available when answering a modal submission.
    pub async fn ack_with_modal(&mut self, modal: ModalFields) -> InteractionResult<()> {
        if self.origin == InteractionOrigin::ModalSubmit {
            return Err(ProtocolViolation {
                operation: "ack_with_modal",
                reason: "modal submissions cannot be answered with a modal",
            }
            .into());
        }
        self.send_initial("ack_with_modal", InteractionCallback::Modal(modal))
            .await
    }

    pub(crate) async fn ack_with_update_message(
        &mut self,
        fields: MessageFields,
    ) -> InteractionResult<()> {
        self.send_initial(
            "ack_with_update_message",
            InteractionCallback::UpdateMessage(fields),
        )
        .await
    }

    pub(crate) async fn ack_with_deferred_update_message(&mut self) -> InteractionResult<()> {
        self.send_initial(
            "ack_with_deferred_update_message",
            InteractionCallback::DeferredUpdateMessage,
        )
        .await
    }

    async fn send_initial(
        &mut self,
        operation: &'static str,
        callback: InteractionCallback,
    ) -> InteractionResult<()> {
        // The flag is consumed before the send: the platform may have seen a
        // callback even when the request reports failure.
        self.state.begin_callback(operation, callback.is_deferred())?;
        debug!(
            interaction_id = %self.id,
            callback = callback.kind_name(),
            "Sending initial callback"
        );
        self.api.send_callback(&self.id, &self.token, &callback).await?;
        Ok(())
    }

    // ========================================================================
    // Original response
    // ========================================================================

    /// Fetches the original response.
    pub async fn get_original_response(&self) -> InteractionResult<Message> {
        self.state.require_callback("get_original_response")?;
        Ok(self.api.get_original_response(&self.token).await?)
    }

    /// Edits the original response; this is how a deferred reply is delivered.
    pub async fn edit_original_response(
        &mut self,
        fields: MessageFields,
    ) -> InteractionResult<Message> {
        self.state.require_callback("edit_original_response")?;
        self.state.mark_result_sent();
        Ok(self.api.edit_original_response(&self.token, &fields).await?)
    }

    /// Deletes the original response.
    pub async fn delete_original_response(&mut self) -> InteractionResult<()> {
        self.state.require_callback("delete_original_response")?;
        self.state.mark_result_sent();
        Ok(self.api.delete_original_response(&self.token).await?)
    }

    // ========================================================================
    // Follow-ups
    // ========================================================================

    /// Sends an additional message.
    pub async fn create_followup(&self, fields: MessageFields) -> InteractionResult<Message> {
        self.state.require_callback("create_followup")?;
        Ok(self.api.create_followup(&self.token, &fields).await?)
    }

    pub async fn get_followup(&self, message_id: &str) -> InteractionResult<Message> {
        self.state.require_callback("get_followup")?;
        Ok(self.api.get_followup(&self.token, message_id).await?)
    }

    pub async fn edit_followup(
        &self,
        message_id: &str,
        fields: MessageFields,
    ) -> InteractionResult<Message> {
        self.state.require_callback("edit_followup")?;
        Ok(self.api.edit_followup(&self.token, message_id, &fields).await?)
    }

    pub async fn delete_followup(&self, message_id: &str) -> InteractionResult<()> {
        self.state.require_callback("delete_followup")?;
        Ok(self.api.delete_followup(&self.token, message_id).await?)
    }
}

impl fmt::Debug for Interaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Interaction")
            .field("id", &self.id)
            .field("origin", &self.origin)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::{ApiCall, MockApi};
    use switchboard_core::{InteractionError, TextInput};

    fn interaction(origin: InteractionOrigin) -> (Interaction, std::sync::Arc<MockApi>) {
        let api = MockApi::new();
        (Interaction::new("i1", "tok", origin, api.clone()), api)
    }

    #[tokio::test]
    async fn test_second_initial_callback_rejected() {
        let (mut ix, api) = interaction(InteractionOrigin::Command);

        ix.ack_with_message("hi".into()).await.unwrap();
        let err = ix.ack_with_deferred_message(None).await.unwrap_err();

        assert!(matches!(
            err,
            InteractionError::Protocol(ProtocolViolation {
                operation: "ack_with_deferred_message",
                ..
            })
        ));
        assert_eq!(api.callbacks().len(), 1);
    }

    const INITIAL_ACKS: [&str; 5] = [
        "ack_with_message",
        "ack_with_deferred_message",
        "ack_with_update_message",
        "ack_with_deferred_update_message",
        "ack_with_modal",
    ];

    async fn initial_ack(ix: &mut Interaction, operation: &str) -> InteractionResult<()> {
        match operation {
            "ack_with_message" => ix.ack_with_message("hi".into()).await,
            "ack_with_deferred_message" => ix.ack_with_deferred_message(None).await,
            "ack_with_update_message" => ix.ack_with_update_message("new".into()).await,
            "ack_with_deferred_update_message" => ix.ack_with_deferred_update_message().await,
            "ack_with_modal" => ix.ack_with_modal(ModalFields::new("Form", "0:form")).await,
            other => unreachable!("unknown ack {other}"),
        }
    }

    #[tokio::test]
    async fn test_every_initial_ack_pair_is_exclusive() {
        for first in INITIAL_ACKS {
            for second in INITIAL_ACKS {
                let (mut ix, api) = interaction(InteractionOrigin::Component);

                initial_ack(&mut ix, first).await.unwrap();
                let err = initial_ack(&mut ix, second).await.unwrap_err();

                match err {
                    InteractionError::Protocol(violation) => {
                        assert_eq!(violation.operation, second, "{first} then {second}");
                    }
                    other => panic!("{first} then {second}: unexpected {other:?}"),
                }
                assert_eq!(api.callbacks().len(), 1, "{first} then {second}");
            }
        }
    }

    #[tokio::test]
    async fn test_deferred_then_edit() {
        let (mut ix, api) = interaction(InteractionOrigin::Command);

        ix.ack_with_deferred_message(None).await.unwrap();
        assert!(ix.state().is_response_deferred());
        assert!(!ix.state().is_deferred_response_sent());

        let msg = ix.edit_original_response("done".into()).await.unwrap();
        assert_eq!(msg.content, "done");
        assert!(ix.state().is_deferred_response_sent());

        assert_eq!(
            api.calls()[1],
            ApiCall::EditOriginal(MessageFields::content("done"))
        );
    }

    #[tokio::test]
    async fn test_followups_require_callback() {
        let (mut ix, api) = interaction(InteractionOrigin::Command);

        let err = ix.create_followup("early".into()).await.unwrap_err();
        assert!(matches!(
            err,
            InteractionError::Protocol(ProtocolViolation {
                operation: "create_followup",
                ..
            })
        ));
        assert!(ix.edit_original_response("x".into()).await.is_err());
        assert!(ix.get_followup("f1").await.is_err());
        assert!(api.calls().is_empty());

        ix.ack_with_message("hi".into()).await.unwrap();
        let followup = ix.create_followup("more".into()).await.unwrap();
        ix.edit_followup(&followup.id, "edited".into()).await.unwrap();
        ix.get_followup(&followup.id).await.unwrap();
        ix.delete_followup(&followup.id).await.unwrap();
        ix.get_original_response().await.unwrap();
        ix.delete_original_response().await.unwrap();

        assert_eq!(api.calls().len(), 7);
        assert_eq!(api.calls()[5], ApiCall::GetOriginal);
    }

    #[tokio::test]
    async fn test_failed_send_consumes_callback() {
        let api = MockApi::failing();
        let mut ix = Interaction::new("i1", "tok", InteractionOrigin::Command, api.clone());

        let err = ix.ack_with_message("hi".into()).await.unwrap_err();
        assert!(matches!(err, InteractionError::Api(_)));
        assert!(ix.state().has_sent_callback());

        let err = ix.ack_with_message("retry".into()).await.unwrap_err();
        assert!(matches!(err, InteractionError::Protocol(_)));
        assert_eq!(api.callbacks().len(), 1);
    }

    #[tokio::test]
    async fn test_modal_rules() {
        let modal = ModalFields::new("Report", "0:report").input(TextInput::new("why", "Why?"));

        let (mut ix, api) = interaction(InteractionOrigin::Command);
        ix.ack_with_modal(modal.clone()).await.unwrap();
        assert_eq!(api.callbacks(), vec![InteractionCallback::Modal(modal.clone())]);

        let (mut ix, api) = interaction(InteractionOrigin::ModalSubmit);
        let err = ix.ack_with_modal(modal).await.unwrap_err();
        assert!(matches!(err, InteractionError::Protocol(_)));
        assert!(!ix.state().has_sent_callback());
        assert!(api.calls().is_empty());
    }
}
