use std::ops::{Deref, DerefMut};
use std::sync::Arc;

use switchboard_core::{
    BoxedInteractionApi, CustomToken, InteractionResult, InvokingMember, MessageFields,
    ModalSubmitEnvelope, ModalValue,
};

use super::handle::{Interaction, InteractionOrigin};

/// A submitted modal.
///
/// Dereferences to [`Interaction`]. Opening another modal from here is a
/// protocol violation.
#[derive(Debug)]
pub struct ModalSubmitInteraction {
    interaction: Interaction,
    envelope: Arc<ModalSubmitEnvelope>,
    token: CustomToken,
}

impl ModalSubmitInteraction {
    pub fn new(
        envelope: Arc<ModalSubmitEnvelope>,
        token: CustomToken,
        api: BoxedInteractionApi,
    ) -> Self {
        Self {
            interaction: Interaction::new(
                envelope.id.clone(),
                envelope.token.clone(),
                InteractionOrigin::ModalSubmit,
                api,
            ),
            envelope,
            token,
        }
    }

    /// Replaces the message the modal was opened from.
    pub async fn ack_with_update_message(&mut self, fields: MessageFields) -> InteractionResult<()> {
        self.interaction.ack_with_update_message(fields).await
    }

    pub async fn ack_with_deferred_update_message(&mut self) -> InteractionResult<()> {
        self.interaction.ack_with_deferred_update_message().await
    }

    pub fn envelope(&self) -> &ModalSubmitEnvelope {
        &self.envelope
    }

    pub fn custom_token(&self) -> &CustomToken {
        &self.token
    }

    /// The submitted value of the text input `custom_id`.
    pub fn value(&self, custom_id: &str) -> Option<&str> {
        self.envelope.value(custom_id)
    }

    pub fn values(&self) -> &[ModalValue] {
        &self.envelope.values
    }

    pub fn message_id(&self) -> Option<&str> {
        self.envelope.message_id.as_deref()
    }

    pub fn member(&self) -> Option<&InvokingMember> {
        self.envelope.member.as_ref()
    }
}

impl Deref for ModalSubmitInteraction {
    type Target = Interaction;

    fn deref(&self) -> &Self::Target {
        &self.interaction
    }
}

impl DerefMut for ModalSubmitInteraction {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.interaction
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::MockApi;
    use switchboard_core::{InteractionCallback, InteractionError, ModalFields};

    #[tokio::test]
    async fn test_modal_submit_flow() {
        let api = MockApi::new();
        let envelope = Arc::new(ModalSubmitEnvelope {
            id: "i3".into(),
            token: "tok".into(),
            guild_id: None,
            channel_id: "c1".into(),
            member: None,
            message_id: Some("m1".into()),
            custom_id: "0:report".into(),
            values: vec![ModalValue {
                custom_id: "why".into(),
                value: "spam".into(),
            }],
        });
        let mut ix = ModalSubmitInteraction::new(envelope, CustomToken::new("report"), api.clone());

        assert_eq!(ix.value("why"), Some("spam"));
        assert_eq!(ix.value("missing"), None);

        let err = ix
            .ack_with_modal(ModalFields::new("Again", "0:again"))
            .await
            .unwrap_err();
        assert!(matches!(err, InteractionError::Protocol(_)));

        ix.ack_with_deferred_update_message().await.unwrap();
        assert!(ix.state().is_response_deferred());
        assert_eq!(api.callbacks(), vec![InteractionCallback::DeferredUpdateMessage]);
    }
}
