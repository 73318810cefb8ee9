use std::ops::{Deref, DerefMut};
use std::sync::Arc;

use switchboard_core::{
    BoxedInteractionApi, ComponentEnvelope, ComponentKind, CustomToken, InteractionResult,
    InvokingMember, MessageFields, OptionKind, RawOption, ResolutionError, TypedOptionValue,
    resolve,
};

use super::handle::{Interaction, InteractionOrigin};

/// A button press or select menu choice.
///
/// Dereferences to [`Interaction`]; additionally allows updating the message
/// the component is attached to.
#[derive(Debug)]
pub struct ComponentInteraction {
    interaction: Interaction,
    envelope: Arc<ComponentEnvelope>,
    token: CustomToken,
}

impl ComponentInteraction {
    pub fn new(envelope: Arc<ComponentEnvelope>, token: CustomToken, api: BoxedInteractionApi) -> Self {
        Self {
            interaction: Interaction::new(
                envelope.id.clone(),
                envelope.token.clone(),
                InteractionOrigin::Component,
                api,
            ),
            envelope,
            token,
        }
    }

    /// Replaces the message the component is attached to.
    pub async fn ack_with_update_message(&mut self, fields: MessageFields) -> InteractionResult<()> {
        self.interaction.ack_with_update_message(fields).await
    }

    /// Acknowledges now; the message is updated later through
    /// [`Interaction::edit_original_response`].
    pub async fn ack_with_deferred_update_message(&mut self) -> InteractionResult<()> {
        self.interaction.ack_with_deferred_update_message().await
    }

    pub fn envelope(&self) -> &ComponentEnvelope {
        &self.envelope
    }

    /// The decoded custom id the component was built with.
    pub fn custom_token(&self) -> &CustomToken {
        &self.token
    }

    pub fn component_kind(&self) -> ComponentKind {
        self.envelope.component_kind
    }

    pub fn message_id(&self) -> &str {
        &self.envelope.message_id
    }

    pub fn channel_id(&self) -> &str {
        &self.envelope.channel_id
    }

    pub fn member(&self) -> Option<&InvokingMember> {
        self.envelope.member.as_ref()
    }

    /// Raw selected values; empty for buttons.
    pub fn values(&self) -> &[String] {
        &self.envelope.values
    }

    /// Resolves the selected values against the envelope's side tables.
    ///
    /// String selects yield strings, entity selects yield the referenced
    /// users, roles or channels. Buttons yield nothing.
    pub fn resolved_values(&self) -> Result<Vec<TypedOptionValue>, ResolutionError> {
        let kind = match self.envelope.component_kind {
            ComponentKind::Button => return Ok(Vec::new()),
            ComponentKind::StringSelect => OptionKind::String,
            ComponentKind::UserSelect => OptionKind::User,
            ComponentKind::RoleSelect => OptionKind::Role,
            ComponentKind::MentionableSelect => OptionKind::Mentionable,
            ComponentKind::ChannelSelect => OptionKind::Channel,
        };

        self.envelope
            .values
            .iter()
            .map(|value| {
                let raw = RawOption::new(self.token.name.as_str(), kind, value.as_str());
                resolve(&self.envelope.data_map, &raw)
            })
            .collect()
    }
}

impl Deref for ComponentInteraction {
    type Target = Interaction;

    fn deref(&self) -> &Self::Target {
        &self.interaction
    }
}

impl DerefMut for ComponentInteraction {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.interaction
    }
}
