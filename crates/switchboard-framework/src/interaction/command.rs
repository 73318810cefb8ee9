use std::ops::{Deref, DerefMut};
use std::sync::Arc;

use switchboard_core::{BoxedInteractionApi, CommandEnvelope, CommandTarget, InvokingMember};

use super::handle::{Interaction, InteractionOrigin};

/// A slash or context menu command invocation.
///
/// Dereferences to [`Interaction`] for acknowledgement and follow-ups.
#[derive(Debug)]
pub struct CommandInteraction {
    interaction: Interaction,
    envelope: Arc<CommandEnvelope>,
    target: Option<CommandTarget>,
}

impl CommandInteraction {
    pub fn new(
        envelope: Arc<CommandEnvelope>,
        target: Option<CommandTarget>,
        api: BoxedInteractionApi,
    ) -> Self {
        Self {
            interaction: Interaction::new(
                envelope.id.clone(),
                envelope.token.clone(),
                InteractionOrigin::Command,
                api,
            ),
            envelope,
            target,
        }
    }

    pub fn envelope(&self) -> &CommandEnvelope {
        &self.envelope
    }

    /// The invoked path, e.g. `mod hard kick`.
    pub fn qualified_name(&self) -> String {
        self.envelope.qualified_name()
    }

    pub fn channel_id(&self) -> &str {
        &self.envelope.channel_id
    }

    pub fn guild_id(&self) -> Option<&str> {
        self.envelope.guild_id.as_deref()
    }

    pub fn member(&self) -> Option<&InvokingMember> {
        self.envelope.member.as_ref()
    }

    /// The user or message a context menu command was invoked on.
    pub fn target(&self) -> Option<&CommandTarget> {
        self.target.as_ref()
    }
}

impl Deref for CommandInteraction {
    type Target = Interaction;

    fn deref(&self) -> &Self::Target {
        &self.interaction
    }
}

impl DerefMut for CommandInteraction {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.interaction
    }
}
