//! Outbound reply payloads.
//!
//! Message content beyond plain text (embeds, components, attachments) is
//! carried as opaque JSON; serializing it is the platform client's business.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Fields of a message sent or edited through an interaction.
///
/// # Example
///
/// ```rust
/// use switchboard_core::MessageFields;
///
/// let reply = MessageFields::content("Done!").ephemeral();
/// assert!(reply.ephemeral);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageFields {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub embeds: Vec<Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub components: Vec<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowed_mentions: Option<Value>,
    /// Only the invoking user sees the message.
    #[serde(default)]
    pub ephemeral: bool,
}

impl MessageFields {
    /// Creates fields with only text content.
    pub fn content(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            ..Default::default()
        }
    }

    /// Marks the message as ephemeral.
    pub fn ephemeral(mut self) -> Self {
        self.ephemeral = true;
        self
    }

    /// Adds an embed.
    pub fn embed(mut self, embed: Value) -> Self {
        self.embeds.push(embed);
        self
    }

    /// Adds a component row.
    pub fn component_row(mut self, row: Value) -> Self {
        self.components.push(row);
        self
    }
}

impl From<&str> for MessageFields {
    fn from(content: &str) -> Self {
        Self::content(content)
    }
}

impl From<String> for MessageFields {
    fn from(content: String) -> Self {
        Self::content(content)
    }
}

/// Visual style of a modal text input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextInputStyle {
    #[default]
    Short,
    Paragraph,
}

/// A text input shown inside a modal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextInput {
    pub custom_id: String,
    pub label: String,
    #[serde(default)]
    pub style: TextInputStyle,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl TextInput {
    pub fn new(custom_id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            custom_id: custom_id.into(),
            label: label.into(),
            style: TextInputStyle::Short,
            required: false,
            placeholder: None,
            min_length: None,
            max_length: None,
            value: None,
        }
    }

    pub fn paragraph(mut self) -> Self {
        self.style = TextInputStyle::Paragraph;
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }
}

/// A modal opened as the initial callback of an interaction.
///
/// `custom_id` should come from the custom id codec so the submission routes
/// back to a modal handler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModalFields {
    pub title: String,
    pub custom_id: String,
    pub inputs: Vec<TextInput>,
}

impl ModalFields {
    pub fn new(title: impl Into<String>, custom_id: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            custom_id: custom_id.into(),
            inputs: Vec::new(),
        }
    }

    /// Adds a text input.
    pub fn input(mut self, input: TextInput) -> Self {
        self.inputs.push(input);
        self
    }
}

/// The initial callback sent in response to an interaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data")]
pub enum InteractionCallback {
    /// Reply immediately with a message.
    Message(MessageFields),
    /// Acknowledge now, reply later by editing the original response.
    DeferredMessage(Option<MessageFields>),
    /// Replace the message the component is attached to.
    UpdateMessage(MessageFields),
    /// Acknowledge now, update the component's message later.
    DeferredUpdateMessage,
    /// Open a modal.
    Modal(ModalFields),
}

impl InteractionCallback {
    /// Returns the callback variant name, for logs.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Message(_) => "message",
            Self::DeferredMessage(_) => "deferred_message",
            Self::UpdateMessage(_) => "update_message",
            Self::DeferredUpdateMessage => "deferred_update_message",
            Self::Modal(_) => "modal",
        }
    }

    /// Returns `true` if the substantive reply is deferred to a later call.
    pub fn is_deferred(&self) -> bool {
        matches!(self, Self::DeferredMessage(_) | Self::DeferredUpdateMessage)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_callback_wire_shape() {
        let callback = InteractionCallback::Message(MessageFields::content("pong"));
        assert_eq!(
            serde_json::to_value(&callback).unwrap(),
            json!({
                "kind": "Message",
                "data": { "content": "pong", "ephemeral": false }
            })
        );

        let deferred = InteractionCallback::DeferredUpdateMessage;
        assert_eq!(
            serde_json::to_value(&deferred).unwrap(),
            json!({ "kind": "DeferredUpdateMessage" })
        );
        assert!(deferred.is_deferred());
    }

    #[test]
    fn test_modal_builder() {
        let modal = ModalFields::new("Report", "0:report")
            .input(TextInput::new("reason", "Reason").paragraph().required());

        assert_eq!(modal.inputs.len(), 1);
        assert_eq!(modal.inputs[0].style, TextInputStyle::Paragraph);
        assert!(modal.inputs[0].required);
    }
}
