//! Inbound interaction envelopes.
//!
//! An envelope is the immutable snapshot of one inbound interaction, exactly
//! as the transport delivered it. Envelopes are deserialized once per event and
//! never mutated; live state lives in the interaction handle built on top.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::foundation::model::{DataMap, InvokingMember};
use crate::foundation::option::OptionKind;

/// Event tag for command interactions.
pub const TAG_COMMAND: &str = "INTERACTION_COMMAND";
/// Event tag for message component interactions (buttons, select menus).
pub const TAG_COMPONENT: &str = "INTERACTION_COMPONENT";
/// Event tag for modal submissions.
pub const TAG_MODAL_SUBMIT: &str = "INTERACTION_MODAL_SUBMIT";

/// The kind of command an envelope or definition refers to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CommandKind {
    /// A slash command typed in the chat input.
    #[default]
    Chat,
    /// A context menu command on a user.
    User,
    /// A context menu command on a message.
    Message,
}

/// One raw option entry of a command envelope.
///
/// For reference kinds `value` is the opaque id to look up in the side
/// tables; for primitive kinds it is the value itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawOption {
    pub name: String,
    pub kind: OptionKind,
    pub value: Value,
}

impl RawOption {
    pub fn new(name: impl Into<String>, kind: OptionKind, value: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            kind,
            value: value.into(),
        }
    }
}

/// Snapshot of one inbound command interaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandEnvelope {
    pub id: String,
    pub token: String,
    #[serde(default)]
    pub guild_id: Option<String>,
    pub channel_id: String,
    #[serde(default)]
    pub member: Option<InvokingMember>,
    #[serde(default)]
    pub kind: CommandKind,
    pub name: String,
    #[serde(default)]
    pub parent_name: Option<String>,
    #[serde(default)]
    pub parent_parent_name: Option<String>,
    #[serde(default)]
    pub options: Vec<RawOption>,
    /// Target of a user or message context command.
    #[serde(default)]
    pub target_id: Option<String>,
    #[serde(default)]
    pub data_map: DataMap,
}

impl CommandEnvelope {
    /// Creates a chat command envelope with no options.
    pub fn new(
        id: impl Into<String>,
        token: impl Into<String>,
        channel_id: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            token: token.into(),
            guild_id: None,
            channel_id: channel_id.into(),
            member: None,
            kind: CommandKind::Chat,
            name: name.into(),
            parent_name: None,
            parent_parent_name: None,
            options: Vec::new(),
            target_id: None,
            data_map: DataMap::default(),
        }
    }

    /// Sets the parent group name (builder pattern).
    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parent_name = Some(parent.into());
        self
    }

    /// Sets the parent-parent group name (builder pattern).
    pub fn with_parent_parent(mut self, parent_parent: impl Into<String>) -> Self {
        self.parent_parent_name = Some(parent_parent.into());
        self
    }

    /// Appends a raw option (builder pattern).
    pub fn with_option(mut self, option: RawOption) -> Self {
        self.options.push(option);
        self
    }

    /// Replaces the side tables (builder pattern).
    pub fn with_data_map(mut self, data_map: DataMap) -> Self {
        self.data_map = data_map;
        self
    }

    /// Turns the envelope into a context command on `target_id`.
    pub fn with_target(mut self, kind: CommandKind, target_id: impl Into<String>) -> Self {
        self.kind = kind;
        self.target_id = Some(target_id.into());
        self
    }

    /// Returns the raw option named `name`.
    pub fn option(&self, name: &str) -> Option<&RawOption> {
        self.options.iter().find(|o| o.name == name)
    }

    /// Returns the fully qualified command path, e.g. `mod hard kick`.
    pub fn qualified_name(&self) -> String {
        [
            self.parent_parent_name.as_deref(),
            self.parent_name.as_deref(),
            Some(self.name.as_str()),
        ]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(" ")
    }
}

/// The kind of message component that was interacted with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComponentKind {
    Button,
    StringSelect,
    UserSelect,
    RoleSelect,
    MentionableSelect,
    ChannelSelect,
}

impl ComponentKind {
    /// Returns `true` for every select menu variant.
    pub fn is_select_menu(&self) -> bool {
        !matches!(self, Self::Button)
    }
}

/// Snapshot of one inbound component interaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentEnvelope {
    pub id: String,
    pub token: String,
    #[serde(default)]
    pub guild_id: Option<String>,
    pub channel_id: String,
    #[serde(default)]
    pub member: Option<InvokingMember>,
    /// Message the component is attached to.
    pub message_id: String,
    pub component_kind: ComponentKind,
    pub custom_id: String,
    /// Selected values, for select menus.
    #[serde(default)]
    pub values: Vec<String>,
    #[serde(default)]
    pub data_map: DataMap,
}

/// One submitted text input of a modal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModalValue {
    pub custom_id: String,
    pub value: String,
}

/// Snapshot of one inbound modal submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModalSubmitEnvelope {
    pub id: String,
    pub token: String,
    #[serde(default)]
    pub guild_id: Option<String>,
    pub channel_id: String,
    #[serde(default)]
    pub member: Option<InvokingMember>,
    /// Message the modal was opened from, if it came from a component.
    #[serde(default)]
    pub message_id: Option<String>,
    pub custom_id: String,
    #[serde(default)]
    pub values: Vec<ModalValue>,
}

impl ModalSubmitEnvelope {
    /// Returns the submitted value of the text input `custom_id`.
    pub fn value(&self, custom_id: &str) -> Option<&str> {
        self.values
            .iter()
            .find(|v| v.custom_id == custom_id)
            .map(|v| v.value.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_command_envelope_from_wire() {
        let envelope: CommandEnvelope = serde_json::from_value(json!({
            "id": "100",
            "token": "tok",
            "channelId": "9",
            "name": "kick",
            "parentName": "hard",
            "parentParentName": "mod",
            "options": [
                { "name": "target", "kind": "User", "value": "42" }
            ]
        }))
        .unwrap();

        assert_eq!(envelope.kind, CommandKind::Chat);
        assert_eq!(envelope.qualified_name(), "mod hard kick");
        assert_eq!(envelope.option("target").unwrap().value, json!("42"));
        assert!(envelope.data_map.users.is_empty());
    }

    #[test]
    fn test_qualified_name_without_groups() {
        let envelope = CommandEnvelope::new("1", "t", "9", "ban");
        assert_eq!(envelope.qualified_name(), "ban");
    }

    #[test]
    fn test_modal_value_lookup() {
        let envelope: ModalSubmitEnvelope = serde_json::from_value(json!({
            "id": "1",
            "token": "t",
            "channelId": "9",
            "customId": "0:report",
            "values": [
                { "customId": "reason", "value": "spam" }
            ]
        }))
        .unwrap();

        assert_eq!(envelope.value("reason"), Some("spam"));
        assert_eq!(envelope.value("missing"), None);
    }
}
