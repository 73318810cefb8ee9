//! Platform entities and the per-interaction side tables.
//!
//! Interactions do not embed full entities in their options. Instead every
//! option carries an opaque reference id, and the envelope ships a
//! [`DataMap`] with one table per entity kind. The option resolver joins the
//! two.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A platform user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub discriminator: Option<String>,
    #[serde(default)]
    pub global_name: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub bot: bool,
}

impl User {
    /// Returns the display name, preferring the global name.
    pub fn display_name(&self) -> &str {
        self.global_name.as_deref().unwrap_or(&self.username)
    }

    /// Returns the mention string for this user.
    pub fn mention(&self) -> String {
        format!("<@{}>", self.id)
    }
}

/// Guild-specific data of a user.
///
/// Side-table members are partial: the user object is stored separately in
/// [`DataMap::users`] under the same id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    #[serde(default)]
    pub nick: Option<String>,
    #[serde(default)]
    pub roles: Vec<String>,
    #[serde(default)]
    pub joined_at: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub permissions: Option<String>,
    #[serde(default)]
    pub pending: bool,
}

/// The member that invoked an interaction, with its user attached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvokingMember {
    pub user: User,
    #[serde(flatten)]
    pub member: Member,
}

/// A guild role.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Role {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub color: u32,
    #[serde(default)]
    pub hoist: bool,
    #[serde(default)]
    pub managed: bool,
    #[serde(default)]
    pub mentionable: bool,
    #[serde(default)]
    pub position: i64,
    #[serde(default)]
    pub permissions: String,
}

impl Role {
    /// Returns the mention string for this role.
    pub fn mention(&self) -> String {
        format!("<@&{}>", self.id)
    }
}

/// Channel kinds as reported by the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChannelType {
    Text,
    Voice,
    Category,
    News,
    NewsThread,
    PublicThread,
    PrivateThread,
    StageVoice,
    Directory,
    Forum,
    #[serde(other)]
    Unknown,
}

/// A partial channel, as carried in interaction side tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Channel {
    pub id: String,
    pub name: String,
    pub kind: ChannelType,
    #[serde(default)]
    pub parent_id: Option<String>,
    #[serde(default)]
    pub permissions: Option<String>,
}

impl Channel {
    /// Returns the mention string for this channel.
    pub fn mention(&self) -> String {
        format!("<#{}>", self.id)
    }
}

/// A message, used as the target of message context commands and as the
/// result of follow-up calls.
///
/// Only the routing-relevant fields are typed; the rest of the platform
/// payload (embeds, attachments, ...) is kept verbatim in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: String,
    pub channel_id: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub author: Option<User>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Per-interaction lookup tables resolving reference ids to entities.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataMap {
    pub users: HashMap<String, User>,
    pub members: HashMap<String, Member>,
    pub roles: HashMap<String, Role>,
    pub channels: HashMap<String, Channel>,
    pub messages: HashMap<String, Message>,
}

impl DataMap {
    /// Creates empty side tables.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a user (builder pattern).
    pub fn with_user(mut self, user: User) -> Self {
        self.users.insert(user.id.clone(), user);
        self
    }

    /// Adds a member entry for the user with the given id (builder pattern).
    pub fn with_member(mut self, user_id: impl Into<String>, member: Member) -> Self {
        self.members.insert(user_id.into(), member);
        self
    }

    /// Adds a role (builder pattern).
    pub fn with_role(mut self, role: Role) -> Self {
        self.roles.insert(role.id.clone(), role);
        self
    }

    /// Adds a channel (builder pattern).
    pub fn with_channel(mut self, channel: Channel) -> Self {
        self.channels.insert(channel.id.clone(), channel);
        self
    }

    /// Adds a message (builder pattern).
    pub fn with_message(mut self, message: Message) -> Self {
        self.messages.insert(message.id.clone(), message);
        self
    }
}
