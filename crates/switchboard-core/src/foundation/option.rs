//! Command option declarations.
//!
//! An [`OptionMap`] is the runtime list of `(name, OptionSpec)` pairs a command
//! declares. It is built once at registration time and consulted twice: when
//! compiling the registration payload and when resolving the raw values of an
//! inbound envelope.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::foundation::model::ChannelType;

/// The kind of value an option accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OptionKind {
    String,
    Number,
    Integer,
    Boolean,
    User,
    Channel,
    Role,
    Mentionable,
}

impl OptionKind {
    /// Returns the kind name used in error messages and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Integer => "integer",
            Self::Boolean => "boolean",
            Self::User => "user",
            Self::Channel => "channel",
            Self::Role => "role",
            Self::Mentionable => "mentionable",
        }
    }

    /// Returns `true` if values of this kind are references into side tables.
    pub fn is_reference(&self) -> bool {
        matches!(
            self,
            Self::User | Self::Channel | Self::Role | Self::Mentionable
        )
    }
}

impl std::fmt::Display for OptionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fixed choice offered to the user for a string or numeric option.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionChoice {
    pub name: String,
    pub value: Value,
}

/// Declaration of a single command option.
///
/// # Example
///
/// ```rust
/// use switchboard_core::OptionSpec;
///
/// let amount = OptionSpec::integer("How many items")
///     .required()
///     .min_value(1.0)
///     .max_value(10.0);
/// assert!(amount.required);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionSpec {
    pub kind: OptionKind,
    pub description: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u16>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub choices: Vec<OptionChoice>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub channel_types: Vec<ChannelType>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub autocomplete: bool,
}

impl OptionSpec {
    /// Creates an optional option of the given kind.
    pub fn new(kind: OptionKind, description: impl Into<String>) -> Self {
        Self {
            kind,
            description: description.into(),
            required: false,
            min_value: None,
            max_value: None,
            min_length: None,
            max_length: None,
            choices: Vec::new(),
            channel_types: Vec::new(),
            autocomplete: false,
        }
    }

    pub fn string(description: impl Into<String>) -> Self {
        Self::new(OptionKind::String, description)
    }

    pub fn number(description: impl Into<String>) -> Self {
        Self::new(OptionKind::Number, description)
    }

    pub fn integer(description: impl Into<String>) -> Self {
        Self::new(OptionKind::Integer, description)
    }

    pub fn boolean(description: impl Into<String>) -> Self {
        Self::new(OptionKind::Boolean, description)
    }

    pub fn user(description: impl Into<String>) -> Self {
        Self::new(OptionKind::User, description)
    }

    pub fn channel(description: impl Into<String>) -> Self {
        Self::new(OptionKind::Channel, description)
    }

    pub fn role(description: impl Into<String>) -> Self {
        Self::new(OptionKind::Role, description)
    }

    pub fn mentionable(description: impl Into<String>) -> Self {
        Self::new(OptionKind::Mentionable, description)
    }

    /// Marks the option as required.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Sets the minimum accepted value (numeric kinds).
    pub fn min_value(mut self, min: f64) -> Self {
        self.min_value = Some(min);
        self
    }

    /// Sets the maximum accepted value (numeric kinds).
    pub fn max_value(mut self, max: f64) -> Self {
        self.max_value = Some(max);
        self
    }

    /// Sets the minimum accepted length (string kind).
    pub fn min_length(mut self, min: u16) -> Self {
        self.min_length = Some(min);
        self
    }

    /// Sets the maximum accepted length (string kind).
    pub fn max_length(mut self, max: u16) -> Self {
        self.max_length = Some(max);
        self
    }

    /// Adds a fixed choice.
    pub fn choice(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.choices.push(OptionChoice {
            name: name.into(),
            value: value.into(),
        });
        self
    }

    /// Restricts the channel kinds a channel option accepts.
    pub fn channel_types(mut self, types: impl IntoIterator<Item = ChannelType>) -> Self {
        self.channel_types.extend(types);
        self
    }

    /// Enables autocomplete for this option.
    pub fn autocomplete(mut self) -> Self {
        self.autocomplete = true;
        self
    }
}

/// An option as it appears in the registration payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedOption {
    pub name: String,
    #[serde(flatten)]
    pub spec: OptionSpec,
}

/// Ordered map from option name to its declaration.
///
/// Declaration order is preserved because the platform displays options in
/// the order they were registered.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OptionMap {
    entries: Vec<(String, OptionSpec)>,
}

impl OptionMap {
    /// Creates an empty option map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts an option, returning `false` if the name is already taken.
    pub fn insert(&mut self, name: impl Into<String>, spec: OptionSpec) -> bool {
        let name = name.into();
        if self.contains(&name) {
            return false;
        }
        self.entries.push((name, spec));
        true
    }

    /// Returns the declaration for `name`.
    pub fn get(&self, name: &str) -> Option<&OptionSpec> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, spec)| spec)
    }

    /// Returns `true` if an option named `name` is declared.
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Iterates over the declarations in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &OptionSpec)> {
        self.entries.iter().map(|(n, spec)| (n.as_str(), spec))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Flattens the map into the registration payload form.
    pub fn to_named(&self) -> Vec<NamedOption> {
        self.entries
            .iter()
            .map(|(name, spec)| NamedOption {
                name: name.clone(),
                spec: spec.clone(),
            })
            .collect()
    }
}
