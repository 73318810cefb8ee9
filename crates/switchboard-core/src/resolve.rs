//! Option resolution.
//!
//! Command envelopes carry options as `(name, kind, raw value)` triples where
//! reference kinds hold only an opaque id. This module joins those ids against
//! the envelope's [`DataMap`] and produces strongly-typed values.
//!
//! Everything here is pure: no I/O, no shared state.

use std::collections::HashMap;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::trace;

use crate::error::ResolutionError;
use crate::foundation::envelope::{CommandEnvelope, CommandKind, RawOption};
use crate::foundation::model::{Channel, DataMap, Member, Message, Role, User};
use crate::foundation::option::{OptionKind, OptionMap};

/// A user together with its guild member entry, if the platform sent one.
///
/// The member is legitimately absent when the user is not (or no longer) in
/// the guild.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedUser {
    pub user: User,
    pub member: Option<Member>,
}

/// A resolved option value.
///
/// Mentionable options resolve to either the [`User`](Self::User) or the
/// [`Role`](Self::Role) variant.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TypedOptionValue {
    String(String),
    Number(f64),
    Integer(i64),
    Boolean(bool),
    User(ResolvedUser),
    Role(Role),
    Channel(Channel),
}

impl TypedOptionValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the numeric value; integers widen to `f64`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_user(&self) -> Option<&ResolvedUser> {
        match self {
            Self::User(u) => Some(u),
            _ => None,
        }
    }

    pub fn as_role(&self) -> Option<&Role> {
        match self {
            Self::Role(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_channel(&self) -> Option<&Channel> {
        match self {
            Self::Channel(c) => Some(c),
            _ => None,
        }
    }
}

/// Resolves a single raw option against the side tables.
///
/// # Errors
///
/// - [`ResolutionError::ReferenceNotFound`] when a referenced entity is absent
/// - [`ResolutionError::InvalidValue`] when the raw value has the wrong JSON type
pub fn resolve(data_map: &DataMap, raw: &RawOption) -> Result<TypedOptionValue, ResolutionError> {
    match raw.kind {
        OptionKind::String => raw
            .value
            .as_str()
            .map(|s| TypedOptionValue::String(s.to_string()))
            .ok_or_else(|| invalid(raw)),
        OptionKind::Number => raw
            .value
            .as_f64()
            .map(TypedOptionValue::Number)
            .ok_or_else(|| invalid(raw)),
        OptionKind::Integer => raw
            .value
            .as_i64()
            .map(TypedOptionValue::Integer)
            .ok_or_else(|| invalid(raw)),
        OptionKind::Boolean => raw
            .value
            .as_bool()
            .map(TypedOptionValue::Boolean)
            .ok_or_else(|| invalid(raw)),
        OptionKind::User => {
            let id = reference_id(raw)?;
            lookup_user(data_map, id)
                .map(TypedOptionValue::User)
                .ok_or(ResolutionError::ReferenceNotFound("user"))
        }
        OptionKind::Role => {
            let id = reference_id(raw)?;
            data_map
                .roles
                .get(id)
                .cloned()
                .map(TypedOptionValue::Role)
                .ok_or(ResolutionError::ReferenceNotFound("role"))
        }
        OptionKind::Channel => {
            let id = reference_id(raw)?;
            data_map
                .channels
                .get(id)
                .cloned()
                .map(TypedOptionValue::Channel)
                .ok_or(ResolutionError::ReferenceNotFound("channel"))
        }
        OptionKind::Mentionable => {
            let id = reference_id(raw)?;
            if let Some(user) = lookup_user(data_map, id) {
                return Ok(TypedOptionValue::User(user));
            }
            data_map
                .roles
                .get(id)
                .cloned()
                .map(TypedOptionValue::Role)
                .ok_or(ResolutionError::ReferenceNotFound("mentionable"))
        }
    }
}

fn lookup_user(data_map: &DataMap, id: &str) -> Option<ResolvedUser> {
    data_map.users.get(id).map(|user| ResolvedUser {
        user: user.clone(),
        member: data_map.members.get(id).cloned(),
    })
}

fn reference_id(raw: &RawOption) -> Result<&str, ResolutionError> {
    raw.value.as_str().ok_or_else(|| invalid(raw))
}

fn invalid(raw: &RawOption) -> ResolutionError {
    let expected = if raw.kind.is_reference() {
        "reference id"
    } else {
        raw.kind.as_str()
    };
    ResolutionError::InvalidValue {
        name: raw.name.clone(),
        expected,
    }
}

// =============================================================================
// Command Arguments
// =============================================================================

/// The typed argument map handed to a command handler.
///
/// # Example
///
/// ```rust,ignore
/// #[derive(Deserialize)]
/// struct BanArgs {
///     target: ResolvedUserArg,
///     reason: Option<String>,
/// }
///
/// let args: BanArgs = ctx.args().parse()?;
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommandArgs {
    values: HashMap<String, TypedOptionValue>,
}

impl CommandArgs {
    /// Creates an empty argument map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the resolved value of option `name`.
    pub fn get(&self, name: &str) -> Option<&TypedOptionValue> {
        self.values.get(name)
    }

    pub fn string(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(TypedOptionValue::as_str)
    }

    pub fn number(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(TypedOptionValue::as_f64)
    }

    pub fn integer(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(TypedOptionValue::as_i64)
    }

    pub fn boolean(&self, name: &str) -> Option<bool> {
        self.get(name).and_then(TypedOptionValue::as_bool)
    }

    pub fn user(&self, name: &str) -> Option<&ResolvedUser> {
        self.get(name).and_then(TypedOptionValue::as_user)
    }

    pub fn role(&self, name: &str) -> Option<&Role> {
        self.get(name).and_then(TypedOptionValue::as_role)
    }

    pub fn channel(&self, name: &str) -> Option<&Channel> {
        self.get(name).and_then(TypedOptionValue::as_channel)
    }

    /// Returns a mentionable value: either a user or a role.
    pub fn mentionable(&self, name: &str) -> Option<&TypedOptionValue> {
        self.get(name).filter(|v| {
            matches!(v, TypedOptionValue::User(_) | TypedOptionValue::Role(_))
        })
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Deserializes the arguments into a handler-defined struct.
    ///
    /// Users serialize as `{ "user": ..., "member": ... }`, roles and channels
    /// as their entity objects, primitives as plain JSON values. Absent
    /// optional options are absent keys.
    pub fn parse<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        let mut map = Map::with_capacity(self.values.len());
        for (name, value) in &self.values {
            map.insert(name.clone(), serde_json::to_value(value)?);
        }
        serde_json::from_value(Value::Object(map))
    }

    pub(crate) fn insert(&mut self, name: String, value: TypedOptionValue) {
        self.values.insert(name, value);
    }
}

/// Resolves every declared option of a command against an envelope.
///
/// Raw options the command does not declare are ignored. A raw option whose
/// kind disagrees with its declaration is rejected as an invalid value.
///
/// # Errors
///
/// Fails on the first option that cannot be resolved; the caller must not
/// invoke the command in that case.
pub fn resolve_args(
    options: &OptionMap,
    envelope: &CommandEnvelope,
) -> Result<CommandArgs, ResolutionError> {
    let mut args = CommandArgs::new();

    for (name, spec) in options.iter() {
        match envelope.option(name) {
            Some(raw) if raw.kind != spec.kind => {
                return Err(ResolutionError::InvalidValue {
                    name: name.to_string(),
                    expected: spec.kind.as_str(),
                });
            }
            Some(raw) => {
                let value = resolve(&envelope.data_map, raw)?;
                args.insert(name.to_string(), value);
            }
            None if spec.required => {
                return Err(ResolutionError::MissingRequired(name.to_string()));
            }
            None => {}
        }
    }

    for raw in &envelope.options {
        if !options.contains(&raw.name) {
            trace!(option = %raw.name, command = %envelope.name, "Ignoring undeclared option");
        }
    }

    Ok(args)
}

// =============================================================================
// Context Command Targets
// =============================================================================

/// The entity a context menu command was invoked on.
#[derive(Debug, Clone, PartialEq)]
pub enum CommandTarget {
    User(ResolvedUser),
    Message(Message),
}

/// Resolves the target of a user or message context command.
///
/// Chat commands have no target and resolve to `None`.
pub fn resolve_target(envelope: &CommandEnvelope) -> Result<Option<CommandTarget>, ResolutionError> {
    let kind_name = match envelope.kind {
        CommandKind::Chat => return Ok(None),
        CommandKind::User => "user",
        CommandKind::Message => "message",
    };

    let id = envelope
        .target_id
        .as_deref()
        .ok_or(ResolutionError::ReferenceNotFound(kind_name))?;

    let target = match envelope.kind {
        CommandKind::User => lookup_user(&envelope.data_map, id).map(CommandTarget::User),
        _ => envelope
            .data_map
            .messages
            .get(id)
            .cloned()
            .map(CommandTarget::Message),
    };

    target
        .map(Some)
        .ok_or(ResolutionError::ReferenceNotFound(kind_name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::model::ChannelType;
    use crate::foundation::option::OptionSpec;
    use serde::Deserialize;
    use serde_json::json;

    fn user(id: &str, name: &str) -> User {
        User {
            id: id.to_string(),
            username: name.to_string(),
            discriminator: None,
            global_name: None,
            avatar: None,
            bot: false,
        }
    }

    fn member() -> Member {
        Member {
            nick: Some("nick".to_string()),
            roles: vec!["7".to_string()],
            joined_at: None,
            avatar: None,
            permissions: None,
            pending: false,
        }
    }

    fn role(id: &str, name: &str) -> Role {
        Role {
            id: id.to_string(),
            name: name.to_string(),
            color: 0,
            hoist: false,
            managed: false,
            mentionable: true,
            position: 1,
            permissions: "0".to_string(),
        }
    }

    fn data_map() -> DataMap {
        DataMap::new()
            .with_user(user("1", "ferris"))
            .with_member("1", member())
            .with_user(user("2", "departed"))
            .with_role(role("7", "mods"))
            .with_channel(Channel {
                id: "9".to_string(),
                name: "general".to_string(),
                kind: ChannelType::Text,
                parent_id: None,
                permissions: None,
            })
    }

    #[test]
    fn test_user_with_member() {
        let value = resolve(&data_map(), &RawOption::new("u", OptionKind::User, "1")).unwrap();
        let resolved = value.as_user().unwrap();
        assert_eq!(resolved.user.username, "ferris");
        assert_eq!(resolved.member, Some(member()));
    }

    #[test]
    fn test_user_without_member_is_not_an_error() {
        let value = resolve(&data_map(), &RawOption::new("u", OptionKind::User, "2")).unwrap();
        let resolved = value.as_user().unwrap();
        assert_eq!(resolved.user.username, "departed");
        assert!(resolved.member.is_none());
    }

    #[test]
    fn test_missing_references() {
        let map = data_map();
        let cases = [
            (OptionKind::User, "user"),
            (OptionKind::Role, "role"),
            (OptionKind::Channel, "channel"),
            (OptionKind::Mentionable, "mentionable"),
        ];

        for (kind, name) in cases {
            assert_eq!(
                resolve(&map, &RawOption::new("x", kind, "404")),
                Err(ResolutionError::ReferenceNotFound(name))
            );
        }
    }

    #[test]
    fn test_mentionable_discrimination() {
        let map = data_map();

        let as_user = resolve(&map, &RawOption::new("m", OptionKind::Mentionable, "1")).unwrap();
        assert!(matches!(as_user, TypedOptionValue::User(_)));

        let as_role = resolve(&map, &RawOption::new("m", OptionKind::Mentionable, "7")).unwrap();
        assert_eq!(as_role, TypedOptionValue::Role(role("7", "mods")));
    }

    #[test]
    fn test_mentionable_prefers_users() {
        let map = data_map().with_role(role("1", "same id"));
        let value = resolve(&map, &RawOption::new("m", OptionKind::Mentionable, "1")).unwrap();
        assert!(value.as_user().is_some());
    }

    #[test]
    fn test_primitives_pass_through() {
        let map = DataMap::new();
        assert_eq!(
            resolve(&map, &RawOption::new("s", OptionKind::String, "hi")),
            Ok(TypedOptionValue::String("hi".to_string()))
        );
        assert_eq!(
            resolve(&map, &RawOption::new("n", OptionKind::Number, 1.5)),
            Ok(TypedOptionValue::Number(1.5))
        );
        assert_eq!(
            resolve(&map, &RawOption::new("i", OptionKind::Integer, 3)),
            Ok(TypedOptionValue::Integer(3))
        );
        assert_eq!(
            resolve(&map, &RawOption::new("b", OptionKind::Boolean, true)),
            Ok(TypedOptionValue::Boolean(true))
        );
    }

    #[test]
    fn test_primitive_type_mismatch() {
        assert_eq!(
            resolve(&DataMap::new(), &RawOption::new("i", OptionKind::Integer, "3")),
            Err(ResolutionError::InvalidValue {
                name: "i".to_string(),
                expected: "integer",
            })
        );
    }

    fn ban_options() -> OptionMap {
        let mut options = OptionMap::new();
        options.insert("target", OptionSpec::user("Who").required());
        options.insert("days", OptionSpec::integer("Delete days"));
        options.insert("where", OptionSpec::channel("Log channel"));
        options
    }

    #[test]
    fn test_resolve_args() {
        let envelope = CommandEnvelope::new("1", "t", "9", "ban")
            .with_option(RawOption::new("target", OptionKind::User, "1"))
            .with_option(RawOption::new("where", OptionKind::Channel, "9"))
            .with_option(RawOption::new("stray", OptionKind::String, "x"))
            .with_data_map(data_map());

        let args = resolve_args(&ban_options(), &envelope).unwrap();
        assert_eq!(args.len(), 2);
        assert_eq!(args.user("target").unwrap().user.id, "1");
        assert_eq!(args.channel("where").unwrap().name, "general");
        assert_eq!(args.integer("days"), None);
        assert!(args.get("stray").is_none());
    }

    #[test]
    fn test_resolve_args_missing_required() {
        let envelope = CommandEnvelope::new("1", "t", "9", "ban");
        assert_eq!(
            resolve_args(&ban_options(), &envelope),
            Err(ResolutionError::MissingRequired("target".to_string()))
        );
    }

    #[test]
    fn test_resolve_args_kind_mismatch() {
        let envelope = CommandEnvelope::new("1", "t", "9", "ban")
            .with_option(RawOption::new("target", OptionKind::Role, "7"))
            .with_data_map(data_map());

        assert!(matches!(
            resolve_args(&ban_options(), &envelope),
            Err(ResolutionError::InvalidValue { expected: "user", .. })
        ));
    }

    #[derive(Debug, Deserialize)]
    struct TargetArg {
        user: User,
        member: Option<Member>,
    }

    #[derive(Debug, Deserialize)]
    struct BanArgs {
        target: TargetArg,
        days: Option<i64>,
    }

    #[test]
    fn test_parse_into_struct() {
        let envelope = CommandEnvelope::new("1", "t", "9", "ban")
            .with_option(RawOption::new("target", OptionKind::User, "2"))
            .with_option(RawOption::new("days", OptionKind::Integer, json!(7)))
            .with_data_map(data_map());

        let parsed: BanArgs = resolve_args(&ban_options(), &envelope)
            .unwrap()
            .parse()
            .unwrap();
        assert_eq!(parsed.target.user.username, "departed");
        assert!(parsed.target.member.is_none());
        assert_eq!(parsed.days, Some(7));
    }

    #[test]
    fn test_resolve_target() {
        let message = Message {
            id: "55".to_string(),
            channel_id: "9".to_string(),
            content: "quote me".to_string(),
            author: None,
            extra: Map::new(),
        };

        let chat = CommandEnvelope::new("1", "t", "9", "ping");
        assert_eq!(resolve_target(&chat), Ok(None));

        let on_user = CommandEnvelope::new("1", "t", "9", "info")
            .with_target(CommandKind::User, "1")
            .with_data_map(data_map());
        assert!(matches!(
            resolve_target(&on_user),
            Ok(Some(CommandTarget::User(_)))
        ));

        let on_message = CommandEnvelope::new("1", "t", "9", "quote")
            .with_target(CommandKind::Message, "55")
            .with_data_map(DataMap::new().with_message(message.clone()));
        assert_eq!(
            resolve_target(&on_message),
            Ok(Some(CommandTarget::Message(message)))
        );

        let dangling = CommandEnvelope::new("1", "t", "9", "quote")
            .with_target(CommandKind::Message, "56");
        assert_eq!(
            resolve_target(&dangling),
            Err(ResolutionError::ReferenceNotFound("message"))
        );
    }
}
