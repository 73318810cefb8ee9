//! Command definitions and their builder.

use std::fmt;
use std::sync::Arc;

use switchboard_core::{CommandArgs, CommandKind, FlatCommand, OptionMap, OptionSpec};

use super::group::Group;
use crate::error::CommandBuildError;
use crate::handler::{BoxedCommandHandler, Handler};
use crate::interaction::CommandInteraction;

/// A registered command: its identity, declared options and handler.
#[derive(Clone)]
pub struct CommandDefinition {
    name: String,
    description: String,
    kind: CommandKind,
    group: Option<Group>,
    options: OptionMap,
    handler: BoxedCommandHandler,
}

impl CommandDefinition {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn kind(&self) -> CommandKind {
        self.kind
    }

    pub fn group(&self) -> Option<&Group> {
        self.group.as_ref()
    }

    pub fn options(&self) -> &OptionMap {
        &self.options
    }

    pub fn handler(&self) -> &BoxedCommandHandler {
        &self.handler
    }

    /// Space-separated path, e.g. `mod hard kick`.
    pub fn path(&self) -> String {
        match &self.group {
            Some(group) => format!("{} {}", group.path(), self.name),
            None => self.name.clone(),
        }
    }

    /// The `(name, group, parent group)` identity used for uniqueness.
    pub(crate) fn key(&self) -> (&str, Option<&str>, Option<&str>) {
        let group = self.group.as_ref();
        (
            &self.name,
            group.map(Group::name),
            group.and_then(Group::parent).map(Group::name),
        )
    }

    /// Flattens the definition for bulk registration.
    pub fn to_flat(&self) -> FlatCommand {
        let (group, sub_group) = match &self.group {
            Some(g) => match g.parent() {
                Some(parent) => (Some(parent.name().to_string()), Some(g.name().to_string())),
                None => (Some(g.name().to_string()), None),
            },
            None => (None, None),
        };

        FlatCommand {
            name: self.name.clone(),
            description: self.description.clone(),
            kind: self.kind,
            group,
            sub_group,
            options: self.options.to_named(),
        }
    }
}

impl fmt::Debug for CommandDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandDefinition")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("group", &self.group)
            .field("options", &self.options.len())
            .finish()
    }
}

// ============================================================================
// Builder
// ============================================================================

/// Builder for [`CommandDefinition`].
///
/// # Example
///
/// ```rust,ignore
/// let ban = Command::chat("ban", "Ban a user")
///     .group(&moderation)
///     .option("user", OptionSpec::user("Who to ban").required())
///     .option("reason", OptionSpec::string("Why"))
///     .build(|mut ctx: CommandInteraction, args: CommandArgs| async move {
///         let target = args.user("user").map(|u| u.user.mention()).unwrap_or_default();
///         ctx.ack_with_message(format!("Banned {target}").into()).await?;
///         Ok::<_, BoxError>(())
///     })?;
/// ```
#[derive(Debug)]
#[must_use]
pub struct Command {
    name: String,
    description: String,
    kind: CommandKind,
    group: Option<Group>,
    options: OptionMap,
    error: Option<CommandBuildError>,
}

impl Command {
    fn new(name: String, description: String, kind: CommandKind) -> Self {
        Self {
            name,
            description,
            kind,
            group: None,
            options: OptionMap::new(),
            error: None,
        }
    }

    /// Starts a slash command.
    pub fn chat(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(name.into(), description.into(), CommandKind::Chat)
    }

    /// Starts a user context menu command.
    pub fn user(name: impl Into<String>) -> Self {
        Self::new(name.into(), String::new(), CommandKind::User)
    }

    /// Starts a message context menu command.
    pub fn message(name: impl Into<String>) -> Self {
        Self::new(name.into(), String::new(), CommandKind::Message)
    }

    /// Places the command in a group or sub-group.
    pub fn group(mut self, group: &Group) -> Self {
        if self.kind != CommandKind::Chat {
            self.fail(CommandBuildError::GroupOnContextCommand(self.name.clone()));
        }
        self.group = Some(group.clone());
        self
    }

    /// Declares an option. Declaration order is preserved.
    pub fn option(mut self, name: impl Into<String>, spec: OptionSpec) -> Self {
        let name = name.into();
        if self.kind != CommandKind::Chat {
            self.fail(CommandBuildError::OptionsOnContextCommand(self.name.clone()));
        } else if !self.options.insert(name.clone(), spec) {
            self.fail(CommandBuildError::DuplicateOption {
                command: self.name.clone(),
                option: name,
            });
        }
        self
    }

    /// Finishes the definition with its handler.
    ///
    /// # Errors
    ///
    /// Returns the first error recorded while building.
    pub fn build<H>(self, handler: H) -> Result<CommandDefinition, CommandBuildError>
    where
        H: Handler<CommandInteraction, CommandArgs>,
    {
        if let Some(err) = self.error {
            return Err(err);
        }

        Ok(CommandDefinition {
            name: self.name,
            description: self.description,
            kind: self.kind,
            group: self.group,
            options: self.options,
            handler: Arc::new(handler),
        })
    }

    fn fail(&mut self, err: CommandBuildError) {
        self.error.get_or_insert(err);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use switchboard_core::OptionKind;

    async fn noop(_ctx: CommandInteraction, _args: CommandArgs) {}

    #[test]
    fn test_build_chat_command() {
        let def = Command::chat("ban", "Ban a user")
            .option("user", OptionSpec::user("Who").required())
            .option("reason", OptionSpec::string("Why"))
            .build(noop)
            .unwrap();

        assert_eq!(def.name(), "ban");
        assert_eq!(def.kind(), CommandKind::Chat);
        assert_eq!(def.options().len(), 2);
        assert_eq!(def.key(), ("ban", None, None));
        assert_eq!(def.path(), "ban");

        let flat = def.to_flat();
        assert_eq!(flat.options[0].name, "user");
        assert_eq!(flat.options[0].spec.kind, OptionKind::User);
        assert_eq!(flat.options[1].name, "reason");
    }

    #[test]
    fn test_sub_group_flattening() {
        let root = Group::new("mod", "Moderation");
        let hard = root.sub_group("hard", "Hard").unwrap();
        let def = Command::chat("kick", "Kick").group(&hard).build(noop).unwrap();

        assert_eq!(def.key(), ("kick", Some("hard"), Some("mod")));
        assert_eq!(def.path(), "mod hard kick");

        let flat = def.to_flat();
        assert_eq!(flat.group.as_deref(), Some("mod"));
        assert_eq!(flat.sub_group.as_deref(), Some("hard"));
    }

    #[test]
    fn test_builder_errors() {
        let err = Command::chat("ban", "Ban")
            .option("user", OptionSpec::user("Who"))
            .option("user", OptionSpec::string("Again"))
            .build(noop)
            .unwrap_err();
        assert_eq!(
            err,
            CommandBuildError::DuplicateOption {
                command: "ban".into(),
                option: "user".into()
            }
        );

        let err = Command::user("Inspect")
            .option("x", OptionSpec::string("x"))
            .build(noop)
            .unwrap_err();
        assert_eq!(err, CommandBuildError::OptionsOnContextCommand("Inspect".into()));

        let err = Command::message("Quote")
            .group(&Group::new("g", "g"))
            .build(noop)
            .unwrap_err();
        assert_eq!(err, CommandBuildError::GroupOnContextCommand("Quote".into()));
    }
}
