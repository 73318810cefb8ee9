//! The command registry and matcher.

use switchboard_core::{CommandEnvelope, FlatCommand, FlatGroup, FlatSubGroup};
use tracing::debug;

use super::definition::CommandDefinition;
use crate::error::DuplicateCommandError;

/// Every command a router knows about, in registration order.
///
/// Mutated during setup only; once dispatch starts the registry is shared
/// read-only behind the router.
#[derive(Debug, Clone, Default)]
pub struct CommandRegistry {
    commands: Vec<CommandDefinition>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a command.
    ///
    /// # Errors
    ///
    /// Fails if a command with the same name, group and parent group is
    /// already registered.
    pub fn register(&mut self, definition: CommandDefinition) -> Result<(), DuplicateCommandError> {
        if self.contains(&definition) {
            return Err(DuplicateCommandError {
                path: definition.path(),
            });
        }

        debug!(command = %definition.path(), kind = ?definition.kind(), "Registered command");
        self.commands.push(definition);
        Ok(())
    }

    /// Whether a command with the same name, group and parent group is
    /// registered.
    pub fn contains(&self, definition: &CommandDefinition) -> bool {
        self.commands.iter().any(|c| c.key() == definition.key())
    }

    /// Builds the bulk-registration payload.
    ///
    /// Groups are emitted once per top-level name, in the order they are
    /// first referenced, with the sub-groups that registered commands live
    /// in. Unused sub-groups are left out.
    pub fn compile(&self) -> (Vec<FlatCommand>, Vec<FlatGroup>) {
        let commands = self.commands.iter().map(CommandDefinition::to_flat).collect();

        let mut groups: Vec<FlatGroup> = Vec::new();
        for group in self.commands.iter().filter_map(CommandDefinition::group) {
            let top = group.top_level();
            let sub_groups = match group.parent() {
                Some(_) => vec![FlatSubGroup {
                    name: group.name().to_string(),
                    description: group.description().to_string(),
                }],
                None => Vec::new(),
            };
            merge_group(
                &mut groups,
                FlatGroup {
                    name: top.name().to_string(),
                    description: top.description().to_string(),
                    sub_groups,
                },
            );
        }

        (commands, groups)
    }

    /// Finds the command an envelope addresses.
    pub fn find(&self, envelope: &CommandEnvelope) -> Option<&CommandDefinition> {
        self.commands.iter().find(|def| matches(def, envelope))
    }

    pub fn iter(&self) -> impl Iterator<Item = &CommandDefinition> {
        self.commands.iter()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

/// Folds `group` into `groups`, merging sub-groups by name into the first
/// group seen with the same top-level name.
pub fn merge_group(groups: &mut Vec<FlatGroup>, group: FlatGroup) {
    let Some(existing) = groups.iter_mut().find(|g| g.name == group.name) else {
        groups.push(group);
        return;
    };
    for sub in group.sub_groups {
        if !existing.sub_groups.iter().any(|s| s.name == sub.name) {
            existing.sub_groups.push(sub);
        }
    }
}

fn matches(def: &CommandDefinition, envelope: &CommandEnvelope) -> bool {
    if def.name() != envelope.name || def.kind() != envelope.kind {
        return false;
    }

    let parent = envelope.parent_name.as_deref();
    match envelope.parent_parent_name.as_deref() {
        Some(parent_parent) => def.group().is_some_and(|g| {
            Some(g.name()) == parent && g.parent().is_some_and(|p| p.name() == parent_parent)
        }),
        None => match parent {
            Some(parent) => def
                .group()
                .is_some_and(|g| g.parent().is_none() && g.name() == parent),
            None => def.group().is_none(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::{Command, Group};
    use crate::interaction::CommandInteraction;
    use switchboard_core::{CommandArgs, CommandKind, OptionSpec};

    async fn noop(_ctx: CommandInteraction, _args: CommandArgs) {}

    fn envelope(name: &str) -> CommandEnvelope {
        CommandEnvelope::new("1", "tok", "c1", name)
    }

    fn registry() -> CommandRegistry {
        let moderation = Group::new("mod", "Moderation");
        let hard = moderation.sub_group("hard", "Hard").unwrap();

        let mut registry = CommandRegistry::new();
        registry
            .register(Command::chat("ban", "Top-level ban").build(noop).unwrap())
            .unwrap();
        registry
            .register(
                Command::chat("ban", "Grouped ban")
                    .group(&moderation)
                    .build(noop)
                    .unwrap(),
            )
            .unwrap();
        registry
            .register(Command::chat("kick", "Kick").group(&hard).build(noop).unwrap())
            .unwrap();
        registry
    }

    #[test]
    fn test_top_level_match() {
        let registry = registry();
        let def = registry.find(&envelope("ban")).unwrap();
        assert_eq!(def.description(), "Top-level ban");
    }

    #[test]
    fn test_group_match() {
        let registry = registry();
        let def = registry.find(&envelope("ban").with_parent("mod")).unwrap();
        assert_eq!(def.description(), "Grouped ban");

        assert!(registry.find(&envelope("ban").with_parent("admin")).is_none());
    }

    #[test]
    fn test_sub_group_match() {
        let registry = registry();

        let env = envelope("kick").with_parent("hard").with_parent_parent("mod");
        assert_eq!(registry.find(&env).unwrap().path(), "mod hard kick");

        // The sub-group alone is not a top-level group.
        assert!(registry.find(&envelope("kick").with_parent("hard")).is_none());
        assert!(registry.find(&envelope("kick")).is_none());
        assert!(
            registry
                .find(&envelope("kick").with_parent("hard").with_parent_parent("admin"))
                .is_none()
        );
    }

    #[test]
    fn test_kind_must_match() {
        let mut registry = CommandRegistry::new();
        registry
            .register(Command::user("info").build(noop).unwrap())
            .unwrap();

        assert!(registry.find(&envelope("info")).is_none());
        let env = envelope("info").with_target(CommandKind::User, "u1");
        assert_eq!(registry.find(&env).unwrap().kind(), CommandKind::User);
    }

    #[test]
    fn test_duplicate_rejected() {
        let mut registry = registry();
        let err = registry
            .register(Command::chat("ban", "Again").build(noop).unwrap())
            .unwrap_err();
        assert_eq!(err.path, "ban");
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn test_ungrouped_command_ignores_grouped_envelope() {
        let mut registry = CommandRegistry::new();
        registry
            .register(Command::chat("ban", "Ban").build(noop).unwrap())
            .unwrap();

        assert!(registry.find(&envelope("ban")).is_some());
        assert!(registry.find(&envelope("ban").with_parent("mod")).is_none());
    }

    #[test]
    fn test_compile_emits_shared_group_once() {
        let fun = Group::new("fun", "Fun stuff");
        let mut registry = CommandRegistry::new();
        for name in ["roll", "flip"] {
            registry
                .register(Command::chat(name, name).group(&fun).build(noop).unwrap())
                .unwrap();
        }

        let (commands, groups) = registry.compile();
        assert_eq!(commands.len(), 2);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].name, "fun");
        assert!(groups[0].sub_groups.is_empty());
    }

    #[test]
    fn test_compile_merges_groups() {
        let a = Group::new("a", "Group A");
        let b = a.sub_group("b", "Sub B").unwrap();

        let mut registry = CommandRegistry::new();
        registry
            .register(Command::chat("x", "X").group(&a).build(noop).unwrap())
            .unwrap();
        registry
            .register(
                Command::chat("y", "Y")
                    .group(&b)
                    .option("n", OptionSpec::integer("N"))
                    .build(noop)
                    .unwrap(),
            )
            .unwrap();
        registry
            .register(Command::chat("z", "Z").build(noop).unwrap())
            .unwrap();

        let (commands, groups) = registry.compile();
        assert_eq!(commands.len(), 3);
        assert_eq!(commands[1].group.as_deref(), Some("a"));
        assert_eq!(commands[1].sub_group.as_deref(), Some("b"));
        assert_eq!(commands[1].options.len(), 1);
        assert_eq!(commands[2].group, None);

        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].name, "a");
        assert_eq!(groups[0].sub_groups.len(), 1);
        assert_eq!(groups[0].sub_groups[0].name, "b");
    }

    #[test]
    fn test_compile_merges_sub_groups_of_same_named_groups() {
        let first = Group::new("mod", "Moderation");
        let second = Group::new("mod", "Moderation again");
        let hard = second.sub_group("hard", "Hard").unwrap();

        let mut registry = CommandRegistry::new();
        registry
            .register(Command::chat("ban", "Ban").group(&first).build(noop).unwrap())
            .unwrap();
        registry
            .register(Command::chat("kick", "Kick").group(&hard).build(noop).unwrap())
            .unwrap();

        let (commands, groups) = registry.compile();
        assert_eq!(commands[1].sub_group.as_deref(), Some("hard"));
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].description, "Moderation");
        let subs: Vec<_> = groups[0].sub_groups.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(subs, vec!["hard"]);
    }

    #[test]
    fn test_compile_skips_unused_sub_groups() {
        let moderation = Group::new("mod", "Moderation");
        let hard = moderation.sub_group("hard", "Hard").unwrap();
        let _soft = moderation.sub_group("soft", "Soft").unwrap();

        let mut registry = CommandRegistry::new();
        registry
            .register(Command::chat("kick", "Kick").group(&hard).build(noop).unwrap())
            .unwrap();
        registry
            .register(Command::chat("warn", "Warn").group(&moderation).build(noop).unwrap())
            .unwrap();

        let (_, groups) = registry.compile();
        assert_eq!(groups.len(), 1);
        let subs: Vec<_> = groups[0].sub_groups.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(subs, vec!["hard"]);
    }

    #[test]
    fn test_contains_uses_name_and_groups() {
        let moderation = Group::new("mod", "Moderation");
        let mut registry = CommandRegistry::new();
        registry
            .register(Command::chat("ban", "Ban").group(&moderation).build(noop).unwrap())
            .unwrap();

        let same = Command::chat("ban", "Other").group(&moderation).build(noop).unwrap();
        let top = Command::chat("ban", "Top").build(noop).unwrap();
        assert!(registry.contains(&same));
        assert!(!registry.contains(&top));
    }
}
