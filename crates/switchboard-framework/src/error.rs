//! Error types for the Switchboard framework.
//!
//! These are all setup-time errors: they surface while commands, groups and
//! component handlers are being registered, before any event is dispatched.

use thiserror::Error;

/// A command with the same `(name, group, parent group)` path is already
/// registered.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("command '{path}' is already registered")]
pub struct DuplicateCommandError {
    /// Space-separated command path, e.g. `mod hard kick`.
    pub path: String,
}

/// Errors raised while building command groups.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GroupError {
    /// Sub-groups cannot have sub-groups of their own.
    #[error("cannot create sub-group '{name}' inside sub-group '{parent}'")]
    NestedTooDeep {
        /// Requested sub-group name.
        name: String,
        /// The sub-group it was requested on.
        parent: String,
    },

    /// The parent already has a sub-group with this name.
    #[error("group '{parent}' already has a sub-group named '{name}'")]
    DuplicateSubGroup {
        /// Requested sub-group name.
        name: String,
        /// Parent group name.
        parent: String,
    },
}

/// Errors raised by the command builder.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandBuildError {
    /// Two options share a name.
    #[error("command '{command}' declares option '{option}' twice")]
    DuplicateOption {
        /// Command name.
        command: String,
        /// Duplicated option name.
        option: String,
    },

    /// Context menu commands take no options.
    #[error("context command '{0}' cannot declare options")]
    OptionsOnContextCommand(String),

    /// Context menu commands cannot live in groups.
    #[error("context command '{0}' cannot be placed in a group")]
    GroupOnContextCommand(String),
}

/// Errors raised while registering routes on an interaction router.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouterError {
    /// A component handler with this name is already registered for the kind.
    #[error("a {kind} handler named '{name}' is already registered")]
    DuplicateComponentHandler {
        /// Handler kind (`button`, `select menu`, `modal`).
        kind: &'static str,
        /// Handler name.
        name: String,
    },

    /// Handler names end up inside custom ids and may not contain `:`.
    #[error("handler name '{0}' must not contain ':'")]
    InvalidHandlerName(String),

    /// Command registration failed.
    #[error(transparent)]
    DuplicateCommand(#[from] DuplicateCommandError),
}
