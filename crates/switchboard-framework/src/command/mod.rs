//! Command definitions, groups and the registry that matches inbound
//! envelopes against them.
//!
//! # Example
//!
//! ```rust,ignore
//! let moderation = Group::new("mod", "Moderation");
//! let hard = moderation.sub_group("hard", "Destructive actions")?;
//!
//! let mut registry = CommandRegistry::new();
//! registry.register(Command::chat("kick", "Kick a member").group(&hard).build(kick)?)?;
//!
//! // `/mod hard kick` now resolves to the `kick` handler.
//! let (commands, groups) = registry.compile();
//! ```

mod definition;
mod group;
mod registry;

pub use definition::{Command, CommandDefinition};
pub use group::Group;
pub use registry::{merge_group, CommandRegistry};
