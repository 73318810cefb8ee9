//! Command groups and sub-groups.
//!
//! Groups form at most two levels: a top-level group may hold sub-groups, and
//! a sub-group may not. A command placed in a sub-group is addressed on the
//! platform as `/<group> <sub-group> <command>`.
//!
//! # Example
//!
//! ```rust
//! use switchboard_framework::Group;
//!
//! let moderation = Group::new("mod", "Moderation");
//! let hard = moderation.sub_group("hard", "Destructive actions").unwrap();
//!
//! assert_eq!(hard.parent().map(Group::name), Some("mod"));
//! assert!(hard.sub_group("deeper", "nope").is_err());
//! ```

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use switchboard_core::FlatSubGroup;

use crate::error::GroupError;

/// A named command group, cheap to clone.
///
/// A sub-group keeps its parent alive; the parent only remembers the
/// sub-group's name and description, which is all registration needs.
#[derive(Clone)]
pub struct Group {
    inner: Arc<GroupInner>,
}

struct GroupInner {
    name: String,
    description: String,
    parent: Option<Group>,
    sub_groups: Mutex<Vec<FlatSubGroup>>,
}

impl Group {
    /// Creates a top-level group.
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self::with_parent(name.into(), description.into(), None)
    }

    fn with_parent(name: String, description: String, parent: Option<Group>) -> Self {
        Self {
            inner: Arc::new(GroupInner {
                name,
                description,
                parent,
                sub_groups: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Creates a sub-group of this group.
    ///
    /// # Errors
    ///
    /// Fails if this group is itself a sub-group, or already has a sub-group
    /// with the same name.
    pub fn sub_group(
        &self,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<Group, GroupError> {
        let name = name.into();
        let description = description.into();

        if self.inner.parent.is_some() {
            return Err(GroupError::NestedTooDeep {
                name,
                parent: self.inner.name.clone(),
            });
        }

        let mut subs = self.inner.sub_groups.lock();
        if subs.iter().any(|s| s.name == name) {
            return Err(GroupError::DuplicateSubGroup {
                name,
                parent: self.inner.name.clone(),
            });
        }
        subs.push(FlatSubGroup {
            name: name.clone(),
            description: description.clone(),
        });
        drop(subs);

        Ok(Self::with_parent(name, description, Some(self.clone())))
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    pub fn description(&self) -> &str {
        &self.inner.description
    }

    /// The parent group, for sub-groups.
    pub fn parent(&self) -> Option<&Group> {
        self.inner.parent.as_ref()
    }

    /// The top-level group: the parent for sub-groups, `self` otherwise.
    pub fn top_level(&self) -> &Group {
        self.inner.parent.as_ref().unwrap_or(self)
    }

    /// Snapshot of the sub-groups created so far, in creation order.
    pub fn sub_groups(&self) -> Vec<FlatSubGroup> {
        self.inner.sub_groups.lock().clone()
    }

    /// Space-separated path, e.g. `mod hard`.
    pub fn path(&self) -> String {
        match &self.inner.parent {
            Some(parent) => format!("{} {}", parent.name(), self.name()),
            None => self.name().to_string(),
        }
    }
}

impl fmt::Debug for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Group")
            .field("name", &self.inner.name)
            .field("parent", &self.inner.parent.as_ref().map(Group::name))
            .finish()
    }
}
