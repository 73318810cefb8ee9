//! Bulk command registration payload.
//!
//! The registry compiles its tree of commands and groups into these flat,
//! self-contained records: group membership is denormalized into plain names
//! so the payload carries no references.

use serde::{Deserialize, Serialize};

use crate::foundation::envelope::CommandKind;
use crate::foundation::option::NamedOption;

/// One command in the registration payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlatCommand {
    pub name: String,
    pub description: String,
    pub kind: CommandKind,
    /// Name of the top-level group, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    /// Name of the sub-group, if the command lives in one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_group: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<NamedOption>,
}

/// A sub-group inlined into its parent's [`FlatGroup`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlatSubGroup {
    pub name: String,
    pub description: String,
}

/// One top-level group in the registration payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlatGroup {
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub sub_groups: Vec<FlatSubGroup>,
}
