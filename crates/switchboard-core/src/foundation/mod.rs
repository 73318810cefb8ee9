//! Foundation layer - wire model shared by every other layer.
//!
//! This module contains the data exchanged with the platform:
//! - Entities and per-interaction side tables
//! - Command option declarations
//! - Inbound interaction envelopes
//! - Outbound reply payloads and the registration payload

pub mod envelope;
pub mod message;
pub mod model;
pub mod option;
pub mod registration;

pub use envelope::{
    CommandEnvelope, CommandKind, ComponentEnvelope, ComponentKind, ModalSubmitEnvelope,
    ModalValue, RawOption, TAG_COMMAND, TAG_COMPONENT, TAG_MODAL_SUBMIT,
};
pub use message::{InteractionCallback, MessageFields, ModalFields, TextInput, TextInputStyle};
pub use model::{Channel, ChannelType, DataMap, InvokingMember, Member, Message, Role, User};
pub use option::{NamedOption, OptionChoice, OptionKind, OptionMap, OptionSpec};
pub use registration::{FlatCommand, FlatGroup, FlatSubGroup};
