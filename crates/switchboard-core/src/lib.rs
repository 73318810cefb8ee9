//! # Switchboard Core
//!
//! The foundation of the Switchboard interaction router.
//!
//! This crate holds everything that does not need an async runtime:
//!
//! - **Wire model**: entities, side tables, option declarations, inbound
//!   envelopes and outbound reply payloads ([`foundation`])
//! - **Option resolution**: joining raw option references against the side
//!   tables into typed values ([`resolve`])
//! - **Custom id codec**: the compact `0:<name>:<json>` component identifier
//!   format ([`custom_id`])
//! - **Platform traits**: the narrow contracts the transport layer implements
//!   ([`api`])
//!
//! Command matching, the interaction state machine and event dispatch live in
//! `switchboard-framework`.

pub mod api;
pub mod custom_id;
pub mod error;
pub mod foundation;
pub mod resolve;

pub use api::{BoxedCommandRegistrar, BoxedInteractionApi, CommandRegistrar, InteractionApi};
pub use custom_id::{CUSTOM_ID_BUDGET, CUSTOM_ID_LIMIT, CustomToken};
pub use error::{
    ApiError, ApiResult, DecodeError, EncodingError, InteractionError, InteractionResult,
    ProtocolViolation, ResolutionError,
};
pub use foundation::{
    Channel, ChannelType, CommandEnvelope, CommandKind, ComponentEnvelope, ComponentKind, DataMap,
    FlatCommand, FlatGroup, FlatSubGroup, InteractionCallback, InvokingMember, Member, Message,
    MessageFields, ModalFields, ModalSubmitEnvelope, ModalValue, NamedOption, OptionChoice,
    OptionKind, OptionMap, OptionSpec, RawOption, Role, TAG_COMMAND, TAG_COMPONENT,
    TAG_MODAL_SUBMIT, TextInput, TextInputStyle, User,
};
pub use resolve::{
    CommandArgs, CommandTarget, ResolvedUser, TypedOptionValue, resolve, resolve_args,
    resolve_target,
};
