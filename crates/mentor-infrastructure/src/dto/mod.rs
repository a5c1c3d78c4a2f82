//! Data Transfer Objects (DTOs) for persistence.
//!
//! These DTOs represent the versioned schema of the files on disk. They are
//! private to the infrastructure layer and isolate the domain model from the
//! evolution of the storage format.
//!
//! ### Conversation Document Version History
//! - **0 (legacy)**: single slot `{lastProblemUrl, lastConversation, lastProblemDetails}`
//! - **1.0.0**: `schema_version` + mapping of problem identity to record

mod conversation;
mod secret;

pub use conversation::{
    CURRENT_SCHEMA_VERSION, ConversationDocumentV1, ConversationRecordV1, LegacyProblemDetailsV0,
    LegacySlotV0, ProblemInfoV1, StoredConversations, TurnV1,
};
pub use secret::SecretFileV1;
