//! Conversation domain module.
//!
//! # Module Structure
//!
//! - `message`: transcript turn types (`TurnRole`, `Turn`)
//! - `model`: per-problem transcript (`ConversationRecord`) and the full mapping
//! - `repository`: whole-mapping persistence trait

mod message;
mod model;
mod repository;

pub use message::{Turn, TurnRole};
pub use model::{ConversationMap, ConversationRecord};
pub use repository::ConversationRepository;
