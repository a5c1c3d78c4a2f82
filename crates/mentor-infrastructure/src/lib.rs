pub mod config_service;
pub mod credential_storage;
pub mod dto;
pub mod json_conversation_repository;
pub mod paths;
pub mod storage;

pub use crate::config_service::ConfigService;
pub use crate::credential_storage::FileCredentialStore;
pub use crate::json_conversation_repository::JsonConversationRepository;
pub use crate::paths::MentorPaths;
