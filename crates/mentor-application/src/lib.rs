pub mod conversation_store;
pub mod credential;
pub mod extraction;
pub mod problem_change_bus;
pub mod prompt;
pub mod session;

#[cfg(test)]
mod test_support;

pub use conversation_store::{ConversationStore, KeyMerge, ReconcileReport, reconcile_mapping};
pub use credential::{CredentialService, CredentialSource};
pub use extraction::{Delay, ExtractionRetryDriver, TokioDelay};
pub use problem_change_bus::{ProblemChangeBus, ProblemChanged};
pub use prompt::PromptRenderer;
pub use session::{CloseHandle, SessionController, SessionState};
