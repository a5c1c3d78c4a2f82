//! End-to-end session flow over the JSON file repository.

use async_trait::async_trait;
use mentor_application::{
    ConversationStore, ExtractionRetryDriver, ProblemChangeBus, SessionController, SessionState,
};
use mentor_core::assistant::{Assistant, AssistantError};
use mentor_core::config::RetryPolicy;
use mentor_core::conversation::{ConversationRepository, Turn, TurnRole};
use mentor_core::notify::ProblemChangeNotifier;
use mentor_core::problem::{
    ExtractionError, ExtractionPayload, ProblemExtractor, ProblemIdentity, ProblemInfo,
};
use mentor_core::surface::SurfaceView;
use mentor_infrastructure::{JsonConversationRepository, MentorPaths};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

struct PageExtractor {
    address: Mutex<String>,
}

impl PageExtractor {
    fn new(address: &str) -> Self {
        Self {
            address: Mutex::new(address.to_string()),
        }
    }

    fn navigate(&self, address: &str) {
        *self.address.lock().unwrap() = address.to_string();
    }
}

#[async_trait]
impl ProblemExtractor for PageExtractor {
    async fn active_address(&self) -> Result<String, ExtractionError> {
        Ok(self.address.lock().unwrap().clone())
    }

    async fn try_extract(&self) -> Result<Option<ExtractionPayload>, ExtractionError> {
        // The page never answers with real data, so the address fallback is used.
        Ok(None)
    }
}

struct EchoAssistant;

#[async_trait]
impl Assistant for EchoAssistant {
    async fn ask(&self, turns: &[Turn]) -> Result<String, AssistantError> {
        let last = turns.last().map(|t| t.content.clone()).unwrap_or_default();
        Ok(format!("You asked: {last}"))
    }
}

struct SilentView;

impl SurfaceView for SilentView {
    fn show_problem(&self, _info: &ProblemInfo) {}
    fn show_turn(&self, _turn: &Turn) {}
    fn clear_transcript(&self) {}
    fn set_input_enabled(&self, _enabled: bool) {}
    fn show_error(&self, _title: &str, _message: &str) {}
}

async fn open_surface(
    paths: &MentorPaths,
    extractor: Arc<PageExtractor>,
) -> (SessionController, Arc<ConversationStore>) {
    let repository = Arc::new(JsonConversationRepository::from_paths(paths));
    let store = Arc::new(ConversationStore::new(repository));
    store.load().await;
    store.reconcile_keys().await.unwrap();

    let controller = SessionController::new(
        store.clone(),
        ExtractionRetryDriver::new(extractor),
        Arc::new(EchoAssistant),
        Arc::new(SilentView),
    )
    .with_retry_policy(RetryPolicy::new(1, 0));
    (controller, store)
}

#[tokio::test]
async fn test_conversation_survives_surface_restart() {
    let temp_dir = TempDir::new().unwrap();
    let paths = MentorPaths::with_base(temp_dir.path());

    let extractor = Arc::new(PageExtractor::new(
        "https://leetcode.com/problems/two-sum/description/",
    ));
    let (first, _) = open_surface(&paths, extractor).await;
    first.start().await.unwrap();
    first.send_message("Where do I begin?").await.unwrap();
    first.close().await;

    // A second surface on a variant address lands on the same record.
    let extractor = Arc::new(PageExtractor::new(
        "https://leetcode.com/problems/two-sum/?envType=study-plan",
    ));
    let (second, _) = open_surface(&paths, extractor).await;
    second.start().await.unwrap();

    let record = second.record().await.unwrap();
    assert_eq!(record.len(), 4);
    assert_eq!(record.problem_info.title, "Two Sum");
    let roles: Vec<_> = record.turns().iter().map(|t| t.role).collect();
    assert_eq!(
        roles,
        vec![
            TurnRole::System,
            TurnRole::Assistant,
            TurnRole::User,
            TurnRole::Assistant
        ]
    );
    assert_eq!(record.turns()[3].content, "You asked: Where do I begin?");
}

#[tokio::test]
async fn test_reload_round_trip_is_stable() {
    let temp_dir = TempDir::new().unwrap();
    let paths = MentorPaths::with_base(temp_dir.path());

    let extractor = Arc::new(PageExtractor::new("https://leetcode.com/problems/valid-parentheses"));
    let (controller, _) = open_surface(&paths, extractor).await;
    controller.start().await.unwrap();
    controller.send_message("stack?").await.unwrap();

    let repository = JsonConversationRepository::from_paths(&paths);
    let first = repository.load().await.unwrap().unwrap();
    repository.save(&first).await.unwrap();
    let second = repository.load().await.unwrap().unwrap();
    repository.save(&second).await.unwrap();
    let third = repository.load().await.unwrap().unwrap();

    assert_eq!(first, second);
    assert_eq!(second, third);
}

#[tokio::test]
async fn test_problem_change_rebinds_surface() {
    let temp_dir = TempDir::new().unwrap();
    let paths = MentorPaths::with_base(temp_dir.path());

    let extractor = Arc::new(PageExtractor::new("https://leetcode.com/problems/two-sum"));
    let (controller, store) = open_surface(&paths, extractor.clone()).await;
    controller.start().await.unwrap();

    let bus = ProblemChangeBus::new();
    let mut changes = bus.subscribe();

    extractor.navigate("https://leetcode.com/problems/3sum/description/");
    bus.notify_problem_changed("https://leetcode.com/problems/3sum/description/");

    let event = changes.recv().await.unwrap();
    assert!(event.address.contains("3sum"));
    controller.reacquire().await.unwrap();

    assert_eq!(controller.state().await, SessionState::Ready);
    assert_eq!(
        controller.identity().await,
        Some(ProblemIdentity::from_stored("https://leetcode.com/problems/3sum"))
    );
    assert_eq!(store.snapshot().await.len(), 2);
}
