//! Hand-written collaborator mocks shared by the unit tests.

use async_trait::async_trait;
use mentor_core::assistant::{Assistant, AssistantError};
use mentor_core::conversation::{ConversationMap, ConversationRepository, Turn};
use mentor_core::error::{MentorError, Result};
use mentor_core::problem::{ExtractionError, ExtractionPayload, ProblemExtractor, ProblemInfo};
use mentor_core::surface::SurfaceView;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::Notify;

use crate::extraction::Delay;

pub struct MockConversationRepository {
    stored: Mutex<Option<ConversationMap>>,
    fail_load: bool,
    fail_saves: AtomicBool,
    saves: AtomicUsize,
}

impl MockConversationRepository {
    pub fn new() -> Self {
        Self {
            stored: Mutex::new(None),
            fail_load: false,
            fail_saves: AtomicBool::new(false),
            saves: AtomicUsize::new(0),
        }
    }

    pub fn failing_load() -> Self {
        Self {
            fail_load: true,
            ..Self::new()
        }
    }

    pub fn seed(&self, map: ConversationMap) {
        *self.stored.lock().unwrap() = Some(map);
    }

    pub fn stored(&self) -> Option<ConversationMap> {
        self.stored.lock().unwrap().clone()
    }

    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    pub fn set_fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl ConversationRepository for MockConversationRepository {
    async fn load(&self) -> Result<Option<ConversationMap>> {
        if self.fail_load {
            return Err(MentorError::Serialization {
                format: "JSON".to_string(),
                message: "corrupt".to_string(),
            });
        }
        Ok(self.stored.lock().unwrap().clone())
    }

    async fn save(&self, map: &ConversationMap) -> Result<()> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(MentorError::Io {
                message: "disk full".into(),
            });
        }
        self.saves.fetch_add(1, Ordering::SeqCst);
        *self.stored.lock().unwrap() = Some(map.clone());
        Ok(())
    }
}

/// Extractor that replays a scripted sequence of attempt outcomes.
pub struct ScriptedExtractor {
    address: std::result::Result<String, ExtractionError>,
    attempts: Mutex<VecDeque<std::result::Result<Option<ExtractionPayload>, ExtractionError>>>,
    calls: AtomicUsize,
}

impl ScriptedExtractor {
    pub fn new(
        address: &str,
        attempts: Vec<std::result::Result<Option<ExtractionPayload>, ExtractionError>>,
    ) -> Self {
        Self {
            address: Ok(address.to_string()),
            attempts: Mutex::new(attempts.into()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn without_page() -> Self {
        Self {
            address: Err(ExtractionError::NoActivePage),
            attempts: Mutex::new(VecDeque::new()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ProblemExtractor for ScriptedExtractor {
    async fn active_address(&self) -> std::result::Result<String, ExtractionError> {
        self.address.clone()
    }

    async fn try_extract(&self) -> std::result::Result<Option<ExtractionPayload>, ExtractionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.attempts.lock().unwrap().pop_front().unwrap_or(Ok(None))
    }
}

pub fn payload(title: &str, difficulty: &str, url: &str) -> ExtractionPayload {
    ExtractionPayload {
        title: title.to_string(),
        difficulty: difficulty.to_string(),
        description: format!("Description of {title}"),
        url: url.to_string(),
        ..ExtractionPayload::default()
    }
}

/// Delay that records the requested waits instead of sleeping.
#[derive(Default)]
pub struct RecordingDelay {
    waits: Mutex<Vec<Duration>>,
}

impl RecordingDelay {
    pub fn waits(&self) -> Vec<Duration> {
        self.waits.lock().unwrap().clone()
    }
}

#[async_trait]
impl Delay for RecordingDelay {
    async fn wait(&self, duration: Duration) {
        self.waits.lock().unwrap().push(duration);
    }
}

/// Assistant returning scripted replies, optionally parked until released.
pub struct MockAssistant {
    replies: Mutex<VecDeque<std::result::Result<String, AssistantError>>>,
    received: Mutex<Vec<Vec<Turn>>>,
    gated: bool,
    pub called: Notify,
    pub release: Notify,
}

impl MockAssistant {
    pub fn new(replies: Vec<std::result::Result<String, AssistantError>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            received: Mutex::new(Vec::new()),
            gated: false,
            called: Notify::new(),
            release: Notify::new(),
        }
    }

    /// Every call waits for `release` before answering.
    pub fn gated(replies: Vec<std::result::Result<String, AssistantError>>) -> Self {
        Self {
            gated: true,
            ..Self::new(replies)
        }
    }

    pub fn received(&self) -> Vec<Vec<Turn>> {
        self.received.lock().unwrap().clone()
    }
}

#[async_trait]
impl Assistant for MockAssistant {
    async fn ask(&self, turns: &[Turn]) -> std::result::Result<String, AssistantError> {
        self.received.lock().unwrap().push(turns.to_vec());
        if self.gated {
            self.called.notify_one();
            self.release.notified().await;
        }
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(AssistantError::EmptyResponse))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ViewEvent {
    Problem(String),
    Turn(Turn),
    Cleared,
    Input(bool),
    Error(String),
}

#[derive(Default)]
pub struct RecordingView {
    events: Mutex<Vec<ViewEvent>>,
}

impl RecordingView {
    pub fn events(&self) -> Vec<ViewEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn shown_turns(&self) -> Vec<Turn> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                ViewEvent::Turn(turn) => Some(turn),
                _ => None,
            })
            .collect()
    }

    pub fn input_enabled(&self) -> Option<bool> {
        self.events().into_iter().rev().find_map(|event| match event {
            ViewEvent::Input(enabled) => Some(enabled),
            _ => None,
        })
    }
}

impl SurfaceView for RecordingView {
    fn show_problem(&self, info: &ProblemInfo) {
        self.events
            .lock()
            .unwrap()
            .push(ViewEvent::Problem(info.title.clone()));
    }

    fn show_turn(&self, turn: &Turn) {
        self.events.lock().unwrap().push(ViewEvent::Turn(turn.clone()));
    }

    fn clear_transcript(&self) {
        self.events.lock().unwrap().push(ViewEvent::Cleared);
    }

    fn set_input_enabled(&self, enabled: bool) {
        self.events.lock().unwrap().push(ViewEvent::Input(enabled));
    }

    fn show_error(&self, title: &str, _message: &str) {
        self.events
            .lock()
            .unwrap()
            .push(ViewEvent::Error(title.to_string()));
    }
}
