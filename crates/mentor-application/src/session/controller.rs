//! Conversation session controller.
//!
//! One controller drives one UI surface: it acquires the problem shown on the
//! page, binds to (or creates) that problem's record and runs user/assistant
//! exchanges against it.

use mentor_core::assistant::Assistant;
use mentor_core::config::RetryPolicy;
use mentor_core::conversation::{ConversationRecord, Turn};
use mentor_core::error::{MentorError, Result};
use mentor_core::problem::{ProblemIdentity, ProblemInfo};
use mentor_core::surface::SurfaceView;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::Mutex;

use super::state::SessionState;
use crate::conversation_store::ConversationStore;
use crate::extraction::ExtractionRetryDriver;
use crate::prompt::PromptRenderer;

/// Prefix of the assistant turn synthesized for a failed exchange.
pub const ERROR_TURN_PREFIX: &str = "Error: ";

/// Sync handle that tears the surface down from outside the controller.
#[derive(Clone)]
pub struct CloseHandle {
    closed: Arc<AtomicBool>,
}

impl CloseHandle {
    pub fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

struct SessionInner {
    state: SessionState,
    identity: Option<ProblemIdentity>,
    record: Option<ConversationRecord>,
    displayed: Option<ProblemInfo>,
}

/// Per-surface controller.
///
/// State flow: `Uninitialized -> Acquiring -> Ready <-> Exchanging`, and
/// `Closed` from anywhere. The internal lock is never held across the
/// assistant call, so state can be inspected (and the surface closed) while a
/// reply is outstanding.
pub struct SessionController {
    store: Arc<ConversationStore>,
    driver: ExtractionRetryDriver,
    assistant: Arc<dyn Assistant>,
    view: Arc<dyn SurfaceView>,
    prompts: PromptRenderer,
    policy: RetryPolicy,
    inner: Mutex<SessionInner>,
    closed: Arc<AtomicBool>,
}

impl SessionController {
    pub fn new(
        store: Arc<ConversationStore>,
        driver: ExtractionRetryDriver,
        assistant: Arc<dyn Assistant>,
        view: Arc<dyn SurfaceView>,
    ) -> Self {
        Self {
            store,
            driver,
            assistant,
            view,
            prompts: PromptRenderer::default(),
            policy: RetryPolicy::default(),
            inner: Mutex::new(SessionInner {
                state: SessionState::Uninitialized,
                identity: None,
                record: None,
                displayed: None,
            }),
            closed: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn with_prompts(mut self, prompts: PromptRenderer) -> Self {
        self.prompts = prompts;
        self
    }

    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn close_handle(&self) -> CloseHandle {
        CloseHandle {
            closed: self.closed.clone(),
        }
    }

    pub async fn state(&self) -> SessionState {
        if self.is_closed() {
            return SessionState::Closed;
        }
        self.inner.lock().await.state
    }

    /// Canonical key of the bound record.
    pub async fn identity(&self) -> Option<ProblemIdentity> {
        self.inner.lock().await.identity.clone()
    }

    /// Problem info currently shown in the header.
    ///
    /// For an existing record this is the freshly acquired info; the record's
    /// own `problem_info` keeps what was captured when it was created.
    pub async fn displayed_problem(&self) -> Option<ProblemInfo> {
        self.inner.lock().await.displayed.clone()
    }

    /// Copy of the bound record.
    pub async fn record(&self) -> Option<ConversationRecord> {
        self.inner.lock().await.record.clone()
    }

    /// Acquires the active problem and binds the surface to its record.
    ///
    /// # Errors
    ///
    /// Returns the extraction hard failures (see
    /// [`MentorError::is_page_unavailable`]); the controller then stays
    /// `Uninitialized` and may be started again.
    pub async fn start(&self) -> Result<()> {
        self.begin_acquiring(&[SessionState::Uninitialized]).await?;
        self.acquire_and_bind().await
    }

    /// Re-runs acquisition after the visible problem changed.
    ///
    /// Rejected while an exchange or another acquisition is in flight.
    pub async fn reacquire(&self) -> Result<()> {
        self.begin_acquiring(&[SessionState::Uninitialized, SessionState::Ready])
            .await?;
        tracing::info!("[SessionController] Re-acquiring problem");
        self.acquire_and_bind().await
    }

    /// Runs one exchange: appends the user turn, asks the assistant and
    /// appends its reply (or one synthesized error turn).
    ///
    /// Blank input is ignored and returns `Ok(None)`.
    ///
    /// # Errors
    ///
    /// - `MentorError::InputRejected` unless the surface is `Ready`
    /// - `MentorError::SurfaceClosed` if the surface was torn down, including
    ///   while the assistant call was outstanding (the late reply is dropped)
    pub async fn send_message(&self, text: &str) -> Result<Option<Turn>> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(None);
        }

        let (identity, transcript) = {
            let mut inner = self.inner.lock().await;
            self.ensure_open(&mut inner)?;
            if !inner.state.accepts_input() {
                return Err(MentorError::InputRejected {
                    state: inner.state.to_string(),
                });
            }

            let (Some(identity), Some(record)) = (inner.identity.clone(), inner.record.as_mut())
            else {
                return Err(MentorError::internal("Ready session without a bound record"));
            };

            let user_turn = Turn::user(text);
            record.append(user_turn.clone());
            let transcript = record.turns().to_vec();
            let snapshot = record.clone();

            inner.state = SessionState::Exchanging;
            self.view.show_turn(&user_turn);
            self.view.set_input_enabled(false);
            self.persist(&identity, snapshot).await;

            (identity, transcript)
        };

        tracing::debug!(
            "[SessionController] Asking assistant: key={}, turns={}",
            identity,
            transcript.len()
        );
        let reply = match self.assistant.ask(&transcript).await {
            Ok(content) => Turn::assistant(content),
            Err(e) => {
                let category = e.category();
                tracing::warn!(
                    "[SessionController] Assistant call failed ({:?}): {}",
                    category,
                    e
                );
                Turn::assistant(format!("{}{}", ERROR_TURN_PREFIX, category.user_message()))
            }
        };

        let mut inner = self.inner.lock().await;
        if self.is_closed() {
            tracing::debug!(
                "[SessionController] Surface closed during exchange, discarding reply for {}",
                identity
            );
            inner.state = SessionState::Closed;
            return Err(MentorError::SurfaceClosed);
        }

        let Some(record) = inner.record.as_mut() else {
            return Err(MentorError::internal("Exchange finished without a bound record"));
        };
        record.append(reply.clone());
        let snapshot = record.clone();

        self.persist(&identity, snapshot).await;
        self.view.show_turn(&reply);
        inner.state = SessionState::Ready;
        self.view.set_input_enabled(true);

        Ok(Some(reply))
    }

    /// Tears the surface down. Later calls are rejected with
    /// `MentorError::SurfaceClosed`.
    pub async fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
        let mut inner = self.inner.lock().await;
        inner.state = SessionState::Closed;
        tracing::debug!("[SessionController] Surface closed");
    }

    fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    fn ensure_open(&self, inner: &mut SessionInner) -> Result<()> {
        if self.is_closed() || inner.state == SessionState::Closed {
            inner.state = SessionState::Closed;
            return Err(MentorError::SurfaceClosed);
        }
        Ok(())
    }

    async fn begin_acquiring(&self, allowed: &[SessionState]) -> Result<()> {
        let mut inner = self.inner.lock().await;
        self.ensure_open(&mut inner)?;
        if !allowed.contains(&inner.state) {
            return Err(MentorError::InputRejected {
                state: inner.state.to_string(),
            });
        }
        inner.state = SessionState::Acquiring;
        self.view.set_input_enabled(false);
        Ok(())
    }

    async fn acquire_and_bind(&self) -> Result<()> {
        let acquired = self.driver.acquire(&self.policy).await;

        let mut inner = self.inner.lock().await;
        self.ensure_open(&mut inner)?;

        let info = match acquired {
            Ok(info) => info,
            Err(e) => {
                tracing::warn!("[SessionController] Could not acquire problem: {}", e);
                let (title, message) = page_error_notice(&e);
                inner.state = SessionState::Uninitialized;
                self.view.show_error(title, message);
                return Err(e);
            }
        };

        let identity = info.identity();
        let bound = match self.store.get(&identity).await {
            Some(record) => self.restore(&identity, record).await,
            None => self.seed(&identity, &info).await,
        };
        let record = match bound {
            Ok(record) => record,
            Err(e) => {
                tracing::error!(
                    "[SessionController] Could not open conversation for {}: {}",
                    identity,
                    e
                );
                inner.state = SessionState::Uninitialized;
                self.view.show_error("Could not open conversation", "Please try again.");
                return Err(e);
            }
        };

        tracing::info!(
            "[SessionController] Bound to '{}' (key={}, turns={})",
            info.title,
            identity,
            record.len()
        );

        self.view.clear_transcript();
        self.view.show_problem(&info);
        for turn in record.visible_turns() {
            self.view.show_turn(turn);
        }

        inner.identity = Some(identity);
        inner.record = Some(record);
        inner.displayed = Some(info);
        inner.state = SessionState::Ready;
        self.view.set_input_enabled(true);
        Ok(())
    }

    async fn seed(&self, identity: &ProblemIdentity, info: &ProblemInfo) -> Result<ConversationRecord> {
        let record = ConversationRecord::seeded(
            info.clone(),
            self.prompts.system_prompt(info)?,
            self.prompts.welcome(info)?,
        );
        tracing::debug!("[SessionController] Seeded new conversation for {}", identity);
        self.persist(identity, record.clone()).await;
        Ok(record)
    }

    /// Records holding nothing but the system turn get their welcome turn
    /// back before replay.
    async fn restore(
        &self,
        identity: &ProblemIdentity,
        mut record: ConversationRecord,
    ) -> Result<ConversationRecord> {
        if record.len() == 1 && record.system_turn().is_some() {
            let welcome = self.prompts.welcome(&record.problem_info)?;
            record.append(Turn::assistant(welcome));
            tracing::debug!("[SessionController] Added missing welcome turn for {}", identity);
            self.persist(identity, record.clone()).await;
        }
        Ok(record)
    }

    async fn persist(&self, identity: &ProblemIdentity, record: ConversationRecord) {
        if let Err(e) = self.store.put(identity.clone(), record).await {
            tracing::error!(
                "[SessionController] Keeping unsaved changes for {} in memory: {}",
                identity,
                e
            );
        }
    }
}

fn page_error_notice(error: &MentorError) -> (&'static str, &'static str) {
    match error {
        MentorError::NoActivePage => ("No active page", "Open a problem page and try again."),
        MentorError::NotAProblemPage { .. } => (
            "Not a problem page",
            "Please navigate to a problem page first.",
        ),
        MentorError::ExtractorUnreachable { .. } => (
            "Page not ready",
            "Could not read the problem page. Refresh the page and try again.",
        ),
        _ => ("Something went wrong", "Please try again."),
    }
}
