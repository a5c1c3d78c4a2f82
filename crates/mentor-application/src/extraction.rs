//! Bounded retry around the page-data extraction collaborator.

use async_trait::async_trait;
use mentor_core::config::RetryPolicy;
use mentor_core::error::{MentorError, Result};
use mentor_core::problem::{ExtractionError, ProblemExtractor, ProblemInfo, is_problem_address};
use std::sync::Arc;
use std::time::Duration;

/// Waits between extraction attempts.
#[async_trait]
pub trait Delay: Send + Sync {
    async fn wait(&self, duration: Duration);
}

/// Real delay backed by `tokio::time::sleep`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioDelay;

#[async_trait]
impl Delay for TokioDelay {
    async fn wait(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Drives extraction attempts until one yields usable info.
///
/// Soft failures (no payload, an error flag, a placeholder title) are retried
/// and finally replaced by info derived from the address. Hard failures are
/// limited to:
/// - no active page
/// - an active page outside the problem path
/// - a collaborator that never answered on any attempt
pub struct ExtractionRetryDriver {
    extractor: Arc<dyn ProblemExtractor>,
    delay: Arc<dyn Delay>,
}

impl ExtractionRetryDriver {
    pub fn new(extractor: Arc<dyn ProblemExtractor>) -> Self {
        Self::with_delay(extractor, Arc::new(TokioDelay))
    }

    pub fn with_delay(extractor: Arc<dyn ProblemExtractor>, delay: Arc<dyn Delay>) -> Self {
        Self { extractor, delay }
    }

    /// Acquires problem info for the active page.
    ///
    /// # Errors
    ///
    /// - `MentorError::NoActivePage` when the host reports no active page
    /// - `MentorError::NotAProblemPage` when the page is not a problem page
    /// - `MentorError::ExtractorUnreachable` when no attempt got an answer
    pub async fn acquire(&self, policy: &RetryPolicy) -> Result<ProblemInfo> {
        let address = match self.extractor.active_address().await {
            Ok(address) => address,
            Err(ExtractionError::NoActivePage) => return Err(MentorError::NoActivePage),
            Err(ExtractionError::Unreachable(reason)) => {
                tracing::warn!("[ExtractionRetryDriver] Could not query active page: {}", reason);
                return Err(MentorError::NoActivePage);
            }
        };

        if !is_problem_address(&address) {
            tracing::info!("[ExtractionRetryDriver] Not a problem page: {}", address);
            return Err(MentorError::NotAProblemPage { address });
        }

        let max_attempts = policy.max_attempts.max(1);
        let mut answered = false;
        let mut last_failure = String::new();

        for attempt in 1..=max_attempts {
            tracing::debug!(
                "[ExtractionRetryDriver] Attempt {}/{} for {}",
                attempt,
                max_attempts,
                address
            );

            match self.extractor.try_extract().await {
                Ok(Some(payload)) if !payload.is_failure() => {
                    let info = payload.into_problem_info(&address);
                    tracing::info!(
                        "[ExtractionRetryDriver] Extracted '{}' ({}) on attempt {}",
                        info.title,
                        info.difficulty,
                        attempt
                    );
                    return Ok(info);
                }
                Ok(Some(payload)) => {
                    answered = true;
                    last_failure = format!("placeholder payload '{}'", payload.title);
                }
                Ok(None) => {
                    answered = true;
                    last_failure = "empty payload".to_string();
                }
                Err(e) => {
                    last_failure = e.to_string();
                }
            }

            tracing::warn!(
                "[ExtractionRetryDriver] Attempt {} failed: {}",
                attempt,
                last_failure
            );

            if attempt < max_attempts {
                self.delay.wait(policy.delay_after(attempt)).await;
            }
        }

        if !answered {
            return Err(MentorError::ExtractorUnreachable {
                attempts: max_attempts,
                message: last_failure,
            });
        }

        tracing::info!(
            "[ExtractionRetryDriver] Falling back to address-derived info for {}",
            address
        );
        Ok(ProblemInfo::from_address(&address))
    }
}
