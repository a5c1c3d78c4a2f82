//! In-process broadcast of "visible problem changed" events between surfaces.

use mentor_core::notify::ProblemChangeNotifier;
use tokio::sync::broadcast;

const DEFAULT_CAPACITY: usize = 16;

/// "Visible problem changed" event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProblemChanged {
    pub address: String,
}

/// In-process broadcast of problem changes between surfaces.
///
/// Subscribers typically react by calling `SessionController::reacquire`.
#[derive(Clone)]
pub struct ProblemChangeBus {
    sender: broadcast::Sender<ProblemChanged>,
}

impl ProblemChangeBus {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ProblemChanged> {
        self.sender.subscribe()
    }
}

impl Default for ProblemChangeBus {
    fn default() -> Self {
        Self::new()
    }
}

impl ProblemChangeNotifier for ProblemChangeBus {
    fn notify_problem_changed(&self, address: &str) {
        let event = ProblemChanged {
            address: address.to_string(),
        };
        match self.sender.send(event) {
            Ok(listeners) => {
                tracing::debug!(
                    "[ProblemChangeBus] Problem changed to {} ({} listener(s))",
                    address,
                    listeners
                );
            }
            Err(_) => {
                tracing::debug!("[ProblemChangeBus] No listener for problem change, ignoring");
            }
        }
    }
}
