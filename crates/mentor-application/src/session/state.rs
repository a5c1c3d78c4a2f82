use std::fmt;

/// Lifecycle of one surface's session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Created, no problem bound yet (or the last acquisition failed).
    Uninitialized,
    /// Waiting on the extraction retry driver.
    Acquiring,
    /// Bound to a record and accepting input.
    Ready,
    /// A user turn is out to the assistant; input is rejected.
    Exchanging,
    /// Torn down. Terminal.
    Closed,
}

impl SessionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionState::Uninitialized => "uninitialized",
            SessionState::Acquiring => "acquiring",
            SessionState::Ready => "ready",
            SessionState::Exchanging => "exchanging",
            SessionState::Closed => "closed",
        }
    }

    pub fn accepts_input(&self) -> bool {
        matches!(self, SessionState::Ready)
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
