//! UI surface contract.
//!
//! Rendering, styling and markdown formatting are owned by each surface; the
//! session controller only pushes data through this trait.

use crate::conversation::Turn;
use crate::problem::ProblemInfo;

/// A UI surface hosting one conversation (page panel, popup, terminal).
pub trait SurfaceView: Send + Sync {
    /// Shows the header card for the current problem.
    fn show_problem(&self, info: &ProblemInfo);

    /// Renders one user or assistant turn at the bottom of the transcript.
    fn show_turn(&self, turn: &Turn);

    /// Clears the transcript area before a replay.
    fn clear_transcript(&self);

    /// Enables or disables the input box and send button.
    fn set_input_enabled(&self, enabled: bool);

    /// Shows a blocking notice (e.g. "navigate to a problem page first").
    fn show_error(&self, title: &str, message: &str);
}
