//! Cross-surface "visible problem changed" signal.

/// One-way notification from the page surface to any listening surface.
///
/// Sending is fire-and-forget: implementations return nothing, and a missing
/// listener is a normal outcome rather than an error.
pub trait ProblemChangeNotifier: Send + Sync {
    fn notify_problem_changed(&self, address: &str);
}
