use crate::domain::ElapsedTimeTracker;

/// What the view should do with a back request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitDecision {
    Proceed,
    Prompt,
}

/// Blocks navigation away from an incident while its timer runs.
///
/// Armed state is read from the tracker on every request, never cached.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExitGuard {
    prompting: bool,
}

impl ExitGuard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_armed(tracker: &ElapsedTimeTracker) -> bool {
        tracker.running()
    }

    pub fn on_back(&mut self, tracker: &ElapsedTimeTracker) -> ExitDecision {
        if Self::is_armed(tracker) {
            self.prompting = true;
            ExitDecision::Prompt
        } else {
            ExitDecision::Proceed
        }
    }

    pub fn is_prompting(&self) -> bool {
        self.prompting
    }

    pub fn cancel(&mut self) {
        self.prompting = false;
    }

    /// Close the prompt. Returns false if no prompt was open.
    pub fn confirm(&mut self) -> bool {
        std::mem::replace(&mut self.prompting, false)
    }
}
