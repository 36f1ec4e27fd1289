//! # Confirmation Port
//!
//! Commit logic never talks to a widget toolkit. Anywhere the register
//! needs a yes/no from the operator - "customer paid?", "abandon the
//! cart?", "remove all units of X?" - it asks through this port. The
//! desktop shell injects its modal-dialog implementation; tests inject a
//! scripted stub.

/// A yes/no question to the operator.
pub trait Confirm: Send + Sync {
    /// Presents `prompt` and returns the operator's answer.
    fn confirm(&self, prompt: &str) -> bool;
}

/// Answers yes to everything. Headless/batch use.
#[derive(Debug, Default)]
pub struct AlwaysConfirm;

impl Confirm for AlwaysConfirm {
    fn confirm(&self, _prompt: &str) -> bool {
        true
    }
}

/// Scripted answers for tests: pops the front of the queue per question,
/// answering `false` once the script runs out.
#[derive(Debug, Default)]
pub struct ScriptedConfirm {
    answers: std::sync::Mutex<std::collections::VecDeque<bool>>,
}

impl ScriptedConfirm {
    /// Builds a stub that will answer with `answers`, in order.
    pub fn with_answers(answers: impl IntoIterator<Item = bool>) -> Self {
        ScriptedConfirm {
            answers: std::sync::Mutex::new(answers.into_iter().collect()),
        }
    }
}

impl Confirm for ScriptedConfirm {
    fn confirm(&self, _prompt: &str) -> bool {
        self.answers
            .lock()
            .map(|mut queue| queue.pop_front())
            .unwrap_or(None)
            .unwrap_or(false)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
