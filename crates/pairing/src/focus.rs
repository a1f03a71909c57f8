// crates/pairing/src/focus.rs
//! Input-focus probing

use std::collections::VecDeque;
use std::sync::Mutex;

/// Reports whether the host UI still holds input focus
///
/// This is a heuristic and it is unreliable. A settings screen that opened
/// usually steals focus, but so do notifications, permission dialogs and
/// the user switching windows. Some hosts open settings without taking focus
/// at all. The answer only decides whether to try the next attempt; it is
/// never evidence that a device is paired.
pub trait FocusProbe: Send {
    fn has_focus(&self) -> bool;
}

/// Always gives the same answer
#[derive(Debug, Clone, Copy)]
pub struct FixedFocus(bool);

impl FixedFocus {
    /// Focus never leaves the host, so every attempt counts as failed
    pub fn held() -> Self {
        Self(true)
    }

    /// Focus is always gone, so the first attempt counts as opened
    pub fn lost() -> Self {
        Self(false)
    }
}

impl FocusProbe for FixedFocus {
    fn has_focus(&self) -> bool {
        self.0
    }
}

/// Answers from a script, then repeats a fallback
#[derive(Debug)]
pub struct ScriptedFocus {
    answers: Mutex<VecDeque<bool>>,
    fallback: bool,
}

impl ScriptedFocus {
    pub fn new(answers: impl IntoIterator<Item = bool>, fallback: bool) -> Self {
        Self {
            answers: Mutex::new(answers.into_iter().collect()),
            fallback,
        }
    }

    /// Answers left before the fallback kicks in
    pub fn remaining(&self) -> usize {
        self.answers.lock().map(|a| a.len()).unwrap_or(0)
    }
}

impl FocusProbe for ScriptedFocus {
    fn has_focus(&self) -> bool {
        self.answers
            .lock()
            .ok()
            .and_then(|mut answers| answers.pop_front())
            .unwrap_or(self.fallback)
    }
}
