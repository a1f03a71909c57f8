// crates/pairing/src/sequencer.rs
//! Pairing attempt sequencing
//!
//! The sequencer is a plain step machine. It never sleeps; whoever drives it
//! schedules a timer for each `Invoke` step and reports the expiry back
//! through `on_attempt_expired`.

use crate::attempt::{PairingAttemptPlan, SettingsTarget};
use crate::focus::FocusProbe;
use crate::generation::Generation;
use crate::invoker::SettingsInvoker;
use std::time::Duration;

/// What the driver should do next
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SequencerStep {
    /// A settings surface was just invoked; call back after `timeout`
    Invoke {
        index: usize,
        total: usize,
        target: SettingsTarget,
        timeout: Duration,
    },
    /// Focus left the host when `attempt` expired, so the settings surface
    /// presumably took over
    AwaitConfirmation { attempt: usize },
    /// Automated attempts are exhausted or were never available
    ManualInstructions { text: String, attempts_made: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    Waiting { index: usize },
    AwaitingConfirmation,
    Manual,
}

/// Runs one pairing plan for one connection attempt
#[derive(Debug)]
pub struct PairingSequencer {
    plan: PairingAttemptPlan,
    generation: Generation,
    phase: Phase,
    attempts_made: usize,
}

impl PairingSequencer {
    pub fn new(plan: PairingAttemptPlan, generation: Generation) -> Self {
        Self {
            plan,
            generation,
            phase: Phase::Idle,
            attempts_made: 0,
        }
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn plan(&self) -> &PairingAttemptPlan {
        &self.plan
    }

    fn is_started(&self) -> bool {
        self.phase != Phase::Idle
    }

    /// True once sequencing ended and only user confirmation remains
    pub fn is_finished(&self) -> bool {
        matches!(self.phase, Phase::AwaitingConfirmation | Phase::Manual)
    }

    /// Invokes the first attempt, or goes straight to manual instructions
    ///
    /// Returns `None` if the sequencer was already started.
    pub fn start(&mut self, invoker: &mut dyn SettingsInvoker) -> Option<SequencerStep> {
        if self.is_started() {
            log::warn!("Pairing sequence {} already started", self.generation);
            return None;
        }

        log::info!(
            "Starting pairing sequence {} with {} attempt(s)",
            self.generation,
            self.plan.len()
        );
        Some(self.invoke_from(0, invoker))
    }

    /// Handles the timer of attempt `index` running out
    ///
    /// Returns `None` when `index` is not the attempt currently waited on,
    /// which makes late or duplicate callbacks harmless.
    pub fn on_attempt_expired(
        &mut self,
        index: usize,
        focus: &dyn FocusProbe,
        invoker: &mut dyn SettingsInvoker,
    ) -> Option<SequencerStep> {
        if self.phase != (Phase::Waiting { index }) {
            log::debug!(
                "Ignoring expiry of attempt {} in sequence {}",
                index,
                self.generation
            );
            return None;
        }

        if focus.has_focus() {
            log::info!("Attempt {} did not take focus, moving on", index + 1);
            Some(self.invoke_from(index + 1, invoker))
        } else {
            log::info!(
                "Focus lost after attempt {}, waiting for confirmation",
                index + 1
            );
            self.phase = Phase::AwaitingConfirmation;
            Some(SequencerStep::AwaitConfirmation { attempt: index })
        }
    }

    fn invoke_from(&mut self, index: usize, invoker: &mut dyn SettingsInvoker) -> SequencerStep {
        let Some(attempt) = self.plan.attempt(index).cloned() else {
            self.phase = Phase::Manual;
            log::info!(
                "Pairing sequence {} fell back to manual instructions",
                self.generation
            );
            return SequencerStep::ManualInstructions {
                text: self.plan.instructions().text().to_string(),
                attempts_made: self.attempts_made,
            };
        };

        log::info!(
            "Pairing attempt {}/{}: {}",
            index + 1,
            self.plan.len(),
            attempt.target
        );
        invoker.invoke(&attempt.target);
        self.attempts_made += 1;
        self.phase = Phase::Waiting { index };

        SequencerStep::Invoke {
            index,
            total: self.plan.len(),
            target: attempt.target,
            timeout: attempt.timeout,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attempt::{ManualInstructions, PairingAttempt};
    use crate::focus::{FixedFocus, ScriptedFocus};
    use crate::invoker::RecordingInvoker;
    use bluetune_core::Platform;

    fn plan(count: usize) -> PairingAttemptPlan {
        let attempts = (0..count)
            .map(|i| {
                PairingAttempt::new(
                    SettingsTarget::new(format!("Attempt {}", i), format!("test://{}", i)),
                    Duration::from_millis(100),
                )
            })
            .collect();
        PairingAttemptPlan::new(attempts, ManualInstructions::for_platform(Platform::Android))
            .unwrap()
    }

    #[test]
    fn test_start_invokes_first_attempt() {
        let mut invoker = RecordingInvoker::new();
        let mut sequencer = PairingSequencer::new(plan(2), Generation::new(1));

        let step = sequencer.start(&mut invoker).unwrap();
        assert!(matches!(step, SequencerStep::Invoke { index: 0, total: 2, .. }));
        assert_eq!(invoker.count(), 1);
        assert!(!sequencer.is_finished());
    }

    #[test]
    fn test_start_twice() {
        let mut invoker = RecordingInvoker::new();
        let mut sequencer = PairingSequencer::new(plan(2), Generation::new(1));
        sequencer.start(&mut invoker);
        assert!(sequencer.start(&mut invoker).is_none());
        assert_eq!(invoker.count(), 1);
    }

    #[test]
    fn test_empty_plan_goes_straight_to_manual() {
        let mut invoker = RecordingInvoker::new();
        let manual =
            PairingAttemptPlan::manual_only(ManualInstructions::for_platform(Platform::Other));
        let mut sequencer = PairingSequencer::new(manual, Generation::new(1));

        let step = sequencer.start(&mut invoker).unwrap();
        assert!(matches!(
            step,
            SequencerStep::ManualInstructions { attempts_made: 0, .. }
        ));
        assert_eq!(invoker.count(), 0);
        assert!(sequencer.is_finished());
    }

    #[test]
    fn test_focus_held_advances_through_all_attempts() {
        let mut invoker = RecordingInvoker::new();
        let focus = FixedFocus::held();
        let mut sequencer = PairingSequencer::new(plan(3), Generation::new(1));
        sequencer.start(&mut invoker);

        let step = sequencer.on_attempt_expired(0, &focus, &mut invoker).unwrap();
        assert!(matches!(step, SequencerStep::Invoke { index: 1, .. }));
        let step = sequencer.on_attempt_expired(1, &focus, &mut invoker).unwrap();
        assert!(matches!(step, SequencerStep::Invoke { index: 2, .. }));
        let step = sequencer.on_attempt_expired(2, &focus, &mut invoker).unwrap();
        assert!(matches!(
            step,
            SequencerStep::ManualInstructions { attempts_made: 3, .. }
        ));

        let uris: Vec<String> = invoker.targets().iter().map(|t| t.uri().to_string()).collect();
        assert_eq!(uris, vec!["test://0", "test://1", "test://2"]);
    }

    #[test]
    fn test_focus_lost_stops_advancing() {
        let mut invoker = RecordingInvoker::new();
        let focus = ScriptedFocus::new([true, false], true);
        let mut sequencer = PairingSequencer::new(plan(3), Generation::new(1));
        sequencer.start(&mut invoker);

        sequencer.on_attempt_expired(0, &focus, &mut invoker);
        let step = sequencer.on_attempt_expired(1, &focus, &mut invoker).unwrap();

        assert_eq!(step, SequencerStep::AwaitConfirmation { attempt: 1 });
        assert!(sequencer.is_finished());
        assert_eq!(invoker.count(), 2);
    }

    #[test]
    fn test_duplicate_expiry_ignored() {
        let mut invoker = RecordingInvoker::new();
        let focus = FixedFocus::held();
        let mut sequencer = PairingSequencer::new(plan(3), Generation::new(1));
        sequencer.start(&mut invoker);

        assert!(sequencer.on_attempt_expired(0, &focus, &mut invoker).is_some());
        assert!(sequencer.on_attempt_expired(0, &focus, &mut invoker).is_none());

        let step = sequencer.on_attempt_expired(1, &focus, &mut invoker);
        assert!(matches!(step, Some(SequencerStep::Invoke { index: 2, .. })));
    }

    #[test]
    fn test_expiry_before_start_ignored() {
        let mut invoker = RecordingInvoker::new();
        let mut sequencer = PairingSequencer::new(plan(1), Generation::new(1));
        assert!(sequencer
            .on_attempt_expired(0, &FixedFocus::held(), &mut invoker)
            .is_none());
    }
}
