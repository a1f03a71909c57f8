// crates/pairing/src/lib.rs
//! Pairing attempt sequencing for BlueTune
//!
//! BlueTune cannot pair devices itself. It opens the host's Bluetooth
//! settings through platform-specific shortcuts and then waits for the user
//! to say whether pairing worked. This crate provides:
//! - Per-platform attempt plans ([`PairingStrategy`])
//! - The attempt sequencer ([`PairingSequencer`])
//! - Host hooks for opening settings and probing focus
//! - Generation tokens for invalidating stale timers
//!
//! # Example
//!
//! ```rust
//! use bluetune_core::Platform;
//! use bluetune_pairing::{
//!     strategy_for, FixedFocus, Generation, PairingSequencer, PairingStrategy, RecordingInvoker,
//! };
//!
//! let strategy = strategy_for(Platform::Ios);
//! let mut invoker = RecordingInvoker::new();
//! let mut sequencer = PairingSequencer::new(strategy.plan(), Generation::new(1));
//!
//! let first = sequencer.start(&mut invoker);
//! assert!(first.is_some());
//! let next = sequencer.on_attempt_expired(0, &FixedFocus::lost(), &mut invoker);
//! assert!(sequencer.is_finished());
//! # let _ = next;
//! ```

mod attempt;
mod error;
mod focus;
mod generation;
mod invoker;
mod sequencer;
mod strategy;

pub use attempt::{ManualInstructions, PairingAttempt, PairingAttemptPlan, SettingsTarget};
pub use error::{PairingError, PairingResult};
pub use focus::{FixedFocus, FocusProbe, ScriptedFocus};
pub use generation::{Generation, GenerationCounter};
pub use invoker::{CommandInvoker, RecordingInvoker, SettingsInvoker};
pub use sequencer::{PairingSequencer, SequencerStep};
pub use strategy::{
    strategy_for, strategy_with_attempts, AndroidStrategy, IosStrategy, ManualStrategy,
    PairingStrategy, DEFAULT_ATTEMPT_TIMEOUT,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_exports_accessible() {
        let _: GenerationCounter = GenerationCounter::new();
        let _: RecordingInvoker = RecordingInvoker::new();
        let _: CommandInvoker = CommandInvoker::system();
        let _: FixedFocus = FixedFocus::held();
        let _: AndroidStrategy = AndroidStrategy::default();
        let _: IosStrategy = IosStrategy::default();
        let _: ManualStrategy = ManualStrategy::default();
    }
}
