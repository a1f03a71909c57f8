// crates/pairing/src/strategy.rs
//! Per-platform pairing strategies
//!
//! Each platform gets one strategy, chosen once at startup. Nothing outside
//! this module branches on the platform.

use crate::attempt::{ManualInstructions, PairingAttempt, PairingAttemptPlan, SettingsTarget};
use crate::error::PairingResult;
use bluetune_core::Platform;
use std::time::Duration;

/// Default time each settings shortcut gets before it is judged
pub const DEFAULT_ATTEMPT_TIMEOUT: Duration = Duration::from_millis(1500);

/// Supplies the pairing plan for one platform
pub trait PairingStrategy: Send {
    fn platform(&self) -> Platform;

    /// A fresh plan for a new connection attempt
    fn plan(&self) -> PairingAttemptPlan;

    fn instructions(&self) -> ManualInstructions {
        self.plan().instructions().clone()
    }
}

/// Android intents for the Bluetooth settings screen
#[derive(Debug, Clone)]
pub struct AndroidStrategy {
    plan: PairingAttemptPlan,
}

impl AndroidStrategy {
    pub fn default_attempts() -> Vec<PairingAttempt> {
        vec![
            PairingAttempt::new(
                SettingsTarget::new(
                    "Bluetooth settings",
                    "intent:#Intent;action=android.settings.BLUETOOTH_SETTINGS;end",
                ),
                DEFAULT_ATTEMPT_TIMEOUT,
            ),
            PairingAttempt::new(
                SettingsTarget::new(
                    "Enable Bluetooth",
                    "intent:#Intent;action=android.bluetooth.adapter.action.REQUEST_ENABLE;end",
                ),
                DEFAULT_ATTEMPT_TIMEOUT,
            ),
        ]
    }

    /// Replaces the built-in attempts
    pub fn with_attempts(attempts: Vec<PairingAttempt>) -> PairingResult<Self> {
        let plan = PairingAttemptPlan::new(
            attempts,
            ManualInstructions::for_platform(Platform::Android),
        )?;
        Ok(Self { plan })
    }
}

impl Default for AndroidStrategy {
    fn default() -> Self {
        Self::with_attempts(Self::default_attempts()).unwrap_or_else(|_| Self {
            plan: PairingAttemptPlan::manual_only(ManualInstructions::for_platform(
                Platform::Android,
            )),
        })
    }
}

impl PairingStrategy for AndroidStrategy {
    fn platform(&self) -> Platform {
        Platform::Android
    }

    fn plan(&self) -> PairingAttemptPlan {
        self.plan.clone()
    }
}

/// iOS settings URL schemes, newest first
#[derive(Debug, Clone)]
pub struct IosStrategy {
    plan: PairingAttemptPlan,
}

impl IosStrategy {
    pub fn default_attempts() -> Vec<PairingAttempt> {
        ["App-Prefs:Bluetooth", "App-Prefs:root=Bluetooth", "prefs:root=Bluetooth"]
            .into_iter()
            .map(|uri| {
                PairingAttempt::new(
                    SettingsTarget::new("Bluetooth settings", uri),
                    DEFAULT_ATTEMPT_TIMEOUT,
                )
            })
            .collect()
    }

    pub fn with_attempts(attempts: Vec<PairingAttempt>) -> PairingResult<Self> {
        let plan =
            PairingAttemptPlan::new(attempts, ManualInstructions::for_platform(Platform::Ios))?;
        Ok(Self { plan })
    }
}

impl Default for IosStrategy {
    fn default() -> Self {
        Self::with_attempts(Self::default_attempts()).unwrap_or_else(|_| Self {
            plan: PairingAttemptPlan::manual_only(ManualInstructions::for_platform(Platform::Ios)),
        })
    }
}

impl PairingStrategy for IosStrategy {
    fn platform(&self) -> Platform {
        Platform::Ios
    }

    fn plan(&self) -> PairingAttemptPlan {
        self.plan.clone()
    }
}

/// No automated shortcuts, straight to instructions
#[derive(Debug, Clone)]
pub struct ManualStrategy {
    instructions: ManualInstructions,
}

impl ManualStrategy {
    pub fn new(instructions: ManualInstructions) -> Self {
        Self { instructions }
    }
}

impl Default for ManualStrategy {
    fn default() -> Self {
        Self::new(ManualInstructions::for_platform(Platform::Other))
    }
}

impl PairingStrategy for ManualStrategy {
    fn platform(&self) -> Platform {
        self.instructions.platform()
    }

    fn plan(&self) -> PairingAttemptPlan {
        PairingAttemptPlan::manual_only(self.instructions.clone())
    }

    fn instructions(&self) -> ManualInstructions {
        self.instructions.clone()
    }
}

/// Picks the built-in strategy for a platform
pub fn strategy_for(platform: Platform) -> Box<dyn PairingStrategy> {
    match platform {
        Platform::Android => Box::new(AndroidStrategy::default()),
        Platform::Ios => Box::new(IosStrategy::default()),
        Platform::Other => Box::new(ManualStrategy::default()),
    }
}

/// Picks a strategy, replacing the built-in attempts when some are given
///
/// Overrides are ignored for `Other`, which never runs automated attempts.
pub fn strategy_with_attempts(
    platform: Platform,
    attempts: Option<Vec<PairingAttempt>>,
) -> PairingResult<Box<dyn PairingStrategy>> {
    let Some(attempts) = attempts else {
        return Ok(strategy_for(platform));
    };

    Ok(match platform {
        Platform::Android => Box::new(AndroidStrategy::with_attempts(attempts)?),
        Platform::Ios => Box::new(IosStrategy::with_attempts(attempts)?),
        Platform::Other => Box::new(ManualStrategy::default()),
    })
}
