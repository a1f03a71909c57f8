// crates/pairing/src/invoker.rs
//! Opening external settings surfaces

use crate::attempt::SettingsTarget;
use std::process::{Child, Command, Stdio};
use std::sync::{Arc, Mutex};
use std::thread;

/// Asks the host to open a settings surface
///
/// Fire and forget: whether the surface actually appeared is unknowable here,
/// so nothing is returned.
pub trait SettingsInvoker: Send {
    fn invoke(&mut self, target: &SettingsTarget);
}

/// Hands the target URI to the operating system's opener
#[derive(Debug, Clone)]
pub struct CommandInvoker {
    program: Option<String>,
}

impl CommandInvoker {
    /// Uses the platform's default opener, if one is known
    pub fn system() -> Self {
        Self {
            program: default_opener().map(str::to_string),
        }
    }

    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: Some(program.into()),
        }
    }

    pub fn program(&self) -> Option<&str> {
        self.program.as_deref()
    }
}

impl Default for CommandInvoker {
    fn default() -> Self {
        Self::system()
    }
}

impl SettingsInvoker for CommandInvoker {
    fn invoke(&mut self, target: &SettingsTarget) {
        let Some(program) = &self.program else {
            log::warn!("No opener available for {}", target);
            return;
        };

        log::info!("Opening {} with {}", target, program);
        let spawned = Command::new(program)
            .arg(target.uri())
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn();

        match spawned {
            Ok(child) => reap(child),
            Err(e) => log::warn!("Failed to open {}: {}", target, e),
        }
    }
}

/// Waits on the opener off the caller's thread so it never lingers as a zombie
fn reap(mut child: Child) {
    let spawned = thread::Builder::new()
        .name("opener-reaper".to_string())
        .spawn(move || match child.wait() {
            Ok(status) if !status.success() => log::debug!("Opener exited with {}", status),
            Ok(_) => {}
            Err(e) => log::warn!("Failed to wait on opener: {}", e),
        });

    if let Err(e) = spawned {
        log::warn!("Failed to start opener reaper: {}", e);
    }
}

fn default_opener() -> Option<&'static str> {
    if cfg!(target_os = "macos") || cfg!(target_os = "ios") {
        Some("open")
    } else if cfg!(target_os = "windows") {
        Some("explorer")
    } else if cfg!(unix) {
        Some("xdg-open")
    } else {
        None
    }
}

/// Records targets instead of opening them
#[derive(Debug, Clone, Default)]
pub struct RecordingInvoker {
    targets: Arc<Mutex<Vec<SettingsTarget>>>,
}

impl RecordingInvoker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything invoked so far, in order
    pub fn targets(&self) -> Vec<SettingsTarget> {
        self.targets.lock().map(|t| t.clone()).unwrap_or_default()
    }

    pub fn count(&self) -> usize {
        self.targets.lock().map(|t| t.len()).unwrap_or(0)
    }
}

impl SettingsInvoker for RecordingInvoker {
    fn invoke(&mut self, target: &SettingsTarget) {
        if let Ok(mut targets) = self.targets.lock() {
            targets.push(target.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_invoker_shares_log() {
        let invoker = RecordingInvoker::new();
        let mut handle = invoker.clone();

        handle.invoke(&SettingsTarget::new("a", "a://"));
        handle.invoke(&SettingsTarget::new("b", "b://"));

        assert_eq!(invoker.count(), 2);
        assert_eq!(invoker.targets()[1].uri(), "b://");
    }

    #[test]
    fn test_missing_program_does_not_panic() {
        let mut invoker = CommandInvoker::with_program("bluetune-no-such-opener");
        invoker.invoke(&SettingsTarget::new("a", "a://"));
    }

    #[cfg(target_os = "linux")]
    fn zombie_children() -> usize {
        let me = std::process::id().to_string();
        let Ok(entries) = std::fs::read_dir("/proc") else {
            return 0;
        };

        entries
            .flatten()
            .filter_map(|entry| std::fs::read_to_string(entry.path().join("stat")).ok())
            .filter(|stat| {
                // fields after the parenthesised command name: state, ppid, ...
                let Some(rest) = stat.rsplit_once(')').map(|(_, rest)| rest) else {
                    return false;
                };
                let mut fields = rest.split_whitespace();
                fields.next() == Some("Z") && fields.next() == Some(me.as_str())
            })
            .count()
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_finished_openers_are_reaped() {
        let mut invoker = CommandInvoker::with_program("true");
        for uri in ["a://", "b://", "c://"] {
            invoker.invoke(&SettingsTarget::new("target", uri));
        }

        let deadline = std::time::Instant::now() + std::time::Duration::from_secs(5);
        let mut remaining = zombie_children();
        while remaining > 0 && std::time::Instant::now() < deadline {
            thread::sleep(std::time::Duration::from_millis(50));
            remaining = zombie_children();
        }

        assert_eq!(remaining, 0);
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_system_opener_on_linux() {
        assert_eq!(CommandInvoker::system().program(), Some("xdg-open"));
    }
}
