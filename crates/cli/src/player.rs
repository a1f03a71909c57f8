// crates/cli/src/player.rs
//! Interactive play session

use crate::input::{parse_line, Input, Steps, HELP};
use crate::render::{track_list, ConsoleRenderer};
use anyhow::{Context, Result};
use bluetune_config::Config;
use bluetune_coordinator::{
    Command, CoordinatorOptions, PairingContext, PlaybackCoordinator, Session, SessionHandle,
    ViewState,
};
use bluetune_core::{Catalog, Platform, TrackId};
use bluetune_pairing::{
    strategy_with_attempts, CommandInvoker, FixedFocus, PairingAttempt, PairingStrategy,
    SettingsTarget,
};
use console::style;
use media_engine::SimulatedTransport;
use std::io::BufRead;
use std::time::Duration;
use tokio::sync::watch;

/// Pairing strategy for `platform`, using configured attempts when present
pub fn pairing_strategy(config: &Config, platform: Platform) -> Result<Box<dyn PairingStrategy>> {
    let attempts = config.pairing.attempts_for(platform).map(|list| {
        list.iter()
            .map(|a| {
                PairingAttempt::new(
                    SettingsTarget::new(&a.label, &a.uri),
                    Duration::from_millis(a.timeout_ms),
                )
            })
            .collect()
    });

    strategy_with_attempts(platform, attempts).context("Invalid pairing attempts in config")
}

pub fn coordinator_options(config: &Config) -> CoordinatorOptions {
    CoordinatorOptions {
        prompt_grace: Duration::from_millis(config.pairing.prompt_grace_ms),
        auto_prompt: config.pairing.auto_prompt,
        default_device_label: config.pairing.default_device_label.clone(),
        initial_volume: config.player.default_volume,
    }
}

/// Wires a coordinator to the simulated transport and the system opener
pub fn build_coordinator(
    config: &Config,
    platform: Platform,
) -> Result<PlaybackCoordinator<SimulatedTransport>> {
    let catalog = config
        .catalog
        .to_catalog()
        .context("Invalid track catalog in config")?;
    let transport = SimulatedTransport::for_catalog(&catalog);

    // A terminal cannot tell whether the settings app took focus.
    let pairing = PairingContext::new(
        pairing_strategy(config, platform)?,
        Box::new(CommandInvoker::system()),
        Box::new(FixedFocus::held()),
    );

    Ok(PlaybackCoordinator::new(
        catalog,
        transport,
        pairing,
        coordinator_options(config),
    ))
}

pub async fn run_session(config: &Config, platform: Platform, track: Option<TrackId>) -> Result<()> {
    let coordinator = build_coordinator(config, platform)?;
    let catalog = coordinator.catalog().clone();
    if let Some(id) = track {
        catalog.require(id)?;
    }

    let steps = Steps {
        seek_secs: config.player.seek_step_secs,
        volume: config.player.volume_step,
    };

    let session = Session::new(coordinator, Duration::from_millis(config.player.tick_ms));
    let handle = session.handle();
    if let Some(id) = track {
        handle.send(Command::Select(id));
    }

    let (views, view_rx) = watch::channel(None::<ViewState>);
    spawn_input_thread(handle, view_rx, catalog.clone(), steps);

    println!(
        "{} {} tracks on {}. Type 'help' for commands.",
        style("BlueTune").bold().cyan(),
        catalog.len(),
        platform
    );

    let mut renderer = ConsoleRenderer::new(catalog.len());
    let coordinator = session
        .run(|update| {
            renderer.render(&update);
            views.send_replace(Some(update.view));
        })
        .await;

    renderer.print_status(&coordinator.view());
    Ok(())
}

/// Reads stdin on its own thread; quitting or EOF ends the session
fn spawn_input_thread(
    handle: SessionHandle,
    views: watch::Receiver<Option<ViewState>>,
    catalog: Catalog,
    steps: Steps,
) {
    std::thread::spawn(move || {
        let mut out = ConsoleRenderer::new(catalog.len());
        let stdin = std::io::stdin();

        for line in stdin.lock().lines() {
            let Ok(line) = line else {
                break;
            };

            match parse_line(&line, steps) {
                Ok(Input::Command(command)) => {
                    if !handle.send(command) {
                        return;
                    }
                }
                Ok(Input::Status) => {
                    if let Some(view) = views.borrow().as_ref() {
                        out.print_status(view);
                    }
                }
                Ok(Input::Tracks) => {
                    let view = views.borrow().clone();
                    out.print_lines(track_list(&catalog, view.as_ref()));
                }
                Ok(Input::Help) => out.print_lines(HELP.lines().map(str::to_string)),
                Ok(Input::Quit) => break,
                Ok(Input::Empty) => {}
                Err(message) => out.print_error(&message),
            }
        }

        handle.shutdown();
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use bluetune_config::AttemptConfig;
    use bluetune_core::Track;

    #[test]
    fn test_coordinator_from_default_config() {
        let config = Config::default();
        let coordinator = build_coordinator(&config, Platform::Other).unwrap();

        assert_eq!(coordinator.catalog().len(), 3);
        assert_eq!(coordinator.platform(), Platform::Other);
        assert_eq!(coordinator.playback().volume(), 0.7);
        assert!(!coordinator.connection().is_connected());
    }

    #[test]
    fn test_coordinator_uses_configured_catalog_and_volume() {
        let mut config = Config::default();
        config.player.default_volume = 0.3;
        config.catalog.tracks = vec![Track::new(5, "Solo", "Someone", "2:00", "/music/solo.mp3")];

        let coordinator = build_coordinator(&config, Platform::Android).unwrap();
        assert_eq!(coordinator.playback().selected_track().title, "Solo");
        assert_eq!(coordinator.playback().volume(), 0.3);
        assert_eq!(coordinator.transport().volume(), 0.3);
    }

    #[test]
    fn test_empty_catalog_is_an_error() {
        let mut config = Config::default();
        config.catalog.tracks.clear();
        assert!(build_coordinator(&config, Platform::Other).is_err());
    }

    #[test]
    fn test_configured_attempts_replace_builtins() {
        let mut config = Config::default();
        config.pairing.ios_attempts = vec![AttemptConfig {
            label: "Settings".to_string(),
            uri: "App-Prefs:Bluetooth".to_string(),
            timeout_ms: 800,
        }];

        let plan = pairing_strategy(&config, Platform::Ios).unwrap().plan();
        assert_eq!(plan.len(), 1);
        assert_eq!(plan.attempts()[0].timeout, Duration::from_millis(800));

        let android = pairing_strategy(&config, Platform::Android).unwrap().plan();
        assert_eq!(android.len(), 2);
    }

    #[test]
    fn test_options_follow_config() {
        let mut config = Config::default();
        config.pairing.prompt_grace_ms = 1200;
        config.pairing.auto_prompt = false;

        let options = coordinator_options(&config);
        assert_eq!(options.prompt_grace, Duration::from_millis(1200));
        assert!(!options.auto_prompt);
        assert_eq!(options.default_device_label, "Bluetooth device");
    }
}
