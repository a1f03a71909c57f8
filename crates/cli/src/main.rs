// crates/cli/src/main.rs

use anyhow::Result;
use bluetune_config::{Config, ConfigManager};
use clap::{Arg, ArgAction, Command};
use std::path::PathBuf;

mod commands;
mod input;
mod player;
mod render;

fn build_cli() -> Command {
    Command::new("bluetune")
        .version(env!("CARGO_PKG_VERSION"))
        .author("DrTomLLC")
        .about("Play music once a Bluetooth audio device is paired")
        .arg(
            Arg::new("config-dir")
                .short('c')
                .long("config-dir")
                .value_name("DIR")
                .help("Directory holding config.toml")
                .global(true),
        )
        .subcommand(
            Command::new("tracks")
                .about("List the track catalog")
                .arg(
                    Arg::new("format")
                        .short('f')
                        .long("format")
                        .value_name("FORMAT")
                        .help("Output format")
                        .value_parser(["text", "json"])
                        .default_value("text"),
                ),
        )
        .subcommand(
            Command::new("platform")
                .about("Show the platform class and its pairing plan")
                .arg(platform_arg())
                .arg(user_agent_arg()),
        )
        .subcommand(
            Command::new("config")
                .about("Manage the configuration file")
                .arg(flag("init", "Create config.toml if it does not exist"))
                .arg(flag("reset", "Overwrite config.toml with defaults"))
                .arg(flag("validate", "Check config.toml for invalid values"))
                .arg(flag("show", "Print the effective configuration"))
                .group(
                    clap::ArgGroup::new("action")
                        .args(["init", "reset", "validate", "show"])
                        .multiple(false),
                ),
        )
        .subcommand(
            Command::new("play")
                .about("Start an interactive player session")
                .arg(
                    Arg::new("track")
                        .short('t')
                        .long("track")
                        .value_name("ID")
                        .help("Track to select first")
                        .value_parser(clap::value_parser!(u32)),
                )
                .arg(platform_arg())
                .arg(user_agent_arg()),
        )
}

fn flag(name: &'static str, help: &'static str) -> Arg {
    Arg::new(name)
        .long(name)
        .help(help)
        .action(ArgAction::SetTrue)
}

fn platform_arg() -> Arg {
    Arg::new("platform")
        .short('p')
        .long("platform")
        .value_name("PLATFORM")
        .help("Override platform detection")
        .value_parser(["auto", "android", "ios", "other"])
}

fn user_agent_arg() -> Arg {
    Arg::new("user-agent")
        .long("user-agent")
        .value_name("UA")
        .help("Detect the platform from a browser user agent instead of the OS")
}

fn config_manager(matches: &clap::ArgMatches) -> Result<ConfigManager> {
    let manager = match matches.get_one::<String>("config-dir") {
        Some(dir) => ConfigManager::with_directory(PathBuf::from(dir))?,
        None => ConfigManager::new()?,
    };
    Ok(manager)
}

fn load_config(manager: Option<&ConfigManager>) -> Config {
    let Some(manager) = manager else {
        return Config::default();
    };

    match manager.load_with_env_overrides() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Warning: {}, using default configuration", e);
            Config::default()
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let matches = build_cli().get_matches();

    let manager = match config_manager(&matches) {
        Ok(manager) => Some(manager),
        Err(e) => {
            eprintln!("Warning: {}", e);
            None
        }
    };
    let config = load_config(manager.as_ref());

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.app.log_level.as_filter()),
    )
    .init();

    if !config.app.color_output {
        console::set_colors_enabled(false);
    }

    match matches.subcommand() {
        Some(("tracks", sub_matches)) => commands::list_tracks(&config, sub_matches),
        Some(("platform", sub_matches)) => commands::show_platform(&config, sub_matches),
        Some(("config", sub_matches)) => {
            let manager = manager
                .ok_or_else(|| anyhow::anyhow!("No config directory available"))?;
            commands::manage_config(&manager, sub_matches)
        }
        Some(("play", sub_matches)) => commands::play(&config, sub_matches).await,
        _ => {
            build_cli().print_help()?;
            Ok(())
        }
    }
}
