// crates/cli/src/commands.rs

use crate::player;
use crate::render::track_list;
use anyhow::{bail, Context, Result};
use bluetune_config::{Config, ConfigManager, PlatformSetting};
use bluetune_core::{Platform, TrackId};
use clap::ArgMatches;
use console::style;

/// List the track catalog
pub fn list_tracks(config: &Config, matches: &ArgMatches) -> Result<()> {
    let catalog = config
        .catalog
        .to_catalog()
        .context("Invalid track catalog in config")?;

    let format = matches
        .get_one::<String>("format")
        .map(|s| s.as_str())
        .unwrap_or("text");

    match format {
        "json" => {
            let json = serde_json::to_string_pretty(catalog.tracks())
                .context("Failed to serialize tracks to JSON")?;
            println!("{}", json);
        }
        "text" => {
            println!("\n{} Tracks", style(catalog.len()).bold().cyan());
            println!("{}", "=".repeat(60));
            for line in track_list(&catalog, None) {
                println!("{}", line);
            }
        }
        other => bail!("Unsupported format: {}", other),
    }

    Ok(())
}

/// Show the platform class and the pairing plan it implies
pub fn show_platform(config: &Config, matches: &ArgMatches) -> Result<()> {
    let detected = detected_platform(matches);
    let platform = resolve_platform(config, platform_override(matches), detected)?;
    let plan = player::pairing_strategy(config, platform)?.plan();

    println!("\n{}", style("Platform").bold().cyan());
    println!("{}", "=".repeat(60));
    println!("Detected: {}", detected);
    println!("Using:    {}", style(platform).bold());

    if plan.is_empty() {
        println!("\nNo settings shortcuts on this platform.");
    } else {
        println!("\nSettings shortcuts, tried in order:");
        for (i, attempt) in plan.attempts().iter().enumerate() {
            println!(
                "  {}. {} (waits {:.1}s)",
                i + 1,
                attempt.target,
                attempt.timeout.as_secs_f64()
            );
        }
    }

    println!("\nFallback instructions:");
    println!("  {}", plan.instructions().text());

    Ok(())
}

/// Create, reset, validate or print the config file
pub fn manage_config(manager: &ConfigManager, matches: &ArgMatches) -> Result<()> {
    let path = manager.config_path();

    if matches.get_flag("init") {
        if manager.initialize().context("Failed to create config file")? {
            println!("{} Created {}", style("✓").green().bold(), path.display());
        } else {
            println!("Config already exists at {}", path.display());
        }
    } else if matches.get_flag("reset") {
        manager.reset().context("Failed to reset config file")?;
        println!("{} Reset {} to defaults", style("✓").green().bold(), path.display());
    } else if matches.get_flag("validate") {
        let errors = manager.validate().context("Failed to read config file")?;
        if errors.is_empty() {
            println!("{} {} is valid", style("✓").green().bold(), path.display());
        } else {
            for error in &errors {
                println!("{} {}", style("✗").red().bold(), error);
            }
            bail!("{} invalid value(s) in {}", errors.len(), path.display());
        }
    } else {
        let config = manager
            .load_with_env_overrides()
            .context("Failed to read config file")?;
        println!("# {}", path.display());
        print!("{}", render_config(&config)?);
    }

    Ok(())
}

/// Start the interactive player
pub async fn play(config: &Config, matches: &ArgMatches) -> Result<()> {
    let detected = detected_platform(matches);
    let platform = resolve_platform(config, platform_override(matches), detected)?;
    let track = matches.get_one::<u32>("track").copied().map(TrackId::new);

    player::run_session(config, platform, track).await
}

/// Command-line override first, then the config file, then `detected`
pub fn resolve_platform(
    config: &Config,
    override_arg: Option<&str>,
    detected: Platform,
) -> Result<Platform> {
    let setting = match override_arg {
        Some(value) => value
            .parse::<PlatformSetting>()
            .map_err(anyhow::Error::msg)?,
        None => config.pairing.platform,
    };
    Ok(setting.resolve(detected))
}

/// The `--user-agent` classification when given, otherwise the build target
pub fn detected_platform(matches: &ArgMatches) -> Platform {
    matches
        .get_one::<String>("user-agent")
        .map(|ua| Platform::from_user_agent(ua))
        .unwrap_or_else(Platform::detect)
}

fn platform_override(matches: &ArgMatches) -> Option<&str> {
    matches.get_one::<String>("platform").map(|s| s.as_str())
}

fn render_config(config: &Config) -> Result<String> {
    toml::to_string_pretty(config).context("Failed to serialize config")
}
