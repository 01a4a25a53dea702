//! Config subcommand handlers.

use dialoguer::{Confirm, Input, Select};
use strum::IntoEnumIterator;

use onosdash_config::{Config, Profile};
use onosdash_core::ThroughputUnit;

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config;
use crate::error::CliError;
use crate::output;

const MASK: &str = "****";

// ── Helpers ─────────────────────────────────────────────────────────

/// A copy of the settings with plaintext passwords masked.
fn redacted(cfg: &Config) -> Config {
    let mut cfg = cfg.clone();
    for profile in cfg.profiles.values_mut() {
        if profile.password.is_some() {
            profile.password = Some(MASK.into());
        }
    }
    cfg
}

/// Format settings as TOML for display, masking sensitive fields.
fn format_config_redacted(cfg: &Config) -> String {
    use std::fmt::Write;
    let mut out = String::new();

    if let Some(ref default) = cfg.default_profile {
        let _ = writeln!(out, "default_profile = \"{default}\"");
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "[defaults]");
    let _ = writeln!(out, "output = \"{}\"", cfg.defaults.output);
    let _ = writeln!(out, "color = \"{}\"", cfg.defaults.color);
    let _ = writeln!(out, "timeout = {}", cfg.defaults.timeout);

    for (name, p) in &cfg.profiles {
        let _ = writeln!(out);
        let _ = writeln!(out, "[profiles.{name}]");
        let _ = writeln!(out, "controller_ip = \"{}\"", p.controller_ip);
        let _ = writeln!(out, "controller_port = {}", p.controller_port);
        let _ = writeln!(out, "username = \"{}\"", p.username);
        if p.password.is_some() {
            let _ = writeln!(out, "password = \"{MASK}\"");
        }
        if let Some(ref env) = p.password_env {
            let _ = writeln!(out, "password_env = \"{env}\"");
        }
        let _ = writeln!(out, "refresh_interval = {}", p.refresh_interval);
        let _ = writeln!(out, "auto_refresh = {}", p.auto_refresh);
        let _ = writeln!(out, "throughput_unit = \"{}\"", p.throughput_unit);
        let _ = writeln!(out, "connectivity_check = {}", p.connectivity_check);
        if let Some(timeout) = p.timeout {
            let _ = writeln!(out, "timeout = {timeout}");
        }
    }

    out.trim_end().to_owned()
}

/// Map a dialoguer / interactive I/O failure into CliError.
fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

/// Offer to store the password in the system keyring or return it for
/// plaintext config.
///
/// Returns `Some(password)` if the user chose plaintext, `None` if stored
/// in the keyring.
fn prompt_password_storage(profile_name: &str, password: &str) -> Result<Option<String>, CliError> {
    let choices = &[
        "Store in system keyring (recommended)",
        "Save to settings file (plaintext)",
    ];
    let selection = Select::new()
        .with_prompt("Where to store the password?")
        .items(choices)
        .default(0)
        .interact()
        .map_err(prompt_err)?;

    if selection == 0 {
        onosdash_config::store_password(profile_name, password)?;
        eprintln!("   ✓ Password stored in system keyring");
        Ok(None)
    } else {
        Ok(Some(password.to_owned()))
    }
}

fn init_wizard() -> Result<(), CliError> {
    let config_path = config::config_path();
    eprintln!("onosdash settings wizard");
    eprintln!("   Settings path: {}\n", config_path.display());

    // Fail on a broken file before prompting, and never write it over.
    let mut cfg = config::load_config_file()?;
    let defaults = Profile::default();

    let profile_name: String = Input::new()
        .with_prompt("Profile name")
        .default("default".into())
        .interact_text()
        .map_err(prompt_err)?;

    let controller_ip: String = Input::new()
        .with_prompt("Controller address")
        .default(defaults.controller_ip.clone())
        .interact_text()
        .map_err(prompt_err)?;

    let controller_port: u16 = Input::new()
        .with_prompt("REST port")
        .default(defaults.controller_port)
        .interact_text()
        .map_err(prompt_err)?;

    let username: String = Input::new()
        .with_prompt("Username")
        .default(defaults.username.clone())
        .interact_text()
        .map_err(prompt_err)?;

    let pass = rpassword::prompt_password("Password (empty for the ONOS default): ")
        .map_err(prompt_err)?;
    let password = if pass.is_empty() {
        None
    } else {
        prompt_password_storage(&profile_name, &pass)?
    };

    let refresh_interval: u64 = Input::new()
        .with_prompt("Refresh interval (ms)")
        .default(defaults.refresh_interval)
        .interact_text()
        .map_err(prompt_err)?;

    let units: Vec<ThroughputUnit> = ThroughputUnit::iter().collect();
    let unit_index = units
        .iter()
        .position(|u| *u == defaults.throughput_unit)
        .unwrap_or(0);
    let unit = Select::new()
        .with_prompt("Throughput unit")
        .items(&units)
        .default(unit_index)
        .interact()
        .map_err(prompt_err)?;

    let profile = Profile {
        controller_ip,
        controller_port,
        username,
        password,
        refresh_interval,
        throughput_unit: units.get(unit).copied().unwrap_or_default(),
        ..defaults
    };
    profile.validate()?;

    cfg.profiles.insert(profile_name.clone(), profile);
    cfg.default_profile = Some(profile_name.clone());
    let path = config::save_config(&cfg)?;

    eprintln!("\n✓ Settings written to {}", path.display());
    eprintln!("  Active profile: {profile_name}");
    eprintln!("\n  Test it: onosdash test");
    Ok(())
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Init => init_wizard(),

        ConfigCommand::Show => {
            let cfg = redacted(&config::load_config_or_default());
            let out = output::render_single(global.output, &cfg, format_config_redacted, |_| {
                config::config_path().display().to_string()
            })?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        // ── Set <key> <value> ───────────────────────────────────────
        ConfigCommand::Set { key, value } => {
            // File only: a broken file surfaces here and env overrides
            // never reach the disk.
            let mut cfg = config::load_config_file()?;

            if matches!(key.as_str(), "default_profile" | "default-profile") {
                cfg.default_profile = Some(value.clone());
                config::save_config(&cfg)?;
                eprintln!("✓ Default profile set to '{value}'");
                return Ok(());
            }

            let profile_name = config::active_profile_name(global, &cfg);
            let mut profile = cfg.profiles.get(&profile_name).cloned().unwrap_or_default();
            profile.set(&key, &value)?;
            cfg.profiles.insert(profile_name.clone(), profile);

            config::save_config(&cfg)?;
            eprintln!("✓ Set {key} on profile '{profile_name}'");
            Ok(())
        }

        ConfigCommand::Reset { yes } => {
            let path = config::config_path();
            if !yes {
                let confirmed = Confirm::new()
                    .with_prompt(format!("Delete {} and restore defaults?", path.display()))
                    .default(false)
                    .interact()
                    .map_err(prompt_err)?;
                if !confirmed {
                    eprintln!("Aborted.");
                    return Ok(());
                }
            }
            if onosdash_config::reset_config()? {
                eprintln!("✓ Removed {}; defaults restored", path.display());
            } else {
                eprintln!("No settings file at {}; already at defaults", path.display());
            }
            Ok(())
        }

        ConfigCommand::Path => {
            println!("{}", config::config_path().display());
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn show_masks_passwords() {
        let mut cfg = Config::default();
        cfg.profiles.insert(
            "lab".into(),
            Profile {
                password: Some("hunter2".into()),
                ..Profile::default()
            },
        );

        let text = format_config_redacted(&cfg);
        assert!(text.contains("[profiles.lab]"));
        assert!(text.contains("password = \"****\""));
        assert!(!text.contains("hunter2"));

        let masked = redacted(&cfg);
        assert_eq!(masked.profiles["lab"].password.as_deref(), Some(MASK));
    }
}
