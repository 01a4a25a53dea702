//! CLI-side settings resolution: layers `GlobalOpts` flag overrides on top
//! of the profile loaded by `onosdash-config`.
//!
//! Core never sees these types -- it receives a pre-built `ControllerConfig`.

use secrecy::SecretString;

use onosdash_config::{Config, Profile};
use onosdash_core::ControllerConfig;

use crate::cli::GlobalOpts;
use crate::error::CliError;

pub use onosdash_config::{
    config_path, load_config, load_config_file, load_config_or_default, save_config,
};

/// A profile after flag overrides, plus the controller config built from it.
pub struct Resolved {
    pub profile_name: String,
    pub profile: Profile,
    pub controller: ControllerConfig,
}

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    config.active_profile_name(global.profile.as_deref())
}

/// Load the settings file and resolve the active profile with overrides.
pub fn resolve(global: &GlobalOpts) -> Result<Resolved, CliError> {
    let cfg = load_config()?;
    resolve_from(&cfg, global)
}

pub fn resolve_from(cfg: &Config, global: &GlobalOpts) -> Result<Resolved, CliError> {
    let profile_name = active_profile_name(global, cfg);
    let stored = cfg.profile(&profile_name, global.profile.is_some())?;
    let profile = apply_overrides(stored, global);

    let mut controller = onosdash_config::profile_to_controller_config(&profile, &profile_name)?;
    if let Some(ref password) = global.password {
        controller.endpoint.password = SecretString::from(password.clone());
    }
    if profile.timeout.is_none() {
        controller.timeout = std::time::Duration::from_secs(cfg.defaults.timeout);
    }

    Ok(Resolved {
        profile_name,
        profile,
        controller,
    })
}

/// Flag > env > profile for every connection setting the CLI exposes.
fn apply_overrides(mut profile: Profile, global: &GlobalOpts) -> Profile {
    if let Some(ref ip) = global.controller_ip {
        profile.controller_ip.clone_from(ip);
    }
    if let Some(port) = global.controller_port {
        profile.controller_port = port;
    }
    if let Some(ref username) = global.username {
        profile.username.clone_from(username);
    }
    if let Some(timeout) = global.timeout {
        profile.timeout = Some(timeout);
    }
    profile
}
