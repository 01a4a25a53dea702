//! Shared helpers for command handlers.

use std::io::IsTerminal;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use serde_json::Value;

use onosdash_core::{ApiError, ControllerConfig, OnosClient, TransportConfig};

use crate::cli::{GlobalOpts, OutputFormat};
use crate::error::CliError;

/// A client for ad-hoc lookups against the resolved controller.
pub fn client(config: &ControllerConfig) -> Result<OnosClient, CliError> {
    config.validate()?;
    let transport = TransportConfig::default().with_timeout(config.timeout);
    Ok(OnosClient::new(config.endpoint.clone(), &transport)?)
}

/// Turn a 404 from a single-resource lookup into a `NotFound` that names
/// the resource and how to list candidates.
pub fn found<T>(
    result: Result<T, ApiError>,
    resource_type: &str,
    identifier: &str,
    list_command: &str,
) -> Result<T, CliError> {
    result.map_err(|e| {
        if e.is_not_found() {
            CliError::NotFound {
                resource_type: resource_type.into(),
                identifier: identifier.into(),
                list_command: list_command.into(),
            }
        } else {
            e.into()
        }
    })
}

/// The array under `field`, or nothing when it is absent or not an array.
pub fn array_field(body: &Value, field: &str) -> Vec<Value> {
    body.get(field)
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default()
}

/// A stderr spinner for interactive table output; `None` otherwise.
pub fn spinner(global: &GlobalOpts, message: &str) -> Option<ProgressBar> {
    if global.quiet || global.output != OutputFormat::Table || !std::io::stderr().is_terminal() {
        return None;
    }
    let bar = ProgressBar::new_spinner();
    bar.set_style(
        ProgressStyle::with_template("{spinner} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    bar.set_message(message.to_owned());
    bar.enable_steady_tick(Duration::from_millis(100));
    Some(bar)
}

pub fn finish(spinner: Option<ProgressBar>) {
    if let Some(bar) = spinner {
        bar.finish_and_clear();
    }
}

/// Human-readable age for a duration in seconds (`1h 2m 3s`).
pub fn age(seconds: u64) -> String {
    humantime::format_duration(Duration::from_secs(seconds)).to_string()
}
