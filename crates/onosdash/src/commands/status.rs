//! `onosdash status`: one refresh cycle rendered as a dashboard summary.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use onosdash_core::{CycleOutcome, DashboardState, Poller, Throughput};

use crate::cli::{ColorMode, GlobalOpts};
use crate::config::Resolved;
use crate::error::CliError;
use crate::output::{self, Palette, detail_lines};

use super::util;

/// The serializable view of one dashboard state.
#[derive(Debug, Serialize)]
pub struct StatusReport {
    pub profile: String,
    pub controller: String,
    pub connected: bool,
    pub devices: usize,
    pub available_devices: usize,
    pub hosts: usize,
    pub flows: usize,
    pub links: usize,
    pub device_types: BTreeMap<String, usize>,
    pub throughput: Throughput,
    pub throughput_display: String,
    pub refreshed_at: Option<DateTime<Utc>>,
    pub cycle: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<CycleOutcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl StatusReport {
    pub fn new(resolved: &Resolved, state: &DashboardState) -> Self {
        let snap = &state.snapshot;
        Self {
            profile: resolved.profile_name.clone(),
            controller: resolved.controller.endpoint.display_addr(),
            connected: snap.connected,
            devices: snap.device_count,
            available_devices: snap.available_device_count,
            hosts: snap.host_count,
            flows: snap.flow_count,
            links: snap.link_count,
            device_types: snap.device_types.clone(),
            throughput: snap.throughput,
            throughput_display: snap.throughput.to_string(),
            refreshed_at: snap.refreshed_at,
            cycle: state.cycle,
            outcome: state.last_outcome.clone(),
            error: state.error.clone(),
        }
    }

    /// Fetches that failed in the cycle, comma-joined.
    fn failed(&self) -> Option<String> {
        match self.outcome {
            Some(CycleOutcome::PartialFailure { ref failed }) => Some(
                failed
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(", "),
            ),
            _ => None,
        }
    }

    /// Multi-line key/value view.
    pub fn detail(&self, palette: Palette) -> String {
        let types = if self.device_types.is_empty() {
            "-".to_owned()
        } else {
            self.device_types
                .iter()
                .map(|(t, n)| format!("{t}={n}"))
                .collect::<Vec<_>>()
                .join(", ")
        };
        let mut pairs = vec![
            ("Profile", self.profile.clone()),
            ("Controller", self.controller.clone()),
            ("Connected", palette.flag(self.connected)),
            (
                "Devices",
                format!("{} ({} available)", self.devices, self.available_devices),
            ),
            ("Device types", types),
            ("Hosts", self.hosts.to_string()),
            ("Flows", self.flows.to_string()),
            ("Links", self.links.to_string()),
            ("Throughput", self.throughput_display.clone()),
            (
                "Refreshed",
                self.refreshed_at
                    .map_or_else(|| "never".into(), |t| t.format("%H:%M:%S").to_string()),
            ),
        ];
        if let Some(failed) = self.failed() {
            pairs.push(("Failed", palette.warn(&failed)));
        }
        if let Some(ref error) = self.error {
            pairs.push(("Error", palette.bad(error)));
        }
        detail_lines(&pairs)
    }

    /// Single line for `watch`.
    pub fn line(&self, palette: Palette) -> String {
        let time = self
            .refreshed_at
            .map_or_else(|| "--:--:--".into(), |t| t.format("%H:%M:%S").to_string());
        let state = if self.connected {
            palette.good("connected")
        } else {
            palette.bad("disconnected")
        };
        let mut line = format!(
            "{} {state}  devices {}/{}  hosts {}  flows {}  links {}  {}",
            palette.dim(&format!("[{time} #{}]", self.cycle)),
            self.available_devices,
            self.devices,
            self.hosts,
            self.flows,
            self.links,
            self.throughput_display,
        );
        if let Some(failed) = self.failed() {
            line.push_str(&format!("  {}", palette.warn(&format!("failed: {failed}"))));
        }
        if let Some(ref error) = self.error {
            line.push_str(&format!("  {}", palette.bad(error)));
        }
        line
    }
}

pub async fn handle(resolved: &Resolved, global: &GlobalOpts) -> Result<(), CliError> {
    let spinner = util::spinner(
        global,
        &format!("Polling {}", resolved.controller.endpoint.display_addr()),
    );
    let result = Poller::oneshot(resolved.controller.clone()).await;
    util::finish(spinner);

    let state = result?;
    let report = StatusReport::new(resolved, &state);
    let palette = Palette::new(global.color);

    let plain = Palette::new(ColorMode::Never);
    let out = output::render_single(
        global.output,
        &report,
        |r| r.detail(palette),
        |r| r.line(plain),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use clap::Parser;
    use onosdash_core::{EntityKind, Snapshot};

    use super::*;
    use crate::cli::Cli;

    fn resolved() -> Resolved {
        let global = Cli::try_parse_from(["onosdash", "status"]).unwrap().global;
        crate::config::resolve_from(&onosdash_config::Config::default(), &global).unwrap()
    }

    fn state() -> DashboardState {
        DashboardState {
            snapshot: Snapshot {
                device_count: 3,
                available_device_count: 2,
                host_count: 4,
                flow_count: 10,
                link_count: 6,
                connected: true,
                ..Snapshot::default()
            },
            cycle: 7,
            is_loading: false,
            last_outcome: Some(CycleOutcome::PartialFailure {
                failed: vec![EntityKind::Hosts],
            }),
            ..DashboardState::default()
        }
    }

    #[test]
    fn line_summarizes_counts_and_failures() {
        let report = StatusReport::new(&resolved(), &state());
        let line = report.line(Palette::new(ColorMode::Never));
        assert!(line.contains("#7"));
        assert!(!line.contains("disconnected"));
        assert!(line.contains("devices 2/3"));
        assert!(line.contains("flows 10"));
        assert!(line.contains("failed: hosts"));
    }

    #[test]
    fn json_report_is_tagged() {
        let report = StatusReport::new(&resolved(), &state());
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["controller"], "127.0.0.1:8181");
        assert_eq!(json["outcome"]["status"], "partial_failure");
        assert!(json.get("error").is_none());
    }
}
