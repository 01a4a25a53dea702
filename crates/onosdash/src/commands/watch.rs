//! `onosdash watch`: a live dashboard printed one line per refresh cycle.
//!
//! With auto-refresh on (profile `auto_refresh` or `--interval`) the
//! background poller drives cycles; otherwise each line read from stdin
//! runs one. The settings file is re-read periodically so edits made
//! with `onosdash config set` apply on the next cycle.

use std::time::Duration;

use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info, warn};

use onosdash_core::{
    ConfigHandle, ControllerConfig, CyclePhase, DashboardState, Poller, TransportConfig,
};

use crate::cli::{ColorMode, GlobalOpts, OutputFormat, WatchArgs};
use crate::config::{self, Resolved};
use crate::error::CliError;
use crate::output::{self, Palette};

use super::status::StatusReport;
use super::util;

/// How often the settings file is re-read while watching.
const SETTINGS_RELOAD: Duration = Duration::from_secs(10);

// ── Rendering ───────────────────────────────────────────────────────

/// One cycle in the chosen format: NDJSON for JSON, YAML documents, or
/// a summary line.
fn render_cycle(
    resolved: &Resolved,
    state: &DashboardState,
    global: &GlobalOpts,
    palette: Palette,
) -> Result<String, CliError> {
    let report = StatusReport::new(resolved, state);
    match global.output {
        OutputFormat::Json | OutputFormat::JsonCompact => output::render_json(&report, true),
        OutputFormat::Yaml => {
            let doc = output::render_single(OutputFormat::Yaml, &report, |_| String::new(), |_| {
                String::new()
            })?;
            Ok(format!("---\n{}", doc.trim_end()))
        }
        OutputFormat::Table => Ok(report.line(palette)),
        OutputFormat::Plain => Ok(report.line(Palette::new(ColorMode::Never))),
    }
}

fn controller_config(resolved: &Resolved, args: &WatchArgs) -> ControllerConfig {
    let mut controller = resolved.controller.clone();
    if let Some(ms) = args.interval {
        controller.refresh_interval = Duration::from_millis(ms);
    }
    controller
}

/// Re-read the settings file and swap the result into the running poller.
/// A broken file keeps the previous settings.
fn reload(
    global: &GlobalOpts,
    args: &WatchArgs,
    handle: &ConfigHandle,
) -> Option<Resolved> {
    let resolved = match config::load_config()
        .map_err(CliError::from)
        .and_then(|cfg| config::resolve_from(&cfg, global))
    {
        Ok(resolved) => resolved,
        Err(e) => {
            warn!(error = %e, "settings reload failed, keeping current settings");
            return None;
        }
    };
    let next = controller_config(&resolved, args);
    if let Err(e) = next.validate() {
        warn!(error = %e, "reloaded settings are invalid, keeping current settings");
        return None;
    }
    debug!(profile = %resolved.profile_name, "settings reloaded");
    handle.store(next);
    Some(resolved)
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    resolved: Resolved,
    args: &WatchArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let settings = ConfigHandle::new(controller_config(&resolved, args));
    let poller = Poller::new(settings.clone(), TransportConfig::default())?;

    let auto = args.interval.is_some() || resolved.profile.auto_refresh;
    info!(
        controller = %resolved.controller.endpoint.display_addr(),
        interval = ?settings.load().effective_refresh_interval(),
        auto,
        "watching controller"
    );

    if auto {
        watch_auto(poller, resolved, args, global).await
    } else {
        watch_manual(&poller, resolved, args, global).await
    }
}

async fn watch_auto(
    poller: Poller,
    mut resolved: Resolved,
    args: &WatchArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let palette = Palette::new(global.color);
    let mut stream = poller.subscribe();
    let mut phase = poller.store().subscribe_phase();
    let mut fetching = None;
    let runner = poller.start();

    let mut settings = tokio::time::interval(SETTINGS_RELOAD);
    settings.tick().await;
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    let mut cycles = 0u64;
    let result = loop {
        tokio::select! {
            Ok(()) = phase.changed() => {
                let current = *phase.borrow_and_update();
                match current {
                    CyclePhase::Fetching if fetching.is_none() => {
                        fetching = util::spinner(global, "Refreshing");
                    }
                    CyclePhase::Fetching => {}
                    CyclePhase::Idle => util::finish(fetching.take()),
                }
            }
            state = stream.changed() => {
                let Some(state) = state else { break Ok(()) };
                util::finish(fetching.take());
                match render_cycle(&resolved, &state, global, palette) {
                    Ok(line) => output::print_output(&line, global.quiet),
                    Err(e) => break Err(e),
                }
                cycles += 1;
                if args.count.is_some_and(|n| cycles >= n) {
                    break Ok(());
                }
            }
            _ = settings.tick() => {
                if let Some(next) = reload(global, args, poller.config()) {
                    resolved = next;
                }
            }
            _ = &mut ctrl_c => break Ok(()),
        }
    };

    util::finish(fetching.take());
    runner.stop().await;
    result
}

async fn watch_manual(
    poller: &Poller,
    mut resolved: Resolved,
    args: &WatchArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let palette = Palette::new(global.color);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    if !global.quiet {
        eprintln!("Auto-refresh is off: press Enter to refresh, Ctrl-D to quit.");
    }

    let mut cycles = 0u64;
    loop {
        poller.refresh().await;
        let rendered = render_cycle(&resolved, &poller.current(), global, palette)?;
        output::print_output(&rendered, global.quiet);

        cycles += 1;
        if args.count.is_some_and(|n| cycles >= n) {
            return Ok(());
        }

        tokio::select! {
            input = lines.next_line() => {
                if input?.is_none() {
                    return Ok(());
                }
            }
            _ = &mut ctrl_c => return Ok(()),
        }

        if let Some(next) = reload(global, args, poller.config()) {
            resolved = next;
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use clap::Parser;

    use super::*;
    use crate::cli::{Cli, Command};

    fn parse(argv: &[&str]) -> (GlobalOpts, WatchArgs) {
        let cli = Cli::try_parse_from(argv).unwrap();
        match cli.command {
            Command::Watch(args) => (cli.global, args),
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn interval_flag_overrides_profile() {
        let (global, args) = parse(&["onosdash", "watch", "--interval", "1500", "-n", "3"]);
        let resolved =
            config::resolve_from(&onosdash_config::Config::default(), &global).unwrap();
        let controller = controller_config(&resolved, &args);
        assert_eq!(controller.refresh_interval, Duration::from_millis(1500));
        assert_eq!(args.count, Some(3));
    }

    #[test]
    fn json_cycles_are_single_lines() {
        let (global, _) = parse(&["onosdash", "-o", "json", "watch"]);
        let resolved =
            config::resolve_from(&onosdash_config::Config::default(), &global).unwrap();
        let out = render_cycle(
            &resolved,
            &DashboardState::default(),
            &global,
            Palette::new(ColorMode::Never),
        )
        .unwrap();
        assert!(!out.contains('\n'));
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["cycle"], 0);
    }
}
