//! Flow rule command handlers.

use bytesize::ByteSize;
use serde_json::Value;
use tabled::Tabled;

use onosdash_core::{EntityCollection, EntityKind, Flow, Throughput};

use crate::cli::{FlowsArgs, FlowsCommand, GlobalOpts, OutputFormat};
use crate::config::Resolved;
use crate::error::CliError;
use crate::output::{self, detail_lines, or_dash};

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct FlowRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Device")]
    device: String,
    #[tabled(rename = "App")]
    app: String,
    #[tabled(rename = "Priority")]
    priority: i64,
    #[tabled(rename = "State")]
    state: String,
    #[tabled(rename = "Bytes")]
    bytes: String,
    #[tabled(rename = "Packets")]
    packets: u64,
    #[tabled(rename = "Age")]
    age: String,
}

impl From<&Flow> for FlowRow {
    fn from(f: &Flow) -> Self {
        Self {
            id: f.id.clone(),
            device: or_dash(f.device_id.as_deref()),
            app: or_dash(f.app_id.as_deref()),
            priority: f.priority,
            state: or_dash(f.state.as_deref()),
            bytes: ByteSize::b(f.bytes).to_string(),
            packets: f.packets,
            age: util::age(f.life),
        }
    }
}

fn detail(record: &Value) -> String {
    let f = Flow::from(record);
    detail_lines(&[
        ("ID", f.id.clone()),
        ("Device", or_dash(f.device_id.as_deref())),
        ("App", or_dash(f.app_id.as_deref())),
        ("Table", f.table_id.map_or_else(|| "-".into(), |t| t.to_string())),
        ("Priority", f.priority.to_string()),
        (
            "Timeout",
            if f.is_permanent {
                "permanent".into()
            } else {
                format!("{}s", f.timeout)
            },
        ),
        ("State", or_dash(f.state.as_deref())),
        ("Bytes", format!("{} ({})", f.bytes, ByteSize::b(f.bytes))),
        ("Packets", f.packets.to_string()),
        ("Age", util::age(f.life)),
    ])
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    resolved: &Resolved,
    args: FlowsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let client = util::client(&resolved.controller)?;

    match args.command {
        FlowsCommand::List { device } => {
            let body = match device {
                Some(ref id) => {
                    util::found(client.list_device_flows(id).await, "device", id, "devices list")?
                }
                None => client.list_flows().await?,
            };
            let flows = EntityCollection::extract(EntityKind::Flows, &body);
            let out = output::render_list(
                global.output,
                flows.records.as_slice(),
                |v| FlowRow::from(&Flow::from(v)),
                |v| Flow::from(v).id,
            )?;
            output::print_output(&out, global.quiet);

            // Footer goes to stderr so piped table output stays clean.
            if global.output == OutputFormat::Table && !global.quiet {
                let throughput = Throughput::from_flows(&flows, resolved.controller.throughput_unit);
                eprintln!(
                    "{} flows, {} total, estimated throughput {throughput}",
                    flows.len(),
                    ByteSize::b(throughput.total_bytes),
                );
            }
            Ok(())
        }

        FlowsCommand::Get { device, flow } => {
            let body = util::found(
                client.get_flow(&device, &flow).await,
                "flow",
                &flow,
                "flows list",
            )?;
            // The controller wraps a single flow in a one-element `flows` array.
            let record = util::array_field(&body, "flows")
                .into_iter()
                .next()
                .ok_or_else(|| CliError::NotFound {
                    resource_type: "flow".into(),
                    identifier: flow.clone(),
                    list_command: format!("flows list --device {device}"),
                })?;
            let out =
                output::render_single(global.output, &record, detail, |v| Flow::from(v).id)?;
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
