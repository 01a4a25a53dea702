//! Host command handlers.

use serde_json::Value;
use tabled::Tabled;

use onosdash_core::{EntityCollection, EntityKind, Host, OnosClient};

use crate::cli::{GlobalOpts, HostsArgs, HostsCommand};
use crate::error::CliError;
use crate::output::{self, detail_lines, or_dash};

use super::util;

#[derive(Tabled)]
struct HostRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "MAC")]
    mac: String,
    #[tabled(rename = "VLAN")]
    vlan: String,
    #[tabled(rename = "IPs")]
    ips: String,
    #[tabled(rename = "Location")]
    location: String,
}

impl From<&Host> for HostRow {
    fn from(h: &Host) -> Self {
        Self {
            id: h.id.clone(),
            mac: or_dash(h.mac.as_deref()),
            vlan: or_dash(h.vlan.as_deref()),
            ips: h.ip_addresses.join(", "),
            location: locations(h),
        }
    }
}

fn locations(h: &Host) -> String {
    h.locations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

fn detail(record: &Value) -> String {
    let h = Host::from(record);
    detail_lines(&[
        ("ID", h.id.clone()),
        ("MAC", or_dash(h.mac.as_deref())),
        ("VLAN", or_dash(h.vlan.as_deref())),
        ("IPs", h.ip_addresses.join(", ")),
        ("Location", locations(&h)),
    ])
}

pub async fn handle(
    client: &OnosClient,
    args: HostsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        HostsCommand::List => {
            let body = client.list_hosts().await?;
            let hosts = EntityCollection::extract(EntityKind::Hosts, &body);
            let out = output::render_list(
                global.output,
                hosts.records.as_slice(),
                |v| HostRow::from(&Host::from(v)),
                |v| Host::from(v).id,
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        HostsCommand::Get { host } => {
            let body = util::found(client.get_host(&host).await, "host", &host, "hosts list")?;
            let out = output::render_single(global.output, &body, detail, |v| Host::from(v).id)?;
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
