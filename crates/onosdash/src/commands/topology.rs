//! Topology command handlers.

use serde_json::Value;
use tabled::Tabled;

use onosdash_core::{Cluster, OnosClient, TopologySummary};

use crate::cli::{GlobalOpts, TopologyArgs, TopologyCommand};
use crate::error::CliError;
use crate::output::{self, detail_lines, or_dash};

use super::util;

#[derive(Tabled)]
struct ClusterRow {
    #[tabled(rename = "Cluster")]
    id: i64,
    #[tabled(rename = "Devices")]
    devices: u64,
    #[tabled(rename = "Links")]
    links: u64,
    #[tabled(rename = "Root")]
    root: String,
}

impl From<&Cluster> for ClusterRow {
    fn from(c: &Cluster) -> Self {
        Self {
            id: c.id,
            devices: c.device_count,
            links: c.link_count,
            root: or_dash(c.root.as_deref()),
        }
    }
}

fn summary_detail(record: &Value) -> String {
    let t = TopologySummary::from(record);
    detail_lines(&[
        ("Devices", t.devices.to_string()),
        ("Links", t.links.to_string()),
        ("Clusters", t.clusters.to_string()),
        (
            "Computed",
            t.time.map_or_else(|| "-".into(), |ns| ns.to_string()),
        ),
    ])
}

pub async fn handle(
    client: &OnosClient,
    args: TopologyArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        TopologyCommand::Show => {
            let body = client.get_topology().await?;
            let out = output::render_single(global.output, &body, summary_detail, |v| {
                TopologySummary::from(v).clusters.to_string()
            })?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        TopologyCommand::Clusters => {
            let body = client.get_topology_clusters().await?;
            let clusters = util::array_field(&body, "clusters");
            let out = output::render_list(
                global.output,
                &clusters,
                |v| ClusterRow::from(&Cluster::from(v)),
                |v| Cluster::from(v).id.to_string(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
