//! Device command handlers.

use serde_json::Value;
use tabled::Tabled;

use onosdash_core::{Device, EntityCollection, EntityKind, OnosClient, Port};

use crate::cli::{DevicesArgs, DevicesCommand, GlobalOpts};
use crate::error::CliError;
use crate::output::{self, detail_lines, or_dash};

use super::util;

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct DeviceRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Type")]
    dtype: String,
    #[tabled(rename = "Available")]
    available: String,
    #[tabled(rename = "Role")]
    role: String,
    #[tabled(rename = "Manufacturer")]
    manufacturer: String,
    #[tabled(rename = "Software")]
    software: String,
}

impl From<&Device> for DeviceRow {
    fn from(d: &Device) -> Self {
        Self {
            id: d.id.clone(),
            dtype: d.type_label().to_owned(),
            available: if d.available { "yes" } else { "no" }.into(),
            role: or_dash(d.role.as_deref()),
            manufacturer: or_dash(d.manufacturer.as_deref()),
            software: or_dash(d.software.as_deref()),
        }
    }
}

#[derive(Tabled)]
struct PortRow {
    #[tabled(rename = "Port")]
    port: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Enabled")]
    enabled: String,
    #[tabled(rename = "Type")]
    ptype: String,
    #[tabled(rename = "Speed (Mbps)")]
    speed: String,
}

impl From<&Port> for PortRow {
    fn from(p: &Port) -> Self {
        Self {
            port: p.port.clone(),
            name: or_dash(p.name.as_deref()),
            enabled: if p.is_enabled { "yes" } else { "no" }.into(),
            ptype: or_dash(p.port_type.as_deref()),
            speed: p.port_speed.map_or_else(|| "-".into(), |s| s.to_string()),
        }
    }
}

fn detail(record: &Value) -> String {
    let d = Device::from(record);
    detail_lines(&[
        ("ID", d.id.clone()),
        ("Type", d.type_label().to_owned()),
        ("Available", if d.available { "yes" } else { "no" }.into()),
        ("Role", or_dash(d.role.as_deref())),
        ("Manufacturer", or_dash(d.manufacturer.as_deref())),
        ("Hardware", or_dash(d.hardware.as_deref())),
        ("Software", or_dash(d.software.as_deref())),
        ("Serial", or_dash(d.serial.as_deref())),
        ("Driver", or_dash(d.driver.as_deref())),
        ("Chassis ID", or_dash(d.chassis_id.as_deref())),
    ])
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    client: &OnosClient,
    args: DevicesArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        DevicesCommand::List => {
            let body = client.list_devices().await?;
            let devices = EntityCollection::extract(EntityKind::Devices, &body);
            let out = output::render_list(
                global.output,
                devices.records.as_slice(),
                |v| DeviceRow::from(&Device::from(v)),
                |v| Device::from(v).id,
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        DevicesCommand::Get { device } => {
            let body = util::found(
                client.get_device(&device).await,
                "device",
                &device,
                "devices list",
            )?;
            let out = output::render_single(global.output, &body, detail, |v| Device::from(v).id)?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        DevicesCommand::Ports { device } => {
            let body = util::found(
                client.get_device_ports(&device).await,
                "device",
                &device,
                "devices list",
            )?;
            let ports = util::array_field(&body, "ports");
            let out = output::render_list(
                global.output,
                &ports,
                |v| PortRow::from(&Port::from(v)),
                |v| Port::from(v).port,
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
