//! Link command handlers.

use tabled::Tabled;

use onosdash_core::{EntityCollection, EntityKind, Link, OnosClient};

use crate::cli::{GlobalOpts, LinksArgs, LinksCommand};
use crate::error::CliError;
use crate::output::{self, or_dash};

#[derive(Tabled)]
struct LinkRow {
    #[tabled(rename = "Source")]
    src: String,
    #[tabled(rename = "Destination")]
    dst: String,
    #[tabled(rename = "Type")]
    ltype: String,
    #[tabled(rename = "State")]
    state: String,
}

impl From<&Link> for LinkRow {
    fn from(l: &Link) -> Self {
        Self {
            src: l.src.to_string(),
            dst: l.dst.to_string(),
            ltype: or_dash(l.link_type.as_deref()),
            state: or_dash(l.state.as_deref()),
        }
    }
}

pub async fn handle(
    client: &OnosClient,
    args: LinksArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        LinksCommand::List => {
            let body = client.list_links().await?;
            let links = EntityCollection::extract(EntityKind::Links, &body);
            let out = output::render_list(
                global.output,
                links.records.as_slice(),
                |v| LinkRow::from(&Link::from(v)),
                |v| {
                    let l = Link::from(v);
                    format!("{} {}", l.src, l.dst)
                },
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
