//! Application command handlers.

use tabled::Tabled;

use onosdash_core::{Application, OnosClient};

use crate::cli::{AppsArgs, AppsCommand, GlobalOpts};
use crate::error::CliError;
use crate::output::{self, or_dash};

use super::util;

#[derive(Tabled)]
struct AppRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Version")]
    version: String,
    #[tabled(rename = "State")]
    state: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Origin")]
    origin: String,
}

impl From<&Application> for AppRow {
    fn from(a: &Application) -> Self {
        Self {
            name: a.name.clone(),
            version: or_dash(a.version.as_deref()),
            state: or_dash(a.state.as_deref()),
            category: or_dash(a.category.as_deref()),
            origin: or_dash(a.origin.as_deref()),
        }
    }
}

pub async fn handle(
    client: &OnosClient,
    args: AppsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        AppsCommand::List { active } => {
            let body = client.list_applications().await?;
            let apps: Vec<_> = util::array_field(&body, "applications")
                .into_iter()
                .filter(|v| !active || Application::from(v).is_active())
                .collect();
            let out = output::render_list(
                global.output,
                &apps,
                |v| AppRow::from(&Application::from(v)),
                |v| Application::from(v).name,
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
