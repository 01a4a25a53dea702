//! Clap derive structures for the `onosdash` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// onosdash -- dashboard and inspector for ONOS SDN controllers
#[derive(Debug, Parser)]
#[command(
    name = "onosdash",
    version,
    about = "Monitor ONOS SDN controllers from the command line",
    long_about = "Polls an ONOS controller's REST API (/onos/v1) for devices, hosts,\n\
        flows, links and topology, and summarizes them as a live dashboard.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Settings profile to use
    #[arg(long, short = 'p', env = "ONOSDASH_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Controller address (overrides profile)
    #[arg(long, short = 'c', env = "ONOSDASH_CONTROLLER_IP", global = true)]
    pub controller_ip: Option<String>,

    /// Controller REST port (overrides profile)
    #[arg(long, short = 'P', env = "ONOSDASH_CONTROLLER_PORT", global = true)]
    pub controller_port: Option<u16>,

    /// Controller username (overrides profile)
    #[arg(long, short = 'u', env = "ONOSDASH_USERNAME", global = true)]
    pub username: Option<String>,

    /// Controller password (overrides profile and keyring)
    #[arg(long, env = "ONOSDASH_PASSWORD", global = true, hide_env_values = true)]
    pub password: Option<String>,

    /// Request timeout in seconds
    #[arg(long, env = "ONOSDASH_TIMEOUT", global = true)]
    pub timeout: Option<u64>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "ONOSDASH_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run one refresh cycle and print the dashboard summary
    #[command(alias = "st")]
    Status,

    /// Poll the controller continuously and print each cycle
    #[command(alias = "w")]
    Watch(WatchArgs),

    /// Inspect infrastructure devices (switches, routers)
    #[command(alias = "dev", alias = "d")]
    Devices(DevicesArgs),

    /// Inspect end hosts
    Hosts(HostsArgs),

    /// Inspect installed flow rules
    Flows(FlowsArgs),

    /// Inspect infrastructure links
    Links(LinksArgs),

    /// Inspect the topology summary and clusters
    #[command(alias = "topo")]
    Topology(TopologyArgs),

    /// Inspect installed applications
    Apps(AppsArgs),

    /// Check connectivity and credentials against the controller
    Test,

    /// Manage settings and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Watch ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct WatchArgs {
    /// Refresh interval in milliseconds (overrides profile)
    #[arg(long, short = 'i')]
    pub interval: Option<u64>,

    /// Stop after this many cycles
    #[arg(long, short = 'n')]
    pub count: Option<u64>,
}

// ── Devices ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct DevicesArgs {
    #[command(subcommand)]
    pub command: DevicesCommand,
}

#[derive(Debug, Subcommand)]
pub enum DevicesCommand {
    /// List all devices
    #[command(alias = "ls")]
    List,

    /// Show one device
    Get {
        /// Device ID (e.g. of:0000000000000001)
        device: String,
    },

    /// List a device's ports
    Ports {
        /// Device ID
        device: String,
    },
}

// ── Hosts ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct HostsArgs {
    #[command(subcommand)]
    pub command: HostsCommand,
}

#[derive(Debug, Subcommand)]
pub enum HostsCommand {
    /// List all hosts
    #[command(alias = "ls")]
    List,

    /// Show one host
    Get {
        /// Host ID (MAC/VLAN, e.g. 00:00:00:00:00:01/None)
        host: String,
    },
}

// ── Flows ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct FlowsArgs {
    #[command(subcommand)]
    pub command: FlowsCommand,
}

#[derive(Debug, Subcommand)]
pub enum FlowsCommand {
    /// List flow rules
    #[command(alias = "ls")]
    List {
        /// Only flows installed on this device
        #[arg(long, short = 'd')]
        device: Option<String>,
    },

    /// Show one flow rule
    Get {
        /// Device ID the flow is installed on
        device: String,
        /// Flow ID
        flow: String,
    },
}

// ── Links ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct LinksArgs {
    #[command(subcommand)]
    pub command: LinksCommand,
}

#[derive(Debug, Subcommand)]
pub enum LinksCommand {
    /// List all links
    #[command(alias = "ls")]
    List,
}

// ── Topology ─────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct TopologyArgs {
    #[command(subcommand)]
    pub command: TopologyCommand,
}

#[derive(Debug, Subcommand)]
pub enum TopologyCommand {
    /// Show the topology summary
    Show,

    /// List topology clusters
    Clusters,
}

// ── Apps ─────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct AppsArgs {
    #[command(subcommand)]
    pub command: AppsCommand,
}

#[derive(Debug, Subcommand)]
pub enum AppsCommand {
    /// List installed applications
    #[command(alias = "ls")]
    List {
        /// Only show active applications
        #[arg(long)]
        active: bool,
    },
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Interactive settings wizard
    Init,

    /// Show the effective settings
    Show,

    /// Set one profile setting
    Set {
        /// Setting name (e.g. controller_ip, refresh_interval)
        key: String,
        /// New value
        value: String,
    },

    /// Restore default settings by deleting the settings file
    Reset {
        /// Skip the confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,
    },

    /// Print the settings file location
    Path,
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
