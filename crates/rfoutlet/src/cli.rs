//! Clap derive structures for the `rfoutlet` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use clap::builder::{PossibleValuesParser, TypedValueParser};
use clap::{Args, Parser, Subcommand, ValueEnum};

use rfoutlet_core::{DayTime, GroupAction, Weekday};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// rfoutlet -- switch and schedule radio-controlled power outlets
#[derive(Debug, Parser)]
#[command(
    name = "rfoutlet",
    version,
    about = "Switch and schedule rfoutlet power outlets from the command line",
    long_about = "A client for the rfoutlet server.\n\n\
        Talks to the server over its WebSocket protocol: every command is\n\
        answered with a fresh snapshot of all groups, outlets and schedules.",
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
    /// Server profile to use
    #[arg(long, short = 'p', env = "RFOUTLET_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Server WebSocket URL (overrides profile)
    #[arg(long, short = 'u', env = "RFOUTLET_URL", global = true)]
    pub url: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "RFOUTLET_OUTPUT",
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

    /// Seconds to wait for the server (overrides profile)
    #[arg(long, env = "RFOUTLET_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
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

#[derive(Debug, Clone, ValueEnum)]
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
    /// Show every group and outlet with its state and schedule summary
    #[command(alias = "ls")]
    Status(StatusArgs),

    /// Print every snapshot the server broadcasts until interrupted
    Watch,

    /// Switch all outlets of a group
    #[command(alias = "g")]
    Group(GroupArgs),

    /// Switch a single outlet
    #[command(alias = "o")]
    Outlet(OutletArgs),

    /// Manage outlet schedules
    #[command(alias = "i", alias = "schedule")]
    Interval(IntervalArgs),

    /// Manage configuration profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Status ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct StatusArgs {
    /// Only show this group
    #[arg(long, short = 'g')]
    pub group: Option<String>,
}

// ── Group / Outlet ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GroupArgs {
    /// Group ID
    pub id: String,

    /// What to do with the group's outlets
    #[arg(value_parser = PossibleValuesParser::new(["on", "off", "toggle"])
        .try_map(|raw| raw.parse::<GroupAction>()))]
    pub action: GroupAction,
}

#[derive(Debug, Args)]
pub struct OutletArgs {
    /// Outlet ID
    pub id: String,

    #[command(subcommand)]
    pub command: OutletCommand,
}

#[derive(Debug, Subcommand)]
pub enum OutletCommand {
    /// Flip the outlet on or off (refused while its schedule is enabled)
    Toggle,
}

// ── Interval ─────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct IntervalArgs {
    #[command(subcommand)]
    pub command: IntervalCommand,
}

#[derive(Debug, Subcommand)]
pub enum IntervalCommand {
    /// List schedule intervals
    #[command(alias = "ls")]
    List {
        /// Only show intervals of this outlet
        #[arg(long)]
        outlet: Option<String>,
    },

    /// Add an interval to an outlet's schedule
    Add {
        /// Outlet ID
        outlet: String,

        #[command(flatten)]
        times: IntervalTimes,

        /// Enable the interval right away
        #[arg(long)]
        enabled: bool,
    },

    /// Change an existing interval; omitted fields keep their value
    Update {
        /// Interval ID
        id: String,

        #[command(flatten)]
        times: IntervalTimes,

        /// Set enabled state (true/false)
        #[arg(long)]
        enabled: Option<bool>,
    },

    /// Enable an interval
    Enable { id: String },

    /// Disable an interval
    Disable { id: String },

    /// Flip an interval's enabled state
    Toggle { id: String },

    /// Remove an interval
    #[command(alias = "rm")]
    Delete { id: String },
}

#[derive(Debug, Args)]
pub struct IntervalTimes {
    /// Start time (HH:MM, 24-hour)
    #[arg(long, value_parser = parse_day_time)]
    pub from: Option<DayTime>,

    /// End time (HH:MM, 24-hour)
    #[arg(long, value_parser = parse_day_time)]
    pub to: Option<DayTime>,

    /// Weekdays, comma-separated (e.g. mon,wed,fri or sunday)
    #[arg(long, value_delimiter = ',', value_parser = parse_weekday)]
    pub days: Option<Vec<Weekday>>,
}

fn parse_day_time(raw: &str) -> Result<DayTime, String> {
    raw.parse().map_err(|e: rfoutlet_core::CoreError| e.to_string())
}

fn parse_weekday(raw: &str) -> Result<Weekday, String> {
    raw.trim()
        .parse()
        .map_err(|_| format!("unknown weekday '{raw}' (use sun, mon, ... or full names)"))
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create a config file, prompting for anything not given as a flag
    Init {
        /// Profile name
        #[arg(long)]
        name: Option<String>,

        /// Server WebSocket URL
        #[arg(long = "server")]
        server: Option<String>,

        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },

    /// Show the effective configuration
    Show,

    /// Set a key on the active profile
    Set {
        /// url, timeout or request_status_on_connect
        key: String,
        value: String,
    },

    /// Make a profile the default
    Use { name: String },

    /// List profile names
    Profiles,

    /// Print the config file path
    Path,
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
