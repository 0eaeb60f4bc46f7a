use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use timeshape_core::{BucketAnchor, RunConfig};

/// Generate shaped or uniform synthetic events and bucket them per week.
#[derive(Parser, Debug)]
#[command(name = "timeshape", version, about)]
pub struct CliArgs {
    /// Debug logging
    #[arg(short, long, global = true)]
    pub debug: bool,

    /// JSON run config; flags override its fields
    #[arg(long, global = true, env = "TIMESHAPE_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Events clustered by day-of-week and hour-of-day weights
    Shaped(RunArgs),
    /// Events spread uniformly between start and end
    Uniform(RunArgs),
}

impl Command {
    pub fn args(&self) -> &RunArgs {
        match self {
            Command::Shaped(args) | Command::Uniform(args) => args,
        }
    }
}

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Number of events
    #[arg(short = 'n', long)]
    pub number: Option<u64>,

    /// Start date
    #[arg(short, long)]
    pub start: Option<String>,

    /// End date of the most recent window
    #[arg(short, long)]
    pub end: Option<String>,

    /// Bucket width, e.g. 1H, 30min, 1D
    #[arg(short, long)]
    pub group: Option<String>,

    /// Number of weeks
    #[arg(short, long, allow_negative_numbers = true)]
    pub weeks: Option<i64>,

    /// RNG seed; derived from the clock when omitted
    #[arg(long)]
    pub seed: Option<u64>,

    #[arg(long, value_enum)]
    pub anchor: Option<AnchorArg>,

    #[arg(long, value_enum, default_value_t = View::Windows)]
    pub view: View,

    #[arg(long, value_enum, default_value_t = Format::Json)]
    pub format: Format,
}

impl RunArgs {
    /// Overlay flags that were given onto `config`.
    pub fn apply(&self, config: &mut RunConfig) {
        if let Some(n) = self.number {
            config.events = n;
        }
        if let Some(start) = &self.start {
            config.start = start.clone();
        }
        if let Some(end) = &self.end {
            config.end = Some(end.clone());
        }
        if let Some(group) = &self.group {
            config.group = group.clone();
        }
        if let Some(weeks) = self.weeks {
            config.weeks = weeks;
        }
        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }
        if let Some(anchor) = self.anchor {
            config.anchor = anchor.into();
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnchorArg {
    Start,
    Calendar,
}

impl From<AnchorArg> for BucketAnchor {
    fn from(arg: AnchorArg) -> Self {
        match arg {
            AnchorArg::Start => BucketAnchor::RangeStart,
            AnchorArg::Calendar => BucketAnchor::Calendar,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum View {
    /// Bucketed counts per week window
    Windows,
    /// Day-of-week by hour-of-day counts
    Heatmap,
    /// Raw events
    Events,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Format {
    Json,
    Text,
}
