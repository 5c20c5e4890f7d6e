use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use ga_monitor_core::{format_date, DateRange, GaParameters};

use crate::platform::logging::LogDestination;

/// Start, watch and stop genetic-algorithm scheduling jobs.
#[derive(Parser, Debug)]
#[command(name = "ga_monitor", version, about = "Monitor GA scheduling jobs")]
pub struct Cli {
    /// Path to a RON config file (default: ./ga_monitor.ron)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Where log output goes; overrides the config file
    #[arg(long, value_enum, global = true)]
    pub log: Option<LogDestination>,

    /// Log at debug level
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start a GA job and follow its progress until it ends
    Run(RunArgs),
    /// Store a bearer token for later runs
    Login {
        #[arg(long)]
        token: String,
        #[arg(long)]
        username: Option<String>,
    },
    /// Forget the stored token
    Logout,
}

#[derive(Args, Debug, Clone, Default)]
pub struct RunArgs {
    /// First day of the schedule (YYYY-MM-DD); defaults to this week's Monday
    #[arg(long)]
    pub start: Option<String>,

    /// Last day of the schedule (YYYY-MM-DD); defaults to this week's Sunday
    #[arg(long)]
    pub end: Option<String>,

    /// Milliseconds between status queries
    #[arg(long)]
    pub interval_ms: Option<u64>,

    /// Backend base URL, e.g. http://localhost:8090/api
    #[arg(long)]
    pub base_url: Option<String>,

    #[arg(long)]
    pub population_size: Option<u32>,
    #[arg(long)]
    pub max_generations: Option<u32>,
    #[arg(long)]
    pub mutation_rate: Option<f64>,
    #[arg(long)]
    pub crossover_rate: Option<f64>,
    #[arg(long)]
    pub tournament_size: Option<u32>,
    #[arg(long)]
    pub penalty_hard_constraint: Option<u32>,
    #[arg(long)]
    pub penalty_under_staffing: Option<u32>,
    #[arg(long)]
    pub penalty_over_staffing: Option<u32>,
    #[arg(long)]
    pub penalty_forbidden_succession: Option<u32>,
}

impl RunArgs {
    pub fn parameters(&self) -> GaParameters {
        GaParameters {
            population_size: self.population_size,
            max_generations: self.max_generations,
            mutation_rate: self.mutation_rate,
            crossover_rate: self.crossover_rate,
            tournament_size: self.tournament_size,
            penalty_hard_constraint: self.penalty_hard_constraint,
            penalty_under_staffing: self.penalty_under_staffing,
            penalty_over_staffing: self.penalty_over_staffing,
            penalty_forbidden_succession: self.penalty_forbidden_succession,
        }
    }

    /// Start and end date as typed, with missing ones taken from the week of `today`.
    pub fn dates(&self, today: NaiveDate) -> (String, String) {
        let week = DateRange::current_week(today);
        (
            self.start
                .clone()
                .unwrap_or_else(|| format_date(week.start())),
            self.end.clone().unwrap_or_else(|| format_date(week.end())),
        )
    }
}
