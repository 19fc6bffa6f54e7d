use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use period_engine::boundary::{format_local, parse_instant};
use period_engine::{
    derive_previous_period, EndOfDay, PeriodComparison, PeriodQuery, RangeReport, Resolver,
    ResolverConfig,
};

#[derive(Parser)]
#[command(
    name = "period",
    version,
    about = "Resolve dashboard reporting periods and their comparison ranges"
)]
struct Cli {
    #[command(flatten)]
    settings: Settings,

    /// Log filter used when RUST_LOG is unset (e.g. "debug", "period_engine=trace")
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct Settings {
    /// JSON configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Business timezone (IANA name); overrides the config file
    #[arg(long, global = true)]
    timezone: Option<String>,

    /// Where a day ends: last_minute (23:59:00) or last_instant (23:59:59.999)
    #[arg(long, global = true)]
    end_of_day: Option<EndOfDay>,
}

#[derive(Subcommand)]
enum Command {
    /// Resolve a view mode and/or explicit dates into current and previous periods
    Resolve {
        /// today, yesterday, week, month, year or custom
        #[arg(short = 'm', long)]
        view_mode: Option<String>,

        /// Start date (YYYY-MM-DD or RFC 3339)
        #[arg(long = "from")]
        date_from: Option<String>,

        /// End date (YYYY-MM-DD or RFC 3339)
        #[arg(long = "to")]
        date_to: Option<String>,

        /// Reference instant (RFC 3339); defaults to the system clock
        #[arg(long)]
        now: Option<String>,
    },
    /// Print the start and end of one calendar day in the business timezone
    Day {
        /// Date-like input (YYYY-MM-DD or RFC 3339)
        date: String,
    },
    /// Derive the equal-length period immediately before an explicit range
    Previous {
        /// Range start (RFC 3339)
        #[arg(long)]
        from: String,

        /// Range end (RFC 3339)
        #[arg(long)]
        to: String,
    },
    /// Percentage change of a metric against its previous-period value
    Compare {
        #[arg(long, allow_negative_numbers = true)]
        current: f64,

        #[arg(long, allow_negative_numbers = true)]
        previous: Option<f64>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    let resolver = build_resolver(&cli.settings)?;
    let tz = *resolver.timezone();

    let output = match cli.command {
        Command::Resolve {
            view_mode,
            date_from,
            date_to,
            now,
        } => {
            let now = resolve_now(now.as_deref())?;
            let query = PeriodQuery {
                view_mode,
                date_from,
                date_to,
            };
            let resolved = resolver.resolve(&query, now)?;
            tracing::info!(now = %format_local(now, &tz), "resolved period");
            serde_json::to_value(resolver.report(&resolved))?
        }
        Command::Day { date } => {
            let Some(day) = resolver.day_bounds(&date) else {
                bail!("no day boundary for '{date}' in {}", tz.name());
            };
            serde_json::to_value(RangeReport::new(&day, &tz))?
        }
        Command::Previous { from, to } => {
            let from = parse_instant(&from).context("invalid --from")?;
            let to = parse_instant(&to).context("invalid --to")?;
            if from > to {
                bail!("--from must not be after --to");
            }
            let previous = derive_previous_period(Some(from), Some(to))
                .context("previous period is out of range")?;
            serde_json::to_value(RangeReport::new(&previous, &tz))?
        }
        Command::Compare { current, previous } => {
            serde_json::to_value(PeriodComparison::new(current, previous))?
        }
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn build_resolver(settings: &Settings) -> Result<Resolver> {
    let mut config = match &settings.config {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("failed to read config {}", path.display()))?;
            ResolverConfig::from_json(&raw)
                .with_context(|| format!("failed to load config {}", path.display()))?
        }
        None => ResolverConfig::default(),
    };

    if let Some(tz) = &settings.timezone {
        config.timezone = tz.clone();
    }
    if let Some(policy) = settings.end_of_day {
        config.end_of_day = policy;
    }

    tracing::debug!(?config, "resolver configuration");
    Resolver::new(config).context("invalid resolver configuration")
}

fn resolve_now(raw: Option<&str>) -> Result<DateTime<Utc>> {
    match raw {
        Some(s) => parse_instant(s).context("invalid --now"),
        None => Ok(Utc::now()),
    }
}
