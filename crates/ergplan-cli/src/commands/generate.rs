use std::path::PathBuf;

use chrono::{NaiveDate, Weekday};
use clap::{Args, ValueEnum};
use ergplan_core::plan::resolve_workouts;
use ergplan_core::{
    generate_linear_plan, reseed_shared, with_shared_source, CoreError, PlanConfig, Schedule,
    ScheduleRequest,
};

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Args)]
pub struct GenerateArgs {
    /// Training minutes per full week
    #[arg(long)]
    minutes: u32,
    /// First day of the plan (YYYY-MM-DD)
    #[arg(long)]
    start: NaiveDate,
    /// Last day of the plan, inclusive (YYYY-MM-DD)
    #[arg(long)]
    end: NaiveDate,
    /// Share of sessions that are high intensity (0.0-1.0)
    #[arg(long, default_value_t = 0.2)]
    high_fraction: f64,
    /// High-intensity workout type (e.g. 2k, 6k, 30r20, AT)
    #[arg(long, default_value = "2k")]
    high: String,
    /// Low-intensity workout type (e.g. UT2, UT1, SS)
    #[arg(long, default_value = "UT2")]
    low: String,
    /// Rest weekdays, overriding the config (e.g. --rest-day sat --rest-day sun)
    #[arg(long = "rest-day")]
    rest_days: Vec<Weekday>,
    /// Fixed RNG seed, overriding the config
    #[arg(long)]
    seed: Option<u64>,
    /// Read configuration from this file instead of the default location
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

pub fn run(args: GenerateArgs) -> Result<(), CoreError> {
    let (high, low) = resolve_workouts(&args.high, &args.low)?;
    let config = match &args.config {
        Some(path) => PlanConfig::load_from(path)?,
        None => PlanConfig::load_or_default(),
    };
    tracing::debug!(?config, "planner configuration");

    let mut request = ScheduleRequest::minutes_with_dates(
        args.minutes,
        args.start,
        args.end,
        args.high_fraction,
        high,
        low,
    )?
    .with_config(&config)?;
    if !args.rest_days.is_empty() {
        request = request.with_rest_days(args.rest_days.clone())?;
    }

    if let Some(seed) = args.seed.or(config.seed) {
        reseed_shared(seed);
    }
    let schedule = with_shared_source(|source| generate_linear_plan(&request, source))?;

    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&schedule)?),
        OutputFormat::Text => print!("{}", render_text(&schedule)),
    }
    Ok(())
}

fn render_text(schedule: &Schedule) -> String {
    let mut out = String::new();
    for week in schedule.weeks() {
        out.push_str(&format!(
            "Week {}  ({} min planned, target {})\n",
            week.index + 1,
            week.total_minutes(),
            week.target_minutes
        ));
        for day in &week.days {
            let label = day
                .date
                .map(|d| d.format("%a %Y-%m-%d").to_string())
                .unwrap_or_else(|| "undated".to_string());
            if day.rest {
                out.push_str(&format!("  {label}  rest\n"));
                continue;
            }
            let sessions: Vec<String> = day
                .emissions
                .iter()
                .map(|e| {
                    format!(
                        "{} {}min @{}bpm RPE{}",
                        e.workout, e.minutes, e.heart_rate, e.rpe
                    )
                })
                .collect();
            out.push_str(&format!("  {label}  {}\n", sessions.join(" | ")));
        }
    }
    out
}
