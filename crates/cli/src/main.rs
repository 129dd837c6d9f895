use anyhow::Context;
use clap::{Parser, Subcommand};
use lineup_core::domain::beach::{Beach, BeachCatalog};
use lineup_core::domain::forecast::{Conditions, WaveBand};
use lineup_core::domain::level::SkillLevel;
use lineup_core::ingest::provider::StaticForecastProvider;
use lineup_core::ingest::service::{ForecastService, ForecastServiceOptions};
use lineup_core::planner::Planner;
use lineup_core::store::{MemoryAvailabilityStore, MemorySessionStore};
use lineup_core::suitability::score_for_level;
use std::path::PathBuf;
use std::str::FromStr;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod fixtures;

#[derive(Debug, Parser)]
#[command(name = "lineup")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Score wave and wind readings for each skill level.
    Rate(RateArgs),
    /// Normalize a provider reading into a forecast snapshot.
    Forecast(ForecastArgs),
    /// Rank upcoming sessions for a surfer.
    Plan(PlanArgs),
    /// List the beach catalog, or search it by name.
    Beaches(BeachesArgs),
}

#[derive(Debug, clap::Args)]
struct RateArgs {
    /// Wave height in feet.
    #[arg(long)]
    wave_height_ft: f64,

    /// Wind speed in knots.
    #[arg(long)]
    wind_speed_knots: f64,

    /// Score a single level (beginner|intermediate|advanced|expert)
    /// instead of all four.
    #[arg(long)]
    level: Option<String>,

    /// Pretty-print the JSON output.
    #[arg(long)]
    pretty: bool,
}

#[derive(Debug, clap::Args)]
struct ForecastArgs {
    /// Beach id from the catalog.
    #[arg(long)]
    beach: String,

    /// JSON file with the provider reading for that beach.
    #[arg(long)]
    readings: PathBuf,

    /// Treat this RFC3339 instant as now. Defaults to the current time.
    #[arg(long)]
    now: Option<String>,

    /// Pretty-print the JSON output.
    #[arg(long)]
    pretty: bool,
}

#[derive(Debug, clap::Args)]
struct PlanArgs {
    /// Surfer the plan is for.
    #[arg(long)]
    user: String,

    /// The surfer's level (beginner|intermediate|advanced|expert).
    #[arg(long)]
    level: Option<String>,

    /// Beach whose conditions feed the forecast term.
    #[arg(long)]
    beach: String,

    /// JSON file with candidate and past sessions.
    #[arg(long)]
    sessions: PathBuf,

    /// JSON file with a provider reading for the beach. Without it the
    /// plan is ranked with no forecast term.
    #[arg(long)]
    readings: Option<PathBuf>,

    /// JSON file with the surfer's weekly availability windows.
    #[arg(long)]
    availability: Option<PathBuf>,

    /// Rank as of this RFC3339 instant instead of now.
    #[arg(long)]
    generated_at: Option<String>,

    /// Pretty-print the JSON output.
    #[arg(long)]
    pretty: bool,
}

#[derive(Debug, clap::Args)]
struct BeachesArgs {
    /// Search query; at least two characters. Omit to list everything.
    #[arg(long)]
    query: Option<String>,

    /// Pretty-print the JSON output.
    #[arg(long)]
    pretty: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = lineup_core::config::Settings::from_env()?;
    let _sentry_guard = init_sentry(&settings);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer())
        .init();

    let cli = Cli::parse();
    let catalog = load_catalog(&settings)?;

    let result = match cli.command {
        Command::Rate(args) => run_rate(args),
        Command::Forecast(args) => run_forecast(args, catalog).await,
        Command::Plan(args) => run_plan(args, catalog).await,
        Command::Beaches(args) => run_beaches(args, catalog),
    };

    if let Err(err) = &result {
        sentry_anyhow::capture_anyhow(err);
    }
    result
}

fn run_rate(args: RateArgs) -> anyhow::Result<()> {
    let conditions = Conditions::new(args.wave_height_ft, args.wind_speed_knots)?;
    let band = WaveBand::classify(conditions.wave_height_ft);

    let output = match resolve_level(args.level.as_deref())? {
        Some(level) => serde_json::json!({
            "wave_height_ft": conditions.wave_height_ft,
            "wind_speed_knots": conditions.wind_speed_knots,
            "wave_band": band.label(),
            "level": level.as_str(),
            "score": score_for_level(
                conditions.wave_height_ft,
                conditions.wind_speed_knots,
                level,
            ),
        }),
        None => serde_json::json!({
            "wave_height_ft": conditions.wave_height_ft,
            "wind_speed_knots": conditions.wind_speed_knots,
            "wave_band": band.label(),
            "suitability": conditions.suitability(),
        }),
    };
    print_json(&output, args.pretty)
}

async fn run_forecast(args: ForecastArgs, catalog: BeachCatalog) -> anyhow::Result<()> {
    let now = resolve_instant(args.now.as_deref())?;
    let beach = catalog
        .get(&args.beach)
        .with_context(|| format!("unknown beach id {}", args.beach))?;

    let mut provider = StaticForecastProvider::default();
    provider.insert(beach.id.clone(), fixtures::load_readings(&args.readings)?);

    let service = ForecastService::new(provider, ForecastServiceOptions::from_env());
    let fetched = service.current(beach, now).await?;
    print_json(&fetched, args.pretty)
}

async fn run_plan(args: PlanArgs, catalog: BeachCatalog) -> anyhow::Result<()> {
    let generated_at = resolve_instant(args.generated_at.as_deref())?;
    let skill_level = resolve_level(args.level.as_deref())?;
    let sessions = fixtures::load_sessions(&args.sessions)?;

    let mut provider = StaticForecastProvider::default();
    let mut options = ForecastServiceOptions::from_env();
    match &args.readings {
        Some(path) => provider.insert(args.beach.clone(), fixtures::load_readings(path)?),
        // Retrying an empty fixture provider only burns time.
        None => options.fetch_retries = 1,
    }

    let mut availability = MemoryAvailabilityStore::default();
    if let Some(path) = &args.availability {
        availability.insert(args.user.clone(), fixtures::load_availability(path)?);
    }

    let planner = Planner::new(
        ForecastService::new(provider, options),
        MemorySessionStore::new(sessions),
        availability,
        catalog,
    );

    let plan = planner
        .plan(&args.user, skill_level, &args.beach, generated_at)
        .await?;

    tracing::info!(
        user = %args.user,
        beach = %args.beach,
        recommendations = plan.recommendations.len(),
        "ranked session plan"
    );
    print_json(&plan, args.pretty)
}

fn run_beaches(args: BeachesArgs, catalog: BeachCatalog) -> anyhow::Result<()> {
    let beaches: Vec<&Beach> = match args.query.as_deref() {
        Some(query) => catalog.search(query),
        None => catalog.iter().collect(),
    };
    print_json(&beaches, args.pretty)
}

fn init_sentry(settings: &lineup_core::config::Settings) -> Option<sentry::ClientInitGuard> {
    let dsn = settings.sentry_dsn.as_deref()?;
    Some(sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    )))
}

fn load_catalog(settings: &lineup_core::config::Settings) -> anyhow::Result<BeachCatalog> {
    match settings.beach_catalog_path.as_deref() {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read beach catalog {path}"))?;
            BeachCatalog::from_json(&json)
        }
        None => Ok(BeachCatalog::builtin()),
    }
}

fn resolve_instant(arg: Option<&str>) -> anyhow::Result<chrono::DateTime<chrono::Utc>> {
    if let Some(s) = arg {
        let parsed = chrono::DateTime::parse_from_rfc3339(s)
            .with_context(|| format!("invalid RFC3339 timestamp {s:?}"))?;
        return Ok(parsed.with_timezone(&chrono::Utc));
    }
    Ok(chrono::Utc::now())
}

fn resolve_level(arg: Option<&str>) -> anyhow::Result<Option<SkillLevel>> {
    arg.map(SkillLevel::from_str).transpose()
}

fn print_json<T: serde::Serialize>(value: &T, pretty: bool) -> anyhow::Result<()> {
    let out = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{out}");
    Ok(())
}
