use clap::Parser;
use importer::{
    StandardsLoader,
    canonical::{CanonicalSeason, CanonicalTransformer, CanonicalValidator},
    score_season,
};
use rust_decimal::Decimal;
use scoring::ScoringOptions;
use scoring::services::HOME_CLUB;
use scoring::services::nev_brooks::DEFAULT_BASELINE_SECONDS;
use scoring::services::rules::CompetitionRulesProvider;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "score")]
#[command(about = "Club time trial season scoring", long_about = None)]
#[command(version)]
struct Cli {
    /// Canonical season JSON file.
    season: PathBuf,

    #[arg(long, env = "STANDARDS_DIR", default_value = "./data/standards")]
    standards_dir: PathBuf,

    #[arg(long, env = "COMPETITION_RULES", default_value = "./data/competition-rules.json")]
    rules: PathBuf,

    /// Where to write scored rides and standings. Defaults to `<season>.scored.json`.
    #[arg(short, long)]
    output: Option<PathBuf>,

    #[arg(long, env = "HOME_CLUB", default_value = HOME_CLUB)]
    home_club: String,

    #[arg(long, env = "NEV_BROOKS_BASELINE", default_value_t = DEFAULT_BASELINE_SECONDS)]
    nev_brooks_baseline: i64,

    #[arg(long)]
    validate_only: bool,

    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("score={},importer={},scoring={}", log_level, log_level, log_level).into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Loading canonical season from: {}", cli.season.display());

    let json_content = tokio::fs::read_to_string(&cli.season).await?;
    let canonical: CanonicalSeason = serde_json::from_str(&json_content)?;

    tracing::info!(
        "Loaded season {} (v{}): {} events, {} rides",
        canonical.season,
        canonical.format_version,
        canonical.calendar.len(),
        canonical.rides.len()
    );

    tracing::info!("Validating canonical format...");
    let validation_report = CanonicalValidator::validate(&canonical)?;
    validation_report.log_warnings();
    tracing::info!("✓ Validation successful!");

    if cli.validate_only {
        return Ok(());
    }

    let options = ScoringOptions {
        nev_brooks_baseline_seconds: Decimal::from(cli.nev_brooks_baseline),
        home_club: cli.home_club.trim().to_uppercase(),
        ..ScoringOptions::default()
    };
    let input = CanonicalTransformer::new(&options).transform(canonical)?;

    tracing::info!("Loading competition rules from: {}", cli.rules.display());
    let rules_json = tokio::fs::read_to_string(&cli.rules).await?;
    let rules = CompetitionRulesProvider::from_json(&rules_json)?;

    tracing::info!("Scanning standards directory: {}", cli.standards_dir.display());
    let standards = StandardsLoader::load_directory(&cli.standards_dir).await?;

    let output = score_season(input, &rules, &standards)?;

    let output_path = cli
        .output
        .unwrap_or_else(|| cli.season.with_extension("scored.json"));
    let json = serde_json::to_string_pretty(&output)?;
    tokio::fs::write(&output_path, json).await?;

    tracing::info!(
        "✓ Scored {} events, wrote {} standings tables to {}",
        output.summary.events_scored,
        output.standings.competitions.len() + 1,
        output_path.display()
    );

    Ok(())
}
