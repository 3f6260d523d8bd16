use std::path::PathBuf;

use anyhow::Result;
use chrono::{DateTime, Utc};
use clap::Parser;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use canopy_impact::{
    engine::{Engine, SimulationReport},
    observation::StaticProvider,
    scenario::ScenarioLoader,
    species,
};

#[derive(Debug, Parser)]
#[command(author, version, about = "Tree planting impact simulator")]
struct Cli {
    /// Path to the scenario YAML file
    #[arg(long, default_value = "scenarios/temperate_mix.yaml")]
    scenario: PathBuf,

    /// Override simulated years (uses scenario default when omitted)
    #[arg(long)]
    years: Option<u32>,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Print the species catalog and exit
    #[arg(long)]
    list_species: bool,
}

#[derive(Serialize)]
struct ReportEnvelope<'a> {
    scenario: &'a str,
    generated_at: DateTime<Utc>,
    report: &'a SimulationReport,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if cli.list_species {
        println!("{}", serde_json::to_string_pretty(species::catalog())?);
        return Ok(());
    }

    let loader = ScenarioLoader::new(".");
    let scenario = loader.load(&cli.scenario)?;
    let mut provider = StaticProvider::new(scenario.observation.clone());
    let request = scenario.build_request(cli.years)?.observed_by(&mut provider);

    let report = Engine::new().run_with_hook(&request, |year| {
        tracing::debug!(
            year = year.year,
            carbon = year.carbon,
            cumulative = year.cumulative_carbon,
            "simulated year"
        );
    })?;
    tracing::info!(
        scenario = %scenario.name,
        years = report.impact.years,
        total_carbon_kg = report.impact.total_carbon,
        "simulation finished"
    );

    let envelope = ReportEnvelope {
        scenario: &scenario.name,
        generated_at: Utc::now(),
        report: &report,
    };
    println!("{}", serde_json::to_string_pretty(&envelope)?);
    Ok(())
}
