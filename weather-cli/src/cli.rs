use anyhow::Context;
use clap::{Parser, Subcommand};
use inquire::{CustomUserError, Password, PasswordDisplayMode, validator::Validation};
use std::{collections::HashMap, path::Path};
use weather_core::{
    Config, ProviderId, TemperatureUnit,
    provider::{geocoder_from_config, weather_source_from_config},
    report_for_ip, report_for_query,
};

/// Used when neither `--units` nor the config file picks a unit.
const DEFAULT_UNITS: TemperatureUnit = TemperatureUnit::Fahrenheit;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather", version, about = "Current weather where you are, or anywhere else")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the API key for a provider in the config file.
    Configure {
        /// Provider short name: "radar" or "openweathermap".
        provider: String,
    },

    /// Show current weather. Without an address, locate by public IP.
    Show {
        /// Address or location name.
        address: Option<String>,

        /// kelvin, celsius or fahrenheit.
        #[arg(long, short)]
        units: Option<TemperatureUnit>,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command.unwrap_or(Command::Show { address: None, units: None }) {
            Command::Configure { provider } => configure(&provider),
            Command::Show { address, units } => show(address.as_deref(), units).await,
        }
    }
}

fn configure(provider: &str) -> anyhow::Result<()> {
    let id = ProviderId::try_from(provider)?;
    let mut config = Config::load()?;

    let api_key = Password::new(&format!("API key for {id}:"))
        .with_display_mode(PasswordDisplayMode::Masked)
        .with_validator(validate_api_key)
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;

    config.upsert_provider_api_key(id, api_key.trim().to_string());
    let path = config.save()?;

    tracing::info!(provider = %id, "stored API key");
    println!("Saved {id} API key to {}", path.display());
    Ok(())
}

fn validate_api_key(input: &str) -> Result<Validation, CustomUserError> {
    if input.trim().is_empty() {
        Ok(Validation::Invalid("API key cannot be empty".into()))
    } else {
        Ok(Validation::Valid)
    }
}

/// Config file, then `.env` in the working directory, then the process
/// environment. Later sources win.
fn resolve_config() -> anyhow::Result<Config> {
    let mut config = Config::load()?;
    apply_dotenv(&mut config, Path::new(".env"))?;
    config.apply_env();
    Ok(config)
}

fn apply_dotenv(config: &mut Config, path: &Path) -> anyhow::Result<()> {
    if !path.exists() {
        return Ok(());
    }

    let vars = dotenvy::from_path_iter(path)
        .and_then(|iter| iter.collect::<Result<HashMap<String, String>, _>>())
        .with_context(|| format!("Failed to read {}", path.display()))?;

    tracing::debug!(path = %path.display(), "applying .env file");
    config.apply_env_with(|name| vars.get(name).cloned());
    Ok(())
}

/// `--units`, then the config file, then fahrenheit.
fn effective_units(flag: Option<TemperatureUnit>, config: &Config) -> TemperatureUnit {
    flag.or(config.units).unwrap_or(DEFAULT_UNITS)
}

async fn show(address: Option<&str>, units: Option<TemperatureUnit>) -> anyhow::Result<()> {
    let config = resolve_config().context("Failed to load configuration")?;
    let units = effective_units(units, &config);

    let geocoder = geocoder_from_config(&config)?;
    let source = weather_source_from_config(&config)?;

    let report = match address {
        Some(query) => report_for_query(geocoder.as_ref(), source.as_ref(), query, units)
            .await
            .with_context(|| format!("Failed to get weather for '{query}'"))?,
        None => report_for_ip(geocoder.as_ref(), source.as_ref(), units)
            .await
            .context("Failed to get weather for your location")?,
    };

    println!("{report}");
    Ok(())
}
