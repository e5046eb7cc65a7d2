//! Command-line front end for culture overrides.
//!
//! Usage:
//!   culture-overrides resolve <neutral>              # Specific culture in effect
//!   culture-overrides candidates <neutral>           # Catalog cultures for a language
//!   culture-overrides set <neutral> <specific>       # Choose a specific culture
//!   culture-overrides reset <neutral>                # Go back to the default
//!   culture-overrides list                           # Stored overrides as JSON
//!
//! Optional environment variables:
//! - CULTURE_SETTINGS_FILE (defaults to data/settings.json)
//! - CULTURE_SETTINGS_KEY (defaults to NeutralCultureCountyOverrides)

use anyhow::{bail, Context, Result};
use culture_overrides::config::Config;
use culture_overrides::i18n::{
    neutral_of, CultureOverrideEvent, CultureOverrideResolver, SpecificLocale, StaticCatalog,
};
use culture_overrides::settings::JsonFileSettingsStore;
use serde_json::json;
use tracing::info;

const USAGE: &str = "Usage: culture-overrides <resolve|candidates|set|reset|list> [args]";

fn main() -> Result<()> {
    // Load .env file (ignored when absent)
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("culture_overrides=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = Config::from_env()?;
    let store = JsonFileSettingsStore::new(&config.settings_file, &config.settings_key);
    let mut resolver = CultureOverrideResolver::new(StaticCatalog::builtin(), store)
        .with_context(|| format!("Failed to load overrides from {}", config.settings_file))?;

    resolver.subscribe(|event: &CultureOverrideEvent| {
        info!("Override changed: {} -> {}", event.neutral(), event.specific());
    });

    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = args.first().map(String::as_str).unwrap_or_default();

    match (command, args.get(1..).unwrap_or_default()) {
        ("resolve", [neutral]) => {
            let neutral = neutral_of(neutral)?;
            match resolver.resolve(&neutral) {
                Some(specific) => println!("{}", specific),
                None => bail!("No specific culture is known for '{}'", neutral),
            }
        }
        ("candidates", [neutral]) => {
            let neutral = neutral_of(neutral)?;
            let default = resolver.default_specific(&neutral);
            for candidate in resolver.candidates(&neutral) {
                let marker = if Some(&candidate) == default.as_ref() { " (default)" } else { "" };
                println!("{}{}", candidate, marker);
            }
        }
        ("set", [neutral, specific]) => {
            resolver
                .set_override_tags(neutral, specific)
                .context("Failed to set culture override")?;
            let neutral = neutral_of(neutral)?;
            if let Some(specific) = resolver.resolve(&neutral) {
                println!("{} -> {}", neutral, specific);
            }
        }
        ("reset", [neutral]) => {
            let neutral = neutral_of(neutral)?;
            let default: SpecificLocale = match resolver.default_specific(&neutral) {
                Some(default) => default,
                None => bail!("No specific culture is known for '{}'", neutral),
            };
            resolver
                .set_override(&neutral, &default)
                .context("Failed to reset culture override")?;
            println!("{} -> {}", neutral, default);
        }
        ("list", []) => {
            let overrides: serde_json::Map<String, serde_json::Value> = resolver
                .overrides()
                .iter()
                .map(|(neutral, specific)| (neutral.to_string(), json!(specific)))
                .collect();
            println!("{}", serde_json::to_string_pretty(&overrides)?);
        }
        _ => bail!(USAGE),
    }

    Ok(())
}
