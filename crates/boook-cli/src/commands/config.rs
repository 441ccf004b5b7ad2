//! Config command handlers

use anyhow::{bail, Context, Result};

use boook_core::Config;

use crate::output::{Output, OutputFormat};

/// Show current configuration
pub fn show(output: &Output) -> Result<()> {
    let config = Config::load().context("Failed to load configuration")?;

    match output.format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::json!({
                    "data_dir": config.data_dir,
                    "tmdb_api_key": config.tmdb_api_key,
                    "max_search_results": config.max_search_results,
                })
            );
        }
        OutputFormat::Quiet => {
            println!("{}", config.data_dir.display());
        }
        OutputFormat::Human => {
            println!("Configuration:");
            println!("  data_dir:           {}", config.data_dir.display());
            println!(
                "  tmdb_api_key:       {}",
                if config.tmdb_api_key.is_some() {
                    "(set)"
                } else {
                    "(not set)"
                }
            );
            println!("  max_search_results: {}", config.max_search_results);
            println!();
            println!("Config file: {}", Config::config_file_path().display());
        }
    }

    Ok(())
}

/// Set a configuration value
pub fn set(key: String, value: String, output: &Output) -> Result<()> {
    let mut config = Config::load().context("Failed to load configuration")?;

    match key.as_str() {
        "data_dir" => {
            config.data_dir = value.clone().into();
        }
        "tmdb_api_key" => {
            config.tmdb_api_key = if value.is_empty() || value == "none" {
                None
            } else {
                Some(value.clone())
            };
        }
        "max_search_results" => {
            config.max_search_results = value
                .parse()
                .context("Invalid value for max_search_results. Use a positive number.")?;
        }
        _ => {
            bail!(
                "Unknown configuration key: '{}'\n\
                 Valid keys: data_dir, tmdb_api_key, max_search_results",
                key
            );
        }
    }

    config.save().context("Failed to save configuration")?;

    output.success(&format!("Set {} = {}", key, value));

    Ok(())
}
