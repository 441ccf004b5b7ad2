//! Movie command handlers
//!
//! Browsing only; nothing here touches the book store.

use anyhow::{bail, Context, Result};

use boook_core::Config;

use crate::movies::MovieClient;
use crate::output::Output;

/// Browse popular movies
pub async fn popular(config: &Config, page: u32, output: &Output) -> Result<()> {
    let client = client_from(config)?;
    let movies = client
        .popular(page)
        .await
        .context("Failed to fetch popular movies")?;

    output.print_movies(&movies);
    Ok(())
}

/// Search movies by title
pub async fn search(config: &Config, query: String, page: u32, output: &Output) -> Result<()> {
    let client = client_from(config)?;
    let movies = client
        .search(&query, page)
        .await
        .context("Movie search failed")?;

    output.print_movies(&movies);
    Ok(())
}

/// List movie genres
pub async fn genres(config: &Config, output: &Output) -> Result<()> {
    let client = client_from(config)?;
    let genres = client.genres().await.context("Failed to fetch genres")?;

    output.print_genres(&genres);
    Ok(())
}

fn client_from(config: &Config) -> Result<MovieClient> {
    let Some(ref api_key) = config.tmdb_api_key else {
        bail!(
            "No TMDB API key configured.\n\
             Set one with: boook config set tmdb_api_key <key>"
        );
    };
    MovieClient::new(api_key.as_str())
}
