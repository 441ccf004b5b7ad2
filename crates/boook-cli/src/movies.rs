//! Movie browsing
//!
//! Thin client for the TMDB API. Loosely integrated: nothing here reads or
//! writes the book store, and failures surface as plain errors at the
//! command boundary.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::time::Duration;

const TMDB_API: &str = "https://api.themoviedb.org/3";

/// Fetch timeout in seconds
const FETCH_TIMEOUT: u64 = 10;

/// One page of movie results
#[derive(Debug, Clone, Deserialize)]
pub struct MoviePage {
    pub page: u32,
    #[serde(default)]
    pub results: Vec<MovieSummary>,
    pub total_pages: u32,
}

/// A movie as listed by the browse endpoints
#[derive(Debug, Clone, Deserialize)]
pub struct MovieSummary {
    pub id: u64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub vote_average: f32,
    #[serde(default)]
    pub genre_ids: Vec<u64>,
}

impl MovieSummary {
    /// Whether the entry carries enough metadata to render
    pub fn is_renderable(&self) -> bool {
        self.title.is_some() && self.poster_path.is_some()
    }

    /// TMDB's 0-10 score on the 0-5 scale the rest of the app uses
    pub fn rating_out_of_five(&self) -> f32 {
        self.vote_average.clamp(0.0, 10.0) / 2.0
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Genre {
    pub id: u64,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
struct GenreList {
    genres: Vec<Genre>,
}

/// TMDB client
pub struct MovieClient {
    api_key: String,
    client: reqwest::Client,
}

impl MovieClient {
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(FETCH_TIMEOUT))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            api_key: api_key.into(),
            client,
        })
    }

    /// Browse popular movies
    pub async fn popular(&self, page: u32) -> Result<MoviePage> {
        let response = self
            .client
            .get(format!("{}/movie/popular", TMDB_API))
            .query(&[
                ("api_key", self.api_key.as_str()),
                ("page", &page.to_string()),
            ])
            .send()
            .await
            .context("Failed to reach TMDB")?
            .error_for_status()
            .context("TMDB rejected the request")?;

        response.json().await.context("Invalid TMDB response")
    }

    /// Search movies by title
    pub async fn search(&self, query: &str, page: u32) -> Result<MoviePage> {
        let response = self
            .client
            .get(format!("{}/search/movie", TMDB_API))
            .query(&[
                ("api_key", self.api_key.as_str()),
                ("query", query),
                ("include_adult", "false"),
                ("page", &page.to_string()),
            ])
            .send()
            .await
            .context("Failed to reach TMDB")?
            .error_for_status()
            .context("TMDB rejected the request")?;

        response.json().await.context("Invalid TMDB response")
    }

    /// List the movie genres
    pub async fn genres(&self) -> Result<Vec<Genre>> {
        let response = self
            .client
            .get(format!("{}/genre/movie/list", TMDB_API))
            .query(&[("api_key", self.api_key.as_str())])
            .send()
            .await
            .context("Failed to reach TMDB")?
            .error_for_status()
            .context("TMDB rejected the request")?;

        let list: GenreList = response.json().await.context("Invalid TMDB response")?;
        Ok(list.genres)
    }
}
