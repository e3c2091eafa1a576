use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;

use super::source::{ResultsSource, SourceError};
use super::types::{Circuit, Constructor, Driver, SessionKind, SessionResult};
use super::wire::{Envelope, MrData, WireRace};

pub const DEFAULT_BASE_URL: &str = "https://api.jolpi.ca/ergast/f1";

const REQUEST_TIMEOUT_SECONDS: u64 = 30;
// Rows per request; longer listings are fetched page by page
const PAGE_LIMIT: usize = 100;

/// HTTP client for an Ergast-compatible results API
#[derive(Clone, Debug)]
pub struct ErgastClient {
    http: reqwest::Client,
    base_url: String,
}

/// Create a client against `base_url` (trailing slashes are ignored)
pub fn create_client(base_url: &str) -> Result<ErgastClient> {
    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECONDS))
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .build()
        .context("Failed to create HTTP client")?;

    Ok(ErgastClient {
        http,
        base_url: base_url.trim_end_matches('/').to_string(),
    })
}

fn endpoint_url(base_url: &str, path: &str, offset: usize) -> String {
    format!(
        "{}/{}.json?limit={}&offset={}",
        base_url.trim_end_matches('/'),
        path,
        PAGE_LIMIT,
        offset
    )
}

/// Offset of the next page once `fetched` rows are in, or `None` when the
/// listing is complete. A page that adds nothing before `total` is reached
/// means the feed's count is wrong.
fn next_offset(
    fetched: usize,
    page_len: usize,
    total: Option<usize>,
) -> Result<Option<usize>, SourceError> {
    match total {
        Some(total) if fetched < total => {
            if page_len == 0 {
                return Err(SourceError::Parse {
                    field: "total",
                    value: total.to_string(),
                });
            }
            Ok(Some(fetched))
        }
        _ => Ok(None),
    }
}

impl ErgastClient {
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, offset: usize) -> Result<T, SourceError> {
        let url = endpoint_url(&self.base_url, path, offset);
        tracing::debug!(%url, "fetching");

        let response = self.http.get(&url).send().await.map_err(|source| SourceError::Http {
            url: url.clone(),
            source,
        })?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(SourceError::NotFound(path.to_string()));
        }

        let bytes = response
            .error_for_status()
            .map_err(|source| SourceError::Http {
                url: url.clone(),
                source,
            })?
            .bytes()
            .await
            .map_err(|source| SourceError::Http {
                url: url.clone(),
                source,
            })?;

        serde_json::from_slice(&bytes).map_err(|source| SourceError::Decode { url, source })
    }

    /// Every row of a listing, following pages until the feed's total
    async fn get_rows<T, F>(&self, path: &str, rows: F) -> Result<Vec<T>, SourceError>
    where
        F: Fn(MrData) -> Vec<T>,
    {
        let mut all = Vec::new();
        let mut offset = 0;
        loop {
            let envelope: Envelope = self.get(path, offset).await?;
            let total = envelope.data.total()?;
            tracing::trace!(path, offset = ?envelope.data.offset, ?total, "page received");
            let page = rows(envelope.data);
            let page_len = page.len();
            all.extend(page);

            match next_offset(all.len(), page_len, total)? {
                Some(next) => {
                    tracing::debug!(path, fetched = all.len(), ?total, "fetching next page");
                    offset = next;
                }
                None => return Ok(all),
            }
        }
    }

    /// The single race entry of a season/round query, or `NotFound`
    async fn race(&self, path: &str) -> Result<WireRace, SourceError> {
        let envelope: Envelope = self.get(path, 0).await?;
        envelope
            .data
            .race_table
            .and_then(|table| table.races.into_iter().next())
            .ok_or_else(|| SourceError::NotFound(path.to_string()))
    }
}

#[async_trait]
impl ResultsSource for ErgastClient {
    async fn session_results(
        &self,
        season: u32,
        round: u32,
        kind: SessionKind,
    ) -> Result<Vec<SessionResult>, SourceError> {
        let path = format!("{}/{}/{}", season, round, kind.endpoint());
        let wire_results = self
            .get_rows(&path, |data| {
                data.race_table
                    .and_then(|table| table.races.into_iter().next())
                    .map(|race| match kind {
                        SessionKind::Race => race.results,
                        SessionKind::Sprint => race.sprint_results,
                    })
                    .unwrap_or_default()
            })
            .await?;
        if wire_results.is_empty() {
            return Err(SourceError::NotFound(path));
        }

        let results = wire_results
            .into_iter()
            .map(SessionResult::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        tracing::debug!(season, round, %kind, entrants = results.len(), "session results fetched");
        Ok(results)
    }

    async fn circuit(&self, season: u32, round: u32) -> Result<Circuit, SourceError> {
        let path = format!("{}/{}/circuits", season, round);
        let envelope: Envelope = self.get(&path, 0).await?;
        envelope
            .data
            .circuit_table
            .and_then(|table| table.circuits.into_iter().next())
            .map(Circuit::from)
            .ok_or(SourceError::NotFound(path))
    }

    async fn drivers(&self, season: u32) -> Result<Vec<Driver>, SourceError> {
        let path = format!("{}/drivers", season);
        let drivers: Vec<Driver> = self
            .get_rows(&path, |data| {
                data.driver_table
                    .map(|table| table.drivers.into_iter().map(Driver::from).collect())
                    .unwrap_or_default()
            })
            .await?;
        if drivers.is_empty() {
            return Err(SourceError::NotFound(path));
        }
        Ok(drivers)
    }

    async fn constructors(&self, season: u32) -> Result<Vec<Constructor>, SourceError> {
        let path = format!("{}/constructors", season);
        let constructors: Vec<Constructor> = self
            .get_rows(&path, |data| {
                data.constructor_table
                    .map(|table| table.constructors.into_iter().map(Constructor::from).collect())
                    .unwrap_or_default()
            })
            .await?;
        if constructors.is_empty() {
            return Err(SourceError::NotFound(path));
        }
        Ok(constructors)
    }

    async fn last_completed_round(&self, season: u32) -> Result<u32, SourceError> {
        let path = format!("{}/last/results", season);
        let race = self.race(&path).await?;
        tracing::debug!(season, race = %race.race_name, "latest race with results");
        race.round.trim().parse().map_err(|_| SourceError::Parse {
            field: "round",
            value: race.round.clone(),
        })
    }
}
