use async_trait::async_trait;

use super::types::{Circuit, Constructor, Driver, SessionKind, SessionResult};

/// Failures surfaced by a results source.
///
/// `NotFound` is the only variant callers are expected to recover from
/// (a round without a sprint); everything else aborts the computation.
#[derive(thiserror::Error, Debug)]
pub enum SourceError {
    #[error("no data found for {0}")]
    NotFound(String),

    #[error("request to {url} failed")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("could not decode response from {url}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid {field} '{value}' in results feed")]
    Parse { field: &'static str, value: String },
}

impl SourceError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, SourceError::NotFound(_))
    }
}

/// Everything the standings computation needs from upstream.
///
/// Implemented over HTTP by [`super::ErgastClient`]; tests substitute an
/// in-memory source.
#[async_trait]
pub trait ResultsSource: Send + Sync {
    /// Official classification of a race or sprint, in finishing order
    async fn session_results(
        &self,
        season: u32,
        round: u32,
        kind: SessionKind,
    ) -> Result<Vec<SessionResult>, SourceError>;

    async fn circuit(&self, season: u32, round: u32) -> Result<Circuit, SourceError>;

    /// Season roster of drivers, in upstream listing order
    async fn drivers(&self, season: u32) -> Result<Vec<Driver>, SourceError>;

    async fn constructors(&self, season: u32) -> Result<Vec<Constructor>, SourceError>;

    /// Latest round of the season that already has race results
    async fn last_completed_round(&self, season: u32) -> Result<u32, SourceError>;
}
