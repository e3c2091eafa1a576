use anyhow::{Context, Result};

use crate::ergast::{Location, ResultsSource};

/// Short uppercase label for a circuit, used as a standings column header.
///
/// Distinct circuits can share a label (two venues in one country); columns
/// are positional, so a clash only affects the header text.
pub fn location_code(location: &Location) -> String {
    let code = match (location.country.as_str(), location.locality.as_str()) {
        ("USA", "Miami") => "MIA".to_string(),
        ("USA", "Austin") => "TEX".to_string(),
        ("USA", "Las Vegas") => "VEG".to_string(),
        ("Austria", _) => "AUT".to_string(),
        (country, _) => country.chars().take(3).collect(),
    };
    code.to_uppercase()
}

/// Resolve the column label for a round of a season
pub async fn circuit_location_code<S: ResultsSource + ?Sized>(
    source: &S,
    season: u32,
    round: u32,
) -> Result<String> {
    let circuit = source
        .circuit(season, round)
        .await
        .with_context(|| format!("Failed to fetch circuit for {} round {}", season, round))?;
    let code = location_code(&circuit.location);
    tracing::debug!(season, round, circuit = %circuit.name, %code, "resolved location code");
    Ok(code)
}
