use std::collections::HashMap;

use anyhow::{Context, Result};

use super::accumulate_rounds;
use super::table::{Entity, EntityKind, StandingsTable};
use crate::ergast::ResultsSource;
use crate::scoring::{Exclusions, ScoringConfig, SessionOutcome};

/// Points per driver id for one session
pub fn driver_points(outcome: &SessionOutcome) -> HashMap<String, f64> {
    outcome
        .results
        .iter()
        .map(|r| (r.driver.id.clone(), r.points))
        .collect()
}

/// Drivers' championship after `round` rounds with `exclusions` applied.
///
/// Rows start from the season roster (minus excluded drivers) in upstream
/// order, so drivers level on points stay in roster order.
pub async fn drivers_standings<S: ResultsSource + ?Sized>(
    source: &S,
    scoring: &ScoringConfig,
    exclusions: &Exclusions,
    season: u32,
    round: u32,
) -> Result<StandingsTable> {
    let roster = source
        .drivers(season)
        .await
        .with_context(|| format!("Failed to fetch drivers for {}", season))?;

    let entities: Vec<Entity> = roster
        .into_iter()
        .filter(|d| !exclusions.excludes_driver(d))
        .map(|d| Entity::Driver {
            name: d.full_name(),
            id: d.id,
            number: d.permanent_number,
            team: None,
        })
        .collect();
    tracing::debug!(season, drivers = entities.len(), excluded = ?exclusions.driver_keys(), "driver roster loaded");

    let mut table = StandingsTable::new(EntityKind::Driver, season, entities);

    accumulate_rounds(source, scoring, exclusions, season, round, &mut table, |table, column, outcome| {
        for r in &outcome.results {
            table.set_team(&r.driver.id, &r.constructor.name);
        }
        table.merge_column(column, &driver_points(outcome));
    })
    .await?;

    table.finalize();
    Ok(table)
}
