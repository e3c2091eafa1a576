use std::collections::HashMap;

use anyhow::{Context, Result};

use super::accumulate_rounds;
use super::table::{Entity, EntityKind, StandingsTable};
use crate::ergast::ResultsSource;
use crate::scoring::{Exclusions, ScoringConfig, SessionOutcome};

/// Sum a session's points per constructor id across its drivers
pub fn points_by_constructor(outcome: &SessionOutcome) -> HashMap<String, f64> {
    let mut totals: HashMap<String, f64> = HashMap::new();
    for r in &outcome.results {
        *totals.entry(r.constructor.id.clone()).or_insert(0.0) += r.points;
    }
    totals
}

/// Constructors' championship after `round` rounds.
///
/// Excluded constructors lose their row; excluded drivers are removed from
/// every session before scoring, so their team mates move up.
pub async fn constructors_standings<S: ResultsSource + ?Sized>(
    source: &S,
    scoring: &ScoringConfig,
    exclusions: &Exclusions,
    season: u32,
    round: u32,
) -> Result<StandingsTable> {
    let roster = source
        .constructors(season)
        .await
        .with_context(|| format!("Failed to fetch constructors for {}", season))?;

    let entities: Vec<Entity> = roster
        .into_iter()
        .filter(|c| !exclusions.excludes_constructor(c))
        .map(|c| Entity::Constructor { id: c.id, name: c.name })
        .collect();
    tracing::debug!(
        season,
        constructors = entities.len(),
        excluded = ?exclusions.constructor_keys(),
        "constructor roster loaded"
    );

    let mut table = StandingsTable::new(EntityKind::Constructor, season, entities);

    accumulate_rounds(source, scoring, exclusions, season, round, &mut table, |table, column, outcome| {
        table.merge_column(column, &points_by_constructor(outcome));
    })
    .await?;

    table.finalize();
    Ok(table)
}
