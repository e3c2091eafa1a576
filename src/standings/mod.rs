pub mod constructors;
pub mod drivers;
pub mod location;
pub mod table;

pub use constructors::{constructors_standings, points_by_constructor};
pub use drivers::{driver_points, drivers_standings};
pub use location::{circuit_location_code, location_code};
pub use table::{Entity, EntityKind, RoundColumn, StandingsRow, StandingsTable};

use anyhow::Result;

use crate::ergast::{ResultsSource, SessionKind};
use crate::scoring::{race_results, sprint_results, Exclusions, ScoringConfig, SessionOutcome};

/// Walk rounds 1..=`round` in order, re-scoring each sprint (when the round
/// has one) and race, and hand every session to `merge` together with the
/// column it should land in.
///
/// Requests are made one at a time: circuit, then sprint, then race.
async fn accumulate_rounds<S, F>(
    source: &S,
    scoring: &ScoringConfig,
    exclusions: &Exclusions,
    season: u32,
    round: u32,
    table: &mut StandingsTable,
    mut merge: F,
) -> Result<()>
where
    S: ResultsSource + ?Sized,
    F: FnMut(&mut StandingsTable, RoundColumn, &SessionOutcome),
{
    for round_curr in 1..=round {
        let code = circuit_location_code(source, season, round_curr).await?;

        let sprint = sprint_results(source, scoring, exclusions, season, round_curr).await?;
        if !sprint.is_empty() {
            merge(table, RoundColumn::new(round_curr, SessionKind::Sprint, &code), &sprint);
        }

        let race = race_results(source, scoring, exclusions, season, round_curr).await?;
        merge(table, RoundColumn::new(round_curr, SessionKind::Race, &code), &race);

        tracing::info!(season, round = round_curr, %code, sprint = !sprint.is_empty(), "round scored");
    }
    Ok(())
}
