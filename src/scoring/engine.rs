use anyhow::{Context, Result};

use super::config::ScoringConfig;
use super::exclusions::Exclusions;
use crate::ergast::{
    Constructor, Driver, FastestLap, LapTime, ResultsSource, SessionKind, SessionResult,
};

/// A session result re-scored under the current scenario
#[derive(Debug, Clone, PartialEq)]
pub struct RecomputedResult {
    pub position: u32,         // contiguous 1..N among remaining entrants
    pub position_text: String, // position as text, or "DNF"
    pub number: String,
    pub driver: Driver,
    pub constructor: Constructor,
    pub laps: u32,
    pub points: f64,
    pub fastest_lap: Option<FastestLap>,
}

/// Owner of the quickest lap among the remaining race entrants
#[derive(Debug, Clone, PartialEq)]
pub struct FastestLapHolder {
    pub driver: Driver,
    pub constructor: Constructor,
    pub position: u32,
    pub time: LapTime,
    pub lap: Option<u32>,
    pub bonus: f64, // 0 when the holder finished outside the cutoff
}

impl FastestLapHolder {
    pub fn awarded(&self) -> bool {
        self.bonus > 0.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SessionOutcome {
    pub kind: SessionKind,
    pub results: Vec<RecomputedResult>,
    pub fastest_lap: Option<FastestLapHolder>,
}

impl SessionOutcome {
    pub fn empty(kind: SessionKind) -> Self {
        Self {
            kind,
            results: Vec::new(),
            fastest_lap: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn total_points(&self) -> f64 {
        self.results.iter().map(|r| r.points).sum()
    }
}

/// Re-score a published classification with some drivers removed.
///
/// The published results are left untouched; remaining entrants keep their
/// relative order and are renumbered from P1. Races also re-award the
/// fastest-lap bonus among the remaining entrants.
pub fn recompute(
    results: &[SessionResult],
    kind: SessionKind,
    exclusions: &Exclusions,
    scoring: &ScoringConfig,
) -> SessionOutcome {
    let mut recomputed: Vec<RecomputedResult> = results
        .iter()
        .filter(|r| !exclusions.excludes_driver(&r.driver))
        .enumerate()
        .map(|(idx, r)| {
            let position = idx as u32 + 1;
            let position_text = if r.is_classified() {
                position.to_string()
            } else {
                "DNF".to_string()
            };

            RecomputedResult {
                position,
                position_text,
                number: r.number.clone(),
                driver: r.driver.clone(),
                constructor: r.constructor.clone(),
                laps: r.laps,
                points: scoring.points_for(kind, position),
                fastest_lap: r.fastest_lap.clone(),
            }
        })
        .collect();

    let fastest_lap = match kind {
        SessionKind::Race => award_fastest_lap(&mut recomputed, scoring),
        SessionKind::Sprint => None,
    };

    SessionOutcome {
        kind,
        results: recomputed,
        fastest_lap,
    }
}

fn award_fastest_lap(
    results: &mut [RecomputedResult],
    scoring: &ScoringConfig,
) -> Option<FastestLapHolder> {
    // min_by keeps the first of equally fast laps, i.e. the better finisher
    let fastest = results.iter_mut().min_by(|a, b| {
        LapTime::cmp_optional(lap_time(a), lap_time(b))
    })?;
    // Nobody set a time: no one can win the bonus
    let time = lap_time(fastest)?;

    let bonus = if fastest.position <= scoring.fastest_lap_cutoff {
        scoring.fastest_lap_bonus
    } else {
        0.0
    };
    fastest.points += bonus;

    Some(FastestLapHolder {
        driver: fastest.driver.clone(),
        constructor: fastest.constructor.clone(),
        position: fastest.position,
        time,
        lap: fastest.fastest_lap.as_ref().and_then(|fl| fl.lap),
        bonus,
    })
}

fn lap_time(result: &RecomputedResult) -> Option<LapTime> {
    result.fastest_lap.as_ref().and_then(|fl| fl.time)
}

/// Fetch and re-score a race
pub async fn race_results<S: ResultsSource + ?Sized>(
    source: &S,
    scoring: &ScoringConfig,
    exclusions: &Exclusions,
    season: u32,
    round: u32,
) -> Result<SessionOutcome> {
    let published = source
        .session_results(season, round, SessionKind::Race)
        .await
        .with_context(|| format!("Failed to fetch race results for {} round {}", season, round))?;

    let outcome = recompute(&published, SessionKind::Race, exclusions, scoring);
    tracing::debug!(
        season,
        round,
        published = published.len(),
        remaining = outcome.results.len(),
        official_points = published.iter().map(|r| r.points).sum::<f64>(),
        recomputed_points = outcome.total_points(),
        "race re-scored"
    );
    Ok(outcome)
}

/// Fetch and re-score a sprint. Rounds without a sprint yield an empty outcome.
pub async fn sprint_results<S: ResultsSource + ?Sized>(
    source: &S,
    scoring: &ScoringConfig,
    exclusions: &Exclusions,
    season: u32,
    round: u32,
) -> Result<SessionOutcome> {
    let published = match source
        .session_results(season, round, SessionKind::Sprint)
        .await
    {
        Ok(results) => results,
        Err(e) if e.is_not_found() => {
            tracing::debug!(season, round, "no sprint this round");
            return Ok(SessionOutcome::empty(SessionKind::Sprint));
        }
        Err(e) => {
            return Err(e).with_context(|| {
                format!("Failed to fetch sprint results for {} round {}", season, round)
            })
        }
    };

    let outcome = recompute(&published, SessionKind::Sprint, exclusions, scoring);
    tracing::debug!(
        season,
        round,
        published = published.len(),
        remaining = outcome.results.len(),
        "sprint re-scored"
    );
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ergast::fake::{result, FakeSource};
    use crate::ergast::SourceError;

    fn three_point_scoring() -> ScoringConfig {
        ScoringConfig {
            race: vec![25.0, 18.0, 15.0],
            sprint: vec![8.0, 7.0, 6.0],
            fastest_lap_bonus: 1.0,
            fastest_lap_cutoff: 10,
        }
    }

    fn grid(n: usize) -> Vec<SessionResult> {
        (0..n)
            .map(|i| {
                let code = format!("D{:02}", i + 1);
                result(
                    &(i + 1).to_string(),
                    &code,
                    "Driver",
                    &code,
                    "team:Team",
                    Some(100_000 + i as u64),
                )
            })
            .collect()
    }

    #[test]
    fn test_excluded_driver_positions_close_up() {
        let published = vec![
            result("1", "AAA", "Driver", "A", "t1:Team One", None),
            result("2", "BBB", "Driver", "B", "t2:Team Two", None),
            result("3", "CCC", "Driver", "C", "t1:Team One", None),
        ];
        let outcome = recompute(
            &published,
            SessionKind::Race,
            &Exclusions::drivers(["BBB"]),
            &three_point_scoring(),
        );

        assert_eq!(outcome.results.len(), 2);
        assert_eq!(outcome.results[0].driver.family_name, "A");
        assert_eq!(outcome.results[0].position, 1);
        assert_eq!(outcome.results[0].points, 25.0);
        assert_eq!(outcome.results[1].driver.family_name, "C");
        assert_eq!(outcome.results[1].position, 2);
        assert_eq!(outcome.results[1].position_text, "2");
        assert_eq!(outcome.results[1].points, 18.0);
        // Nobody set a lap time
        assert!(outcome.fastest_lap.is_none());
    }

    #[test]
    fn test_published_results_untouched() {
        let published = vec![
            result("1", "AAA", "Driver", "A", "t1:Team One", Some(90_000)),
            result("2", "BBB", "Driver", "B", "t2:Team Two", None),
        ];
        let before = published.clone();
        let _ = recompute(
            &published,
            SessionKind::Race,
            &Exclusions::drivers(["AAA"]),
            &three_point_scoring(),
        );
        assert_eq!(published, before);
    }

    #[test]
    fn test_positions_contiguous_and_order_preserved() {
        let published = grid(20);
        let exclusions = Exclusions::drivers(["D03", "D07", "D20"]);
        let outcome = recompute(&published, SessionKind::Race, &exclusions, &ScoringConfig::default());

        let positions: Vec<u32> = outcome.results.iter().map(|r| r.position).collect();
        assert_eq!(positions, (1..=17).collect::<Vec<u32>>());

        let order: Vec<&str> = outcome
            .results
            .iter()
            .map(|r| r.driver.code.as_deref().unwrap())
            .collect();
        let expected: Vec<String> = (1..=20)
            .map(|i| format!("D{:02}", i))
            .filter(|c| !["D03", "D07", "D20"].contains(&c.as_str()))
            .collect();
        assert_eq!(order, expected);
    }

    #[test]
    fn test_retired_entrants_labelled_dnf() {
        let published = vec![
            result("1", "AAA", "Driver", "A", "t1:Team One", None),
            result("2", "BBB", "Driver", "B", "t2:Team Two", None),
            result("R", "CCC", "Driver", "C", "t1:Team One", None),
            result("W", "DDD", "Driver", "D", "t2:Team Two", None),
        ];
        let outcome = recompute(
            &published,
            SessionKind::Race,
            &Exclusions::drivers(["AAA"]),
            &three_point_scoring(),
        );
        let labels: Vec<&str> = outcome.results.iter().map(|r| r.position_text.as_str()).collect();
        assert_eq!(labels, vec!["1", "DNF", "DNF"]);
        // A retirement promoted into the points still scores by position
        assert_eq!(outcome.results[2].position, 3);
        assert_eq!(outcome.results[2].points, 15.0);
    }

    #[test]
    fn test_fastest_lap_of_excluded_driver_ignored() {
        let published = vec![
            result("1", "AAA", "Driver", "A", "t1:Team One", Some(95_000)),
            result("2", "BBB", "Driver", "B", "t2:Team Two", Some(90_000)),
            result("3", "CCC", "Driver", "C", "t1:Team One", Some(93_000)),
        ];
        let outcome = recompute(
            &published,
            SessionKind::Race,
            &Exclusions::drivers(["BBB"]),
            &three_point_scoring(),
        );

        let holder = outcome.fastest_lap.as_ref().unwrap();
        assert_eq!(holder.driver.family_name, "C");
        assert_eq!(holder.time, LapTime::from_millis(93_000));
        assert!(holder.awarded());
        assert_eq!(outcome.results[0].points, 25.0);
        assert_eq!(outcome.results[1].points, 19.0);
    }

    #[test]
    fn test_fastest_lap_outside_cutoff_not_awarded() {
        let mut published = grid(12);
        // P12 sets the fastest lap
        published[11].fastest_lap.as_mut().unwrap().time = Some(LapTime::from_millis(80_000));

        let outcome = recompute(
            &published,
            SessionKind::Race,
            &Exclusions::default(),
            &ScoringConfig::default(),
        );
        let holder = outcome.fastest_lap.unwrap();
        assert_eq!(holder.position, 12);
        assert!(!holder.awarded());
        assert_eq!(outcome.results[11].points, 0.0);
        assert_eq!(outcome.results.iter().map(|r| r.points).sum::<f64>(), 101.0);
    }

    #[test]
    fn test_exclusion_promotes_fastest_lap_into_cutoff() {
        let mut published = grid(11);
        published[10].fastest_lap.as_mut().unwrap().time = Some(LapTime::from_millis(80_000));

        let outcome = recompute(
            &published,
            SessionKind::Race,
            &Exclusions::drivers(["D01"]),
            &ScoringConfig::default(),
        );
        let holder = outcome.fastest_lap.unwrap();
        assert_eq!(holder.position, 10);
        assert!(holder.awarded());
        assert_eq!(outcome.results[9].points, 2.0);
    }

    #[test]
    fn test_missing_lap_time_never_wins() {
        let published = vec![
            result("1", "AAA", "Driver", "A", "t1:Team One", None),
            result("2", "BBB", "Driver", "B", "t2:Team Two", Some(99_000)),
        ];
        let outcome = recompute(
            &published,
            SessionKind::Race,
            &Exclusions::default(),
            &three_point_scoring(),
        );
        assert_eq!(outcome.fastest_lap.unwrap().driver.family_name, "B");
        assert_eq!(outcome.results[1].points, 19.0);
    }

    #[test]
    fn test_equal_lap_times_favour_better_finisher() {
        let published = vec![
            result("1", "AAA", "Driver", "A", "t1:Team One", Some(91_000)),
            result("2", "BBB", "Driver", "B", "t2:Team Two", Some(91_000)),
        ];
        let outcome = recompute(
            &published,
            SessionKind::Race,
            &Exclusions::default(),
            &three_point_scoring(),
        );
        assert_eq!(outcome.fastest_lap.unwrap().driver.family_name, "A");
    }

    #[test]
    fn test_race_total_is_table_plus_one_bonus() {
        let scoring = ScoringConfig::default();
        for excluded in [vec![], vec!["D01"], vec!["D02", "D05", "D19"]] {
            let published = grid(20);
            let outcome = recompute(
                &published,
                SessionKind::Race,
                &Exclusions::drivers(excluded.iter().copied()),
                &scoring,
            );
            let n = outcome.results.len().min(scoring.race.len());
            let table_sum: f64 = scoring.race[..n].iter().sum();
            let bonus = outcome.fastest_lap.as_ref().map(|h| h.bonus).unwrap_or(0.0);
            assert_eq!(outcome.total_points(), table_sum + bonus);
            assert!(bonus == 0.0 || bonus == 1.0);
        }
    }

    /// Points without the fastest-lap bonus, keyed by driver code
    fn table_points(outcome: &SessionOutcome) -> Vec<(String, f64)> {
        outcome
            .results
            .iter()
            .map(|r| {
                let bonus = match &outcome.fastest_lap {
                    Some(holder) if holder.driver.id == r.driver.id => holder.bonus,
                    _ => 0.0,
                };
                (r.driver.code.clone().unwrap_or_default(), r.points - bonus)
            })
            .collect()
    }

    #[test]
    fn test_exclusion_keeps_head_to_head_order() {
        let scoring = ScoringConfig::default();
        let published = grid(20);
        let exclusion_sets: [&[&str]; 5] = [
            &[],
            &["D01"],
            &["D10"],
            &["D02", "D05", "D19"],
            &["D01", "D02", "D03", "D04", "D05", "D06"],
        ];

        for excluded in exclusion_sets {
            let outcome = recompute(
                &published,
                SessionKind::Race,
                &Exclusions::drivers(excluded.iter().copied()),
                &scoring,
            );
            let points = table_points(&outcome);
            assert_eq!(points.len(), 20 - excluded.len());

            // Results follow published order, so every earlier finisher must
            // score at least as much as every later one
            for i in 0..points.len() {
                for j in i + 1..points.len() {
                    assert!(
                        points[i].1 >= points[j].1,
                        "{} ({}) behind {} ({}) excluding {:?}",
                        points[i].0,
                        points[i].1,
                        points[j].0,
                        points[j].1,
                        excluded
                    );
                }
            }
        }
    }

    #[test]
    fn test_sprint_has_no_fastest_lap_bonus() {
        let published = grid(10);
        let outcome = recompute(
            &published,
            SessionKind::Sprint,
            &Exclusions::default(),
            &ScoringConfig::default(),
        );
        assert!(outcome.fastest_lap.is_none());
        assert_eq!(outcome.total_points(), 36.0);
        assert_eq!(outcome.results[8].points, 0.0);
    }

    #[tokio::test]
    async fn test_missing_sprint_is_empty() {
        let source = FakeSource::new().with_session(1, SessionKind::Race, grid(3));
        let outcome = sprint_results(&source, &ScoringConfig::default(), &Exclusions::default(), 2023, 1)
            .await
            .unwrap();
        assert!(outcome.is_empty());
        assert_eq!(outcome.kind, SessionKind::Sprint);
    }

    #[tokio::test]
    async fn test_sprint_feed_error_propagates() {
        // Round 1 has no sprint on record, but the feed itself is broken
        let source = FakeSource::new()
            .with_session(1, SessionKind::Race, grid(3))
            .with_malformed_session(1, SessionKind::Sprint, "n/a");
        let err = sprint_results(&source, &ScoringConfig::default(), &Exclusions::default(), 2023, 1)
            .await
            .unwrap_err();
        let source_err = err.chain().find_map(|cause| cause.downcast_ref::<SourceError>());
        assert!(matches!(source_err, Some(SourceError::Parse { field: "points", .. })));
    }

    #[tokio::test]
    async fn test_missing_race_is_an_error() {
        let source = FakeSource::new();
        let result = race_results(&source, &ScoringConfig::default(), &Exclusions::default(), 2023, 4).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_race_results_from_source() {
        let source = FakeSource::new().with_session(2, SessionKind::Race, grid(3));
        let outcome = race_results(
            &source,
            &three_point_scoring(),
            &Exclusions::drivers(["D01"]),
            2023,
            2,
        )
        .await
        .unwrap();
        assert_eq!(outcome.results.len(), 2);
        assert_eq!(outcome.results[0].driver.code.as_deref(), Some("D02"));
        // D02 keeps the fastest remaining lap and the bonus
        assert_eq!(outcome.results[0].points, 26.0);
    }
}
