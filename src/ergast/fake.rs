//! In-memory [`ResultsSource`] used by unit tests.

use std::collections::HashMap;

use async_trait::async_trait;

use super::source::{ResultsSource, SourceError};
use super::types::{
    Circuit, Constructor, Driver, FastestLap, LapTime, Location, SessionKind, SessionResult,
};

#[derive(Default)]
pub struct FakeSource {
    pub drivers: Vec<Driver>,
    pub constructors: Vec<Constructor>,
    pub circuits: HashMap<u32, Circuit>,
    pub sessions: HashMap<(u32, SessionKind), Vec<SessionResult>>,
    // Sessions whose feed carries an unparseable points value
    pub malformed: HashMap<(u32, SessionKind), String>,
}

impl FakeSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_driver(mut self, code: &str, given: &str, family: &str) -> Self {
        self.drivers.push(driver(code, given, family));
        self
    }

    pub fn with_constructor(mut self, id: &str, name: &str) -> Self {
        self.constructors.push(Constructor {
            id: id.to_string(),
            name: name.to_string(),
        });
        self
    }

    pub fn with_circuit(mut self, round: u32, locality: &str, country: &str) -> Self {
        self.circuits.insert(
            round,
            Circuit {
                id: format!("circuit_{}", round),
                name: format!("{} Circuit", locality),
                location: Location {
                    locality: locality.to_string(),
                    country: country.to_string(),
                },
            },
        );
        self
    }

    pub fn with_session(mut self, round: u32, kind: SessionKind, results: Vec<SessionResult>) -> Self {
        self.sessions.insert((round, kind), results);
        self
    }

    /// Make a session fail with `SourceError::Parse` on its points field
    pub fn with_malformed_session(mut self, round: u32, kind: SessionKind, points: &str) -> Self {
        self.malformed.insert((round, kind), points.to_string());
        self
    }
}

pub fn driver(code: &str, given: &str, family: &str) -> Driver {
    Driver {
        id: family.to_lowercase(),
        code: Some(code.to_string()),
        permanent_number: Some(format!("{}", code.len() + family.len())),
        given_name: given.to_string(),
        family_name: family.to_string(),
    }
}

/// A classified or retired result. `team` is "id:Name"; `lap_ms` is the
/// driver's fastest lap in milliseconds, if any.
pub fn result(
    position_text: &str,
    code: &str,
    given: &str,
    family: &str,
    team: &str,
    lap_ms: Option<u64>,
) -> SessionResult {
    let (team_id, team_name) = team.split_once(':').unwrap_or((team, team));
    SessionResult {
        number: format!("{}", family.len()),
        position_text: position_text.to_string(),
        driver: driver(code, given, family),
        constructor: Constructor {
            id: team_id.to_string(),
            name: team_name.to_string(),
        },
        laps: 50,
        points: 0.0,
        fastest_lap: lap_ms.map(|ms| FastestLap {
            lap: Some(40),
            time: Some(LapTime::from_millis(ms)),
        }),
    }
}

#[async_trait]
impl ResultsSource for FakeSource {
    async fn session_results(
        &self,
        season: u32,
        round: u32,
        kind: SessionKind,
    ) -> Result<Vec<SessionResult>, SourceError> {
        if let Some(value) = self.malformed.get(&(round, kind)) {
            return Err(SourceError::Parse {
                field: "points",
                value: value.clone(),
            });
        }
        self.sessions
            .get(&(round, kind))
            .cloned()
            .ok_or_else(|| SourceError::NotFound(format!("{}/{}/{}", season, round, kind.endpoint())))
    }

    async fn circuit(&self, season: u32, round: u32) -> Result<Circuit, SourceError> {
        self.circuits
            .get(&round)
            .cloned()
            .ok_or_else(|| SourceError::NotFound(format!("{}/{}/circuits", season, round)))
    }

    async fn drivers(&self, _season: u32) -> Result<Vec<Driver>, SourceError> {
        Ok(self.drivers.clone())
    }

    async fn constructors(&self, _season: u32) -> Result<Vec<Constructor>, SourceError> {
        Ok(self.constructors.clone())
    }

    async fn last_completed_round(&self, season: u32) -> Result<u32, SourceError> {
        self.sessions
            .keys()
            .filter(|(_, kind)| *kind == SessionKind::Race)
            .map(|(round, _)| *round)
            .max()
            .ok_or_else(|| SourceError::NotFound(format!("{}/last/results", season)))
    }
}
