//! Serde mirror of the Ergast JSON envelope.
//!
//! Every number in the feed is a string; conversion into the domain types in
//! [`super::types`] happens here so nothing else sees the wire format.

use serde::Deserialize;

use super::source::SourceError;
use super::types::{
    Circuit, Constructor, Driver, FastestLap, LapTime, Location, SessionResult,
};

#[derive(Debug, Deserialize)]
pub struct Envelope {
    #[serde(rename = "MRData")]
    pub data: MrData,
}

#[derive(Debug, Deserialize)]
pub struct MrData {
    // Paging counters, as strings like everything else in the feed
    #[serde(default)]
    pub offset: Option<String>,
    #[serde(default)]
    pub total: Option<String>,
    #[serde(rename = "RaceTable")]
    pub race_table: Option<RaceTable>,
    #[serde(rename = "CircuitTable")]
    pub circuit_table: Option<CircuitTable>,
    #[serde(rename = "DriverTable")]
    pub driver_table: Option<DriverTable>,
    #[serde(rename = "ConstructorTable")]
    pub constructor_table: Option<ConstructorTable>,
}

#[derive(Debug, Deserialize)]
pub struct RaceTable {
    #[serde(rename = "Races", default)]
    pub races: Vec<WireRace>,
}

#[derive(Debug, Deserialize)]
pub struct WireRace {
    pub round: String,
    #[serde(rename = "raceName", default)]
    pub race_name: String,
    #[serde(rename = "Results", default)]
    pub results: Vec<WireResult>,
    #[serde(rename = "SprintResults", default)]
    pub sprint_results: Vec<WireResult>,
}

#[derive(Debug, Deserialize)]
pub struct WireResult {
    pub number: String,
    #[serde(rename = "positionText")]
    pub position_text: String,
    pub points: String,
    #[serde(rename = "Driver")]
    pub driver: WireDriver,
    #[serde(rename = "Constructor")]
    pub constructor: WireConstructor,
    #[serde(default)]
    pub laps: String,
    #[serde(rename = "FastestLap")]
    pub fastest_lap: Option<WireFastestLap>,
}

#[derive(Debug, Deserialize)]
pub struct WireDriver {
    #[serde(rename = "driverId")]
    pub driver_id: String,
    #[serde(rename = "permanentNumber")]
    pub permanent_number: Option<String>,
    pub code: Option<String>,
    #[serde(rename = "givenName")]
    pub given_name: String,
    #[serde(rename = "familyName")]
    pub family_name: String,
}

#[derive(Debug, Deserialize)]
pub struct WireConstructor {
    #[serde(rename = "constructorId")]
    pub constructor_id: String,
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct WireFastestLap {
    pub lap: Option<String>,
    #[serde(rename = "Time")]
    pub time: Option<WireTime>,
}

#[derive(Debug, Deserialize)]
pub struct WireTime {
    pub time: String,
}

#[derive(Debug, Deserialize)]
pub struct CircuitTable {
    #[serde(rename = "Circuits", default)]
    pub circuits: Vec<WireCircuit>,
}

#[derive(Debug, Deserialize)]
pub struct WireCircuit {
    #[serde(rename = "circuitId")]
    pub circuit_id: String,
    #[serde(rename = "circuitName")]
    pub circuit_name: String,
    #[serde(rename = "Location")]
    pub location: WireLocation,
}

#[derive(Debug, Deserialize)]
pub struct WireLocation {
    pub locality: String,
    pub country: String,
}

#[derive(Debug, Deserialize)]
pub struct DriverTable {
    #[serde(rename = "Drivers", default)]
    pub drivers: Vec<WireDriver>,
}

#[derive(Debug, Deserialize)]
pub struct ConstructorTable {
    #[serde(rename = "Constructors", default)]
    pub constructors: Vec<WireConstructor>,
}

fn parse_number<T: std::str::FromStr>(field: &'static str, value: &str) -> Result<T, SourceError> {
    value.trim().parse().map_err(|_| SourceError::Parse {
        field,
        value: value.to_string(),
    })
}

impl MrData {
    /// Row count of the whole query across all pages, when the feed reports it
    pub fn total(&self) -> Result<Option<usize>, SourceError> {
        self.total.as_deref().map(|t| parse_number("total", t)).transpose()
    }
}

impl From<WireDriver> for Driver {
    fn from(d: WireDriver) -> Self {
        Driver {
            id: d.driver_id,
            code: d.code,
            permanent_number: d.permanent_number,
            given_name: d.given_name,
            family_name: d.family_name,
        }
    }
}

impl From<WireConstructor> for Constructor {
    fn from(c: WireConstructor) -> Self {
        Constructor {
            id: c.constructor_id,
            name: c.name,
        }
    }
}

impl From<WireCircuit> for Circuit {
    fn from(c: WireCircuit) -> Self {
        Circuit {
            id: c.circuit_id,
            name: c.circuit_name,
            location: Location {
                locality: c.location.locality,
                country: c.location.country,
            },
        }
    }
}

impl TryFrom<WireFastestLap> for FastestLap {
    type Error = SourceError;

    fn try_from(fl: WireFastestLap) -> Result<Self, Self::Error> {
        let lap = fl.lap.as_deref().map(|l| parse_number("fastest lap number", l)).transpose()?;
        let time = fl.time.map(|t| LapTime::parse(&t.time)).transpose()?;
        Ok(FastestLap { lap, time })
    }
}

impl TryFrom<WireResult> for SessionResult {
    type Error = SourceError;

    fn try_from(r: WireResult) -> Result<Self, Self::Error> {
        // Laps is blank for some entrants who never started
        let laps = if r.laps.trim().is_empty() {
            0
        } else {
            parse_number("laps", &r.laps)?
        };

        Ok(SessionResult {
            number: r.number,
            position_text: r.position_text,
            laps,
            points: parse_number("points", &r.points)?,
            driver: r.driver.into(),
            constructor: r.constructor.into(),
            fastest_lap: r.fastest_lap.map(FastestLap::try_from).transpose()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RACE_JSON: &str = r#"{
      "MRData": {
        "series": "f1",
        "RaceTable": {
          "season": "2023",
          "round": "1",
          "Races": [{
            "season": "2023",
            "round": "1",
            "raceName": "Bahrain Grand Prix",
            "Results": [
              {
                "number": "1", "position": "1", "positionText": "1", "points": "25",
                "Driver": {"driverId": "max_verstappen", "permanentNumber": "33", "code": "VER",
                           "givenName": "Max", "familyName": "Verstappen"},
                "Constructor": {"constructorId": "red_bull", "name": "Red Bull"},
                "grid": "1", "laps": "57", "status": "Finished",
                "FastestLap": {"rank": "6", "lap": "44", "Time": {"time": "1:36.236"}}
              },
              {
                "number": "16", "position": "18", "positionText": "R", "points": "0",
                "Driver": {"driverId": "leclerc", "permanentNumber": "16", "code": "LEC",
                           "givenName": "Charles", "familyName": "Leclerc"},
                "Constructor": {"constructorId": "ferrari", "name": "Ferrari"},
                "grid": "3", "laps": "39", "status": "Engine"
              }
            ]
          }]
        }
      }
    }"#;

    #[test]
    fn test_decode_race_results() {
        let envelope: Envelope = serde_json::from_str(RACE_JSON).unwrap();
        let race = envelope.data.race_table.unwrap().races.into_iter().next().unwrap();
        assert_eq!(race.race_name, "Bahrain Grand Prix");

        let results: Vec<SessionResult> = race
            .results
            .into_iter()
            .map(SessionResult::try_from)
            .collect::<Result<_, _>>()
            .unwrap();

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].driver.code.as_deref(), Some("VER"));
        assert_eq!(results[0].points, 25.0);
        assert_eq!(results[0].laps, 57);
        assert_eq!(
            results[0].fastest_lap.as_ref().and_then(|fl| fl.time),
            Some(LapTime::from_millis(96_236))
        );
        assert_eq!(results[0].fastest_lap.as_ref().unwrap().lap, Some(44));
        assert_eq!(results[1].position_text, "R");
        assert!(results[1].fastest_lap.is_none());
    }

    #[test]
    fn test_decode_empty_sprint_table() {
        let json = r#"{"MRData": {"RaceTable": {"season": "2023", "round": "1", "Races": []}}}"#;
        let envelope: Envelope = serde_json::from_str(json).unwrap();
        assert!(envelope.data.race_table.unwrap().races.is_empty());
    }

    #[test]
    fn test_decode_paging_total() {
        let json = r#"{"MRData": {"limit": "100", "offset": "0", "total": "112",
            "DriverTable": {"season": "1953", "Drivers": []}}}"#;
        let envelope: Envelope = serde_json::from_str(json).unwrap();
        assert_eq!(envelope.data.total().unwrap(), Some(112));

        let json = r#"{"MRData": {"total": "many"}}"#;
        let envelope: Envelope = serde_json::from_str(json).unwrap();
        assert!(matches!(envelope.data.total(), Err(SourceError::Parse { field: "total", .. })));

        let json = r#"{"MRData": {}}"#;
        let envelope: Envelope = serde_json::from_str(json).unwrap();
        assert_eq!(envelope.data.total().unwrap(), None);
    }

    #[test]
    fn test_decode_circuit() {
        let json = r#"{"MRData": {"CircuitTable": {"Circuits": [{
            "circuitId": "miami", "circuitName": "Miami International Autodrome",
            "Location": {"lat": "25.9581", "long": "-80.2389", "locality": "Miami", "country": "USA"}
        }]}}}"#;
        let envelope: Envelope = serde_json::from_str(json).unwrap();
        let circuit: Circuit = envelope
            .data
            .circuit_table
            .unwrap()
            .circuits
            .into_iter()
            .next()
            .unwrap()
            .into();
        assert_eq!(circuit.location.locality, "Miami");
        assert_eq!(circuit.location.country, "USA");
    }

    #[test]
    fn test_bad_points_is_parse_error() {
        let wire = WireResult {
            number: "1".to_string(),
            position_text: "1".to_string(),
            points: "lots".to_string(),
            driver: WireDriver {
                driver_id: "x".to_string(),
                permanent_number: None,
                code: None,
                given_name: "X".to_string(),
                family_name: "Y".to_string(),
            },
            constructor: WireConstructor {
                constructor_id: "c".to_string(),
                name: "C".to_string(),
            },
            laps: "3".to_string(),
            fastest_lap: None,
        };
        let err = SessionResult::try_from(wire).unwrap_err();
        assert!(matches!(err, SourceError::Parse { field: "points", .. }));
    }
}
