use std::cmp::Ordering;
use std::fmt;
use std::time::Duration;

use super::source::SourceError;

/// Which competitive session of a round a result belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionKind {
    Race,
    Sprint,
}

impl SessionKind {
    /// Path segment used by the Ergast API for this session
    pub fn endpoint(&self) -> &'static str {
        match self {
            SessionKind::Race => "results",
            SessionKind::Sprint => "sprint",
        }
    }
}

impl fmt::Display for SessionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionKind::Race => write!(f, "race"),
            SessionKind::Sprint => write!(f, "sprint"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Driver {
    pub id: String,                       // "max_verstappen"
    pub code: Option<String>,             // "VER", missing for older seasons
    pub permanent_number: Option<String>, // "33"
    pub given_name: String,
    pub family_name: String,
}

impl Driver {
    /// "Given Family", the name standings rows and charts are labelled with
    pub fn full_name(&self) -> String {
        format!("{} {}", self.given_name, self.family_name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Constructor {
    pub id: String,   // "red_bull"
    pub name: String, // "Red Bull"
}

#[derive(Debug, Clone, PartialEq)]
pub struct Location {
    pub locality: String,
    pub country: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Circuit {
    pub id: String,
    pub name: String,
    pub location: Location,
}

/// A single lap time as published by the results feed ("1:36.236").
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LapTime(Duration);

impl LapTime {
    pub fn from_millis(millis: u64) -> Self {
        LapTime(Duration::from_millis(millis))
    }

    pub fn as_duration(&self) -> Duration {
        self.0
    }

    /// Parse "M:SS.fff" or "SS.fff"
    pub fn parse(s: &str) -> Result<Self, SourceError> {
        let s = s.trim();
        let invalid = || SourceError::Parse {
            field: "lap time",
            value: s.to_string(),
        };

        let (minutes, rest) = match s.split_once(':') {
            Some((m, rest)) => (m.parse::<u64>().map_err(|_| invalid())?, rest),
            None => (0, s),
        };
        let (secs, frac) = rest.split_once('.').unwrap_or((rest, "0"));
        let secs: u64 = secs.parse().map_err(|_| invalid())?;
        if secs >= 60 && minutes > 0 {
            return Err(invalid());
        }

        // Fractional part is read as milliseconds, right-padded ("5" -> 500)
        if frac.is_empty() || frac.len() > 3 || !frac.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }
        let millis: u64 = format!("{:0<3}", frac).parse().map_err(|_| invalid())?;

        Ok(LapTime::from_millis((minutes * 60 + secs) * 1000 + millis))
    }

    /// Compare two optional lap times where a missing time always loses.
    ///
    /// `Less` means `a` is the faster lap.
    pub fn cmp_optional(a: Option<LapTime>, b: Option<LapTime>) -> Ordering {
        match (a, b) {
            (Some(a), Some(b)) => a.cmp(&b),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    }
}

impl fmt::Display for LapTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let total_millis = self.0.as_millis();
        let minutes = total_millis / 60_000;
        let secs = (total_millis / 1000) % 60;
        let millis = total_millis % 1000;
        write!(f, "{}:{:02}.{:03}", minutes, secs, millis)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FastestLap {
    pub lap: Option<u32>,
    pub time: Option<LapTime>,
}

/// One entrant's classification in a race or sprint, exactly as published.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionResult {
    pub number: String,        // car number
    pub position_text: String, // "1".."20", or "R", "D", "W", "N"...
    pub driver: Driver,
    pub constructor: Constructor,
    pub laps: u32,
    pub points: f64, // points awarded under the official scoring
    pub fastest_lap: Option<FastestLap>,
}

impl SessionResult {
    /// True when the published classification is an ordinal position
    pub fn is_classified(&self) -> bool {
        !self.position_text.is_empty() && self.position_text.chars().all(|c| c.is_ascii_digit())
    }
}
