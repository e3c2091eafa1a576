pub mod client;
pub mod source;
pub mod types;
pub mod wire;

#[cfg(test)]
pub(crate) mod fake;

pub use client::{create_client, ErgastClient, DEFAULT_BASE_URL};
pub use source::{ResultsSource, SourceError};
pub use types::{
    Circuit, Constructor, Driver, FastestLap, LapTime, Location, SessionKind, SessionResult,
};
