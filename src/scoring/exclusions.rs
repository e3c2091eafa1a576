use std::collections::HashSet;

use crate::ergast::{Constructor, Driver};

/// The scenario being scored: which drivers and teams are taken out of the
/// season.
///
/// Drivers are matched by three-letter code or driver id, constructors by
/// constructor id. Matching is case-insensitive.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Exclusions {
    drivers: HashSet<String>,
    constructors: HashSet<String>,
}

fn normalize(s: &str) -> String {
    s.trim().to_lowercase()
}

impl Exclusions {
    pub fn new<D, C>(drivers: D, constructors: C) -> Self
    where
        D: IntoIterator,
        D::Item: AsRef<str>,
        C: IntoIterator,
        C::Item: AsRef<str>,
    {
        Self {
            drivers: drivers
                .into_iter()
                .map(|d| normalize(d.as_ref()))
                .filter(|d| !d.is_empty())
                .collect(),
            constructors: constructors
                .into_iter()
                .map(|c| normalize(c.as_ref()))
                .filter(|c| !c.is_empty())
                .collect(),
        }
    }

    pub fn drivers<D>(drivers: D) -> Self
    where
        D: IntoIterator,
        D::Item: AsRef<str>,
    {
        Self::new(drivers, Vec::<String>::new())
    }

    pub fn is_empty(&self) -> bool {
        self.drivers.is_empty() && self.constructors.is_empty()
    }

    pub fn excludes_driver(&self, driver: &Driver) -> bool {
        if self.drivers.contains(&normalize(&driver.id)) {
            return true;
        }
        driver
            .code
            .as_deref()
            .is_some_and(|code| self.drivers.contains(&normalize(code)))
    }

    pub fn excludes_constructor(&self, constructor: &Constructor) -> bool {
        self.constructors.contains(&normalize(&constructor.id))
    }

    /// Sorted excluded driver keys, for logging and titles
    pub fn driver_keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.drivers.iter().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }

    /// Sorted excluded constructor ids, for logging
    pub fn constructor_keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.constructors.iter().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }
}
