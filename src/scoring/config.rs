use serde::{Deserialize, Serialize};

use crate::ergast::SessionKind;

/// Points tables used when re-scoring a session.
///
/// Index 0 of each table is the points for P1. Positions past the end of a
/// table score nothing.
///
/// Example YAML:
/// ```yaml
/// scoring:
///   race: [25, 18, 15, 12, 10, 8, 6, 4, 2, 1]
///   sprint: [8, 7, 6, 5, 4, 3, 2, 1]
///   fastest_lap_bonus: 1
///   fastest_lap_cutoff: 10
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields, default)]
pub struct ScoringConfig {
    /// Race points by finishing position
    pub race: Vec<f64>,

    /// Sprint points by finishing position
    pub sprint: Vec<f64>,

    /// Extra race points for the fastest lap (0 disables the bonus)
    pub fastest_lap_bonus: f64,

    /// The fastest lap only scores if its holder finishes at or above this position
    pub fastest_lap_cutoff: u32,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            race: vec![25.0, 18.0, 15.0, 12.0, 10.0, 8.0, 6.0, 4.0, 2.0, 1.0],
            sprint: vec![8.0, 7.0, 6.0, 5.0, 4.0, 3.0, 2.0, 1.0],
            fastest_lap_bonus: 1.0,
            fastest_lap_cutoff: 10,
        }
    }
}

impl ScoringConfig {
    pub fn table(&self, kind: SessionKind) -> &[f64] {
        match kind {
            SessionKind::Race => &self.race,
            SessionKind::Sprint => &self.sprint,
        }
    }

    /// Points for a 1-based finishing position
    pub fn points_for(&self, kind: SessionKind, position: u32) -> f64 {
        if position == 0 {
            return 0.0;
        }
        self.table(kind)
            .get(position as usize - 1)
            .copied()
            .unwrap_or(0.0)
    }
}
