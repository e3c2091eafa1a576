use std::cmp::Ordering;
use std::collections::HashMap;

use crate::ergast::SessionKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Driver,
    Constructor,
}

/// Row identity of a standings table
#[derive(Debug, Clone, PartialEq)]
pub enum Entity {
    Driver {
        id: String,
        number: Option<String>,
        name: String,
        team: Option<String>, // last team the driver scored a session for
    },
    Constructor {
        id: String,
        name: String,
    },
}

impl Entity {
    /// Merge key: driver id or constructor id
    pub fn key(&self) -> &str {
        match self {
            Entity::Driver { id, .. } | Entity::Constructor { id, .. } => id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Entity::Driver { name, .. } | Entity::Constructor { name, .. } => name,
        }
    }
}

/// One points column: a race or a sprint of a given round
#[derive(Debug, Clone, PartialEq)]
pub struct RoundColumn {
    pub round: u32,
    pub kind: SessionKind,
    pub label: String, // "BAH", "AZE_SPR"
}

impl RoundColumn {
    pub fn new(round: u32, kind: SessionKind, location_code: &str) -> Self {
        let label = match kind {
            SessionKind::Race => location_code.to_string(),
            SessionKind::Sprint => format!("{}_SPR", location_code),
        };
        Self { round, kind, label }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StandingsRow {
    pub rank: usize,
    pub roster_index: usize, // position in the entity list the table was built from
    pub entity: Entity,
    pub cells: Vec<Option<f64>>, // one per column; None where the entity has no result
    pub points: f64,
}

/// A wide standings table: one row per entity, one cell per session column
#[derive(Debug, Clone, PartialEq)]
pub struct StandingsTable {
    pub kind: EntityKind,
    pub season: u32,
    pub columns: Vec<RoundColumn>,
    pub rows: Vec<StandingsRow>,
}

impl StandingsTable {
    /// Base table in the given entity order, with no columns yet
    pub fn new(kind: EntityKind, season: u32, entities: Vec<Entity>) -> Self {
        let rows = entities
            .into_iter()
            .enumerate()
            .map(|(idx, entity)| StandingsRow {
                rank: idx + 1,
                roster_index: idx,
                entity,
                cells: Vec::new(),
                points: 0.0,
            })
            .collect();

        Self {
            kind,
            season,
            columns: Vec::new(),
            rows,
        }
    }

    /// Left-merge a session's points keyed by entity key. Entities missing
    /// from `points` get an empty cell; keys with no row are dropped.
    pub fn merge_column(&mut self, column: RoundColumn, points: &HashMap<String, f64>) {
        for row in &mut self.rows {
            row.cells.push(points.get(row.entity.key()).copied());
        }
        self.columns.push(column);
    }

    /// Record the team a driver last appeared for
    pub fn set_team(&mut self, driver_id: &str, team_name: &str) {
        for row in &mut self.rows {
            if let Entity::Driver { id, team, .. } = &mut row.entity {
                if id == driver_id {
                    *team = Some(team_name.to_string());
                }
            }
        }
    }

    /// Sum every row (empty cells count as 0), sort by points descending and
    /// assign 1-based ranks. Equal totals keep their current order.
    pub fn finalize(&mut self) {
        for row in &mut self.rows {
            row.points = row.cells.iter().flatten().sum();
        }

        self.rows
            .sort_by(|a, b| b.points.partial_cmp(&a.points).unwrap_or(Ordering::Equal));

        for (idx, row) in self.rows.iter_mut().enumerate() {
            row.rank = idx + 1;
        }
    }

    pub fn row(&self, key: &str) -> Option<&StandingsRow> {
        self.rows.iter().find(|row| row.entity.key() == key)
    }
}
