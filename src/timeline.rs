use crate::standings::{Entity, StandingsTable};

/// Cumulative points of one entity after one session column
#[derive(Debug, Clone, PartialEq)]
pub struct TimelinePoint {
    pub entity: Entity,
    pub round: String,      // column label
    pub round_index: usize, // position of the column, the x axis
    pub points: f64,
}

/// Long-format cumulative points table.
///
/// Points are ordered column-major: every entity for the first column, then
/// every entity for the next. Entities keep the table's row order within a
/// column. Missing cells add nothing to the running total.
pub fn melt(table: &StandingsTable) -> Vec<TimelinePoint> {
    let mut running = vec![0.0_f64; table.rows.len()];
    let mut points = Vec::with_capacity(table.rows.len() * table.columns.len());

    for (col_idx, column) in table.columns.iter().enumerate() {
        for (row, total) in table.rows.iter().zip(running.iter_mut()) {
            *total += row.cells.get(col_idx).copied().flatten().unwrap_or(0.0);
            points.push(TimelinePoint {
                entity: row.entity.clone(),
                round: column.label.clone(),
                round_index: col_idx,
                points: *total,
            });
        }
    }

    points
}

/// One (x, y) series per entity, in table row order, for plotting
pub fn series(table: &StandingsTable) -> Vec<(Entity, Vec<(f64, f64)>)> {
    let mut out: Vec<(Entity, Vec<(f64, f64)>)> = table
        .rows
        .iter()
        .map(|row| (row.entity.clone(), Vec::with_capacity(table.columns.len())))
        .collect();

    let rows = table.rows.len().max(1);
    for (idx, point) in melt(table).into_iter().enumerate() {
        out[idx % rows]
            .1
            .push((point.round_index as f64, point.points));
    }
    out
}
