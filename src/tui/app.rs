use crate::standings::{EntityKind, StandingsTable};
use crate::timeline;
use crate::tui::theme::{series_styles, SeriesStyle, TeamPalette};

/// One plotted line: an entity's cumulative points over the session columns
#[derive(Debug, Clone)]
pub struct Series {
    pub name: String,
    pub total: f64,
    pub points: Vec<(f64, f64)>,
    pub style: SeriesStyle,
}

pub struct App {
    pub title: String,
    pub kind: EntityKind,
    pub x_labels: Vec<String>,
    pub series: Vec<Series>,
    pub show_legend: bool,
    pub highlighted: Option<usize>,
    pub should_quit: bool,
}

impl App {
    pub fn new(title: String, table: &StandingsTable, palette: &TeamPalette) -> Self {
        let styles = series_styles(table, palette);
        let series = timeline::series(table)
            .into_iter()
            .zip(table.rows.iter())
            .zip(styles)
            .map(|(((entity, points), row), style)| Series {
                name: entity.name().to_string(),
                total: row.points,
                points,
                style,
            })
            .collect();

        Self {
            title,
            kind: table.kind,
            x_labels: table.columns.iter().map(|c| c.label.clone()).collect(),
            series,
            show_legend: true,
            highlighted: None,
            should_quit: false,
        }
    }

    pub fn toggle_legend(&mut self) {
        self.show_legend = !self.show_legend;
    }

    /// Highlight the next series, wrapping around
    pub fn next_series(&mut self) {
        if self.series.is_empty() {
            return;
        }
        self.highlighted = Some(match self.highlighted {
            Some(i) if i + 1 < self.series.len() => i + 1,
            Some(_) => 0,
            None => 0,
        });
    }

    pub fn previous_series(&mut self) {
        if self.series.is_empty() {
            return;
        }
        self.highlighted = Some(match self.highlighted {
            Some(0) | None => self.series.len() - 1,
            Some(i) => i - 1,
        });
    }

    pub fn clear_highlight(&mut self) {
        self.highlighted = None;
    }

    /// x-axis bounds: first to last session column
    pub fn x_bounds(&self) -> [f64; 2] {
        [0.0, self.x_labels.len().saturating_sub(1).max(1) as f64]
    }

    /// y-axis bounds: zero to the leader's total, rounded up to a multiple of 10
    pub fn y_bounds(&self) -> [f64; 2] {
        let max = self
            .series
            .iter()
            .flat_map(|s| s.points.iter().map(|(_, y)| *y))
            .fold(0.0_f64, f64::max);
        let top = ((max / 10.0).ceil() * 10.0).max(10.0);
        [0.0, top]
    }
}
