//! Colours and line styles for the standings chart

use std::collections::{BTreeMap, HashMap};
use std::str::FromStr;

use ratatui::prelude::*;
use ratatui::symbols::Marker;

use crate::standings::{Entity, StandingsTable};

/// Chrome colours for the chart view
#[derive(Debug, Clone)]
pub struct ThemeColors {
    pub title_color: Color,
    pub muted: Color,
    pub axis_color: Color,
    pub dimmed_series: Color,
    pub status_bar_bg: Color,
    pub status_key_color: Color,
    pub legend_border: Color,
    pub highlight_style: Style,
}

impl ThemeColors {
    pub fn dark() -> Self {
        Self {
            title_color: Color::Cyan,
            muted: Color::Gray,
            axis_color: Color::DarkGray,
            dimmed_series: Color::Indexed(238),
            status_bar_bg: Color::Indexed(236),
            status_key_color: Color::Cyan,
            legend_border: Color::Indexed(238),
            highlight_style: Style::new().bold().reversed(),
        }
    }
}

/// Line pattern distinguishing team mates that share a colour
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineStyle {
    Solid,
    Dashed,
    DashDot,
}

impl LineStyle {
    /// The n-th driver of a team (0-based) in roster order
    pub fn for_teammate(ordinal: usize) -> Self {
        match ordinal {
            0 => LineStyle::Solid,
            1 => LineStyle::Dashed,
            _ => LineStyle::DashDot,
        }
    }

    /// Terminal charts can't dash a line; each pattern gets its own marker
    pub fn marker(self) -> Marker {
        match self {
            LineStyle::Solid => Marker::Braille,
            LineStyle::Dashed => Marker::Dot,
            LineStyle::DashDot => Marker::HalfBlock,
        }
    }

    /// Legend swatch
    pub fn swatch(self) -> &'static str {
        match self {
            LineStyle::Solid => "───",
            LineStyle::Dashed => "- -",
            LineStyle::DashDot => "-·-",
        }
    }
}

// Haas is black on paper; white stays visible on a dark terminal
const DEFAULT_TEAM_COLORS: &[(&str, Color)] = &[
    ("Mercedes", Color::Rgb(192, 192, 192)),
    ("Aston Martin", Color::Rgb(0, 128, 0)),
    ("Ferrari", Color::Rgb(255, 0, 0)),
    ("Red Bull", Color::Rgb(0, 0, 255)),
    ("Alpine F1 Team", Color::Rgb(65, 105, 225)),
    ("McLaren", Color::Rgb(255, 165, 0)),
    ("Alfa Romeo", Color::Rgb(128, 0, 0)),
    ("Haas F1 Team", Color::White),
    ("Williams", Color::Rgb(30, 144, 255)),
    ("AlphaTauri", Color::Rgb(0, 0, 139)),
    ("RB F1 Team", Color::Rgb(102, 146, 255)),
    ("Sauber", Color::Rgb(82, 226, 82)),
];

const FALLBACK_COLORS: &[Color] = &[
    Color::Magenta,
    Color::Yellow,
    Color::LightCyan,
    Color::LightRed,
    Color::LightGreen,
    Color::LightMagenta,
];

/// Parse a colour name ("red", "lightblue"), hex string ("#ff8000") or
/// 256-colour index
pub fn parse_color(s: &str) -> Option<Color> {
    Color::from_str(s.trim()).ok()
}

/// Constructor name to colour, defaults plus user overrides
#[derive(Debug, Clone)]
pub struct TeamPalette {
    colors: HashMap<String, Color>,
}

impl Default for TeamPalette {
    fn default() -> Self {
        Self {
            colors: DEFAULT_TEAM_COLORS
                .iter()
                .map(|(name, color)| (name.to_string(), *color))
                .collect(),
        }
    }
}

impl TeamPalette {
    /// Defaults with `overrides` applied. Unparseable colours are skipped;
    /// config validation reports them before we get here.
    pub fn with_overrides(overrides: &BTreeMap<String, String>) -> Self {
        let mut palette = Self::default();
        for (team, color) in overrides {
            match parse_color(color) {
                Some(c) => {
                    palette.colors.insert(team.clone(), c);
                }
                None => tracing::warn!(%team, %color, "ignoring unparseable palette colour"),
            }
        }
        palette
    }

    /// Colour for a constructor name. Unknown teams get a stable fallback.
    pub fn team_color(&self, team: &str) -> Color {
        if let Some(color) = self.colors.get(team) {
            return *color;
        }
        let hash = team.bytes().fold(0usize, |acc, b| acc.wrapping_mul(31).wrapping_add(b as usize));
        FALLBACK_COLORS[hash % FALLBACK_COLORS.len()]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeriesStyle {
    pub color: Color,
    pub line: LineStyle,
}

/// One style per table row, in row order.
///
/// Constructors use their own colour. Drivers take their last team's colour
/// and a line style by roster order within that team, so team mates differ
/// only in pattern and keep it however the standings shuffle.
pub fn series_styles(table: &StandingsTable, palette: &TeamPalette) -> Vec<SeriesStyle> {
    let mut by_roster: Vec<usize> = (0..table.rows.len()).collect();
    by_roster.sort_by_key(|&i| table.rows[i].roster_index);

    let mut lines = vec![LineStyle::Solid; table.rows.len()];
    let mut seen_per_team: HashMap<&str, usize> = HashMap::new();
    for i in by_roster {
        if let Entity::Driver { team, name, .. } = &table.rows[i].entity {
            let team = team.as_deref().unwrap_or(name.as_str());
            let ordinal = seen_per_team.entry(team).or_insert(0);
            lines[i] = LineStyle::for_teammate(*ordinal);
            *ordinal += 1;
        }
    }

    table
        .rows
        .iter()
        .zip(lines)
        .map(|(row, line)| match &row.entity {
            Entity::Constructor { name, .. } => SeriesStyle {
                color: palette.team_color(name),
                line,
            },
            Entity::Driver { team, name, .. } => SeriesStyle {
                color: palette.team_color(team.as_deref().unwrap_or(name.as_str())),
                line,
            },
        })
        .collect()
}
