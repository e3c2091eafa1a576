use std::io::IsTerminal;
use owo_colors::OwoColorize;
use terminal_size::{Width, terminal_size};

use crate::scoring::{FastestLapHolder, SessionOutcome};
use crate::standings::{Entity, EntityKind, StandingsTable};

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Format points compactly: whole numbers without decimals (26, 0),
/// fractional points with one decimal (0.5, 12.5)
pub fn format_points(points: f64) -> String {
    let formatted = format!("{:.1}", points);
    match formatted.strip_suffix(".0") {
        Some(whole) => whole.to_string(),
        None => formatted,
    }
}

/// Get terminal width, defaulting to None for pipes (unlimited)
fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

/// Truncate a name to fit available width, accounting for Unicode
fn truncate_name(name: &str, max_width: usize) -> String {
    let chars: Vec<char> = name.chars().collect();
    if chars.len() <= max_width {
        name.to_string()
    } else if max_width > 3 {
        format!("{}...", chars[..max_width - 3].iter().collect::<String>())
    } else {
        chars[..max_width].iter().collect()
    }
}

fn pad_right(s: &str, width: usize) -> String {
    let len = s.chars().count();
    if len >= width {
        s.to_string()
    } else {
        format!("{}{}", s, " ".repeat(width - len))
    }
}

/// Format one line for the fastest lap of a race.
/// Format: "Fastest lap: {driver} ({constructor}) - {m:ss.fff} (lap {n})"
pub fn format_fastest_lap(holder: &FastestLapHolder, use_colors: bool) -> String {
    let lap = holder
        .lap
        .map(|n| format!(" (lap {})", n))
        .unwrap_or_default();
    let no_bonus = if holder.awarded() {
        ""
    } else {
        " [outside points, no bonus]"
    };

    if use_colors {
        format!(
            "Fastest lap: {} ({}) - {}{}{}",
            holder.driver.full_name().bold(),
            holder.constructor.name.cyan(),
            holder.time.magenta(),
            lap,
            no_bonus.dimmed()
        )
    } else {
        format!(
            "Fastest lap: {} ({}) - {}{}{}",
            holder.driver.full_name(),
            holder.constructor.name,
            holder.time,
            lap,
            no_bonus
        )
    }
}

/// Format a recomputed session as a table with columns:
/// Pos, No, Driver, Constructor, Laps, Points
pub fn format_session_table(outcome: &SessionOutcome, use_colors: bool) -> String {
    if outcome.is_empty() {
        return format!("No {} results.", outcome.kind);
    }

    let pos_width = 3;
    let number_width = 3;
    let laps_width = 4;
    let points_width = 6;
    let separator = "  ";

    let team_width = outcome
        .results
        .iter()
        .map(|r| r.constructor.name.chars().count())
        .max()
        .unwrap_or(0)
        .max("Constructor".len());
    let longest_driver = outcome
        .results
        .iter()
        .map(|r| r.driver.full_name().chars().count())
        .max()
        .unwrap_or(0)
        .max("Driver".len());

    let fixed_width =
        pos_width + number_width + team_width + laps_width + points_width + separator.len() * 5;
    let driver_width = match get_terminal_width() {
        Some(width) if width > fixed_width + 10 => longest_driver.min(width - fixed_width),
        Some(_) => longest_driver.min(20),
        None => longest_driver,
    };

    let header = format!(
        "{:>pos_width$}{sep}{:>number_width$}{sep}{}{sep}{}{sep}{:>laps_width$}{sep}{:>points_width$}",
        "Pos",
        "No",
        pad_right("Driver", driver_width),
        pad_right("Constructor", team_width),
        "Laps",
        "Points",
        sep = separator,
    );

    let mut lines = Vec::with_capacity(outcome.results.len() + 2);
    lines.push(if use_colors {
        header.bold().to_string()
    } else {
        header
    });

    for r in &outcome.results {
        let driver = pad_right(&truncate_name(&r.driver.full_name(), driver_width), driver_width);
        let team = pad_right(&r.constructor.name, team_width);
        let pos = format!("{:>pos_width$}", r.position_text);
        let number = format!("{:>number_width$}", r.number);
        let laps = format!("{:>laps_width$}", r.laps);
        let points = format!("{:>points_width$}", format_points(r.points));

        let line = if use_colors {
            format!(
                "{}{sep}{}{sep}{}{sep}{}{sep}{}{sep}{}",
                pos.dimmed(),
                number,
                driver,
                team.cyan(),
                laps,
                points.bold(),
                sep = separator,
            )
        } else {
            format!(
                "{}{sep}{}{sep}{}{sep}{}{sep}{}{sep}{}",
                pos,
                number,
                driver,
                team,
                laps,
                points,
                sep = separator,
            )
        };
        lines.push(line);
    }

    if let Some(holder) = &outcome.fastest_lap {
        lines.push(String::new());
        lines.push(format_fastest_lap(holder, use_colors));
    }

    lines.join("\n")
}

/// Format a recomputed session as tab-separated values for scripting
/// Columns: position, number, driver, constructor, laps, points (no headers, no colors)
pub fn format_session_tsv(outcome: &SessionOutcome) -> String {
    outcome
        .results
        .iter()
        .map(|r| {
            format!(
                "{}\t{}\t{}\t{}\t{}\t{}",
                r.position_text,
                r.number,
                r.driver.full_name(),
                r.constructor.name,
                r.laps,
                format_points(r.points)
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn entity_label(entity: &Entity) -> String {
    match entity {
        Entity::Driver { number: Some(n), name, .. } => format!("{:>2} {}", n, name),
        Entity::Driver { number: None, name, .. } => format!("   {}", name),
        Entity::Constructor { name, .. } => name.clone(),
    }
}

fn format_cell(cell: Option<f64>) -> String {
    cell.map(format_points).unwrap_or_else(|| "-".to_string())
}

/// Number of trailing round columns that fit in `available` characters
fn visible_columns(widths: &[usize], available: Option<usize>) -> usize {
    let Some(mut available) = available else {
        return widths.len();
    };
    let mut count = 0;
    for width in widths.iter().rev() {
        if *width > available {
            break;
        }
        available -= width;
        count += 1;
    }
    count
}

/// Format a standings table: rank, entity, one column per session, points.
///
/// When the terminal is too narrow the earliest rounds are dropped first
/// and a "..." column marks the cut.
pub fn format_standings_table(table: &StandingsTable, use_colors: bool) -> String {
    if table.rows.is_empty() {
        return "No standings.".to_string();
    }

    let rank_width = 3;
    let points_width = 6;
    let separator = " ";

    let title = match table.kind {
        EntityKind::Driver => "Driver",
        EntityKind::Constructor => "Constructor",
    };
    let labels: Vec<String> = table.rows.iter().map(|r| entity_label(&r.entity)).collect();
    let name_width = labels
        .iter()
        .map(|l| l.chars().count())
        .max()
        .unwrap_or(0)
        .max(title.len())
        .min(28);

    let col_widths: Vec<usize> = table
        .columns
        .iter()
        .map(|c| c.label.chars().count().max(3) + separator.len())
        .collect();

    let fixed_width = rank_width + name_width + points_width + separator.len() * 3;
    let available = get_terminal_width().map(|w| w.saturating_sub(fixed_width + 4));
    let shown = visible_columns(&col_widths, available);
    let first = table.columns.len() - shown;
    let elided = first > 0;

    let mut header = format!("{:>rank_width$}{sep}{}", "Pos", pad_right(title, name_width), sep = separator);
    if elided {
        header.push_str(" ...");
    }
    for (column, width) in table.columns[first..].iter().zip(&col_widths[first..]) {
        header.push_str(&format!("{:>width$}", column.label, width = width));
    }
    header.push_str(&format!("{sep}{:>points_width$}", "Points", sep = separator));

    let mut lines = Vec::with_capacity(table.rows.len() + 1);
    lines.push(if use_colors {
        header.bold().to_string()
    } else {
        header
    });

    for (row, label) in table.rows.iter().zip(&labels) {
        let rank = format!("{:>rank_width$}", row.rank);
        let name = pad_right(&truncate_name(label, name_width), name_width);

        let mut cells = String::new();
        if elided {
            cells.push_str("    ");
        }
        for (cell, width) in row.cells[first..].iter().zip(&col_widths[first..]) {
            cells.push_str(&format!("{:>width$}", format_cell(*cell), width = width));
        }
        let points = format!("{:>points_width$}", format_points(row.points));

        let line = if use_colors {
            format!(
                "{}{sep}{}{}{sep}{}",
                rank.dimmed(),
                name,
                cells,
                points.bold(),
                sep = separator
            )
        } else {
            format!("{}{sep}{}{}{sep}{}", rank, name, cells, points, sep = separator)
        };
        lines.push(line);
    }

    lines.join("\n")
}

/// Format a standings table as tab-separated values with a header row.
/// Missing cells are empty.
pub fn format_standings_tsv(table: &StandingsTable) -> String {
    let mut header = vec!["rank".to_string(), "name".to_string()];
    header.extend(table.columns.iter().map(|c| c.label.clone()));
    header.push("points".to_string());

    let mut lines = vec![header.join("\t")];
    for row in &table.rows {
        let mut fields = vec![row.rank.to_string(), row.entity.name().to_string()];
        fields.extend(row.cells.iter().map(|c| c.map(format_points).unwrap_or_default()));
        fields.push(format_points(row.points));
        lines.push(fields.join("\t"));
    }
    lines.join("\n")
}
