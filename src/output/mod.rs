pub mod formatter;

pub use formatter::{
    format_fastest_lap, format_points, format_session_table, format_session_tsv,
    format_standings_table, format_standings_tsv, should_use_colors,
};
