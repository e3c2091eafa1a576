pub mod config;
pub mod ergast;
pub mod logging;
pub mod output;
pub mod scoring;
pub mod standings;
pub mod timeline;
pub mod tui;
