use ratatui::prelude::*;
use ratatui::widgets::{Axis, Block, Chart, Dataset, GraphType, Paragraph};

use crate::output::format_points;
use crate::tui::app::App;
use crate::tui::theme::ThemeColors;

const LEGEND_WIDTH: u16 = 30;

pub fn draw(frame: &mut Frame, app: &App) {
    let area = frame.area();
    let theme = ThemeColors::dark();

    // Handle very small terminal sizes gracefully
    if area.height < 8 || area.width < 40 {
        let msg = Paragraph::new("Terminal too small")
            .alignment(Alignment::Center);
        frame.render_widget(msg, area);
        return;
    }

    // Layout: Title(1) + Chart(fill) + Status(1)
    let chunks = Layout::vertical([
        Constraint::Length(1),
        Constraint::Fill(1),
        Constraint::Length(1),
    ])
    .split(area);

    render_title(frame, chunks[0], app, &theme);

    if app.show_legend && chunks[1].width > LEGEND_WIDTH + 30 {
        let body = Layout::horizontal([Constraint::Fill(1), Constraint::Length(LEGEND_WIDTH)])
            .split(chunks[1]);
        render_chart(frame, body[0], app, &theme);
        render_legend(frame, body[1], app, &theme);
    } else {
        render_chart(frame, chunks[1], app, &theme);
    }

    render_status_bar(frame, chunks[2], app, &theme);
}

fn render_title(frame: &mut Frame, area: Rect, app: &App, theme: &ThemeColors) {
    let title = Line::from(Span::styled(
        app.title.clone(),
        Style::default().fg(theme.title_color).bold(),
    ));
    frame.render_widget(Paragraph::new(title), area);
}

/// Labels for the x axis. Ratatui spreads labels evenly, so with many
/// columns only the first, middle and last are shown. The middle one is the
/// column ratatui places at the centre, `(len - 1) / 2`.
fn x_axis_labels(labels: &[String], width: u16) -> Vec<String> {
    let max_labels = (width as usize / 6).max(2);
    if labels.len() <= max_labels {
        return labels.to_vec();
    }
    let mid = (labels.len() - 1) / 2;
    vec![
        labels[0].clone(),
        labels[mid].clone(),
        labels[labels.len() - 1].clone(),
    ]
}

fn render_chart(frame: &mut Frame, area: Rect, app: &App, theme: &ThemeColors) {
    let block = Block::bordered()
        .border_style(Style::default().fg(theme.legend_border))
        .title(" Cumulative points ");

    if app.series.is_empty() || app.x_labels.is_empty() {
        let empty_msg = Paragraph::new("Nothing to plot")
            .alignment(Alignment::Center)
            .block(block);
        frame.render_widget(empty_msg, area);
        return;
    }

    // Highlighted series is drawn last so it sits on top
    let mut order: Vec<usize> = (0..app.series.len()).collect();
    if let Some(h) = app.highlighted {
        order.retain(|&i| i != h);
        order.push(h);
    }

    let datasets: Vec<Dataset> = order
        .iter()
        .map(|&i| {
            let series = &app.series[i];
            let color = match app.highlighted {
                Some(h) if h != i => theme.dimmed_series,
                _ => series.style.color,
            };
            Dataset::default()
                .marker(series.style.line.marker())
                .graph_type(GraphType::Line)
                .style(Style::default().fg(color))
                .data(&series.points)
        })
        .collect();

    let [y_min, y_max] = app.y_bounds();
    let y_labels = vec![
        format_points(y_min),
        format_points((y_min + y_max) / 2.0),
        format_points(y_max),
    ];

    let chart = Chart::new(datasets)
        .block(block)
        .x_axis(
            Axis::default()
                .title("Round")
                .style(Style::default().fg(theme.axis_color))
                .bounds(app.x_bounds())
                .labels(x_axis_labels(&app.x_labels, area.width)),
        )
        .y_axis(
            Axis::default()
                .title("Points")
                .style(Style::default().fg(theme.axis_color))
                .bounds([y_min, y_max])
                .labels(y_labels),
        );

    frame.render_widget(chart, area);
}

fn render_legend(frame: &mut Frame, area: Rect, app: &App, theme: &ThemeColors) {
    let block = Block::bordered()
        .border_style(Style::default().fg(theme.legend_border))
        .title(" Legend ");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let name_width = (inner.width as usize).saturating_sub(12);
    let lines: Vec<Line> = app
        .series
        .iter()
        .enumerate()
        .map(|(i, series)| {
            let name: String = series.name.chars().take(name_width).collect();
            let mut line = Line::from(vec![
                Span::styled(series.style.line.swatch(), Style::default().fg(series.style.color)),
                Span::raw(" "),
                Span::raw(format!("{:<width$}", name, width = name_width)),
                Span::styled(
                    format!("{:>6}", format_points(series.total)),
                    Style::default().fg(theme.muted),
                ),
            ]);
            if app.highlighted == Some(i) {
                line = line.style(theme.highlight_style);
            }
            line
        })
        .collect();

    frame.render_widget(Paragraph::new(lines), inner);
}

fn render_status_bar(frame: &mut Frame, area: Rect, app: &App, theme: &ThemeColors) {
    let hints = [
        ("j/k", ":highlight "),
        ("a", ":all "),
        ("l", if app.show_legend { ":hide legend " } else { ":show legend " }),
        ("q", ":quit"),
    ];

    let mut spans = vec![
        Span::styled(
            format!("{} series, {} sessions", app.series.len(), app.x_labels.len()),
            Style::default().fg(theme.muted),
        ),
        Span::raw("  "),
    ];
    for (i, (key, label)) in hints.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw(" "));
        }
        spans.push(Span::styled(*key, Style::default().fg(theme.status_key_color)));
        spans.push(Span::raw(*label));
    }

    frame.render_widget(
        Paragraph::new(Line::from(spans)).style(Style::default().bg(theme.status_bar_bg)),
        area,
    );
}
