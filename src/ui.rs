use crate::app::App;
use crate::reading::{LedState, format_value};
use crate::stats::SnapshotStats;
use chrono::{DateTime, Local, Utc};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols,
    text::{Line, Span},
    widgets::{
        Block, Borders, Cell, Paragraph, Row, Table,
        canvas::{Canvas, Points},
    },
};
use std::f64::consts::TAU;

/// Sector color for readings at or above the threshold.
const ON_COLOR: Color = Color::Green;
/// Sector color for readings below the threshold.
const OFF_COLOR: Color = Color::Red;

/// Renders the entire UI.
pub fn render(frame: &mut Frame, app: &App) {
    let stats = SnapshotStats::compute(app.snapshot(), app.threshold);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),  // Header
            Constraint::Length(12), // Stats + pie chart
            Constraint::Min(8),     // Table
            Constraint::Length(3),  // Pagination
            Constraint::Length(3),  // Footer/help
        ])
        .split(frame.area());

    render_header(frame, chunks[0], app);
    render_overview(frame, chunks[1], &stats);
    render_table(frame, chunks[2], app);
    render_pagination(frame, chunks[3], app);
    render_footer(frame, chunks[4]);
}

/// Formats how long ago the last refresh landed.
fn format_refresh_age(last: DateTime<Utc>) -> String {
    let secs = Utc::now().signed_duration_since(last).num_seconds().max(0);
    if secs < 60 {
        format!("{}s ago", secs)
    } else {
        format!("{}m {}s ago", secs / 60, secs % 60)
    }
}

/// Renders the header with title, clock, and refresh age.
fn render_header(frame: &mut Frame, area: Rect, app: &App) {
    let now = Local::now();

    let refresh = match app.last_refresh {
        Some(at) => format!("updated {}", format_refresh_age(at)),
        None => "waiting for first snapshot".to_string(),
    };

    let spans = vec![
        Span::styled(
            "sensortop",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" │ "),
        Span::styled(
            now.format("%H:%M:%S").to_string(),
            Style::default().fg(Color::White),
        ),
        Span::raw(" │ "),
        Span::styled(refresh, Style::default().fg(Color::DarkGray)),
    ];

    let header = Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::BOTTOM));

    frame.render_widget(header, area);
}

/// Renders the statistics panel and the LED pie chart side by side.
fn render_overview(frame: &mut Frame, area: Rect, stats: &SnapshotStats) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(area);

    render_stats_panel(frame, chunks[0], stats);
    render_pie_chart(frame, chunks[1], stats);
}

/// Renders total/average/max/min over the current snapshot.
fn render_stats_panel(frame: &mut Frame, area: Rect, stats: &SnapshotStats) {
    let value_style = Style::default().fg(Color::Cyan);

    let lines = vec![
        Line::from(vec![
            Span::raw("Total readings: "),
            Span::styled(format!("{}", stats.count), value_style),
        ]),
        Line::from(vec![
            Span::raw("Average height: "),
            Span::styled(format!("{} cm", stats.average_display()), value_style),
        ]),
        Line::from(vec![
            Span::raw("Max height:     "),
            Span::styled(format!("{} cm", format_value(stats.max)), value_style),
        ]),
        Line::from(vec![
            Span::raw("Min height:     "),
            Span::styled(format!("{} cm", format_value(stats.min)), value_style),
        ]),
    ];

    let panel =
        Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("Statistics"));
    frame.render_widget(panel, area);
}

/// Renders the two-sector LED state pie chart with a legend.
fn render_pie_chart(frame: &mut Frame, area: Rect, stats: &SnapshotStats) {
    let block = Block::default().borders(Borders::ALL).title("LED State");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if stats.count == 0 {
        let no_data = Paragraph::new("No data yet...").style(Style::default().fg(Color::DarkGray));
        frame.render_widget(no_data, inner);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(20), Constraint::Length(24)])
        .split(inner);

    let on_fraction = stats.on_fraction();
    let (on_points, off_points) = pie_points(on_fraction);

    let canvas = Canvas::default()
        .marker(symbols::Marker::Braille)
        .x_bounds([-1.2, 1.2])
        .y_bounds([-1.2, 1.2])
        .paint(move |ctx| {
            ctx.draw(&Points {
                coords: &on_points,
                color: ON_COLOR,
            });
            ctx.draw(&Points {
                coords: &off_points,
                color: OFF_COLOR,
            });
        });
    frame.render_widget(canvas, chunks[0]);

    let pct = |n: usize| 100.0 * n as f64 / stats.count as f64;
    let legend = vec![
        Line::from(vec![
            Span::styled("■ ", Style::default().fg(ON_COLOR)),
            Span::raw(format!("On   {} ({:.1}%)", stats.led_on, pct(stats.led_on))),
        ]),
        Line::from(vec![
            Span::styled("■ ", Style::default().fg(OFF_COLOR)),
            Span::raw(format!(
                "Off  {} ({:.1}%)",
                stats.led_off,
                pct(stats.led_off)
            )),
        ]),
    ];
    frame.render_widget(Paragraph::new(legend), chunks[1]);
}

/// Builds the filled-disc point sets for the pie chart. The On sector
/// sweeps clockwise from twelve o'clock over `on_fraction` of the circle;
/// the Off sector covers the rest.
fn pie_points(on_fraction: f64) -> (Vec<(f64, f64)>, Vec<(f64, f64)>) {
    const RINGS: usize = 24;
    const SPOKES: usize = 180;

    let mut on = Vec::new();
    let mut off = Vec::new();
    let boundary = on_fraction.clamp(0.0, 1.0) * TAU;

    for spoke in 0..SPOKES {
        let sweep = (spoke as f64 + 0.5) / SPOKES as f64 * TAU;
        // Clockwise from twelve o'clock.
        let angle = std::f64::consts::FRAC_PI_2 - sweep;
        let bucket = if sweep < boundary { &mut on } else { &mut off };
        for ring in 1..=RINGS {
            let r = ring as f64 / RINGS as f64;
            bucket.push((r * angle.cos(), r * angle.sin()));
        }
    }

    (on, off)
}

/// Renders the paginated readings table.
fn render_table(frame: &mut Frame, area: Rect, app: &App) {
    let header_cells = ["ID", "Height (cm)", "Recorded", "LED"]
        .iter()
        .map(|h| Cell::from(*h).style(Style::default().fg(Color::Yellow)));
    let header = Row::new(header_cells).height(1);

    let rows: Vec<Row> = app
        .current_page_rows()
        .iter()
        .map(|reading| {
            let state = LedState::classify(reading.value, app.threshold);
            let (dot_color, label) = match state {
                LedState::On => (ON_COLOR, state.label()),
                LedState::Off => (OFF_COLOR, state.label()),
            };

            Row::new(vec![
                Cell::from(format!("{}", reading.id)),
                Cell::from(format_value(reading.value)),
                Cell::from(
                    reading
                        .timestamp
                        .with_timezone(&Local)
                        .format("%Y-%m-%d %H:%M:%S")
                        .to_string(),
                ),
                Cell::from(Line::from(vec![
                    Span::styled("● ", Style::default().fg(dot_color)),
                    Span::raw(label),
                ])),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(10), // ID
            Constraint::Length(14), // Height
            Constraint::Length(22), // Timestamp
            Constraint::Min(8),     // LED state
        ],
    )
    .header(header)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title("Sensor Readings"),
    );

    frame.render_widget(table, area);
}

/// Renders the pagination bar. The bound that cannot be navigated is dimmed.
fn render_pagination(frame: &mut Frame, area: Rect, app: &App) {
    let enabled = Style::default().fg(Color::Yellow);
    let disabled = Style::default().fg(Color::DarkGray);

    let prev_style = if app.pager.at_first() { disabled } else { enabled };
    let next_style = if app.pager.at_last() { disabled } else { enabled };

    let spans = vec![
        Span::styled("← prev", prev_style),
        Span::raw("   "),
        Span::styled(
            format!(
                "page {}/{}",
                app.pager.current_page(),
                app.pager.total_pages()
            ),
            Style::default().fg(Color::White),
        ),
        Span::raw("   "),
        Span::styled("next →", next_style),
    ];

    let bar = Paragraph::new(Line::from(spans))
        .centered()
        .block(Block::default().borders(Borders::ALL));

    frame.render_widget(bar, area);
}

/// Renders the footer with key help.
fn render_footer(frame: &mut Frame, area: Rect) {
    let spans = vec![
        Span::styled("q", Style::default().fg(Color::Yellow)),
        Span::raw(" quit  "),
        Span::styled("←/→", Style::default().fg(Color::Yellow)),
        Span::raw(" page  "),
        Span::styled("r", Style::default().fg(Color::Yellow)),
        Span::raw(" refresh now"),
    ];

    let help = Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::TOP));

    frame.render_widget(help, area);
}
