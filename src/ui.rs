//! Terminal rendering for the asteroid explorer.
//!
//! One frame is a tab bar, the active view, and a single footer line that
//! shows the date prompt, a flash notice, the loading spinner or key help.

use crate::app::{App, ViewMode};
use crate::handlers::{AsteroidsView, PictureView};
use chrono::NaiveDate;
use ratatui::{prelude::*, widgets::*};

const SPINNER: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Renders one frame based on current application state.
///
/// # Arguments
///
/// * `f` - The ratatui frame to draw into (from `terminal.draw()`).
/// * `app` - Current application state (loaded views, selection, prompt, etc.).
pub fn render(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0), Constraint::Length(1)])
        .split(f.size());

    render_tabs(f, app, chunks[0]);

    match app.view_mode {
        ViewMode::Home => render_home_view(f, chunks[1]),
        ViewMode::Asteroids => match &app.asteroids {
            Some(view) => render_asteroids_view(f, app, view, chunks[1]),
            None => render_waiting(f, app, " Asteroids ", chunks[1]),
        },
        ViewMode::Picture => match &app.picture {
            Some(view) => render_picture_view(f, view, chunks[1]),
            None => render_waiting(f, app, " Picture of the Day ", chunks[1]),
        },
    }

    render_footer(f, app, chunks[2]);
}

fn render_tabs(f: &mut Frame, app: &App, area: Rect) {
    let titles: Vec<Line> = ViewMode::ALL
        .iter()
        .enumerate()
        .map(|(i, mode)| Line::from(format!(" {} {} ", i + 1, mode.title())))
        .collect();
    let selected = ViewMode::ALL.iter().position(|m| *m == app.view_mode).unwrap_or(0);

    let tabs = Tabs::new(titles)
        .select(selected)
        .block(
            Block::default()
                .title(" Asteroid Explorer ")
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded),
        )
        .highlight_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD));
    f.render_widget(tabs, area);
}

fn render_home_view(f: &mut Frame, area: Rect) {
    let bold = Style::default().add_modifier(Modifier::BOLD);
    let text = vec![
        Line::from(Span::styled("Near-Earth objects and the astronomy picture of the day", bold)),
        Line::from(""),
        Line::from("Data comes from the NASA open APIs (NeoWs feed and APOD)."),
        Line::from(""),
        Line::from(vec![Span::styled("  2 ", bold), Span::raw("Asteroids passing Earth in a window of up to 7 days")]),
        Line::from(vec![Span::styled("  3 ", bold), Span::raw("Astronomy picture of the day for any past date")]),
        Line::from(""),
        Line::from(Span::styled(
            "The list view exports the shown window to an Excel workbook.",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let p = Paragraph::new(text).block(
        Block::default()
            .borders(Borders::ALL)
            .padding(Padding::new(2, 2, 1, 1)),
    );
    f.render_widget(p, area);
}

fn render_waiting(f: &mut Frame, app: &App, title: &str, area: Rect) {
    let spinner = SPINNER[app.tick_count % SPINNER.len()];
    let p = Paragraph::new(format!("{} Contacting NASA...", spinner))
        .alignment(Alignment::Center)
        .block(Block::default().title(title).borders(Borders::ALL));
    f.render_widget(p, area);
}

fn render_asteroids_view(f: &mut Frame, app: &App, view: &AsteroidsView, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(4), Constraint::Min(0)])
        .split(area);

    let bold = Style::default().add_modifier(Modifier::BOLD);
    let mut summary = vec![Line::from(vec![
        Span::styled("  WINDOW: ", bold),
        Span::styled(view.range.to_string(), Style::default().fg(Color::Yellow)),
        Span::raw("  │  "),
        Span::styled("OBJECTS: ", bold),
        Span::styled(view.observations.len().to_string(), Style::default().fg(Color::Cyan)),
        Span::raw("  │  "),
        Span::styled("HAZARDOUS: ", bold),
        Span::styled(view.hazardous_count().to_string(), Style::default().fg(Color::Red)),
    ])];
    if let Some(error) = &view.error {
        summary.push(Line::from(Span::styled(format!("  {}", error), Style::default().fg(Color::Red))));
    } else if view.skipped > 0 {
        summary.push(Line::from(Span::styled(
            format!("  {} entries could not be read and were left out", view.skipped),
            Style::default().fg(Color::Yellow),
        )));
    }

    let summary_block = Paragraph::new(summary).block(
        Block::default()
            .title(" Close Approaches ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray)),
    );
    f.render_widget(summary_block, chunks[0]);

    let header = Row::new(vec!["Name", "Diameter (km)", "Hazardous", "Approach", "Miss Distance (km)", "Body"])
        .style(bold.fg(Color::Cyan));

    let rows: Vec<Row> = view
        .observations
        .iter()
        .map(|obs| {
            let hazard = if obs.is_potentially_hazardous {
                Cell::from("Yes").style(Style::default().fg(Color::Red))
            } else {
                Cell::from("No")
            };
            Row::new(vec![
                Cell::from(obs.name.clone()),
                Cell::from(format!("{:.3}", obs.estimated_diameter_km)),
                hazard,
                Cell::from(format_date(obs.close_approach_date)),
                Cell::from(format!("{:.0}", obs.miss_distance_km)),
                Cell::from(obs.orbiting_body.clone().unwrap_or_else(|| "N/A".to_string())),
            ])
        })
        .collect();

    let widths = [
        Constraint::Percentage(28),
        Constraint::Percentage(14),
        Constraint::Percentage(10),
        Constraint::Percentage(14),
        Constraint::Percentage(20),
        Constraint::Percentage(14),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(Block::default().borders(Borders::ALL).border_type(BorderType::Rounded))
        .highlight_style(Style::default().bg(Color::Rgb(30, 30, 60)).add_modifier(Modifier::BOLD));

    let mut state = TableState::default();
    if !view.observations.is_empty() {
        state.select(Some(app.selected_index.min(view.observations.len() - 1)));
    }
    f.render_stateful_widget(table, chunks[1], &mut state);
}

fn render_picture_view(f: &mut Frame, view: &PictureView, area: Rect) {
    let pic = &view.picture;
    let bold = Style::default().add_modifier(Modifier::BOLD);
    let or_na = |v: &Option<String>| v.clone().unwrap_or_else(|| "N/A".to_string());

    let mut lines = Vec::new();
    if let Some(error) = &view.error {
        lines.push(Line::from(Span::styled(error.clone(), Style::default().fg(Color::Red))));
        lines.push(Line::from(""));
    }
    lines.push(Line::from(Span::styled(
        if pic.title.is_empty() { "Untitled".to_string() } else { pic.title.clone() },
        bold.fg(Color::Yellow),
    )));
    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled("Date:       ", bold),
        Span::raw(format_date(pic.date.or(Some(view.date)))),
    ]));
    lines.push(Line::from(vec![Span::styled("Media:      ", bold), Span::raw(pic.media_type.clone())]));
    lines.push(Line::from(vec![Span::styled("Copyright:  ", bold), Span::raw(or_na(&pic.copyright))]));
    lines.push(Line::from(vec![
        Span::styled("URL:        ", bold),
        Span::styled(or_na(&pic.url), Style::default().fg(Color::Cyan)),
    ]));
    lines.push(Line::from(vec![
        Span::styled("HD URL:     ", bold),
        Span::styled(or_na(&pic.hd_url), Style::default().fg(Color::Cyan)),
    ]));
    lines.push(Line::from(""));
    if let Some(explanation) = &pic.explanation {
        lines.push(Line::from(explanation.clone()));
    }

    let p = Paragraph::new(lines).wrap(Wrap { trim: true }).block(
        Block::default()
            .title(" Astronomy Picture of the Day ")
            .borders(Borders::ALL)
            .padding(Padding::new(2, 2, 1, 1)),
    );
    f.render_widget(p, area);
}

fn render_footer(f: &mut Frame, app: &App, area: Rect) {
    let line = if let Some(input) = &app.input {
        let hint = match app.view_mode {
            ViewMode::Picture => "DATE",
            _ => "START END (use - to skip)",
        };
        Line::from(vec![
            Span::styled(format!(" {}: ", hint), Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(input.clone()),
            Span::styled("█", Style::default().fg(Color::Cyan)),
        ])
    } else if let Some(flash) = &app.flash {
        Line::from(Span::styled(format!(" {}", flash), Style::default().fg(Color::Yellow)))
    } else if app.is_loading() {
        let spinner = SPINNER[app.tick_count % SPINNER.len()];
        Line::from(Span::styled(format!(" {} Loading...", spinner), Style::default().fg(Color::Cyan)))
    } else {
        Line::from(Span::styled(key_help(app.view_mode), Style::default().fg(Color::DarkGray)))
    };
    f.render_widget(Paragraph::new(line), area);
}

fn key_help(mode: ViewMode) -> &'static str {
    match mode {
        ViewMode::Home => " q quit │ tab/1-3 switch view",
        ViewMode::Asteroids => " q quit │ j/k select │ [ ] week │ / dates │ r reload │ e export",
        ViewMode::Picture => " q quit │ h/l day │ t today │ / date │ r reload",
    }
}

fn format_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "N/A".to_string())
}
