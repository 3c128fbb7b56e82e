//! Dashboard rendering
//!
//! Pure functions of [`App`] state; nothing here mutates the app.

use crate::dashboard::{
    should_render_grid, DetailState, DialogState, Field, LoadState, Tone, VehicleDetail,
};
use crate::ui::app::{App, Screen};
use crate::ui::theme::Palette;
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState, Wrap},
};

const SPINNER_FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
const SKELETON_ROWS: usize = 5;

/// Draw the whole dashboard
pub fn draw(frame: &mut Frame, app: &App) {
    let palette = app.theme().palette();
    frame.render_widget(
        Block::default().style(Style::default().fg(palette.fg).bg(palette.bg)),
        frame.area(),
    );

    match app.screen() {
        Screen::List | Screen::Dialog => draw_list(frame, frame.area(), app, &palette),
        Screen::Detail | Screen::Lightbox => draw_detail(frame, frame.area(), app, &palette),
    }

    if app.screen() == Screen::Dialog {
        draw_dialog(frame, app, &palette);
    }
    if app.screen() == Screen::Lightbox {
        draw_lightbox(frame, app, &palette);
    }
}

fn spinner(app: &App) -> &'static str {
    SPINNER_FRAMES[app.frame_count() % SPINNER_FRAMES.len()]
}

fn draw_list(frame: &mut Frame, area: Rect, app: &App, palette: &Palette) {
    let controller = app.controller();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(5),    // Table
            Constraint::Length(1), // Pagination
            Constraint::Length(1), // Status
            Constraint::Length(1), // Footer
        ])
        .split(area);

    // Header
    let health = match controller.health() {
        Some(status) => Span::styled(
            format!(" API: {} ", status),
            Style::default().fg(palette.success),
        ),
        None => Span::styled(" API: unknown ", Style::default().fg(palette.muted)),
    };
    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            "Vehicle Collection",
            Style::default().fg(palette.accent).add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        health,
    ]))
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Style::default().fg(palette.border)),
    );
    frame.render_widget(header, chunks[0]);

    // Body
    let page = controller.page();
    let block = Block::default()
        .title(" Inventory ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(palette.border));

    if controller.load_state() == LoadState::InitialLoading {
        let rows = (0..SKELETON_ROWS).map(|_| {
            Row::new(vec![
                "░░░░░░░░░░░░░░░░░",
                "░░░░░░░░",
                "░░░░░░░░",
                "░░░░░░░░░░",
            ])
                .style(Style::default().fg(palette.muted))
        });
        frame.render_widget(Table::new(rows, table_widths()).block(block), chunks[1]);
    } else if page.items.is_empty() {
        let empty = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(
                "No vehicles yet",
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                "Press 'a' to add the first vehicle to the inventory.",
                Style::default().fg(palette.muted),
            )),
        ])
        .alignment(Alignment::Center)
        .block(block);
        frame.render_widget(empty, chunks[1]);
    } else {
        let header = Row::new(vec!["VIN", "Make", "Model", "Added"])
            .style(Style::default().fg(palette.accent).add_modifier(Modifier::BOLD));
        let rows = page.items.iter().map(|item| {
            let added = item
                .created_at()
                .map(|ts| ts.format("%b %-d, %Y").to_string())
                .unwrap_or_else(|| "—".to_string());
            Row::new(vec![
                Cell::from(item.vin.clone()),
                Cell::from(item.make.clone()),
                Cell::from(item.model.clone()),
                Cell::from(added),
            ])
        });
        let table = Table::new(rows, table_widths())
            .header(header)
            .block(block)
            .row_highlight_style(
                Style::default()
                    .bg(palette.highlight_bg)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("▶ ");
        let mut state = TableState::default().with_selected(Some(app.selected()));
        frame.render_stateful_widget(table, chunks[1], &mut state);
    }

    // Pagination
    let mut pagination = vec![Span::raw(format!(
        "Showing {}–{} of {} vehicles · Page {} of {}",
        page.range_start(),
        page.range_end(),
        page.total,
        page.page,
        page.page_count()
    ))];
    if controller.load_state() != LoadState::Idle {
        pagination.push(Span::styled(
            format!("  {} Loading…", spinner(app)),
            Style::default().fg(palette.accent),
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(pagination)), chunks[2]);

    // Status (the dialog shows its own)
    if !controller.is_dialog_open() {
        if let Some(status) = controller.status() {
            frame.render_widget(status_line(&status.text, status.tone, palette), chunks[3]);
        }
    }

    let footer = Paragraph::new(
        " ↑/↓ select | Enter details | ←/→ page | a add | r refresh | t theme | q quit",
    )
    .style(Style::default().fg(palette.muted))
    .alignment(Alignment::Center);
    frame.render_widget(footer, chunks[4]);
}

fn table_widths() -> [Constraint; 4] {
    [
        Constraint::Length(19),
        Constraint::Percentage(25),
        Constraint::Percentage(25),
        Constraint::Min(14),
    ]
}

fn status_line<'a>(text: &'a str, tone: Tone, palette: &Palette) -> Paragraph<'a> {
    let color = match tone {
        Tone::Success => palette.success,
        Tone::Error => palette.error,
    };
    Paragraph::new(text).style(Style::default().fg(color)).wrap(Wrap { trim: true })
}

fn draw_dialog(frame: &mut Frame, app: &App, palette: &Palette) {
    let controller = app.controller();
    let draft = controller.draft();
    let area = centered_rect(70, 90, frame.area());
    frame.render_widget(Clear, area);

    let block = Block::default()
        .title(" Add Vehicle ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(palette.accent));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut lines = vec![Line::from(Span::styled(
        "Fill in the details below. Tab moves between fields, Enter submits, Esc cancels.",
        Style::default().fg(palette.muted),
    ))];

    for field in Field::ALL {
        let focused = app.focus() == field;
        let label_style = if focused {
            Style::default().fg(palette.accent).add_modifier(Modifier::BOLD)
        } else {
            Style::default().add_modifier(Modifier::BOLD)
        };
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(field.label(), label_style)));

        let value = draft.value(field).replace('\n', " ⏎ ");
        let cursor = if focused { "▏" } else { "" };
        let input_style = if focused {
            Style::default().bg(palette.highlight_bg)
        } else {
            Style::default()
        };
        lines.push(Line::from(Span::styled(format!("> {}{}", value, cursor), input_style)));

        if let Some(error) = draft.visible_error(field) {
            lines.push(Line::from(Span::styled(error, Style::default().fg(palette.error))));
        }
        if field == Field::ImageUrls {
            let count = draft.image_urls().len();
            let plural = if count == 1 { "" } else { "s" };
            lines.push(Line::from(Span::styled(
                format!(
                    "{} image URL{} (separate with commas; Alt+Enter for a new line)",
                    count, plural
                ),
                Style::default().fg(palette.muted),
            )));
        }
    }

    lines.push(Line::from(""));
    if controller.dialog() == DialogState::Submitting {
        lines.push(Line::from(Span::styled(
            format!("{} Submitting…", spinner(app)),
            Style::default().fg(palette.accent),
        )));
    } else if let Some(status) = controller.status() {
        let color = match status.tone {
            Tone::Success => palette.success,
            Tone::Error => palette.error,
        };
        lines.push(Line::from(Span::styled(status.text.clone(), Style::default().fg(color))));
    }

    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
}

fn draw_detail(frame: &mut Frame, area: Rect, app: &App, palette: &Palette) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([Constraint::Min(5), Constraint::Length(1)])
        .split(area);

    match app.detail().state() {
        Some(DetailState::Loading { vin }) => {
            let loading = Paragraph::new(format!("{} Loading vehicle {}…", spinner(app), vin))
                .alignment(Alignment::Center)
                .block(Block::default().borders(Borders::ALL));
            frame.render_widget(loading, chunks[0]);
        }
        Some(DetailState::NotFound { vin }) => {
            let not_found = Paragraph::new(vec![
                Line::from(""),
                Line::from(Span::styled(
                    "Vehicle not found",
                    Style::default().fg(palette.error).add_modifier(Modifier::BOLD),
                )),
                Line::from(format!("No vehicle with VIN {} exists in the inventory.", vin)),
            ])
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
            frame.render_widget(not_found, chunks[0]);
        }
        Some(DetailState::Loaded { detail, .. }) => draw_vehicle(frame, chunks[0], detail, palette),
        None => {}
    }

    let footer = Paragraph::new(" Esc back | Enter open gallery | ←/→ browse images")
        .style(Style::default().fg(palette.muted))
        .alignment(Alignment::Center);
    frame.render_widget(footer, chunks[1]);
}

fn draw_vehicle(frame: &mut Frame, area: Rect, detail: &VehicleDetail, palette: &Palette) {
    let show_gallery = should_render_grid(detail.gallery.len());
    let mut constraints = vec![
        Constraint::Length(3), // Title
        Constraint::Length(6), // Details
        Constraint::Min(3),    // Description
    ];
    if show_gallery {
        constraints.push(Constraint::Length(detail.gallery.len().min(8) as u16 + 2));
    }
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    let title = Paragraph::new(Line::from(vec![
        Span::styled(
            detail.title(),
            Style::default().fg(palette.accent).add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled("VIN Verified", Style::default().fg(palette.success)),
        Span::raw("  "),
        Span::styled(format!("Added · {}", detail.added_on), Style::default().fg(palette.muted)),
    ]))
    .block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Style::default().fg(palette.border)),
    );
    frame.render_widget(title, chunks[0]);

    let vehicle = &detail.vehicle;
    let rows = vec![
        Row::new(vec![Cell::from("VIN"), Cell::from(vehicle.vin.clone())]),
        Row::new(vec![Cell::from("Make"), Cell::from(vehicle.make.clone())]),
        Row::new(vec![Cell::from("Model"), Cell::from(vehicle.model.clone())]),
        Row::new(vec![Cell::from("Added On"), Cell::from(detail.added_on.clone())]),
    ];
    let details = Table::new(rows, [Constraint::Length(10), Constraint::Min(10)]).block(
        Block::default()
            .title(" Vehicle Details ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(palette.border)),
    );
    frame.render_widget(details, chunks[1]);

    let description = Paragraph::new(vec![
        Line::from(vehicle.description.clone()),
        Line::from(""),
        Line::from(Span::styled(
            format!("Hero image: {}", detail.hero_image()),
            Style::default().fg(palette.muted),
        )),
    ])
    .wrap(Wrap { trim: true })
    .block(
        Block::default()
            .title(" Description ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(palette.border)),
    );
    frame.render_widget(description, chunks[2]);

    if show_gallery {
        let lines: Vec<Line> = detail
            .gallery
            .iter()
            .enumerate()
            .map(|(i, url)| Line::from(format!("{:>2}. {}", i + 1, url)))
            .collect();
        let gallery = Paragraph::new(lines).block(
            Block::default()
                .title(format!(" Gallery · {} Photos ", detail.gallery.len()))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(palette.border)),
        );
        frame.render_widget(gallery, chunks[3]);
    }
}

fn draw_lightbox(frame: &mut Frame, app: &App, palette: &Palette) {
    let Some(DetailState::Loaded { detail, lightbox }) = app.detail().state() else {
        return;
    };
    let Some(index) = lightbox.selected() else {
        return;
    };

    let area = centered_rect(80, 40, frame.area());
    frame.render_widget(Clear, area);

    let url = detail.gallery.get(index).map(String::as_str).unwrap_or_default();
    let body = Paragraph::new(vec![
        Line::from(Span::styled(
            format!("{} - Image {}", detail.title(), index + 1),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(url.to_string()),
        Line::from(""),
        Line::from(Span::styled(
            format!("{} of {}  ·  ← previous  → next  Esc close", index + 1, lightbox.len()),
            Style::default().fg(palette.muted),
        )),
    ])
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true })
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(palette.accent)),
    );
    frame.render_widget(body, area);
}

/// Rectangle of `percent_x` by `percent_y` centered in `area`
fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}
