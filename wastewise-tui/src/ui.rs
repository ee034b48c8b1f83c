use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Cell, List, ListItem, Paragraph, Row, Table, Tabs, Wrap},
};
use wastewise_core::model::{Category, GoalProgress, PressureLevel, Suggestion};

use crate::app::{App, LogField, Screen};

pub(crate) fn draw(frame: &mut Frame<'_>, app: &App) {
    let area = frame.area();

    // Outer layout: tabs, main content, status line
    let layout_chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(area);

    let chunks = layout_chunks.as_ref();
    let [header_area, content_area, status_area] = chunks else {
        return;
    };

    let tabs = Tabs::new(Screen::ALL.iter().map(|screen| screen.title()))
        .select(app.screen.index())
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("WasteWise · {}", app.user)),
        );
    frame.render_widget(tabs, *header_area);

    match app.screen {
        Screen::Dashboard => draw_dashboard(frame, app, *content_area),
        Screen::Log => draw_log(frame, app, *content_area),
        Screen::Trend => draw_trend(frame, app, *content_area),
        Screen::Map => draw_map(frame, app, *content_area),
        Screen::Insights => draw_insights(frame, app, *content_area),
    }

    // Status bar
    let nav_hint = match app.screen {
        Screen::Log => {
            "↑/↓ field · ←/→ category · Enter save · Tab next screen · Esc dashboard · Ctrl-C quit"
        }
        _ => "Tab/Shift-Tab or 1-5 switch screen · r refresh · q/Ctrl-C quit",
    };

    let status_text = if app.is_loading {
        format!("Loading… · {nav_hint}")
    } else if let Some(msg) = &app.error_message {
        format!("{msg} · {nav_hint}")
    } else if let Some(msg) = &app.info_message {
        format!("{msg} · {nav_hint}")
    } else {
        nav_hint.to_owned()
    };

    let status_style = if app.error_message.is_some() {
        Style::default().fg(Color::Red)
    } else if app.is_loading {
        Style::default().fg(Color::Yellow)
    } else if app.info_message.is_some() {
        Style::default().fg(Color::Green)
    } else {
        Style::default()
    };

    let status = Paragraph::new(status_text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("Status · tips from {}", app.service.suggestion_source())),
        )
        .style(status_style)
        .wrap(Wrap { trim: true });

    frame.render_widget(status, *status_area);
}

fn draw_dashboard(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let layout_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(8), // stats
            Constraint::Min(0),    // tips
        ])
        .split(area);

    let chunks = layout_chunks.as_ref();
    let [stats_area, tips_area] = chunks else {
        return;
    };

    let Some(stats) = app.stats.as_ref() else {
        let paragraph = Paragraph::new("No statistics loaded yet (press r).")
            .block(Block::default().borders(Borders::ALL).title("Last 30 days"));
        frame.render_widget(paragraph, *stats_area);
        return;
    };

    let goals = [
        (Category::Food, &stats.goals.food),
        (Category::Plastic, &stats.goals.plastic),
        (Category::Energy, &stats.goals.energy),
    ];

    let rows = goals.into_iter().map(|(category, goal)| {
        Row::new(vec![
            Cell::from(category_label(category)),
            Cell::from(format!("{:.2} {}", goal.current, category.default_unit())),
            Cell::from(format!("{:.1} {}", goal.target, category.default_unit())),
            Cell::from(progress_bar(goal)),
        ])
        .style(Style::default().fg(category_color(category)))
    });

    let column_widths = [
        Constraint::Length(12),
        Constraint::Length(14),
        Constraint::Length(12),
        Constraint::Min(20),
    ];

    let table = Table::new(rows, column_widths)
        .header(
            Row::new(vec!["Category", "Total", "Target", "Progress"])
                .style(Style::default().add_modifier(Modifier::BOLD)),
        )
        .block(Block::default().borders(Borders::ALL).title(format!(
            "Last 30 days · {:.2} kg CO2e",
            stats.co2_saved
        )))
        .column_spacing(1);

    frame.render_widget(table, *stats_area);
    draw_suggestions(frame, &app.suggestions, *tips_area, "Top tips");
}

fn draw_log(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let layout_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5), // form
            Constraint::Min(0),    // recent entries
        ])
        .split(area);

    let chunks = layout_chunks.as_ref();
    let [form_area, recent_area] = chunks else {
        return;
    };

    let field = |label: &str, value: String, focused: bool| {
        let marker = if focused { "> " } else { "  " };
        let style = if focused {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        Line::from(vec![
            Span::styled(format!("{marker}{label:<10}"), style),
            Span::raw(value),
        ])
    };

    let form = Paragraph::new(vec![
        field(
            "Category",
            format!("◀ {} ▶", category_label(app.form_category)),
            app.focus == LogField::Category,
        ),
        field(
            "Amount",
            format!("{} {}", app.amount_input, app.form_category.default_unit()),
            app.focus == LogField::Amount,
        ),
        field("Note", app.note_input.clone(), app.focus == LogField::Note),
    ])
    .block(Block::default().borders(Borders::ALL).title("New entry"));

    frame.render_widget(form, *form_area);

    if app.recent.is_empty() {
        let paragraph = Paragraph::new("Nothing logged yet.")
            .block(Block::default().borders(Borders::ALL).title("Recent entries"));
        frame.render_widget(paragraph, *recent_area);
        return;
    }

    let rows = app.recent.iter().map(|entry| {
        Row::new(vec![
            Cell::from(entry.logged_at.format("%d.%m.%Y %H:%M").to_string()),
            Cell::from(category_label(entry.category)),
            Cell::from(format!("{} {}", entry.amount, entry.unit)),
            Cell::from(entry.note.clone().unwrap_or_default()),
        ])
        .style(Style::default().fg(category_color(entry.category)))
    });

    let column_widths = [
        Constraint::Length(17),
        Constraint::Length(10),
        Constraint::Length(12),
        Constraint::Min(10),
    ];

    let table = Table::new(rows, column_widths)
        .header(
            Row::new(vec!["Logged", "Category", "Amount", "Note"])
                .style(Style::default().add_modifier(Modifier::BOLD)),
        )
        .block(Block::default().borders(Borders::ALL).title("Recent entries"))
        .column_spacing(1);

    frame.render_widget(table, *recent_area);
}

fn draw_trend(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let rows = app.trend.iter().map(|point| {
        Row::new(vec![
            Cell::from(point.label.clone()),
            Cell::from(format!("{:.2}", point.food)),
            Cell::from(format!("{:.2}", point.plastic)),
            Cell::from(format!("{:.2}", point.energy)),
        ])
    });

    let column_widths = [
        Constraint::Length(8),
        Constraint::Length(12),
        Constraint::Length(14),
        Constraint::Length(14),
    ];

    let table = Table::new(rows, column_widths)
        .header(
            Row::new(vec!["Week", "Food (kg)", "Plastic (kg)", "Energy (kWh)"])
                .style(Style::default().add_modifier(Modifier::BOLD)),
        )
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Last six weeks (oldest first)"),
        )
        .column_spacing(1);

    frame.render_widget(table, area);
}

fn draw_map(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let rows = app.regions.iter().map(|summary| {
        let region = &summary.region;
        Row::new(vec![
            Cell::from(region.name.clone()),
            Cell::from(format!("{:.4}, {:.4}", region.lat, region.lng)),
            Cell::from(region.level.to_string()),
            Cell::from(format!("{:.1}", summary.food)),
            Cell::from(format!("{:.1}", summary.plastic)),
            Cell::from(format!("{:.1}", summary.energy)),
        ])
        .style(Style::default().fg(level_color(region.level)))
    });

    let column_widths = [
        Constraint::Length(16),
        Constraint::Length(18),
        Constraint::Length(8),
        Constraint::Length(10),
        Constraint::Length(12),
        Constraint::Length(12),
    ];

    let table = Table::new(rows, column_widths)
        .header(
            Row::new(vec![
                "Region",
                "Location",
                "Level",
                "Food kg",
                "Plastic kg",
                "Energy kWh",
            ])
            .style(Style::default().add_modifier(Modifier::BOLD)),
        )
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Regional comparison"),
        )
        .column_spacing(1);

    frame.render_widget(table, area);
}

fn draw_insights(frame: &mut Frame<'_>, app: &App, area: Rect) {
    draw_suggestions(frame, &app.suggestions, area, "Personal insights");
}

fn draw_suggestions(frame: &mut Frame<'_>, suggestions: &[Suggestion], area: Rect, title: &str) {
    let items = if suggestions.is_empty() {
        vec![ListItem::new("No suggestions yet.")]
    } else {
        suggestions
            .iter()
            .map(|tip| {
                ListItem::new(vec![
                    Line::from(vec![
                        Span::raw(format!("{} ", tip.emoji)),
                        Span::styled(
                            tip.title.clone(),
                            Style::default()
                                .fg(category_color(tip.category))
                                .add_modifier(Modifier::BOLD),
                        ),
                    ]),
                    Line::from(format!("   {}", tip.body)),
                    Line::from(""),
                ])
            })
            .collect()
    };

    let list = List::new(items).block(Block::default().borders(Borders::ALL).title(title));
    frame.render_widget(list, area);
}

fn progress_bar(goal: &GoalProgress) -> String {
    const WIDTH: usize = 20;
    let filled = usize::from(goal.pct) * WIDTH / 100;
    format!(
        "{}{} {:>3}%",
        "█".repeat(filled),
        "░".repeat(WIDTH - filled),
        goal.pct
    )
}

fn category_label(category: Category) -> &'static str {
    match category {
        Category::Food => "Food",
        Category::Plastic => "Plastic",
        Category::Energy => "Energy",
    }
}

fn category_color(category: Category) -> Color {
    match category {
        Category::Food => Color::Green,
        Category::Plastic => Color::Cyan,
        Category::Energy => Color::Yellow,
    }
}

fn level_color(level: PressureLevel) -> Color {
    match level {
        PressureLevel::High => Color::Red,
        PressureLevel::Medium => Color::Yellow,
        PressureLevel::Low => Color::Green,
    }
}
