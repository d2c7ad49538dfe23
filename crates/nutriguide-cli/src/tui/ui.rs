//! TUI rendering using ratatui.

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Gauge, Paragraph, Row, Table, Tabs, Wrap};

use nutriguide_core::controller::AppState;
use nutriguide_core::onboarding::STEP_COUNT;
use nutriguide_core::views::{
    self, DashboardSummary, MealCard, format_amount, humanize, meal_cards, mood_label,
    tip_category_label,
};

use super::app::{App, OnboardField, ProgressField, Tab, TipsFeed};

/// Render the current screen.
pub fn render(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),    // main content
            Constraint::Length(1), // status bar
        ])
        .split(f.area());

    let state = app.controller.state();
    let hints = if let Some(label) = app.busy {
        render_loading(f, label, chunks[0]);
        "Esc:cancel"
    } else {
        match &state {
            AppState::Onboarding => {
                render_onboarding(f, app, chunks[0]);
                "Up/Down:field  Left/Right:adjust  Enter:next  Esc:back"
            }
            AppState::Loading => {
                render_loading(f, "Your plan is incomplete. Press g to generate it.", chunks[0]);
                "g:generate  q:quit"
            }
            AppState::Failed { reason } => {
                render_failed(f, reason, chunks[0]);
                "r:retry  L:start over  q:quit"
            }
            AppState::Ready => {
                render_main(f, app, chunks[0]);
                tab_hints(app.tab)
            }
        }
    };

    render_status_bar(f, app, &state, hints, chunks[1]);
}

fn tab_hints(tab: Tab) -> &'static str {
    match tab {
        Tab::Dashboard => "Tab:switch  g:regenerate  q:quit",
        Tab::Meals => "Tab:switch  j/k:day  q:quit",
        Tab::Progress => "Tab:switch  Up/Down:field  Left/Right:adjust  Enter:save",
        Tab::Tips => "Tab:switch  r:refresh  q:quit",
        Tab::Profile => "Tab:switch  L:start over  q:quit",
    }
}

fn titled(title: &str) -> Block<'static> {
    Block::default().borders(Borders::ALL).title(format!(" {title} "))
}

fn heading(text: &str) -> Line<'static> {
    Line::from(Span::styled(
        text.to_string(),
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    ))
}

/// Fixed-width text bar for a 0-100 value.
fn text_bar(percent: u16, width: usize) -> String {
    let filled = width * usize::from(percent.min(100)) / 100;
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

// -- Full-screen states --

fn render_loading(f: &mut Frame, label: &str, area: Rect) {
    let text = vec![
        Line::from(""),
        Line::from(Span::styled(
            label.to_string(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "This can take a little while.",
            Style::default().fg(Color::DarkGray),
        )),
    ];
    let p = Paragraph::new(text)
        .alignment(Alignment::Center)
        .block(titled("NutriGuide"));
    f.render_widget(p, area);
}

fn render_failed(f: &mut Frame, reason: &str, area: Rect) {
    let text = vec![
        Line::from(""),
        heading("We couldn't generate your plan"),
        Line::from(""),
        Line::from(Span::styled(
            reason.to_string(),
            Style::default().fg(Color::Red),
        )),
        Line::from(""),
        Line::from("Press r to try again, or L to delete your data and start over."),
    ];
    let p = Paragraph::new(text)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(titled("Something went wrong"));
    f.render_widget(p, area);
}

fn render_onboarding(f: &mut Frame, app: &App, area: Rect) {
    let form = &app.onboarding;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(5)])
        .split(area);

    let gauge = Gauge::default()
        .block(titled("Welcome to NutriGuide"))
        .gauge_style(Style::default().fg(Color::Green))
        .percent(form.progress_percent())
        .label(format!("Step {} of {STEP_COUNT}", form.step()));
    f.render_widget(gauge, chunks[0]);

    let focused = app.focused_onboard_field();
    let mut lines = vec![Line::from("")];
    for field in app.onboard_fields() {
        let value = match field {
            OnboardField::Name => form.name.clone(),
            OnboardField::Age => form.age().to_string(),
            OnboardField::Gender => humanize(form.gender),
            OnboardField::Height => format_amount(form.height()),
            OnboardField::Weight => format_amount(form.weight()),
            OnboardField::Goal => humanize(form.goal),
            OnboardField::Activity => humanize(form.activity_level),
            OnboardField::Preferences => form.preferences.clone(),
            OnboardField::Allergies => form.allergies.clone(),
        };
        let is_focused = *field == focused;
        let shown = match (is_focused, field) {
            (true, OnboardField::Name | OnboardField::Preferences | OnboardField::Allergies) => {
                format!("{value}_")
            }
            (true, _) => format!("< {value} >"),
            (false, _) => value,
        };
        let style = if is_focused {
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        lines.push(Line::from(vec![
            Span::raw(if is_focused { " > " } else { "   " }),
            Span::styled(format!("{:<13}", field.label()), Style::default().fg(Color::Yellow)),
            Span::styled(shown, style),
        ]));
    }
    if form.step() == STEP_COUNT {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "   Allergies are comma-separated. Press Enter to create your plan.",
            Style::default().fg(Color::DarkGray),
        )));
    }

    let title = match form.step() {
        1 => "About you",
        2 => "Body",
        3 => "Goals",
        _ => "Diet",
    };
    f.render_widget(Paragraph::new(lines).block(titled(title)), chunks[1]);
}

// -- Tabs --

fn render_main(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(3)])
        .split(area);

    let titles: Vec<Line> = Tab::ALL.iter().map(|t| Line::from(t.title())).collect();
    let tabs = Tabs::new(titles)
        .select(app.tab.index())
        .block(titled("NutriGuide"))
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        );
    f.render_widget(tabs, chunks[0]);

    match app.tab {
        Tab::Dashboard => render_dashboard(f, app, chunks[1]),
        Tab::Meals => render_meals(f, app, chunks[1]),
        Tab::Progress => render_progress(f, app, chunks[1]),
        Tab::Tips => render_tips(f, app, chunks[1]),
        Tab::Profile => render_profile(f, app, chunks[1]),
    }
}

fn render_dashboard(f: &mut Frame, app: &App, area: Rect) {
    let (Some(profile), Some(guidelines)) = (app.controller.profile(), app.controller.guidelines())
    else {
        return;
    };
    let summary = DashboardSummary::new(profile, guidelines);

    let mut lines = vec![
        Line::from(Span::styled(
            format!("Hello, {}!", summary.first_name),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(format!("Goal: {}", summary.goal)),
        Line::from(""),
        Line::from(vec![
            Span::styled("Daily calories  ", Style::default().fg(Color::Yellow)),
            Span::raw(format!("{} kcal", format_amount(summary.daily_calories))),
        ]),
        Line::from(vec![
            Span::styled("Protein  ", Style::default().fg(Color::Yellow)),
            Span::raw(format!("{} g", format_amount(summary.protein))),
            Span::styled("   Carbs  ", Style::default().fg(Color::Yellow)),
            Span::raw(format!("{} g", format_amount(summary.carbs))),
            Span::styled("   Fat  ", Style::default().fg(Color::Yellow)),
            Span::raw(format!("{} g", format_amount(summary.fat))),
        ]),
    ];

    if !summary.key_tips.is_empty() {
        lines.push(Line::from(""));
        lines.push(heading("Key tips"));
        lines.extend(summary.key_tips.iter().map(|t| Line::from(format!("  - {t}"))));
    }
    if !summary.recommended_foods.is_empty() {
        lines.push(Line::from(""));
        lines.push(heading("Recommended foods"));
        lines.push(Line::from(format!("  {}", summary.recommended_foods.join(", "))));
    }
    if !summary.avoid_foods.is_empty() {
        lines.push(Line::from(""));
        lines.push(heading("Foods to limit"));
        lines.push(Line::from(format!("  {}", summary.avoid_foods.join(", "))));
    }

    let conflicts = app.controller.allergen_conflicts();
    if !conflicts.is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Allergy warnings",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )));
        lines.extend(
            conflicts
                .iter()
                .map(|c| Line::from(Span::styled(format!("  {c}"), Style::default().fg(Color::Red)))),
        );
    }

    let p = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(titled("Dashboard"));
    f.render_widget(p, area);
}

fn render_meals(f: &mut Frame, app: &App, area: Rect) {
    let Some(plan) = app.controller.meal_plan() else {
        return;
    };
    let Some(day) = app.days.current(plan) else {
        f.render_widget(Paragraph::new("No meals planned.").block(titled("Meals")), area);
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Ratio(1, 4),
            Constraint::Ratio(1, 4),
            Constraint::Ratio(1, 4),
            Constraint::Ratio(1, 4),
        ])
        .split(area);

    let header = Line::from(vec![
        Span::styled(
            format!("< {} >", day.day),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!(
            "  day {} of {}   {} kcal",
            app.days.selected() + 1,
            app.days.len(),
            format_amount(day.total_calories)
        )),
    ]);
    f.render_widget(Paragraph::new(header).block(titled("Meal plan")), chunks[0]);

    for (card, area) in meal_cards(day).iter().zip(chunks.iter().skip(1)) {
        render_meal_card(f, card, *area);
    }
}

fn render_meal_card(f: &mut Frame, card: &MealCard, area: Rect) {
    let mut ingredients = card.visible_ingredients.join(", ");
    if let Some(more) = card.more_label() {
        ingredients.push_str(&format!("  {more}"));
    }

    let macro_line = |label: &str, grams: f64, percent: u16, color: Color| {
        Line::from(vec![
            Span::raw(format!("{label:<8}")),
            Span::styled(text_bar(percent, 20), Style::default().fg(color)),
            Span::raw(format!(" {} g", format_amount(grams))),
        ])
    };

    let lines = vec![
        Line::from(vec![
            Span::styled(card.name.clone(), Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(format!("  {} kcal", format_amount(card.calories))),
        ]),
        Line::from(Span::styled(ingredients, Style::default().fg(Color::DarkGray))),
        macro_line("Protein", card.protein, card.protein_bar(), Color::Green),
        macro_line("Carbs", card.carbs, card.carbs_bar(), Color::Blue),
        macro_line("Fat", card.fat, card.fat_bar(), Color::Magenta),
        Line::from(card.instructions.trim().to_string()),
    ];

    let p = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(titled(&card.slot.to_string()));
    f.render_widget(p, area);
}

fn render_progress(f: &mut Frame, app: &App, area: Rect) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(area);
    let form_rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(0),
        ])
        .split(columns[0]);

    let logger = app.controller.progress();
    let form = logger.form();
    let field_block = |field: ProgressField, title: &'static str| {
        let block = titled(title);
        if app.progress_field == field {
            block.border_style(Style::default().fg(Color::Cyan))
        } else {
            block
        }
    };

    let weight = if app.progress_field == ProgressField::Weight {
        format!("{}_", form.weight_text())
    } else {
        form.weight_text().to_string()
    };
    f.render_widget(
        Paragraph::new(weight).block(field_block(ProgressField::Weight, "Weight (kg)")),
        form_rows[0],
    );
    f.render_widget(
        Paragraph::new(format!("< {} {} >", form.mood(), mood_label(form.mood())))
            .block(field_block(ProgressField::Mood, "Mood")),
        form_rows[1],
    );
    f.render_widget(
        Gauge::default()
            .block(field_block(ProgressField::Adherence, "Adherence"))
            .gauge_style(Style::default().fg(Color::Green))
            .percent(u16::from(form.adherence())),
        form_rows[2],
    );
    f.render_widget(
        Paragraph::new("Enter saves today's check-in.")
            .style(Style::default().fg(Color::DarkGray))
            .wrap(Wrap { trim: true }),
        form_rows[3],
    );

    let header = Row::new(
        ["Date", "Weight", "Mood", "Adherence"]
            .iter()
            .map(|h| Cell::from(*h).style(Style::default().fg(Color::Yellow))),
    )
    .height(1);
    let rows = logger.history().iter().map(|entry| {
        Row::new(vec![
            Cell::from(entry.date.clone()),
            Cell::from(format!("{} kg", format_amount(entry.weight))),
            Cell::from(format!("{} {}", entry.mood, mood_label(entry.mood))),
            Cell::from(format!("{}%", entry.adherence)),
        ])
    });
    let table = Table::new(
        rows,
        [
            Constraint::Length(12),
            Constraint::Length(10),
            Constraint::Length(9),
            Constraint::Length(10),
        ],
    )
    .header(header)
    .block(titled(&format!("History ({})", logger.history().len())));
    f.render_widget(table, columns[1]);
}

fn render_tips(f: &mut Frame, app: &App, area: Rect) {
    let dim = Style::default().fg(Color::DarkGray);
    let lines = match &app.tips {
        TipsFeed::Idle => vec![Line::from(Span::styled("Press r to load tips.", dim))],
        TipsFeed::Loading { .. } => vec![Line::from("Loading today's tips...")],
        TipsFeed::Failed(reason) => vec![
            Line::from(Span::styled(
                format!("Could not load tips: {reason}"),
                Style::default().fg(Color::Red),
            )),
            Line::from(Span::styled("Press r to try again.", dim)),
        ],
        TipsFeed::Loaded(tips) => tips
            .iter()
            .flat_map(|tip| {
                [
                    Line::from(vec![
                        Span::styled(
                            format!("[{}] ", tip_category_label(tip.category)),
                            Style::default().fg(Color::Cyan),
                        ),
                        Span::styled(tip.title.clone(), Style::default().add_modifier(Modifier::BOLD)),
                    ]),
                    Line::from(tip.content.clone()),
                    Line::from(""),
                ]
            })
            .collect(),
    };
    let p = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(titled("Daily tips"));
    f.render_widget(p, area);
}

fn render_profile(f: &mut Frame, app: &App, area: Rect) {
    let Some(profile) = app.controller.profile() else {
        return;
    };
    let label = |text: &str| Span::styled(format!("  {text:<11}"), Style::default().fg(Color::Yellow));

    let mut lines = vec![
        Line::from(vec![
            Span::styled(
                format!("[{}] ", views::initial(&profile.name)),
                Style::default().fg(Color::Black).bg(Color::Cyan),
            ),
            Span::styled(
                format!(" {}", profile.name),
                Style::default().add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(""),
    ];
    for (name, value) in views::profile_stats(profile) {
        lines.push(Line::from(vec![label(name), Span::raw(value)]));
    }
    lines.push(Line::from(vec![label("Gender"), Span::raw(humanize(profile.gender))]));
    if !profile.allergies.is_empty() {
        lines.push(Line::from(vec![label("Allergies"), Span::raw(profile.allergies.join(", "))]));
    }
    if !profile.preferences.is_empty() {
        lines.push(Line::from(vec![label("Prefers"), Span::raw(profile.preferences.clone())]));
    }

    if let Some(guidelines) = app.controller.guidelines() {
        lines.push(Line::from(""));
        lines.push(heading("Daily targets"));
        for (name, value) in views::daily_targets(guidelines) {
            lines.push(Line::from(vec![label(name), Span::raw(value)]));
        }
    }

    f.render_widget(Paragraph::new(lines).block(titled("Profile")), area);
}

fn render_status_bar(f: &mut Frame, app: &App, state: &AppState, hints: &str, area: Rect) {
    let screen = match state {
        AppState::Ready => app.tab.title().to_string(),
        other => humanize(other),
    };
    let status_msg = app.status_message.as_deref().unwrap_or("");

    let bar = Line::from(vec![
        Span::styled(
            format!(" {screen} "),
            Style::default().bg(Color::Blue).fg(Color::White),
        ),
        Span::raw("  "),
        Span::styled(status_msg.to_string(), Style::default().fg(Color::Green)),
        Span::raw("  "),
        Span::styled(hints.to_string(), Style::default().fg(Color::DarkGray)),
    ]);

    f.render_widget(Paragraph::new(bar), area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_bar_fills_proportionally() {
        assert_eq!(text_bar(0, 4), "░░░░");
        assert_eq!(text_bar(50, 4), "██░░");
        assert_eq!(text_bar(250, 4), "████");
    }
}
