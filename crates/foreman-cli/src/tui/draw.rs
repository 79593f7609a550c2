use foreman_core::notify::ToastLevel;
use foreman_core::view::format_number;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols::border,
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState, Tabs, Wrap},
};

use super::app::{App, Overlay, Tab};
use super::form::FormState;

const HELP: &[(&str, &str)] = &[
    ("Tab / 1-4", "переключить раздел"),
    ("j / k", "выбор строки"),
    ("Enter / v", "просмотр"),
    ("n", "создать"),
    ("e", "редактировать"),
    ("d", "удалить"),
    ("/", "поиск"),
    ("f", "фильтр по статусу (проекты)"),
    ("a", "следующий статус (проекты)"),
    ("p / L", "пароль / выход (профиль)"),
    ("q", "выход"),
];

fn panel(title: impl Into<String>, focused: bool) -> Block<'static> {
    let color = if focused { Color::Green } else { Color::DarkGray };
    Block::default()
        .borders(Borders::ALL)
        .border_set(border::ROUNDED)
        .border_style(Style::default().fg(color))
        .title(format!(" {} ", title.into()))
        .title_style(
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )
}

fn dim(text: impl Into<String>) -> Span<'static> {
    Span::styled(text.into(), Style::default().fg(Color::DarkGray))
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = area.width.saturating_sub(4).min(width);
    let height = area.height.saturating_sub(2).min(height);
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect::new(x, y, width, height)
}

pub fn render(frame: &mut ratatui::Frame<'_>, app: &App) {
    let area = frame.area();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(area);

    if app.signed_in() {
        render_tabs(frame, app, chunks[0]);
        match app.tab {
            Tab::Dashboard => render_dashboard(frame, app, chunks[1]),
            Tab::Clients => render_clients(frame, app, chunks[1]),
            Tab::Projects => render_projects(frame, app, chunks[1]),
            Tab::Profile => render_profile(frame, app, chunks[1]),
        }
    } else {
        frame.render_widget(
            Paragraph::new(Line::from(vec![
                Span::styled(
                    "Строительная CRM",
                    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                ),
                dim("  admin@construction-crm.ru / admin123"),
            ]))
            .block(panel("foreman", false)),
            chunks[0],
        );
    }
    render_status(frame, app, chunks[2]);

    match &app.overlay {
        Overlay::None => {}
        Overlay::Form(form, _) => render_form(frame, form, area),
        Overlay::ConfirmDelete { name } => render_confirm(frame, name, area),
        Overlay::View { title, lines } => render_card(frame, title, lines, area),
        Overlay::Help => render_help(frame, area),
        Overlay::Search { .. } => {}
    }
}

fn render_tabs(frame: &mut ratatui::Frame<'_>, app: &App, area: Rect) {
    let tabs = app.tabs();
    let titles: Vec<Line<'_>> = tabs
        .iter()
        .enumerate()
        .map(|(i, t)| Line::from(format!("{} {}", i + 1, t.title())))
        .collect();
    let selected = tabs.iter().position(|t| *t == app.tab);
    let user = app
        .ws
        .auth
        .current_user()
        .map(|u| format!("{} · {}", u.name, u.role.label()))
        .unwrap_or_default();
    let widget = Tabs::new(titles)
        .select(selected)
        .block(panel(user, false))
        .highlight_style(
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        );
    frame.render_widget(widget, area);
}

fn render_dashboard(frame: &mut ratatui::Frame<'_>, app: &App, area: Rect) {
    let stats = app.ws.dashboard();
    let locale = &app.ws.locale;
    let kv = |label: &str, value: String| {
        Line::from(vec![dim(format!("{label:<22}")), Span::raw(value)])
    };

    let mut lines = vec![
        kv("Всего проектов", stats.total_projects.to_string()),
        kv("Активные", stats.active_projects.to_string()),
        kv(
            "Завершено",
            format!("{} ({}%)", stats.completed_projects, stats.completion_rate),
        ),
        kv("Общий бюджет", locale.currency(stats.total_budget)),
        kv("Потрачено", locale.currency(stats.total_spent)),
        kv(
            "Средний прогресс",
            format!("{}%", format_number(stats.average_progress, 1)),
        ),
        kv(
            "Клиенты",
            format!("{} (компаний: {})", stats.total_clients, stats.company_clients),
        ),
        Line::default(),
    ];
    for entry in stats.by_status.iter().filter(|s| s.count > 0) {
        lines.push(kv(entry.label, entry.count.to_string()));
    }
    lines.push(Line::default());
    for row in &stats.recent_projects {
        lines.push(Line::from(vec![
            Span::styled(format!("{:>4} ", row.progress_display), Style::default().fg(Color::Cyan)),
            Span::raw(row.name.clone()),
            dim(format!("  {}", row.status_label)),
        ]));
    }

    frame.render_widget(
        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .block(panel("Панель управления", true)),
        area,
    );
}

fn table_title(base: &str, shown: usize, search: &str) -> String {
    if search.is_empty() {
        format!("{base}: {shown}")
    } else {
        format!("{base}: {shown}  [поиск: {search}]")
    }
}

fn render_clients(frame: &mut ratatui::Frame<'_>, app: &App, area: Rect) {
    let rows: Vec<Row<'static>> = app
        .ws
        .clients
        .rows(&app.ws.locale)
        .into_iter()
        .map(|c| {
            Row::new(vec![
                Cell::from(dim(c.kind_label)),
                Cell::from(c.name),
                Cell::from(c.email),
                Cell::from(c.phone),
                Cell::from(c.projects_count.to_string()),
                Cell::from(c.total_budget_display),
            ])
        })
        .collect();
    let shown = rows.len();
    let widths = [
        Constraint::Length(10),
        Constraint::Min(20),
        Constraint::Length(26),
        Constraint::Length(18),
        Constraint::Length(8),
        Constraint::Length(16),
    ];
    let header = Row::new(["Тип", "Название", "Email", "Телефон", "Проекты", "Бюджет"])
        .style(Style::default().fg(Color::Yellow));
    let title = table_title("Клиенты", shown, &app.ws.clients.filter.search);
    render_table(frame, area, rows, &widths, header, title, app.client_sel);
}

fn render_projects(frame: &mut ratatui::Frame<'_>, app: &App, area: Rect) {
    let rows: Vec<Row<'static>> = app
        .ws
        .projects
        .rows(&app.ws.locale)
        .into_iter()
        .map(|p| {
            Row::new(vec![
                Cell::from(Span::styled(p.status_label, Style::default().fg(Color::Cyan))),
                Cell::from(p.progress_display),
                Cell::from(p.name),
                Cell::from(p.client_name),
                Cell::from(p.budget_display),
                Cell::from(p.end_date.unwrap_or_default()),
            ])
        })
        .collect();
    let shown = rows.len();
    let widths = [
        Constraint::Length(14),
        Constraint::Length(6),
        Constraint::Min(20),
        Constraint::Length(22),
        Constraint::Length(16),
        Constraint::Length(12),
    ];
    let header = Row::new(["Статус", "%", "Название", "Клиент", "Бюджет", "Окончание"])
        .style(Style::default().fg(Color::Yellow));
    let mut title = table_title("Проекты", shown, &app.ws.projects.filter.search);
    if let Some(status) = app.ws.projects.filter.status {
        title.push_str(&format!("  [статус: {}]", status.label()));
    }
    render_table(frame, area, rows, &widths, header, title, app.project_sel);
}

fn render_table(
    frame: &mut ratatui::Frame<'_>,
    area: Rect,
    rows: Vec<Row<'static>>,
    widths: &[Constraint],
    header: Row<'static>,
    title: String,
    selected: usize,
) {
    let empty = rows.is_empty();
    let table = Table::new(rows, widths.to_vec())
        .header(header)
        .block(panel(title, true))
        .row_highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol(" ");
    let mut state = TableState::default();
    if !empty {
        state.select(Some(selected));
    }
    frame.render_stateful_widget(table, area, &mut state);
}

fn render_profile(frame: &mut ratatui::Frame<'_>, app: &App, area: Rect) {
    let Some(user) = app.ws.auth.current_user() else {
        return;
    };
    let view = foreman_core::page::ProfileView::new(user, &app.ws.locale);
    let kv = |label: &str, value: String| {
        Line::from(vec![dim(format!("{label:<12}")), Span::raw(value)])
    };

    let mut lines = vec![
        Line::from(Span::styled(
            format!("{}  ({})", view.name, view.initials),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        )),
        kv("Роль", view.role_label.to_string()),
        kv("Email", view.email.clone()),
    ];
    for (label, value) in [
        ("Телефон", &view.phone),
        ("Отдел", &view.department),
        ("Зарплата", &view.salary),
        ("Принят", &view.hire_date),
    ] {
        if let Some(value) = value {
            lines.push(kv(label, value.clone()));
        }
    }
    if !view.skills.is_empty() {
        lines.push(kv("Навыки", view.skills.join(", ")));
    }
    let modules: Vec<&str> = view.modules.iter().map(|m| m.label()).collect();
    lines.push(kv("Доступ", modules.join(", ")));
    lines.push(Line::default());
    lines.push(Line::from(dim("e редактировать · p сменить пароль · L выйти")));

    frame.render_widget(
        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .block(panel("Профиль", true)),
        area,
    );
}

fn render_status(frame: &mut ratatui::Frame<'_>, app: &App, area: Rect) {
    let line = match (&app.overlay, &app.toast) {
        (Overlay::Search { .. }, _) => Line::from(vec![
            Span::styled("/", Style::default().fg(Color::Yellow)),
            Span::raw(match app.tab {
                Tab::Clients => app.ws.clients.filter.search.clone(),
                Tab::Projects => app.ws.projects.filter.search.clone(),
                Tab::Dashboard | Tab::Profile => String::new(),
            }),
            Span::raw("█"),
        ]),
        (_, Some(toast)) => {
            let (mark, color) = match toast.level {
                ToastLevel::Success => ("✓", Color::Green),
                ToastLevel::Error => ("✗", Color::Red),
                ToastLevel::Info => ("·", Color::Cyan),
            };
            Line::from(vec![
                Span::styled(format!("{mark} "), Style::default().fg(color)),
                Span::styled(toast.message.clone(), Style::default().fg(color)),
            ])
        }
        (_, None) => Line::from(dim("? помощь · q выход")),
    };
    frame.render_widget(Paragraph::new(line), area);
}

fn render_form(frame: &mut ratatui::Frame<'_>, form: &FormState, area: Rect) {
    let mut lines = Vec::with_capacity(form.fields.len() * 2 + 2);
    for (idx, field) in form.fields.iter().enumerate() {
        let focused = idx == form.focus;
        let label_style = if focused {
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        lines.push(Line::from(vec![
            Span::styled(format!("{:<18}", field.label), label_style),
            Span::raw(field.display(focused)),
        ]));
        if let Some(message) = form.errors.get(field.key) {
            lines.push(Line::from(Span::styled(
                format!("{:<18}{message}", ""),
                Style::default().fg(Color::Red),
            )));
        }
    }
    lines.push(Line::default());
    lines.push(Line::from(dim("Enter сохранить · Esc отмена · Tab следующее поле")));

    let height = u16::try_from(lines.len()).unwrap_or(u16::MAX).saturating_add(2);
    let modal = centered(area, 80, height);
    frame.render_widget(Clear, modal);
    frame.render_widget(Paragraph::new(lines).block(panel(form.title.clone(), true)), modal);
}

fn render_confirm(frame: &mut ratatui::Frame<'_>, name: &str, area: Rect) {
    let modal = centered(area, 60, 6);
    frame.render_widget(Clear, modal);
    let lines = vec![
        Line::from(format!("Удалить «{name}»?")),
        Line::default(),
        Line::from(vec![
            Span::styled("y", Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)),
            Span::raw(" удалить   "),
            Span::styled("n", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
            Span::raw(" отмена"),
        ]),
    ];
    let block = Block::default()
        .borders(Borders::ALL)
        .border_set(border::ROUNDED)
        .border_style(Style::default().fg(Color::Red))
        .title(" Подтверждение ");
    frame.render_widget(Paragraph::new(lines).block(block), modal);
}

fn render_card(frame: &mut ratatui::Frame<'_>, title: &str, lines: &[String], area: Rect) {
    let height = u16::try_from(lines.len()).unwrap_or(u16::MAX).saturating_add(2);
    let modal = centered(area, 80, height);
    frame.render_widget(Clear, modal);
    let body: Vec<Line<'_>> = lines.iter().map(|l| Line::from(l.as_str())).collect();
    frame.render_widget(
        Paragraph::new(body)
            .wrap(Wrap { trim: false })
            .block(panel(title, true)),
        modal,
    );
}

fn render_help(frame: &mut ratatui::Frame<'_>, area: Rect) {
    let height = u16::try_from(HELP.len()).unwrap_or(u16::MAX).saturating_add(2);
    let modal = centered(area, 56, height);
    frame.render_widget(Clear, modal);
    let lines: Vec<Line<'_>> = HELP
        .iter()
        .map(|(keys, what)| {
            Line::from(vec![
                Span::styled(format!("{keys:<12}"), Style::default().fg(Color::Yellow)),
                Span::raw(*what),
            ])
        })
        .collect();
    frame.render_widget(Paragraph::new(lines).block(panel("Клавиши", true)), modal);
}

#[cfg(test)]
mod tests {
    use super::*;
    use foreman_core::Workspace;
    use foreman_core::config::ProjectConfig;
    use ratatui::{Terminal, backend::TestBackend};

    fn screen(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(120, 30)).unwrap();
        terminal.draw(|frame| render(frame, app)).unwrap();
        let buffer = terminal.backend().buffer().clone();
        buffer
            .content()
            .iter()
            .map(|cell| cell.symbol().to_string())
            .collect()
    }

    #[test]
    fn login_screen_shows_form() {
        let app = App::new(Workspace::from_config(&ProjectConfig::default()));
        let text = screen(&app);
        assert!(text.contains("Вход"));
        assert!(text.contains("Пароль"));
    }

    #[test]
    fn centered_rect_stays_inside() {
        let area = Rect::new(0, 0, 40, 10);
        let modal = centered(area, 80, 30);
        assert!(modal.width <= 36);
        assert!(modal.height <= 8);
        assert!(modal.x + modal.width <= area.width);
    }
}
