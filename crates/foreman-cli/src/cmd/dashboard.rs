//! `fm dashboard` — headline figures across projects and clients.

use std::io::{self, Write};

use foreman_core::Workspace;
use foreman_core::page::DashboardStats;
use foreman_core::view::{Locale, format_number};

use crate::output::{OutputMode, Renderable, pretty_kv, pretty_section, render_mode};

pub fn run_dashboard(output: OutputMode, ws: &Workspace) -> anyhow::Result<()> {
    let stats = ws.dashboard();
    tracing::debug!(
        projects = stats.total_projects,
        clients = stats.total_clients,
        "dashboard computed"
    );
    let locale = ws.locale.clone();
    render_mode(
        output,
        &stats,
        |s, w| render_dashboard_text(s, w),
        |s, w| render_dashboard_human(s, &locale, w),
    )
}

fn render_dashboard_human(
    stats: &DashboardStats,
    locale: &Locale,
    w: &mut dyn Write,
) -> io::Result<()> {
    pretty_section(w, "Панель управления")?;
    pretty_kv(w, "проектов", stats.total_projects.to_string())?;
    pretty_kv(w, "в работе", stats.active_projects.to_string())?;
    pretty_kv(
        w,
        "завершено",
        format!("{} ({}%)", stats.completed_projects, stats.completion_rate),
    )?;
    pretty_kv(w, "бюджет", locale.currency(stats.total_budget))?;
    pretty_kv(w, "потрачено", locale.currency(stats.total_spent))?;
    pretty_kv(
        w,
        "ср. прогресс",
        format!("{}%", format_number(stats.average_progress, 1)),
    )?;
    pretty_kv(
        w,
        "клиентов",
        format!("{} (компаний: {})", stats.total_clients, stats.company_clients),
    )?;

    if !stats.by_status.is_empty() {
        writeln!(w)?;
        pretty_section(w, "По статусам")?;
        for entry in &stats.by_status {
            pretty_kv(w, entry.label, entry.count.to_string())?;
        }
    }

    writeln!(w)?;
    pretty_section(w, "Последние проекты")?;
    if stats.recent_projects.is_empty() {
        writeln!(w, "Проектов пока нет")?;
    }
    for row in &stats.recent_projects {
        row.render_human(w)?;
    }
    Ok(())
}

fn render_dashboard_text(stats: &DashboardStats, w: &mut dyn Write) -> io::Result<()> {
    writeln!(w, "total_projects\t{}", stats.total_projects)?;
    writeln!(w, "active_projects\t{}", stats.active_projects)?;
    writeln!(w, "completed_projects\t{}", stats.completed_projects)?;
    writeln!(w, "completion_rate\t{}", stats.completion_rate)?;
    writeln!(w, "total_budget\t{}", stats.total_budget)?;
    writeln!(w, "total_spent\t{}", stats.total_spent)?;
    writeln!(w, "average_progress\t{:.1}", stats.average_progress)?;
    writeln!(w, "total_clients\t{}", stats.total_clients)?;
    writeln!(w, "company_clients\t{}", stats.company_clients)?;
    for entry in &stats.by_status {
        writeln!(w, "status.{}\t{}", entry.status, entry.count)?;
    }
    for row in &stats.recent_projects {
        writeln!(w, "recent\t{}\t{}", row.id, row.name)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use foreman_core::clock::SystemClock;
    use foreman_core::config::ProjectConfig;
    use foreman_core::seed::DemoSeed;
    use std::sync::Arc;

    #[test]
    fn text_dashboard_is_key_value_lines() {
        let ws = Workspace::new(&DemoSeed, Arc::new(SystemClock), &ProjectConfig::default());
        let mut buf = Vec::new();
        render_dashboard_text(&ws.dashboard(), &mut buf).unwrap();
        let s = String::from_utf8(buf).unwrap();
        assert!(s.contains("total_projects\t2\n"));
        assert!(s.contains("status.in_progress\t1\n"));
        assert!(s.contains("status.planning\t1\n"));
        assert!(!s.contains("status.warranty"));
        assert!(s.lines().all(|l| l.contains('\t')));
    }

    #[test]
    fn human_dashboard_uses_labels() {
        let ws = Workspace::new(&DemoSeed, Arc::new(SystemClock), &ProjectConfig::default());
        let mut buf = Vec::new();
        render_dashboard_human(&ws.dashboard(), &ws.locale, &mut buf).unwrap();
        let s = String::from_utf8(buf).unwrap();
        assert!(s.contains("В работе"));
        assert!(s.contains("Последние проекты"));
    }
}
