//! `fm projects` — list, inspect, edit and advance projects.

use std::io::{self, Write};

use clap::{Args, Subcommand};
use foreman_core::Workspace;
use foreman_core::model::{Priority, Project, ProjectKind, ProjectStatus};
use foreman_core::validate::ProjectForm;
use foreman_core::view::{Locale, ProjectRow, format_date, format_relative_date};

use super::{flag, submit_failed};
use crate::output::{
    OutputMode, Renderable, fail, pretty_kv, pretty_rule, pretty_section, render_list,
    render_mode, render_toasts, write_json,
};

#[derive(Subcommand, Debug)]
pub enum ProjectsCommand {
    #[command(
        about = "List projects",
        long_about = "List projects. Filters combine; results keep creation order.",
        after_help = "EXAMPLES:\n    # Projects in progress\n    fm projects list --status active\n\n    # One client's planned projects\n    fm projects list --status planning --client \"ООО Стройка\"\n\n    # Free-text search over name, client, location and description\n    fm projects list --search бизнес --json"
    )]
    List(ProjectListArgs),

    #[command(
        about = "Show one project",
        after_help = "EXAMPLES:\n    fm projects show 1"
    )]
    Show(ProjectIdArgs),

    #[command(
        about = "Create a project",
        after_help = "EXAMPLES:\n    fm projects create --name Склад --client \"Acme LLC\" --location Riverside \\\n        --start 2024-05-01 --end 2025-05-01 --budget \"1 000 000\""
    )]
    Create(ProjectInput),

    #[command(
        about = "Edit a project",
        long_about = "Edit a project. Flags given replace those fields; the rest keep their current values. The status may be set to any value here; use `advance` for checked transitions.",
        after_help = "EXAMPLES:\n    fm projects update 2 --progress 15 --priority high"
    )]
    Update(ProjectUpdateArgs),

    #[command(
        about = "Move a project along its lifecycle",
        long_about = "Move a project to the next lifecycle status, or to --to when given. Transitions that skip steps or leave warranty/cancelled are refused.",
        after_help = "EXAMPLES:\n    # planning -> tender\n    fm projects advance 2\n\n    # Put a running project on hold\n    fm projects advance 1 --to on_hold"
    )]
    Advance(AdvanceArgs),

    #[command(
        about = "Delete a project",
        after_help = "EXAMPLES:\n    fm projects delete 2"
    )]
    Delete(ProjectIdArgs),
}

#[derive(Args, Debug, Default)]
pub struct ProjectListArgs {
    /// Status tag, `active` for in progress, or `all`.
    #[arg(short, long)]
    pub status: Option<String>,

    /// Exact client name.
    #[arg(short, long)]
    pub client: Option<String>,

    /// Case-insensitive text search.
    #[arg(long)]
    pub search: Option<String>,
}

#[derive(Args, Debug)]
pub struct ProjectIdArgs {
    /// Project id.
    pub id: String,
}

#[derive(Args, Debug)]
pub struct AdvanceArgs {
    /// Project id.
    pub id: String,

    /// Target status; defaults to the next step on the main path.
    #[arg(long)]
    pub to: Option<ProjectStatus>,
}

/// Project form fields as flags. Absent flags leave the form value alone.
#[derive(Args, Debug, Default)]
pub struct ProjectInput {
    #[arg(short, long)]
    pub name: Option<String>,
    #[arg(short, long)]
    pub description: Option<String>,
    /// Client name, copied onto the project.
    #[arg(short, long)]
    pub client: Option<String>,
    #[arg(long)]
    pub client_contact: Option<String>,
    #[arg(short, long)]
    pub location: Option<String>,
    /// residential, commercial, industrial, infrastructure, renovation, demolition.
    #[arg(short, long)]
    pub kind: Option<ProjectKind>,
    #[arg(short, long)]
    pub status: Option<ProjectStatus>,
    /// low, medium, high.
    #[arg(long)]
    pub priority: Option<Priority>,
    /// Start date, YYYY-MM-DD or dd.mm.yyyy.
    #[arg(long)]
    pub start: Option<String>,
    /// End date, YYYY-MM-DD or dd.mm.yyyy.
    #[arg(long)]
    pub end: Option<String>,
    /// Budget; spaces and a decimal comma are accepted.
    #[arg(short, long)]
    pub budget: Option<String>,
    /// Progress, 0 to 100.
    #[arg(long)]
    pub progress: Option<String>,
}

impl ProjectInput {
    pub fn apply(&self, form: &mut ProjectForm) {
        if let Some(kind) = self.kind {
            form.kind = kind;
        }
        if let Some(status) = self.status {
            form.status = status;
        }
        if let Some(priority) = self.priority {
            form.priority = priority;
        }
        let pairs = [
            (&self.name, &mut form.name),
            (&self.description, &mut form.description),
            (&self.client, &mut form.client_name),
            (&self.client_contact, &mut form.client_contact),
            (&self.location, &mut form.location),
            (&self.start, &mut form.start_date),
            (&self.end, &mut form.end_date),
            (&self.budget, &mut form.budget),
            (&self.progress, &mut form.progress),
        ];
        for (given, slot) in pairs {
            if let Some(value) = given {
                slot.clone_from(value);
            }
        }
    }
}

#[derive(Args, Debug)]
pub struct ProjectUpdateArgs {
    /// Project id.
    pub id: String,
    #[command(flatten)]
    pub input: ProjectInput,
}

impl Renderable for ProjectRow {
    fn render_human(&self, w: &mut dyn Write) -> io::Result<()> {
        writeln!(
            w,
            "{}  {} [{}] {}",
            self.id, self.name, self.status_label, self.progress_display
        )?;
        writeln!(
            w,
            "    {} · {} · {}",
            self.client_name, self.location, self.kind_label
        )?;
        let period = self
            .end_date
            .as_ref()
            .map_or_else(|| self.start_date.clone(), |end| format!("{} – {end}", self.start_date));
        writeln!(
            w,
            "    бюджет: {}  потрачено: {}  приоритет: {}  {period}",
            self.budget_display, self.spent_display, self.priority_label
        )
    }

    fn render_json(&self, w: &mut dyn Write) -> io::Result<()> {
        write_json(w, self)
    }

    fn render_table(&self, w: &mut dyn Write) -> io::Result<()> {
        writeln!(
            w,
            "{}\t{}\t{}\t{}\t{}\t{}",
            self.id, self.status, self.progress, self.budget, self.client_name, self.name
        )
    }

    fn table_headers() -> &'static [&'static str] {
        &["ID", "STATUS", "PROGRESS", "BUDGET", "CLIENT", "NAME"]
    }
}

pub fn run_projects(
    command: &ProjectsCommand,
    output: OutputMode,
    ws: &mut Workspace,
) -> anyhow::Result<()> {
    match command {
        ProjectsCommand::List(args) => run_list(args, output, ws),
        ProjectsCommand::Show(args) => run_show(&args.id, output, ws),
        ProjectsCommand::Create(input) => run_create(input, output, ws),
        ProjectsCommand::Update(args) => run_update(args, output, ws),
        ProjectsCommand::Advance(args) => run_advance(args, output, ws),
        ProjectsCommand::Delete(args) => run_delete(&args.id, output, ws),
    }
}

fn run_list(args: &ProjectListArgs, output: OutputMode, ws: &mut Workspace) -> anyhow::Result<()> {
    ws.projects
        .set_status_query(flag(args.status.as_ref()).unwrap_or_default())
        .map_err(|e| fail(output, e))?;
    ws.projects.filter.client = flag(args.client.as_ref()).map(str::to_string);
    ws.projects.filter.search = flag(args.search.as_ref()).unwrap_or_default().to_string();

    let rows = ws.projects.rows(&ws.locale);
    tracing::debug!(count = rows.len(), filtered = !ws.projects.filter.is_empty(), "projects listed");
    if rows.is_empty() && output.is_pretty() {
        writeln!(io::stdout(), "Проекты не найдены")?;
        return Ok(());
    }
    render_list(&rows, output)?;
    Ok(())
}

fn run_show(id: &str, output: OutputMode, ws: &mut Workspace) -> anyhow::Result<()> {
    let project = ws
        .projects
        .crud_mut()
        .open_view(id)
        .map_err(|e| fail(output, e))?;
    ws.projects.crud_mut().close();
    render_project(output, &project, &ws.locale)
}

fn run_create(input: &ProjectInput, output: OutputMode, ws: &mut Workspace) -> anyhow::Result<()> {
    let mut form = ProjectForm::default();
    input.apply(&mut form);

    ws.projects
        .crud_mut()
        .open_create()
        .map_err(|e| fail(output, e))?;
    let created = ws
        .projects
        .crud_mut()
        .submit(&form, &mut ws.toasts)
        .map_err(|e| submit_failed(output, e))?;
    render_toasts(output, &ws.toasts.drain())?;
    render_project(output, &created, &ws.locale)
}

fn run_update(args: &ProjectUpdateArgs, output: OutputMode, ws: &mut Workspace) -> anyhow::Result<()> {
    let current = ws
        .projects
        .crud_mut()
        .open_edit(&args.id)
        .map_err(|e| fail(output, e))?;
    let mut form = ProjectForm::from_fields(&current.fields());
    args.input.apply(&mut form);

    let updated = ws
        .projects
        .crud_mut()
        .submit(&form, &mut ws.toasts)
        .map_err(|e| submit_failed(output, e))?;
    render_toasts(output, &ws.toasts.drain())?;
    render_project(output, &updated, &ws.locale)
}

fn run_advance(args: &AdvanceArgs, output: OutputMode, ws: &mut Workspace) -> anyhow::Result<()> {
    let result = ws.projects.advance_status(&args.id, args.to, &mut ws.toasts);
    render_toasts(output, &ws.toasts.drain())?;
    let moved = result.map_err(|e| fail(output, e))?;
    render_project(output, &moved, &ws.locale)
}

fn run_delete(id: &str, output: OutputMode, ws: &mut Workspace) -> anyhow::Result<()> {
    ws.projects
        .crud_mut()
        .open_delete(id)
        .map_err(|e| fail(output, e))?;
    let removed = ws
        .projects
        .crud_mut()
        .confirm_delete(&mut ws.toasts)
        .map_err(|e| fail(output, e))?;
    render_toasts(output, &ws.toasts.drain())?;
    render_mode(
        output,
        &serde_json::json!({ "ok": true, "deleted": removed.id }),
        |_, w| writeln!(w, "deleted\t{}", removed.id),
        |_, w| writeln!(w, "Удален проект {} ({})", removed.name, removed.id),
    )
}

fn render_project(output: OutputMode, project: &Project, locale: &Locale) -> anyhow::Result<()> {
    let locale = locale.clone();
    render_mode(
        output,
        project,
        |p, w| ProjectRow::new(p, &locale).render_table(w),
        |p, w| render_project_human(p, &locale, w),
    )
}

fn render_project_human(project: &Project, locale: &Locale, w: &mut dyn Write) -> io::Result<()> {
    let today = chrono::Local::now().date_naive();

    pretty_section(w, &format!("Проект {}", project.id))?;
    writeln!(w, "{}", project.name)?;
    if let Some(description) = &project.description {
        writeln!(w, "{description}")?;
    }
    pretty_rule(w)?;
    pretty_kv(w, "статус", project.status.label())?;
    pretty_kv(w, "тип", project.kind.label())?;
    pretty_kv(w, "приоритет", project.priority.label())?;
    pretty_kv(w, "клиент", &project.client_name)?;
    if let Some(contact) = &project.client_contact {
        pretty_kv(w, "контакт", contact)?;
    }
    pretty_kv(w, "адрес", &project.location)?;
    pretty_kv(w, "начало", locale.date(project.start_date))?;
    if let Some(end) = project.end_date {
        let relative = format_relative_date(end, today);
        let shown = if relative == format_date(end) {
            locale.date(end)
        } else {
            format!("{} ({relative})", locale.date(end))
        };
        pretty_kv(w, "окончание", shown)?;
    }
    pretty_kv(w, "прогресс", format!("{}%", project.progress))?;
    pretty_kv(w, "бюджет", locale.currency(project.budget))?;
    pretty_kv(w, "потрачено", locale.currency(project.spent_amount))?;
    pretty_kv(w, "остаток", locale.currency(project.remaining_budget()))?;
    if let Some(next) = project.status.next() {
        pretty_kv(w, "далее", next.label())?;
    }
    if !project.attachments.is_empty() {
        let a = &project.attachments;
        pretty_kv(
            w,
            "вложения",
            format!(
                "задач {}, документов {}, расходов {}, команда {}",
                a.tasks.len(),
                a.documents.len(),
                a.expenses.len(),
                a.team.len()
            ),
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct Wrapper {
        #[command(subcommand)]
        command: ProjectsCommand,
    }

    #[test]
    fn create_flags_fill_a_valid_form() {
        let w = Wrapper::parse_from([
            "test", "create", "--name", "Склад", "--client", "Acme LLC", "--location",
            "Riverside", "--kind", "industrial", "--start", "2024-05-01", "--end", "01.05.2025",
            "--budget", "1 000 000,50",
        ]);
        let ProjectsCommand::Create(input) = w.command else {
            panic!("expected create");
        };
        let mut form = ProjectForm::default();
        input.apply(&mut form);
        let fields = form.validate().unwrap();
        assert_eq!(fields.kind, ProjectKind::Industrial);
        assert!((fields.budget - 1_000_000.5).abs() < f64::EPSILON);
        assert_eq!(fields.progress, 0);
    }

    #[test]
    fn advance_target_parses_status_tags() {
        let w = Wrapper::parse_from(["test", "advance", "1", "--to", "on_hold"]);
        let ProjectsCommand::Advance(args) = w.command else {
            panic!("expected advance");
        };
        assert_eq!(args.to, Some(ProjectStatus::OnHold));
        assert!(Wrapper::try_parse_from(["test", "advance", "1", "--to", "frozen"]).is_err());
    }

    #[test]
    fn list_status_is_free_text_for_active() {
        let w = Wrapper::parse_from(["test", "list", "--status", "active"]);
        let ProjectsCommand::List(args) = w.command else {
            panic!("expected list");
        };
        assert_eq!(args.status.as_deref(), Some("active"));
    }

    #[test]
    fn project_row_text_matches_headers() {
        let ws = Workspace::new(
            &foreman_core::seed::DemoSeed,
            std::sync::Arc::new(foreman_core::clock::SystemClock),
            &foreman_core::config::ProjectConfig::default(),
        );
        let rows = ws.projects.rows(&ws.locale);
        let mut buf = Vec::new();
        rows[0].render_table(&mut buf).unwrap();
        let line = String::from_utf8(buf).unwrap();
        assert_eq!(
            line.trim_end().split('\t').count(),
            ProjectRow::table_headers().len()
        );
        assert!(line.starts_with("1\tin_progress\t"));
    }
}
