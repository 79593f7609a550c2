//! `fm clients` — list, inspect and edit clients.

use std::io::{self, Write};

use clap::{Args, Subcommand};
use foreman_core::model::{Client, ClientKind};
use foreman_core::page::ClientStats;
use foreman_core::validate::ClientForm;
use foreman_core::view::{ClientRow, Locale, ProjectRow, project_rows};
use foreman_core::Workspace;
use serde::Serialize;

use super::{flag, submit_failed};
use crate::output::{
    OutputMode, Renderable, fail, pretty_kv, pretty_rule, pretty_section, render_list,
    render_mode, render_toasts, write_json,
};

#[derive(Subcommand, Debug)]
pub enum ClientsCommand {
    #[command(
        about = "List clients",
        after_help = "EXAMPLES:\n    # All clients\n    fm clients list\n\n    # Companies whose name, email or phone mentions \"строй\"\n    fm clients list --kind company --search строй"
    )]
    List(ClientListArgs),

    #[command(
        about = "Show one client with its projects",
        after_help = "EXAMPLES:\n    fm clients show 1\n    fm clients show 1 --json"
    )]
    Show(ClientIdArgs),

    #[command(
        about = "Add a client",
        after_help = "EXAMPLES:\n    fm clients create --kind company --name \"Acme LLC\" \\\n        --email a@acme.com --phone +1-000 --address \"1 Main St\""
    )]
    Create(ClientInput),

    #[command(
        about = "Edit a client",
        long_about = "Edit a client. Flags given replace those fields; the rest keep their current values.",
        after_help = "EXAMPLES:\n    fm clients update 2 --phone \"+7 (999) 000-00-00\""
    )]
    Update(ClientUpdateArgs),

    #[command(
        about = "Delete a client",
        after_help = "EXAMPLES:\n    fm clients delete 2"
    )]
    Delete(ClientIdArgs),

    #[command(
        about = "Client totals",
        after_help = "EXAMPLES:\n    fm clients stats --json"
    )]
    Stats,
}

#[derive(Args, Debug, Default)]
pub struct ClientListArgs {
    /// Only clients of this type: individual, company.
    #[arg(short, long)]
    pub kind: Option<ClientKind>,

    /// Case-insensitive match on name, email or phone.
    #[arg(short, long)]
    pub search: Option<String>,

    /// Only clients linked to this project id.
    #[arg(long)]
    pub project: Option<String>,
}

#[derive(Args, Debug)]
pub struct ClientIdArgs {
    /// Client id.
    pub id: String,
}

/// Client form fields as flags. Absent flags leave the form value alone.
#[derive(Args, Debug, Default)]
pub struct ClientInput {
    /// individual or company.
    #[arg(short, long)]
    pub kind: Option<ClientKind>,
    #[arg(short, long)]
    pub name: Option<String>,
    /// Contact person (companies only).
    #[arg(long)]
    pub contact_person: Option<String>,
    #[arg(short, long)]
    pub email: Option<String>,
    #[arg(short, long)]
    pub phone: Option<String>,
    #[arg(short, long)]
    pub address: Option<String>,
    /// Taxpayer number (companies only).
    #[arg(long)]
    pub inn: Option<String>,
    #[arg(long)]
    pub kpp: Option<String>,
    #[arg(long)]
    pub website: Option<String>,
    #[arg(long)]
    pub notes: Option<String>,
}

impl ClientInput {
    pub fn apply(&self, form: &mut ClientForm) {
        if let Some(kind) = self.kind {
            form.kind = kind;
        }
        let pairs = [
            (&self.name, &mut form.name),
            (&self.contact_person, &mut form.contact_person),
            (&self.email, &mut form.email),
            (&self.phone, &mut form.phone),
            (&self.address, &mut form.address),
            (&self.inn, &mut form.inn),
            (&self.kpp, &mut form.kpp),
            (&self.website, &mut form.website),
            (&self.notes, &mut form.notes),
        ];
        for (given, slot) in pairs {
            if let Some(value) = given {
                slot.clone_from(value);
            }
        }
    }
}

#[derive(Args, Debug)]
pub struct ClientUpdateArgs {
    /// Client id.
    pub id: String,
    #[command(flatten)]
    pub input: ClientInput,
}

impl Renderable for ClientRow {
    fn render_human(&self, w: &mut dyn Write) -> io::Result<()> {
        writeln!(w, "{}  {} [{}]", self.id, self.name, self.kind_label)?;
        if let Some(contact) = &self.contact_person {
            writeln!(w, "    контакт: {contact}")?;
        }
        writeln!(w, "    {}  {}", self.email, self.phone)?;
        writeln!(
            w,
            "    проектов: {}  завершено: {}  бюджет: {}  {}",
            self.projects_count,
            self.completed_projects,
            self.total_budget_display,
            self.activity_label
        )
    }

    fn render_json(&self, w: &mut dyn Write) -> io::Result<()> {
        write_json(w, self)
    }

    fn render_table(&self, w: &mut dyn Write) -> io::Result<()> {
        writeln!(
            w,
            "{}\t{}\t{}\t{}\t{}\t{}\t{}",
            self.id,
            self.kind,
            self.name,
            self.email,
            self.phone,
            self.projects_count,
            self.total_budget
        )
    }

    fn table_headers() -> &'static [&'static str] {
        &["ID", "KIND", "NAME", "EMAIL", "PHONE", "PROJECTS", "BUDGET"]
    }
}

/// A client with its matched projects, as printed by `show`.
#[derive(Debug, Serialize)]
pub struct ClientDetail {
    #[serde(flatten)]
    pub client: Client,
    pub project_rows: Vec<ProjectRow>,
}

pub fn run_clients(
    command: &ClientsCommand,
    output: OutputMode,
    ws: &mut Workspace,
) -> anyhow::Result<()> {
    match command {
        ClientsCommand::List(args) => run_list(args, output, ws),
        ClientsCommand::Show(args) => run_show(&args.id, output, ws),
        ClientsCommand::Create(input) => run_create(input, output, ws),
        ClientsCommand::Update(args) => run_update(args, output, ws),
        ClientsCommand::Delete(args) => run_delete(&args.id, output, ws),
        ClientsCommand::Stats => run_stats(output, ws),
    }
}

fn run_list(args: &ClientListArgs, output: OutputMode, ws: &mut Workspace) -> anyhow::Result<()> {
    ws.clients.filter.kind = args.kind;
    ws.clients.filter.search = flag(args.search.as_ref()).unwrap_or_default().to_string();
    ws.clients.filter.project_scope = flag(args.project.as_ref()).map(str::to_string);

    let rows = ws.clients.rows(&ws.locale);
    tracing::debug!(count = rows.len(), "clients listed");
    if rows.is_empty() && output.is_pretty() {
        writeln!(io::stdout(), "Клиенты не найдены")?;
        return Ok(());
    }
    render_list(&rows, output)?;
    Ok(())
}

fn run_show(id: &str, output: OutputMode, ws: &mut Workspace) -> anyhow::Result<()> {
    let client = ws
        .clients
        .crud_mut()
        .open_view(id)
        .map_err(|e| fail(output, e))?;
    let projects = ws.client_projects(id).map_err(|e| fail(output, e))?;
    ws.clients.crud_mut().close();

    let detail = ClientDetail {
        client,
        project_rows: project_rows(&projects, &ws.locale),
    };
    let locale = ws.locale.clone();
    render_mode(
        output,
        &detail,
        |d, w| render_detail_text(d, w),
        |d, w| render_detail_human(d, &locale, w),
    )
}

fn run_create(input: &ClientInput, output: OutputMode, ws: &mut Workspace) -> anyhow::Result<()> {
    let mut form = ClientForm::default();
    input.apply(&mut form);

    ws.clients
        .crud_mut()
        .open_create()
        .map_err(|e| fail(output, e))?;
    let created = ws
        .clients
        .crud_mut()
        .submit(&form, &mut ws.toasts)
        .map_err(|e| submit_failed(output, e))?;
    render_toasts(output, &ws.toasts.drain())?;
    render_client(output, &created, &ws.locale)
}

fn run_update(args: &ClientUpdateArgs, output: OutputMode, ws: &mut Workspace) -> anyhow::Result<()> {
    let current = ws
        .clients
        .crud_mut()
        .open_edit(&args.id)
        .map_err(|e| fail(output, e))?;
    let mut form = ClientForm::from_fields(&current.fields());
    args.input.apply(&mut form);

    let updated = ws
        .clients
        .crud_mut()
        .submit(&form, &mut ws.toasts)
        .map_err(|e| submit_failed(output, e))?;
    render_toasts(output, &ws.toasts.drain())?;
    render_client(output, &updated, &ws.locale)
}

fn run_delete(id: &str, output: OutputMode, ws: &mut Workspace) -> anyhow::Result<()> {
    ws.clients
        .crud_mut()
        .open_delete(id)
        .map_err(|e| fail(output, e))?;
    let removed = ws
        .clients
        .crud_mut()
        .confirm_delete(&mut ws.toasts)
        .map_err(|e| fail(output, e))?;
    render_toasts(output, &ws.toasts.drain())?;
    render_mode(
        output,
        &serde_json::json!({ "ok": true, "deleted": removed.id }),
        |_, w| writeln!(w, "deleted\t{}", removed.id),
        |_, w| writeln!(w, "Удален клиент {} ({})", removed.name, removed.id),
    )
}

fn run_stats(output: OutputMode, ws: &Workspace) -> anyhow::Result<()> {
    let stats = ws.clients.stats();
    let locale = ws.locale.clone();
    render_mode(
        output,
        &stats,
        |s, w| {
            writeln!(
                w,
                "total\t{}\ncompanies\t{}\nindividuals\t{}\ncompleted_projects\t{}\ntotal_budget\t{}",
                s.total, s.companies, s.individuals, s.completed_projects, s.total_budget
            )
        },
        |s, w| render_stats_human(s, &locale, w),
    )
}

fn render_client(output: OutputMode, client: &Client, locale: &Locale) -> anyhow::Result<()> {
    let locale = locale.clone();
    render_mode(
        output,
        client,
        |c, w| ClientRow::new(c, &locale).render_table(w),
        |c, w| render_client_human(c, &locale, w),
    )
}

fn render_client_human(client: &Client, locale: &Locale, w: &mut dyn Write) -> io::Result<()> {
    pretty_section(w, &format!("Клиент {}", client.id))?;
    writeln!(w, "{}", client.name)?;
    pretty_rule(w)?;
    pretty_kv(w, "тип", client.kind.label())?;
    if let Some(contact) = &client.contact_person {
        pretty_kv(w, "контакт", contact)?;
    }
    pretty_kv(w, "email", &client.email)?;
    pretty_kv(w, "телефон", &client.phone)?;
    pretty_kv(w, "адрес", &client.address)?;
    for (key, value) in [
        ("ИНН", &client.inn),
        ("КПП", &client.kpp),
        ("сайт", &client.website),
        ("заметки", &client.notes),
    ] {
        if let Some(value) = value {
            pretty_kv(w, key, value)?;
        }
    }
    pretty_kv(w, "статус", client.activity_label())?;
    pretty_kv(w, "бюджет", locale.currency(client.total_budget))?;
    pretty_kv(w, "завершено", client.completed_projects.to_string())?;
    pretty_kv(w, "создан", locale.date(client.created_at.date_naive()))
}

fn render_detail_human(detail: &ClientDetail, locale: &Locale, w: &mut dyn Write) -> io::Result<()> {
    render_client_human(&detail.client, locale, w)?;
    writeln!(w)?;
    pretty_section(w, &format!("Проекты ({})", detail.project_rows.len()))?;
    if detail.project_rows.is_empty() {
        writeln!(w, "У клиента пока нет проектов")?;
    }
    for row in &detail.project_rows {
        writeln!(
            w,
            "{}  {}  {}  {}",
            row.id, row.name, row.status_label, row.progress_display
        )?;
    }
    Ok(())
}

fn render_detail_text(detail: &ClientDetail, w: &mut dyn Write) -> io::Result<()> {
    let client = &detail.client;
    writeln!(
        w,
        "{}\t{}\t{}\t{}\t{}",
        client.id, client.kind, client.name, client.email, client.phone
    )?;
    for row in &detail.project_rows {
        writeln!(w, "project\t{}\t{}\t{}", row.id, row.status, row.name)?;
    }
    Ok(())
}

fn render_stats_human(stats: &ClientStats, locale: &Locale, w: &mut dyn Write) -> io::Result<()> {
    pretty_section(w, "Клиенты")?;
    pretty_kv(w, "всего", stats.total.to_string())?;
    pretty_kv(w, "компании", stats.companies.to_string())?;
    pretty_kv(w, "частные", stats.individuals.to_string())?;
    pretty_kv(w, "завершено", stats.completed_projects.to_string())?;
    pretty_kv(w, "бюджет", locale.currency(stats.total_budget))
}
