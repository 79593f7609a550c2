//! Display rows: records with labels and formatted values substituted.

use serde::Serialize;

use super::format::{Locale, format_progress};
use crate::model::{Client, ClientKind, Priority, Project, ProjectKind, ProjectStatus};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClientRow {
    pub id: String,
    pub name: String,
    pub kind: ClientKind,
    pub kind_label: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_person: Option<String>,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub is_active: bool,
    pub activity_label: &'static str,
    pub projects_count: usize,
    pub completed_projects: u32,
    pub total_budget: f64,
    pub total_budget_display: String,
    pub created: String,
}

impl ClientRow {
    #[must_use]
    pub fn new(client: &Client, locale: &Locale) -> Self {
        Self {
            id: client.id.clone(),
            name: client.name.clone(),
            kind: client.kind,
            kind_label: client.kind.label(),
            contact_person: client.contact_person.clone(),
            email: client.email.clone(),
            phone: client.phone.clone(),
            address: client.address.clone(),
            is_active: client.is_active,
            activity_label: client.activity_label(),
            projects_count: client.projects.len(),
            completed_projects: client.completed_projects,
            total_budget: client.total_budget,
            total_budget_display: locale.currency(client.total_budget),
            created: locale.date(client.created_at.date_naive()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectRow {
    pub id: String,
    pub name: String,
    pub client_name: String,
    pub location: String,
    pub kind: ProjectKind,
    pub kind_label: &'static str,
    pub status: ProjectStatus,
    pub status_label: &'static str,
    pub priority: Priority,
    pub priority_label: &'static str,
    pub progress: u8,
    pub progress_display: String,
    pub budget: f64,
    pub budget_display: String,
    pub spent_display: String,
    pub start_date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
}

impl ProjectRow {
    #[must_use]
    pub fn new(project: &Project, locale: &Locale) -> Self {
        Self {
            id: project.id.clone(),
            name: project.name.clone(),
            client_name: project.client_name.clone(),
            location: project.location.clone(),
            kind: project.kind,
            kind_label: project.kind.label(),
            status: project.status,
            status_label: project.status.label(),
            priority: project.priority,
            priority_label: project.priority.label(),
            progress: project.progress,
            progress_display: format_progress(project.progress),
            budget: project.budget,
            budget_display: locale.currency(project.budget),
            spent_display: locale.currency(project.spent_amount),
            start_date: locale.date(project.start_date),
            end_date: project.end_date.map(|d| locale.date(d)),
        }
    }
}

/// Rows for every record, in list order.
#[must_use]
pub fn client_rows<'a>(clients: impl IntoIterator<Item = &'a Client>, locale: &Locale) -> Vec<ClientRow> {
    clients.into_iter().map(|c| ClientRow::new(c, locale)).collect()
}

#[must_use]
pub fn project_rows<'a>(
    projects: impl IntoIterator<Item = &'a Project>,
    locale: &Locale,
) -> Vec<ProjectRow> {
    projects
        .into_iter()
        .map(|p| ProjectRow::new(p, locale))
        .collect()
}
