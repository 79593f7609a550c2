use serde::Serialize;

use crate::model::{Client, Project, ProjectStatus};
use crate::view::format::completion_percent;
use crate::view::{Locale, ProjectRow, project_rows};

/// Number of projects in one status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusCount {
    pub status: ProjectStatus,
    pub label: &'static str,
    pub count: usize,
}

/// Figures shown on the landing page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardStats {
    pub total_projects: usize,
    pub active_projects: usize,
    pub completed_projects: usize,
    /// Share of completed projects, whole percent.
    pub completion_rate: u8,
    pub by_status: Vec<StatusCount>,
    pub total_budget: f64,
    pub total_spent: f64,
    pub average_progress: f64,
    pub total_clients: usize,
    pub company_clients: usize,
    pub recent_projects: Vec<ProjectRow>,
}

impl DashboardStats {
    /// `recent_limit` bounds the recent list to the last created projects,
    /// kept in insertion order.
    #[allow(clippy::cast_precision_loss)]
    #[must_use]
    pub fn compute(
        projects: &[Project],
        clients: &[Client],
        recent_limit: usize,
        locale: &Locale,
    ) -> Self {
        let count = |status: ProjectStatus| projects.iter().filter(|p| p.status == status).count();
        let completed = count(ProjectStatus::Completed);

        let by_status = ProjectStatus::ALL
            .into_iter()
            .map(|status| StatusCount {
                status,
                label: status.label(),
                count: count(status),
            })
            .filter(|c| c.count > 0)
            .collect();

        let average_progress = if projects.is_empty() {
            0.0
        } else {
            projects.iter().map(|p| f64::from(p.progress)).sum::<f64>() / projects.len() as f64
        };

        let skip = projects.len().saturating_sub(recent_limit);

        Self {
            total_projects: projects.len(),
            active_projects: count(ProjectStatus::InProgress),
            completed_projects: completed,
            completion_rate: completion_percent(completed, projects.len()),
            by_status,
            total_budget: projects.iter().map(|p| p.budget).sum(),
            total_spent: projects.iter().map(|p| p.spent_amount).sum(),
            average_progress,
            total_clients: clients.len(),
            company_clients: clients.iter().filter(|c| c.kind.is_company()).count(),
            recent_projects: project_rows(&projects[skip..], locale),
        }
    }
}
