use std::sync::Arc;

use tracing::{info, warn};

use super::{CrudMessages, CrudPage, PageRecord};
use crate::clock::Clock;
use crate::error::ForemanError;
use crate::model::{Project, ProjectStatus};
use crate::notify::Toasts;
use crate::validate::{FormErrors, ProjectForm};
use crate::view::{Locale, ProjectFilter, ProjectRow, project_rows};

impl PageRecord for Project {
    type Form = ProjectForm;

    const MESSAGES: CrudMessages = CrudMessages {
        created: "Проект успешно создан",
        updated: "Проект обновлен",
        update_failed: "Ошибка при обновлении проекта",
        deleted: "Проект удален",
        delete_failed: "Ошибка при удалении проекта",
    };

    fn validate(form: &ProjectForm) -> Result<Self::Fields, FormErrors> {
        form.validate()
    }

    fn not_found(id: &str) -> ForemanError {
        ForemanError::ProjectNotFound { id: id.to_string() }
    }
}

/// Read access to the project list for other pages.
pub trait ProjectListing {
    fn projects(&self) -> Arc<Vec<Project>>;

    /// Projects whose denormalized client name equals `client_name`.
    fn projects_for_client(&self, client_name: &str) -> Vec<Project> {
        self.projects()
            .iter()
            .filter(|p| p.client_name == client_name)
            .cloned()
            .collect()
    }
}

impl ProjectListing for Vec<Project> {
    fn projects(&self) -> Arc<Vec<Project>> {
        Arc::new(self.clone())
    }
}

/// The projects page: list, filter, CRUD and status advancement.
pub struct ProjectsPage {
    crud: CrudPage<Project>,
    pub filter: ProjectFilter,
}

impl ProjectsPage {
    pub fn new(seed: Vec<Project>, clock: Arc<dyn Clock>) -> Self {
        Self {
            crud: CrudPage::new(seed, clock),
            filter: ProjectFilter::default(),
        }
    }

    #[must_use]
    pub const fn crud(&self) -> &CrudPage<Project> {
        &self.crud
    }

    pub const fn crud_mut(&mut self) -> &mut CrudPage<Project> {
        &mut self.crud
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Project> {
        self.crud.store().get(id)
    }

    /// Projects passing the current filter, in insertion order.
    #[must_use]
    pub fn visible(&self) -> Vec<Project> {
        let all = self.crud.store().list();
        self.filter.apply(&all).into_iter().cloned().collect()
    }

    #[must_use]
    pub fn rows(&self, locale: &Locale) -> Vec<ProjectRow> {
        project_rows(&self.visible(), locale)
    }

    /// Apply a status query such as `active` or `planning`.
    pub fn set_status_query(&mut self, query: &str) -> Result<(), ForemanError> {
        self.filter.status = crate::view::parse_status_query(query)?;
        Ok(())
    }

    /// Move a project along its lifecycle.
    ///
    /// With no explicit target the next state on the main path is used.
    /// Unlike the edit form, this enforces the transition rules.
    pub fn advance_status(
        &mut self,
        id: &str,
        target: Option<ProjectStatus>,
        toasts: &mut Toasts,
    ) -> Result<Project, ForemanError> {
        let current = self
            .get(id)
            .ok_or_else(|| Project::not_found(id))?
            .status;

        let target = match target.or_else(|| current.next()) {
            Some(t) => t,
            None => {
                warn!(id, status = %current, "status is terminal");
                toasts.error("Статус проекта не может быть изменен");
                return Err(ForemanError::InvalidStatusTransition {
                    from: current,
                    to: current,
                });
            }
        };

        if let Err(invalid) = current.can_transition_to(target) {
            warn!(id, from = %invalid.from, to = %invalid.to, reason = invalid.reason, "transition rejected");
            toasts.error("Статус проекта не может быть изменен");
            return Err(ForemanError::InvalidStatusTransition {
                from: invalid.from,
                to: invalid.to,
            });
        }

        let updated = self
            .crud
            .store_mut()
            .modify(id, |project| project.status = target)
            .ok_or_else(|| Project::not_found(id))?;
        info!(id, from = %current, to = %target, "project status advanced");
        toasts.success(format!("Статус проекта изменен: {}", target.label()));
        Ok(updated)
    }
}

impl ProjectListing for ProjectsPage {
    fn projects(&self) -> Arc<Vec<Project>> {
        self.crud.store().list()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::SystemClock;
    use crate::seed::{DemoSeed, SeedProvider};
    use chrono::Utc;

    fn page() -> ProjectsPage {
        ProjectsPage::new(DemoSeed.load(Utc::now()).projects, Arc::new(SystemClock))
    }

    #[test]
    fn advance_follows_main_path() {
        let mut page = page();
        let mut toasts = Toasts::new();
        let moved = page.advance_status("2", None, &mut toasts).unwrap();
        assert_eq!(moved.status, ProjectStatus::Tender);
        assert!(toasts.last().unwrap().message.contains("Тендер"));
    }

    #[test]
    fn advance_rejects_skips_and_terminal_states() {
        let mut page = page();
        let mut toasts = Toasts::new();
        let err = page
            .advance_status("2", Some(ProjectStatus::Completed), &mut toasts)
            .unwrap_err();
        assert!(matches!(err, ForemanError::InvalidStatusTransition { .. }));
        assert_eq!(page.get("2").unwrap().status, ProjectStatus::Planning);

        page.advance_status("2", Some(ProjectStatus::Cancelled), &mut toasts)
            .unwrap();
        assert!(page.advance_status("2", None, &mut toasts).is_err());
    }

    #[test]
    fn unknown_project_is_not_found() {
        let mut page = page();
        let mut toasts = Toasts::new();
        assert!(matches!(
            page.advance_status("nope", None, &mut toasts),
            Err(ForemanError::ProjectNotFound { .. })
        ));
    }

    #[test]
    fn status_query_drives_visible_list() {
        let mut page = page();
        page.set_status_query("active").unwrap();
        let visible = page.visible();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].status, ProjectStatus::InProgress);
        assert!(page.set_status_query("paused").is_err());
    }
}
