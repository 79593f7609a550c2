//! The application object: every page and store for one session.
//!
//! A workspace is built once at start-up from a seed and a clock and dropped
//! at exit. Nothing is persisted.

use std::sync::Arc;

use tracing::info;

use crate::access::{Module, can_access};
use crate::clock::{Clock, SystemClock};
use crate::config::ProjectConfig;
use crate::error::ForemanError;
use crate::model::Project;
use crate::notify::Toasts;
use crate::page::{AuthPage, ClientsPage, DashboardStats, ProfilePage, ProjectsPage};
use crate::seed::SeedProvider;
use crate::view::Locale;

pub struct Workspace {
    pub auth: AuthPage,
    pub clients: ClientsPage,
    pub projects: ProjectsPage,
    pub profile: ProfilePage,
    pub toasts: Toasts,
    pub locale: Locale,
    pub recent_limit: usize,
}

impl Workspace {
    pub fn new(seed: &dyn SeedProvider, clock: Arc<dyn Clock>, config: &ProjectConfig) -> Self {
        let data = seed.load(clock.now());
        info!(
            clients = data.clients.len(),
            projects = data.projects.len(),
            users = data.users.len(),
            "workspace seeded"
        );
        Self {
            auth: AuthPage::new(data.users, data.credentials, Arc::clone(&clock)),
            clients: ClientsPage::new(data.clients, Arc::clone(&clock)),
            projects: ProjectsPage::new(data.projects, clock),
            profile: ProfilePage::default(),
            toasts: Toasts::new(),
            locale: config.locale.clone(),
            recent_limit: config.dashboard.recent_limit,
        }
    }

    /// Workspace seeded from configuration, on the wall clock.
    #[must_use]
    pub fn from_config(config: &ProjectConfig) -> Self {
        let seed = config.seed.source.provider();
        Self::new(seed.as_ref(), Arc::new(SystemClock), config)
    }

    #[must_use]
    pub fn dashboard(&self) -> DashboardStats {
        DashboardStats::compute(
            &self.projects.crud().store().list(),
            &self.clients.crud().store().list(),
            self.recent_limit,
            &self.locale,
        )
    }

    pub fn client_projects(&self, client_id: &str) -> Result<Vec<Project>, ForemanError> {
        self.clients.client_projects(client_id, &self.projects)
    }

    /// Whether the signed-in user may open `module`. False when signed out.
    #[must_use]
    pub fn can_open(&self, module: Module) -> bool {
        self.auth
            .current_user()
            .is_some_and(|user| can_access(user.role, module))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::{DemoSeed, EmptySeed};
    use crate::validate::LoginForm;

    #[test]
    fn empty_seed_builds_empty_workspace() {
        let ws = Workspace::new(&EmptySeed, Arc::new(SystemClock), &ProjectConfig::default());
        assert_eq!(ws.dashboard().total_projects, 0);
        assert!(!ws.can_open(Module::Dashboard));
    }

    #[test]
    fn access_follows_signed_in_role() {
        let mut ws = Workspace::new(&DemoSeed, Arc::new(SystemClock), &ProjectConfig::default());
        ws.auth
            .login(
                &LoginForm {
                    email: "manager@construction-crm.ru".into(),
                    password: "manager123".into(),
                },
                &mut ws.toasts,
            )
            .unwrap();
        assert!(ws.can_open(Module::Clients));
        assert!(!ws.can_open(Module::Materials));
    }
}
