//! Which navigation modules each role may open.

use serde::Serialize;
use std::fmt;

use crate::model::UserRole;

/// A top-level section of the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Module {
    Dashboard,
    Projects,
    Clients,
    Estimates,
    Materials,
    Tools,
    Employees,
    Finances,
    Calendar,
    Reports,
    Settings,
    Profile,
}

impl Module {
    pub const ALL: [Self; 12] = [
        Self::Dashboard,
        Self::Projects,
        Self::Clients,
        Self::Estimates,
        Self::Materials,
        Self::Tools,
        Self::Employees,
        Self::Finances,
        Self::Calendar,
        Self::Reports,
        Self::Settings,
        Self::Profile,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Dashboard => "dashboard",
            Self::Projects => "projects",
            Self::Clients => "clients",
            Self::Estimates => "estimates",
            Self::Materials => "materials",
            Self::Tools => "tools",
            Self::Employees => "employees",
            Self::Finances => "finances",
            Self::Calendar => "calendar",
            Self::Reports => "reports",
            Self::Settings => "settings",
            Self::Profile => "profile",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Dashboard => "Главная",
            Self::Projects => "Проекты",
            Self::Clients => "Клиенты",
            Self::Estimates => "Сметы",
            Self::Materials => "Материалы",
            Self::Tools => "Инструменты",
            Self::Employees => "Сотрудники",
            Self::Finances => "Финансы",
            Self::Calendar => "Календарь",
            Self::Reports => "Отчеты",
            Self::Settings => "Настройки",
            Self::Profile => "Профиль",
        }
    }
}

impl fmt::Display for Module {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Modules granted to a role. Admin is granted everything.
#[must_use]
pub const fn role_modules(role: UserRole) -> &'static [Module] {
    use Module::{
        Calendar, Clients, Dashboard, Employees, Estimates, Finances, Materials, Profile,
        Projects, Reports, Settings, Tools,
    };
    match role {
        UserRole::Admin => &Module::ALL,
        UserRole::Manager => &[
            Dashboard, Projects, Clients, Estimates, Employees, Finances, Calendar, Reports,
            Settings, Profile,
        ],
        UserRole::Foreman => &[
            Dashboard, Projects, Materials, Tools, Employees, Calendar, Profile,
        ],
        UserRole::Worker => &[Dashboard, Projects, Calendar, Profile],
        UserRole::Accountant => &[Dashboard, Clients, Estimates, Finances, Reports, Profile],
        UserRole::Architect => &[Dashboard, Projects, Estimates, Profile],
        UserRole::Engineer => &[Dashboard, Projects, Materials, Tools, Profile],
        UserRole::SafetyOfficer => &[Dashboard, Projects, Employees, Reports, Profile],
        UserRole::QualityController => &[Dashboard, Projects, Reports, Profile],
        UserRole::ProcurementManager => &[
            Dashboard, Materials, Tools, Estimates, Finances, Profile,
        ],
        UserRole::LogisticsCoordinator => &[Dashboard, Materials, Tools, Projects, Profile],
    }
}

#[must_use]
pub fn can_access(role: UserRole, module: Module) -> bool {
    role_modules(role).contains(&module)
}
