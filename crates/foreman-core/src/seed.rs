//! Initial data for a workspace.
//!
//! A [`SeedProvider`] is handed to [`crate::workspace::Workspace::new`];
//! tests use [`EmptySeed`] or their own provider instead of the demo data.

use std::{fmt, str::FromStr};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ForemanError;
use crate::model::{
    Client, ClientKind, Credential, Priority, Project, ProjectAttachments, ProjectKind,
    ProjectStatus, User, UserRole,
};

/// Everything a seed contributes, in display order.
#[derive(Debug, Clone, Default)]
pub struct SeedData {
    pub clients: Vec<Client>,
    pub projects: Vec<Project>,
    pub users: Vec<User>,
    pub credentials: Vec<Credential>,
}

pub trait SeedProvider {
    /// Produce seed records stamped with `now`.
    fn load(&self, now: DateTime<Utc>) -> SeedData;
}

/// No records and no accounts.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptySeed;

impl SeedProvider for EmptySeed {
    fn load(&self, _now: DateTime<Utc>) -> SeedData {
        SeedData::default()
    }
}

/// Demonstration data: two clients, two projects, an admin and a manager.
#[derive(Debug, Clone, Copy, Default)]
pub struct DemoSeed;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
}

impl DemoSeed {
    fn clients(now: DateTime<Utc>) -> Vec<Client> {
        vec![
            Client {
                id: "1".into(),
                name: "ООО \"СтройИнвест\"".into(),
                kind: ClientKind::Company,
                contact_person: Some("Иванов Иван Иванович".into()),
                email: "info@stroyinvest.ru".into(),
                phone: "+7 (495) 123-45-67".into(),
                address: "г. Москва, ул. Строительная, д. 10".into(),
                inn: Some("7701234567".into()),
                kpp: Some("770101001".into()),
                website: Some("www.stroyinvest.ru".into()),
                notes: None,
                created_at: now,
                updated_at: now,
                is_active: true,
                projects: vec!["proj1".into(), "proj2".into()],
                total_budget: 15_000_000.0,
                completed_projects: 3,
            },
            Client {
                id: "2".into(),
                name: "Петров Петр Петрович".into(),
                kind: ClientKind::Individual,
                contact_person: None,
                email: "petrov@example.com".into(),
                phone: "+7 (916) 234-56-78".into(),
                address: "г. Москва, ул. Садовая, д. 5, кв. 10".into(),
                inn: None,
                kpp: None,
                website: None,
                notes: None,
                created_at: now,
                updated_at: now,
                is_active: true,
                projects: vec!["proj3".into()],
                total_budget: 2_500_000.0,
                completed_projects: 1,
            },
        ]
    }

    fn projects(now: DateTime<Utc>) -> Vec<Project> {
        vec![
            Project {
                id: "1".into(),
                name: "Жилой комплекс \"Солнечный\"".into(),
                description: Some("Строительство 3-х секционного жилого дома".into()),
                client_name: "ООО \"Инвест Строй\"".into(),
                client_contact: None,
                location: "г. Москва, ул. Солнечная, 15".into(),
                kind: ProjectKind::Residential,
                status: ProjectStatus::InProgress,
                priority: Priority::High,
                start_date: date(2024, 1, 15),
                end_date: Some(date(2024, 12, 15)),
                budget: 50_000_000.0,
                spent_amount: 25_000_000.0,
                progress: 50,
                created_at: now,
                updated_at: now,
                attachments: ProjectAttachments::default(),
            },
            Project {
                id: "2".into(),
                name: "Торговый центр \"Метрополис\"".into(),
                description: Some("Строительство торгового центра".into()),
                client_name: "АО \"Торговые Инвестиции\"".into(),
                client_contact: None,
                location: "г. Москва, ул. Торговая, 42".into(),
                kind: ProjectKind::Commercial,
                status: ProjectStatus::Planning,
                priority: Priority::Medium,
                start_date: date(2024, 3, 1),
                end_date: Some(date(2025, 6, 1)),
                budget: 150_000_000.0,
                spent_amount: 5_000_000.0,
                progress: 10,
                created_at: now,
                updated_at: now,
                attachments: ProjectAttachments::default(),
            },
        ]
    }

    fn users(now: DateTime<Utc>) -> Vec<User> {
        let mut admin = User::new(
            "1".into(),
            "admin@construction-crm.ru".into(),
            "Главный Администратор".into(),
            UserRole::Admin,
            now,
        );
        admin.phone = Some("+7 (999) 123-45-67".into());
        admin.department = Some("Управление".into());
        admin.salary = Some(80_000.0);
        admin.hire_date = Some(date(2020, 1, 1));
        admin.skills = vec![
            "Управление проектами".into(),
            "Планирование".into(),
            "Контроль качества".into(),
        ];

        let manager = User::new(
            "2".into(),
            "manager@construction-crm.ru".into(),
            "Менеджер Проектов".into(),
            UserRole::Manager,
            now,
        );
        vec![admin, manager]
    }
}

impl SeedProvider for DemoSeed {
    fn load(&self, now: DateTime<Utc>) -> SeedData {
        SeedData {
            clients: Self::clients(now),
            projects: Self::projects(now),
            users: Self::users(now),
            credentials: vec![
                Credential {
                    email: "admin@construction-crm.ru".into(),
                    password: "admin123".into(),
                    user_id: "1".into(),
                },
                Credential {
                    email: "manager@construction-crm.ru".into(),
                    password: "manager123".into(),
                    user_id: "2".into(),
                },
            ],
        }
    }
}

/// Seed selection as written in configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeedSource {
    #[default]
    Demo,
    Empty,
}

impl SeedSource {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Demo => "demo",
            Self::Empty => "empty",
        }
    }

    #[must_use]
    pub fn provider(self) -> Box<dyn SeedProvider> {
        match self {
            Self::Demo => Box::new(DemoSeed),
            Self::Empty => Box::new(EmptySeed),
        }
    }
}

impl fmt::Display for SeedSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SeedSource {
    type Err = ForemanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "demo" => Ok(Self::Demo),
            "empty" | "none" => Ok(Self::Empty),
            _ => Err(ForemanError::UnknownSeed(s.to_string())),
        }
    }
}
