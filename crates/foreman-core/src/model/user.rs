use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use super::{ParseEnumError, non_blank, normalize};

/// Staff role. Drives page access, see [`crate::access`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Admin,
    Manager,
    Foreman,
    Worker,
    Accountant,
    Architect,
    Engineer,
    SafetyOfficer,
    QualityController,
    ProcurementManager,
    LogisticsCoordinator,
}

impl UserRole {
    pub const ALL: [Self; 11] = [
        Self::Admin,
        Self::Manager,
        Self::Foreman,
        Self::Worker,
        Self::Accountant,
        Self::Architect,
        Self::Engineer,
        Self::SafetyOfficer,
        Self::QualityController,
        Self::ProcurementManager,
        Self::LogisticsCoordinator,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Manager => "manager",
            Self::Foreman => "foreman",
            Self::Worker => "worker",
            Self::Accountant => "accountant",
            Self::Architect => "architect",
            Self::Engineer => "engineer",
            Self::SafetyOfficer => "safety_officer",
            Self::QualityController => "quality_controller",
            Self::ProcurementManager => "procurement_manager",
            Self::LogisticsCoordinator => "logistics_coordinator",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Admin => "Администратор",
            Self::Manager => "Менеджер",
            Self::Foreman => "Прораб",
            Self::Worker => "Рабочий",
            Self::Accountant => "Бухгалтер",
            Self::Architect => "Архитектор",
            Self::Engineer => "Инженер",
            Self::SafetyOfficer => "Специалист по ТБ",
            Self::QualityController => "Контролер качества",
            Self::ProcurementManager => "Менеджер по закупкам",
            Self::LogisticsCoordinator => "Координатор логистики",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = normalize(s);
        Self::ALL
            .into_iter()
            .find(|role| role.as_str() == normalized)
            .ok_or_else(|| ParseEnumError {
                expected: "user role",
                got: s.to_string(),
            })
    }
}

/// Fields a signed-in user may edit on the profile page.
///
/// Role, salary and hire date are HR-owned and shown read-only.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileFields {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub department: Option<String>,
    pub skills: Vec<String>,
}

/// A staff account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub role: UserRole,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub salary: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hire_date: Option<NaiveDate>,
    #[serde(default)]
    pub skills: Vec<String>,
    pub is_active: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_login: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    #[must_use]
    pub fn new(id: String, email: String, name: String, role: UserRole, now: DateTime<Utc>) -> Self {
        Self {
            id,
            email,
            name,
            phone: None,
            role,
            department: None,
            salary: None,
            hire_date: None,
            skills: Vec::new(),
            is_active: true,
            last_login: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[must_use]
    pub fn profile_fields(&self) -> ProfileFields {
        ProfileFields {
            name: self.name.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            department: self.department.clone(),
            skills: self.skills.clone(),
        }
    }

    /// Apply profile edits. Blank skills are dropped, order is kept.
    pub fn apply_profile(&mut self, fields: ProfileFields) {
        self.name = fields.name.trim().to_string();
        self.email = fields.email.trim().to_string();
        self.phone = non_blank(fields.phone);
        self.department = non_blank(fields.department);
        self.skills = fields
            .skills
            .into_iter()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
    }

    /// Two-letter avatar initials from the display name.
    #[must_use]
    pub fn initials(&self) -> String {
        self.name
            .split_whitespace()
            .filter_map(|part| part.chars().next())
            .take(2)
            .flat_map(char::to_uppercase)
            .collect()
    }
}

/// A mock sign-in secret. Compared in plain text; there is no security here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    pub email: String,
    pub password: String,
    pub user_id: String,
}

impl Credential {
    /// Emails compare case-insensitively, passwords byte-for-byte.
    #[must_use]
    pub fn matches(&self, email: &str, password: &str) -> bool {
        self.email.eq_ignore_ascii_case(email.trim()) && self.password == password
    }
}
