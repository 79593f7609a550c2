use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use super::{ParseEnumError, non_blank, normalize};

/// Construction category of a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectKind {
    #[default]
    Residential,
    Commercial,
    Industrial,
    Infrastructure,
    Renovation,
    Demolition,
}

impl ProjectKind {
    pub const ALL: [Self; 6] = [
        Self::Residential,
        Self::Commercial,
        Self::Industrial,
        Self::Infrastructure,
        Self::Renovation,
        Self::Demolition,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Residential => "residential",
            Self::Commercial => "commercial",
            Self::Industrial => "industrial",
            Self::Infrastructure => "infrastructure",
            Self::Renovation => "renovation",
            Self::Demolition => "demolition",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Residential => "Жилое строительство",
            Self::Commercial => "Коммерческое",
            Self::Industrial => "Промышленное",
            Self::Infrastructure => "Инфраструктура",
            Self::Renovation => "Реконструкция",
            Self::Demolition => "Снос",
        }
    }
}

/// Project lifecycle state.
///
/// Variant order follows the lifecycle, so `ALL` doubles as the display order
/// for status breakdowns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    #[default]
    Planning,
    Tender,
    Approved,
    InProgress,
    OnHold,
    QualityCheck,
    ClientReview,
    Completed,
    Warranty,
    Cancelled,
}

impl ProjectStatus {
    pub const ALL: [Self; 10] = [
        Self::Planning,
        Self::Tender,
        Self::Approved,
        Self::InProgress,
        Self::OnHold,
        Self::QualityCheck,
        Self::ClientReview,
        Self::Completed,
        Self::Warranty,
        Self::Cancelled,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Planning => "planning",
            Self::Tender => "tender",
            Self::Approved => "approved",
            Self::InProgress => "in_progress",
            Self::OnHold => "on_hold",
            Self::QualityCheck => "quality_check",
            Self::ClientReview => "client_review",
            Self::Completed => "completed",
            Self::Warranty => "warranty",
            Self::Cancelled => "cancelled",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Planning => "Планирование",
            Self::Tender => "Тендер",
            Self::Approved => "Утвержден",
            Self::InProgress => "В работе",
            Self::OnHold => "Приостановлен",
            Self::QualityCheck => "Контроль качества",
            Self::ClientReview => "Проверка заказчиком",
            Self::Completed => "Завершен",
            Self::Warranty => "Гарантия",
            Self::Cancelled => "Отменен",
        }
    }

    /// `warranty` and `cancelled` accept no further transitions.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Warranty | Self::Cancelled)
    }

    /// Validate whether a transition from self to `target` is allowed.
    ///
    /// Valid transitions:
    /// - `planning -> tender -> approved -> in_progress`
    /// - `in_progress -> on_hold | quality_check | client_review`
    /// - `on_hold | quality_check | client_review -> in_progress | completed`
    /// - `completed -> warranty`
    /// - any non-terminal state `-> cancelled`
    pub fn can_transition_to(self, target: Self) -> Result<(), InvalidTransition> {
        if self == target {
            return Err(InvalidTransition {
                from: self,
                to: target,
                reason: "no-op transition is not allowed",
            });
        }
        if self.is_terminal() {
            return Err(InvalidTransition {
                from: self,
                to: target,
                reason: "status is terminal",
            });
        }

        let allowed = matches!(
            (self, target),
            (_, Self::Cancelled)
                | (Self::Planning, Self::Tender)
                | (Self::Tender, Self::Approved)
                | (Self::Approved, Self::InProgress)
                | (
                    Self::InProgress,
                    Self::OnHold | Self::QualityCheck | Self::ClientReview
                )
                | (
                    Self::OnHold | Self::QualityCheck | Self::ClientReview,
                    Self::InProgress | Self::Completed
                )
                | (Self::Completed, Self::Warranty)
        );

        if allowed {
            Ok(())
        } else {
            Err(InvalidTransition {
                from: self,
                to: target,
                reason: "transition not allowed by lifecycle rules",
            })
        }
    }

    /// The next state along the main lifecycle path, if any.
    ///
    /// From `in_progress` the main path goes through `quality_check`; side
    /// states (`on_hold`, `client_review`) advance straight to `completed`.
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::Planning => Some(Self::Tender),
            Self::Tender => Some(Self::Approved),
            Self::Approved => Some(Self::InProgress),
            Self::InProgress => Some(Self::QualityCheck),
            Self::OnHold | Self::QualityCheck | Self::ClientReview => Some(Self::Completed),
            Self::Completed => Some(Self::Warranty),
            Self::Warranty | Self::Cancelled => None,
        }
    }
}

/// Error returned when a status transition is invalid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidTransition {
    pub from: ProjectStatus,
    pub to: ProjectStatus,
    pub reason: &'static str,
}

/// Scheduling priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub const ALL: [Self; 3] = [Self::Low, Self::Medium, Self::High];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Low => "Низкий",
            Self::Medium => "Средний",
            Self::High => "Высокий",
        }
    }
}

macro_rules! display_and_parse {
    ($ty:ty, $expected:literal) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = ParseEnumError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let normalized = normalize(s);
                Self::ALL
                    .into_iter()
                    .find(|v| v.as_str() == normalized)
                    .ok_or_else(|| ParseEnumError {
                        expected: $expected,
                        got: s.to_string(),
                    })
            }
        }
    };
}

display_and_parse!(ProjectKind, "project type");
display_and_parse!(ProjectStatus, "project status");
display_and_parse!(Priority, "priority");

/// Collections owned by collaborators outside the projects page (task
/// boards, document stores, finance). They start empty and are only read
/// here.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectAttachments {
    pub tasks: Vec<String>,
    pub documents: Vec<String>,
    pub expenses: Vec<String>,
    pub team: Vec<String>,
    pub timeline: Vec<String>,
    pub risks: Vec<String>,
    pub quality_checks: Vec<String>,
    pub safety_incidents: Vec<String>,
    pub materials: Vec<String>,
    pub equipment: Vec<String>,
}

impl ProjectAttachments {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
            && self.documents.is_empty()
            && self.expenses.is_empty()
            && self.team.is_empty()
            && self.timeline.is_empty()
            && self.risks.is_empty()
            && self.quality_checks.is_empty()
            && self.safety_incidents.is_empty()
            && self.materials.is_empty()
            && self.equipment.is_empty()
    }
}

/// The editable portion of a project, as submitted by the project form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectFields {
    pub name: String,
    pub description: Option<String>,
    pub client_name: String,
    pub client_contact: Option<String>,
    pub location: String,
    pub kind: ProjectKind,
    pub status: ProjectStatus,
    pub priority: Priority,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub budget: f64,
    pub progress: u8,
}

impl Default for ProjectFields {
    fn default() -> Self {
        Self {
            name: String::new(),
            description: None,
            client_name: String::new(),
            client_contact: None,
            location: String::new(),
            kind: ProjectKind::default(),
            status: ProjectStatus::default(),
            priority: Priority::default(),
            start_date: NaiveDate::default(),
            end_date: None,
            budget: 0.0,
            progress: 0,
        }
    }
}

/// A construction project.
///
/// `client_name`/`client_contact` are a denormalized copy of the client, not
/// a reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub client_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_contact: Option<String>,
    pub location: String,
    pub kind: ProjectKind,
    pub status: ProjectStatus,
    pub priority: Priority,
    pub start_date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    pub budget: f64,
    pub spent_amount: f64,
    pub progress: u8,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub attachments: ProjectAttachments,
}

impl Project {
    #[must_use]
    pub fn new(id: String, fields: ProjectFields, now: DateTime<Utc>) -> Self {
        Self {
            id,
            name: fields.name.trim().to_string(),
            description: non_blank(fields.description),
            client_name: fields.client_name.trim().to_string(),
            client_contact: non_blank(fields.client_contact),
            location: fields.location.trim().to_string(),
            kind: fields.kind,
            status: fields.status,
            priority: fields.priority,
            start_date: fields.start_date,
            end_date: fields.end_date,
            budget: fields.budget,
            spent_amount: 0.0,
            progress: fields.progress,
            created_at: now,
            updated_at: now,
            attachments: ProjectAttachments::default(),
        }
    }

    /// Replace every form-editable field.
    pub fn replace_fields(&mut self, fields: ProjectFields) {
        self.name = fields.name.trim().to_string();
        self.description = non_blank(fields.description);
        self.client_name = fields.client_name.trim().to_string();
        self.client_contact = non_blank(fields.client_contact);
        self.location = fields.location.trim().to_string();
        self.kind = fields.kind;
        self.status = fields.status;
        self.priority = fields.priority;
        self.start_date = fields.start_date;
        self.end_date = fields.end_date;
        self.budget = fields.budget;
        self.progress = fields.progress;
    }

    #[must_use]
    pub fn fields(&self) -> ProjectFields {
        ProjectFields {
            name: self.name.clone(),
            description: self.description.clone(),
            client_name: self.client_name.clone(),
            client_contact: self.client_contact.clone(),
            location: self.location.clone(),
            kind: self.kind,
            status: self.status,
            priority: self.priority,
            start_date: self.start_date,
            end_date: self.end_date,
            budget: self.budget,
            progress: self.progress,
        }
    }

    /// Budget left after recorded spend. Negative when over budget.
    #[must_use]
    pub fn remaining_budget(&self) -> f64 {
        self.budget - self.spent_amount
    }
}
