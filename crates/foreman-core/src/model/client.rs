use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use super::{ParseEnumError, non_blank, normalize};

/// Legal form of a client. Company-only fields are gated on this tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClientKind {
    #[default]
    Individual,
    Company,
}

impl ClientKind {
    pub const ALL: [Self; 2] = [Self::Individual, Self::Company];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Individual => "individual",
            Self::Company => "company",
        }
    }

    /// Display label in the product locale.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Individual => "Физ. лицо",
            Self::Company => "Компания",
        }
    }

    /// Label of the name field for this kind.
    #[must_use]
    pub const fn name_label(self) -> &'static str {
        match self {
            Self::Individual => "ФИО",
            Self::Company => "Название компании",
        }
    }

    #[must_use]
    pub const fn is_company(self) -> bool {
        matches!(self, Self::Company)
    }
}

impl fmt::Display for ClientKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ClientKind {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "individual" | "person" => Ok(Self::Individual),
            "company" => Ok(Self::Company),
            _ => Err(ParseEnumError {
                expected: "client kind",
                got: s.to_string(),
            }),
        }
    }
}

/// The editable portion of a client, as submitted by the client form.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientFields {
    pub name: String,
    pub kind: ClientKind,
    pub contact_person: Option<String>,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub inn: Option<String>,
    pub kpp: Option<String>,
    pub website: Option<String>,
    pub notes: Option<String>,
}

impl ClientFields {
    /// Trim text and drop company-only fields for individuals.
    #[must_use]
    pub fn normalized(self) -> Self {
        let company = self.kind.is_company();
        let gate = |v: Option<String>| if company { non_blank(v) } else { None };
        Self {
            name: self.name.trim().to_string(),
            kind: self.kind,
            contact_person: gate(self.contact_person),
            email: self.email.trim().to_string(),
            phone: self.phone.trim().to_string(),
            address: self.address.trim().to_string(),
            inn: gate(self.inn),
            kpp: gate(self.kpp),
            website: gate(self.website),
            notes: non_blank(self.notes),
        }
    }
}

/// A customer record.
///
/// `total_budget` and `completed_projects` are maintained by whoever feeds
/// the record; nothing here recomputes them from `projects`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Client {
    pub id: String,
    pub name: String,
    pub kind: ClientKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_person: Option<String>,
    pub email: String,
    pub phone: String,
    pub address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inn: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kpp: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub is_active: bool,
    pub projects: Vec<String>,
    pub total_budget: f64,
    pub completed_projects: u32,
}

impl Client {
    /// Build a fresh client with default lifecycle fields.
    #[must_use]
    pub fn new(id: String, fields: ClientFields, now: DateTime<Utc>) -> Self {
        let fields = fields.normalized();
        Self {
            id,
            name: fields.name,
            kind: fields.kind,
            contact_person: fields.contact_person,
            email: fields.email,
            phone: fields.phone,
            address: fields.address,
            inn: fields.inn,
            kpp: fields.kpp,
            website: fields.website,
            notes: fields.notes,
            created_at: now,
            updated_at: now,
            is_active: true,
            projects: Vec::new(),
            total_budget: 0.0,
            completed_projects: 0,
        }
    }

    /// Replace every form-editable field. Lifecycle fields are untouched.
    pub fn replace_fields(&mut self, fields: ClientFields) {
        let fields = fields.normalized();
        self.name = fields.name;
        self.kind = fields.kind;
        self.contact_person = fields.contact_person;
        self.email = fields.email;
        self.phone = fields.phone;
        self.address = fields.address;
        self.inn = fields.inn;
        self.kpp = fields.kpp;
        self.website = fields.website;
        self.notes = fields.notes;
    }

    /// Current values as form fields, for pre-populating the edit dialog.
    #[must_use]
    pub fn fields(&self) -> ClientFields {
        ClientFields {
            name: self.name.clone(),
            kind: self.kind,
            contact_person: self.contact_person.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            address: self.address.clone(),
            inn: self.inn.clone(),
            kpp: self.kpp.clone(),
            website: self.website.clone(),
            notes: self.notes.clone(),
        }
    }

    /// Display label for the active flag.
    #[must_use]
    pub const fn activity_label(&self) -> &'static str {
        if self.is_active { "Активен" } else { "Неактивен" }
    }
}
