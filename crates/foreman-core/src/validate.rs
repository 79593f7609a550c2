//! Submit-time form validation.
//!
//! Each field carries an ordered rule list; the first failing rule produces
//! that field's only message. A form validates every field and either yields
//! the typed payload or the full list of field errors.

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use serde::Serialize;

use crate::model::{
    ClientFields, ClientKind, Priority, ProfileFields, ProjectFields, ProjectKind, ProjectStatus,
};

pub const MIN_PASSWORD_LEN: usize = 6;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^[A-Z0-9._%+-]+@[A-Z0-9.-]+\.[A-Z]{2,}$").expect("email pattern compiles")
});

const INN10_WEIGHTS: [u32; 9] = [2, 4, 10, 3, 5, 9, 4, 6, 8];
const INN12_WEIGHTS_A: [u32; 10] = [7, 2, 4, 10, 3, 5, 9, 4, 6, 8];
const INN12_WEIGHTS_B: [u32; 11] = [3, 7, 2, 4, 10, 3, 5, 9, 4, 6, 8];

/// A single check applied to a text value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// Non-blank after trimming.
    Required,
    /// At least this many characters. Empty values pass; pair with `Required`.
    MinLength(usize),
    /// `local@domain.tld`, case-insensitive. Empty values pass.
    Email,
}

impl Rule {
    #[must_use]
    pub fn check(self, value: &str) -> bool {
        match self {
            Self::Required => !value.trim().is_empty(),
            Self::MinLength(min) => value.is_empty() || value.chars().count() >= min,
            Self::Email => value.trim().is_empty() || is_valid_email(value.trim()),
        }
    }
}

#[must_use]
pub fn is_valid_email(value: &str) -> bool {
    EMAIL_RE.is_match(value)
}

/// Russian taxpayer number (ИНН) check digits, 10 or 12 digits.
#[must_use]
pub fn is_valid_inn(value: &str) -> bool {
    let digits: Option<Vec<u32>> = value.chars().map(|c| c.to_digit(10)).collect();
    let Some(digits) = digits else {
        return false;
    };

    let check = |weights: &[u32]| -> u32 {
        let sum: u32 = weights.iter().zip(&digits).map(|(w, d)| w * d).sum();
        sum % 11 % 10
    };

    match digits.len() {
        10 => check(&INN10_WEIGHTS) == digits[9],
        12 => check(&INN12_WEIGHTS_A) == digits[10] && check(&INN12_WEIGHTS_B) == digits[11],
        _ => false,
    }
}

/// One inline message attached to a form field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// Ordered field errors, at most one per field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FormErrors(Vec<FieldError>);

impl FormErrors {
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Record an error unless the field already has one.
    pub fn push(&mut self, field: &'static str, message: impl Into<String>) {
        if self.get(field).is_none() {
            self.0.push(FieldError {
                field,
                message: message.into(),
            });
        }
    }

    /// Run `rules` in order against `value`; the first failure is recorded.
    pub fn check(&mut self, field: &'static str, value: &str, rules: &[(Rule, &str)]) {
        if let Some((_, message)) = rules.iter().find(|(rule, _)| !rule.check(value)) {
            self.push(field, *message);
        }
    }

    #[must_use]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }

    fn into_result<T>(self, value: impl FnOnce() -> T) -> Result<T, Self> {
        if self.is_empty() { Ok(value()) } else { Err(self) }
    }
}

impl<'a> IntoIterator for &'a FormErrors {
    type Item = &'a FieldError;
    type IntoIter = std::slice::Iter<'a, FieldError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

fn optional(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Raw client form input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientForm {
    pub kind: ClientKind,
    pub name: String,
    pub contact_person: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub inn: String,
    pub kpp: String,
    pub website: String,
    pub notes: String,
}

impl ClientForm {
    /// Pre-populate from an existing record (edit dialog).
    #[must_use]
    pub fn from_fields(fields: &ClientFields) -> Self {
        let text = |v: &Option<String>| v.clone().unwrap_or_default();
        Self {
            kind: fields.kind,
            name: fields.name.clone(),
            contact_person: text(&fields.contact_person),
            email: fields.email.clone(),
            phone: fields.phone.clone(),
            address: fields.address.clone(),
            inn: text(&fields.inn),
            kpp: text(&fields.kpp),
            website: text(&fields.website),
            notes: text(&fields.notes),
        }
    }

    pub fn validate(&self) -> Result<ClientFields, FormErrors> {
        let mut errors = FormErrors::new();
        errors.check("name", &self.name, &[(Rule::Required, "Название/Имя обязательно")]);
        errors.check(
            "email",
            &self.email,
            &[
                (Rule::Required, "Email обязателен"),
                (Rule::Email, "Неверный формат email"),
            ],
        );
        errors.check("phone", &self.phone, &[(Rule::Required, "Телефон обязателен")]);
        errors.check("address", &self.address, &[(Rule::Required, "Адрес обязателен")]);

        let inn = self.inn.trim();
        if self.kind.is_company() && !inn.is_empty() && !is_valid_inn(inn) {
            errors.push("inn", "Неверный ИНН");
        }

        errors.into_result(|| {
            ClientFields {
                name: self.name.clone(),
                kind: self.kind,
                contact_person: optional(&self.contact_person),
                email: self.email.clone(),
                phone: self.phone.clone(),
                address: self.address.clone(),
                inn: optional(&self.inn),
                kpp: optional(&self.kpp),
                website: optional(&self.website),
                notes: optional(&self.notes),
            }
            .normalized()
        })
    }
}

/// Raw project form input. Numbers and dates arrive as text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectForm {
    pub name: String,
    pub description: String,
    pub client_name: String,
    pub client_contact: String,
    pub location: String,
    pub kind: ProjectKind,
    pub status: ProjectStatus,
    pub priority: Priority,
    pub start_date: String,
    pub end_date: String,
    pub budget: String,
    pub progress: String,
}

impl Default for ProjectForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            description: String::new(),
            client_name: String::new(),
            client_contact: String::new(),
            location: String::new(),
            kind: ProjectKind::default(),
            status: ProjectStatus::default(),
            priority: Priority::default(),
            start_date: String::new(),
            end_date: String::new(),
            budget: String::new(),
            progress: "0".to_string(),
        }
    }
}

/// Accepts `YYYY-MM-DD` or `dd.MM.yyyy`.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(value, "%d.%m.%Y"))
        .ok()
}

/// Accepts `1 500 000,50`, `1500000.5` and NBSP group separators.
pub fn parse_amount(value: &str) -> Option<f64> {
    let cleaned: String = value
        .trim()
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| if c == ',' { '.' } else { c })
        .collect();
    cleaned.parse::<f64>().ok()
}

impl ProjectForm {
    #[must_use]
    pub fn from_fields(fields: &ProjectFields) -> Self {
        Self {
            name: fields.name.clone(),
            description: fields.description.clone().unwrap_or_default(),
            client_name: fields.client_name.clone(),
            client_contact: fields.client_contact.clone().unwrap_or_default(),
            location: fields.location.clone(),
            kind: fields.kind,
            status: fields.status,
            priority: fields.priority,
            start_date: fields.start_date.format("%Y-%m-%d").to_string(),
            end_date: fields
                .end_date
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            budget: fields.budget.to_string(),
            progress: fields.progress.to_string(),
        }
    }

    pub fn validate(&self) -> Result<ProjectFields, FormErrors> {
        let mut errors = FormErrors::new();
        errors.check("name", &self.name, &[(Rule::Required, "Название обязательно")]);
        errors.check(
            "client_name",
            &self.client_name,
            &[(Rule::Required, "Имя клиента обязательно")],
        );
        errors.check("location", &self.location, &[(Rule::Required, "Адрес обязателен")]);

        errors.check("budget", &self.budget, &[(Rule::Required, "Бюджет обязателен")]);
        let budget = parse_amount(&self.budget);
        match budget {
            Some(b) if !b.is_finite() => errors.push("budget", "Неверный формат суммы"),
            Some(b) if b < 0.0 => errors.push("budget", "Бюджет должен быть положительным"),
            None => errors.push("budget", "Неверный формат суммы"),
            Some(_) => {}
        }

        errors.check(
            "start_date",
            &self.start_date,
            &[(Rule::Required, "Дата начала обязательна")],
        );
        let start = parse_date(&self.start_date);
        if start.is_none() {
            errors.push("start_date", "Неверный формат даты");
        }

        errors.check(
            "end_date",
            &self.end_date,
            &[(Rule::Required, "Дата окончания обязательна")],
        );
        let end = parse_date(&self.end_date);
        match (start, end) {
            (_, None) => errors.push("end_date", "Неверный формат даты"),
            (Some(s), Some(e)) if e < s => {
                errors.push("end_date", "Дата окончания не может быть раньше даты начала");
            }
            _ => {}
        }

        let progress = self.progress.trim();
        let progress = if progress.is_empty() {
            Some(0)
        } else {
            progress.parse::<u8>().ok().filter(|p| *p <= 100)
        };
        if progress.is_none() {
            errors.push("progress", "Прогресс должен быть от 0 до 100");
        }

        if !errors.is_empty() {
            return Err(errors);
        }
        let (Some(budget), Some(start_date), Some(progress)) = (budget, start, progress) else {
            return Err(errors);
        };
        Ok(ProjectFields {
            name: self.name.trim().to_string(),
            description: optional(&self.description),
            client_name: self.client_name.trim().to_string(),
            client_contact: optional(&self.client_contact),
            location: self.location.trim().to_string(),
            kind: self.kind,
            status: self.status,
            priority: self.priority,
            start_date,
            end_date: end,
            budget,
            progress,
        })
    }
}

/// Sign-in form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    pub fn validate(&self) -> Result<(), FormErrors> {
        let mut errors = FormErrors::new();
        errors.check(
            "email",
            &self.email,
            &[
                (Rule::Required, "Email обязателен"),
                (Rule::Email, "Некорректный формат email"),
            ],
        );
        errors.check(
            "password",
            &self.password,
            &[
                (Rule::Required, "Пароль обязателен"),
                (
                    Rule::MinLength(MIN_PASSWORD_LEN),
                    "Пароль должен содержать минимум 6 символов",
                ),
            ],
        );
        errors.into_result(|| ())
    }
}

/// Profile edit form. Skills are a comma-separated list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub department: String,
    pub skills: String,
}

impl ProfileForm {
    #[must_use]
    pub fn from_fields(fields: &ProfileFields) -> Self {
        Self {
            name: fields.name.clone(),
            email: fields.email.clone(),
            phone: fields.phone.clone().unwrap_or_default(),
            department: fields.department.clone().unwrap_or_default(),
            skills: fields.skills.join(", "),
        }
    }

    pub fn validate(&self) -> Result<ProfileFields, FormErrors> {
        let mut errors = FormErrors::new();
        errors.check("name", &self.name, &[(Rule::Required, "Имя обязательно")]);
        errors.check(
            "email",
            &self.email,
            &[
                (Rule::Required, "Email обязателен"),
                (Rule::Email, "Некорректный формат email"),
            ],
        );
        errors.into_result(|| ProfileFields {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            phone: optional(&self.phone),
            department: optional(&self.department),
            skills: self
                .skills
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
        })
    }
}

/// Password change form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PasswordChangeForm {
    pub current: String,
    pub new: String,
    pub confirm: String,
}

impl PasswordChangeForm {
    /// A mismatched confirmation is reported on `confirm` whatever the state
    /// of the other fields.
    pub fn validate(&self) -> Result<(), FormErrors> {
        let mut errors = FormErrors::new();
        errors.check(
            "current",
            &self.current,
            &[(Rule::Required, "Текущий пароль обязателен")],
        );
        errors.check(
            "new",
            &self.new,
            &[
                (Rule::Required, "Новый пароль обязателен"),
                (
                    Rule::MinLength(MIN_PASSWORD_LEN),
                    "Пароль должен содержать минимум 6 символов",
                ),
            ],
        );
        if self.new.as_bytes() != self.confirm.as_bytes() {
            errors.push("confirm", "Пароли не совпадают");
        }
        errors.into_result(|| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_rule_examples() {
        assert!(!is_valid_email("foo"));
        assert!(!is_valid_email("foo@bar"));
        assert!(is_valid_email("foo@bar.com"));
        assert!(is_valid_email("FOO.Bar+x@Sub.Example.RU"));
        assert!(!is_valid_email("@bar.com"));
        assert!(!is_valid_email("foo@bar.c"));
    }

    #[test]
    fn inn_check_digits() {
        assert!(is_valid_inn("7707083893"));
        assert!(is_valid_inn("500100732259"));
        assert!(!is_valid_inn("7707083894"));
        assert!(!is_valid_inn("77070838"));
        assert!(!is_valid_inn("77070838a3"));
    }

    #[test]
    fn first_failing_rule_wins() {
        let form = ClientForm {
            email: String::new(),
            ..ClientForm::default()
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.get("email"), Some("Email обязателен"));
        assert_eq!(errors.iter().filter(|e| e.field == "email").count(), 1);
        assert_eq!(errors.len(), 4);
    }

    #[test]
    fn client_form_rejects_bad_email() {
        let form = ClientForm {
            kind: ClientKind::Company,
            name: "Acme LLC".into(),
            email: "foo@bar".into(),
            phone: "+1-000".into(),
            address: "1 Main St".into(),
            ..ClientForm::default()
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.get("email"), Some("Неверный формат email"));
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn client_form_checks_inn_only_for_companies() {
        let mut form = ClientForm {
            kind: ClientKind::Company,
            name: "Acme LLC".into(),
            email: "a@acme.com".into(),
            phone: "+1-000".into(),
            address: "1 Main St".into(),
            inn: "1234567890".into(),
            ..ClientForm::default()
        };
        assert_eq!(form.validate().unwrap_err().get("inn"), Some("Неверный ИНН"));

        form.kind = ClientKind::Individual;
        let fields = form.validate().unwrap();
        assert!(fields.inn.is_none());
    }

    fn project_form() -> ProjectForm {
        ProjectForm {
            name: "Depot".into(),
            client_name: "Acme LLC".into(),
            location: "Riverside".into(),
            start_date: "2024-01-15".into(),
            end_date: "15.12.2024".into(),
            budget: "50 000 000".into(),
            progress: "50".into(),
            ..ProjectForm::default()
        }
    }

    #[test]
    fn project_form_parses_text_inputs() {
        let fields = project_form().validate().unwrap();
        assert_eq!(fields.budget, 50_000_000.0);
        assert_eq!(fields.progress, 50);
        assert_eq!(fields.end_date, NaiveDate::from_ymd_opt(2024, 12, 15));
    }

    #[test]
    fn project_form_rejects_out_of_range_values() {
        let mut form = project_form();
        form.progress = "101".into();
        form.budget = "-5".into();
        form.end_date = "2023-12-31".into();
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.get("progress"), Some("Прогресс должен быть от 0 до 100"));
        assert_eq!(errors.get("budget"), Some("Бюджет должен быть положительным"));
        assert_eq!(
            errors.get("end_date"),
            Some("Дата окончания не может быть раньше даты начала")
        );
    }

    #[test]
    fn project_form_requires_dates_and_budget() {
        let mut form = project_form();
        form.budget = String::new();
        form.start_date = String::new();
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.get("budget"), Some("Бюджет обязателен"));
        assert_eq!(errors.get("start_date"), Some("Дата начала обязательна"));
    }

    #[test]
    fn login_form_messages() {
        let errors = LoginForm {
            email: "admin".into(),
            password: "123".into(),
        }
        .validate()
        .unwrap_err();
        assert_eq!(errors.get("email"), Some("Некорректный формат email"));
        assert_eq!(
            errors.get("password"),
            Some("Пароль должен содержать минимум 6 символов")
        );
    }

    #[test]
    fn password_mismatch_is_reported_regardless_of_validity() {
        let errors = PasswordChangeForm {
            current: String::new(),
            new: "abc".into(),
            confirm: "abd".into(),
        }
        .validate()
        .unwrap_err();
        assert_eq!(errors.get("confirm"), Some("Пароли не совпадают"));

        let errors = PasswordChangeForm {
            current: "old-secret".into(),
            new: "new-secret".into(),
            confirm: "new-secreT".into(),
        }
        .validate()
        .unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.get("confirm"), Some("Пароли не совпадают"));
    }

    #[test]
    fn profile_form_splits_skills() {
        let fields = ProfileForm {
            name: "Admin".into(),
            email: "admin@construction-crm.ru".into(),
            skills: "Планирование, , Контроль качества".into(),
            ..ProfileForm::default()
        }
        .validate()
        .unwrap();
        assert_eq!(fields.skills.len(), 2);
    }
}
