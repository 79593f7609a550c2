//! Modal form state: focusable single-line fields and choice pickers.
//!
//! Keys: Tab/↓ next field, Shift-Tab/↑ previous, ←/→ move the cursor or
//! cycle a choice, Enter submit, Esc cancel.

use crossterm::event::{KeyCode, KeyEvent};
use foreman_core::model::{ClientKind, Priority, ProjectKind, ProjectStatus};
use foreman_core::validate::{
    ClientForm, FormErrors, LoginForm, PasswordChangeForm, ProfileForm, ProjectForm,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormAction {
    None,
    Submit,
    Cancel,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    /// Rendered masked.
    Secret,
    /// `(tag, label)` options; the value is the tag.
    Choice(Vec<(&'static str, &'static str)>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub key: &'static str,
    pub label: &'static str,
    pub value: String,
    pub cursor: usize,
    pub kind: FieldKind,
}

impl Field {
    fn text(key: &'static str, label: &'static str, value: &str) -> Self {
        Self {
            key,
            label,
            value: value.to_string(),
            cursor: char_len(value),
            kind: FieldKind::Text,
        }
    }

    fn secret(key: &'static str, label: &'static str) -> Self {
        Self {
            kind: FieldKind::Secret,
            ..Self::text(key, label, "")
        }
    }

    fn choice(
        key: &'static str,
        label: &'static str,
        value: &str,
        options: Vec<(&'static str, &'static str)>,
    ) -> Self {
        Self {
            kind: FieldKind::Choice(options),
            ..Self::text(key, label, value)
        }
    }

    /// Text shown in the form, with a cursor block when focused.
    pub fn display(&self, focused: bool) -> String {
        match &self.kind {
            FieldKind::Choice(options) => {
                let label = options
                    .iter()
                    .find(|(tag, _)| *tag == self.value)
                    .map_or(self.value.as_str(), |(_, label)| label);
                if focused {
                    format!("◀ {label} ▶")
                } else {
                    label.to_string()
                }
            }
            FieldKind::Secret => {
                let masked = "•".repeat(char_len(&self.value));
                if focused {
                    with_cursor(&masked, self.cursor)
                } else {
                    masked
                }
            }
            FieldKind::Text if focused => with_cursor(&self.value, self.cursor),
            FieldKind::Text => self.value.clone(),
        }
    }

    fn cycle(&mut self, forward: bool) {
        let FieldKind::Choice(options) = &self.kind else {
            return;
        };
        if options.is_empty() {
            return;
        }
        let idx = options
            .iter()
            .position(|(tag, _)| *tag == self.value)
            .unwrap_or(0);
        let next = if forward {
            (idx + 1) % options.len()
        } else {
            (idx + options.len() - 1) % options.len()
        };
        self.value = options[next].0.to_string();
    }
}

/// An open modal form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormState {
    pub title: String,
    pub fields: Vec<Field>,
    pub focus: usize,
    pub errors: FormErrors,
}

impl FormState {
    fn new(title: impl Into<String>, fields: Vec<Field>) -> Self {
        Self {
            title: title.into(),
            fields,
            focus: 0,
            errors: FormErrors::new(),
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> FormAction {
        match key.code {
            KeyCode::Esc => return FormAction::Cancel,
            KeyCode::Enter => return FormAction::Submit,
            KeyCode::Tab | KeyCode::Down => self.focus_next(),
            KeyCode::BackTab | KeyCode::Up => self.focus_prev(),
            _ => {
                if let Some(field) = self.fields.get_mut(self.focus) {
                    if matches!(field.kind, FieldKind::Choice(_)) {
                        match key.code {
                            KeyCode::Left => field.cycle(false),
                            KeyCode::Right | KeyCode::Char(' ') => field.cycle(true),
                            _ => {}
                        }
                        self.sync_client_name_label();
                    } else {
                        edit_single_line(&mut field.value, &mut field.cursor, key);
                    }
                }
            }
        }
        FormAction::None
    }

    fn focus_next(&mut self) {
        if !self.fields.is_empty() {
            self.focus = (self.focus + 1) % self.fields.len();
        }
    }

    fn focus_prev(&mut self) {
        if !self.fields.is_empty() {
            self.focus = (self.focus + self.fields.len() - 1) % self.fields.len();
        }
    }

    /// Client forms label the name field by the selected kind.
    fn sync_client_name_label(&mut self) {
        let Ok(kind) = self.value("kind").parse::<ClientKind>() else {
            return;
        };
        if let Some(name) = self.fields.iter_mut().find(|f| f.key == "name") {
            name.label = kind.name_label();
        }
    }

    /// Current value of a field, empty when the form has no such field.
    pub fn value(&self, key: &str) -> &str {
        self.fields
            .iter()
            .find(|f| f.key == key)
            .map_or("", |f| f.value.as_str())
    }

    /// Show field errors and move focus to the first failing field.
    pub fn set_errors(&mut self, errors: FormErrors) {
        if let Some(first) = errors.iter().next() {
            if let Some(idx) = self.fields.iter().position(|f| f.key == first.field) {
                self.focus = idx;
            }
        }
        self.errors = errors;
    }

    // Builders and extractors for each domain form.

    pub fn login() -> Self {
        Self::new(
            "Вход в систему",
            vec![
                Field::text("email", "Email", ""),
                Field::secret("password", "Пароль"),
            ],
        )
    }

    pub fn to_login(&self) -> LoginForm {
        LoginForm {
            email: self.value("email").to_string(),
            password: self.value("password").to_string(),
        }
    }

    pub fn client(title: &str, form: &ClientForm) -> Self {
        let kinds = ClientKind::ALL.iter().map(|k| (k.as_str(), k.label())).collect();
        Self::new(
            title,
            vec![
                Field::choice("kind", "Тип", form.kind.as_str(), kinds),
                Field::text("name", form.kind.name_label(), &form.name),
                Field::text("contact_person", "Контактное лицо", &form.contact_person),
                Field::text("email", "Email", &form.email),
                Field::text("phone", "Телефон", &form.phone),
                Field::text("address", "Адрес", &form.address),
                Field::text("inn", "ИНН", &form.inn),
                Field::text("kpp", "КПП", &form.kpp),
                Field::text("website", "Сайт", &form.website),
                Field::text("notes", "Заметки", &form.notes),
            ],
        )
    }

    pub fn to_client(&self) -> ClientForm {
        ClientForm {
            kind: self.value("kind").parse().unwrap_or_default(),
            name: self.value("name").to_string(),
            contact_person: self.value("contact_person").to_string(),
            email: self.value("email").to_string(),
            phone: self.value("phone").to_string(),
            address: self.value("address").to_string(),
            inn: self.value("inn").to_string(),
            kpp: self.value("kpp").to_string(),
            website: self.value("website").to_string(),
            notes: self.value("notes").to_string(),
        }
    }

    pub fn project(title: &str, form: &ProjectForm) -> Self {
        let kinds = ProjectKind::ALL.iter().map(|k| (k.as_str(), k.label())).collect();
        let statuses = ProjectStatus::ALL
            .iter()
            .map(|s| (s.as_str(), s.label()))
            .collect();
        let priorities = Priority::ALL.iter().map(|p| (p.as_str(), p.label())).collect();
        Self::new(
            title,
            vec![
                Field::text("name", "Название", &form.name),
                Field::text("description", "Описание", &form.description),
                Field::text("client_name", "Клиент", &form.client_name),
                Field::text("client_contact", "Контакт клиента", &form.client_contact),
                Field::text("location", "Адрес", &form.location),
                Field::choice("kind", "Тип", form.kind.as_str(), kinds),
                Field::choice("status", "Статус", form.status.as_str(), statuses),
                Field::choice("priority", "Приоритет", form.priority.as_str(), priorities),
                Field::text("start_date", "Дата начала", &form.start_date),
                Field::text("end_date", "Дата окончания", &form.end_date),
                Field::text("budget", "Бюджет", &form.budget),
                Field::text("progress", "Прогресс, %", &form.progress),
            ],
        )
    }

    pub fn to_project(&self) -> ProjectForm {
        ProjectForm {
            name: self.value("name").to_string(),
            description: self.value("description").to_string(),
            client_name: self.value("client_name").to_string(),
            client_contact: self.value("client_contact").to_string(),
            location: self.value("location").to_string(),
            kind: self.value("kind").parse().unwrap_or_default(),
            status: self.value("status").parse().unwrap_or_default(),
            priority: self.value("priority").parse().unwrap_or_default(),
            start_date: self.value("start_date").to_string(),
            end_date: self.value("end_date").to_string(),
            budget: self.value("budget").to_string(),
            progress: self.value("progress").to_string(),
        }
    }

    pub fn profile(form: &ProfileForm) -> Self {
        Self::new(
            "Редактирование профиля",
            vec![
                Field::text("name", "Имя", &form.name),
                Field::text("email", "Email", &form.email),
                Field::text("phone", "Телефон", &form.phone),
                Field::text("department", "Отдел", &form.department),
                Field::text("skills", "Навыки", &form.skills),
            ],
        )
    }

    pub fn to_profile(&self) -> ProfileForm {
        ProfileForm {
            name: self.value("name").to_string(),
            email: self.value("email").to_string(),
            phone: self.value("phone").to_string(),
            department: self.value("department").to_string(),
            skills: self.value("skills").to_string(),
        }
    }

    pub fn password() -> Self {
        Self::new(
            "Смена пароля",
            vec![
                Field::secret("current", "Текущий пароль"),
                Field::secret("new", "Новый пароль"),
                Field::secret("confirm", "Подтверждение"),
            ],
        )
    }

    pub fn to_password(&self) -> PasswordChangeForm {
        PasswordChangeForm {
            current: self.value("current").to_string(),
            new: self.value("new").to_string(),
            confirm: self.value("confirm").to_string(),
        }
    }
}

pub fn edit_single_line(text: &mut String, cursor: &mut usize, key: KeyEvent) {
    match key.code {
        KeyCode::Left => *cursor = cursor.saturating_sub(1),
        KeyCode::Right => *cursor = (*cursor + 1).min(char_len(text)),
        KeyCode::Home => *cursor = 0,
        KeyCode::End => *cursor = char_len(text),
        KeyCode::Backspace => {
            if *cursor > 0 {
                let remove_idx = *cursor - 1;
                remove_char_at(text, remove_idx);
                *cursor = remove_idx;
            }
        }
        KeyCode::Delete => remove_char_at(text, *cursor),
        KeyCode::Char(c) => {
            insert_char_at(text, *cursor, c);
            *cursor += 1;
        }
        _ => {}
    }
}

fn char_len(value: &str) -> usize {
    value.chars().count()
}

fn byte_index_at_char(value: &str, char_idx: usize) -> usize {
    value
        .char_indices()
        .nth(char_idx)
        .map_or(value.len(), |(idx, _)| idx)
}

fn insert_char_at(value: &mut String, char_idx: usize, ch: char) {
    let idx = byte_index_at_char(value, char_idx);
    value.insert(idx, ch);
}

fn remove_char_at(value: &mut String, char_idx: usize) {
    if char_idx >= char_len(value) {
        return;
    }
    let start = byte_index_at_char(value, char_idx);
    let end = byte_index_at_char(value, char_idx + 1);
    value.replace_range(start..end, "");
}

pub fn with_cursor(value: &str, char_idx: usize) -> String {
    let mut out = String::new();
    let mut inserted = false;
    for (idx, ch) in value.chars().enumerate() {
        if idx == char_idx {
            out.push('█');
            inserted = true;
        }
        out.push(ch);
    }
    if !inserted {
        out.push('█');
    }
    out
}
