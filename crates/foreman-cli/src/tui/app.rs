//! TUI application state and key handling.
//!
//! Everything here is terminal-free so it can be driven from tests; drawing
//! lives in `draw.rs`.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use foreman_core::Workspace;
use foreman_core::access::Module;
use foreman_core::model::ProjectStatus;
use foreman_core::notify::Toast;
use foreman_core::page::SubmitError;
use foreman_core::validate::{ClientForm, ProjectForm};
use tracing::debug;

use super::form::{FormAction, FormState, edit_single_line};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Dashboard,
    Clients,
    Projects,
    Profile,
}

impl Tab {
    pub const ALL: [Self; 4] = [Self::Dashboard, Self::Clients, Self::Projects, Self::Profile];

    pub const fn module(self) -> Module {
        match self {
            Self::Dashboard => Module::Dashboard,
            Self::Clients => Module::Clients,
            Self::Projects => Module::Projects,
            Self::Profile => Module::Profile,
        }
    }

    pub const fn title(self) -> &'static str {
        self.module().label()
    }
}

/// What an open form will do on submit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormPurpose {
    Login,
    Client,
    Project,
    Profile,
    Password,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Overlay {
    #[default]
    None,
    Form(FormState, FormPurpose),
    /// Delete confirmation naming the record.
    ConfirmDelete { name: String },
    /// Read-only record card.
    View { title: String, lines: Vec<String> },
    /// Live search over the current tab's list.
    Search { cursor: usize },
    Help,
}

pub struct App {
    pub ws: Workspace,
    pub tab: Tab,
    pub overlay: Overlay,
    pub client_sel: usize,
    pub project_sel: usize,
    /// Last toast raised by a page action.
    pub toast: Option<Toast>,
    pub should_quit: bool,
}

impl App {
    pub fn new(ws: Workspace) -> Self {
        Self {
            ws,
            tab: Tab::Dashboard,
            overlay: Overlay::Form(FormState::login(), FormPurpose::Login),
            client_sel: 0,
            project_sel: 0,
            toast: None,
            should_quit: false,
        }
    }

    pub fn signed_in(&self) -> bool {
        self.ws.auth.current_user().is_some()
    }

    /// Tabs the signed-in user may open.
    pub fn tabs(&self) -> Vec<Tab> {
        Tab::ALL
            .into_iter()
            .filter(|t| self.ws.can_open(t.module()))
            .collect()
    }

    fn collect_toasts(&mut self) {
        if let Some(last) = self.ws.toasts.drain().pop() {
            self.toast = Some(last);
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        match std::mem::take(&mut self.overlay) {
            Overlay::None => self.handle_main_key(key),
            Overlay::Form(mut form, purpose) => match form.handle_key(key) {
                FormAction::None => self.overlay = Overlay::Form(form, purpose),
                FormAction::Cancel => self.cancel_form(form, purpose),
                FormAction::Submit => self.submit_form(form, purpose),
            },
            Overlay::ConfirmDelete { name } => match key.code {
                KeyCode::Char('y' | 'Y') | KeyCode::Enter => self.confirm_delete(),
                KeyCode::Char('n' | 'N') | KeyCode::Esc => self.close_page_dialog(),
                _ => self.overlay = Overlay::ConfirmDelete { name },
            },
            Overlay::View { title, lines } => match key.code {
                KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') => self.close_page_dialog(),
                _ => self.overlay = Overlay::View { title, lines },
            },
            Overlay::Search { mut cursor } => match key.code {
                KeyCode::Esc => {
                    self.set_search(String::new());
                }
                KeyCode::Enter => {}
                _ => {
                    let mut query = self.search_text();
                    edit_single_line(&mut query, &mut cursor, key);
                    self.set_search(query);
                    self.overlay = Overlay::Search { cursor };
                }
            },
            Overlay::Help => {}
        }
        self.collect_toasts();
    }

    fn handle_main_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('?') => self.overlay = Overlay::Help,
            KeyCode::Tab | KeyCode::Right => self.cycle_tab(true),
            KeyCode::BackTab | KeyCode::Left => self.cycle_tab(false),
            KeyCode::Char(c @ '1'..='4') => {
                let idx = c as usize - '1' as usize;
                if let Some(tab) = Tab::ALL.get(idx).copied()
                    && self.tabs().contains(&tab)
                {
                    self.tab = tab;
                }
            }
            KeyCode::Down | KeyCode::Char('j') => self.move_selection(1),
            KeyCode::Up | KeyCode::Char('k') => self.move_selection(-1),
            _ => match self.tab {
                Tab::Dashboard => {}
                Tab::Clients => self.handle_clients_key(key),
                Tab::Projects => self.handle_projects_key(key),
                Tab::Profile => self.handle_profile_key(key),
            },
        }
    }

    fn cycle_tab(&mut self, forward: bool) {
        let tabs = self.tabs();
        if tabs.is_empty() {
            return;
        }
        let idx = tabs.iter().position(|t| *t == self.tab).unwrap_or(0);
        let next = if forward {
            (idx + 1) % tabs.len()
        } else {
            (idx + tabs.len() - 1) % tabs.len()
        };
        self.tab = tabs[next];
    }

    fn list_len(&self) -> usize {
        match self.tab {
            Tab::Clients => self.ws.clients.visible().len(),
            Tab::Projects => self.ws.projects.visible().len(),
            Tab::Dashboard | Tab::Profile => 0,
        }
    }

    fn move_selection(&mut self, delta: isize) {
        let len = self.list_len();
        let sel = match self.tab {
            Tab::Clients => &mut self.client_sel,
            Tab::Projects => &mut self.project_sel,
            Tab::Dashboard | Tab::Profile => return,
        };
        if len == 0 {
            *sel = 0;
            return;
        }
        *sel = sel.saturating_add_signed(delta).min(len - 1);
    }

    fn clamp_selection(&mut self) {
        let clients = self.ws.clients.visible().len();
        let projects = self.ws.projects.visible().len();
        self.client_sel = self.client_sel.min(clients.saturating_sub(1));
        self.project_sel = self.project_sel.min(projects.saturating_sub(1));
    }

    pub fn selected_client_id(&self) -> Option<String> {
        self.ws
            .clients
            .visible()
            .get(self.client_sel)
            .map(|c| c.id.clone())
    }

    pub fn selected_project_id(&self) -> Option<String> {
        self.ws
            .projects
            .visible()
            .get(self.project_sel)
            .map(|p| p.id.clone())
    }

    fn search_text(&self) -> String {
        match self.tab {
            Tab::Clients => self.ws.clients.filter.search.clone(),
            Tab::Projects => self.ws.projects.filter.search.clone(),
            Tab::Dashboard | Tab::Profile => String::new(),
        }
    }

    fn set_search(&mut self, query: String) {
        match self.tab {
            Tab::Clients => self.ws.clients.filter.search = query,
            Tab::Projects => self.ws.projects.filter.search = query,
            Tab::Dashboard | Tab::Profile => {}
        }
        self.clamp_selection();
    }

    fn handle_clients_key(&mut self, key: KeyEvent) {
        let selected = self.selected_client_id();
        let page = self.ws.clients.crud_mut();
        let opened = match (key.code, selected) {
            (KeyCode::Char('n'), _) => page.open_create().map(|()| {
                Overlay::Form(
                    FormState::client("Новый клиент", &ClientForm::default()),
                    FormPurpose::Client,
                )
            }),
            (KeyCode::Char('e'), Some(id)) => page.open_edit(&id).map(|client| {
                Overlay::Form(
                    FormState::client("Редактирование клиента", &ClientForm::from_fields(&client.fields())),
                    FormPurpose::Client,
                )
            }),
            (KeyCode::Enter | KeyCode::Char('v'), Some(id)) => {
                page.open_view(&id).map(|client| Overlay::View {
                    title: client.name.clone(),
                    lines: client_card(&client, &self.ws.locale),
                })
            }
            (KeyCode::Char('d'), Some(id)) => page.open_delete(&id).map(|()| {
                let name = self.ws.clients.get(&id).map_or(id, |c| c.name.clone());
                Overlay::ConfirmDelete { name }
            }),
            (KeyCode::Char('/'), _) => Ok(Overlay::Search {
                cursor: self.ws.clients.filter.search.chars().count(),
            }),
            _ => return,
        };
        self.open_overlay(opened);
    }

    fn handle_projects_key(&mut self, key: KeyEvent) {
        let selected = self.selected_project_id();
        let page = self.ws.projects.crud_mut();
        let opened = match (key.code, selected) {
            (KeyCode::Char('n'), _) => page.open_create().map(|()| {
                Overlay::Form(
                    FormState::project("Новый проект", &ProjectForm::default()),
                    FormPurpose::Project,
                )
            }),
            (KeyCode::Char('e'), Some(id)) => page.open_edit(&id).map(|project| {
                Overlay::Form(
                    FormState::project("Редактирование проекта", &ProjectForm::from_fields(&project.fields())),
                    FormPurpose::Project,
                )
            }),
            (KeyCode::Enter | KeyCode::Char('v'), Some(id)) => {
                page.open_view(&id).map(|project| Overlay::View {
                    title: project.name.clone(),
                    lines: project_card(&project, &self.ws.locale),
                })
            }
            (KeyCode::Char('d'), Some(id)) => page.open_delete(&id).map(|()| {
                let name = self.ws.projects.get(&id).map_or(id, |p| p.name.clone());
                Overlay::ConfirmDelete { name }
            }),
            (KeyCode::Char('a'), Some(id)) => {
                // Rejections are reported through the toast.
                if let Err(err) = self.ws.projects.advance_status(&id, None, &mut self.ws.toasts) {
                    debug!(%err, "advance refused");
                }
                self.clamp_selection();
                return;
            }
            (KeyCode::Char('f'), _) => {
                self.ws.projects.filter.status = next_status_filter(self.ws.projects.filter.status);
                self.clamp_selection();
                return;
            }
            (KeyCode::Char('/'), _) => Ok(Overlay::Search {
                cursor: self.ws.projects.filter.search.chars().count(),
            }),
            _ => return,
        };
        self.open_overlay(opened);
    }

    fn handle_profile_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('e') => match self.ws.profile.start_edit(&self.ws.auth) {
                Ok(form) => {
                    self.overlay = Overlay::Form(FormState::profile(&form), FormPurpose::Profile);
                }
                Err(err) => self.ws.toasts.error(err.to_string()),
            },
            KeyCode::Char('p') => {
                self.overlay = Overlay::Form(FormState::password(), FormPurpose::Password);
            }
            KeyCode::Char('L') => {
                self.ws.auth.logout(&mut self.ws.toasts);
                self.tab = Tab::Dashboard;
                self.overlay = Overlay::Form(FormState::login(), FormPurpose::Login);
            }
            _ => {}
        }
    }

    fn open_overlay(&mut self, opened: Result<Overlay, foreman_core::ForemanError>) {
        match opened {
            Ok(overlay) => self.overlay = overlay,
            Err(err) => self.ws.toasts.error(err.to_string()),
        }
    }

    /// Close whatever dialog the current page holds.
    fn close_page_dialog(&mut self) {
        match self.tab {
            Tab::Clients => self.ws.clients.crud_mut().close(),
            Tab::Projects => self.ws.projects.crud_mut().close(),
            Tab::Profile => self.ws.profile.cancel_edit(),
            Tab::Dashboard => {}
        }
        self.overlay = Overlay::None;
    }

    fn cancel_form(&mut self, form: FormState, purpose: FormPurpose) {
        if purpose == FormPurpose::Login {
            // The sign-in screen cannot be dismissed.
            self.overlay = Overlay::Form(form, purpose);
            return;
        }
        self.close_page_dialog();
    }

    fn submit_form(&mut self, mut form: FormState, purpose: FormPurpose) {
        let ws = &mut self.ws;
        let result: Result<(), SubmitError> = match purpose {
            FormPurpose::Login => ws.auth.login(&form.to_login(), &mut ws.toasts).map(drop),
            FormPurpose::Client => ws
                .clients
                .crud_mut()
                .submit(&form.to_client(), &mut ws.toasts)
                .map(drop),
            FormPurpose::Project => ws
                .projects
                .crud_mut()
                .submit(&form.to_project(), &mut ws.toasts)
                .map(drop),
            FormPurpose::Profile => ws
                .profile
                .save(&mut ws.auth, &form.to_profile(), &mut ws.toasts)
                .map(drop),
            FormPurpose::Password => {
                ws.profile
                    .change_password(&mut ws.auth, &form.to_password(), &mut ws.toasts)
            }
        };

        match result {
            Ok(()) => {
                if purpose == FormPurpose::Login {
                    self.tab = Tab::Dashboard;
                }
                self.overlay = Overlay::None;
                self.clamp_selection();
            }
            Err(SubmitError::Invalid(errors)) => {
                form.set_errors(errors);
                self.overlay = Overlay::Form(form, purpose);
            }
            Err(SubmitError::Failed(err)) => {
                debug!(%err, ?purpose, "submit failed");
                if purpose == FormPurpose::Login {
                    // Wrong credentials: keep the screen, the toast explains.
                    self.overlay = Overlay::Form(form, purpose);
                } else {
                    if self.ws.toasts.is_empty() {
                        self.ws.toasts.error(err.to_string());
                    }
                    self.close_page_dialog();
                }
            }
        }
    }

    fn confirm_delete(&mut self) {
        let ws = &mut self.ws;
        let result = match self.tab {
            Tab::Clients => ws.clients.crud_mut().confirm_delete(&mut ws.toasts).map(drop),
            Tab::Projects => ws.projects.crud_mut().confirm_delete(&mut ws.toasts).map(drop),
            Tab::Dashboard | Tab::Profile => Ok(()),
        };
        if let Err(err) = result {
            debug!(%err, "delete failed");
        }
        self.overlay = Overlay::None;
        self.clamp_selection();
    }
}

/// `None` → each status in lifecycle order → `None`.
fn next_status_filter(current: Option<ProjectStatus>) -> Option<ProjectStatus> {
    match current {
        None => ProjectStatus::ALL.first().copied(),
        Some(status) => {
            let idx = ProjectStatus::ALL.iter().position(|s| *s == status)?;
            ProjectStatus::ALL.get(idx + 1).copied()
        }
    }
}

fn client_card(client: &foreman_core::model::Client, locale: &foreman_core::view::Locale) -> Vec<String> {
    let mut lines = vec![
        format!("Тип: {}", client.kind.label()),
        format!("Email: {}", client.email),
        format!("Телефон: {}", client.phone),
        format!("Адрес: {}", client.address),
    ];
    for (label, value) in [
        ("Контактное лицо", &client.contact_person),
        ("ИНН", &client.inn),
        ("КПП", &client.kpp),
        ("Сайт", &client.website),
        ("Заметки", &client.notes),
    ] {
        if let Some(value) = value {
            lines.push(format!("{label}: {value}"));
        }
    }
    lines.push(format!("Проектов: {}", client.projects.len()));
    lines.push(format!("Завершено: {}", client.completed_projects));
    lines.push(format!("Общий бюджет: {}", locale.currency(client.total_budget)));
    lines.push(format!("Статус: {}", client.activity_label()));
    lines
}

fn project_card(project: &foreman_core::model::Project, locale: &foreman_core::view::Locale) -> Vec<String> {
    let mut lines = Vec::new();
    if let Some(description) = &project.description {
        lines.push(description.clone());
    }
    lines.push(format!("Клиент: {}", project.client_name));
    lines.push(format!("Адрес: {}", project.location));
    lines.push(format!("Тип: {}", project.kind.label()));
    lines.push(format!("Статус: {}", project.status.label()));
    lines.push(format!("Приоритет: {}", project.priority.label()));
    let period = project.end_date.map_or_else(
        || locale.date(project.start_date),
        |end| format!("{} – {}", locale.date(project.start_date), locale.date(end)),
    );
    lines.push(format!("Сроки: {period}"));
    lines.push(format!("Бюджет: {}", locale.currency(project.budget)));
    lines.push(format!("Потрачено: {}", locale.currency(project.spent_amount)));
    lines.push(format!("Прогресс: {}%", project.progress));
    lines
}
