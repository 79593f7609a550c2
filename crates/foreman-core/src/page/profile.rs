use serde::Serialize;
use tracing::{info, warn};

use super::SubmitError;
use super::auth::AuthPage;
use crate::access::{Module, role_modules};
use crate::error::ForemanError;
use crate::model::{User, UserRole};
use crate::notify::Toasts;
use crate::validate::{FormErrors, PasswordChangeForm, ProfileForm};
use crate::view::Locale;

/// Read-only profile card for the signed-in user.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileView {
    pub id: String,
    pub name: String,
    pub initials: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub role: UserRole,
    pub role_label: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub salary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hire_date: Option<String>,
    pub skills: Vec<String>,
    pub modules: Vec<Module>,
}

impl ProfileView {
    #[must_use]
    pub fn new(user: &User, locale: &Locale) -> Self {
        Self {
            id: user.id.clone(),
            name: user.name.clone(),
            initials: user.initials(),
            email: user.email.clone(),
            phone: user.phone.clone(),
            role: user.role,
            role_label: user.role.label(),
            department: user.department.clone(),
            salary: user.salary.map(|s| locale.currency(s)),
            hire_date: user.hire_date.map(|d| locale.date(d)),
            skills: user.skills.clone(),
            modules: role_modules(user.role).to_vec(),
        }
    }
}

/// Profile editing for the signed-in user.
#[derive(Debug, Default)]
pub struct ProfilePage {
    editing: bool,
}

impl ProfilePage {
    #[must_use]
    pub const fn is_editing(&self) -> bool {
        self.editing
    }

    /// Enter edit mode, returning the form pre-filled from the current user.
    pub fn start_edit(&mut self, auth: &AuthPage) -> Result<ProfileForm, ForemanError> {
        let user = auth.require_user()?;
        self.editing = true;
        Ok(ProfileForm::from_fields(&user.profile_fields()))
    }

    pub fn cancel_edit(&mut self) {
        self.editing = false;
    }

    pub fn save(
        &mut self,
        auth: &mut AuthPage,
        form: &ProfileForm,
        toasts: &mut Toasts,
    ) -> Result<User, SubmitError> {
        let fields = form.validate().map_err(SubmitError::Invalid)?;
        let user_id = auth.require_user()?.id.clone();
        if auth.email_taken(&fields.email, &user_id) {
            warn!(user = %user_id, "profile email already in use");
            let mut errors = FormErrors::new();
            errors.push("email", "Email уже используется");
            return Err(SubmitError::Invalid(errors));
        }
        let now = auth.now();
        let user = auth.current_user_mut()?;
        let email_changed = user.email != fields.email.trim();
        user.apply_profile(fields);
        user.updated_at = now.max(user.created_at);
        let saved = user.clone();

        // Sign-in uses the same address as the profile.
        if email_changed {
            if let Some(credential) = auth.credential_mut(&saved.id) {
                credential.email.clone_from(&saved.email);
            }
        }

        self.editing = false;
        info!(user = %saved.id, "profile updated");
        toasts.success("Профиль обновлен");
        Ok(saved)
    }

    /// Change the signed-in user's password.
    ///
    /// A wrong current password is reported on the `current` field.
    pub fn change_password(
        &mut self,
        auth: &mut AuthPage,
        form: &PasswordChangeForm,
        toasts: &mut Toasts,
    ) -> Result<(), SubmitError> {
        form.validate().map_err(SubmitError::Invalid)?;
        let user_id = auth.require_user()?.id.clone();

        let Some(credential) = auth.credential_mut(&user_id) else {
            warn!(user = %user_id, "no credential on file");
            toasts.error("Ошибка при смене пароля");
            return Err(ForemanError::NotAuthenticated.into());
        };
        if credential.password != form.current {
            let mut errors = FormErrors::new();
            errors.push("current", "Неверный текущий пароль");
            return Err(SubmitError::Invalid(errors));
        }

        credential.password.clone_from(&form.new);
        info!(user = %user_id, "password changed");
        toasts.success("Пароль успешно изменен");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::SystemClock;
    use crate::seed::{DemoSeed, SeedProvider};
    use crate::validate::LoginForm;
    use chrono::Utc;
    use std::sync::Arc;

    fn signed_in() -> (AuthPage, Toasts) {
        let data = DemoSeed.load(Utc::now());
        let mut auth = AuthPage::new(data.users, data.credentials, Arc::new(SystemClock));
        let mut toasts = Toasts::new();
        auth.login(
            &LoginForm {
                email: "admin@construction-crm.ru".into(),
                password: "admin123".into(),
            },
            &mut toasts,
        )
        .unwrap();
        toasts.drain();
        (auth, toasts)
    }

    #[test]
    fn profile_view_formats_hr_fields() {
        let (auth, _) = signed_in();
        let view = ProfileView::new(auth.current_user().unwrap(), &Locale::default());
        assert_eq!(view.role_label, "Администратор");
        assert_eq!(view.salary.as_deref(), Some("80\u{a0}000\u{a0}₽"));
        assert_eq!(view.hire_date.as_deref(), Some("01.01.2020"));
        assert_eq!(view.modules.len(), Module::ALL.len());
    }

    #[test]
    fn save_updates_user_and_sign_in_email() {
        let (mut auth, mut toasts) = signed_in();
        let mut page = ProfilePage::default();
        let mut form = page.start_edit(&auth).unwrap();
        form.email = "chief@construction-crm.ru".into();
        form.skills = "Сметы".into();

        let saved = page.save(&mut auth, &form, &mut toasts).unwrap();
        assert_eq!(saved.skills, vec!["Сметы".to_string()]);
        assert!(!page.is_editing());

        auth.logout(&mut toasts);
        let relogin = auth.login(
            &LoginForm {
                email: "chief@construction-crm.ru".into(),
                password: "admin123".into(),
            },
            &mut toasts,
        );
        assert!(relogin.is_ok());
    }

    #[test]
    fn save_rejects_email_of_another_account() {
        let (mut auth, mut toasts) = signed_in();
        let mut page = ProfilePage::default();
        let mut form = page.start_edit(&auth).unwrap();
        form.email = " Manager@Construction-CRM.ru ".into();

        let err = page.save(&mut auth, &form, &mut toasts).unwrap_err();
        assert_eq!(
            err.field_errors().and_then(|e| e.get("email")),
            Some("Email уже используется")
        );
        assert!(page.is_editing());
        assert_eq!(auth.current_user().unwrap().email, "admin@construction-crm.ru");

        // Both accounts still sign in with their own addresses.
        auth.logout(&mut toasts);
        let manager = auth
            .login(
                &LoginForm {
                    email: "manager@construction-crm.ru".into(),
                    password: "manager123".into(),
                },
                &mut toasts,
            )
            .unwrap();
        assert_eq!(manager.email, "manager@construction-crm.ru");
    }

    #[test]
    fn save_keeps_own_email_in_any_case() {
        let (mut auth, mut toasts) = signed_in();
        let mut page = ProfilePage::default();
        let mut form = page.start_edit(&auth).unwrap();
        form.email = "ADMIN@construction-crm.ru".into();
        assert!(page.save(&mut auth, &form, &mut toasts).is_ok());
    }

    #[test]
    fn change_password_checks_current() {
        let (mut auth, mut toasts) = signed_in();
        let mut page = ProfilePage::default();
        let wrong = PasswordChangeForm {
            current: "nope-nope".into(),
            new: "secret42".into(),
            confirm: "secret42".into(),
        };
        let err = page.change_password(&mut auth, &wrong, &mut toasts).unwrap_err();
        assert_eq!(
            err.field_errors().and_then(|e| e.get("current")),
            Some("Неверный текущий пароль")
        );

        let right = PasswordChangeForm {
            current: "admin123".into(),
            ..wrong
        };
        page.change_password(&mut auth, &right, &mut toasts).unwrap();
        assert_eq!(toasts.last().unwrap().message, "Пароль успешно изменен");
    }

    #[test]
    fn profile_requires_session() {
        let data = DemoSeed.load(Utc::now());
        let auth = AuthPage::new(data.users, data.credentials, Arc::new(SystemClock));
        let mut page = ProfilePage::default();
        assert!(matches!(
            page.start_edit(&auth),
            Err(ForemanError::NotAuthenticated)
        ));
    }
}
