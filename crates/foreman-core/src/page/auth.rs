use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use super::SubmitError;
use crate::clock::Clock;
use crate::error::ForemanError;
use crate::model::{Credential, User};
use crate::notify::Toasts;
use crate::validate::LoginForm;

pub const LOGIN_FAILED: &str = "Неверный email или пароль";
pub const WELCOME: &str = "Добро пожаловать в систему!";

/// The signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Session {
    pub user_id: String,
    pub signed_in_at: DateTime<Utc>,
}

/// Sign-in page and the account directory behind it.
pub struct AuthPage {
    users: Vec<User>,
    credentials: Vec<Credential>,
    session: Option<Session>,
    clock: Arc<dyn Clock>,
}

impl AuthPage {
    pub fn new(users: Vec<User>, credentials: Vec<Credential>, clock: Arc<dyn Clock>) -> Self {
        Self {
            users,
            credentials,
            session: None,
            clock,
        }
    }

    #[must_use]
    pub const fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    #[must_use]
    pub fn users(&self) -> &[User] {
        &self.users
    }

    #[must_use]
    pub fn current_user(&self) -> Option<&User> {
        let session = self.session.as_ref()?;
        self.users.iter().find(|u| u.id == session.user_id)
    }

    pub fn require_user(&self) -> Result<&User, ForemanError> {
        self.current_user().ok_or(ForemanError::NotAuthenticated)
    }

    pub(crate) fn current_user_mut(&mut self) -> Result<&mut User, ForemanError> {
        let id = &self.session.as_ref().ok_or(ForemanError::NotAuthenticated)?.user_id;
        self.users
            .iter_mut()
            .find(|u| &u.id == id)
            .ok_or(ForemanError::NotAuthenticated)
    }

    pub(crate) fn credential_mut(&mut self, user_id: &str) -> Option<&mut Credential> {
        self.credentials.iter_mut().find(|c| c.user_id == user_id)
    }

    /// Whether an account other than `user_id` already uses `email`.
    pub(crate) fn email_taken(&self, email: &str, user_id: &str) -> bool {
        let email = email.trim();
        let in_users = self
            .users
            .iter()
            .any(|u| u.id != user_id && u.email.eq_ignore_ascii_case(email));
        in_users
            || self
                .credentials
                .iter()
                .any(|c| c.user_id != user_id && c.email.eq_ignore_ascii_case(email))
    }

    pub(crate) fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Validate the form, then check it against the credential directory.
    pub fn login(&mut self, form: &LoginForm, toasts: &mut Toasts) -> Result<User, SubmitError> {
        form.validate().map_err(SubmitError::Invalid)?;

        let user_id = self
            .credentials
            .iter()
            .find(|c| c.matches(&form.email, &form.password))
            .map(|c| c.user_id.clone());

        let now = self.clock.now();
        let Some(user) = user_id.and_then(|id| self.users.iter_mut().find(|u| u.id == id)) else {
            warn!(email = %form.email.trim(), "sign-in rejected");
            toasts.error(LOGIN_FAILED);
            return Err(ForemanError::AuthenticationFailed.into());
        };

        user.last_login = Some(now);
        self.session = Some(Session {
            user_id: user.id.clone(),
            signed_in_at: now,
        });
        info!(user = %user.id, role = %user.role, "signed in");
        toasts.success(WELCOME);
        Ok(user.clone())
    }

    pub fn logout(&mut self, toasts: &mut Toasts) {
        if let Some(session) = self.session.take() {
            info!(user = %session.user_id, "signed out");
            toasts.info("Вы вышли из системы");
        }
    }
}
