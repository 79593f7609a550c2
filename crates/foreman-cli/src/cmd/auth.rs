//! `fm login` and `fm profile`.
//!
//! Nothing is persisted between runs, so every invocation signs in afresh
//! against the seeded accounts.

use std::io::{self, Write};

use clap::Args;
use foreman_core::Workspace;
use foreman_core::page::{ProfileView, Session};
use foreman_core::validate::{LoginForm, PasswordChangeForm};
use foreman_core::view::format_datetime;
use serde::Serialize;

use super::submit_failed;
use crate::output::{
    OutputMode, fail, pretty_kv, pretty_rule, pretty_section, render_mode, render_toasts,
};

#[derive(Args, Debug, Clone)]
pub struct LoginArgs {
    #[arg(short, long)]
    pub email: String,

    #[arg(short, long)]
    pub password: String,
}

impl LoginArgs {
    fn form(&self) -> LoginForm {
        LoginForm {
            email: self.email.clone(),
            password: self.password.clone(),
        }
    }
}

#[derive(Args, Debug)]
pub struct ProfileArgs {
    #[command(flatten)]
    pub login: LoginArgs,

    /// New display name.
    #[arg(long)]
    pub name: Option<String>,

    /// New sign-in and contact email.
    #[arg(long)]
    pub new_email: Option<String>,

    #[arg(long)]
    pub phone: Option<String>,

    #[arg(long)]
    pub department: Option<String>,

    /// Comma-separated skills, replacing the current list.
    #[arg(long)]
    pub skills: Option<String>,

    /// Change the password (minimum 6 characters).
    #[arg(long)]
    pub new_password: Option<String>,
}

impl ProfileArgs {
    const fn edits_profile(&self) -> bool {
        self.name.is_some()
            || self.new_email.is_some()
            || self.phone.is_some()
            || self.department.is_some()
            || self.skills.is_some()
    }
}

/// The signed-in session and the user's profile card.
#[derive(Debug, Serialize)]
pub struct SessionView {
    pub session: Session,
    pub profile: ProfileView,
}

pub fn run_login(args: &LoginArgs, output: OutputMode, ws: &mut Workspace) -> anyhow::Result<()> {
    sign_in(args, output, ws)?;
    render_toasts(output, &ws.toasts.drain())?;
    render_session(output, ws)
}

pub fn run_profile(args: &ProfileArgs, output: OutputMode, ws: &mut Workspace) -> anyhow::Result<()> {
    sign_in(&args.login, output, ws)?;
    ws.toasts.drain();

    if args.edits_profile() {
        let mut form = ws
            .profile
            .start_edit(&ws.auth)
            .map_err(|e| fail(output, e))?;
        let pairs = [
            (&args.name, &mut form.name),
            (&args.new_email, &mut form.email),
            (&args.phone, &mut form.phone),
            (&args.department, &mut form.department),
            (&args.skills, &mut form.skills),
        ];
        for (given, slot) in pairs {
            if let Some(value) = given {
                slot.clone_from(value);
            }
        }
        let saved = ws.profile.save(&mut ws.auth, &form, &mut ws.toasts);
        render_toasts(output, &ws.toasts.drain())?;
        saved.map_err(|e| submit_failed(output, e))?;
    }

    if let Some(new_password) = &args.new_password {
        let form = PasswordChangeForm {
            current: args.login.password.clone(),
            new: new_password.clone(),
            confirm: new_password.clone(),
        };
        let changed = ws.profile.change_password(&mut ws.auth, &form, &mut ws.toasts);
        render_toasts(output, &ws.toasts.drain())?;
        changed.map_err(|e| submit_failed(output, e))?;
    }

    render_session(output, ws)
}

fn sign_in(args: &LoginArgs, output: OutputMode, ws: &mut Workspace) -> anyhow::Result<()> {
    let result = ws.auth.login(&args.form(), &mut ws.toasts);
    if result.is_err() {
        render_toasts(output, &ws.toasts.drain())?;
    }
    result.map_err(|e| submit_failed(output, e))?;
    Ok(())
}

fn render_session(output: OutputMode, ws: &Workspace) -> anyhow::Result<()> {
    let user = ws.auth.require_user().map_err(|e| fail(output, e))?;
    let session = ws.auth.session().cloned().ok_or_else(|| {
        fail(output, foreman_core::ForemanError::NotAuthenticated)
    })?;
    let view = SessionView {
        session,
        profile: ProfileView::new(user, &ws.locale),
    };
    render_mode(
        output,
        &view,
        |v, w| render_session_text(v, w),
        |v, w| render_session_human(v, w),
    )
}

fn render_session_human(view: &SessionView, w: &mut dyn Write) -> io::Result<()> {
    let p = &view.profile;
    pretty_section(w, &format!("{} ({})", p.name, p.initials))?;
    pretty_kv(w, "роль", p.role_label)?;
    pretty_kv(w, "email", &p.email)?;
    for (key, value) in [
        ("телефон", &p.phone),
        ("отдел", &p.department),
        ("зарплата", &p.salary),
        ("принят", &p.hire_date),
    ] {
        if let Some(value) = value {
            pretty_kv(w, key, value)?;
        }
    }
    if !p.skills.is_empty() {
        pretty_kv(w, "навыки", p.skills.join(", "))?;
    }
    pretty_rule(w)?;
    let modules: Vec<&str> = p.modules.iter().map(|m| m.label()).collect();
    pretty_kv(w, "доступ", modules.join(", "))?;
    pretty_kv(w, "вход", format_datetime(view.session.signed_in_at))
}

fn render_session_text(view: &SessionView, w: &mut dyn Write) -> io::Result<()> {
    let p = &view.profile;
    writeln!(w, "user\t{}\t{}\t{}", p.id, p.role, p.email)?;
    let modules: Vec<&str> = p.modules.iter().map(|m| m.as_str()).collect();
    writeln!(w, "modules\t{}", modules.join(","))
}
