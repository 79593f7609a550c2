//! `fm access` — which sections each role may open.


use clap::Args;
use foreman_core::access::{Module, role_modules};
use foreman_core::model::UserRole;
use serde::Serialize;

use crate::output::{OutputMode, pretty_kv, pretty_section, render_mode};

#[derive(Args, Debug)]
pub struct AccessArgs {
    /// Show a single role, e.g. `manager` or `safety_officer`.
    pub role: Option<UserRole>,
}

#[derive(Debug, Serialize)]
pub struct RoleAccess {
    pub role: UserRole,
    pub label: &'static str,
    pub modules: &'static [Module],
}

fn table(role: Option<UserRole>) -> Vec<RoleAccess> {
    let roles = role.map_or_else(|| UserRole::ALL.to_vec(), |r| vec![r]);
    roles
        .into_iter()
        .map(|role| RoleAccess {
            role,
            label: role.label(),
            modules: role_modules(role),
        })
        .collect()
}

pub fn run_access(args: &AccessArgs, output: OutputMode) -> anyhow::Result<()> {
    let entries = table(args.role);
    render_mode(
        output,
        &entries,
        |entries, w| {
            for e in entries {
                let tags: Vec<&str> = e.modules.iter().map(|m| m.as_str()).collect();
                writeln!(w, "{}\t{}", e.role, tags.join(","))?;
            }
            Ok(())
        },
        |entries, w| {
            pretty_section(w, "Доступ по ролям")?;
            for e in entries {
                let labels: Vec<&str> = e.modules.iter().map(|m| m.label()).collect();
                pretty_kv(w, e.label, labels.join(", "))?;
            }
            Ok(())
        },
    )
}
