use std::sync::Arc;

use chrono::{TimeZone, Utc};
use foreman_core::clock::{Clock, ManualClock};
use foreman_core::config::ProjectConfig;
use foreman_core::dialog::Dialog;
use foreman_core::model::ClientKind;
use foreman_core::notify::ToastLevel;
use foreman_core::seed::{DemoSeed, EmptySeed};
use foreman_core::validate::ClientForm;
use foreman_core::{ForemanError, Workspace};

fn acme_form() -> ClientForm {
    ClientForm {
        kind: "company".parse::<ClientKind>().unwrap(),
        name: "Acme LLC".into(),
        email: "a@acme.com".into(),
        phone: "+1-000".into(),
        address: "1 Main St".into(),
        ..ClientForm::default()
    }
}

#[test]
fn create_acme_company() {
    let clock = ManualClock::at(Utc.with_ymd_and_hms(2024, 9, 2, 10, 30, 0).single().unwrap());
    let mut ws = Workspace::new(&EmptySeed, Arc::new(clock.clone()), &ProjectConfig::default());

    ws.clients.crud_mut().open_create().unwrap();
    let client = ws
        .clients
        .crud_mut()
        .submit(&acme_form(), &mut ws.toasts)
        .unwrap();

    assert_eq!(client.name, "Acme LLC");
    assert_eq!(client.kind, ClientKind::Company);
    assert!(client.is_active);
    assert!(client.projects.is_empty());
    assert_eq!(client.total_budget, 0.0);
    assert_eq!(client.completed_projects, 0);
    assert_eq!(client.id, format!("client_{}", clock.now().timestamp_millis()));
    assert_eq!(client.created_at, client.updated_at);

    let toasts = ws.toasts.drain();
    assert_eq!(toasts.len(), 1);
    assert_eq!(toasts[0].level, ToastLevel::Success);
    assert_eq!(toasts[0].message, "Клиент успешно добавлен");
}

#[test]
fn edit_replaces_whole_record_and_refreshes_timestamp() {
    let clock = ManualClock::at(Utc.with_ymd_and_hms(2024, 9, 2, 10, 30, 0).single().unwrap());
    let mut ws = Workspace::new(&DemoSeed, Arc::new(clock.clone()), &ProjectConfig::default());

    let before = ws.clients.crud_mut().open_edit("1").unwrap();
    let mut form = ClientForm::from_fields(&before.fields());
    form.website = String::new();
    form.notes = "Ключевой заказчик".into();

    clock.advance_millis(60_000);
    let after = ws.clients.crud_mut().submit(&form, &mut ws.toasts).unwrap();

    assert!(after.website.is_none());
    assert_eq!(after.notes.as_deref(), Some("Ключевой заказчик"));
    assert_eq!(after.total_budget, before.total_budget);
    assert_eq!(after.projects, before.projects);
    assert!(after.updated_at > before.updated_at);
    assert_eq!(*ws.clients.crud().dialog(), Dialog::Closed);
    assert_eq!(ws.clients.get("2").unwrap().updated_at, before.created_at);
}

#[test]
fn closing_discards_pending_edit() {
    let mut ws = Workspace::new(
        &DemoSeed,
        Arc::new(ManualClock::at(Utc::now())),
        &ProjectConfig::default(),
    );
    ws.clients.crud_mut().open_edit("1").unwrap();
    ws.clients.crud_mut().close();

    let err = ws
        .clients
        .crud_mut()
        .submit(&acme_form(), &mut ws.toasts)
        .unwrap_err();
    assert_eq!(
        ForemanError::from(err).error_code().code(),
        "E4002",
        "submit without an open form"
    );
    assert_eq!(ws.clients.get("1").unwrap().name, "ООО \"СтройИнвест\"");
}
