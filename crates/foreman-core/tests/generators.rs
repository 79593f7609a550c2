#![allow(dead_code)]

use chrono::NaiveDate;
use foreman_core::model::{ClientFields, ClientKind, ProjectFields, ProjectKind, ProjectStatus};
use proptest::prelude::*;

pub fn arb_client_kind() -> impl Strategy<Value = ClientKind> {
    prop::sample::select(ClientKind::ALL.to_vec())
}

pub fn arb_status() -> impl Strategy<Value = ProjectStatus> {
    prop::sample::select(ProjectStatus::ALL.to_vec())
}

pub fn arb_project_kind() -> impl Strategy<Value = ProjectKind> {
    prop::sample::select(ProjectKind::ALL.to_vec())
}

pub fn arb_client_fields() -> impl Strategy<Value = ClientFields> {
    (
        "[A-Za-z][A-Za-z ]{0,20}",
        arb_client_kind(),
        "[a-z]{1,8}@[a-z]{1,8}\\.(ru|com|org)",
        "\\+7 [0-9]{3} [0-9]{7}",
        "[A-Za-z0-9 ,.]{1,30}",
    )
        .prop_map(|(name, kind, email, phone, address)| ClientFields {
            name,
            kind,
            email,
            phone,
            address,
            ..ClientFields::default()
        })
}

pub fn arb_project_fields() -> impl Strategy<Value = ProjectFields> {
    (
        "[A-Za-z][A-Za-z ]{0,20}",
        "(Acme|Globex|Initech)",
        arb_project_kind(),
        arb_status(),
        0u8..=100,
        0.0f64..1.0e9,
    )
        .prop_map(|(name, client_name, kind, status, progress, budget)| ProjectFields {
            name,
            client_name,
            location: "Site".into(),
            kind,
            status,
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default(),
            budget,
            progress,
            ..ProjectFields::default()
        })
}

/// One store mutation for sequence tests.
#[derive(Debug, Clone)]
pub enum Op {
    Create(ClientFields),
    Update(usize, ClientFields),
    UpdateMissing(ClientFields),
    Delete(usize),
    DeleteMissing,
}

pub fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => arb_client_fields().prop_map(Op::Create),
        2 => (any::<usize>(), arb_client_fields()).prop_map(|(i, f)| Op::Update(i, f)),
        1 => arb_client_fields().prop_map(Op::UpdateMissing),
        2 => any::<usize>().prop_map(Op::Delete),
        1 => Just(Op::DeleteMissing),
    ]
}
