//! Registration form draft and the repeatable participant list.
//!
//! This module holds the decisions; the element juggling lives in
//! `components` and `app`:
//! - multi-line paste is split into a [`PastePlan`],
//! - the list never shrinks below one entry ([`can_remove`]),
//! - the draft is a [`RegFormSnapshot`] stored as JSON under
//!   [`REG_FORM_KEY`], and turned back into rows with a [`RestorePlan`].

use crate::config::REG_FORM_KEY;
use crate::error::UiError;
use crate::storage::{load_json, save_json, KeyValueStore};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static LINE_BREAK_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\r?\n").unwrap());

/// Single-value fields captured in the draft, keyed by element id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    GivenName,
    Surname,
    ContractNumber,
    Login,
    Password,
}

impl FormField {
    pub const ALL: [FormField; 5] = [
        FormField::GivenName,
        FormField::Surname,
        FormField::ContractNumber,
        FormField::Login,
        FormField::Password,
    ];

    /// Element id, which is also the key in the stored JSON.
    pub fn id(self) -> &'static str {
        match self {
            FormField::GivenName => "imie",
            FormField::Surname => "nazwisko",
            FormField::ContractNumber => "numer_umowy",
            FormField::Login => "login",
            FormField::Password => "haslo",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegFormSnapshot {
    #[serde(rename = "imie", default, skip_serializing_if = "Option::is_none")]
    pub given_name: Option<String>,
    #[serde(rename = "nazwisko", default, skip_serializing_if = "Option::is_none")]
    pub surname: Option<String>,
    #[serde(rename = "numer_umowy", default, skip_serializing_if = "Option::is_none")]
    pub contract_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub login: Option<String>,
    #[serde(rename = "haslo", default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(rename = "uczestnik", default, skip_serializing_if = "Option::is_none")]
    pub participants: Option<Vec<String>>,
}

impl RegFormSnapshot {
    pub fn field(&self, field: FormField) -> Option<&str> {
        self.slot(field).as_deref()
    }

    pub fn set_field(&mut self, field: FormField, value: impl Into<String>) {
        *self.slot_mut(field) = Some(value.into());
    }

    fn slot(&self, field: FormField) -> &Option<String> {
        match field {
            FormField::GivenName => &self.given_name,
            FormField::Surname => &self.surname,
            FormField::ContractNumber => &self.contract_number,
            FormField::Login => &self.login,
            FormField::Password => &self.password,
        }
    }

    fn slot_mut(&mut self, field: FormField) -> &mut Option<String> {
        match field {
            FormField::GivenName => &mut self.given_name,
            FormField::Surname => &mut self.surname,
            FormField::ContractNumber => &mut self.contract_number,
            FormField::Login => &mut self.login,
            FormField::Password => &mut self.password,
        }
    }

    /// How to rebuild the participant rows. A draft without a participant
    /// list restores a single blank row.
    pub fn restore_plan(&self) -> RestorePlan {
        let saved = self.participants.as_deref().unwrap_or_default();
        let mut values = saved.iter().cloned();
        let first = values.next().unwrap_or_default();
        RestorePlan {
            first,
            extra: values.collect(),
        }
    }
}

/// Shape of the participant list after a restore: the first existing row
/// takes `first`, every other row is dropped, and one row is appended per
/// `extra` value in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestorePlan {
    pub first: String,
    pub extra: Vec<String>,
}

/// Result of splitting pasted clipboard text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PastePlan {
    /// Replaces the value of the input that received the paste.
    pub first: String,
    /// One new row per line, in order.
    pub rest: Vec<String>,
}

/// Split multi-line clipboard text. Single-line text yields `None` and the
/// browser's default paste should run untouched.
///
/// Every line break produces a row, so a trailing break adds an empty entry.
pub fn split_paste(text: &str) -> Option<PastePlan> {
    if !LINE_BREAK_REGEX.is_match(text) {
        return None;
    }
    let mut lines = LINE_BREAK_REGEX.split(text).map(str::to_string);
    let first = lines.next().unwrap_or_default();
    Some(PastePlan {
        first,
        rest: lines.collect(),
    })
}

/// The last remaining row can never be removed.
pub fn can_remove(row_count: usize) -> bool {
    row_count >= 2
}

pub fn save_reg_form(store: &dyn KeyValueStore, snapshot: &RegFormSnapshot) -> Result<(), UiError> {
    save_json(store, REG_FORM_KEY, snapshot)
}

pub fn load_reg_form(store: &dyn KeyValueStore) -> Option<RegFormSnapshot> {
    load_json(store, REG_FORM_KEY)
}

pub fn clear_reg_form(store: &dyn KeyValueStore) {
    store.remove(REG_FORM_KEY);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn filled_snapshot() -> RegFormSnapshot {
        let mut snap = RegFormSnapshot::default();
        snap.set_field(FormField::GivenName, "A");
        snap.set_field(FormField::Surname, "B");
        snap.set_field(FormField::ContractNumber, "1");
        snap.set_field(FormField::Login, "x@example.com");
        snap.set_field(FormField::Password, "pass");
        snap.participants = Some(vec!["P1".into(), "P2".into()]);
        snap
    }

    #[test]
    fn single_line_paste_is_not_intercepted() {
        assert_eq!(split_paste("Jan Kowalski"), None);
        assert_eq!(split_paste(""), None);
    }

    #[test]
    fn multi_line_paste_keeps_order() {
        let plan = split_paste("Anna\nBartek\r\nCelina").unwrap();
        assert_eq!(plan.first, "Anna");
        assert_eq!(plan.rest, vec!["Bartek", "Celina"]);
    }

    #[test]
    fn every_line_break_adds_one_entry() {
        for n in 1..6 {
            let text = (0..=n).map(|i| format!("P{}", i)).collect::<Vec<_>>().join("\n");
            let plan = split_paste(&text).unwrap();
            assert_eq!(plan.rest.len(), n);
            assert_eq!(plan.rest.last().unwrap(), &format!("P{}", n));
        }
    }

    #[test]
    fn trailing_break_yields_empty_entry() {
        let plan = split_paste("Anna\n").unwrap();
        assert_eq!(plan.first, "Anna");
        assert_eq!(plan.rest, vec![String::new()]);
    }

    #[test]
    fn removal_floor_is_one_row() {
        assert!(!can_remove(0));
        assert!(!can_remove(1));
        assert!(can_remove(2));
    }

    #[test]
    fn wire_format_uses_form_ids() {
        let json = serde_json::to_value(filled_snapshot()).unwrap();
        assert_eq!(json["imie"], "A");
        assert_eq!(json["nazwisko"], "B");
        assert_eq!(json["numer_umowy"], "1");
        assert_eq!(json["login"], "x@example.com");
        assert_eq!(json["haslo"], "pass");
        assert_eq!(json["uczestnik"], serde_json::json!(["P1", "P2"]));
    }

    #[test]
    fn absent_fields_are_not_written() {
        let json = serde_json::to_string(&RegFormSnapshot::default()).unwrap();
        assert_eq!(json, "{}");
    }

    #[test]
    fn save_then_load_reproduces_snapshot() {
        let store = MemoryStore::new();
        let snap = filled_snapshot();
        save_reg_form(&store, &snap).unwrap();

        let loaded = load_reg_form(&store).unwrap();
        for field in FormField::ALL {
            assert_eq!(loaded.field(field), snap.field(field));
        }
        assert_eq!(
            loaded.restore_plan(),
            RestorePlan {
                first: "P1".into(),
                extra: vec!["P2".into()],
            }
        );
    }

    #[test]
    fn clear_removes_draft() {
        let store = MemoryStore::new();
        save_reg_form(&store, &filled_snapshot()).unwrap();
        clear_reg_form(&store);
        assert_eq!(load_reg_form(&store), None);
    }

    #[test]
    fn malformed_draft_is_ignored() {
        let store = MemoryStore::new();
        store.set(REG_FORM_KEY, "{\"imie\":");
        assert_eq!(load_reg_form(&store), None);
    }

    #[test]
    fn unknown_keys_are_ignored_on_load() {
        let store = MemoryStore::new();
        store.set(REG_FORM_KEY, r#"{"imie":"A","podpis":"x.png"}"#);
        let loaded = load_reg_form(&store).unwrap();
        assert_eq!(loaded.field(FormField::GivenName), Some("A"));
    }

    #[test]
    fn draft_without_participants_restores_single_blank_row() {
        let snap: RegFormSnapshot = serde_json::from_str(r#"{"imie":"A"}"#).unwrap();
        assert_eq!(
            snap.restore_plan(),
            RestorePlan {
                first: String::new(),
                extra: Vec::new(),
            }
        );
    }

    #[test]
    fn empty_participant_list_restores_single_blank_row() {
        let snap = RegFormSnapshot {
            participants: Some(Vec::new()),
            ..Default::default()
        };
        assert_eq!(
            snap.restore_plan(),
            RestorePlan {
                first: String::new(),
                extra: Vec::new(),
            }
        );
    }
}
