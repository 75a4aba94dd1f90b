//! Startup wiring and the event reactions of the three page components.
//!
//! The theme is applied as soon as the module starts; everything that needs
//! the document's elements is wired once it is interactive. Every binding is
//! optional: an absent element just means that piece is not wired.

use crate::columns::ColumnEvent;
use crate::components::{self, participant_inputs, participant_rows, row_input};
use crate::config::*;
use crate::error::UiError;
use crate::hooks::{by_id, keyed_selector, listen, query_all, read_as_data_url};
use crate::participants::{self, can_remove, split_paste, FormField, RegFormSnapshot};
use crate::preview::is_image_type;
use crate::state;
use crate::storage::BrowserStorage;
use crate::theme::{self, Settings};
use log::{debug, info, warn};
use std::cell::Cell;
use wasm_bindgen::JsCast;
use web_sys::{ClipboardEvent, Document, Element, Event, HtmlImageElement, HtmlInputElement};

thread_local! {
    static WIRED: Cell<bool> = Cell::new(false);
}

/// Apply persisted preferences, then wire the page once it is interactive.
pub fn start() {
    if console_log::init_with_level(log::Level::Debug).is_err() {
        debug!("Logger already initialised");
    }
    init_theme();

    let doc = gloo_utils::document();
    if doc.ready_state() == "loading" {
        let result = listen::<Event, _>(&doc, "DOMContentLoaded", |_| {
            wire_document(&gloo_utils::document());
        });
        if let Err(e) = result {
            warn!("Could not wait for DOMContentLoaded: {}", e);
        }
    } else {
        wire_document(&doc);
    }
}

/// Wire every component against `doc`. Runs at most once per page.
pub fn wire_document(doc: &Document) {
    if WIRED.with(|w| w.replace(true)) {
        return;
    }
    wire_theme_toggles(doc);
    wire_participants(doc);
    wire_columns(doc);
    wire_submit(doc);
}

fn report(what: &str, result: Result<(), UiError>) {
    if let Err(e) = result {
        warn!("Failed to wire {}: {}", what, e);
    }
}

// ──────────────────────────────────────────────────────────────────────────────
// Theme

pub fn init_theme() {
    let settings = Settings::resolve(&BrowserStorage, components::prefers_dark());
    components::apply_theme(settings.theme);
    components::apply_contrast(settings.high_contrast);
    state::set_settings(settings);
    debug!(
        "Theme {} applied, high contrast {}",
        settings.theme, settings.high_contrast
    );
}

pub fn toggle_theme() {
    let next = state::settings().with_theme_toggled(components::applied_theme());
    components::apply_theme(next.theme);
    theme::persist_theme(&BrowserStorage, next.theme);
    state::set_settings(next);
}

pub fn toggle_contrast() {
    let next = state::settings().with_contrast_toggled(components::applied_contrast());
    components::apply_contrast(next.high_contrast);
    theme::persist_contrast(&BrowserStorage, next.high_contrast);
    state::set_settings(next);
}

pub fn wire_theme_toggles(doc: &Document) {
    // The body may not have existed when the module started.
    components::apply_contrast(state::settings().high_contrast);
    if let Some(button) = by_id::<Element>(doc, DARK_MODE_TOGGLE_ID) {
        report(
            "theme toggle",
            listen::<Event, _>(&button, "click", |_| toggle_theme()),
        );
    }
    if let Some(button) = by_id::<Element>(doc, CONTRAST_TOGGLE_ID) {
        report(
            "contrast toggle",
            listen::<Event, _>(&button, "click", |_| toggle_contrast()),
        );
    }
}

// ──────────────────────────────────────────────────────────────────────────────
// Participants and registration draft

/// Append a participant row holding `value`, wire it and save the draft.
///
/// Returns `None` when the page has no participant container.
pub fn add_participant_field(value: &str) -> Option<HtmlInputElement> {
    let doc = gloo_utils::document();
    let container = by_id::<Element>(&doc, PARTICIPANTS_CONTAINER_ID)?;
    let row = match components::build_participant_row(&doc, value) {
        Ok(row) => row,
        Err(e) => {
            warn!("Could not build participant row: {}", e);
            return None;
        }
    };
    if let Err(e) = container.append_child(&row.group) {
        warn!("Could not append participant row: {}", UiError::from(e));
        return None;
    }
    bind_participant_input(&row.input);
    bind_remove_button(&row.remove);
    save_reg_form();
    Some(row.input)
}

/// Remove the row owning `control`, unless it is the last one left.
pub fn remove_participant_field(control: &Element) {
    let selector = format!(".{}", PARTICIPANT_GROUP_CLASS);
    let Some(row) = control.closest(&selector).ok().flatten() else {
        debug!("Remove control outside a participant row");
        return;
    };
    let doc = gloo_utils::document();
    if !can_remove(participant_rows(&doc).len()) {
        debug!("Keeping the last participant row");
        return;
    }
    row.remove();
    save_reg_form();
}

/// Expand a multi-line paste into one row per line.
pub fn handle_participant_paste(event: &ClipboardEvent) {
    let text = event
        .clipboard_data()
        .and_then(|data| data.get_data("text").ok())
        .unwrap_or_default();
    let Some(plan) = split_paste(&text) else {
        return;
    };
    event.prevent_default();

    let target = event
        .current_target()
        .and_then(|t| t.dyn_into::<HtmlInputElement>().ok());
    if let Some(input) = target {
        input.set_value(&plan.first);
    }
    for line in &plan.rest {
        add_participant_field(line);
    }
    save_reg_form();
}

fn bind_participant_input(input: &HtmlInputElement) {
    report(
        "participant paste",
        listen::<ClipboardEvent, _>(input, "paste", |event| handle_participant_paste(&event)),
    );
}

fn bind_remove_button(button: &Element) {
    let control = button.clone();
    report(
        "participant removal",
        listen::<Event, _>(button, "click", move |_| remove_participant_field(&control)),
    );
}

/// Current draft as shown in the form.
pub fn collect_reg_form(doc: &Document) -> RegFormSnapshot {
    let mut snapshot = RegFormSnapshot::default();
    for field in FormField::ALL {
        if let Some(input) = by_id::<HtmlInputElement>(doc, field.id()) {
            if !components::is_file_input(&input) {
                snapshot.set_field(field, input.value());
            }
        }
    }
    snapshot.participants = Some(participant_inputs(doc).iter().map(|i| i.value()).collect());
    snapshot
}

pub fn save_reg_form() {
    let snapshot = collect_reg_form(&gloo_utils::document());
    if let Err(e) = participants::save_reg_form(&BrowserStorage, &snapshot) {
        warn!("Could not save registration draft: {}", e);
    }
}

pub fn clear_reg_form() {
    participants::clear_reg_form(&BrowserStorage);
}

/// Refill the form from the saved draft, rebuilding the participant rows to
/// the saved shape. Missing or malformed drafts leave the form untouched.
pub fn load_reg_form() {
    let Some(snapshot) = participants::load_reg_form(&BrowserStorage) else {
        return;
    };
    let doc = gloo_utils::document();
    for field in FormField::ALL {
        let (Some(value), Some(input)) = (
            snapshot.field(field),
            by_id::<HtmlInputElement>(&doc, field.id()),
        ) else {
            continue;
        };
        if !components::is_file_input(&input) {
            input.set_value(value);
        }
    }

    let plan = snapshot.restore_plan();
    let rows = participant_rows(&doc);
    match rows.first().and_then(row_input) {
        Some(input) => input.set_value(&plan.first),
        None => {
            add_participant_field(&plan.first);
        }
    }
    for row in rows.iter().skip(1) {
        row.remove();
    }
    for value in &plan.extra {
        add_participant_field(value);
    }
}

fn wire_signature_preview(doc: &Document) {
    let (Some(input), Some(preview)) = (
        by_id::<HtmlInputElement>(doc, SIGNATURE_INPUT_ID),
        by_id::<HtmlImageElement>(doc, SIGNATURE_PREVIEW_ID),
    ) else {
        debug!("No signature upload on this page");
        return;
    };

    let source = input.clone();
    let result = listen::<Event, _>(&input, "change", move |_| {
        let file = source.files().and_then(|files| files.get(0));
        match file {
            Some(file) if is_image_type(&file.type_()) => {
                let token = state::issue_preview();
                let preview = preview.clone();
                wasm_bindgen_futures::spawn_local(async move {
                    let outcome = read_as_data_url(&file).await;
                    if !state::preview_is_current(token) {
                        return;
                    }
                    match outcome {
                        Ok(url) => components::show_preview(&preview, &url),
                        Err(e) => {
                            warn!("Could not read signature {}: {}", file.name(), e);
                            components::clear_preview(&preview);
                        }
                    }
                });
            }
            _ => {
                state::invalidate_preview();
                components::clear_preview(&preview);
            }
        }
    });
    report("signature preview", result);
}

/// The form holding the participant list (or the first draft field).
fn registration_form(doc: &Document) -> Option<Element> {
    let anchor = by_id::<Element>(doc, PARTICIPANTS_CONTAINER_ID)
        .or_else(|| by_id::<Element>(doc, FormField::GivenName.id()))?;
    anchor.closest("form").ok().flatten()
}

pub fn wire_participants(doc: &Document) {
    if let Some(button) = by_id::<Element>(doc, ADD_PARTICIPANT_ID) {
        let result = listen::<Event, _>(&button, "click", |_| {
            if let Some(input) = add_participant_field("") {
                let _ = input.focus();
            }
        });
        report("add participant", result);
    }

    let inputs = participant_inputs(doc);
    for input in &inputs {
        bind_participant_input(input);
    }
    for button in query_all::<Element>(doc, &format!(".{}", REMOVE_PARTICIPANT_CLASS)) {
        bind_remove_button(&button);
    }

    load_reg_form();
    wire_signature_preview(doc);

    if let Some(form) = registration_form(doc) {
        report(
            "registration autosave",
            listen::<Event, _>(&form, "input", |_| save_reg_form()),
        );
    }
    info!("Participant list wired with {} row(s)", inputs.len());
}

// ──────────────────────────────────────────────────────────────────────────────
// Column widths

/// Ordinal of `input` within its table group.
pub fn group_position(doc: &Document, table: &str, input: &HtmlInputElement) -> Option<usize> {
    components::group_inputs(doc, table)
        .iter()
        .position(|candidate| candidate.is_same_node(Some(input.as_ref())))
}

pub fn wire_columns(doc: &Document) {
    let inputs = query_all::<HtmlInputElement>(doc, &format!(".{}", WIDTH_INPUT_CLASS));
    let mut tables: Vec<String> = Vec::new();

    for input in &inputs {
        let Some(table) = input.get_attribute(TABLE_ATTRIBUTE) else {
            debug!("Width input without {}", TABLE_ATTRIBUTE);
            continue;
        };
        let column = input.get_attribute(COLUMN_ATTRIBUTE).unwrap_or_default();
        state::dispatch_columns(ColumnEvent::Register {
            table: table.clone(),
            column,
            raw: input.value(),
        });
        let index = state::with_columns(|board| board.group(&table).map_or(0, |g| g.len() - 1));

        for kind in ["input", "change"] {
            let source = input.clone();
            let key = table.clone();
            report(
                "width input",
                listen::<Event, _>(input, kind, move |_| {
                    state::dispatch_columns(ColumnEvent::Edit {
                        table: key.clone(),
                        index,
                        raw: source.value(),
                    });
                }),
            );
        }
        if !tables.contains(&table) {
            tables.push(table);
        }
    }

    for table in &tables {
        let selector = keyed_selector(RESET_WIDTHS_CLASS, TABLE_ATTRIBUTE, table);
        for button in query_all::<Element>(doc, &selector) {
            let key = table.clone();
            report(
                "width reset",
                listen::<Event, _>(&button, "click", move |_| {
                    state::dispatch_columns(ColumnEvent::Reset { table: key.clone() });
                }),
            );
        }
    }
    if !tables.is_empty() {
        info!(
            "Column widths wired: {} input(s) in {} table group(s)",
            inputs.len(),
            tables.len()
        );
    }
}

/// Read the current values of `table`'s inputs back into the column store.
pub fn sync_group(doc: &Document, table: &str) {
    let raws = components::group_inputs(doc, table)
        .iter()
        .map(HtmlInputElement::value)
        .collect();
    state::dispatch_columns(ColumnEvent::Sync {
        table: table.to_string(),
        raws,
    });
}

/// Snap every column group to 100 before a form leaves the page.
pub fn snap_columns() {
    let doc = gloo_utils::document();
    let tables: Vec<String> =
        state::with_columns(|board| board.groups().iter().map(|g| g.table.clone()).collect());
    for table in &tables {
        sync_group(&doc, table);
    }
    state::dispatch_columns(ColumnEvent::SnapAll);
    let unbalanced: Vec<String> = state::with_columns(|board| {
        board.unbalanced().into_iter().map(str::to_string).collect()
    });
    for table in unbalanced {
        warn!("Column widths of {} still do not sum to 100%", table);
    }
}

pub fn wire_submit(doc: &Document) {
    let registration = registration_form(doc);
    for form in query_all::<Element>(doc, "form") {
        let clears_draft = registration
            .as_ref()
            .map_or(false, |reg| reg.is_same_node(Some(form.as_ref())));
        report(
            "form submit",
            listen::<Event, _>(&form, "submit", move |_| {
                snap_columns();
                if clears_draft {
                    clear_reg_form();
                }
            }),
        );
    }
}
