//! Browser-side behaviour for the training panel's server-rendered pages.
//!
//! Three independent pieces share one startup entry point ([`start`]):
//! - theme and high-contrast preferences ([`theme`]),
//! - the repeatable participant list of the registration form with its
//!   locally saved draft ([`participants`]),
//! - percentage column widths kept within a 100% budget per table
//!   ([`columns`]).
//!
//! The page can also drive each operation through the functions exported to
//! JavaScript below, under their camelCase names.

use wasm_bindgen::prelude::*;
use web_sys::{Element, HtmlInputElement};

pub mod app;
pub mod columns;
mod components;
pub mod config;
pub mod error;
mod hooks;
pub mod participants;
pub mod preview;
mod state;
pub mod storage;
pub mod store;
pub mod theme;

pub use app::start;
pub use columns::{ColumnBoard, ColumnEvent, ColumnGroup, DeficitDisplay};
pub use error::UiError;
pub use participants::{FormField, RegFormSnapshot};
pub use theme::{Settings, Theme};

/// Module entry for pages that load the package without the binary.
#[wasm_bindgen(js_name = initPanelUi)]
pub fn init_panel_ui() {
    console_error_panic_hook::set_once();
    start();
}

#[wasm_bindgen(js_name = applyTheme)]
pub fn apply_theme(theme: &str) {
    match Theme::parse(theme) {
        Some(theme) => components::apply_theme(theme),
        None => log::warn!("Ignoring unknown theme {:?}", theme),
    }
}

#[wasm_bindgen(js_name = applyContrast)]
pub fn apply_contrast(enabled: bool) {
    components::apply_contrast(enabled);
}

#[wasm_bindgen(js_name = toggleTheme)]
pub fn toggle_theme() {
    app::toggle_theme();
}

#[wasm_bindgen(js_name = toggleContrast)]
pub fn toggle_contrast() {
    app::toggle_contrast();
}

/// Append a participant row; `value` defaults to an empty name.
#[wasm_bindgen(js_name = addParticipantField)]
pub fn add_participant_field(value: Option<String>) -> Option<HtmlInputElement> {
    app::add_participant_field(value.as_deref().unwrap_or(""))
}

#[wasm_bindgen(js_name = removeParticipantField)]
pub fn remove_participant_field(control: &Element) {
    app::remove_participant_field(control);
}

/// Save the registration draft, or clear it when called with `null`.
#[wasm_bindgen(js_name = saveRegForm)]
pub fn save_reg_form(clear: JsValue) {
    if clear.is_null() {
        app::clear_reg_form();
    } else {
        app::save_reg_form();
    }
}

#[wasm_bindgen(js_name = loadRegForm)]
pub fn load_reg_form() {
    app::load_reg_form();
}

/// The registration draft as currently shown, as a plain JS object.
#[wasm_bindgen(js_name = regFormSnapshot)]
pub fn reg_form_snapshot() -> Result<JsValue, JsValue> {
    let snapshot = app::collect_reg_form(&gloo_utils::document());
    serde_wasm_bindgen::to_value(&snapshot).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Apply a width input's own value to its column, last column included.
#[wasm_bindgen(js_name = applyWidth)]
pub fn apply_width(input: &HtmlInputElement) {
    let Some(table) = input.get_attribute(config::TABLE_ATTRIBUTE) else {
        return;
    };
    let Some(index) = app::group_position(&gloo_utils::document(), &table, input) else {
        return;
    };
    state::dispatch_columns(ColumnEvent::Apply {
        table,
        index,
        raw: input.value(),
    });
}

/// Derive the last column of `table` from the values its inputs show now.
#[wasm_bindgen(js_name = adjustLastColumn)]
pub fn adjust_last_column(table: &str) {
    app::sync_group(&gloo_utils::document(), table);
    state::dispatch_columns(ColumnEvent::AdjustLast {
        table: table.to_string(),
    });
}

#[wasm_bindgen(js_name = updateTotals)]
pub fn update_totals(table: &str) {
    app::sync_group(&gloo_utils::document(), table);
}

#[wasm_bindgen(js_name = resetWidths)]
pub fn reset_widths(table: &str) {
    state::dispatch_columns(ColumnEvent::Reset {
        table: table.to_string(),
    });
}
