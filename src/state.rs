//! Thread-local runtime state shared by the page's event handlers.
//!
//! WASM in the browser has exactly one thread, so everything here is a
//! `thread_local!` behind `Cell`/`RefCell` rather than anything `Sync`.
//! Handlers borrow for the duration of one reaction and release before
//! returning; store subscribers only write to the DOM and never dispatch.

use crate::columns::{ColumnBoard, ColumnEvent};
use crate::components;
use crate::preview::{PreviewToken, PreviewTokens};
use crate::store::Store;
use crate::theme::Settings;
use std::cell::{Cell, RefCell};

thread_local! {
    /// Preferences currently applied to the document.
    pub static SETTINGS: Cell<Settings> = Cell::new(Settings::default());

    /// Column groups of the page, rendered by the DOM writer on every dispatch.
    pub static COLUMN_STORE: RefCell<Store<ColumnBoard>> = RefCell::new(column_store());

    /// Signature preview requests; only the latest is ever shown.
    pub static PREVIEW_TOKENS: RefCell<PreviewTokens> = RefCell::new(PreviewTokens::new());
}

fn column_store() -> Store<ColumnBoard> {
    let mut store = Store::new(ColumnBoard::new());
    store.subscribe(components::render_changed_groups);
    store
}

pub fn dispatch_columns(event: ColumnEvent) {
    COLUMN_STORE.with(|store| store.borrow_mut().dispatch(event));
}

/// Read the column board without dispatching.
pub fn with_columns<R>(f: impl FnOnce(&ColumnBoard) -> R) -> R {
    COLUMN_STORE.with(|store| f(store.borrow().state()))
}

pub fn settings() -> Settings {
    SETTINGS.with(Cell::get)
}

pub fn set_settings(settings: Settings) {
    SETTINGS.with(|cell| cell.set(settings));
}

pub fn issue_preview() -> PreviewToken {
    PREVIEW_TOKENS.with(|tokens| tokens.borrow_mut().issue())
}

pub fn invalidate_preview() {
    PREVIEW_TOKENS.with(|tokens| tokens.borrow_mut().invalidate());
}

pub fn preview_is_current(token: PreviewToken) -> bool {
    PREVIEW_TOKENS.with(|tokens| tokens.borrow().is_current(token))
}
