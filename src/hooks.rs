//! Small helpers for finding elements and hooking DOM events.

use crate::error::UiError;
use futures::channel::oneshot;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, Event, EventTarget, File, FileReader, NodeList};

/// Element with `id`, if present and of type `T`.
pub fn by_id<T: JsCast>(doc: &Document, id: &str) -> Option<T> {
    doc.get_element_by_id(id)?.dyn_into::<T>().ok()
}

fn collect<T: JsCast>(list: NodeList) -> Vec<T> {
    (0..list.length())
        .filter_map(|i| list.get(i))
        .filter_map(|node| node.dyn_into::<T>().ok())
        .collect()
}

/// All elements in the document matching `selector`, in document order.
pub fn query_all<T: JsCast>(doc: &Document, selector: &str) -> Vec<T> {
    match doc.query_selector_all(selector) {
        Ok(list) => collect(list),
        Err(_) => Vec::new(),
    }
}

/// All descendants of `root` matching `selector`.
pub fn query_all_in<T: JsCast>(root: &Element, selector: &str) -> Vec<T> {
    match root.query_selector_all(selector) {
        Ok(list) => collect(list),
        Err(_) => Vec::new(),
    }
}

pub fn query_one<T: JsCast>(doc: &Document, selector: &str) -> Option<T> {
    doc.query_selector(selector).ok()??.dyn_into::<T>().ok()
}

/// `.class[attr="value"]`
pub fn keyed_selector(class: &str, attribute: &str, value: &str) -> String {
    format!(".{}[{}=\"{}\"]", class, attribute, value.replace('"', "\\\""))
}

/// Register `handler` for `kind` events on `target` for the page's lifetime.
///
/// The event is handed over already cast to `E`; pick the interface the
/// event type actually has (`ClipboardEvent` for `paste`, and so on).
pub fn listen<E, F>(target: &EventTarget, kind: &str, mut handler: F) -> Result<(), UiError>
where
    E: JsCast + 'static,
    F: FnMut(E) + 'static,
{
    let callback = Closure::<dyn FnMut(Event)>::wrap(Box::new(move |event: Event| {
        handler(event.unchecked_into::<E>());
    }));
    target.add_event_listener_with_callback(
        kind,
        callback.as_ref().unchecked_ref::<js_sys::Function>(),
    )?;
    // Listeners are never removed; the closure lives as long as the page.
    callback.forget();
    Ok(())
}

/// Read `file` as a `data:` URL.
pub async fn read_as_data_url(file: &File) -> Result<String, UiError> {
    let reader = FileReader::new()?;
    let (tx, rx) = oneshot::channel::<Result<String, UiError>>();
    let tx = Rc::new(RefCell::new(Some(tx)));

    let onload = {
        let reader = reader.clone();
        let tx = tx.clone();
        Closure::<dyn FnMut(Event)>::wrap(Box::new(move |_: Event| {
            let result = reader
                .result()
                .map_err(UiError::from)
                .and_then(|value| {
                    value
                        .as_string()
                        .ok_or_else(|| UiError::Js("FileReader result is not a string".into()))
                });
            if let Some(tx) = tx.borrow_mut().take() {
                let _ = tx.send(result);
            }
        }))
    };
    let onerror = {
        let tx = tx.clone();
        Closure::<dyn FnMut(Event)>::wrap(Box::new(move |_: Event| {
            if let Some(tx) = tx.borrow_mut().take() {
                let _ = tx.send(Err(UiError::Js("FileReader failed".into())));
            }
        }))
    };
    reader.set_onload(Some(onload.as_ref().unchecked_ref()));
    reader.set_onerror(Some(onerror.as_ref().unchecked_ref()));
    reader.read_as_data_url(file)?;

    let outcome = rx
        .await
        .unwrap_or_else(|_| Err(UiError::Js("file read was dropped".into())));

    reader.set_onload(None);
    reader.set_onerror(None);
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyed_selector_formats_attribute_match() {
        assert_eq!(
            keyed_selector("total-warning", "data-table", "admin_trainers"),
            ".total-warning[data-table=\"admin_trainers\"]"
        );
    }

    #[test]
    fn keyed_selector_escapes_quotes() {
        assert_eq!(keyed_selector("x", "data-table", "a\"b"), ".x[data-table=\"a\\\"b\"]");
    }
}
