//! DOM writers for the panel's server-rendered markup.
//!
//! These functions only render state decided elsewhere: they build
//! participant rows, write column widths and indicators, apply the theme and
//! show or hide the signature preview. A missing element is skipped.

use crate::columns::{
    css_width, format_percent, target_class, target_id, ColumnBoard, ColumnGroup, DeficitDisplay,
};
use crate::config::*;
use crate::error::UiError;
use crate::hooks::{by_id, keyed_selector, query_all, query_all_in, query_one};
use crate::theme::Theme;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement, HtmlImageElement, HtmlInputElement};

// ──────────────────────────────────────────────────────────────────────────────
// Theme

pub fn apply_theme(theme: Theme) {
    if let Some(root) = gloo_utils::document().document_element() {
        let _ = root.set_attribute(THEME_ATTRIBUTE, theme.as_str());
    }
}

/// Theme shown right now, read back from the root attribute.
pub fn applied_theme() -> Theme {
    let attribute = gloo_utils::document()
        .document_element()
        .and_then(|root| root.get_attribute(THEME_ATTRIBUTE));
    Theme::from_applied(attribute.as_deref())
}

pub fn apply_contrast(enabled: bool) {
    if let Some(body) = gloo_utils::document().body() {
        let classes = body.class_list();
        let _ = if enabled {
            classes.add_1(HIGH_CONTRAST_CLASS)
        } else {
            classes.remove_1(HIGH_CONTRAST_CLASS)
        };
    }
}

pub fn applied_contrast() -> bool {
    gloo_utils::document()
        .body()
        .map_or(false, |body| body.class_list().contains(HIGH_CONTRAST_CLASS))
}

/// Environment dark-scheme signal.
pub fn prefers_dark() -> bool {
    web_sys::window()
        .and_then(|w| w.match_media(PREFERS_DARK_QUERY).ok().flatten())
        .map_or(false, |mq| mq.matches())
}

// ──────────────────────────────────────────────────────────────────────────────
// Participants

/// One participant row: the group element, its text input and its remove
/// button, not yet attached to the document.
pub struct ParticipantRow {
    pub group: Element,
    pub input: HtmlInputElement,
    pub remove: Element,
}

pub fn build_participant_row(doc: &Document, value: &str) -> Result<ParticipantRow, UiError> {
    let group = doc.create_element("div")?;
    group.set_class_name(&format!("input-group mb-2 {}", PARTICIPANT_GROUP_CLASS));

    let input = doc
        .create_element("input")?
        .dyn_into::<HtmlInputElement>()
        .map_err(|_| UiError::UnexpectedElement("participant input".into()))?;
    input.set_type("text");
    input.set_name(PARTICIPANT_INPUT_NAME);
    input.set_class_name(&format!("form-control {}", PARTICIPANT_INPUT_CLASS));
    input.set_value(value);

    let remove = doc.create_element("button")?;
    remove.set_attribute("type", "button")?;
    remove.set_class_name(&format!("btn btn-outline-danger {}", REMOVE_PARTICIPANT_CLASS));
    remove.set_text_content(Some(REMOVE_PARTICIPANT_LABEL));

    group.append_child(&input)?;
    group.append_child(&remove)?;
    Ok(ParticipantRow {
        group,
        input,
        remove,
    })
}

pub fn participant_rows(doc: &Document) -> Vec<Element> {
    query_all(doc, &format!(".{}", PARTICIPANT_GROUP_CLASS))
}

/// Participant inputs in display order, file inputs excluded.
pub fn participant_inputs(doc: &Document) -> Vec<HtmlInputElement> {
    query_all::<HtmlInputElement>(doc, &format!(".{}", PARTICIPANT_INPUT_CLASS))
        .into_iter()
        .filter(|input| !is_file_input(input))
        .collect()
}

pub fn row_input(row: &Element) -> Option<HtmlInputElement> {
    query_all_in::<HtmlInputElement>(row, &format!(".{}", PARTICIPANT_INPUT_CLASS))
        .into_iter()
        .next()
}

pub fn is_file_input(input: &HtmlInputElement) -> bool {
    input.type_().eq_ignore_ascii_case("file")
}

// ──────────────────────────────────────────────────────────────────────────────
// Signature preview

pub fn show_preview(img: &HtmlImageElement, data_url: &str) {
    img.set_src(data_url);
    let _ = img.style().set_property("display", "block");
}

pub fn clear_preview(img: &HtmlImageElement) {
    let _ = img.remove_attribute("src");
    let _ = img.style().set_property("display", "none");
}

// ──────────────────────────────────────────────────────────────────────────────
// Column widths

/// Width inputs of one table group, in document order.
pub fn group_inputs(doc: &Document, table: &str) -> Vec<HtmlInputElement> {
    query_all(doc, &keyed_selector(WIDTH_INPUT_CLASS, TABLE_ATTRIBUTE, table))
}

/// Element whose width represents a column.
///
/// Tried in order: the derived id, the derived class, then the `ordinal`-th
/// `col` (or header cell) of `table[data-table=…]`.
pub fn resolve_target(
    doc: &Document,
    table: &str,
    column: &str,
    ordinal: usize,
) -> Option<HtmlElement> {
    if !column.is_empty() {
        if let Some(el) = by_id::<HtmlElement>(doc, &target_id(table, column)) {
            return Some(el);
        }
        let class = format!(".{}", target_class(table, column));
        if let Some(el) = query_one::<HtmlElement>(doc, &class) {
            return Some(el);
        }
    }

    let selector = format!("table[{}=\"{}\"]", TABLE_ATTRIBUTE, table.replace('"', "\\\""));
    let table_el = query_one::<Element>(doc, &selector)?;
    query_all_in::<HtmlElement>(&table_el, "col")
        .into_iter()
        .nth(ordinal)
        .or_else(|| query_all_in::<HtmlElement>(&table_el, "thead th").into_iter().nth(ordinal))
}

pub fn render_indicator(doc: &Document, table: &str, display: &DeficitDisplay) {
    let selector = keyed_selector(TOTAL_WARNING_CLASS, TABLE_ATTRIBUTE, table);
    let Some(indicator) = query_one::<Element>(doc, &selector) else {
        return;
    };
    indicator.set_text_content(Some(&display.text));
    let classes = indicator.class_list();
    let _ = if display.danger {
        classes.add_1(DANGER_CLASS)
    } else {
        classes.remove_1(DANGER_CLASS)
    };
}

/// Write every column of `group` back to its input and target, then its
/// indicator.
pub fn render_column_group(doc: &Document, group: &ColumnGroup) {
    let inputs = group_inputs(doc, &group.table);
    for (ordinal, entry) in group.entries.iter().enumerate() {
        if let Some(input) = inputs.get(ordinal) {
            input.set_value(&format_percent(entry.percent));
        }
        if !entry.applied {
            continue;
        }
        if let Some(target) = resolve_target(doc, &group.table, &entry.column, ordinal) {
            let _ = target.style().set_property("width", &css_width(entry.percent));
        }
    }
    render_indicator(doc, &group.table, &group.indicator());
}

/// Store subscriber: re-render the groups the last event touched.
pub fn render_changed_groups(board: &ColumnBoard) {
    let doc = gloo_utils::document();
    for group in board.changed() {
        render_column_group(&doc, group);
    }
}
