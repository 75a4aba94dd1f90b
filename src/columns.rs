//! Percentage column widths, tracked per table group.
//!
//! Each group is the set of width inputs sharing one table key. Values are
//! clamped into `[0, 100]`; an edit that pushes the group over 100 is cut
//! back on the edited column itself, never spread over the others. The last
//! column of a group is derived (`100 - sum(others)`) instead of taken from
//! what was typed, so snapping it balances the group whenever the other
//! columns are valid. Editing any other column does not re-derive the last
//! one: the group may sit above or below 100 until the last column is
//! touched or the group is reset, and the deficit indicator shows by how
//! much.
//!
//! [`ColumnBoard`] is the reducer behind the page's column store; the DOM
//! writer subscribes to it and re-renders the groups listed in
//! [`ColumnBoard::changed`].

use crate::config::{BALANCE_TOLERANCE, MAX_PERCENT, MIN_PERCENT};
use crate::store::Reducer;

/// Parse a raw input value. Empty, non-numeric and non-finite values are 0.
pub fn parse_percent(raw: &str) -> f64 {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

#[inline]
pub fn clamp_percent(value: f64) -> f64 {
    if value.is_nan() {
        return MIN_PERCENT;
    }
    value.clamp(MIN_PERCENT, MAX_PERCENT)
}

/// Format a value the way it is written back into an input.
pub fn format_percent(value: f64) -> String {
    format!("{}", value)
}

/// CSS width for a value, e.g. `"25%"`.
pub fn css_width(value: f64) -> String {
    format!("{}%", format_percent(value))
}

/// Id of the element a column's width is written to: `admin_trainers` +
/// `id` becomes `admin-trainers-id`.
pub fn target_id(table: &str, column: &str) -> String {
    format!("{}-{}", table.replace('_', "-"), column)
}

/// Class fallback when no element carries [`target_id`].
pub fn target_class(table: &str, column: &str) -> String {
    format!("col-{}", target_id(table, column))
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnWidthEntry {
    pub column: String,
    pub percent: f64,
    /// Set once the width has been written to the column at least once.
    pub applied: bool,
}

/// What the deficit indicator of a group should show.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DeficitDisplay {
    pub text: String,
    pub danger: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnGroup {
    pub table: String,
    pub entries: Vec<ColumnWidthEntry>,
}

impl ColumnGroup {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            entries: Vec::new(),
        }
    }

    /// Add a column with its starting value and return its ordinal.
    pub fn register(&mut self, column: impl Into<String>, raw: &str) -> usize {
        self.entries.push(ColumnWidthEntry {
            column: column.into(),
            percent: clamp_percent(parse_percent(raw)),
            applied: false,
        });
        self.entries.len() - 1
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_last(&self, index: usize) -> bool {
        !self.entries.is_empty() && index == self.entries.len() - 1
    }

    pub fn total(&self) -> f64 {
        self.entries.iter().map(|e| e.percent).sum()
    }

    /// Signed distance to 100: positive when the columns fall short.
    pub fn deficit(&self) -> f64 {
        MAX_PERCENT - self.total()
    }

    /// Clamp `value` into the column at `index`, then take back whatever the
    /// group now exceeds 100 by from this same column (floored at 0).
    ///
    /// Returns the value finally stored, or `None` for an unknown index.
    pub fn apply_width(&mut self, index: usize, value: f64) -> Option<f64> {
        let clamped = clamp_percent(value);
        self.entries.get_mut(index)?.percent = clamped;

        let excess = self.total() - MAX_PERCENT;
        let entry = &mut self.entries[index];
        if excess > 0.0 {
            entry.percent = (entry.percent - excess).max(MIN_PERCENT);
        }
        entry.applied = true;
        Some(entry.percent)
    }

    /// Take over the values currently shown in the group's inputs, clamped
    /// but otherwise as typed. Extra or missing values are ignored.
    pub fn sync<S: AsRef<str>>(&mut self, raws: &[S]) {
        for (entry, raw) in self.entries.iter_mut().zip(raws) {
            entry.percent = clamp_percent(parse_percent(raw.as_ref()));
        }
    }

    /// Derive the last column from the others and apply it.
    pub fn adjust_last(&mut self) -> Option<f64> {
        let last = self.entries.len().checked_sub(1)?;
        let others: f64 = self.entries[..last].iter().map(|e| e.percent).sum();
        self.apply_width(last, clamp_percent(MAX_PERCENT - others))
    }

    /// Give every column an equal share of 100.
    pub fn reset(&mut self) {
        if self.entries.is_empty() {
            return;
        }
        let share = MAX_PERCENT / self.entries.len() as f64;
        for index in 0..self.entries.len() {
            self.apply_width(index, share);
        }
    }

    /// Route an edit typed into column `index`: the last column is derived,
    /// every other column takes the typed value.
    pub fn edit(&mut self, index: usize, raw: &str) -> Option<f64> {
        if self.is_last(index) {
            self.adjust_last()
        } else {
            self.apply_width(index, parse_percent(raw))
        }
    }

    pub fn indicator(&self) -> DeficitDisplay {
        let deficit = self.deficit();
        // Anything that prints as 0.0 counts as balanced.
        if (deficit * 10.0).round() == 0.0 {
            return DeficitDisplay::default();
        }
        DeficitDisplay {
            text: format!("{:.1}", deficit),
            danger: true,
        }
    }

    /// Whether the backend would accept this group's total.
    pub fn is_balanced(&self) -> bool {
        self.deficit().abs() <= BALANCE_TOLERANCE
    }
}

/// Events the column store understands.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnEvent {
    /// A width input found at startup; it is registered and applied once.
    Register {
        table: String,
        column: String,
        raw: String,
    },
    /// Apply a value straight to one column, last or not.
    Apply {
        table: String,
        index: usize,
        raw: String,
    },
    /// A value typed by the user; routed through [`ColumnGroup::edit`].
    Edit {
        table: String,
        index: usize,
        raw: String,
    },
    /// Input values read back from the page, which may have been written
    /// without firing any event.
    Sync {
        table: String,
        raws: Vec<String>,
    },
    AdjustLast {
        table: String,
    },
    Reset {
        table: String,
    },
    /// Derive the last column of every group (form submission).
    SnapAll,
}

/// All column groups on the page, in discovery order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColumnBoard {
    groups: Vec<ColumnGroup>,
    changed: Vec<usize>,
}

impl ColumnBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn groups(&self) -> &[ColumnGroup] {
        &self.groups
    }

    pub fn group(&self, table: &str) -> Option<&ColumnGroup> {
        self.groups.iter().find(|g| g.table == table)
    }

    fn position(&self, table: &str) -> Option<usize> {
        self.groups.iter().position(|g| g.table == table)
    }

    /// Groups touched by the last dispatched event.
    pub fn changed(&self) -> impl Iterator<Item = &ColumnGroup> {
        self.changed.iter().filter_map(move |&i| self.groups.get(i))
    }

    /// Tables whose totals the backend would reject.
    pub fn unbalanced(&self) -> Vec<&str> {
        self.groups
            .iter()
            .filter(|g| !g.is_empty() && !g.is_balanced())
            .map(|g| g.table.as_str())
            .collect()
    }

    fn touch(&mut self, table: &str, f: impl FnOnce(&mut ColumnGroup)) {
        if let Some(pos) = self.position(table) {
            f(&mut self.groups[pos]);
            self.changed.push(pos);
        }
    }
}

impl Reducer for ColumnBoard {
    type Event = ColumnEvent;

    fn reduce(&mut self, event: ColumnEvent) {
        self.changed.clear();
        match event {
            ColumnEvent::Register { table, column, raw } => {
                let pos = match self.position(&table) {
                    Some(pos) => pos,
                    None => {
                        self.groups.push(ColumnGroup::new(table));
                        self.groups.len() - 1
                    }
                };
                let group = &mut self.groups[pos];
                let index = group.register(column, &raw);
                let start = group.entries[index].percent;
                group.apply_width(index, start);
                self.changed.push(pos);
            }
            ColumnEvent::Apply { table, index, raw } => {
                self.touch(&table, |g| {
                    g.apply_width(index, parse_percent(&raw));
                });
            }
            ColumnEvent::Edit { table, index, raw } => {
                self.touch(&table, |g| {
                    g.edit(index, &raw);
                });
            }
            ColumnEvent::Sync { table, raws } => self.touch(&table, |g| g.sync(&raws)),
            ColumnEvent::AdjustLast { table } => {
                self.touch(&table, |g| {
                    g.adjust_last();
                });
            }
            ColumnEvent::Reset { table } => self.touch(&table, ColumnGroup::reset),
            ColumnEvent::SnapAll => {
                for (pos, group) in self.groups.iter_mut().enumerate() {
                    group.adjust_last();
                    self.changed.push(pos);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn group(values: &[&str]) -> ColumnGroup {
        let mut g = ColumnGroup::new("admin_trainers");
        for (i, v) in values.iter().enumerate() {
            let idx = g.register(format!("c{}", i), v);
            let start = g.entries[idx].percent;
            g.apply_width(idx, start);
        }
        g
    }

    fn register(table: &str, column: &str, raw: &str) -> ColumnEvent {
        ColumnEvent::Register {
            table: table.into(),
            column: column.into(),
            raw: raw.into(),
        }
    }

    #[test]
    fn non_numeric_input_is_zero() {
        assert_eq!(parse_percent("abc"), 0.0);
        assert_eq!(parse_percent(""), 0.0);
        assert_eq!(parse_percent(" 12.5 "), 12.5);
        assert_eq!(parse_percent("NaN"), 0.0);
        assert_eq!(parse_percent("inf"), 0.0);
    }

    #[test]
    fn edits_are_clamped_into_range() {
        let mut g = group(&["10", "10", "10"]);
        assert_eq!(g.edit(0, "-5"), Some(0.0));
        // 150 clamps to 100, then the 20 excess over the group comes back off.
        assert_eq!(g.edit(0, "150"), Some(80.0));

        let mut single = group(&["10", "0"]);
        assert_eq!(single.edit(0, "150"), Some(100.0));
    }

    #[test]
    fn excess_is_taken_from_the_edited_column() {
        let mut g = group(&["40", "40", "20"]);
        assert_eq!(g.edit(0, "70"), Some(40.0));
        assert_eq!(g.entries[1].percent, 40.0);
        assert_eq!(g.entries[2].percent, 20.0);
        assert_eq!(g.total(), 100.0);
    }

    #[test]
    fn excess_floors_at_zero() {
        let mut g = ColumnGroup::new("t");
        g.register("a", "0");
        g.register("b", "0");
        g.entries[1].percent = 100.0;
        assert_eq!(g.apply_width(0, 30.0), Some(0.0));
    }

    #[test]
    fn last_column_absorbs_remainder() {
        let mut g = group(&["10", "10", "10", "10"]);
        g.edit(0, "12.3");
        g.edit(1, "45.6");
        g.edit(2, "7.05");
        g.adjust_last();
        assert!((g.total() - 100.0).abs() < 1e-9);
    }

    #[test]
    fn typing_into_last_column_derives_it() {
        let mut g = group(&["30", "30", "40"]);
        assert_eq!(g.edit(2, "5"), Some(40.0));
    }

    #[test]
    fn editing_other_column_leaves_last_alone() {
        let mut g = group(&["30", "30", "40"]);
        g.edit(0, "10");
        assert_eq!(g.entries[2].percent, 40.0);
        assert_eq!(g.indicator().text, "20.0");
    }

    #[test]
    fn last_column_clamped_when_others_exceed() {
        let mut g = ColumnGroup::new("t");
        g.register("a", "0");
        g.register("b", "0");
        g.entries[0].percent = 100.0;
        assert_eq!(g.adjust_last(), Some(0.0));
    }

    #[test]
    fn adjust_last_on_empty_group_is_noop() {
        let mut g = ColumnGroup::new("t");
        assert_eq!(g.adjust_last(), None);
        g.reset();
        assert!(g.is_empty());
    }

    #[test]
    fn deficit_indicator_shows_shortfall() {
        let g = group(&["30", "50"]);
        assert_eq!(
            g.indicator(),
            DeficitDisplay {
                text: "20.0".into(),
                danger: true,
            }
        );
    }

    #[test]
    fn deficit_indicator_clear_when_balanced() {
        let g = group(&["30", "70"]);
        assert_eq!(g.indicator(), DeficitDisplay::default());
    }

    #[test]
    fn reset_gives_equal_shares() {
        let mut g = group(&["90", "5", "5"]);
        g.reset();
        assert!((g.total() - 100.0).abs() < 1e-9);
        for e in &g.entries {
            assert!((e.percent - 100.0 / 3.0).abs() < 1e-9);
        }
        assert_eq!(g.indicator(), DeficitDisplay::default());
    }

    #[test]
    fn css_and_target_naming() {
        assert_eq!(css_width(25.0), "25%");
        assert_eq!(css_width(12.5), "12.5%");
        assert_eq!(target_id("admin_trainers", "id"), "admin-trainers-id");
        assert_eq!(target_class("admin_trainers", "id"), "col-admin-trainers-id");
    }

    #[test]
    fn board_groups_by_table_key() {
        let mut board = ColumnBoard::new();
        board.reduce(register("a", "x", "50"));
        board.reduce(register("b", "x", "100"));
        board.reduce(register("a", "y", "50"));

        assert_eq!(board.groups().len(), 2);
        assert_eq!(board.group("a").unwrap().len(), 2);
        assert_eq!(board.group("b").unwrap().len(), 1);
    }

    #[test]
    fn register_applies_starting_value() {
        let mut board = ColumnBoard::new();
        board.reduce(register("a", "x", "70"));
        board.reduce(register("a", "y", "70"));

        let g = board.group("a").unwrap();
        assert!(g.entries.iter().all(|e| e.applied));
        assert_eq!(g.entries[1].percent, 30.0);
    }

    #[test]
    fn changed_lists_only_touched_group() {
        let mut board = ColumnBoard::new();
        board.reduce(register("a", "x", "50"));
        board.reduce(register("b", "x", "50"));
        board.reduce(ColumnEvent::Edit {
            table: "b".into(),
            index: 0,
            raw: "20".into(),
        });

        let changed: Vec<_> = board.changed().map(|g| g.table.clone()).collect();
        assert_eq!(changed, vec!["b".to_string()]);
    }

    #[test]
    fn apply_on_last_column_takes_typed_value() {
        let mut board = ColumnBoard::new();
        board.reduce(register("a", "x", "50"));
        board.reduce(register("a", "y", "50"));
        board.reduce(ColumnEvent::Apply {
            table: "a".into(),
            index: 1,
            raw: "20".into(),
        });
        assert_eq!(board.group("a").unwrap().entries[1].percent, 20.0);
        assert_eq!(board.group("a").unwrap().indicator().text, "30.0");
    }

    #[test]
    fn unknown_table_changes_nothing() {
        let mut board = ColumnBoard::new();
        board.reduce(register("a", "x", "50"));
        board.reduce(ColumnEvent::Reset {
            table: "missing".into(),
        });
        assert_eq!(board.changed().count(), 0);
    }

    #[test]
    fn snap_all_balances_every_group() {
        let mut board = ColumnBoard::new();
        for (table, values) in [("a", ["20", "20", "20"]), ("b", ["10", "10", "10"])] {
            for (i, v) in values.iter().enumerate() {
                board.reduce(register(table, &format!("c{}", i), v));
            }
        }
        assert_eq!(board.unbalanced(), vec!["a", "b"]);

        board.reduce(ColumnEvent::SnapAll);

        assert!(board.unbalanced().is_empty());
        assert_eq!(board.changed().count(), 2);
    }

    #[test]
    fn adjust_last_uses_synced_values() {
        let mut board = ColumnBoard::new();
        for column in ["a", "b", "c"] {
            board.reduce(register("t", column, "10"));
        }
        board.reduce(ColumnEvent::Sync {
            table: "t".into(),
            raws: vec!["30".into(), "30".into(), "10".into()],
        });
        board.reduce(ColumnEvent::AdjustLast { table: "t".into() });

        let g = board.group("t").unwrap();
        assert_eq!(g.entries[2].percent, 40.0);
        assert_eq!(g.total(), 100.0);
    }

    #[test]
    fn sync_clamps_and_ignores_length_mismatch() {
        let mut g = group(&["10", "10"]);
        g.sync(&["150", "-5", "7"]);
        assert_eq!(g.entries[0].percent, 100.0);
        assert_eq!(g.entries[1].percent, 0.0);

        g.sync(&["abc"]);
        assert_eq!(g.entries[0].percent, 0.0);
        assert_eq!(g.entries[1].percent, 0.0);
    }

    #[test]
    fn snap_cannot_fix_overfull_group() {
        let mut g = ColumnGroup::new("t");
        g.register("a", "0");
        g.register("b", "0");
        g.register("c", "0");
        g.entries[0].percent = 80.0;
        g.entries[1].percent = 80.0;
        g.adjust_last();
        assert!(!g.is_balanced());
        assert_eq!(g.indicator().text, "-60.0");
    }
}
