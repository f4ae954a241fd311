//! Row selection keyed by stable row id.

use std::collections::HashMap;

use ustr::Ustr;

use super::TableRow;

/// Row id → selected.
///
/// An absent id and an id mapped to `false` both mean "not selected";
/// equality treats them the same.
#[derive(Debug, Clone, Default)]
pub struct SelectionSet {
    entries: HashMap<Ustr, bool>,
}

impl PartialEq for SelectionSet {
    fn eq(&self, other: &Self) -> bool {
        let mut mine = self.selected_ids();
        let mut theirs = other.selected_ids();
        mine.sort_unstable();
        theirs.sort_unstable();
        mine == theirs
    }
}

impl Eq for SelectionSet {}

impl SelectionSet {
    pub fn is_selected(&self, id: Ustr) -> bool {
        self.entries.get(&id).copied().unwrap_or(false)
    }

    /// Selects every id when at least one is unselected, otherwise clears them.
    ///
    /// Only the given ids (the currently loaded page) are considered.
    pub fn toggle_all(&mut self, ids: &[Ustr]) {
        let all_selected = !ids.is_empty() && ids.iter().all(|id| self.is_selected(*id));
        if all_selected {
            for id in ids {
                self.entries.remove(id);
            }
        } else {
            self.entries.extend(ids.iter().map(|id| (*id, true)));
        }
    }

    /// [`SelectionSet::toggle_all`] over the ids of `rows`.
    pub fn toggle_all_rows<R: TableRow>(&mut self, rows: &[R]) {
        let ids: Vec<Ustr> = rows.iter().map(TableRow::row_id).collect();
        self.toggle_all(&ids);
    }

    pub fn toggle_one(&mut self, id: Ustr) {
        let selected = self.entries.entry(id).or_insert(false);
        *selected = !*selected;
    }

    pub fn set(&mut self, id: Ustr, selected: bool) {
        self.entries.insert(id, selected);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn count(&self) -> usize {
        self.entries.values().filter(|selected| **selected).count()
    }

    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }

    pub fn selected_ids(&self) -> Vec<Ustr> {
        self.entries
            .iter()
            .filter(|(_, selected)| **selected)
            .map(|(id, _)| *id)
            .collect()
    }

    /// Whether every row in `rows` is selected (and there is at least one).
    pub fn all_selected<R: TableRow>(&self, rows: &[R]) -> bool {
        !rows.is_empty() && rows.iter().all(|row| self.is_selected(row.row_id()))
    }

    /// Selected rows from `rows`, in `rows` order.
    pub fn selected_rows<'a, R: TableRow>(&self, rows: &'a [R]) -> Vec<&'a R> {
        rows.iter()
            .filter(|row| self.is_selected(row.row_id()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(raw: &[&str]) -> Vec<Ustr> {
        raw.iter().map(|s| Ustr::from(*s)).collect()
    }

    #[test]
    fn test_toggle_all_selects_then_clears() {
        let page = ids(&["a", "b", "c"]);
        let mut selection = SelectionSet::default();

        selection.toggle_all(&page);
        assert_eq!(selection.count(), 3);

        selection.toggle_all(&page);
        assert!(selection.is_empty());
    }

    #[test]
    fn test_toggle_all_twice_restores_full_or_empty_set() {
        let page = ids(&["a", "b"]);

        let empty = SelectionSet::default();
        let mut selection = empty.clone();
        selection.toggle_all(&page);
        selection.toggle_all(&page);
        assert_eq!(selection, empty);

        let mut full = SelectionSet::default();
        full.toggle_all(&page);
        let mut selection = full.clone();
        selection.toggle_all(&page);
        selection.toggle_all(&page);
        assert_eq!(selection, full);
    }

    #[test]
    fn test_toggle_all_keeps_rows_selected_on_other_pages() {
        let page = ids(&["a", "b"]);
        let mut selection = SelectionSet::default();
        selection.toggle_one(Ustr::from("other-page-row"));
        let before = selection.clone();

        selection.toggle_all(&page);
        assert_eq!(selection.count(), 3);

        selection.toggle_all(&page);
        assert_eq!(selection, before);
        assert!(selection.is_selected(Ustr::from("other-page-row")));
        assert!(!selection.is_selected(page[0]));
    }

    #[test]
    fn test_toggle_all_with_partial_selection_selects_everything() {
        let page = ids(&["a", "b", "c"]);
        let mut selection = SelectionSet::default();
        selection.toggle_one(page[1]);

        selection.toggle_all(&page);
        assert_eq!(selection.count(), 3);
    }

    #[test]
    fn test_toggle_one_twice_is_identity() {
        let mut selection = SelectionSet::default();
        selection.toggle_one(Ustr::from("x"));
        let before = selection.clone();

        selection.toggle_one(Ustr::from("y"));
        selection.toggle_one(Ustr::from("y"));
        assert_eq!(selection, before);
        assert!(selection.is_selected(Ustr::from("x")));
    }

    #[test]
    fn test_false_and_absent_are_equal() {
        let mut explicit = SelectionSet::default();
        explicit.set(Ustr::from("a"), false);
        assert_eq!(explicit, SelectionSet::default());
        assert!(!explicit.is_selected(Ustr::from("a")));
    }

    #[test]
    fn test_toggle_all_on_empty_page_is_noop() {
        let mut selection = SelectionSet::default();
        selection.toggle_one(Ustr::from("kept"));
        selection.toggle_all(&[]);
        assert!(selection.is_selected(Ustr::from("kept")));
    }
}
