//! In-memory model of the open-tab list: filtering, ranking and selection.
//!
//! The host editor supplies the tabs and performs the actual closing; this
//! module only tracks what is shown, highlighted and selected.
//!
//! ```edition2021
//! use tabsweep_matcher::tabs::{TabInfo, TabList};
//!
//! let mut list = TabList::new(vec![
//!     TabInfo::new("/src/TabManagerDialog.kt", "TabManagerDialog.kt"),
//!     TabInfo::new("/src/Tab.kt", "Tab.kt"),
//!     TabInfo::new("/README.md", "README.md"),
//! ]);
//! list.set_query("tab");
//!
//! let names: Vec<&str> = list.visible().map(|tab| tab.display_name.as_str()).collect();
//! assert_eq!(names, ["Tab.kt", "TabManagerDialog.kt"]);
//! ```
use crate::tabsweep::TabSweepMatcher;
use crate::{Error, FuzzyMatcher, Result, ScoreType};
use log::debug;
use std::collections::HashSet;

/// An open editor tab.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabInfo {
    /// Path of the file shown in the tab; identifies the tab.
    pub path: String,
    /// Name shown in the list, usually the file name.
    pub display_name: String,
    /// Whether the file has unsaved changes.
    pub is_modified: bool,
    /// Whether the tab is picked for a bulk operation.
    pub is_selected: bool,
}

impl TabInfo {
    pub fn new(path: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            display_name: display_name.into(),
            is_modified: false,
            is_selected: false,
        }
    }

    pub fn modified(mut self, is_modified: bool) -> Self {
        self.is_modified = is_modified;
        self
    }

    pub fn selected(mut self, is_selected: bool) -> Self {
        self.is_selected = is_selected;
        self
    }
}

/// Chars a user may type into the search query.
pub fn is_query_char(ch: char) -> bool {
    let is_letter = ch.is_alphabetic() && !ch.is_numeric();
    is_letter || ch.is_ascii_digit() || ch == '.' || ch == '-' || ch == '_'
}

pub struct TabList {
    tabs: Vec<TabInfo>,
    query: String,
    view: Vec<usize>, // indices into `tabs`, in display order
    highlighted: Option<usize>,
    matcher: TabSweepMatcher,
}

impl TabList {
    /// Build the list from the host's open tabs.
    ///
    /// A file open in several splits shows up once; tabs are ordered by
    /// lower-cased display name.
    pub fn new(tabs: impl IntoIterator<Item = TabInfo>) -> Self {
        let mut seen = HashSet::new();
        let mut tabs: Vec<TabInfo> = tabs
            .into_iter()
            .filter(|tab| seen.insert(tab.path.clone()))
            .collect();
        tabs.sort_by_cached_key(|tab| tab.display_name.to_lowercase());

        let mut list = Self {
            tabs,
            query: String::new(),
            view: Vec::new(),
            highlighted: None,
            matcher: TabSweepMatcher::default(),
        };
        list.refilter();
        list
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn len(&self) -> usize {
        self.tabs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tabs.is_empty()
    }

    /// All tabs, in name order, regardless of the query.
    pub fn tabs(&self) -> &[TabInfo] {
        &self.tabs
    }

    /// Tabs matching the query, best first.
    pub fn visible(&self) -> impl Iterator<Item = &TabInfo> + '_ {
        self.view.iter().map(move |&idx| &self.tabs[idx])
    }

    pub fn visible_len(&self) -> usize {
        self.view.len()
    }

    pub fn get(&self, row: usize) -> Option<&TabInfo> {
        self.view.get(row).map(|&idx| &self.tabs[idx])
    }

    pub fn highlighted_row(&self) -> Option<usize> {
        self.highlighted
    }

    pub fn highlighted(&self) -> Option<&TabInfo> {
        self.highlighted.and_then(|row| self.get(row))
    }

    /// Append `ch` to the query if it is a search char; returns whether it was taken.
    pub fn push_query_char(&mut self, ch: char) -> bool {
        if !is_query_char(ch) {
            return false;
        }
        self.query.push(ch);
        self.refilter();
        true
    }

    pub fn pop_query_char(&mut self) -> Option<char> {
        let ch = self.query.pop()?;
        self.refilter();
        Some(ch)
    }

    pub fn clear_query(&mut self) {
        if self.query.is_empty() {
            return;
        }
        self.query.clear();
        self.refilter();
    }

    pub fn set_query(&mut self, query: &str) {
        self.query.clear();
        self.query.push_str(query);
        self.refilter();
    }

    pub fn move_highlight(&mut self, delta: isize) {
        let Some(row) = self.highlighted else {
            return;
        };
        let last = self.view.len().saturating_sub(1);
        let row = if delta < 0 {
            row.saturating_sub(delta.unsigned_abs())
        } else {
            row.saturating_add(delta.unsigned_abs()).min(last)
        };
        self.highlighted = Some(row);
    }

    pub fn set_highlight(&mut self, row: usize) -> Result<()> {
        self.check_row(row)?;
        self.highlighted = Some(row);
        Ok(())
    }

    /// Flip the selection of the tab at `row` of the view.
    pub fn toggle(&mut self, row: usize) -> Result<bool> {
        let idx = self.check_row(row)?;
        let tab = &mut self.tabs[idx];
        tab.is_selected = !tab.is_selected;
        debug!("{} selected: {}", tab.path, tab.is_selected);
        Ok(tab.is_selected)
    }

    pub fn toggle_highlighted(&mut self) -> Option<bool> {
        let row = self.highlighted?;
        self.toggle(row).ok()
    }

    /// Select every visible tab.
    pub fn select_all(&mut self) {
        for &idx in self.view.iter() {
            self.tabs[idx].is_selected = true;
        }
        debug!("selected {} visible tabs", self.view.len());
    }

    pub fn clear_selection(&mut self) {
        for tab in self.tabs.iter_mut() {
            tab.is_selected = false;
        }
        debug!("cleared selection of {} tabs", self.tabs.len());
    }

    /// Selected tabs, hidden ones included, in name order.
    pub fn selected(&self) -> Vec<&TabInfo> {
        self.tabs.iter().filter(|tab| tab.is_selected).collect()
    }

    /// Forget tabs the host has closed.
    pub fn remove<'a>(&mut self, paths: impl IntoIterator<Item = &'a str>) -> usize {
        let paths: HashSet<&str> = paths.into_iter().collect();
        let previous = self.highlighted().map(|tab| tab.path.clone());
        let previous_row = self.highlighted.unwrap_or(0);

        let before = self.tabs.len();
        self.tabs.retain(|tab| !paths.contains(tab.path.as_str()));
        let removed = before - self.tabs.len();
        debug!("removed {} closed tabs", removed);
        if removed > 0 {
            // the highlighted tab may be gone, keep the cursor near its row
            self.rebuild_view(previous, previous_row);
        }
        removed
    }

    fn check_row(&self, row: usize) -> Result<usize> {
        self.view.get(row).copied().ok_or(Error::RowOutOfRange {
            row,
            len: self.view.len(),
        })
    }

    fn refilter(&mut self) {
        let previous = self.highlighted().map(|tab| tab.path.clone());
        self.rebuild_view(previous, 0);
    }

    /// Recompute the view from `tabs`, highlighting `previous` if it is still
    /// visible and otherwise `fallback_row`, clamped to the view.
    fn rebuild_view(&mut self, previous: Option<String>, fallback_row: usize) {
        if self.query.is_empty() {
            self.view = (0..self.tabs.len()).collect();
        } else {
            let mut ranked: Vec<(ScoreType, usize)> = self
                .tabs
                .iter()
                .enumerate()
                .filter_map(|(idx, tab)| {
                    self.matcher
                        .fuzzy_match(&tab.display_name, &self.query)
                        .map(|score| (score, idx))
                })
                .collect();
            // stable, so equal scores keep name order
            ranked.sort_by_key(|&(score, _)| -score);
            self.view = ranked.into_iter().map(|(_, idx)| idx).collect();
        }

        self.highlighted = if self.view.is_empty() {
            None
        } else {
            let restored = previous.and_then(|path| {
                self.view
                    .iter()
                    .position(|&idx| self.tabs[idx].path == path)
            });
            Some(restored.unwrap_or_else(|| fallback_row.min(self.view.len() - 1)))
        };

        debug!(
            "query {:?}: {} of {} tabs visible",
            self.query,
            self.view.len(),
            self.tabs.len()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &TabList) -> Vec<&str> {
        list.visible()
            .map(|tab| tab.display_name.as_str())
            .collect()
    }

    fn tab(name: &str) -> TabInfo {
        TabInfo::new(format!("/path/to/{}", name), name)
    }

    fn sample() -> TabList {
        TabList::new(vec![
            tab("TabManagerDialog.kt"),
            tab("build.gradle.kts"),
            tab("Tab.kt"),
            tab("my_file_name.txt"),
            tab("README.md"),
        ])
    }

    #[test]
    fn test_tab_info_defaults() {
        let info = TabInfo::new("/path/to/MyFile.kt", "MyFile.kt").modified(true);
        assert_eq!("/path/to/MyFile.kt", info.path);
        assert_eq!("MyFile.kt", info.display_name);
        assert!(info.is_modified);
        assert!(!info.is_selected);
    }

    #[test]
    fn test_tab_info_equality() {
        let original = tab("test.kt").modified(true).selected(true);
        let copy = TabInfo {
            is_modified: false,
            ..original.clone()
        };
        assert_eq!(original.path, copy.path);
        assert!(copy.is_selected);
        assert_ne!(original, copy);
        assert_eq!(tab("test.kt"), tab("test.kt"));
    }

    #[test]
    fn test_new_dedups_and_sorts() {
        let list = TabList::new(vec![
            tab("b.rs"),
            tab("A.rs"),
            tab("b.rs").modified(true),
            tab("c.rs"),
        ]);
        assert_eq!(vec!["A.rs", "b.rs", "c.rs"], names(&list));
        assert!(!list.tabs()[1].is_modified);
        assert_eq!(Some(0), list.highlighted_row());
        assert_eq!(3, list.len());
    }

    #[test]
    fn test_empty_list() {
        let mut list = TabList::new(Vec::new());
        assert!(list.is_empty());
        assert_eq!(None, list.highlighted_row());
        assert_eq!(None, list.toggle_highlighted());
        assert_eq!(
            Err(Error::RowOutOfRange { row: 0, len: 0 }),
            list.toggle(0)
        );
        list.move_highlight(1);
        assert_eq!(None, list.highlighted_row());
    }

    #[test]
    fn test_filter_ranks_by_score() {
        let mut list = sample();
        list.set_query("tab");
        assert_eq!(vec!["Tab.kt", "TabManagerDialog.kt"], names(&list));

        list.set_query("mfn");
        assert_eq!(vec!["my_file_name.txt"], names(&list));

        list.set_query("zzz");
        assert_eq!(0, list.visible_len());
        assert_eq!(None, list.highlighted());

        list.clear_query();
        assert_eq!("", list.query());
        assert_eq!(5, list.visible_len());
        assert_eq!(Some("build.gradle.kts"), list.get(0).map(|t| t.display_name.as_str()));
    }

    #[test]
    fn test_equal_scores_keep_name_order() {
        let mut list = TabList::new(vec![tab("xb"), tab("xa")]);
        list.set_query("x");
        assert_eq!(vec!["xa", "xb"], names(&list));
    }

    #[test]
    fn test_query_chars() {
        for ch in ['a', 'Z', 'é', 'ß', '界', '0', '9', '.', '-', '_'].iter() {
            assert!(is_query_char(*ch), "{:?}", ch);
        }
        for ch in [' ', '/', '²', '½', 'Ⅻ', '*'].iter() {
            assert!(!is_query_char(*ch), "{:?}", ch);
        }
    }

    #[test]
    fn test_query_editing() {
        let mut list = sample();
        assert!(list.push_query_char('t'));
        assert!(list.push_query_char('.'));
        assert!(!list.push_query_char(' '));
        assert!(!list.push_query_char('/'));
        assert!(!list.push_query_char('²'));
        assert!(!list.push_query_char('Ⅻ'));
        assert_eq!("t.", list.query());
        assert_eq!(Some('.'), list.pop_query_char());
        assert_eq!(Some('t'), list.pop_query_char());
        assert_eq!(None, list.pop_query_char());
        assert_eq!(5, list.visible_len());
    }

    #[test]
    fn test_highlight_restored_after_filter() {
        let mut list = sample();
        let row = list
            .visible()
            .position(|tab| tab.display_name == "TabManagerDialog.kt")
            .unwrap();
        list.set_highlight(row).unwrap();

        list.set_query("tmd");
        assert_eq!(Some(0), list.highlighted_row());
        list.clear_query();
        assert_eq!(
            Some("TabManagerDialog.kt"),
            list.highlighted().map(|t| t.display_name.as_str())
        );

        list.set_query("readme");
        list.set_query("tab");
        assert_eq!(Some(0), list.highlighted_row());
    }

    #[test]
    fn test_move_highlight_clamps() {
        let mut list = sample();
        list.move_highlight(-3);
        assert_eq!(Some(0), list.highlighted_row());
        list.move_highlight(2);
        assert_eq!(Some(2), list.highlighted_row());
        list.move_highlight(100);
        assert_eq!(Some(4), list.highlighted_row());
        assert_eq!(
            Err(Error::RowOutOfRange { row: 5, len: 5 }),
            list.set_highlight(5)
        );
    }

    #[test]
    fn test_selection_survives_filter() {
        let mut list = sample();
        list.set_query("tab");
        list.select_all();
        list.set_query("readme");
        assert_eq!(Some(true), list.toggle_highlighted());
        list.clear_query();

        let selected: Vec<&str> = list
            .selected()
            .iter()
            .map(|tab| tab.display_name.as_str())
            .collect();
        assert_eq!(vec!["README.md", "Tab.kt", "TabManagerDialog.kt"], selected);

        assert_eq!(Ok(false), list.toggle(list.visible_len() - 1));
        list.clear_selection();
        assert!(list.selected().is_empty());
    }

    #[test]
    fn test_remove_closed_tabs() {
        let mut list = sample();
        list.set_query("tab");
        list.select_all();
        let closed: Vec<String> = list.selected().iter().map(|tab| tab.path.clone()).collect();

        assert_eq!(2, list.remove(closed.iter().map(String::as_str)));
        assert_eq!(0, list.visible_len());
        list.clear_query();
        assert_eq!(
            vec!["build.gradle.kts", "my_file_name.txt", "README.md"],
            names(&list)
        );
        assert_eq!(0, list.remove(vec!["/nowhere"]));
    }

    fn highlighted_name(list: &TabList) -> Option<&str> {
        list.highlighted().map(|tab| tab.display_name.as_str())
    }

    #[test]
    fn test_remove_highlighted_last_tab() {
        let mut list = TabList::new(vec![tab("a"), tab("b"), tab("c")]);
        list.set_highlight(2).unwrap();

        assert_eq!(1, list.remove(vec!["/path/to/c"]));
        assert_eq!(Some(1), list.highlighted_row());
        assert_eq!(Some("b"), highlighted_name(&list));
    }

    #[test]
    fn test_remove_keeps_highlighted_tab() {
        let mut list = TabList::new(vec![tab("a"), tab("b"), tab("c"), tab("d")]);
        list.set_highlight(2).unwrap();

        assert_eq!(1, list.remove(vec!["/path/to/a"]));
        assert_eq!(Some("c"), highlighted_name(&list));
        assert_eq!(Some(1), list.highlighted_row());
    }

    #[test]
    fn test_remove_highlighted_middle_tab() {
        let mut list = TabList::new(vec![tab("a"), tab("b"), tab("c"), tab("d")]);
        list.set_highlight(1).unwrap();

        assert_eq!(1, list.remove(vec!["/path/to/b"]));
        assert_eq!(Some("c"), highlighted_name(&list));

        assert_eq!(3, list.remove(vec!["/path/to/a", "/path/to/c", "/path/to/d"]));
        assert_eq!(None, list.highlighted_row());
    }
}
