//! Browsing state: the visible catalog view and its page cursor.
//!
//! [`Browser`] ties the filter engine to the pager. Every recomputation of
//! the view (search, filter toggle, apply, reset) returns to page 1.

use serde::Serialize;

use crate::catalog::{Catalog, CatalogEntry};
use crate::filter::{self, FilterSelection, FilterValue};
use crate::pager::Pager;

/// Which operation produced the current view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewSource {
    /// Unfiltered catalog.
    All,
    /// Name search; category filters were not consulted.
    Search,
    /// Category filters; the search text was not consulted.
    Filters,
}

/// Filter selection, derived view and pager for one catalog.
#[derive(Debug, Clone)]
pub struct Browser {
    selection: FilterSelection,
    view: Vec<usize>,
    source: ViewSource,
    pager: Pager,
}

impl Browser {
    /// Start with the full catalog visible on page 1.
    pub fn new(catalog: &Catalog) -> Self {
        Self {
            selection: FilterSelection::default(),
            view: (0..catalog.len()).collect(),
            source: ViewSource::All,
            pager: Pager::default(),
        }
    }

    pub fn selection(&self) -> &FilterSelection {
        &self.selection
    }

    pub fn source(&self) -> ViewSource {
        self.source
    }

    /// Edit the pending search text without touching the view.
    pub fn set_search_text(&mut self, text: impl Into<String>) {
        self.selection.search = text.into();
    }

    /// Replace the view with the name-search result for the pending text.
    pub fn search(&mut self, catalog: &Catalog) -> usize {
        self.replace_view(
            filter::search_by_name(catalog, &self.selection.search),
            ViewSource::Search,
        )
    }

    /// Flip a category value and immediately re-apply category filters.
    /// Returns `true` if the value is now active.
    pub fn toggle_filter(&mut self, catalog: &Catalog, value: FilterValue) -> bool {
        let active = self.selection.toggle(value);
        self.apply_filters(catalog);
        active
    }

    /// Replace the view with the category-filter result.
    pub fn apply_filters(&mut self, catalog: &Catalog) -> usize {
        self.replace_view(
            filter::apply_category_filters(catalog, &self.selection),
            ViewSource::Filters,
        )
    }

    /// Clear every category and the search text, showing the full catalog.
    pub fn reset(&mut self, catalog: &Catalog) {
        self.selection.clear();
        self.replace_view((0..catalog.len()).collect(), ViewSource::All);
    }

    fn replace_view(&mut self, view: Vec<usize>, source: ViewSource) -> usize {
        tracing::debug!(?source, visible = view.len(), "Catalog view recomputed");
        self.view = view;
        self.source = source;
        self.pager.reset();
        self.view.len()
    }

    // ---- view access ----

    pub fn visible_count(&self) -> usize {
        self.view.len()
    }

    /// Every visible entry, in catalog order.
    pub fn visible<'a>(&self, catalog: &'a Catalog) -> Vec<&'a CatalogEntry> {
        self.view.iter().filter_map(|&i| catalog.get(i)).collect()
    }

    /// Visible entries on the current page.
    pub fn current_page_entries<'a>(&self, catalog: &'a Catalog) -> Vec<&'a CatalogEntry> {
        self.pager
            .slice(&self.view)
            .iter()
            .filter_map(|&i| catalog.get(i))
            .collect()
    }

    // ---- paging ----

    pub fn page(&self) -> usize {
        self.pager.page()
    }

    pub fn total_pages(&self) -> usize {
        self.pager.total_pages(self.view.len())
    }

    pub fn next_page(&mut self) -> bool {
        self.pager.next(self.view.len())
    }

    pub fn prev_page(&mut self) -> bool {
        self.pager.prev()
    }

    pub fn go_to_page(&mut self, page: usize) -> usize {
        self.pager.go_to(page, self.view.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ShowStatus;

    /// 25 entries: even positions are adventures, odd ones romances.
    fn catalog() -> Catalog {
        let entries = (0..25)
            .map(|i| {
                let genre = if i % 2 == 0 { "冒險" } else { "戀愛" };
                CatalogEntry::new(format!("Show {i:02}"), ShowStatus::Completed)
                    .with_genres([genre])
            })
            .collect();
        Catalog::new(entries).unwrap()
    }

    #[test]
    fn starts_with_full_catalog() {
        let c = catalog();
        let browser = Browser::new(&c);
        assert_eq!(browser.visible_count(), 25);
        assert_eq!(browser.source(), ViewSource::All);
        assert_eq!(browser.total_pages(), 3);
        assert_eq!(browser.current_page_entries(&c).len(), 12);
    }

    #[test]
    fn search_text_only_applies_on_search() {
        let c = catalog();
        let mut browser = Browser::new(&c);
        browser.set_search_text("show 1");
        assert_eq!(browser.visible_count(), 25);

        assert_eq!(browser.search(&c), 10);
        assert_eq!(browser.source(), ViewSource::Search);
    }

    #[test]
    fn search_ignores_active_filters() {
        let c = catalog();
        let mut browser = Browser::new(&c);
        browser.toggle_filter(&c, FilterValue::Genre("冒險".into()));
        assert_eq!(browser.visible_count(), 13);

        browser.set_search_text("");
        assert_eq!(browser.search(&c), 25);
    }

    #[test]
    fn filters_ignore_search_text() {
        let c = catalog();
        let mut browser = Browser::new(&c);
        browser.set_search_text("Show 00");
        browser.search(&c);
        assert_eq!(browser.visible_count(), 1);

        assert!(browser.toggle_filter(&c, FilterValue::Genre("戀愛".into())));
        assert_eq!(browser.visible_count(), 12);
        assert_eq!(browser.source(), ViewSource::Filters);
    }

    #[test]
    fn recomputation_returns_to_first_page() {
        let c = catalog();
        let mut browser = Browser::new(&c);
        browser.go_to_page(3);
        assert_eq!(browser.current_page_entries(&c).len(), 1);

        browser.apply_filters(&c);
        assert_eq!(browser.page(), 1);

        browser.next_page();
        browser.search(&c);
        assert_eq!(browser.page(), 1);
    }

    #[test]
    fn reset_clears_selection_and_restores_catalog() {
        let c = catalog();
        let mut browser = Browser::new(&c);
        browser.toggle_filter(&c, FilterValue::Genre("冒險".into()));
        browser.set_search_text("x");
        browser.next_page();

        browser.reset(&c);
        assert_eq!(browser.selection(), &FilterSelection::default());
        assert_eq!(browser.visible_count(), 25);
        assert_eq!(browser.page(), 1);
        assert_eq!(browser.source(), ViewSource::All);
    }

    #[test]
    fn visible_preserves_catalog_order() {
        let c = catalog();
        let mut browser = Browser::new(&c);
        browser.toggle_filter(&c, FilterValue::Genre("戀愛".into()));
        let names: Vec<&str> = browser
            .visible(&c)
            .iter()
            .take(3)
            .map(|e| e.name.as_str())
            .collect();
        assert_eq!(names, vec!["Show 01", "Show 03", "Show 05"]);
    }

    #[test]
    fn paging_is_clamped() {
        let c = catalog();
        let mut browser = Browser::new(&c);
        assert!(!browser.prev_page());
        assert_eq!(browser.go_to_page(9), 3);
        assert!(!browser.next_page());
    }
}
