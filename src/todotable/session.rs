//! # Table Session
//!
//! [`TableSession`] is the whole interactive state of one table: the record
//! store, the active query, the search snapshot and the derived working set.
//! It is an ordinary owned value; UIs create one after loading and feed it user
//! intents.
//!
//! ## Intents
//!
//! Each user intent is a [`TableEvent`] and maps to exactly one handler:
//!
//! | Event          | Handler            |
//! |----------------|--------------------|
//! | `search-input` | [`TableSession::apply_search`] |
//! | `search-clear` | [`TableSession::clear_search`] |
//! | `sort-change`  | [`TableSession::apply_sort`]   |
//! | `filter-change`| [`TableSession::apply_filter`] |
//! | `limit-change` | [`TableSession::set_limit`]    |
//! | `page-click`   | [`TableSession::go_to_page`]   |
//! | `prev-click`   | [`TableSession::prev_page`]    |
//! | `next-click`   | [`TableSession::next_page`]    |
//!
//! Every handler ends by rebuilding a [`TableView`]; that view is the only thing
//! a renderer ever reads.
//!
//! ## Recomposition
//!
//! The working set is never patched incrementally. After any change to search,
//! filter or sort it is rebuilt from the canonical chain:
//!
//! ```text
//! base = search snapshot, or the original dataset
//! working = sort(filter(base))
//! ```
//!
//! So clearing the filter keeps an active sort, clearing the sort keeps an
//! active filter, and neither ever re-runs the search.
//!
//! ## Page Rules
//!
//! - Search changes and clearing a filter or sort reset the query to page 1
//!   with the default page size.
//! - Any other change that leaves the current page past the end resets it to 1.
//! - Navigation clamps to the valid range; Prev on page 1 and Next on the last
//!   page do nothing.
//! - A page size larger than the visible record count is refused. If a filter
//!   later shrinks the set below the chosen size, the default size returns.

use crate::error::Result;
use crate::model::Record;
use crate::paginate::{
    self, LimitSelector, PageLimit, PaginationView, DEFAULT_GROUP_SIZE, DEFAULT_LIMIT,
    DEFAULT_LIMIT_OPTIONS,
};
use crate::pipeline::{self, FilterKey, SortKey};
use crate::records::RecordStore;
use serde::Serialize;

/// Tunables for a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableOptions {
    pub default_limit: usize,
    pub limit_options: Vec<usize>,
    pub group_size: usize,
}

impl Default for TableOptions {
    fn default() -> Self {
        Self {
            default_limit: DEFAULT_LIMIT,
            limit_options: DEFAULT_LIMIT_OPTIONS.to_vec(),
            group_size: DEFAULT_GROUP_SIZE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryState {
    pub page: usize,
    pub limit: PageLimit,
    /// The query text, present only while a search is active.
    pub search: Option<String>,
    /// Sort chain; empty when unsorted.
    pub sort: Vec<SortKey>,
    pub filter: Option<FilterKey>,
}

impl QueryState {
    fn new(default_limit: usize) -> Self {
        Self {
            page: 1,
            limit: PageLimit::Count(default_limit),
            search: None,
            sort: Vec::new(),
            filter: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableEvent {
    SearchInput(String),
    SearchClear,
    SortChange(Vec<SortKey>),
    FilterChange(Option<FilterKey>),
    LimitChange(PageLimit),
    PageClick(usize),
    PrevClick,
    NextClick,
}

impl TableEvent {
    pub fn name(&self) -> &'static str {
        match self {
            TableEvent::SearchInput(_) => "search-input",
            TableEvent::SearchClear => "search-clear",
            TableEvent::SortChange(_) => "sort-change",
            TableEvent::FilterChange(_) => "filter-change",
            TableEvent::LimitChange(_) => "limit-change",
            TableEvent::PageClick(_) => "page-click",
            TableEvent::PrevClick => "prev-click",
            TableEvent::NextClick => "next-click",
        }
    }
}

/// Everything a renderer needs for one frame.
#[derive(Debug, Clone, Serialize)]
pub struct TableView {
    pub columns: Vec<String>,
    pub rows: Vec<Record>,
    pub pagination: PaginationView,
    pub limit: LimitSelector,
    /// Resolved rows per page.
    pub page_size: usize,
    /// Records in the working set (after search, filter and sort).
    pub total_items: usize,
    /// Records in the original dataset.
    pub dataset_size: usize,
    pub search: Option<String>,
    pub sort: Vec<String>,
    pub filter: Option<String>,
}

impl TableView {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

pub struct TableSession {
    store: RecordStore,
    columns: Vec<String>,
    snapshot: Option<Vec<Record>>,
    working: Vec<Record>,
    state: QueryState,
    options: TableOptions,
}

impl TableSession {
    pub fn new(store: RecordStore, options: TableOptions) -> Self {
        let columns = store.columns();
        let working = store.working_copy();
        let state = QueryState::new(options.default_limit);
        Self {
            store,
            columns,
            snapshot: None,
            working,
            state,
            options,
        }
    }

    pub fn state(&self) -> &QueryState {
        &self.state
    }

    pub fn options(&self) -> &TableOptions {
        &self.options
    }

    pub fn working_set(&self) -> &[Record] {
        &self.working
    }

    pub fn search_snapshot(&self) -> Option<&[Record]> {
        self.snapshot.as_deref()
    }

    pub fn original(&self) -> &[Record] {
        self.store.original()
    }

    pub fn dispatch(&mut self, event: TableEvent) -> Result<TableView> {
        tracing::debug!(event = event.name(), "dispatch");
        match event {
            TableEvent::SearchInput(text) => Ok(self.apply_search(&text)),
            TableEvent::SearchClear => Ok(self.clear_search()),
            TableEvent::SortChange(keys) => Ok(self.apply_sort(keys)),
            TableEvent::FilterChange(key) => Ok(self.apply_filter(key)),
            TableEvent::LimitChange(limit) => self.set_limit(limit),
            TableEvent::PageClick(page) => Ok(self.go_to_page(page)),
            TableEvent::PrevClick => Ok(self.prev_page()),
            TableEvent::NextClick => Ok(self.next_page()),
        }
    }

    /// Searches the original dataset. Short queries clear the search instead.
    pub fn apply_search(&mut self, text: &str) -> TableView {
        match pipeline::search(self.store.original(), text) {
            Some(matched) => {
                tracing::debug!(query = text, matched = matched.len(), "search applied");
                self.snapshot = Some(matched);
                self.state.search = Some(text.to_string());
            }
            None => {
                self.snapshot = None;
                self.state.search = None;
            }
        }
        self.reset_paging();
        self.recompose();
        self.view()
    }

    pub fn clear_search(&mut self) -> TableView {
        self.snapshot = None;
        self.state.search = None;
        self.reset_paging();
        self.recompose();
        self.view()
    }

    /// Replaces the sort chain; an empty chain clears sorting.
    pub fn apply_sort(&mut self, keys: Vec<SortKey>) -> TableView {
        if keys.is_empty() {
            self.state.sort.clear();
            self.reset_paging();
        } else {
            self.state.sort = keys;
        }
        self.recompose();
        self.view()
    }

    pub fn apply_filter(&mut self, key: Option<FilterKey>) -> TableView {
        if key.is_none() {
            self.reset_paging();
        }
        self.state.filter = key;
        self.recompose();
        self.view()
    }

    /// Changes the page size. Sizes that do not fit the visible records are refused.
    pub fn set_limit(&mut self, limit: PageLimit) -> Result<TableView> {
        let limit = paginate::validate_limit(&self.options.limit_options, limit, self.working.len())?;
        self.state.limit = limit;
        self.settle_page();
        Ok(self.view())
    }

    pub fn go_to_page(&mut self, page: usize) -> TableView {
        self.state.page = paginate::clamp_page(page, self.total_pages());
        self.view()
    }

    pub fn next_page(&mut self) -> TableView {
        self.go_to_page(self.state.page.saturating_add(1))
    }

    pub fn prev_page(&mut self) -> TableView {
        self.go_to_page(self.state.page.saturating_sub(1))
    }

    pub fn total_pages(&self) -> usize {
        paginate::total_pages(self.working.len(), self.limit())
    }

    /// Builds the renderable view of the current state.
    pub fn view(&self) -> TableView {
        let total_items = self.working.len();
        let limit = self.limit();
        let pagination = paginate::pagination_window(
            total_items,
            limit,
            self.state.page,
            self.options.group_size,
        );
        let rows = paginate::visible_page(&self.working, pagination.current_page, limit);

        TableView {
            columns: self.columns.clone(),
            rows,
            pagination,
            limit: paginate::limit_selector(
                &self.options.limit_options,
                self.state.limit,
                total_items,
            ),
            page_size: limit,
            total_items,
            dataset_size: self.store.len(),
            search: self.state.search.clone(),
            sort: self.state.sort.iter().map(|k| k.code().to_string()).collect(),
            filter: self.state.filter.map(|k| k.code().to_string()),
        }
    }

    fn limit(&self) -> usize {
        self.state.limit.resolve(self.working.len())
    }

    fn reset_paging(&mut self) {
        self.state.page = 1;
        self.state.limit = PageLimit::Count(self.options.default_limit);
    }

    fn recompose(&mut self) {
        let base = self
            .snapshot
            .as_deref()
            .unwrap_or_else(|| self.store.original());
        self.working = pipeline::compose(base, self.state.filter, &self.state.sort);
        self.settle_limit();
        self.settle_page();
    }

    /// A chosen size that no longer fits the visible set falls back to the default.
    fn settle_limit(&mut self) {
        if let PageLimit::Count(n) = self.state.limit {
            if n > self.working.len() && n != self.options.default_limit {
                self.state.limit = PageLimit::Count(self.options.default_limit);
            }
        }
    }

    fn settle_page(&mut self) {
        if self.state.page > self.total_pages() {
            self.state.page = 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TableError;
    use crate::store::memory::fixtures::sample_records;
    use serde_json::json;

    fn session(count: usize) -> TableSession {
        TableSession::new(
            RecordStore::new(sample_records(count)),
            TableOptions::default(),
        )
    }

    fn ids(records: &[Record]) -> Vec<i64> {
        records.iter().filter_map(Record::id).collect()
    }

    #[test]
    fn starts_on_first_page_of_ten() {
        let s = session(23);
        let view = s.view();
        assert_eq!(view.rows.len(), 10);
        assert_eq!(view.pagination.total_pages, 3);
        assert_eq!(view.columns, vec!["userId", "id", "title", "completed"]);
        assert_eq!(view.limit.label, "10/23");
    }

    #[test]
    fn last_page_then_all_collapses_to_one_page() {
        let mut s = session(23);
        let view = s.go_to_page(3);
        assert_eq!(ids(&view.rows), vec![21, 22, 23]);

        let view = s.set_limit(PageLimit::All).unwrap();
        assert_eq!(view.pagination.total_pages, 1);
        assert_eq!(view.pagination.current_page, 1);
        assert_eq!(view.rows.len(), 23);
        assert_eq!(s.state().page, 1);
    }

    #[test]
    fn larger_limit_that_leaves_page_out_of_range_resets_to_first() {
        let mut s = session(45);
        s.go_to_page(5);
        let view = s.set_limit(PageLimit::Count(20)).unwrap();
        assert_eq!(view.pagination.current_page, 1);
    }

    #[test]
    fn limit_within_range_keeps_page() {
        let mut s = session(100);
        s.go_to_page(2);
        let view = s.set_limit(PageLimit::Count(20)).unwrap();
        assert_eq!(view.pagination.current_page, 2);
        assert_eq!(ids(&view.rows)[0], 21);
    }

    #[test]
    fn unavailable_limit_is_refused_without_state_change() {
        let mut s = session(23);
        s.go_to_page(2);
        let before = s.state().clone();

        let err = s.set_limit(PageLimit::Count(50)).unwrap_err();
        assert!(matches!(err, TableError::LimitUnavailable { .. }));
        assert_eq!(s.state(), &before);
    }

    #[test]
    fn navigation_clamps_at_both_ends() {
        let mut s = session(23);
        let view = s.prev_page();
        assert_eq!(view.pagination.current_page, 1);
        assert!(view.pagination.prev_disabled);

        s.go_to_page(99);
        assert_eq!(s.state().page, 3);
        let view = s.next_page();
        assert_eq!(view.pagination.current_page, 3);
        assert!(view.pagination.next_disabled);

        let view = s.go_to_page(0);
        assert_eq!(view.pagination.current_page, 1);
    }

    #[test]
    fn search_below_three_chars_is_a_noop() {
        let mut s = session(23);
        let view = s.apply_search("to");
        assert_eq!(view.total_items, 23);
        assert!(s.search_snapshot().is_none());
        assert_eq!(view.search, None);
    }

    #[test]
    fn search_keeps_snapshot_and_resets_paging() {
        let mut s = session(30);
        s.go_to_page(2);
        s.set_limit(PageLimit::Count(20)).unwrap();

        let view = s.apply_search("number 2");
        // "number 2" matches 2 and 20..=29.
        assert_eq!(view.total_items, 11);
        assert_eq!(s.search_snapshot().map(<[Record]>::len), Some(11));
        assert_eq!(s.state().page, 1);
        assert_eq!(s.state().limit, PageLimit::Count(10));
    }

    #[test]
    fn filter_and_sort_compose_on_top_of_search() {
        let mut s = session(30);
        s.apply_search("number 2");
        s.apply_filter(Some(FilterKey::CompletedTrue));
        let view = s.apply_sort(vec![SortKey::IdDesc]);
        // Completed among {2, 20..=29}: 21, 24, 27.
        assert_eq!(ids(&view.rows), vec![27, 24, 21]);
    }

    #[test]
    fn new_search_starts_from_the_original_dataset() {
        let mut s = session(30);
        s.apply_search("number 1");
        s.apply_filter(Some(FilterKey::CompletedTrue));
        s.apply_search("number 2");
        // Snapshot holds every "number 2" match, not a subset of the first search.
        assert_eq!(s.search_snapshot().map(<[Record]>::len), Some(11));
        // The active filter still applies on top.
        assert_eq!(ids(s.working_set()), vec![21, 24, 27]);
    }

    #[test]
    fn clearing_search_restores_the_full_dataset() {
        let mut s = session(23);
        s.apply_search("number 1");
        let view = s.clear_search();
        assert_eq!(view.total_items, 23);
        assert!(s.search_snapshot().is_none());

        s.apply_search("number 1");
        let view = s.apply_search("nu");
        assert_eq!(view.total_items, 23);
        assert!(s.search_snapshot().is_none());
    }

    #[test]
    fn clearing_filter_keeps_active_sort() {
        let mut s = session(12);
        s.apply_sort(vec![SortKey::IdDesc]);
        s.apply_filter(Some(FilterKey::CompletedFalse));
        let view = s.apply_filter(None);
        assert_eq!(view.total_items, 12);
        assert_eq!(ids(&view.rows)[..3], [12, 11, 10]);
        assert_eq!(s.state().page, 1);
    }

    #[test]
    fn clearing_sort_keeps_filter_and_resets_paging() {
        let mut s = session(60);
        s.apply_filter(Some(FilterKey::CompletedFalse));
        s.apply_sort(vec![SortKey::IdDesc]);
        s.set_limit(PageLimit::Count(20)).unwrap();
        s.go_to_page(2);

        let view = s.apply_sort(Vec::new());
        assert_eq!(view.total_items, 40);
        assert_eq!(ids(&view.rows)[..3], [1, 2, 4]);
        assert_eq!(s.state().page, 1);
        assert_eq!(s.state().limit, PageLimit::Count(10));
    }

    #[test]
    fn sort_keeps_current_page() {
        let mut s = session(30);
        s.go_to_page(2);
        let view = s.apply_sort(vec![SortKey::IdDesc]);
        assert_eq!(view.pagination.current_page, 2);
        assert_eq!(ids(&view.rows)[0], 20);
    }

    #[test]
    fn filter_that_shrinks_below_current_page_resets_to_first() {
        let mut s = session(30);
        s.go_to_page(3);
        let view = s.apply_filter(Some(FilterKey::CompletedTrue));
        assert_eq!(view.total_items, 10);
        assert_eq!(view.pagination.current_page, 1);
    }

    #[test]
    fn filter_with_no_matches_renders_one_empty_page() {
        let mut s = session(2); // ids 1 and 2, neither completed
        let view = s.apply_filter(Some(FilterKey::CompletedTrue));
        assert!(view.is_empty());
        assert_eq!(view.pagination.total_pages, 1);
        assert!(view.pagination.prev_disabled && view.pagination.next_disabled);
        assert_eq!(view.limit.label, "0/0");
    }

    #[test]
    fn all_limit_follows_the_visible_set() {
        let mut s = session(30);
        s.set_limit(PageLimit::All).unwrap();
        let view = s.apply_filter(Some(FilterKey::CompletedTrue));
        assert_eq!(view.rows.len(), 10);
        assert_eq!(view.limit.selected, "ALL");
    }

    #[test]
    fn narrowing_below_the_chosen_size_restores_the_default() {
        let mut s = session(60);
        s.set_limit(PageLimit::Count(50)).unwrap();

        // 20 of 60 are completed, so 50 no longer fits.
        let view = s.apply_filter(Some(FilterKey::CompletedTrue));
        assert_eq!(s.state().limit, PageLimit::Count(DEFAULT_LIMIT));
        assert_eq!(view.rows.len(), 10);
        assert_eq!(view.limit.selected, "10");
        assert_eq!(view.limit.label, "10/20");
        assert!(!view.limit.options.iter().any(|o| o.selected && o.disabled));

        // A size that still fits is kept.
        s.apply_filter(None);
        s.set_limit(PageLimit::Count(20)).unwrap();
        s.apply_filter(Some(FilterKey::CompletedTrue));
        assert_eq!(s.state().limit, PageLimit::Count(20));
    }

    #[test]
    fn empty_dataset_is_not_an_error() {
        let mut s = TableSession::new(RecordStore::default(), TableOptions::default());
        let view = s.apply_search("anything");
        assert!(view.columns.is_empty());
        assert!(view.is_empty());
        assert_eq!(view.pagination.total_pages, 1);
        assert!(s.set_limit(PageLimit::All).is_ok());
    }

    #[test]
    fn malformed_records_still_render() {
        let odd: Record = serde_json::from_value(json!({ "id": 5, "title": "partial" })).unwrap();
        let store = RecordStore::new(vec![odd, Record::todo(6, "full", true, 1)]);
        let mut s = TableSession::new(store, TableOptions::default());

        let view = s.apply_filter(Some(FilterKey::CompletedTrue));
        assert_eq!(ids(&view.rows), vec![6]);
        let view = s.apply_sort(vec![SortKey::TitleAsc]);
        assert_eq!(view.rows[0].cell("userId"), "1");
    }

    #[test]
    fn original_dataset_is_never_reordered() {
        let mut s = session(10);
        s.apply_sort(vec![SortKey::IdDesc]);
        s.apply_filter(Some(FilterKey::CompletedFalse));
        assert_eq!(ids(s.original()), (1..=10).collect::<Vec<_>>());
    }

    #[test]
    fn dispatch_routes_every_event() {
        let mut s = session(50);
        let events = vec![
            TableEvent::SearchInput("todo".into()),
            TableEvent::SortChange(vec![SortKey::TitleAsc]),
            TableEvent::FilterChange(Some(FilterKey::CompletedFalse)),
            TableEvent::LimitChange(PageLimit::Count(20)),
            TableEvent::PageClick(2),
            TableEvent::NextClick,
            TableEvent::PrevClick,
            TableEvent::SearchClear,
        ];
        for event in events {
            s.dispatch(event).unwrap();
        }
        assert_eq!(s.state().search, None);
        assert_eq!(s.state().sort, vec![SortKey::TitleAsc]);
        assert_eq!(s.state().filter, Some(FilterKey::CompletedFalse));
        assert_eq!(s.state().page, 1);
    }

    #[test]
    fn dispatch_surfaces_refused_limits() {
        let mut s = session(5);
        let result = s.dispatch(TableEvent::LimitChange(PageLimit::Count(10)));
        assert!(matches!(result, Err(TableError::LimitUnavailable { .. })));
    }

    #[test]
    fn event_names_match_view_intents() {
        assert_eq!(TableEvent::PageClick(1).name(), "page-click");
        assert_eq!(TableEvent::FilterChange(None).name(), "filter-change");
        assert_eq!(TableEvent::SearchInput(String::new()).name(), "search-input");
    }
}
