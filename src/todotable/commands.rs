//! # Commands
//!
//! Pure query logic on top of [`TableSession`]: a [`ListQuery`] is applied as a
//! sequence of table intents and the result comes back as a [`CmdResult`]
//! holding the final view plus any user-facing messages. Nothing here prints.
//!
//! Intents are replayed in the order a user would click them: search, filter,
//! sort, page size, page. Because search resets paging, this order means the
//! requested page and size always survive.

use crate::error::{Result, TableError};
use crate::paginate::PageLimit;
use crate::pipeline::{self, FilterKey, SortKey};
use crate::session::{TableEvent, TableSession, TableView};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageLevel {
    Info,
    Warning,
}

#[derive(Debug, Clone, Serialize)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct CmdResult {
    pub view: Option<TableView>,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_view(mut self, view: TableView) -> Self {
        self.view = Some(view);
        self
    }
}

/// One-shot query, as given on the command line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery {
    pub search: Option<String>,
    pub filter: Option<FilterKey>,
    pub sort: Vec<SortKey>,
    pub limit: Option<PageLimit>,
    pub page: Option<usize>,
}

impl ListQuery {
    /// The intents this query stands for, in replay order.
    pub fn events(&self) -> Vec<TableEvent> {
        let mut events = Vec::new();
        if let Some(text) = &self.search {
            events.push(TableEvent::SearchInput(text.clone()));
        }
        if self.filter.is_some() {
            events.push(TableEvent::FilterChange(self.filter));
        }
        if !self.sort.is_empty() {
            events.push(TableEvent::SortChange(self.sort.clone()));
        }
        if let Some(limit) = self.limit {
            events.push(TableEvent::LimitChange(limit));
        }
        if let Some(page) = self.page {
            events.push(TableEvent::PageClick(page));
        }
        events
    }
}

/// Applies `query` to `session`. Refused page sizes become warnings, not errors.
pub fn run_query(session: &mut TableSession, query: &ListQuery) -> Result<CmdResult> {
    let mut result = CmdResult::default();

    if let Some(text) = &query.search {
        if !text.is_empty() && !pipeline::is_search_active(text) {
            result.add_message(CmdMessage::info(format!(
                "Search needs at least {} characters; showing all records",
                pipeline::MIN_SEARCH_LEN
            )));
        }
    }

    for event in query.events() {
        let requested_page = match &event {
            TableEvent::PageClick(page) => Some(*page),
            _ => None,
        };

        match session.dispatch(event) {
            Ok(view) => {
                if let Some(page) = requested_page {
                    if page != view.pagination.current_page {
                        result.add_message(CmdMessage::info(format!(
                            "Page {} is out of range; showing page {} of {}",
                            page, view.pagination.current_page, view.pagination.total_pages
                        )));
                    }
                }
            }
            Err(e @ TableError::LimitUnavailable { .. }) => {
                result.add_message(CmdMessage::warning(e.to_string()));
            }
            Err(e) => return Err(e),
        }
    }

    Ok(result.with_view(session.view()))
}
