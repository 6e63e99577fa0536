//! # Paginator
//!
//! Slices the visible dataset into pages and works out what the page widget
//! shows. Pages are 1-based. Nothing here fails: out-of-range requests produce
//! empty slices or clamped page numbers.
//!
//! ## The Page Window
//!
//! The widget renders, in order:
//!
//! ```text
//! [Prev] [1] [...] [w0 w1 w2 w3 w4] [...] [last] [Next]
//! ```
//!
//! - The window holds up to `group_size` pages starting `group_size / 2` pages
//!   before the current one (never before page 1). It never holds the last
//!   page, which is always rendered on its own.
//! - Page 1 is rendered on its own whenever the window starts after it.
//! - A gap of two or more hidden pages becomes an ellipsis. A gap of exactly
//!   one page shows that page instead, since an ellipsis would take the same room.
//! - With a single page there is no window and no ellipsis; both Prev and Next
//!   are disabled.
//!
//! An empty dataset still has one (empty) page.

use crate::error::{Result, TableError};
use crate::model::Record;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

pub const DEFAULT_GROUP_SIZE: usize = 5;
pub const DEFAULT_LIMIT: usize = 10;
pub const DEFAULT_LIMIT_OPTIONS: [usize; 4] = [10, 20, 50, 100];

/// Requested page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageLimit {
    Count(usize),
    /// Everything on one page.
    All,
}

impl PageLimit {
    /// Concrete page size for a dataset of `total_items`; never zero.
    pub fn resolve(&self, total_items: usize) -> usize {
        match self {
            PageLimit::Count(n) => (*n).max(1),
            PageLimit::All => total_items.max(1),
        }
    }
}

impl fmt::Display for PageLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageLimit::Count(n) => write!(f, "{}", n),
            PageLimit::All => f.write_str("ALL"),
        }
    }
}

impl FromStr for PageLimit {
    type Err = TableError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("all") {
            return Ok(PageLimit::All);
        }
        match s.parse::<usize>() {
            Ok(n) if n >= 1 => Ok(PageLimit::Count(n)),
            _ => Err(TableError::InvalidInput(format!("Invalid page size: {}", s))),
        }
    }
}

pub fn total_pages(total_items: usize, limit: usize) -> usize {
    total_items.div_ceil(limit.max(1)).max(1)
}

pub fn clamp_page(page: usize, total_pages: usize) -> usize {
    page.clamp(1, total_pages.max(1))
}

/// The records on `page`: the half-open range `[(page-1)*limit, page*limit)`.
pub fn visible_page(records: &[Record], page: usize, limit: usize) -> Vec<Record> {
    if page == 0 || limit == 0 {
        return Vec::new();
    }
    let Some(start) = (page - 1).checked_mul(limit) else {
        return Vec::new();
    };
    if start >= records.len() {
        return Vec::new();
    }
    let end = start.saturating_add(limit).min(records.len());
    records[start..end].to_vec()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaginationView {
    pub total_pages: usize,
    pub current_page: usize,
    /// `Some(1)` when page 1 is rendered ahead of the window.
    pub first_page: Option<usize>,
    pub leading_ellipsis: bool,
    pub window: Vec<usize>,
    pub trailing_ellipsis: bool,
    pub last_page: usize,
    pub prev_disabled: bool,
    pub next_disabled: bool,
}

/// One element of the page widget, in display order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PageLink {
    Prev { disabled: bool },
    Page { number: usize, active: bool },
    Ellipsis,
    Next { disabled: bool },
}

impl PaginationView {
    pub fn links(&self) -> Vec<PageLink> {
        let page = |number: usize| PageLink::Page {
            number,
            active: number == self.current_page,
        };

        let mut links = vec![PageLink::Prev {
            disabled: self.prev_disabled,
        }];
        if let Some(first) = self.first_page {
            links.push(page(first));
        }
        if self.leading_ellipsis {
            links.push(PageLink::Ellipsis);
        }
        links.extend(self.window.iter().copied().map(page));
        if self.trailing_ellipsis {
            links.push(PageLink::Ellipsis);
        }
        links.push(page(self.last_page));
        links.push(PageLink::Next {
            disabled: self.next_disabled,
        });
        links
    }
}

pub fn pagination_window(
    total_items: usize,
    limit: usize,
    current_page: usize,
    group_size: usize,
) -> PaginationView {
    let total = total_pages(total_items, limit);
    let current = clamp_page(current_page, total);
    let group = group_size.max(1);

    let start = current.saturating_sub(group / 2).max(1);
    // The window never holds the last page.
    let mut window: Vec<usize> = (start..start.saturating_add(group).min(total)).collect();

    // First page shown after page 1, or the last page when the window is empty.
    let lo = window.first().copied().unwrap_or(total);
    let mut first_page = None;
    let mut leading_ellipsis = false;
    if lo > 1 {
        first_page = Some(1);
        match lo - 2 {
            0 => {}
            1 => window.insert(0, 2),
            _ => leading_ellipsis = true,
        }
    }

    let hi = window.last().copied().unwrap_or(total - 1);
    let mut trailing_ellipsis = false;
    match total.saturating_sub(hi + 1) {
        0 => {}
        1 => window.push(hi + 1),
        _ => trailing_ellipsis = true,
    }

    PaginationView {
        total_pages: total,
        current_page: current,
        first_page,
        leading_ellipsis,
        window,
        trailing_ellipsis,
        last_page: total,
        prev_disabled: current <= 1,
        next_disabled: current >= total,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LimitOption {
    pub value: String,
    pub disabled: bool,
    pub selected: bool,
}

/// State of the page-size selector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LimitSelector {
    pub options: Vec<LimitOption>,
    pub selected: String,
    /// `shown/total`, e.g. `10/23`.
    pub label: String,
}

pub fn limit_selector(options: &[usize], limit: PageLimit, total_items: usize) -> LimitSelector {
    let selected = match limit {
        PageLimit::Count(n) if n != total_items => n.to_string(),
        _ => PageLimit::All.to_string(),
    };
    let shown = limit.resolve(total_items).min(total_items);

    let mut entries: Vec<LimitOption> = options
        .iter()
        .map(|n| LimitOption {
            value: n.to_string(),
            disabled: *n > total_items,
            selected: n.to_string() == selected,
        })
        .collect();
    entries.push(LimitOption {
        value: PageLimit::All.to_string(),
        disabled: false,
        selected: selected == PageLimit::All.to_string(),
    });

    LimitSelector {
        options: entries,
        selected,
        label: format!("{}/{}", shown, total_items),
    }
}

/// Accepts `ALL` or an offered page size that fits the dataset.
pub fn validate_limit(options: &[usize], limit: PageLimit, total_items: usize) -> Result<PageLimit> {
    match limit {
        PageLimit::All => Ok(limit),
        PageLimit::Count(n) if !options.contains(&n) => Err(TableError::InvalidInput(format!(
            "Page size {} is not offered (choose from {})",
            n,
            options
                .iter()
                .map(usize::to_string)
                .chain(std::iter::once(PageLimit::All.to_string()))
                .collect::<Vec<_>>()
                .join(", ")
        ))),
        PageLimit::Count(n) if n > total_items => Err(TableError::LimitUnavailable {
            requested: n,
            available: total_items,
        }),
        PageLimit::Count(_) => Ok(limit),
    }
}
