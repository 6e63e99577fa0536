//! # Rendering Module
//!
//! Turns a [`TableView`] into terminal text through minijinja templates.
//!
//! Layout calculations (column widths, truncation, padding) stay in Rust
//! because they need Unicode-aware width handling. Templates only decide
//! structure and pick a style name for each piece; the `style` filter maps
//! that name to a `console::Style` from [`TABLE_THEME`].

use super::styles::{names, TABLE_THEME};
use super::templates::{CONFIG_TEMPLATE, TABLE_TEMPLATE};
use colored::Colorize;
use minijinja::{Environment, Value};
use serde::Serialize;
use serde_json::Value as Json;
use todotable::api::{CmdMessage, MessageLevel};
use todotable::error::{Result, TableError};
use todotable::model::{self, Record};
use todotable::paginate::PageLink;
use todotable::session::TableView;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Cells wider than this are truncated with an ellipsis.
pub const MAX_CELL_WIDTH: usize = 48;
pub const ELLIPSIS: &str = "…";
pub const MISSING_STYLE_INDICATOR: &str = "(!?)";

const TABLE: &str = "table";
const CONFIG: &str = "config";

#[derive(Serialize)]
struct CellData {
    text: String,
    style: &'static str,
}

#[derive(Serialize)]
struct LinkData {
    text: String,
    style: &'static str,
}

#[derive(Serialize)]
struct TableData {
    empty: bool,
    empty_message: String,
    header: String,
    rule: String,
    rows: Vec<Vec<CellData>>,
    pages: Vec<LinkData>,
    limits: Vec<LinkData>,
    limit_label: String,
    summary: String,
}

#[derive(Serialize)]
struct ConfigEntry {
    key: String,
    value: String,
}

#[derive(Serialize)]
struct ConfigData {
    entries: Vec<ConfigEntry>,
    path: Option<String>,
}

/// Renderer holding the compiled templates.
pub struct Renderer {
    env: Environment<'static>,
}

impl Renderer {
    pub fn new(use_color: bool) -> Result<Self> {
        let mut env = Environment::new();
        register_style_filter(&mut env, use_color);
        env.add_template(TABLE, TABLE_TEMPLATE)
            .and_then(|_| env.add_template(CONFIG, CONFIG_TEMPLATE))
            .map_err(render_error)?;
        Ok(Self { env })
    }

    pub fn render_table(&self, view: &TableView) -> Result<String> {
        self.render(TABLE, &table_data(view))
    }

    pub fn render_config(
        &self,
        entries: &[(&str, String)],
        path: Option<String>,
    ) -> Result<String> {
        let data = ConfigData {
            entries: entries
                .iter()
                .map(|(key, value)| ConfigEntry {
                    key: key.to_string(),
                    value: value.clone(),
                })
                .collect(),
            path,
        };
        self.render(CONFIG, &data)
    }

    fn render<T: Serialize>(&self, name: &str, data: &T) -> Result<String> {
        let tmpl = self.env.get_template(name).map_err(render_error)?;
        tmpl.render(data).map_err(render_error)
    }
}

fn render_error(err: minijinja::Error) -> TableError {
    TableError::Render(err.to_string())
}

fn register_style_filter(env: &mut Environment<'static>, use_color: bool) {
    env.add_filter("style", move |value: Value, name: String| -> String {
        let text = value.to_string();
        match TABLE_THEME.get(name.as_str()) {
            Some(style) if use_color => style.apply_to(text).force_styling(true).to_string(),
            Some(_) => text,
            None => format!("{} {}", MISSING_STYLE_INDICATOR, text),
        }
    });
}

pub(super) fn format_message(message: &CmdMessage) -> String {
    match message.level {
        MessageLevel::Info => message.content.dimmed().to_string(),
        MessageLevel::Warning => message.content.yellow().to_string(),
    }
}

pub(super) fn print_messages(messages: &[CmdMessage]) {
    for message in messages {
        eprintln!("{}", format_message(message));
    }
}

fn table_data(view: &TableView) -> TableData {
    let widths = column_widths(&view.columns, &view.rows);

    let header = view
        .columns
        .iter()
        .zip(&widths)
        .map(|(column, width)| pad_right(&truncate(column, *width), *width))
        .collect::<Vec<_>>()
        .join("  ");
    let rule = widths
        .iter()
        .map(|w| "-".repeat(*w))
        .collect::<Vec<_>>()
        .join("  ");

    let rows = view
        .rows
        .iter()
        .map(|record| {
            view.columns
                .iter()
                .zip(&widths)
                .map(|(column, width)| cell_data(record, column, *width))
                .collect()
        })
        .collect();

    let pages = view
        .pagination
        .links()
        .into_iter()
        .map(|link| match link {
            PageLink::Prev { disabled } => LinkData {
                text: "< Prev".to_string(),
                style: if disabled { names::DISABLED } else { names::LINK },
            },
            PageLink::Next { disabled } => LinkData {
                text: "Next >".to_string(),
                style: if disabled { names::DISABLED } else { names::LINK },
            },
            PageLink::Page { number, active } => LinkData {
                text: if active {
                    format!("[{}]", number)
                } else {
                    number.to_string()
                },
                style: if active { names::ACTIVE } else { names::LINK },
            },
            PageLink::Ellipsis => LinkData {
                text: "...".to_string(),
                style: names::MUTED,
            },
        })
        .collect();

    let limits = view
        .limit
        .options
        .iter()
        .map(|option| LinkData {
            text: if option.selected {
                format!("[{}]", option.value)
            } else {
                option.value.clone()
            },
            style: if option.selected {
                names::ACTIVE
            } else if option.disabled {
                names::DISABLED
            } else {
                names::LINK
            },
        })
        .collect();

    TableData {
        empty: view.rows.is_empty(),
        empty_message: if view.dataset_size == 0 {
            "No records loaded.".to_string()
        } else {
            "No records match the current query.".to_string()
        },
        header,
        rule,
        rows,
        pages,
        limits,
        limit_label: view.limit.label.clone(),
        summary: summary(view),
    }
}

fn cell_data(record: &Record, column: &str, width: usize) -> CellData {
    let value = record.fields().get(column);
    let text = truncate(&record.cell(column), width);
    let style = match value {
        Some(Json::Bool(true)) if column == model::COMPLETED => names::DONE,
        Some(Json::Bool(false)) if column == model::COMPLETED => names::PENDING,
        _ => names::CELL,
    };
    let text = match value {
        Some(Json::Number(_)) => pad_left(&text, width),
        _ => pad_right(&text, width),
    };
    CellData { text, style }
}

fn summary(view: &TableView) -> String {
    let mut parts = Vec::new();
    if view.rows.is_empty() {
        parts.push(format!("0 of {} records", view.total_items));
    } else {
        let start = (view.pagination.current_page - 1) * view.page_size + 1;
        let end = start + view.rows.len() - 1;
        parts.push(format!(
            "Showing {}-{} of {} records",
            start, end, view.total_items
        ));
    }
    if view.total_items != view.dataset_size {
        parts.push(format!("{} loaded", view.dataset_size));
    }
    if let Some(search) = &view.search {
        parts.push(format!("search: \"{}\"", search));
    }
    if let Some(filter) = &view.filter {
        parts.push(format!("filter: {}", filter));
    }
    if !view.sort.is_empty() {
        parts.push(format!("sort: {}", view.sort.join(", ")));
    }
    parts.join(" | ")
}

fn column_widths(columns: &[String], rows: &[Record]) -> Vec<usize> {
    columns
        .iter()
        .map(|column| {
            rows.iter()
                .map(|record| record.cell(column).width())
                .chain(std::iter::once(column.width()))
                .max()
                .unwrap_or(0)
                .min(MAX_CELL_WIDTH)
        })
        .collect()
}

/// Cuts `text` to at most `width` columns, ending in an ellipsis when cut.
pub fn truncate(text: &str, width: usize) -> String {
    if text.width() <= width {
        return text.to_string();
    }
    let budget = width.saturating_sub(ELLIPSIS.width());
    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push_str(ELLIPSIS);
    out
}

fn pad_right(text: &str, width: usize) -> String {
    format!("{}{}", text, " ".repeat(width.saturating_sub(text.width())))
}

fn pad_left(text: &str, width: usize) -> String {
    format!("{}{}", " ".repeat(width.saturating_sub(text.width())), text)
}
