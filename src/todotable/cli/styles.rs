use console::Style;
use once_cell::sync::Lazy;
use std::collections::HashMap;

pub mod names {
    pub const CELL: &str = "cell";
    pub const DONE: &str = "done";
    pub const PENDING: &str = "pending";
    pub const LINK: &str = "link";
    pub const ACTIVE: &str = "active";
    pub const DISABLED: &str = "disabled";
    pub const MUTED: &str = "muted";
}

pub static TABLE_THEME: Lazy<HashMap<&'static str, Style>> = Lazy::new(|| {
    HashMap::from([
        ("header", Style::new().bold()),
        ("rule", Style::new().dim()),
        (names::CELL, Style::new()),
        (names::DONE, Style::new().green()),
        (names::PENDING, Style::new().yellow()),
        (names::LINK, Style::new().cyan()),
        (names::ACTIVE, Style::new().bold().reverse()),
        (names::DISABLED, Style::new().dim()),
        (names::MUTED, Style::new().color256(246).italic()),
    ])
});
