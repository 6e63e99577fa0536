//! Templates embedded at compile time from `templates/`.

pub const TABLE_TEMPLATE: &str = include_str!("templates/table.tmp");
pub const CONFIG_TEMPLATE: &str = include_str!("templates/config.tmp");
