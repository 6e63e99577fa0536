mod browse;
mod commands;
mod render;
mod setup;
mod styles;
mod templates;

pub use commands::run;
