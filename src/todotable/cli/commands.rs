//! # CLI Layer
//!
//! This module is **one possible UI client** for todotable. It is the only
//! place that knows about stdout, stderr and terminal capabilities.
//!
//! ## Responsibilities
//!
//! 1. **Argument Parsing**: clap turns shell arguments into [`Commands`]
//! 2. **Context Setup**: logging, config, cache directory, HTTP source
//! 3. **API Dispatch**: load a session through [`TableApi`]
//! 4. **Output**: render the resulting view and messages
//!
//! Errors bubble up to `main`, which prints `Error: …` and exits 1.

use super::browse::run_browse;
use super::render::{print_messages, Renderer};
use super::setup::{Cli, Commands, ConfigAction, ListArgs};
use clap::Parser;
use std::io::{self, IsTerminal};
use std::path::PathBuf;
use todotable::api::TableApi;
use todotable::config::{default_config_path, TableConfig};
use todotable::error::Result;
use todotable::source::HttpSource;
use todotable::store::fs::FileCache;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

struct AppContext {
    api: TableApi<FileCache, HttpSource>,
    renderer: Renderer,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if cli.no_color {
        colored::control::set_override(false);
    }
    let use_color = !cli.no_color && io::stdout().is_terminal();

    let config_path = cli.config.clone().or_else(default_config_path);
    let config = TableConfig::load(config_path.as_deref())?;
    tracing::debug!(path = ?config_path, "configuration loaded");

    match cli.command {
        Some(Commands::Config { action }) => {
            handle_config(&config, config_path, action.unwrap_or(ConfigAction::Show), use_color)
        }
        Some(Commands::Browse) => {
            let mut ctx = init_context(&config, use_color)?;
            handle_browse(&mut ctx)
        }
        Some(Commands::List(args)) => {
            let mut ctx = init_context(&config, use_color)?;
            handle_list(&mut ctx, args)
        }
        None => {
            let mut ctx = init_context(&config, use_color)?;
            handle_list(&mut ctx, ListArgs::default())
        }
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    // A second init (e.g. in tests) is harmless, so the error is dropped.
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_level.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .try_init();
}

fn init_context(config: &TableConfig, use_color: bool) -> Result<AppContext> {
    let cache = FileCache::new(config.resolved_cache_dir()?);
    let source = HttpSource::new(config.source_url.clone(), config.timeout());
    let api = TableApi::new(cache, source, config.cache_key.clone(), config.table_options());
    let renderer = Renderer::new(use_color)?;
    Ok(AppContext { api, renderer })
}

fn handle_list(ctx: &mut AppContext, args: ListArgs) -> Result<()> {
    let result = ctx.api.list(&args.into_query())?;
    if let Some(view) = &result.view {
        println!("{}", ctx.renderer.render_table(view)?);
    }
    print_messages(&result.messages);
    Ok(())
}

fn handle_browse(ctx: &mut AppContext) -> Result<()> {
    let mut session = ctx.api.load_session()?;
    let stdin = io::stdin();
    let prompt = stdin.is_terminal();
    let mut stdout = io::stdout().lock();
    run_browse(&mut session, &ctx.renderer, stdin.lock(), &mut stdout, prompt)
}

fn handle_config(
    config: &TableConfig,
    path: Option<PathBuf>,
    action: ConfigAction,
    use_color: bool,
) -> Result<()> {
    match action {
        ConfigAction::Show => {
            let renderer = Renderer::new(use_color)?;
            let path = path.map(|p| p.display().to_string());
            print!("{}", renderer.render_config(&config.entries(), path)?);
        }
        ConfigAction::Path => match path {
            Some(path) => println!("{}", path.display()),
            None => println!("(no config directory available)"),
        },
        ConfigAction::Gen => print!("{}", TableConfig::template()),
    }
    Ok(())
}
