pub mod address;
pub mod artifact;
pub mod classify;
pub mod cli;
pub mod config;
pub mod dataset;
pub mod delivery;
pub mod error;
pub mod grid;
pub mod io_utils;
pub mod request;
pub mod table;

use std::{env, sync::OnceLock};

use anyhow::{Context, Result};
use clap::Parser;
use log::{LevelFilter, debug, info};

use crate::artifact::ArtifactOptions;
use crate::cli::{Cli, Commands};
use crate::config::Settings;
use crate::delivery::OutboxDispatcher;

pub use crate::error::{GridError, GridResult};

static LOGGER: OnceLock<()> = OnceLock::new();

fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("sheet_courier", LevelFilter::Info);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}

pub fn run() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    match cli.command {
        Commands::Render(args) => handle_render(&args),
        Commands::Preview(args) => handle_preview(&args),
        Commands::Address(args) => handle_address(&args),
        Commands::Deliver(args) => handle_deliver(&args),
    }
}

fn handle_render(args: &cli::RenderArgs) -> Result<()> {
    let encoding = io_utils::resolve_encoding(args.input_encoding.as_deref())?;
    let body = io_utils::read_body(&args.input, encoding)?;
    let options = ArtifactOptions {
        autofit: !args.no_autofit,
        ..ArtifactOptions::default()
    };
    let (payload, artifact) = request::render(&body, &args.output_dir, &options)?;
    debug!("Payload names {} recipient(s)", payload.recipients.len());
    println!("{}", artifact.path().display());
    Ok(())
}

fn handle_preview(args: &cli::PreviewArgs) -> Result<()> {
    let encoding = io_utils::resolve_encoding(args.input_encoding.as_deref())?;
    let body = io_utils::read_body(&args.input, encoding)?;
    let payload = dataset::Payload::parse(&body).context("Parsing request payload")?;
    let grid = grid::populate(&payload.dataset).context("Populating grid")?;
    table::print_grid(
        &grid,
        table::RenderOptions {
            limit: (args.rows > 0).then_some(args.rows),
            show_kinds: args.kinds,
        },
    );
    info!(
        "Previewed {} row(s) from {:?}",
        grid.row_count(),
        args.input
    );
    Ok(())
}

fn handle_address(args: &cli::AddressArgs) -> Result<()> {
    for &index in &args.indices {
        let letters = address::column_address(index)?;
        println!("{index}\t{letters}");
    }
    Ok(())
}

fn handle_deliver(args: &cli::DeliverArgs) -> Result<()> {
    let mut settings = match &args.config {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };
    if let Some(dir) = &args.output_dir {
        settings.output_dir = dir.clone();
    }
    if let Some(dir) = &args.outbox {
        settings.outbox_dir = dir.clone();
    }
    debug!("Settings: {settings:?}");

    let encoding = io_utils::resolve_encoding(args.input_encoding.as_deref())?;
    let body = io_utils::read_body(&args.input, encoding)?;
    let dispatcher = OutboxDispatcher::new(settings.outbox_dir.clone(), settings.mail.clone());
    let outcome = request::handle_request(&body, &settings, &dispatcher)?;
    match &outcome.receipt {
        Some(receipt) => println!("{}\t{}", receipt.message_id, receipt.location.display()),
        None => println!("not delivered: no recipients"),
    }
    Ok(())
}
