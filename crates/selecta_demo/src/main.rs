//! Selecta demo
//!
//! Mount a select control, drive it with scripted steps, and print the
//! resulting view as HTML.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod config;
mod mock;
mod script;

use config::DemoConfig;
use script::Step;
use selecta_core::{Document, SelectControl, SelectOption};

#[derive(Parser)]
#[command(name = "selecta")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Searchable multi-select dropdown demo", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Option file (.toml or .json); uses built-in mock data if omitted
    #[arg(short, long)]
    options: Option<PathBuf>,

    /// Interaction step, repeatable: type:<text>, enter, escape,
    /// click-field, focus, toggle:<label>, clear, outside
    #[arg(short, long = "step")]
    steps: Vec<Step>,

    /// Reference font for chip measurement
    #[arg(long, default_value = "14px Arial")]
    font: String,
}

fn labels(options: &[SelectOption]) -> String {
    options
        .iter()
        .map(|opt| opt.label.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging; stdout carries the HTML
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let demo = match &cli.options {
        Some(path) => DemoConfig::load(path)?,
        None => mock::demo_config(),
    };

    let config = demo
        .builder()
        .font(cli.font.as_str())
        .on_change(|selected| info!(selected = %labels(selected), "selection changed"))
        .on_new_item_added(|item, all| {
            info!(label = %item.label, options = all.len(), "new item added")
        })
        .build()
        .context("Invalid control configuration")?;

    let document = Document::new();
    let control = SelectControl::mount(config, &document);

    for step in &cli.steps {
        step.apply(&control, &document);
    }

    info!(
        selected = %labels(&control.selection()),
        open = control.is_open(),
        "final state"
    );
    println!("{}", control.render().to_html());

    control.unmount();
    Ok(())
}
