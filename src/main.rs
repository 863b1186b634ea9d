use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use huedeck::cli::Args;
use huedeck::document::Document;
use huedeck::favorites::Favorites;
use huedeck::grid::PaletteGrid;
use huedeck::render::{self, RenderOptions};
use huedeck::tui::{self, App};

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let mut grid = PaletteGrid::default();
    let mut favorites = Favorites::default();

    if let Some(path) = &args.config {
        Document::load(path)?.apply(&mut grid, &mut favorites);
    }
    if let Some(cols) = args.cols {
        grid.set_cols(cols);
    }
    if let Some(hue) = args.hue {
        grid.set_hue(hue);
    }

    let render_options = RenderOptions {
        cell_width: args.cell_width,
        cell_height: args.cell_height,
    };

    // --export / --png run headless and exit without entering the TUI.
    let mut headless = false;
    if let Some(path) = &args.export {
        Document::snapshot(&grid, &favorites).write_to(path)?;
        headless = true;
    }
    if let Some(path) = &args.png {
        render::write_png(&grid.matrix(), &render_options, path)?;
        headless = true;
    }
    if headless {
        return Ok(());
    }

    let export_path = args
        .config
        .unwrap_or_else(|| PathBuf::from("huedeck.ini"));
    tui::run(App::new(
        grid,
        favorites,
        export_path,
        PathBuf::from("huedeck.png"),
        render_options,
    ))
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .init();
}
