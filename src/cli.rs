use std::path::PathBuf;

use clap::Parser;

/// Design HSV swatch grids and curate a favorites palette in the terminal.
#[derive(Parser, Debug)]
#[command(name = "huedeck", version, about)]
pub struct Args {
    /// Palette configuration (INI) to load on startup
    pub config: Option<PathBuf>,

    /// Write the configuration to this file and exit
    #[arg(short = 'o', long)]
    pub export: Option<PathBuf>,

    /// Render the swatch grid to this PNG and exit
    #[arg(long)]
    pub png: Option<PathBuf>,

    /// Column count (2-360; overrides the loaded configuration)
    #[arg(short, long)]
    pub cols: Option<i64>,

    /// Base hue in degrees (0-359; overrides the loaded configuration)
    #[arg(long)]
    pub hue: Option<i64>,

    /// Swatch cell width in pixels for PNG export
    #[arg(long, default_value_t = 96)]
    pub cell_width: u32,

    /// Swatch cell height in pixels for PNG export
    #[arg(long, default_value_t = 64)]
    pub cell_height: u32,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}
