use std::path::PathBuf;

use clap::Parser;

use measure_image::config::load_config;
use measure_image::{gui_app, logging};

#[derive(Parser, Debug)]
#[command(name = "measure_gui", about = "Click points on an image to measure them", version)]
struct Cli {
    /// Image to open on start
    image: Option<PathBuf>,

    /// Config file (defaults to measure_image.toml or $MEASURE_IMAGE_CONFIG)
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;
    logging::init(&config.logging.filter);

    gui_app::run_iced_app(config, cli.image)?;
    Ok(())
}
