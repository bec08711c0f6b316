use std::error::Error;
use std::path::PathBuf;

use clap::Parser;
use tracing::warn;

use measure_image::config::load_config;
use measure_image::format::NumberLocale;
use measure_image::loader::read_dimensions;
use measure_image::logging;
use measure_image::mapper::DisplayPoint;
use measure_image::state::MeasureSession;
use measure_image::{MeasureError, MeasureResult};

#[derive(Parser, Debug)]
#[command(
    name = "measure_cli",
    about = "Print pixel and percentage coordinates of points on an image",
    version
)]
struct Cli {
    /// Image to measure
    image: PathBuf,

    /// Point as X,Y; repeat for more points. Every second point closes a segment.
    #[arg(short = 'p', long = "point", allow_hyphen_values = true)]
    points: Vec<DisplayPoint>,

    /// Treat points as positions on an image displayed this many pixels wide
    #[arg(short = 'w', long = "display-width")]
    display_width: Option<f32>,

    /// Locale for percentages, e.g. de-DE (defaults to config, then LANG)
    #[arg(short = 'l', long = "locale")]
    locale: Option<String>,

    /// Emit the report as JSON
    #[arg(long = "json")]
    json: bool,

    /// Config file (defaults to measure_image.toml or $MEASURE_IMAGE_CONFIG)
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn Error>> {
    run(Cli::parse())?;
    Ok(())
}

fn run(cli: Cli) -> MeasureResult<()> {
    let mut config = load_config(cli.config.as_deref())?;
    logging::init(&config.logging.filter);

    if cli.locale.is_some() {
        config.display.locale = cli.locale.clone();
    }
    let locale = NumberLocale::resolve(config.display.locale.as_deref());

    let mut session = MeasureSession::new(config.display.ratio_policy);
    let Some(path) = session.select_image([&cli.image]) else {
        return Err(MeasureError::NotAnImage(cli.image));
    };
    let dims = read_dimensions(&path)?;
    session.image_loaded(&path, dims);

    // without a display width the points are already in image pixels
    let displayed_width = cli.display_width.unwrap_or(dims.width as f32);
    for point in &cli.points {
        if session.click(*point, displayed_width).is_none() {
            warn!(x = point.x, y = point.y, displayed_width, "point skipped");
        }
    }

    let report = session.report(&locale);
    if cli.json {
        println!("{}", report.to_json()?);
    } else {
        println!("{}", report.to_text());
    }
    Ok(())
}
