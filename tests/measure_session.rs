mod common;

use std::path::Path;

use measure_image::MeasureError;
use measure_image::format::NumberLocale;
use measure_image::loader::{decode_image, read_dimensions};
use measure_image::mapper::{DisplayPoint, ImageDimensions, Point, RatioPolicy};
use measure_image::report::MeasurementReport;
use measure_image::state::{MeasureSession, SessionPhase};

fn en() -> NumberLocale {
    NumberLocale::from_tag("en-US")
}

fn loaded_session(name: &str, width: u32, height: u32) -> MeasureSession {
    let mut session = MeasureSession::default();
    session.select_image([name]);
    assert!(session.image_loaded(Path::new(name), ImageDimensions::new(width, height)));
    session
}

#[test]
fn loader_reports_natural_dimensions() {
    let path = common::generate_test_image("dims.png", 200, 100);

    let dims = read_dimensions(&path).expect("read dimensions");
    assert_eq!(dims, ImageDimensions::new(200, 100));

    let decoded = decode_image(&path).expect("decode");
    assert_eq!(decoded.dimensions, dims);
    assert_eq!(decoded.pixels.len(), 200 * 100 * 4);
    assert_eq!(&decoded.pixels[..4], &[255, 165, 0, 255]);
}

#[test]
fn loader_rejects_non_images() {
    let err = read_dimensions(Path::new("Cargo.toml")).expect_err("not an image");
    assert!(matches!(err, MeasureError::NotAnImage(_)));

    let missing = std::env::temp_dir().join("measure_image_does_not_exist.png");
    assert!(decode_image(&missing).is_err());
}

#[test]
fn measures_scaled_clicks_end_to_end() {
    let path = common::generate_test_image("scaled.png", 400, 200);
    let mut session = MeasureSession::new(RatioPolicy::OnResize);

    let chosen = session
        .select_image([Path::new("notes.txt"), path.as_path()])
        .expect("image chosen");
    assert_eq!(session.phase(), SessionPhase::Loading);
    assert_eq!(session.report(&en()), MeasurementReport::Loading);

    let dims = read_dimensions(&chosen).expect("dims");
    assert!(session.image_loaded(&chosen, dims));

    // displayed at half size
    session.click(DisplayPoint::new(50.0, 25.0), 200.0);
    session.click(DisplayPoint::new(150.0, 75.0), 200.0);
    session.pointer_moved(DisplayPoint::new(100.0, 50.0), 200.0);

    assert_eq!(
        session.ledger().points(),
        &[Point::new(100, 50), Point::new(300, 150)]
    );

    let expected = [
        "400 x 200",
        "200 ; 100 // 50% ; 50%",
        "----",
        "100 ; 50 // 25% ; 25%",
        "300 ; 150 // 75% ; 75%",
        "--> 200 ; 100 // 50% ; 50%",
        "----",
    ]
    .join("\n");
    assert_eq!(session.report(&en()).to_text(), expected);
}

#[test]
fn resize_between_clicks_keeps_image_space() {
    let mut session = MeasureSession::new(RatioPolicy::OnResize);
    session.select_image(["photo.jpg"]);
    session.image_loaded(Path::new("photo.jpg"), ImageDimensions::new(1000, 500));

    // the same spot of the image, before and after the window shrinks
    session.click(DisplayPoint::new(250.0, 125.0), 500.0);
    session.click(DisplayPoint::new(125.0, 62.5), 250.0);

    assert_eq!(
        session.ledger().points(),
        &[Point::new(500, 250), Point::new(500, 250)]
    );
}

#[test]
fn midpoint_count_is_half_the_points() {
    let mut session = loaded_session("grid.png", 100, 100);

    for n in 0..7usize {
        assert_eq!(session.report(&en()).midpoint_count(), n / 2);
        session.click(DisplayPoint::new(n as f32, n as f32), 100.0);
    }
    assert_eq!(session.ledger().len(), 7);
}

#[test]
fn pair_of_clicks_yields_midpoint_line() {
    let mut session = loaded_session("square.png", 100, 100);
    session.click(DisplayPoint::new(10.0, 10.0), 100.0);
    session.click(DisplayPoint::new(30.0, 30.0), 100.0);

    let MeasurementReport::Measured { entries, .. } = session.report(&en()) else {
        panic!("expected measurements");
    };
    assert_eq!(entries[0].midpoint, None);
    assert_eq!(
        entries[1].midpoint.as_deref(),
        Some("--> 20 ; 20 // 20% ; 20%")
    );
}

#[test]
fn locale_changes_only_percentages() {
    let mut session = loaded_session("wide.png", 200, 100);
    session.click(DisplayPoint::new(50.0, 25.0), 200.0);

    let MeasurementReport::Measured { entries, .. } =
        session.report(&NumberLocale::from_tag("de-DE"))
    else {
        panic!("expected measurements");
    };
    assert_eq!(entries[0].point, "50 ; 25 // 25\u{a0}% ; 25\u{a0}%");
}

#[test]
fn new_image_always_starts_empty() {
    let mut session = loaded_session("one.png", 50, 50);
    session.click(DisplayPoint::new(5.0, 5.0), 50.0);
    session.click(DisplayPoint::new(6.0, 6.0), 50.0);

    session.select_image(["two.png"]);
    assert!(session.ledger().is_empty());
    session.image_loaded(Path::new("two.png"), ImageDimensions::new(80, 40));
    assert!(session.ledger().is_empty());
    assert_eq!(session.pointer(), Point::default());
}
