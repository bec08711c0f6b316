//! Maps pointer positions on the displayed (scaled) image back to pixels of the original image.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::MeasureError;

/// Natural pixel size of a decoded image, independent of how it is displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImageDimensions {
    pub width: u32,
    pub height: u32,
}

impl ImageDimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// True when either side is zero, so percentages cannot be computed.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// A position in original-image pixel space.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// A pointer position relative to the top-left corner of the displayed image.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DisplayPoint {
    pub x: f32,
    pub y: f32,
}

impl DisplayPoint {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Parses `X,Y`, e.g. `120,48.5`.
impl FromStr for DisplayPoint {
    type Err = MeasureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || MeasureError::InvalidPoint(s.to_string());
        let (x, y) = s.split_once(',').ok_or_else(invalid)?;
        let x: f32 = x.trim().parse().map_err(|_| invalid())?;
        let y: f32 = y.trim().parse().map_err(|_| invalid())?;
        if !x.is_finite() || !y.is_finite() {
            return Err(invalid());
        }
        Ok(Self::new(x, y))
    }
}

/// When the natural/displayed ratio gets recomputed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RatioPolicy {
    /// Cache the ratio; recompute when the image or the displayed width changes.
    #[default]
    OnResize,
    /// Recompute on every pointer event.
    PerEvent,
}

/// `natural width / displayed width`. Only exists for a usable displayed width.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleRatio(f64);

impl ScaleRatio {
    /// Returns `None` for an unknown image (zero natural width) or a displayed
    /// width that is zero, negative or not finite (element not laid out yet).
    pub fn new(natural_width: u32, displayed_width: f32) -> Option<Self> {
        if natural_width == 0 || !displayed_width.is_finite() || displayed_width <= 0.0 {
            return None;
        }
        Some(Self(f64::from(natural_width) / f64::from(displayed_width)))
    }

    pub fn value(self) -> f64 {
        self.0
    }

    pub fn apply(self, pointer: DisplayPoint) -> Point {
        Point::new(
            round_half_up(f64::from(pointer.x) * self.0),
            round_half_up(f64::from(pointer.y) * self.0),
        )
    }
}

// Halves go toward +inf, matching the browser's Math.round.
fn round_half_up(value: f64) -> i32 {
    let floor = value.floor();
    let rounded = if value - floor >= 0.5 { floor + 1.0 } else { floor };
    rounded as i32
}

#[derive(Debug, Clone)]
pub struct CoordinateMapper {
    policy: RatioPolicy,
    natural_width: Option<u32>,
    // Displayed width the cached ratio was computed for.
    cached: Option<(f32, ScaleRatio)>,
}

impl Default for CoordinateMapper {
    fn default() -> Self {
        Self::new(RatioPolicy::default())
    }
}

impl CoordinateMapper {
    pub fn new(policy: RatioPolicy) -> Self {
        Self {
            policy,
            natural_width: None,
            cached: None,
        }
    }

    /// Called once the image load event reports its natural size.
    pub fn set_natural_width(&mut self, width: u32) {
        self.natural_width = Some(width);
        self.cached = None;
    }

    /// Forget the image; nothing maps until a new natural width arrives.
    pub fn reset(&mut self) {
        self.natural_width = None;
        self.cached = None;
    }

    /// The ratio last computed under [`RatioPolicy::OnResize`].
    pub fn cached_ratio(&self) -> Option<ScaleRatio> {
        self.cached.map(|(_, ratio)| ratio)
    }

    pub fn ratio_for(&mut self, displayed_width: f32) -> Option<ScaleRatio> {
        let natural = self.natural_width?;
        match self.policy {
            RatioPolicy::PerEvent => ScaleRatio::new(natural, displayed_width),
            RatioPolicy::OnResize => {
                if let Some((width, ratio)) = self.cached
                    && (width - displayed_width).abs() <= f32::EPSILON
                {
                    return Some(ratio);
                }
                let ratio = ScaleRatio::new(natural, displayed_width);
                self.cached = ratio.map(|ratio| (displayed_width, ratio));
                ratio
            }
        }
    }

    /// Map a pointer position on the displayed image into image pixel space.
    ///
    /// `None` means the update should be skipped: no image is known yet or the
    /// displayed width cannot produce a ratio.
    pub fn map(&mut self, pointer: DisplayPoint, displayed_width: f32) -> Option<Point> {
        self.ratio_for(displayed_width)
            .map(|ratio| ratio.apply(pointer))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ratio_scales_display_coordinates() {
        let ratio = ScaleRatio::new(2000, 500.0).expect("ratio");
        assert_eq!(ratio.value(), 4.0);
        assert_eq!(ratio.apply(DisplayPoint::new(10.0, 12.5)), Point::new(40, 50));
    }

    #[test]
    fn rounds_to_nearest_with_halves_up() {
        // ratio 3.0 / 2.0 = 1.5
        let ratio = ScaleRatio::new(3, 2.0).expect("ratio");
        assert_eq!(ratio.apply(DisplayPoint::new(1.0, 3.0)), Point::new(2, 5));
        assert_eq!(ratio.apply(DisplayPoint::new(0.2, 0.4)), Point::new(0, 1));
        assert_eq!(round_half_up(-2.5), -2);
        assert_eq!(round_half_up(0.49999999999999994), 0);
    }

    #[test]
    fn zero_or_invalid_display_width_has_no_ratio() {
        assert!(ScaleRatio::new(100, 0.0).is_none());
        assert!(ScaleRatio::new(100, -3.0).is_none());
        assert!(ScaleRatio::new(100, f32::NAN).is_none());
        assert!(ScaleRatio::new(0, 50.0).is_none());
    }

    #[test]
    fn mapper_skips_until_natural_width_known() {
        let mut mapper = CoordinateMapper::default();
        assert_eq!(mapper.map(DisplayPoint::new(5.0, 5.0), 100.0), None);

        mapper.set_natural_width(200);
        assert_eq!(mapper.map(DisplayPoint::new(5.0, 5.0), 100.0), Some(Point::new(10, 10)));
        assert_eq!(mapper.map(DisplayPoint::new(5.0, 5.0), 0.0), None);
    }

    #[test]
    fn cached_ratio_follows_resize() {
        let mut mapper = CoordinateMapper::new(RatioPolicy::OnResize);
        mapper.set_natural_width(1000);

        assert_eq!(mapper.map(DisplayPoint::new(50.0, 20.0), 500.0), Some(Point::new(100, 40)));
        assert_eq!(mapper.cached_ratio(), ScaleRatio::new(1000, 500.0));

        // window shrank: the same display point now covers more image pixels
        assert_eq!(mapper.map(DisplayPoint::new(50.0, 20.0), 250.0), Some(Point::new(200, 80)));
        assert_eq!(mapper.cached_ratio(), ScaleRatio::new(1000, 250.0));
    }

    #[test]
    fn new_image_invalidates_cached_ratio() {
        let mut mapper = CoordinateMapper::new(RatioPolicy::OnResize);
        mapper.set_natural_width(1000);
        mapper.map(DisplayPoint::new(1.0, 1.0), 500.0);

        mapper.set_natural_width(300);
        assert!(mapper.cached_ratio().is_none());
        assert_eq!(mapper.map(DisplayPoint::new(100.0, 10.0), 500.0), Some(Point::new(60, 6)));

        mapper.reset();
        assert_eq!(mapper.map(DisplayPoint::new(100.0, 10.0), 500.0), None);
    }

    #[test]
    fn parses_point_arguments() {
        assert_eq!("12,7".parse::<DisplayPoint>().ok(), Some(DisplayPoint::new(12.0, 7.0)));
        assert_eq!(" 3.5 , 4 ".parse::<DisplayPoint>().ok(), Some(DisplayPoint::new(3.5, 4.0)));
        assert!("12".parse::<DisplayPoint>().is_err());
        assert!("a,b".parse::<DisplayPoint>().is_err());
        assert!("inf,1".parse::<DisplayPoint>().is_err());
    }

    #[test]
    fn policies_agree() {
        let mut cached = CoordinateMapper::new(RatioPolicy::OnResize);
        let mut per_event = CoordinateMapper::new(RatioPolicy::PerEvent);
        cached.set_natural_width(1920);
        per_event.set_natural_width(1920);

        for (x, y, width) in [(0.0, 0.0, 640.0), (333.3, 12.7, 640.0), (50.5, 99.0, 480.0)] {
            let pointer = DisplayPoint::new(x, y);
            assert_eq!(cached.map(pointer, width), per_event.map(pointer, width));
        }
        assert!(per_event.cached_ratio().is_none());
    }
}
