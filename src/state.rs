use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::format::NumberLocale;
use crate::intake::first_image;
use crate::ledger::PointLedger;
use crate::mapper::{CoordinateMapper, DisplayPoint, ImageDimensions, Point, RatioPolicy};
use crate::report::MeasurementReport;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    NoImage,
    /// A file was chosen but its load event has not arrived.
    Loading,
    ImageLoaded,
}

/// Single owner of everything the measuring view shows.
///
/// Every mutation that changes what would be displayed bumps [`revision`],
/// which the view layer uses to decide when cached drawings are stale.
///
/// [`revision`]: MeasureSession::revision
#[derive(Debug, Clone)]
pub struct MeasureSession {
    source: Option<PathBuf>,
    dimensions: Option<ImageDimensions>,
    mapper: CoordinateMapper,
    pointer: Point,
    ledger: PointLedger,
    revision: u64,
}

impl Default for MeasureSession {
    fn default() -> Self {
        Self::new(RatioPolicy::default())
    }
}

impl MeasureSession {
    pub fn new(policy: RatioPolicy) -> Self {
        Self {
            source: None,
            dimensions: None,
            mapper: CoordinateMapper::new(policy),
            pointer: Point::default(),
            ledger: PointLedger::new(),
            revision: 0,
        }
    }

    pub fn phase(&self) -> SessionPhase {
        match (&self.source, self.dimensions) {
            (None, _) => SessionPhase::NoImage,
            (Some(_), None) => SessionPhase::Loading,
            (Some(_), Some(_)) => SessionPhase::ImageLoaded,
        }
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn dimensions(&self) -> Option<ImageDimensions> {
        self.dimensions
    }

    pub fn pointer(&self) -> Point {
        self.pointer
    }

    pub fn ledger(&self) -> &PointLedger {
        &self.ledger
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    fn touch(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }

    /// Take a new file from a drop or the file picker.
    ///
    /// Non-image candidates are filtered out and at most one image is kept.
    /// When an image remains, every previous measurement is discarded, even if
    /// the same file is chosen again.
    pub fn select_image<I, P>(&mut self, candidates: I) -> Option<PathBuf>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let Some(path) = first_image(candidates) else {
            debug!("no image among selected files");
            return None;
        };
        info!(path = %path.display(), "image selected");
        self.source = Some(path.clone());
        self.dimensions = None;
        self.mapper.reset();
        self.pointer = Point::default();
        self.ledger.clear_points();
        self.touch();
        Some(path)
    }

    /// Apply the load event for `path`. Loads of a file that has since been
    /// replaced are ignored.
    pub fn image_loaded(&mut self, path: &Path, dims: ImageDimensions) -> bool {
        if self.source.as_deref() != Some(path) {
            debug!(path = %path.display(), "ignoring load of replaced image");
            return false;
        }
        if dims.is_empty() {
            debug!(path = %path.display(), "ignoring image without pixels");
            return false;
        }
        info!(width = dims.width, height = dims.height, "image loaded");
        self.dimensions = Some(dims);
        self.mapper.set_natural_width(dims.width);
        self.touch();
        true
    }

    /// Drop the current image after a failed load; the session returns to the placeholder.
    pub fn unload(&mut self) {
        self.source = None;
        self.dimensions = None;
        self.mapper.reset();
        self.pointer = Point::default();
        self.ledger.clear_points();
        self.touch();
    }

    /// Recompute the live pointer from a position on the displayed image.
    /// Skipped while the image or its displayed width is unknown.
    pub fn pointer_moved(&mut self, pointer: DisplayPoint, displayed_width: f32) -> bool {
        if self.dimensions.is_none() {
            return false;
        }
        let Some(mapped) = self.mapper.map(pointer, displayed_width) else {
            return false;
        };
        if mapped != self.pointer {
            self.pointer = mapped;
            self.touch();
        }
        true
    }

    /// Commit the live pointer to the ledger.
    pub fn commit_pointer(&mut self) -> Option<Point> {
        self.dimensions?;
        let point = self.pointer;
        self.ledger.add_point(point);
        debug!(x = point.x, y = point.y, count = self.ledger.len(), "point committed");
        self.touch();
        Some(point)
    }

    /// A click maps its own position first, then commits it.
    pub fn click(&mut self, pointer: DisplayPoint, displayed_width: f32) -> Option<Point> {
        if !self.pointer_moved(pointer, displayed_width) {
            return None;
        }
        self.commit_pointer()
    }

    pub fn report(&self, locale: &NumberLocale) -> MeasurementReport {
        MeasurementReport::build(
            self.source.is_some(),
            self.dimensions,
            self.pointer,
            &self.ledger,
            locale,
        )
    }
}
