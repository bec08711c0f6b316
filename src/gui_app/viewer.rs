use iced::mouse::{self, Cursor};
use iced::widget::canvas::{self, Frame, Geometry, Path, Program, Stroke, event};
use iced::widget::image::Handle;
use iced::{Color, Point, Rectangle, Size, Theme, Vector, alignment};

use crate::ledger::Midpoint;
use crate::mapper::{DisplayPoint, ImageDimensions, Point as PixelPoint};
use crate::report::PLACEHOLDER;

const BACKGROUND: Color = Color::from_rgb(0.07, 0.07, 0.07);
const MARKER_COLOR: Color = Color::from_rgb(1.0, 0.0, 1.0);
const SEGMENT_COLOR: Color = Color::from_rgb(0.95, 0.8, 0.1);
const MARKER_STROKE_WIDTH: f32 = 2.0;

/// Pointer activity over the displayed image, already relative to its top-left corner.
#[derive(Debug, Clone)]
pub enum ViewerEvent {
    Hover {
        position: DisplayPoint,
        displayed_width: f32,
    },
    Click {
        position: DisplayPoint,
        displayed_width: f32,
    },
}

/// Shows the image scaled to fit the canvas and keeps the drawing caches.
pub struct ImageViewer {
    image: Option<Handle>,
    image_size: Size,
    image_cache: canvas::Cache,
    overlay_cache: canvas::Cache,
    drawn_revision: Option<u64>,
}

impl Default for ImageViewer {
    fn default() -> Self {
        Self {
            image: None,
            image_size: Size::ZERO,
            image_cache: canvas::Cache::default(),
            overlay_cache: canvas::Cache::default(),
            drawn_revision: None,
        }
    }
}

impl ImageViewer {
    pub fn set_image(&mut self, handle: Handle, dims: ImageDimensions) {
        self.image = Some(handle);
        self.image_size = Size::new(dims.width as f32, dims.height as f32);
        self.invalidate();
    }

    /// Release the displayed image.
    pub fn clear(&mut self) {
        self.image = None;
        self.image_size = Size::ZERO;
        self.invalidate();
    }

    pub fn has_image(&self) -> bool {
        self.image.is_some()
    }

    /// Redraw markers when the session changed since the last draw.
    pub fn sync_revision(&mut self, revision: u64) {
        if self.drawn_revision != Some(revision) {
            self.drawn_revision = Some(revision);
            self.overlay_cache.clear();
        }
    }

    fn invalidate(&mut self) {
        self.image_cache.clear();
        self.overlay_cache.clear();
    }

    fn compute_fit_scale(&self, viewport: Size) -> f32 {
        if self.image_size.width <= 0.0 || self.image_size.height <= 0.0 {
            return 0.0;
        }

        let scale_x = viewport.width / self.image_size.width;
        let scale_y = viewport.height / self.image_size.height;
        scale_x.min(scale_y).max(0.0)
    }

    fn center_offset(&self, viewport: Size, scale: f32) -> Vector {
        let scaled_width = self.image_size.width * scale;
        let scaled_height = self.image_size.height * scale;

        Vector::new(
            (viewport.width - scaled_width) / 2.0,
            (viewport.height - scaled_height) / 2.0,
        )
    }

    /// Where the image is drawn inside a canvas of `viewport` size.
    /// `None` until an image is set or while the canvas has no area.
    pub fn displayed_rect(&self, viewport: Size) -> Option<Rectangle> {
        self.image.as_ref()?;
        let scale = self.compute_fit_scale(viewport);
        if scale <= 0.0 {
            return None;
        }
        let offset = self.center_offset(viewport, scale);
        Some(Rectangle::new(
            Point::new(offset.x, offset.y),
            Size::new(self.image_size.width * scale, self.image_size.height * scale),
        ))
    }
}

/// Canvas program: the image layer plus markers for committed points.
pub struct MeasureCanvas<'a> {
    pub viewer: &'a ImageViewer,
    pub points: &'a [PixelPoint],
    pub marker_size: f32,
}

impl MeasureCanvas<'_> {
    fn to_screen(&self, rect: Rectangle, x: f64, y: f64) -> Point {
        let scale = rect.width / self.viewer.image_size.width;
        Point::new(rect.x + x as f32 * scale, rect.y + y as f32 * scale)
    }

    fn draw_markers(&self, frame: &mut Frame, rect: Rectangle) {
        let half = self.marker_size / 2.0;
        let marker = Stroke::default()
            .with_width(MARKER_STROKE_WIDTH)
            .with_color(MARKER_COLOR);
        let segment = Stroke::default()
            .with_width(1.0)
            .with_color(SEGMENT_COLOR);

        for (index, point) in self.points.iter().enumerate() {
            let center = self.to_screen(rect, f64::from(point.x), f64::from(point.y));
            frame.stroke(
                &Path::line(
                    Point::new(center.x - half, center.y),
                    Point::new(center.x + half, center.y),
                ),
                marker,
            );
            frame.stroke(
                &Path::line(
                    Point::new(center.x, center.y - half),
                    Point::new(center.x, center.y + half),
                ),
                marker,
            );

            if index % 2 == 1 {
                let previous = self.points[index - 1];
                let start = self.to_screen(rect, f64::from(previous.x), f64::from(previous.y));
                frame.stroke(&Path::line(start, center), segment);

                let mid = Midpoint::between(previous, *point);
                let mid = self.to_screen(rect, mid.x, mid.y);
                frame.fill(&Path::circle(mid, half / 2.0), SEGMENT_COLOR);
            }
        }
    }
}

impl Program<ViewerEvent> for MeasureCanvas<'_> {
    type State = ();

    fn update(
        &self,
        _state: &mut Self::State,
        event: canvas::Event,
        bounds: Rectangle,
        cursor: Cursor,
    ) -> (event::Status, Option<ViewerEvent>) {
        let canvas::Event::Mouse(mouse_event) = event else {
            return (event::Status::Ignored, None);
        };
        let Some(rect) = self.viewer.displayed_rect(bounds.size()) else {
            return (event::Status::Ignored, None);
        };
        let over_image = cursor
            .position_in(bounds)
            .filter(|position| rect.contains(*position))
            .map(|position| DisplayPoint::new(position.x - rect.x, position.y - rect.y));

        match mouse_event {
            mouse::Event::CursorMoved { .. } => match over_image {
                Some(position) => (
                    event::Status::Captured,
                    Some(ViewerEvent::Hover {
                        position,
                        displayed_width: rect.width,
                    }),
                ),
                None => (event::Status::Ignored, None),
            },
            mouse::Event::ButtonPressed(mouse::Button::Left) => match over_image {
                Some(position) => (
                    event::Status::Captured,
                    Some(ViewerEvent::Click {
                        position,
                        displayed_width: rect.width,
                    }),
                ),
                None => (event::Status::Ignored, None),
            },
            _ => (event::Status::Ignored, None),
        }
    }

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &iced::Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: Cursor,
    ) -> Vec<Geometry> {
        let viewport = bounds.size();
        let rect = self.viewer.displayed_rect(viewport);

        let image_layer = self.viewer.image_cache.draw(renderer, viewport, |frame| {
            frame.fill_rectangle(Point::ORIGIN, viewport, BACKGROUND);

            match (&self.viewer.image, rect) {
                (Some(handle), Some(rect)) => {
                    frame.draw_image(rect, canvas::Image::new(handle.clone()));
                }
                _ => frame.fill_text(canvas::Text {
                    content: PLACEHOLDER.to_string(),
                    position: frame.center(),
                    color: Color::from_rgb8(200, 200, 200),
                    horizontal_alignment: alignment::Horizontal::Center,
                    vertical_alignment: alignment::Vertical::Center,
                    ..Default::default()
                }),
            }
        });

        let overlay = self.viewer.overlay_cache.draw(renderer, viewport, |frame| {
            if let Some(rect) = rect {
                self.draw_markers(frame, rect);
            }
        });

        vec![image_layer, overlay]
    }

    fn mouse_interaction(
        &self,
        _state: &Self::State,
        bounds: Rectangle,
        cursor: Cursor,
    ) -> mouse::Interaction {
        let over_image = self
            .viewer
            .displayed_rect(bounds.size())
            .zip(cursor.position_in(bounds))
            .is_some_and(|(rect, position)| rect.contains(position));
        if over_image {
            mouse::Interaction::Crosshair
        } else {
            mouse::Interaction::default()
        }
    }
}
