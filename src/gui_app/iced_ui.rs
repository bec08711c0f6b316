use std::path::PathBuf;

use iced::widget::image::Handle;
use iced::widget::{Canvas, Column, button, column, container, horizontal_rule, row, scrollable, text};
use iced::{Color, Element, Event, Font, Length, Size, Subscription, Task, Theme, event, window};
use tracing::{info, warn};

use crate::config::MeasureConfig;
use crate::error::MeasureError;
use crate::format::NumberLocale;
use crate::gui_app::viewer::{ImageViewer, MeasureCanvas, ViewerEvent};
use crate::intake::{DropGesture, PICKER_EXTENSIONS};
use crate::loader::decode_image;
use crate::mapper::ImageDimensions;
use crate::report::{MeasurementReport, PLACEHOLDER};
use crate::state::MeasureSession;

const STATS_WIDTH: f32 = 360.0;

pub fn run_iced_app(config: MeasureConfig, initial: Option<PathBuf>) -> iced::Result {
    let size = Size::new(config.window.width, config.window.height);
    iced::application("Measure Image", MeasureApp::update, MeasureApp::view)
        .subscription(MeasureApp::subscription)
        .theme(MeasureApp::theme)
        .window(window::Settings {
            size,
            ..Default::default()
        })
        .run_with(move || MeasureApp::new(config, initial))
}

struct MeasureApp {
    session: MeasureSession,
    viewer: ImageViewer,
    locale: NumberLocale,
    drop_gesture: DropGesture,
    status_text: String,
    marker_size: f32,
}

#[derive(Debug, Clone)]
enum Message {
    OpenPressed,
    FilesPicked(Vec<PathBuf>),
    ImageLoaded(Result<LoadedImage, LoadFailure>),
    Viewer(ViewerEvent),
    FileHovered,
    FileDropped(PathBuf),
    FilesHoveredLeft,
}

#[derive(Debug, Clone)]
struct LoadedImage {
    path: PathBuf,
    dimensions: ImageDimensions,
    handle: Handle,
}

#[derive(Debug, Clone)]
struct LoadFailure {
    path: PathBuf,
    reason: String,
}

impl MeasureApp {
    fn new(config: MeasureConfig, initial: Option<PathBuf>) -> (Self, Task<Message>) {
        let locale = NumberLocale::resolve(config.display.locale.as_deref());
        info!(locale = locale.tag(), policy = ?config.display.ratio_policy, "starting viewer");

        let app = MeasureApp {
            session: MeasureSession::new(config.display.ratio_policy),
            viewer: ImageViewer::default(),
            locale,
            drop_gesture: DropGesture::default(),
            status_text: "Load an image to begin".to_string(),
            marker_size: config.display.marker_size,
        };

        let task = match initial {
            Some(path) => Task::done(Message::FilesPicked(vec![path])),
            None => Task::none(),
        };
        (app, task)
    }

    fn update(&mut self, message: Message) -> Task<Message> {
        let task = match message {
            Message::OpenPressed => {
                let dialog = rfd::AsyncFileDialog::new()
                    .add_filter("Images", PICKER_EXTENSIONS)
                    .pick_file();

                Task::perform(dialog, |result| {
                    Message::FilesPicked(
                        result
                            .map(|file| vec![file.path().to_path_buf()])
                            .unwrap_or_default(),
                    )
                })
            }
            Message::FilesPicked(paths) => self.select(paths),
            Message::FileHovered => {
                self.drop_gesture.hovered();
                Task::none()
            }
            Message::FileDropped(path) => match self.drop_gesture.dropped(&path) {
                Some(image) => self.select(vec![image]),
                None => Task::none(),
            },
            Message::FilesHoveredLeft => {
                self.drop_gesture.left();
                Task::none()
            }
            Message::ImageLoaded(Ok(image)) => {
                let LoadedImage {
                    path,
                    dimensions,
                    handle,
                } = image;
                if self.session.image_loaded(&path, dimensions) {
                    self.viewer.set_image(handle, dimensions);
                    self.status_text = format!("Loaded {}", path.display());
                }
                Task::none()
            }
            Message::ImageLoaded(Err(failure)) => {
                if self.session.source() == Some(failure.path.as_path()) {
                    warn!(path = %failure.path.display(), reason = %failure.reason, "image load failed");
                    self.session.unload();
                    self.viewer.clear();
                    self.status_text = format!("Failed to load image: {}", failure.reason);
                }
                Task::none()
            }
            Message::Viewer(event) => {
                self.handle_viewer_event(event);
                Task::none()
            }
        };

        self.viewer.sync_revision(self.session.revision());
        task
    }

    fn select(&mut self, paths: Vec<PathBuf>) -> Task<Message> {
        let Some(path) = self.session.select_image(paths) else {
            return Task::none();
        };
        self.viewer.clear();
        self.status_text = format!("Loading {}", path.display());
        Task::perform(load_image_task(path), Message::ImageLoaded)
    }

    fn handle_viewer_event(&mut self, event: ViewerEvent) {
        // pointer activity means any earlier drop gesture is over
        self.drop_gesture.left();
        match event {
            ViewerEvent::Hover {
                position,
                displayed_width,
            } => {
                self.session.pointer_moved(position, displayed_width);
            }
            ViewerEvent::Click {
                position,
                displayed_width,
            } => {
                if let Some(point) = self.session.click(position, displayed_width) {
                    info!(x = point.x, y = point.y, "point added");
                }
            }
        }
    }

    fn view(&self) -> Element<'_, Message> {
        row![self.viewer_section(), self.stats_section()]
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }

    fn viewer_section(&self) -> Element<'_, Message> {
        let canvas: Element<'_, ViewerEvent> = Canvas::new(MeasureCanvas {
            viewer: &self.viewer,
            points: self.session.ledger().points(),
            marker_size: self.marker_size,
        })
        .width(Length::Fill)
        .height(Length::Fill)
        .into();

        let status = if self.drop_gesture.is_hovering() {
            "Drop to load the image".to_string()
        } else {
            self.status_text.clone()
        };

        let controls = row![
            button(text("Open Image")).on_press(Message::OpenPressed),
            text(status).size(12),
        ]
        .spacing(16)
        .align_y(iced::Alignment::Center);

        column![
            container(canvas.map(Message::Viewer))
                .width(Length::Fill)
                .height(Length::Fill)
                .clip(true),
            container(controls).padding(10),
        ]
        .width(Length::Fill)
        .height(Length::Fill)
        .into()
    }

    fn stats_section(&self) -> Element<'_, Message> {
        let mut lines = Column::new().spacing(6);

        match self.session.report(&self.locale) {
            MeasurementReport::Placeholder => {
                lines = lines.push(text(PLACEHOLDER).size(14));
            }
            MeasurementReport::Loading => {
                lines = lines.push(text("Loading...").size(14));
            }
            MeasurementReport::Measured {
                header,
                current,
                entries,
            } => {
                lines = lines
                    .push(text(header).size(16))
                    .push(stat_line(current))
                    .push(horizontal_rule(1));
                for entry in entries {
                    lines = lines.push(stat_line(entry.point));
                    if let Some(midpoint) = entry.midpoint {
                        lines = lines.push(stat_line(midpoint)).push(horizontal_rule(1));
                    }
                }
            }
        }

        container(scrollable(lines).height(Length::Fill))
            .width(Length::Fixed(STATS_WIDTH))
            .height(Length::Fill)
            .padding(20)
            .style(|_| container::Style {
                background: Some(Color::from_rgb8(32, 32, 32).into()),
                ..Default::default()
            })
            .into()
    }

    fn subscription(&self) -> Subscription<Message> {
        event::listen_with(|event, _status, _window| match event {
            Event::Window(window::Event::FileHovered(_)) => Some(Message::FileHovered),
            Event::Window(window::Event::FileDropped(path)) => Some(Message::FileDropped(path)),
            Event::Window(window::Event::FilesHoveredLeft) => Some(Message::FilesHoveredLeft),
            _ => None,
        })
    }

    fn theme(&self) -> Theme {
        Theme::Dark
    }
}

fn stat_line<'a>(line: String) -> Element<'a, Message> {
    text(line).size(14).font(Font::MONOSPACE).into()
}

async fn load_image_task(path: PathBuf) -> Result<LoadedImage, LoadFailure> {
    let task_path = path.clone();
    let decoded = tokio::task::spawn_blocking(move || decode_image(&task_path))
        .await
        .map_err(|err| MeasureError::Task(err.to_string()))
        .and_then(|result| result);

    match decoded {
        Ok(image) => Ok(LoadedImage {
            handle: Handle::from_rgba(image.dimensions.width, image.dimensions.height, image.pixels),
            dimensions: image.dimensions,
            path,
        }),
        Err(err) => Err(LoadFailure {
            path,
            reason: err.to_string(),
        }),
    }
}
