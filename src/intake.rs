//! Picks the one image to measure out of whatever the user dropped or selected.

use std::path::{Path, PathBuf};

use image::ImageFormat;
use tracing::debug;

/// Extensions offered by the file picker filter.
pub const PICKER_EXTENSIONS: &[&str] = &[
    "png", "jpg", "jpeg", "gif", "bmp", "webp", "tif", "tiff", "ico", "tga", "pnm", "qoi",
];

/// A path counts as an image when its extension names a format the decoder knows.
pub fn is_image_path(path: &Path) -> bool {
    ImageFormat::from_path(path).is_ok()
}

/// Keep the first image among the candidates and discard the rest.
pub fn first_image<I, P>(candidates: I) -> Option<PathBuf>
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    let mut chosen = None;
    for candidate in candidates {
        let path = candidate.as_ref();
        if !is_image_path(path) {
            debug!(path = %path.display(), "ignoring non-image candidate");
            continue;
        }
        if chosen.is_none() {
            chosen = Some(path.to_path_buf());
        } else {
            debug!(path = %path.display(), "ignoring extra image candidate");
        }
    }
    chosen
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum GestureState {
    #[default]
    Idle,
    Hovering,
    Dropped {
        accepted: bool,
    },
}

/// Groups per-file window drop events into one gesture.
///
/// The window reports one hover event and one drop event per file, so a drop
/// of three files arrives as three separate drops. Only the first image of a
/// gesture is handed out.
#[derive(Debug, Clone, Default)]
pub struct DropGesture {
    state: GestureState,
}

impl DropGesture {
    pub fn hovered(&mut self) {
        // a hover after a finished drop starts a new gesture
        if matches!(self.state, GestureState::Idle | GestureState::Dropped { .. }) {
            self.state = GestureState::Hovering;
        }
    }

    pub fn left(&mut self) {
        self.state = GestureState::Idle;
    }

    pub fn is_hovering(&self) -> bool {
        self.state == GestureState::Hovering
    }

    /// Returns the path when it is the first image dropped in this gesture.
    pub fn dropped(&mut self, path: &Path) -> Option<PathBuf> {
        let accepted = match self.state {
            GestureState::Dropped { accepted } => accepted,
            GestureState::Idle | GestureState::Hovering => false,
        };
        if accepted {
            debug!(path = %path.display(), "ignoring extra dropped file");
            self.state = GestureState::Dropped { accepted };
            return None;
        }
        let chosen = first_image([path]);
        self.state = GestureState::Dropped {
            accepted: chosen.is_some(),
        };
        chosen
    }
}
