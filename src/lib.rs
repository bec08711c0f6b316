//! Click points on an image and read back their pixel and percentage coordinates.
//!
//! The core lives in [`mapper`] (display space to image pixel space) and
//! [`ledger`] + [`format`] (committed points and their text). [`state`] ties
//! them together for the GUI in [`gui_app`] and the `measure_cli` binary.

pub mod config;
pub mod error;
pub mod format;
pub mod gui_app;
pub mod intake;
pub mod ledger;
pub mod loader;
pub mod logging;
pub mod mapper;
pub mod report;
pub mod state;

pub use error::{MeasureError, MeasureResult};
