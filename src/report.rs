use serde::Serialize;

use crate::error::MeasureResult;
use crate::format::{NumberLocale, format_midpoint, format_point};
use crate::ledger::PointLedger;
use crate::mapper::{ImageDimensions, Point};

/// Shown instead of measurements until an image is chosen.
pub const PLACEHOLDER: &str = "Load an image by dropping it or clicking on the button below!";

/// Visual separator in plain-text output.
pub const SEPARATOR: &str = "----";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportEntry {
    pub point: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub midpoint: Option<String>,
}

/// Everything the stats panel displays for the current state.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum MeasurementReport {
    Placeholder,
    Loading,
    Measured {
        header: String,
        current: String,
        entries: Vec<ReportEntry>,
    },
}

impl MeasurementReport {
    /// Build the report; `None` dimensions mean the image has not loaded yet.
    pub fn build(
        has_source: bool,
        dims: Option<ImageDimensions>,
        pointer: Point,
        ledger: &PointLedger,
        locale: &NumberLocale,
    ) -> Self {
        if !has_source {
            return Self::Placeholder;
        }
        let Some(dims) = dims else {
            return Self::Loading;
        };
        let Some(current) = format_point(pointer, dims, locale) else {
            return Self::Loading;
        };

        let entries = ledger
            .entries()
            .filter_map(|entry| {
                let point = format_point(entry.point, dims, locale)?;
                let midpoint = entry
                    .midpoint
                    .and_then(|mid| format_midpoint(mid, dims, locale));
                Some(ReportEntry { point, midpoint })
            })
            .collect();

        Self::Measured {
            header: format!("{} x {}", dims.width, dims.height),
            current,
            entries,
        }
    }

    pub fn midpoint_count(&self) -> usize {
        match self {
            Self::Measured { entries, .. } => {
                entries.iter().filter(|entry| entry.midpoint.is_some()).count()
            }
            _ => 0,
        }
    }

    /// Plain-text rendering, one line per row.
    pub fn to_text(&self) -> String {
        match self {
            Self::Placeholder => PLACEHOLDER.to_string(),
            Self::Loading => String::new(),
            Self::Measured {
                header,
                current,
                entries,
            } => {
                let mut lines = vec![header.clone(), current.clone(), SEPARATOR.to_string()];
                for entry in entries {
                    lines.push(entry.point.clone());
                    if let Some(mid) = &entry.midpoint {
                        lines.push(mid.clone());
                        lines.push(SEPARATOR.to_string());
                    }
                }
                lines.join("\n")
            }
        }
    }

    /// Pretty-printed JSON, tagged by `state`.
    pub fn to_json(&self) -> MeasureResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
