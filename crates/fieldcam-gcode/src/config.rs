//! Program settings.

use serde::{Deserialize, Serialize};

/// Output units. Toolpaths are always in millimetres.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Units {
    /// Millimetres (`G21`).
    #[default]
    Millimeters,
    /// Inches (`G20`); coordinates and feeds are converted.
    Inches,
}

impl Units {
    /// Modal code selecting these units.
    pub fn code(&self) -> &'static str {
        match self {
            Units::Millimeters => "G21",
            Units::Inches => "G20",
        }
    }

    /// Convert a length in millimetres to these units.
    pub fn convert(&self, value: f64) -> f64 {
        match self {
            Units::Millimeters => value,
            Units::Inches => value / 25.4,
        }
    }
}

/// Fanuc program settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GCodeConfig {
    /// Output units.
    pub units: Units,
    /// Program number for the `O` word.
    pub program_number: u32,
    /// Program name, written as a comment after the `O` word.
    pub program_name: String,
    /// Extra lines after the program number.
    pub header: Vec<String>,
    /// Extra lines before program end.
    pub footer: Vec<String>,
    /// Prefix lines with `N` sequence numbers.
    pub line_numbers: bool,
    /// First sequence number.
    pub line_number_start: u32,
    /// Sequence number increment.
    pub line_number_step: u32,
    /// Decimal places for coordinates.
    pub precision: usize,
    /// Decimal places for feed rates.
    pub feed_precision: usize,
    /// Code for rapid moves.
    pub rapid_code: String,
    /// Code for cutting moves.
    pub linear_code: String,
    /// Tool to load with `M06`.
    pub tool_number: u32,
    /// Spindle speed for `M03`; omitted when unset.
    pub spindle_rpm: Option<f64>,
    /// Wrap the program in `%` tape delimiters.
    pub use_percent_delimiters: bool,
}

impl Default for GCodeConfig {
    fn default() -> Self {
        Self {
            units: Units::Millimeters,
            program_number: 1,
            program_name: "FIELDCAM".into(),
            header: Vec::new(),
            footer: Vec::new(),
            line_numbers: false,
            line_number_start: 10,
            line_number_step: 10,
            precision: 3,
            feed_precision: 1,
            rapid_code: "G00".into(),
            linear_code: "G01".into(),
            tool_number: 1,
            spindle_rpm: None,
            use_percent_delimiters: true,
        }
    }
}
