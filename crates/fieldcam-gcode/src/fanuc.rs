//! Fanuc-style program writer.

use fieldcam_cam::{Motion, ToolpathPoint, ToolpathResult};

use crate::config::GCodeConfig;

/// Format a value at `precision` decimals, printing negative zero as zero.
pub fn format_coord(value: f64, precision: usize) -> String {
    let s = format!("{:.prec$}", value, prec = precision);
    match s.strip_prefix('-') {
        Some(rest) if rest.chars().all(|c| c == '0' || c == '.') => rest.to_string(),
        _ => s,
    }
}

/// Modal state carried between motion lines.
#[derive(Debug, Default)]
struct ModalState {
    motion: Option<Motion>,
    feed: Option<String>,
    axes: [Option<String>; 3],
}

/// Accumulates program lines with optional sequence numbers.
struct ProgramWriter {
    out: String,
    number: Option<u32>,
    step: u32,
    lines: usize,
}

impl ProgramWriter {
    fn new(config: &GCodeConfig) -> Self {
        Self {
            out: String::new(),
            number: config.line_numbers.then_some(config.line_number_start),
            step: config.line_number_step,
            lines: 0,
        }
    }

    /// Write a line, numbered when sequence numbers are enabled.
    fn line(&mut self, text: &str) {
        if let Some(n) = self.number {
            self.out.push_str(&format!("N{n} "));
            self.number = Some(n.saturating_add(self.step));
        }
        self.raw(text);
    }

    /// Write a line that never carries a sequence number.
    fn raw(&mut self, text: &str) {
        self.out.push_str(text);
        self.out.push('\n');
        self.lines += 1;
    }
}

fn program_comment(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_ascii() && !matches!(c, '(' | ')' | '\n' | '\r'))
        .collect::<String>()
        .to_ascii_uppercase()
}

/// Serialize a toolpath as a Fanuc-dialect program.
///
/// Rapid points become `G00` and feed points `G01`. Motion codes, feed words
/// and unchanged axes are modal and only written when they change. An empty
/// toolpath yields just the header and footer.
pub fn emit_fanuc_gcode(toolpath: &ToolpathResult, config: &GCodeConfig) -> String {
    let mut w = ProgramWriter::new(config);

    if config.use_percent_delimiters {
        w.raw("%");
    }
    let name = program_comment(&config.program_name);
    if name.is_empty() {
        w.raw(&format!("O{:04}", config.program_number));
    } else {
        w.raw(&format!("O{:04} ({name})", config.program_number));
    }
    for line in &config.header {
        w.line(line);
    }
    w.line(config.units.code());
    w.line("G90 G17 G40 G49 G80");
    w.line(&format!("T{} M06", config.tool_number));
    match config.spindle_rpm {
        Some(rpm) => w.line(&format!("S{rpm:.0} M03")),
        None => w.line("M03"),
    }

    let mut modal = ModalState::default();
    let mut moves = 0usize;
    for point in &toolpath.points {
        if let Some(text) = motion_line(point, config, &mut modal) {
            w.line(&text);
            moves += 1;
        }
    }

    w.line("M05");
    for line in &config.footer {
        w.line(line);
    }
    w.line("M30");
    if config.use_percent_delimiters {
        w.raw("%");
    }

    tracing::debug!(lines = w.lines, moves, "emitted fanuc program");
    w.out
}

/// Words for one point, or `None` when no axis changes.
fn motion_line(point: &ToolpathPoint, config: &GCodeConfig, modal: &mut ModalState) -> Option<String> {
    let p = &point.position;
    let mut words: Vec<String> = Vec::with_capacity(5);
    let mut moved = false;
    for (i, (letter, value)) in [('X', p.x), ('Y', p.y), ('Z', p.z)].into_iter().enumerate() {
        let formatted = format_coord(config.units.convert(value), config.precision);
        if modal.axes[i].as_deref() != Some(formatted.as_str()) {
            words.push(format!("{letter}{formatted}"));
            modal.axes[i] = Some(formatted);
            moved = true;
        }
    }
    if !moved {
        return None;
    }

    if modal.motion != Some(point.motion) {
        let code = match point.motion {
            Motion::Rapid => &config.rapid_code,
            Motion::Feed => &config.linear_code,
        };
        words.insert(0, code.clone());
        modal.motion = Some(point.motion);
    }

    if point.motion == Motion::Feed {
        let feed = format_coord(config.units.convert(point.feed_rate), config.feed_precision);
        if modal.feed.as_deref() != Some(feed.as_str()) {
            words.push(format!("F{feed}"));
            modal.feed = Some(feed);
        }
    }
    Some(words.join(" "))
}
